/// Notes and their append-only version history.
use anyhow::Result;
use chrono::{DateTime, Local};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::db::{datetime_at, to_db_time};
use crate::types::{Note, NoteId, NoteVersion};

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: Some(row.get(0)?),
        job_id: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        starred: row.get(4)?,
        alive: row.get(5)?,
        posted_date: datetime_at(row, 6)?,
        last_update: datetime_at(row, 7)?,
    })
}

fn snapshot(note_id: NoteId, note: &Note, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO note_versions (note_id, title, content, starred, created)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            note_id,
            note.title,
            note.body,
            note.starred,
            to_db_time(note.last_update),
        ],
    )?;
    Ok(())
}

/// Inserts the note together with its first version.
pub fn create_note(note: &Note, conn: &Connection) -> Result<NoteId> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO notes (job_id, title, body, starred, alive, posted_date, last_update)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            note.job_id,
            note.title,
            note.body,
            note.starred,
            note.alive,
            to_db_time(note.posted_date),
            to_db_time(note.last_update),
        ],
    )?;
    let id = tx.last_insert_rowid() as NoteId;
    snapshot(id, note, &tx)?;
    tx.commit()?;
    Ok(id)
}

pub fn query_note(id: NoteId, conn: &Connection) -> Result<Option<Note>> {
    let note = conn
        .query_row(
            "SELECT id, job_id, title, body, starred, alive, posted_date, last_update FROM notes
             WHERE id = ?1",
            [id],
            note_from_row,
        )
        .optional()?;
    Ok(note)
}

/// Rewrites the note and appends a version. Returns false for unknown ids.
pub fn update_note(id: NoteId, note: &Note, conn: &Connection) -> Result<bool> {
    let tx = conn.unchecked_transaction()?;
    let count = tx.execute(
        "UPDATE notes SET title = ?1, body = ?2, starred = ?3, alive = ?4, last_update = ?5
         WHERE id = ?6",
        rusqlite::params![
            note.title,
            note.body,
            note.starred,
            note.alive,
            to_db_time(note.last_update),
            id,
        ],
    )?;
    if count == 0 {
        return Ok(false);
    }
    snapshot(id, note, &tx)?;
    tx.commit()?;
    Ok(true)
}

/// Alive notes posted or updated within the range, newest post first.
pub fn query_notes_for_range(
    start: DateTime<Local>,
    end: DateTime<Local>,
    conn: &Connection,
) -> Result<Vec<Note>> {
    let mut stmt = conn.prepare(
        "SELECT id, job_id, title, body, starred, alive, posted_date, last_update FROM notes
         WHERE ((posted_date >= ?1 AND posted_date <= ?2)
             OR (last_update >= ?1 AND last_update <= ?2))
           AND alive = 1
         ORDER BY posted_date DESC",
    )?;
    let rows = stmt.query_map([to_db_time(start), to_db_time(end)], note_from_row)?;
    let mut notes = Vec::new();
    for row in rows {
        notes.push(row?);
    }
    Ok(notes)
}

/// Alive notes matching a sidebar search term, newest post first.
///
/// Terms shorter than two characters match every note. A term starting with
/// `https://` matches notes whose job URI contains it, ignoring case. Any other
/// term matches notes whose job id starts with it.
pub fn search_notes(term: &str, conn: &Connection) -> Result<Vec<Note>> {
    let condition = if term.chars().count() < 2 {
        "?1 IS NOT NULL"
    } else if term.starts_with("https://") {
        "instr(lower(j.uri), lower(?1)) > 0"
    } else {
        "substr(CAST(n.job_id AS TEXT), 1, length(?1)) = ?1"
    };
    let sql = format!(
        "SELECT n.id, n.job_id, n.title, n.body, n.starred, n.alive, n.posted_date, n.last_update
         FROM notes n LEFT JOIN jobs j ON j.jid = n.job_id
         WHERE n.alive = 1 AND {condition}
         ORDER BY n.posted_date DESC, n.id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([term], note_from_row)?;
    let mut notes = Vec::new();
    for row in rows {
        notes.push(row?);
    }
    Ok(notes)
}

/// Versions of a note, newest first.
pub fn query_note_versions(note_id: NoteId, conn: &Connection) -> Result<Vec<NoteVersion>> {
    let mut stmt = conn.prepare(
        "SELECT id, note_id, title, content, starred, created FROM note_versions
         WHERE note_id = ?1 ORDER BY created DESC, id DESC",
    )?;
    let rows = stmt.query_map([note_id], |row| {
        Ok(NoteVersion {
            id: Some(row.get(0)?),
            note_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            starred: row.get(4)?,
            created: datetime_at(row, 5)?,
        })
    })?;
    let mut versions = Vec::new();
    for row in rows {
        versions.push(row?);
    }
    Ok(versions)
}
