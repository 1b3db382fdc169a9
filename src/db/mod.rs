/// Database module with record, job, project, note and task queries and migrations.
mod job;
mod migrations;
mod note;
mod project;
mod record;
mod task;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use rusqlite::{Connection, Row, types::Type};

// Re-export all public functions
pub use job::{
    check_job_exists, create_job, ensure_job, jobs_used_since, query_active_jobs, query_job,
    set_job_project, update_job_colour,
};
pub use note::{
    create_note, query_note, query_note_versions, query_notes_for_range, search_notes,
    update_note,
};
pub use project::{
    ban_word, create_project, ignore_job, query_project_by_name, query_project_configuration,
    query_projects, unban_word, unignore_job,
};
pub use record::{count_records, create_record, query_records, record_exists};
pub use task::{complete_task, create_task, query_incomplete_tasks};

/// Opens (or creates) the SQLite database and runs migrations.
pub fn init(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let conn = Connection::open(db_path)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// In-memory database with the full schema.
pub fn init_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Returns the default database path inside the user's data directory.
/// Falls back to `./daylog.db` when no data dir is found.
pub fn default_db_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("daylog").join("daylog.db")
    } else {
        PathBuf::from("daylog.db")
    }
}

/// Timestamps are stored as UTC RFC 3339 so range filters compare as text.
pub(crate) fn to_db_time(value: DateTime<Local>) -> String {
    value
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn datetime_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Local>> {
    let raw: String = row.get(idx)?;
    parse_db_time(&raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

pub(crate) fn optional_datetime_at(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Local>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        parse_db_time(&raw).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
        })
    })
    .transpose()
}

fn parse_db_time(raw: &str) -> Result<DateTime<Local>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Local))
}
