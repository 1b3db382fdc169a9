/// Job-related database queries.
use anyhow::Result;
use chrono::{DateTime, Local};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::color;
use crate::db::to_db_time;
use crate::types::{Job, JobId, ProjectId};

/// Job columns plus the ignore flag and banned words from the owning
/// project's configuration. Banned words come back newline separated.
pub(crate) const JOB_COLUMNS: &str = "j.jid, j.colour, j.uri, j.project_id, j.shredable, j.alive,
    EXISTS(SELECT 1 FROM ignored_jobs i WHERE i.project_id = j.project_id AND i.job_id = j.jid),
    (SELECT group_concat(b.word, char(10)) FROM banned_words b WHERE b.project_id = j.project_id)";

pub(crate) fn job_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Job> {
    let colour: String = row.get(offset + 1)?;
    let banned: Option<String> = row.get(offset + 7)?;
    let mut banned_words: Vec<String> = banned
        .map(|words| words.lines().map(str::to_string).collect())
        .unwrap_or_default();
    banned_words.sort();
    Ok(Job {
        jid: row.get(offset)?,
        colour: color::parse_stored(&colour),
        uri: row.get(offset + 2)?,
        project_id: row.get(offset + 3)?,
        shredable: row.get(offset + 4)?,
        alive: row.get(offset + 5)?,
        ignored: row.get(offset + 6)?,
        banned_words,
    })
}

pub fn create_job(job: &Job, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO jobs (jid, colour, uri, project_id, shredable, alive)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            job.jid,
            color::format_stored(&job.colour),
            job.uri,
            job.project_id,
            job.shredable,
            job.alive,
        ],
    )?;
    Ok(())
}

/// Creates a bare job when `jid` is unknown.
pub fn ensure_job(jid: JobId, conn: &Connection) -> Result<Job> {
    if let Some(job) = query_job(jid, conn)? {
        return Ok(job);
    }
    let job = Job::new(jid);
    create_job(&job, conn)?;
    Ok(job)
}

pub fn check_job_exists(jid: JobId, conn: &Connection) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT COUNT(*) FROM jobs WHERE jid = ?1")?;
    let count: i64 = stmt.query_row([jid], |row| row.get(0))?;
    Ok(count > 0)
}

pub fn query_job(jid: JobId, conn: &Connection) -> Result<Option<Job>> {
    let sql = format!("SELECT {JOB_COLUMNS} FROM jobs j WHERE j.jid = ?1");
    let job = conn
        .query_row(&sql, [jid], |row| job_from_row(row, 0))
        .optional()?;
    Ok(job)
}

/// Alive jobs, highest id first.
pub fn query_active_jobs(conn: &Connection) -> Result<Vec<Job>> {
    let sql = format!("SELECT {JOB_COLUMNS} FROM jobs j WHERE j.alive = 1 ORDER BY j.jid DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| job_from_row(row, 0))?;
    let mut jobs = Vec::new();
    for row in rows {
        jobs.push(row?);
    }
    Ok(jobs)
}

/// Jobs with at least one record at or after `cutoff`, highest id first.
pub fn jobs_used_since(cutoff: DateTime<Local>, conn: &Connection) -> Result<Vec<Job>> {
    let sql = format!(
        "SELECT {JOB_COLUMNS} FROM jobs j
         WHERE EXISTS(SELECT 1 FROM records r WHERE r.job_id = j.jid AND r.timestamp >= ?1)
         ORDER BY j.jid DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([to_db_time(cutoff)], |row| job_from_row(row, 0))?;
    let mut jobs = Vec::new();
    for row in rows {
        jobs.push(row?);
    }
    Ok(jobs)
}

/// Moves the job into `project_id`, or out of any project with `None`.
pub fn set_job_project(
    jid: JobId,
    project_id: Option<ProjectId>,
    conn: &Connection,
) -> Result<bool> {
    let count = conn.execute(
        "UPDATE jobs SET project_id = ?1 WHERE jid = ?2",
        rusqlite::params![project_id, jid],
    )?;
    Ok(count > 0)
}

pub fn update_job_colour(jid: JobId, colour: &[f64], conn: &Connection) -> Result<bool> {
    let count = conn.execute(
        "UPDATE jobs SET colour = ?1 WHERE jid = ?2",
        rusqlite::params![color::format_stored(colour), jid],
    )?;
    Ok(count > 0)
}
