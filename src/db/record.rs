/// Log record queries.
use anyhow::Result;
use chrono::{DateTime, Local};
use rusqlite::{Connection, ToSql};

use crate::{
    dates,
    db::{datetime_at, job::JOB_COLUMNS, job::job_from_row, to_db_time},
    types::{JobId, LogRecord, RecordId, RecordQuery},
};

pub fn create_record(
    job_id: JobId,
    timestamp: DateTime<Local>,
    message: &str,
    conn: &Connection,
) -> Result<RecordId> {
    conn.execute(
        "INSERT INTO records (timestamp, message, job_id) VALUES (?1, ?2, ?3)",
        rusqlite::params![to_db_time(timestamp), message, job_id],
    )?;
    Ok(conn.last_insert_rowid() as RecordId)
}

fn filter(query: &RecordQuery) -> (&'static str, Vec<Box<dyn ToSql>>) {
    let (start, end) = match query {
        RecordQuery::InRange(start, end) => (*start, Some(*end)),
        RecordQuery::ForDate(date) => {
            let (start, end) = dates::start_and_end_of(*date);
            (start, Some(end))
        }
        RecordQuery::Recent(weeks) => (dates::days_past(i64::from(*weeks) * 7), None),
        RecordQuery::ByJob(jid) => {
            let params: Vec<Box<dyn ToSql>> = vec![Box::new(*jid)];
            return ("r.job_id = ?1", params);
        }
        RecordQuery::Containing(text) => {
            let params: Vec<Box<dyn ToSql>> = vec![Box::new(text.clone())];
            return ("instr(r.message, ?1) > 0", params);
        }
    };
    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(to_db_time(start))];
    match end {
        Some(end) => {
            params.push(Box::new(to_db_time(end)));
            ("r.timestamp >= ?1 AND r.timestamp <= ?2", params)
        }
        None => ("r.timestamp >= ?1", params),
    }
}

/// Distinct records matching `query`, oldest first.
pub fn query_records(query: RecordQuery, conn: &Connection) -> Result<Vec<LogRecord>> {
    let (clause, params) = filter(&query);
    let sql = format!(
        "SELECT DISTINCT r.id, r.timestamp, r.message, {JOB_COLUMNS}
         FROM records r JOIN jobs j ON j.jid = r.job_id
         WHERE {clause}
         ORDER BY r.timestamp ASC, r.id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
        |row| {
            Ok(LogRecord {
                id: Some(row.get(0)?),
                timestamp: datetime_at(row, 1)?,
                message: row.get(2)?,
                job: job_from_row(row, 3)?,
            })
        },
    )?;
    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

pub fn count_records(query: RecordQuery, conn: &Connection) -> Result<usize> {
    let (clause, params) = filter(&query);
    let sql = format!(
        "SELECT COUNT(*) FROM (SELECT DISTINCT r.id FROM records r WHERE {clause})"
    );
    let count: i64 = conn.query_row(
        &sql,
        rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

/// True when an identical line is already stored for the job.
pub fn record_exists(
    job_id: JobId,
    timestamp: DateTime<Local>,
    message: &str,
    conn: &Connection,
) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM records WHERE job_id = ?1 AND timestamp = ?2 AND message = ?3",
        rusqlite::params![job_id, to_db_time(timestamp), message],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
