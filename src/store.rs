/// Shared record store: one connection behind a lock, silent-failure reads.
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, Local};
use rusqlite::Connection;

use crate::dates;
use crate::db;
use crate::types::{Job, JobId, LogRecord, Note, NoteId, NoteVersion, RecordQuery, Task};

/// Read access to log records independent of the storage engine.
pub trait RecordRepository: Send + Sync {
    /// Distinct records with `start <= timestamp <= end`, oldest first.
    fn records_in_range(&self, start: DateTime<Local>, end: DateTime<Local>) -> Vec<LogRecord>;

    fn count_in_range(&self, start: DateTime<Local>, end: DateTime<Local>) -> usize;

    /// Alive jobs, highest id first.
    fn list_active_jobs(&self) -> Vec<Job>;
}

/// Maps a search term onto a record query. `today`, `yesterday` and
/// `YYYY-MM-DD` select a whole day, anything else is a message substring.
/// Blank terms select nothing.
pub fn record_search(term: &str, today: DateTime<Local>) -> Option<RecordQuery> {
    let term = term.trim();
    let query = match term {
        "" => return None,
        "today" => RecordQuery::ForDate(today),
        "yesterday" => RecordQuery::ForDate(today - Duration::days(1)),
        _ => match dates::parse_short_date(term) {
            Some(day) => RecordQuery::ForDate(day),
            None => RecordQuery::Containing(term.to_string()),
        },
    };
    Some(query)
}

pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_connection(db::init(path)?))
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self::from_connection(db::init_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database mutex poisoned"))
    }

    /// Runs `f` with the connection locked. The lock is released on return.
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Read that logs failures and yields `T::default()` instead.
    fn read_or_default<T: Default>(
        &self,
        what: &str,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> T {
        match self.with_conn(f) {
            Ok(value) => value,
            Err(error) => {
                tracing::error!(query = what, error = %error, "store query failed");
                T::default()
            }
        }
    }

    pub fn query(&self, query: RecordQuery) -> Vec<LogRecord> {
        self.read_or_default("records", |conn| db::query_records(query, conn))
    }

    pub fn count(&self, query: RecordQuery) -> usize {
        self.read_or_default("count", |conn| db::count_records(query, conn))
    }

    /// Records since midnight `weeks` weeks ago.
    pub fn recent(&self, weeks: u32) -> Vec<LogRecord> {
        self.query(RecordQuery::Recent(weeks))
    }

    pub fn for_date(&self, date: DateTime<Local>) -> Vec<LogRecord> {
        self.query(RecordQuery::ForDate(date))
    }

    pub fn count_for_date(&self, date: Option<DateTime<Local>>) -> usize {
        match date {
            Some(date) => self.count(RecordQuery::ForDate(date)),
            None => 0,
        }
    }

    pub fn records_for_job(&self, jid: JobId) -> Vec<LogRecord> {
        self.query(RecordQuery::ByJob(jid))
    }

    pub fn search_records(&self, term: &str) -> Vec<LogRecord> {
        match record_search(term, Local::now()) {
            Some(query) => self.query(query),
            None => Vec::new(),
        }
    }

    pub fn search_notes(&self, term: &str) -> Vec<Note> {
        self.read_or_default("search_notes", |conn| db::search_notes(term, conn))
    }

    pub fn jobs_used_since(&self, cutoff: DateTime<Local>) -> Vec<Job> {
        self.read_or_default("jobs_used_since", |conn| db::jobs_used_since(cutoff, conn))
    }

    /// Active jobs without ignored ones, optionally only those used in the
    /// last `recent_weeks` weeks.
    pub fn picker_jobs(&self, recent_weeks: Option<u32>) -> Vec<Job> {
        let jobs = match recent_weeks {
            Some(weeks) => {
                let cutoff = dates::days_past(i64::from(weeks) * 7);
                self.jobs_used_since(cutoff)
                    .into_iter()
                    .filter(|job| job.alive)
                    .collect()
            }
            None => self.list_active_jobs(),
        };
        jobs.into_iter().filter(|job| !job.ignored).collect()
    }

    pub fn notes_for_date(&self, date: DateTime<Local>) -> Vec<Note> {
        let (start, end) = dates::start_and_end_of(date);
        self.read_or_default("notes", |conn| db::query_notes_for_range(start, end, conn))
    }

    pub fn note_versions(&self, note_id: NoteId) -> Vec<NoteVersion> {
        self.read_or_default("note_versions", |conn| db::query_note_versions(note_id, conn))
    }

    pub fn incomplete_tasks(&self, jid: JobId) -> Vec<Task> {
        self.read_or_default("tasks", |conn| db::query_incomplete_tasks(jid, conn))
    }

    /// Saves a record for `job`. A failed save is retried once; if that
    /// fails too the error is logged and `None` returned.
    pub fn create_record(
        &self,
        job: &Job,
        timestamp: DateTime<Local>,
        message: &str,
    ) -> Option<LogRecord> {
        let save = || self.with_conn(|conn| db::create_record(job.jid, timestamp, message, conn));
        let id = match save() {
            Ok(id) => id,
            Err(first) => {
                tracing::warn!(jid = job.jid, error = %first, "record save failed, retrying");
                match save() {
                    Ok(id) => id,
                    Err(error) => {
                        tracing::error!(jid = job.jid, error = %error, "record save failed");
                        return None;
                    }
                }
            }
        };
        Some(LogRecord {
            id: Some(id),
            timestamp,
            message: message.to_string(),
            job: job.clone(),
        })
    }
}

impl RecordRepository for Store {
    fn records_in_range(&self, start: DateTime<Local>, end: DateTime<Local>) -> Vec<LogRecord> {
        self.query(RecordQuery::InRange(start, end))
    }

    fn count_in_range(&self, start: DateTime<Local>, end: DateTime<Local>) -> usize {
        self.count(RecordQuery::InRange(start, end))
    }

    fn list_active_jobs(&self) -> Vec<Job> {
        self.read_or_default("active_jobs", db::query_active_jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn store_with_jobs(jids: &[JobId]) -> Store {
        let store = Store::in_memory().unwrap();
        store
            .with_conn(|conn| {
                for jid in jids {
                    db::ensure_job(*jid, conn)?;
                }
                Ok(())
            })
            .unwrap();
        store
    }

    #[test]
    fn failed_queries_return_empty_results() {
        let store = Store::in_memory().unwrap();
        store
            .with_conn(|conn| {
                conn.execute_batch("DROP TABLE records;")?;
                Ok(())
            })
            .unwrap();
        let now = Local::now();
        assert!(store.records_in_range(now - Duration::days(1), now).is_empty());
        assert_eq!(store.count_in_range(now - Duration::days(1), now), 0);
    }

    #[test]
    fn count_for_missing_date_is_zero() {
        let store = store_with_jobs(&[1]);
        let now = Local::now();
        store.create_record(&Job::new(1), now, "hello").unwrap();
        assert_eq!(store.count_for_date(None), 0);
        assert_eq!(store.count_for_date(Some(now)), 1);
        assert_eq!(store.for_date(now).len(), 1);
        assert_eq!(store.recent(1).len(), 1);
        assert_eq!(store.records_for_job(1).len(), 1);
    }

    #[test]
    fn search_terms_select_days_or_substrings() {
        let today = Local.with_ymd_and_hms(2024, 6, 12, 14, 0, 0).unwrap();
        assert!(record_search("  ", today).is_none());
        assert!(matches!(record_search("today", today), Some(RecordQuery::ForDate(d)) if d == today));
        match record_search("yesterday", today) {
            Some(RecordQuery::ForDate(d)) => assert_eq!(dates::short_date(d), "2024-06-11"),
            _ => panic!("expected a day query"),
        }
        match record_search("2024-01-31", today) {
            Some(RecordQuery::ForDate(d)) => assert_eq!(dates::short_date(d), "2024-01-31"),
            _ => panic!("expected a day query"),
        }
        assert!(matches!(
            record_search(" release ", today),
            Some(RecordQuery::Containing(text)) if text == "release"
        ));
    }

    #[test]
    fn search_records_finds_todays_lines() {
        let store = store_with_jobs(&[1]);
        let now = Local::now();
        store.create_record(&Job::new(1), now, "cut release").unwrap();
        store
            .create_record(&Job::new(1), now - Duration::days(3), "plan release")
            .unwrap();
        assert_eq!(store.search_records("release").len(), 2);
        let today: Vec<String> = store
            .search_records("today")
            .into_iter()
            .map(|r| r.message)
            .collect();
        assert_eq!(today, vec!["cut release"]);
        assert!(store.search_records("").is_empty());
    }

    #[test]
    fn failed_save_returns_none() {
        let store = Store::in_memory().unwrap();
        assert!(store.create_record(&Job::new(77), Local::now(), "no such job").is_none());
    }

    #[test]
    fn picker_skips_ignored_and_unused_jobs() {
        let store = store_with_jobs(&[1, 2, 3]);
        store
            .with_conn(|conn| {
                let project = db::create_project("client", conn)?;
                conn.execute("UPDATE jobs SET project_id = ?1 WHERE jid = 2", [project])?;
                db::ignore_job(project, 2, conn)?;
                Ok(())
            })
            .unwrap();
        let now = Local::now();
        store.create_record(&Job::new(1), now, "used").unwrap();
        store.create_record(&Job::new(2), now, "used but ignored").unwrap();

        let all: Vec<JobId> = store.picker_jobs(None).iter().map(|j| j.jid).collect();
        assert_eq!(all, vec![3, 1]);
        let recent: Vec<JobId> = store.picker_jobs(Some(2)).iter().map(|j| j.jid).collect();
        assert_eq!(recent, vec![1]);
    }

    #[test]
    fn concurrent_queries_share_one_handle() {
        let store = Arc::new(store_with_jobs(&[4]));
        let base = Local.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap();
        for i in 0..20 {
            store
                .create_record(&Job::new(4), base + Duration::minutes(i), "tick")
                .unwrap();
        }

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.records_in_range(base, base + Duration::hours(1)).len()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 20);
        }
    }
}
