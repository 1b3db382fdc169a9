/// Word and job counts over record sets, and the periodic stats built on them.
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Local};

use crate::dates;
use crate::store::RecordRepository;
use crate::types::{JobId, LogRecord};

/// Number of distinct whitespace separated words across all messages.
pub fn word_count(records: &[LogRecord]) -> usize {
    records
        .iter()
        .flat_map(|record| record.message.split_whitespace())
        .collect::<HashSet<&str>>()
        .len()
}

pub fn job_count(records: &[LogRecord]) -> usize {
    records
        .iter()
        .map(|record| record.job.jid)
        .collect::<HashSet<JobId>>()
        .len()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub words: usize,
    pub jobs: usize,
    pub records: usize,
}

impl Stats {
    pub fn from_records(records: &[LogRecord]) -> Self {
        Self {
            words: word_count(records),
            jobs: job_count(records),
            records: records.len(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeriodStats {
    pub week: Stats,
    pub month: Stats,
    pub year: Stats,
}

/// Fetches on a blocking task so the store lock never sits on the async
/// executor, then aggregates after the lock is released.
async fn stats_between<R: RecordRepository + 'static>(
    repo: Arc<R>,
    start: DateTime<Local>,
    end: DateTime<Local>,
) -> Stats {
    let fetched = tokio::task::spawn_blocking(move || repo.records_in_range(start, end)).await;
    match fetched {
        Ok(records) => Stats::from_records(&records),
        Err(error) => {
            tracing::error!(error = %error, "stats query task failed");
            Stats::default()
        }
    }
}

/// Records of the last week.
pub async fn weekly_stats<R: RecordRepository + 'static>(repo: Arc<R>, now: DateTime<Local>) -> Stats {
    stats_between(repo, dates::days_past_from(now, 7), now).await
}

/// Records of the calendar month containing `now`.
pub async fn monthly_stats<R: RecordRepository + 'static>(repo: Arc<R>, now: DateTime<Local>) -> Stats {
    let (start, end) = dates::month_or_default(now);
    stats_between(repo, start, end).await
}

/// Calendar week of the year, 1 for January 1st through 7th.
fn week_of_year(now: DateTime<Local>) -> i64 {
    i64::from(now.ordinal0() / 7 + 1)
}

/// Records of as many weeks back as the current week of the year.
pub async fn yearly_stats<R: RecordRepository + 'static>(repo: Arc<R>, now: DateTime<Local>) -> Stats {
    let weeks = week_of_year(now);
    stats_between(repo, dates::days_past_from(now, weeks * 7), now).await
}

pub async fn all_stats<R: RecordRepository + 'static>(repo: Arc<R>, now: DateTime<Local>) -> PeriodStats {
    let (week, month, year) = tokio::join!(
        weekly_stats(Arc::clone(&repo), now),
        monthly_stats(Arc::clone(&repo), now),
        yearly_stats(repo, now),
    );
    PeriodStats { week, month, year }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::types::Job;
    use chrono::{Duration, TimeZone};

    fn record(jid: JobId, message: &str) -> LogRecord {
        LogRecord {
            id: None,
            timestamp: Local::now(),
            message: message.to_string(),
            job: Job::new(jid),
        }
    }

    #[test]
    fn words_are_counted_once_across_records() {
        let records = vec![record(5, "fix bug"), record(5, "fix bug again")];
        assert_eq!(word_count(&records), 3);
        assert_eq!(job_count(&records), 1);
        assert_eq!(word_count(&[record(1, "a  a\tb\nc")]), 3);
        assert_eq!(word_count(&[]), 0);
    }

    #[test]
    fn word_count_ignores_order_and_duplicates() {
        let records = vec![
            record(1, "deploy service"),
            record(2, "review pull request"),
            record(3, "service review"),
        ];
        let expected = word_count(&records);

        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(word_count(&reversed), expected);

        let mut doubled = records.clone();
        doubled.push(records[1].clone());
        assert_eq!(word_count(&doubled), expected);
        assert_eq!(job_count(&doubled), 3);
    }

    #[tokio::test]
    async fn period_stats_count_records_in_each_window() {
        let store = Arc::new(Store::in_memory().unwrap());
        let now = Local.with_ymd_and_hms(2024, 3, 20, 15, 0, 0).unwrap();
        let seed = [
            (1, now - Duration::hours(2), "standup notes"),
            (2, now - Duration::days(3), "fix login"),
            (2, now - Duration::days(12), "fix signup"),
            (3, now - Duration::days(40), "quarterly planning"),
        ];
        for (jid, at, message) in seed {
            store
                .with_conn(|conn| crate::db::ensure_job(jid, conn).map(|_| ()))
                .unwrap();
            store.create_record(&Job::new(jid), at, message).unwrap();
        }

        let stats = all_stats(Arc::clone(&store), now).await;
        assert_eq!(stats.week, Stats { words: 4, jobs: 2, records: 2 });
        assert_eq!(stats.month, Stats { words: 5, jobs: 2, records: 3 });
        assert_eq!(stats.year.records, 4);
        assert_eq!(stats.year.jobs, 3);
    }

    #[test]
    fn week_of_year_starts_at_one_on_new_year() {
        let at = |y, m, d| Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
        assert_eq!(week_of_year(at(2027, 1, 1)), 1);
        assert_eq!(week_of_year(at(2027, 1, 7)), 1);
        assert_eq!(week_of_year(at(2027, 1, 8)), 2);
        assert_eq!(week_of_year(at(2026, 12, 31)), 53);
    }

    #[tokio::test]
    async fn january_year_window_stays_near_new_year() {
        let store = Arc::new(Store::in_memory().unwrap());
        store
            .with_conn(|conn| crate::db::ensure_job(1, conn).map(|_| ()))
            .unwrap();
        let now = Local.with_ymd_and_hms(2027, 1, 1, 12, 0, 0).unwrap();
        store
            .create_record(&Job::new(1), Local.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(), "old")
            .unwrap();
        assert_eq!(yearly_stats(Arc::clone(&store), now).await.records, 0);

        store
            .create_record(&Job::new(1), now - Duration::days(2), "recent")
            .unwrap();
        assert_eq!(yearly_stats(store, now).await.records, 1);
    }
}
