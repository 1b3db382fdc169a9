/// Day, week and month boundaries relative to a reference instant.
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone};

pub const SHORT_FORMAT: &str = "%Y-%m-%d";
pub const LONG_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Window used when month arithmetic fails.
const DEFAULT_WINDOW_WEEKS: i64 = 4;

/// Local midnight of the calendar day containing `date`.
pub fn start_of_day(date: DateTime<Local>) -> DateTime<Local> {
    local_midnight(date.date_naive())
        .unwrap_or_else(|| date - (date.time() - NaiveTime::MIN))
}

/// Midnight of `date` and the last second of the same day.
pub fn start_and_end_of(date: DateTime<Local>) -> (DateTime<Local>, DateTime<Local>) {
    let start = start_of_day(date);
    (start, start + Duration::days(1) - Duration::seconds(1))
}

pub fn days_around(date: DateTime<Local>) -> (DateTime<Local>, DateTime<Local>) {
    (date - Duration::days(1), date + Duration::days(1))
}

pub fn week_before(date: DateTime<Local>) -> (DateTime<Local>, DateTime<Local>) {
    let start = start_of_day(date);
    (start - Duration::days(7), start)
}

pub fn week_after(date: DateTime<Local>) -> (DateTime<Local>, DateTime<Local>) {
    let start = start_of_day(date);
    (start, start + Duration::days(7))
}

pub fn week_around(date: DateTime<Local>) -> (DateTime<Local>, DateTime<Local>) {
    let start = start_of_day(date);
    (start - Duration::days(7), start + Duration::days(7))
}

/// Midnight `num_days` before now.
pub fn days_past(num_days: i64) -> DateTime<Local> {
    days_past_from(Local::now(), num_days)
}

pub fn days_past_from(now: DateTime<Local>, num_days: i64) -> DateTime<Local> {
    start_of_day(now - Duration::days(num_days))
}

/// First day of the month at 00:00:00 to the last day at 23:59:59.
pub fn start_and_end_of_month(
    date: DateTime<Local>,
) -> Option<(DateTime<Local>, DateTime<Local>)> {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?;
    let next_month = first.checked_add_months(chrono::Months::new(1))?;
    let last = next_month.pred_opt()?;
    let start = local_midnight(first)?;
    let end = Local
        .from_local_datetime(&last.and_hms_opt(23, 59, 59)?)
        .earliest()?;
    Some((start, end))
}

/// The current month window, or the last four weeks when the calendar
/// computation fails.
pub fn month_or_default(date: DateTime<Local>) -> (DateTime<Local>, DateTime<Local>) {
    start_and_end_of_month(date).unwrap_or_else(|| {
        tracing::debug!(%date, "month bounds unavailable, using default window");
        (days_past_from(date, DEFAULT_WINDOW_WEEKS * 7), date)
    })
}

/// Formatted dates for today and each of the `num_days` days before it.
pub fn dates_before_today(num_days: u32, format: &str) -> Vec<String> {
    dates_before(Local::now(), num_days, format)
}

pub fn dates_before(date: DateTime<Local>, num_days: u32, format: &str) -> Vec<String> {
    (0..=num_days)
        .filter_map(|i| date.checked_sub_signed(Duration::days(i64::from(i))))
        .map(|day| day.format(format).to_string())
        .collect()
}

pub fn short_date(date: DateTime<Local>) -> String {
    date.format(SHORT_FORMAT).to_string()
}

pub fn long_date(date: DateTime<Local>) -> String {
    date.format(LONG_FORMAT).to_string()
}

/// Parses `YYYY-MM-DD` into local midnight of that day.
pub fn parse_short_date(value: &str) -> Option<DateTime<Local>> {
    let day = NaiveDate::parse_from_str(value.trim(), SHORT_FORMAT).ok()?;
    local_midnight(day)
}

fn local_midnight(day: NaiveDate) -> Option<DateTime<Local>> {
    Local.from_local_datetime(&day.and_time(NaiveTime::MIN)).earliest()
}
