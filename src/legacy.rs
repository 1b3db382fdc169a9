/// The plain-text `Daily.log` format that predates the database.
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

use crate::types::JobId;

// Data rows look like `2024-01-02 19:08 - 11 - message`. Each day starts
// with a three row separator: a `===` rule, the date, and another rule.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const COLUMN_SEPARATOR: &str = " - ";
const RULE: &str = "==================================================";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyLine {
    pub timestamp: DateTime<Local>,
    pub jid: JobId,
    pub message: String,
}

/// Parses a data row. Separator rows and anything malformed yield `None`.
pub fn parse_line(line: &str) -> Option<LegacyLine> {
    let mut parts = line.splitn(3, COLUMN_SEPARATOR);
    let timestamp = parts.next()?.trim();
    let jid = parts.next()?.trim().parse::<JobId>().ok()?;
    let message = parts.next()?.trim_end().to_string();
    let naive = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
    let timestamp = Local.from_local_datetime(&naive).earliest()?;
    Some(LegacyLine {
        timestamp,
        jid,
        message,
    })
}

pub fn parse(text: &str) -> Vec<LegacyLine> {
    text.lines().filter_map(parse_line).collect()
}

pub fn read_file(path: &std::path::Path) -> Result<Vec<LegacyLine>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading legacy log {}", path.display()))?;
    Ok(parse(&text))
}

/// Lines at or after `cutoff`.
pub fn since(lines: Vec<LegacyLine>, cutoff: DateTime<Local>) -> Vec<LegacyLine> {
    lines.into_iter().filter(|l| l.timestamp >= cutoff).collect()
}

pub fn format_line(line: &LegacyLine) -> String {
    format!(
        "{}{COLUMN_SEPARATOR}{}{COLUMN_SEPARATOR}{}",
        line.timestamp.format(TIMESTAMP_FORMAT),
        line.jid,
        line.message
    )
}

/// A day block: separator rows followed by one row per line.
pub fn format_day(day: NaiveDate, lines: &[LegacyLine]) -> String {
    let mut out = format!("{RULE}\n{}\n{RULE}\n", day.format("%Y-%m-%d"));
    for line in lines {
        out.push_str(&format_line(line));
        out.push('\n');
    }
    out
}
