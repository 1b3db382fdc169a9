/// Text export of log records, flat or grouped by job.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dates;
use crate::types::{Job, JobId, LogRecord};

const SHRED_SUFFIX: &str = " (SR&ED)";

/// Optional columns of the flat export. Each one needs `sync_columns` too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportColumns {
    #[serde(default)]
    pub sync_columns: bool,
    #[serde(default = "default_true")]
    pub show_index: bool,
    #[serde(default = "default_true")]
    pub show_timestamp: bool,
    #[serde(default = "default_true")]
    pub show_job_id: bool,
}

impl Default for ExportColumns {
    fn default() -> Self {
        ExportColumns {
            sync_columns: false,
            show_index: true,
            show_timestamp: true,
            show_job_id: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl ExportColumns {
    fn index(&self) -> bool {
        self.sync_columns && self.show_index
    }

    fn timestamp(&self) -> bool {
        self.sync_columns && self.show_timestamp
    }

    fn job_id(&self) -> bool {
        self.sync_columns && self.show_job_id
    }
}

pub fn export(records: &[LogRecord], columns: &ExportColumns, grouped: bool) -> String {
    if grouped {
        export_grouped(records)
    } else {
        export_flat(records, columns)
    }
}

fn job_column(job: &Job) -> String {
    let mut column = job.jid.to_string();
    if let Some(uri) = &job.uri {
        column.push_str(" - ");
        column.push_str(uri);
    }
    if job.shredable {
        column.push_str(SHRED_SUFFIX);
    }
    column
}

/// Masks every word the job's project bans. Matching ignores case and
/// surrounding punctuation; the mask keeps the word's length.
pub fn redact(message: &str, banned_words: &[String]) -> String {
    if banned_words.is_empty() {
        return message.to_string();
    }
    message
        .split(' ')
        .map(|token| {
            let core = token.trim_matches(|c: char| !c.is_alphanumeric());
            let banned = !core.is_empty()
                && banned_words
                    .iter()
                    .any(|word| word.to_lowercase() == core.to_lowercase());
            if banned {
                token.replacen(core, &"*".repeat(core.chars().count()), 1)
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One line per record in input order; ignored jobs are left out.
pub fn export_flat(records: &[LogRecord], columns: &ExportColumns) -> String {
    let mut buffer = String::new();
    // index counts every input record, skipped ones included
    for (i, record) in records.iter().enumerate() {
        if record.job.ignored {
            continue;
        }
        let mut parts: Vec<String> = Vec::with_capacity(4);
        if columns.index() {
            parts.push(i.to_string());
        }
        if columns.timestamp() {
            parts.push(dates::long_date(record.timestamp));
        }
        if columns.job_id() {
            parts.push(job_column(&record.job));
        }
        parts.push(redact(&record.message, &record.job.banned_words));
        buffer.push_str(&parts.join(" - "));
        buffer.push('\n');
    }
    buffer
}

/// One block per job, highest job id first, blank line after each block.
pub fn export_grouped(records: &[LogRecord]) -> String {
    let mut groups: BTreeMap<JobId, (&Job, Vec<String>)> = BTreeMap::new();
    for record in records.iter().filter(|r| !r.job.ignored) {
        groups
            .entry(record.job.jid)
            .or_insert_with(|| (&record.job, Vec::new()))
            .1
            .push(redact(&record.message, &record.job.banned_words));
    }

    let mut buffer = String::new();
    for (jid, (job, messages)) in groups.iter().rev() {
        match &job.uri {
            Some(uri) => buffer.push_str(&format!("{jid}: {uri}\n")),
            None => buffer.push_str(&format!("{jid}\n")),
        }
        for message in messages {
            buffer.push_str(&format!(" - {message}\n"));
        }
        buffer.push('\n');
    }
    buffer
}
