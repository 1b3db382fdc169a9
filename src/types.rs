use std::collections::BTreeSet;

use chrono::{DateTime, Local};

pub type RecordId = u32;
pub type JobId = u32;
pub type ProjectId = u32;
pub type NoteId = u32;
pub type NoteVersionId = u32;
pub type TaskId = u32;

/// A unit of trackable work, identified by a user chosen number.
#[derive(Clone, Debug, PartialEq)]
pub struct Job {
    pub jid: JobId,
    /// Stored color components: empty, RGB or RGBA.
    pub colour: Vec<f64>,
    pub uri: Option<String>,
    pub project_id: Option<ProjectId>,
    /// Set when the owning project's configuration ignores this job.
    pub ignored: bool,
    /// Words the owning project scrubs from exported text.
    pub banned_words: Vec<String>,
    pub shredable: bool,
    pub alive: bool,
}

impl Job {
    pub fn new(jid: JobId) -> Self {
        Self {
            jid,
            colour: Vec::new(),
            uri: None,
            project_id: None,
            ignored: false,
            banned_words: Vec::new(),
            shredable: false,
            alive: true,
        }
    }
}

///A single log line, always attributed to exactly one job
#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    pub id: Option<RecordId>,
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub job: Job,
}

pub enum RecordQuery {
    InRange(DateTime<Local>, DateTime<Local>),
    ForDate(DateTime<Local>),
    Recent(u32),
    ByJob(JobId),
    /// Message contains the text, case-sensitive.
    Containing(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    pub id: Option<ProjectId>,
    pub name: String,
    pub alive: bool,
    pub created_at: DateTime<Local>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectConfiguration {
    pub project_id: ProjectId,
    pub ignored_jobs: BTreeSet<JobId>,
    pub banned_words: BTreeSet<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub id: Option<NoteId>,
    pub job_id: Option<JobId>,
    pub title: String,
    pub body: String,
    pub starred: bool,
    pub alive: bool,
    pub posted_date: DateTime<Local>,
    pub last_update: DateTime<Local>,
}

/// Immutable snapshot of a note, appended on every create or edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteVersion {
    pub id: Option<NoteVersionId>,
    pub note_id: NoteId,
    pub title: String,
    pub content: String,
    pub starred: bool,
    pub created: DateTime<Local>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub id: Option<TaskId>,
    pub job_id: JobId,
    pub content: String,
    pub created: DateTime<Local>,
    pub completed_date: Option<DateTime<Local>>,
}
