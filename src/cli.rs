/// CLI argument parsing and command handling.
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};

use crate::aggregate::{self, Stats};
use crate::color::{self, ColorAssigner, Rgba};
use crate::config::Config;
use crate::store::{RecordRepository, Store};
use crate::types::{Job, JobId, LogRecord, Note, NoteId, ProjectId, Task, TaskId};
use crate::{dates, db, export, legacy};

#[derive(Parser)]
#[command(
    name = "daylog",
    version,
    about = "daylog - A work log, note and task tracker"
)]
pub struct Cli {
    /// Config file, defaults to the user config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a log line for a job
    Log {
        job: JobId,
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
        /// RFC 3339 timestamp, defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Show the records of one day
    Today {
        /// Day to show (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Print records as exportable text
    Export {
        #[arg(long, conflicts_with_all = ["start", "end", "recent"])]
        date: Option<String>,
        /// The seven days before the date plus the date itself
        #[arg(long, conflicts_with_all = ["start", "end", "recent"])]
        week: bool,
        #[arg(long, requires = "end")]
        start: Option<String>,
        #[arg(long, requires = "start")]
        end: Option<String>,
        /// Records of the last N weeks
        #[arg(long, conflicts_with_all = ["start", "end"])]
        recent: Option<u32>,
        #[arg(short, long)]
        grouped: bool,
    },
    /// Find records by message text, or by `today`, `yesterday` or YYYY-MM-DD
    Search {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
        /// Search notes by job id prefix or job URI instead
        #[arg(long)]
        notes: bool,
    },
    /// Word, job and record counts for this week, month and year
    Stats,
    /// Record counts for each of the last N days
    Days {
        #[arg(default_value_t = 7)]
        num: u32,
    },
    /// Row colors for the records of one day
    Colours {
        #[arg(long)]
        date: Option<String>,
    },
    Job {
        #[command(subcommand)]
        command: JobCommand,
    },
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    Note {
        #[command(subcommand)]
        command: NoteCommand,
    },
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Import a plain-text Daily.log file. Lines already stored are skipped
    Import {
        path: PathBuf,
        /// Only lines on or after this day (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum JobCommand {
    Add {
        jid: JobId,
        #[arg(long)]
        uri: Option<String>,
        #[arg(long)]
        project: Option<String>,
        /// Hex color like #RRGGBB, random when omitted
        #[arg(long)]
        colour: Option<String>,
        #[arg(long)]
        shredable: bool,
    },
    List {
        /// Only jobs used in the configured recent window
        #[arg(long)]
        recent: bool,
    },
    Colour {
        jid: JobId,
        colour: Option<String>,
    },
    /// Attach a job to a project, or detach it when no project is given
    Project {
        jid: JobId,
        project: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    Add { name: String },
    List,
    Ignore { project: String, jid: JobId },
    Unignore { project: String, jid: JobId },
    /// Mask a word in exports of the project's jobs
    Ban { project: String, word: String },
    Unban { project: String, word: String },
}

#[derive(Subcommand, Debug)]
pub enum NoteCommand {
    Add {
        title: String,
        body: String,
        #[arg(long)]
        job: Option<JobId>,
        #[arg(long)]
        starred: bool,
    },
    Edit {
        id: NoteId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        starred: Option<bool>,
    },
    Today {
        #[arg(long)]
        date: Option<String>,
    },
    Versions { id: NoteId },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    Add { jid: JobId, content: String },
    Done { id: TaskId },
    List { jid: JobId },
}

/// Execute a CLI command against the store.
pub fn run(command: Command, store: Arc<Store>, config: &Config) -> Result<()> {
    match command {
        Command::Log { job, message, at } => handle_log(job, message.join(" "), at, &store)?,
        Command::Today { date } => handle_today(parse_day(date)?, &store),
        Command::Export {
            date,
            week,
            start,
            end,
            recent,
            grouped,
        } => {
            let range = ExportRange::from_args(date, week, start, end, recent)?;
            handle_export(range, grouped, &store, config);
        }
        Command::Search { term, notes } => handle_search(&term.join(" "), notes, &store),
        Command::Stats => handle_stats(store)?,
        Command::Days { num } => handle_days(num, &store),
        Command::Colours { date } => handle_colours(parse_day(date)?, &store),
        Command::Job { command } => handle_job(command, &store, config)?,
        Command::Project { command } => handle_project(command, &store)?,
        Command::Note { command } => handle_note(command, &store)?,
        Command::Task { command } => handle_task(command, &store)?,
        Command::Import { path, since } => handle_import(path, since, &store)?,
    }
    Ok(())
}

fn handle_log(jid: JobId, message: String, at: Option<String>, store: &Store) -> Result<()> {
    if message.trim().is_empty() {
        println!("Empty message, nothing recorded.");
        return Ok(());
    }
    let timestamp = parse_optional_datetime(at)?.unwrap_or_else(Local::now);
    let job = store.with_conn(|conn| db::ensure_job(jid, conn))?;
    match store.create_record(&job, timestamp, &message) {
        Some(_) => println!("Recorded for job {jid}."),
        None => println!("Could not save the record, see the log for details."),
    }
    Ok(())
}

fn handle_today(date: DateTime<Local>, store: &Store) {
    let records = store.for_date(date);
    if records.is_empty() {
        println!("No records for {}.", dates::short_date(date));
        return;
    }
    for (i, record) in records.iter().enumerate() {
        println!(
            "{i:>3}  {}  {:>6}  {}",
            record.timestamp.format("%H:%M"),
            record.job.jid,
            record.message
        );
    }
    let stats = Stats::from_records(&records);
    println!(
        "\n{} records, {} jobs, {} words",
        stats.records, stats.jobs, stats.words
    );
}

enum ExportRange {
    Day(DateTime<Local>),
    WeekBefore(DateTime<Local>),
    Between(DateTime<Local>, DateTime<Local>),
    RecentWeeks(u32),
}

impl ExportRange {
    fn from_args(
        date: Option<String>,
        week: bool,
        start: Option<String>,
        end: Option<String>,
        recent: Option<u32>,
    ) -> Result<Self> {
        let range = match (start, end, recent) {
            (Some(start), Some(end), _) => {
                let (_, end) = dates::start_and_end_of(parse_short(&end)?);
                ExportRange::Between(parse_short(&start)?, end)
            }
            (_, _, Some(weeks)) => ExportRange::RecentWeeks(weeks),
            _ if week => ExportRange::WeekBefore(parse_day(date)?),
            _ => ExportRange::Day(parse_day(date)?),
        };
        Ok(range)
    }
}

fn handle_export(range: ExportRange, grouped: bool, store: &Store, config: &Config) {
    let records = match range {
        ExportRange::Day(date) => store.for_date(date),
        ExportRange::WeekBefore(date) => {
            let (start, _) = dates::week_before(date);
            let (_, end) = dates::start_and_end_of(date);
            store.records_in_range(start, end)
        }
        ExportRange::Between(start, end) => store.records_in_range(start, end),
        ExportRange::RecentWeeks(weeks) => store.recent(weeks),
    };
    print!("{}", export::export(&records, &config.export, grouped));
}

fn handle_search(term: &str, notes: bool, store: &Store) {
    if notes {
        for note in store.search_notes(term) {
            let job = note.job_id.map(|jid| jid.to_string()).unwrap_or_default();
            println!(
                "#{:<4} {:>6}  {}  ({})",
                note.id.unwrap_or_default(),
                job,
                note.title,
                dates::short_date(note.posted_date)
            );
        }
        return;
    }
    for record in store.search_records(term) {
        println!(
            "{}  {:>6}  {}",
            dates::long_date(record.timestamp),
            record.job.jid,
            record.message
        );
    }
}

fn handle_stats(store: Arc<Store>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let stats = runtime.block_on(aggregate::all_stats(store, Local::now()));
    for (label, period) in [
        ("Week", stats.week),
        ("Month", stats.month),
        ("Year", stats.year),
    ] {
        println!(
            "{label:<6} {:>6} words {:>4} jobs {:>6} records",
            period.words, period.jobs, period.records
        );
    }
    Ok(())
}

fn handle_days(num: u32, store: &Store) {
    for day in dates::dates_before_today(num, dates::SHORT_FORMAT) {
        let count = store.count_for_date(dates::parse_short_date(&day));
        println!("{day}  {count}");
    }
}

fn handle_colours(date: DateTime<Local>, store: &Store) {
    let records = store.for_date(date);
    let jobs = unique_jobs(&records);
    let jids: Vec<JobId> = jobs.iter().map(|job| job.jid).collect();
    let mut rng = rand::rng();
    let mut assigner = ColorAssigner::new(&jids, &mut rng);
    for job in jobs {
        let background = assigner.colour_for(job.jid, &job.colour, &mut rng);
        println!(
            "{:>6}  background {}  text {}",
            job.jid,
            background.to_hex(),
            background.foreground().to_hex()
        );
    }
}

/// Jobs in first-seen order.
fn unique_jobs(records: &[LogRecord]) -> Vec<Job> {
    let mut seen = HashSet::new();
    let mut jobs = Vec::new();
    for record in records {
        if seen.insert(record.job.jid) {
            jobs.push(record.job.clone());
        }
    }
    jobs
}

fn handle_job(command: JobCommand, store: &Store, config: &Config) -> Result<()> {
    match command {
        JobCommand::Add {
            jid,
            uri,
            project,
            colour,
            shredable,
        } => {
            let colour = parse_colour(colour)?;
            store.with_conn(|conn| {
                if db::check_job_exists(jid, conn)? {
                    println!("Job {jid} already exists.");
                    if let Some(name) = project {
                        println!("Use `daylog job project {jid} {name}` to move it.");
                    }
                    return Ok(());
                }
                let project_id = match project {
                    Some(name) => Some(find_project(&name, conn)?),
                    None => None,
                };
                db::create_job(
                    &Job {
                        jid,
                        colour: colour.to_stored(),
                        uri,
                        project_id,
                        ignored: false,
                        banned_words: Vec::new(),
                        shredable,
                        alive: true,
                    },
                    conn,
                )
            })?;
        }
        JobCommand::List { recent } => {
            let jobs = if recent {
                store.picker_jobs(Some(config.recent_weeks))
            } else {
                store.list_active_jobs()
            };
            for job in jobs {
                let marker = if job.ignored { " (ignored)" } else { "" };
                let uri = job.uri.as_deref().unwrap_or("");
                println!(
                    "{:>6}  {}  {uri}{marker}",
                    job.jid,
                    Rgba::from_stored(&job.colour).to_hex()
                );
            }
        }
        JobCommand::Colour { jid, colour } => {
            let colour = parse_colour(colour)?;
            if !store.with_conn(|conn| db::update_job_colour(jid, &colour.to_stored(), conn))? {
                println!("Job {jid} not found.");
            }
        }
        JobCommand::Project { jid, project } => store.with_conn(|conn| {
            let project_id = match &project {
                Some(name) => Some(find_project(name, conn)?),
                None => None,
            };
            if !db::set_job_project(jid, project_id, conn)? {
                println!("Job {jid} not found.");
            }
            Ok(())
        })?,
    }
    Ok(())
}

fn parse_colour(value: Option<String>) -> Result<Rgba> {
    match value {
        Some(hex) => match Rgba::parse_hex(&hex) {
            Some(colour) => Ok(colour),
            None => bail!("Invalid color format. Please provide a hex code like #RRGGBB."),
        },
        None => Ok(color::random_colour(&mut rand::rng())),
    }
}

fn find_project(name: &str, conn: &rusqlite::Connection) -> Result<ProjectId> {
    match db::query_project_by_name(name, conn)?.and_then(|p| p.id) {
        Some(id) => Ok(id),
        None => bail!("Project '{name}' not found"),
    }
}

fn handle_project(command: ProjectCommand, store: &Store) -> Result<()> {
    match command {
        ProjectCommand::Add { name } => store.with_conn(|conn| {
            if db::query_project_by_name(&name, conn)?.is_some() {
                println!("Project '{name}' already exists.");
                return Ok(());
            }
            db::create_project(&name, conn)?;
            Ok(())
        })?,
        ProjectCommand::List => store.with_conn(|conn| {
            for project in db::query_projects(conn)? {
                let Some(id) = project.id else { continue };
                let config = db::query_project_configuration(id, conn)?;
                let ignored: Vec<String> =
                    config.ignored_jobs.iter().map(|jid| jid.to_string()).collect();
                let banned: Vec<&str> = config.banned_words.iter().map(String::as_str).collect();
                println!(
                    "{}  ignored: [{}]  banned: [{}]",
                    project.name,
                    ignored.join(", "),
                    banned.join(", ")
                );
            }
            Ok(())
        })?,
        ProjectCommand::Ignore { project, jid } => store.with_conn(|conn| {
            let id = find_project(&project, conn)?;
            let Some(job) = db::query_job(jid, conn)? else {
                bail!("Job {jid} not found");
            };
            if job.project_id != Some(id) {
                bail!(
                    "Job {jid} is not in '{project}'. Attach it first with `daylog job project {jid} {project}`"
                );
            }
            db::ignore_job(id, jid, conn)
        })?,
        ProjectCommand::Unignore { project, jid } => store.with_conn(|conn| {
            let id = find_project(&project, conn)?;
            if !db::unignore_job(id, jid, conn)? {
                println!("Job {jid} was not ignored in '{project}'.");
            }
            Ok(())
        })?,
        ProjectCommand::Ban { project, word } => store.with_conn(|conn| {
            let id = find_project(&project, conn)?;
            db::ban_word(id, &word, conn)
        })?,
        ProjectCommand::Unban { project, word } => store.with_conn(|conn| {
            let id = find_project(&project, conn)?;
            if !db::unban_word(id, &word, conn)? {
                println!("'{word}' was not banned in '{project}'.");
            }
            Ok(())
        })?,
    }
    Ok(())
}

fn handle_note(command: NoteCommand, store: &Store) -> Result<()> {
    match command {
        NoteCommand::Add {
            title,
            body,
            job,
            starred,
        } => {
            let now = Local::now();
            let id = store.with_conn(|conn| {
                if let Some(jid) = job {
                    db::ensure_job(jid, conn)?;
                }
                db::create_note(
                    &Note {
                        id: None,
                        job_id: job,
                        title,
                        body,
                        starred,
                        alive: true,
                        posted_date: now,
                        last_update: now,
                    },
                    conn,
                )
            })?;
            println!("Note #{id} saved.");
        }
        NoteCommand::Edit {
            id,
            title,
            body,
            starred,
        } => store.with_conn(|conn| {
            let Some(mut note) = db::query_note(id, conn)? else {
                println!("Note #{id} not found.");
                return Ok(());
            };
            if let Some(title) = title {
                note.title = title;
            }
            if let Some(body) = body {
                note.body = body;
            }
            if let Some(starred) = starred {
                note.starred = starred;
            }
            note.last_update = Local::now();
            db::update_note(id, &note, conn)?;
            Ok(())
        })?,
        NoteCommand::Today { date } => {
            for note in store.notes_for_date(parse_day(date)?) {
                let star = if note.starred { "*" } else { " " };
                println!(
                    "{star} #{:<4} {}  (updated {})",
                    note.id.unwrap_or_default(),
                    note.title,
                    dates::long_date(note.last_update)
                );
            }
        }
        NoteCommand::Versions { id } => {
            for version in store.note_versions(id) {
                println!("{}  {}", dates::long_date(version.created), version.title);
                println!("{}", version.content.trim_end());
                println!("{}", "─".repeat(40));
            }
        }
    }
    Ok(())
}

fn handle_task(command: TaskCommand, store: &Store) -> Result<()> {
    match command {
        TaskCommand::Add { jid, content } => {
            let id = store.with_conn(|conn| {
                db::ensure_job(jid, conn)?;
                db::create_task(
                    &Task {
                        id: None,
                        job_id: jid,
                        content,
                        created: Local::now(),
                        completed_date: None,
                    },
                    conn,
                )
            })?;
            println!("Task #{id} added to job {jid}.");
        }
        TaskCommand::Done { id } => {
            if !store.with_conn(|conn| db::complete_task(id, Local::now(), conn))? {
                println!("No open task #{id}.");
            }
        }
        TaskCommand::List { jid } => {
            for task in store.incomplete_tasks(jid) {
                println!("#{:<4} {}", task.id.unwrap_or_default(), task.content);
            }
        }
    }
    Ok(())
}

fn handle_import(path: PathBuf, since: Option<String>, store: &Store) -> Result<()> {
    let mut lines = legacy::read_file(&path)?;
    if let Some(day) = since {
        lines = legacy::since(lines, parse_short(&day)?);
    }
    let mut imported = 0;
    let mut skipped = 0;
    for line in &lines {
        let (job, exists) = store.with_conn(|conn| {
            let job = db::ensure_job(line.jid, conn)?;
            let exists = db::record_exists(line.jid, line.timestamp, &line.message, conn)?;
            Ok((job, exists))
        })?;
        if exists {
            skipped += 1;
            continue;
        }
        if store.create_record(&job, line.timestamp, &line.message).is_some() {
            imported += 1;
        }
    }
    println!(
        "Imported {imported} of {} lines, {skipped} already present.",
        lines.len()
    );
    Ok(())
}

fn parse_short(value: &str) -> Result<DateTime<Local>> {
    match dates::parse_short_date(value) {
        Some(date) => Ok(date),
        None => bail!("Invalid date '{value}'. Use YYYY-MM-DD."),
    }
}

fn parse_day(value: Option<String>) -> Result<DateTime<Local>> {
    match value {
        Some(s) => parse_short(&s),
        None => Ok(Local::now()),
    }
}

fn parse_optional_datetime(value: Option<String>) -> Result<Option<DateTime<Local>>> {
    match value {
        Some(s) => {
            let dt = DateTime::parse_from_rfc3339(&s)?.with_timezone(&Local);
            Ok(Some(dt))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_joins_message_words() {
        let cli = Cli::try_parse_from(["daylog", "log", "12", "fix", "the", "build"]).unwrap();
        match cli.command {
            Command::Log { job, message, at } => {
                assert_eq!(job, 12);
                assert_eq!(message.join(" "), "fix the build");
                assert!(at.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn logged_records_show_up_in_export() {
        let store = Store::in_memory().unwrap();
        handle_log(
            3,
            "pair on parser".to_string(),
            Some("2024-05-02T10:00:00+00:00".to_string()),
            &store,
        )
        .unwrap();
        let day = DateTime::parse_from_rfc3339("2024-05-02T10:00:00+00:00")
            .unwrap()
            .with_timezone(&Local);
        let records = store.for_date(day);
        assert_eq!(
            export::export(&records, &Config::default().export, true),
            "3\n - pair on parser\n\n"
        );
    }

    #[test]
    fn import_creates_jobs_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Daily.log");
        std::fs::write(
            &path,
            "===\n2023-01-02\n===\n2023-01-02 19:08 - 11 - please work\n2023-01-02 19:10 - 12 - ship it\n",
        )
        .unwrap();
        let store = Store::in_memory().unwrap();
        handle_import(path.clone(), None, &store).unwrap();
        let ids: Vec<JobId> = store.list_active_jobs().iter().map(|j| j.jid).collect();
        assert_eq!(ids, vec![12, 11]);
        assert_eq!(store.records_for_job(11).len(), 1);

        handle_import(path, None, &store).unwrap();
        assert_eq!(store.records_for_job(11).len(), 1);
        assert_eq!(store.records_for_job(12).len(), 1);
    }

    fn project(command: ProjectCommand, store: &Store) -> Result<()> {
        handle_project(command, store)
    }

    #[test]
    fn ignored_project_jobs_drop_out_of_export() {
        let store = Store::in_memory().unwrap();
        let at = "2024-05-02T10:00:00+00:00";
        handle_log(5, "secret work".to_string(), Some(at.to_string()), &store).unwrap();
        handle_log(6, "public work".to_string(), Some(at.to_string()), &store).unwrap();
        project(ProjectCommand::Add { name: "client".to_string() }, &store).unwrap();

        // job 5 was created by `log` and has no project yet
        assert!(project(
            ProjectCommand::Ignore { project: "client".to_string(), jid: 5 },
            &store
        )
        .is_err());
        assert!(project(
            ProjectCommand::Ignore { project: "client".to_string(), jid: 404 },
            &store
        )
        .is_err());

        let config = Config::default();
        handle_job(
            JobCommand::Project { jid: 5, project: Some("client".to_string()) },
            &store,
            &config,
        )
        .unwrap();
        project(
            ProjectCommand::Ignore { project: "client".to_string(), jid: 5 },
            &store,
        )
        .unwrap();

        let day = DateTime::parse_from_rfc3339(at).unwrap().with_timezone(&Local);
        let out = export::export(&store.for_date(day), &config.export, false);
        assert!(!out.contains("secret"));
        assert_eq!(out, "public work\n");

        handle_job(JobCommand::Project { jid: 5, project: None }, &store, &config).unwrap();
        let out = export::export(&store.for_date(day), &config.export, false);
        assert!(out.contains("secret work"));
    }

    #[test]
    fn banned_words_are_masked_for_project_jobs() {
        let store = Store::in_memory().unwrap();
        let at = "2024-05-02T10:00:00+00:00";
        handle_log(7, "demo for Acme".to_string(), Some(at.to_string()), &store).unwrap();
        let config = Config::default();
        project(ProjectCommand::Add { name: "client".to_string() }, &store).unwrap();
        project(
            ProjectCommand::Ban { project: "client".to_string(), word: "acme".to_string() },
            &store,
        )
        .unwrap();
        handle_job(
            JobCommand::Project { jid: 7, project: Some("client".to_string()) },
            &store,
            &config,
        )
        .unwrap();

        let day = DateTime::parse_from_rfc3339(at).unwrap().with_timezone(&Local);
        assert_eq!(
            export::export(&store.for_date(day), &config.export, false),
            "demo for ****\n"
        );
        project(
            ProjectCommand::Unban { project: "client".to_string(), word: "Acme".to_string() },
            &store,
        )
        .unwrap();
        assert_eq!(
            export::export(&store.for_date(day), &config.export, true),
            "7\n - demo for Acme\n\n"
        );
    }

    #[test]
    fn recent_conflicts_with_explicit_bounds() {
        let args = [
            "daylog", "export", "--start", "2024-01-01", "--end", "2024-01-31", "--recent", "2",
        ];
        assert!(Cli::try_parse_from(args).is_err());
        let cli = Cli::try_parse_from(["daylog", "search", "release", "notes"]).unwrap();
        match cli.command {
            Command::Search { term, notes } => {
                assert_eq!(term.join(" "), "release notes");
                assert!(!notes);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unique_jobs_keeps_first_seen_order() {
        let record = |jid| LogRecord {
            id: None,
            timestamp: Local::now(),
            message: String::new(),
            job: Job::new(jid),
        };
        let jobs = unique_jobs(&[record(4), record(2), record(4), record(9)]);
        let ids: Vec<JobId> = jobs.iter().map(|j| j.jid).collect();
        assert_eq!(ids, vec![4, 2, 9]);
    }

    #[test]
    fn export_range_prefers_explicit_bounds() {
        let range = ExportRange::from_args(
            None,
            false,
            Some("2024-01-01".to_string()),
            Some("2024-01-31".to_string()),
            None,
        )
        .unwrap();
        match range {
            ExportRange::Between(start, end) => {
                assert_eq!(dates::short_date(start), "2024-01-01");
                assert_eq!(dates::long_date(end), "2024-01-31 23:59:59");
            }
            _ => panic!("expected explicit range"),
        }
        let range =
            ExportRange::from_args(Some("2024-02-10".to_string()), true, None, None, None).unwrap();
        assert!(matches!(range, ExportRange::WeekBefore(_)));
        assert!(matches!(
            ExportRange::from_args(None, false, None, None, Some(2)).unwrap(),
            ExportRange::RecentWeeks(2)
        ));
    }

    #[test]
    fn bad_dates_are_rejected() {
        assert!(parse_short("2024/01/01").is_err());
        assert!(parse_colour(Some("red".to_string())).is_err());
        assert!(parse_colour(None).is_ok());
    }
}
