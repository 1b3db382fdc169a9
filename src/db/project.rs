/// Project-related database queries.
use std::collections::BTreeSet;

use anyhow::{Result, bail};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::db::{datetime_at, to_db_time};
use crate::types::{JobId, Project, ProjectConfiguration, ProjectId};

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        alive: row.get(2)?,
        created_at: datetime_at(row, 3)?,
    })
}

pub fn create_project(name: &str, conn: &Connection) -> Result<ProjectId> {
    conn.execute(
        "INSERT INTO projects (name, alive, created_at) VALUES (?1, 1, ?2)",
        (name, to_db_time(Local::now())),
    )?;
    Ok(conn.last_insert_rowid() as ProjectId)
}

pub fn query_projects(conn: &Connection) -> Result<Vec<Project>> {
    let mut stmt =
        conn.prepare("SELECT id, name, alive, created_at FROM projects ORDER BY name")?;
    let rows = stmt.query_map([], project_from_row)?;
    let mut projects = Vec::new();
    for row in rows {
        projects.push(row?);
    }
    Ok(projects)
}

pub fn query_project_by_name(name: &str, conn: &Connection) -> Result<Option<Project>> {
    let project = conn
        .query_row(
            "SELECT id, name, alive, created_at FROM projects WHERE name = ?1",
            [name],
            project_from_row,
        )
        .optional()?;
    Ok(project)
}

pub fn query_project_configuration(
    project_id: ProjectId,
    conn: &Connection,
) -> Result<ProjectConfiguration> {
    let mut stmt =
        conn.prepare("SELECT job_id FROM ignored_jobs WHERE project_id = ?1 ORDER BY job_id")?;
    let ignored_jobs = stmt
        .query_map([project_id], |row| row.get(0))?
        .collect::<Result<BTreeSet<JobId>, _>>()?;
    let mut stmt =
        conn.prepare("SELECT word FROM banned_words WHERE project_id = ?1 ORDER BY word")?;
    let banned_words = stmt
        .query_map([project_id], |row| row.get(0))?
        .collect::<Result<BTreeSet<String>, _>>()?;
    Ok(ProjectConfiguration {
        project_id,
        ignored_jobs,
        banned_words,
    })
}

pub fn ignore_job(project_id: ProjectId, jid: JobId, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO ignored_jobs (project_id, job_id) VALUES (?1, ?2)",
        (project_id, jid),
    )?;
    Ok(())
}

pub fn unignore_job(project_id: ProjectId, jid: JobId, conn: &Connection) -> Result<bool> {
    let count = conn.execute(
        "DELETE FROM ignored_jobs WHERE project_id = ?1 AND job_id = ?2",
        (project_id, jid),
    )?;
    Ok(count > 0)
}

/// Banned words are single words, stored lowercase.
fn normalize_word(word: &str) -> Result<String> {
    let word = word.trim();
    if word.is_empty() || word.contains(char::is_whitespace) {
        bail!("Banned words must be a single word, got '{word}'");
    }
    Ok(word.to_lowercase())
}

pub fn ban_word(project_id: ProjectId, word: &str, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO banned_words (project_id, word) VALUES (?1, ?2)",
        (project_id, normalize_word(word)?),
    )?;
    Ok(())
}

pub fn unban_word(project_id: ProjectId, word: &str, conn: &Connection) -> Result<bool> {
    let count = conn.execute(
        "DELETE FROM banned_words WHERE project_id = ?1 AND word = ?2",
        (project_id, normalize_word(word)?),
    )?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_job, init_in_memory, query_job};
    use crate::types::Job;

    #[test]
    fn ignoring_a_job_marks_it_on_query() {
        let conn = init_in_memory().unwrap();
        let project_id = create_project("client", &conn).unwrap();
        let mut job = Job::new(42);
        job.project_id = Some(project_id);
        create_job(&job, &conn).unwrap();
        assert!(!query_job(42, &conn).unwrap().unwrap().ignored);

        ignore_job(project_id, 42, &conn).unwrap();
        ignore_job(project_id, 42, &conn).unwrap();
        assert!(query_job(42, &conn).unwrap().unwrap().ignored);
        assert_eq!(
            query_project_configuration(project_id, &conn).unwrap().ignored_jobs,
            BTreeSet::from([42])
        );

        assert!(unignore_job(project_id, 42, &conn).unwrap());
        assert!(!query_job(42, &conn).unwrap().unwrap().ignored);
    }

    #[test]
    fn banned_words_are_normalized() {
        let conn = init_in_memory().unwrap();
        let project_id = create_project("client", &conn).unwrap();
        ban_word(project_id, " Acme ", &conn).unwrap();
        ban_word(project_id, "acme", &conn).unwrap();
        assert!(ban_word(project_id, "two words", &conn).is_err());
        assert!(ban_word(project_id, "", &conn).is_err());
        assert_eq!(
            query_project_configuration(project_id, &conn).unwrap().banned_words,
            BTreeSet::from(["acme".to_string()])
        );
        assert!(unban_word(project_id, "ACME", &conn).unwrap());
        assert!(!unban_word(project_id, "acme", &conn).unwrap());
    }

    #[test]
    fn projects_are_found_by_name() {
        let conn = init_in_memory().unwrap();
        let id = create_project("internal", &conn).unwrap();
        let project = query_project_by_name("internal", &conn).unwrap().unwrap();
        assert_eq!(project.id, Some(id));
        assert!(project.alive);
        assert!(query_project_by_name("missing", &conn).unwrap().is_none());
        assert!(create_project("internal", &conn).is_err());
        assert_eq!(query_projects(&conn).unwrap().len(), 1);
    }
}
