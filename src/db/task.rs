/// Task queries.
use anyhow::Result;
use chrono::{DateTime, Local};
use rusqlite::Connection;

use crate::db::{datetime_at, optional_datetime_at, to_db_time};
use crate::types::{JobId, Task, TaskId};

pub fn create_task(task: &Task, conn: &Connection) -> Result<TaskId> {
    conn.execute(
        "INSERT INTO tasks (job_id, content, created, completed_date) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            task.job_id,
            task.content,
            to_db_time(task.created),
            task.completed_date.map(to_db_time),
        ],
    )?;
    Ok(conn.last_insert_rowid() as TaskId)
}

/// Marks an open task complete. Returns false when no open task has `id`.
pub fn complete_task(id: TaskId, at: DateTime<Local>, conn: &Connection) -> Result<bool> {
    let count = conn.execute(
        "UPDATE tasks SET completed_date = ?1 WHERE id = ?2 AND completed_date IS NULL",
        rusqlite::params![to_db_time(at), id],
    )?;
    Ok(count > 0)
}

pub fn query_incomplete_tasks(jid: JobId, conn: &Connection) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(
        "SELECT id, job_id, content, created, completed_date FROM tasks
         WHERE job_id = ?1 AND completed_date IS NULL ORDER BY created ASC, id ASC",
    )?;
    let rows = stmt.query_map([jid], |row| {
        Ok(Task {
            id: Some(row.get(0)?),
            job_id: row.get(1)?,
            content: row.get(2)?,
            created: datetime_at(row, 3)?,
            completed_date: optional_datetime_at(row, 4)?,
        })
    })?;
    let mut tasks = Vec::new();
    for row in rows {
        tasks.push(row?);
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ensure_job, init_in_memory};

    #[test]
    fn completed_tasks_leave_the_open_list() {
        let conn = init_in_memory().unwrap();
        ensure_job(8, &conn).unwrap();
        let now = Local::now();
        let first = create_task(
            &Task {
                id: None,
                job_id: 8,
                content: "write report".to_string(),
                created: now,
                completed_date: None,
            },
            &conn,
        )
        .unwrap();
        create_task(
            &Task {
                id: None,
                job_id: 8,
                content: "send invoice".to_string(),
                created: now,
                completed_date: None,
            },
            &conn,
        )
        .unwrap();

        assert!(complete_task(first, now, &conn).unwrap());
        assert!(!complete_task(first, now, &conn).unwrap());

        let open = query_incomplete_tasks(8, &conn).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].content, "send invoice");
        assert!(open[0].completed_date.is_none());
    }
}
