/// Database migrations and schema management.
use anyhow::Result;
use rusqlite::Connection;

/// Creates the initial schema if it doesn't exist yet.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS projects (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT    NOT NULL UNIQUE,
            alive       INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS ignored_jobs (
            project_id  INTEGER NOT NULL,
            job_id      INTEGER NOT NULL,
            PRIMARY KEY (project_id, job_id),
            FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS banned_words (
            project_id  INTEGER NOT NULL,
            word        TEXT    NOT NULL,
            PRIMARY KEY (project_id, word),
            FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS jobs (
            jid         INTEGER PRIMARY KEY,
            colour      TEXT    NOT NULL DEFAULT '',
            uri         TEXT,
            project_id  INTEGER,
            shredable   INTEGER NOT NULL DEFAULT 0,
            alive       INTEGER NOT NULL DEFAULT 1,
            FOREIGN KEY (project_id) REFERENCES projects(id)
        );

        CREATE TABLE IF NOT EXISTS records (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp   TEXT    NOT NULL,
            message     TEXT    NOT NULL,
            job_id      INTEGER NOT NULL,
            FOREIGN KEY (job_id) REFERENCES jobs(jid)
        );

        CREATE INDEX IF NOT EXISTS records_timestamp ON records(timestamp);

        CREATE TABLE IF NOT EXISTS notes (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id      INTEGER,
            title       TEXT    NOT NULL,
            body        TEXT    NOT NULL,
            starred     INTEGER NOT NULL DEFAULT 0,
            alive       INTEGER NOT NULL DEFAULT 1,
            posted_date TEXT    NOT NULL,
            last_update TEXT    NOT NULL,
            FOREIGN KEY (job_id) REFERENCES jobs(jid)
        );

        CREATE TABLE IF NOT EXISTS note_versions (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            note_id     INTEGER NOT NULL,
            title       TEXT    NOT NULL,
            content     TEXT    NOT NULL,
            starred     INTEGER NOT NULL DEFAULT 0,
            created     TEXT    NOT NULL,
            FOREIGN KEY (note_id) REFERENCES notes(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id          INTEGER NOT NULL,
            content         TEXT    NOT NULL,
            created         TEXT    NOT NULL,
            completed_date  TEXT,
            FOREIGN KEY (job_id) REFERENCES jobs(jid)
        );
        ",
    )?;
    Ok(())
}
