use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::Backend;
use crate::model::{parse_timestamp, Status, Task, TaskId};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id          INTEGER PRIMARY KEY,
    position    INTEGER NOT NULL,
    title       TEXT NOT NULL CHECK(length(trim(title)) > 0 AND length(title) <= 100),
    description TEXT NOT NULL DEFAULT '' CHECK(length(description) <= 500),
    status      TEXT NOT NULL DEFAULT 'TODO' CHECK(status IN ('TODO', 'ONGOING', 'DONE')),
    created_at  TEXT NOT NULL
);
";

fn set_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA busy_timeout = 5000;",
    )?;
    Ok(())
}

/// The collection as rows of a SQLite table. `position` keeps insertion
/// order across rewrites.
#[derive(Debug, Clone)]
pub struct Sqlite {
    path: PathBuf,
}

impl Sqlite {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        set_pragmas(&conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }
}

struct Row {
    id: i64,
    title: String,
    description: String,
    status: String,
    created_at: String,
}

impl Row {
    fn into_task(self) -> Result<Task> {
        let status = self.status.parse::<Status>()?;
        let created_at = parse_timestamp(&self.created_at)
            .with_context(|| format!("task {} has a malformed created_at", self.id))?;
        Ok(Task {
            id: TaskId(self.id),
            title: self.title,
            description: self.description,
            status,
            created_at,
        })
    }
}

impl Backend for Sqlite {
    fn read(&self) -> Result<Option<Vec<Task>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, description, status, created_at FROM tasks ORDER BY position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Row {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                status: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?.into_task()?);
        }
        Ok(Some(tasks))
    }

    fn write(&self, tasks: &[Task]) -> Result<()> {
        let conn = self.connect()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO tasks (id, position, title, description, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (position, task) in tasks.iter().enumerate() {
                stmt.execute(rusqlite::params![
                    task.id.0,
                    position as i64,
                    task.title,
                    task.description,
                    task.status.as_str(),
                    task.created_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;
    use crate::backend::{Loaded, Saved};

    fn task(id: i64, title: &str, status: Status) -> Task {
        Task {
            id: TaskId(id),
            title: title.into(),
            description: format!("about {title}"),
            status,
            created_at: Local::now(),
        }
    }

    #[test]
    fn missing_db_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Sqlite::new(dir.path().join("tasks.db"));
        assert!(backend.read().unwrap().is_none());
    }

    #[test]
    fn write_preserves_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Sqlite::new(dir.path().join("tasks.db"));
        let tasks = vec![
            task(5, "five", Status::Done),
            task(2, "two", Status::Todo),
            task(9, "nine", Status::Ongoing),
        ];
        backend.write(&tasks).unwrap();
        let read = backend.read().unwrap().unwrap();
        let ids: Vec<i64> = read.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![5, 2, 9]);
        assert_eq!(read[0].status, Status::Done);
        assert_eq!(read[2].description, "about nine");
        assert_eq!(read[1].created_at, tasks[1].created_at);
    }

    #[test]
    fn rewrite_replaces_rows() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Sqlite::new(dir.path().join("tasks.db"));
        backend
            .write(&[task(1, "a", Status::Todo), task(2, "b", Status::Todo)])
            .unwrap();
        backend.write(&[task(2, "b", Status::Done)]).unwrap();
        let read = backend.read().unwrap().unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].status, Status::Done);
    }

    #[test]
    fn constraint_violation_drops_save() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Sqlite::new(dir.path().join("tasks.db"));
        backend.write(&[task(1, "keep", Status::Todo)]).unwrap();
        let bad = task(2, &"x".repeat(101), Status::Todo);
        assert_eq!(backend.save(&[bad]), Saved::Dropped);
        // the failed transaction rolled back
        let read = backend.read().unwrap().unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].title, "keep");
    }

    #[test]
    fn garbage_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");
        std::fs::write(&path, "this is not a database, just some text").unwrap();
        assert_eq!(Sqlite::new(&path).load(), Loaded::Empty);
    }
}
