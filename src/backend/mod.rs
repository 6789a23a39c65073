//! Durable storage for the task collection.
//!
//! A backend only knows how to read and write the whole collection. Failures
//! never reach the store: `load` degrades to an empty collection and `save`
//! drops the write, both with a warning in the log.

mod json;
mod memory;
mod sqlite;

use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use log::{debug, warn};

use crate::model::Task;

pub use json::JsonFile;
pub use memory::Memory;
pub use sqlite::Sqlite;

/// Outcome of reading the collection at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Tasks(Vec<Task>),
    Empty,
}

impl Loaded {
    pub fn into_tasks(self) -> Vec<Task> {
        match self {
            Loaded::Tasks(tasks) => tasks,
            Loaded::Empty => Vec::new(),
        }
    }
}

/// Outcome of writing the collection after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    Written,
    Dropped,
}

pub trait Backend {
    /// Read the stored collection. `Ok(None)` means nothing has been stored yet.
    fn read(&self) -> Result<Option<Vec<Task>>>;

    /// Replace the stored collection with `tasks`.
    fn write(&self, tasks: &[Task]) -> Result<()>;

    /// Human-readable location, for log lines.
    fn location(&self) -> String;

    fn load(&self) -> Loaded {
        match self.read() {
            Ok(Some(tasks)) => Loaded::Tasks(tasks),
            Ok(None) => {
                debug!("no task store at {}, starting empty", self.location());
                Loaded::Empty
            }
            Err(e) => {
                warn!(
                    "could not read tasks from {}, starting empty: {e:#}",
                    self.location()
                );
                Loaded::Empty
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Saved {
        match self.write(tasks) {
            Ok(()) => Saved::Written,
            Err(e) => {
                warn!("could not save tasks to {}: {e:#}", self.location());
                Saved::Dropped
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    Json,
    Sqlite,
}

impl BackendKind {
    /// Guess the backend from a store path: `.db`, `.sqlite` and `.sqlite3`
    /// are SQLite, anything else is JSON.
    pub fn infer(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("db" | "sqlite" | "sqlite3") => Self::Sqlite,
            _ => Self::Json,
        }
    }
}

pub fn open(kind: BackendKind, path: &Path) -> Box<dyn Backend> {
    match kind {
        BackendKind::Json => Box::new(JsonFile::new(path)),
        BackendKind::Sqlite => Box::new(Sqlite::new(path)),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn infer_from_extension() {
        assert_eq!(BackendKind::infer(&PathBuf::from("tasks.json")), BackendKind::Json);
        assert_eq!(BackendKind::infer(&PathBuf::from("tasks")), BackendKind::Json);
        assert_eq!(BackendKind::infer(&PathBuf::from("a/tasks.db")), BackendKind::Sqlite);
        assert_eq!(BackendKind::infer(&PathBuf::from("t.sqlite3")), BackendKind::Sqlite);
    }

    #[test]
    fn failures_are_absorbed() {
        let backend = Memory::failing();
        assert_eq!(backend.load(), Loaded::Empty);
        assert_eq!(backend.save(&[]), Saved::Dropped);
    }

    #[test]
    fn missing_store_loads_empty() {
        let backend = Memory::new();
        assert_eq!(backend.load(), Loaded::Empty);
        assert_eq!(backend.save(&[]), Saved::Written);
        assert_eq!(backend.load(), Loaded::Tasks(Vec::new()));
    }
}
