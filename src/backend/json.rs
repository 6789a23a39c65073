use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use super::Backend;
use crate::model::Task;

/// The collection as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}

impl Backend for JsonFile {
    fn read(&self) -> Result<Option<Vec<Task>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let tasks = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(Some(tasks))
    }

    fn write(&self, tasks: &[Task]) -> Result<()> {
        // Write beside the target and rename over it so a crash never leaves
        // a half-written file behind.
        let mut tmp = NamedTempFile::new_in(self.dir())
            .with_context(|| format!("failed to create temp file in {}", self.dir().display()))?;
        serde_json::to_writer_pretty(&mut tmp, tasks)?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
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
    use crate::backend::Loaded;
    use crate::model::{Status, TaskId};

    fn sample() -> Vec<Task> {
        vec![
            Task {
                id: TaskId(1),
                title: "Projet Python".into(),
                description: "Écrire les tests".into(),
                status: Status::Ongoing,
                created_at: Local::now(),
            },
            Task {
                id: TaskId(3),
                title: "Courses".into(),
                description: String::new(),
                status: Status::Todo,
                created_at: Local::now(),
            },
        ]
    }

    #[test]
    fn missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFile::new(dir.path().join("tasks.json"));
        assert!(backend.read().unwrap().is_none());
        assert_eq!(backend.load(), Loaded::Empty);
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFile::new(dir.path().join("tasks.json"));
        let tasks = sample();
        backend.write(&tasks).unwrap();
        assert_eq!(backend.read().unwrap(), Some(tasks));
    }

    #[test]
    fn file_format_uses_uppercase_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        JsonFile::new(&path).write(&sample()).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"status\": \"ONGOING\""));
        assert!(raw.contains("\"id\": 3"));
        assert!(raw.contains("Écrire les tests"));
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{ not json").unwrap();
        let backend = JsonFile::new(&path);
        assert!(backend.read().is_err());
        assert_eq!(backend.load(), Loaded::Empty);
    }

    #[test]
    fn unknown_status_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"[{"id":1,"title":"x","description":"","status":"BLOCKED","created_at":"2025-01-01T10:00:00+00:00"}]"#,
        )
        .unwrap();
        assert_eq!(JsonFile::new(&path).load(), Loaded::Empty);
    }

    #[test]
    fn timestamps_without_offset_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"[{"id":1,"title":"legacy","description":"","status":"TODO","created_at":"2025-01-01T10:00:00.123456"}]"#,
        )
        .unwrap();
        let Loaded::Tasks(tasks) = JsonFile::new(&path).load() else {
            panic!("expected tasks");
        };
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "legacy");
    }

    #[test]
    fn write_into_missing_dir_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFile::new(dir.path().join("nope").join("tasks.json"));
        assert_eq!(backend.save(&sample()), crate::backend::Saved::Dropped);
    }
}
