use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Result};

use super::Backend;
use crate::model::Task;

/// Keeps the collection in memory. Clones share the same storage, so a test
/// can hand one clone to a store and inspect what was saved through another.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    stored: Rc<RefCell<Option<Vec<Task>>>>,
    saves: Rc<RefCell<usize>>,
    failing: bool,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let backend = Self::default();
        *backend.stored.borrow_mut() = Some(tasks);
        backend
    }

    /// A backend whose every read and write fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Option<Vec<Task>> {
        self.stored.borrow().clone()
    }

    /// Number of successful writes so far.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl Backend for Memory {
    fn read(&self) -> Result<Option<Vec<Task>>> {
        if self.failing {
            bail!("memory backend is unavailable");
        }
        Ok(self.stored.borrow().clone())
    }

    fn write(&self, tasks: &[Task]) -> Result<()> {
        if self.failing {
            bail!("memory backend is unavailable");
        }
        *self.stored.borrow_mut() = Some(tasks.to_vec());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
