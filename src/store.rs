//! Task lifecycle operations over the in-memory collection.
//!
//! The store owns the collection for the life of the process. Every mutation
//! writes the full collection back through the backend before returning.

use chrono::Local;
use log::{debug, info};

use crate::backend::{Backend, Saved};
use crate::error::{Result, TaskError};
use crate::model::{Status, Task, TaskId};
use crate::paginate::{paginate, Page};
use crate::validate::{validate_description, validate_page_size, validate_title};

/// Field changes for [`TaskStore::update`]. `None` leaves the field alone;
/// `Some(String::new())` is an explicit value and gets validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

pub struct TaskStore {
    tasks: Vec<Task>,
    backend: Box<dyn Backend>,
}

impl TaskStore {
    /// Load the collection from `backend`. An absent or unreadable store
    /// yields an empty collection.
    pub fn open(backend: impl Backend + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn Backend>) -> Self {
        let tasks = backend.load().into_tasks();
        info!("loaded {} task(s) from {}", tasks.len(), backend.location());
        Self { tasks, backend }
    }

    /// Re-read the collection from the backend, discarding in-memory state.
    pub fn reload(&mut self) {
        self.tasks = self.backend.load().into_tasks();
        debug!("reloaded {} task(s)", self.tasks.len());
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn persist(&self) -> Saved {
        self.backend.save(&self.tasks)
    }

    // Max + 1 over what is present right now: deleting the highest id frees
    // it for the next create.
    fn next_id(&self) -> TaskId {
        self.tasks
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(TaskId(1), |TaskId(max)| TaskId(max + 1))
    }

    fn position(&self, id: TaskId) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(TaskError::task_not_found)
    }

    pub fn create(&mut self, title: &str, description: &str) -> Result<Task> {
        let title = validate_title(title)?;
        validate_description(description)?;

        let task = Task {
            id: self.next_id(),
            title,
            description: description.to_string(),
            status: Status::Todo,
            created_at: Local::now(),
        };
        self.tasks.push(task.clone());
        self.persist();
        debug!("created task {}", task.id);
        Ok(task)
    }

    pub fn get(&self, id: TaskId) -> Result<&Task> {
        self.position(id).map(|i| &self.tasks[i])
    }

    /// Apply `changes` to a task. Both fields are validated before either is
    /// assigned, so a failed update leaves the task untouched.
    pub fn update(&mut self, id: TaskId, changes: TaskUpdate) -> Result<Task> {
        let idx = self.position(id)?;

        let title = changes.title.as_deref().map(validate_title).transpose()?;
        if let Some(description) = changes.description.as_deref() {
            validate_description(description)?;
        }

        let task = &mut self.tasks[idx];
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = description;
        }
        let task = task.clone();
        self.persist();
        debug!("updated task {id}");
        Ok(task)
    }

    /// Set a task's status from its textual name. The task is resolved first,
    /// so an unknown id is reported ahead of a bad status.
    pub fn change_status(&mut self, id: TaskId, status: &str) -> Result<Task> {
        let idx = self.position(id)?;
        let status = status.parse::<Status>()?;

        self.tasks[idx].status = status;
        let task = self.tasks[idx].clone();
        self.persist();
        debug!("task {id} is now {status}");
        Ok(task)
    }

    pub fn delete(&mut self, id: TaskId) -> Result<()> {
        let idx = self.position(id)?;
        self.tasks.remove(idx);
        self.persist();
        debug!("deleted task {id}");
        Ok(())
    }

    pub fn list(&self, page: i64, page_size: i64) -> Result<Page> {
        let page_size = validate_page_size(page_size)?;
        Ok(paginate(self.tasks.iter().collect(), page, page_size))
    }

    /// Case-insensitive substring search over title and description. An
    /// empty query lists everything.
    pub fn search(&self, query: &str, page: i64, page_size: i64) -> Result<Page> {
        let page_size = validate_page_size(page_size)?;
        if query.is_empty() {
            return Ok(paginate(self.tasks.iter().collect(), page, page_size));
        }
        let needle = query.to_lowercase();
        let matching = self.tasks.iter().filter(|t| t.matches(&needle)).collect();
        Ok(paginate(matching, page, page_size))
    }
}
