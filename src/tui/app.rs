use anyhow::Result;

use crate::model::Task;
use crate::paginate::Page;
use crate::store::TaskStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Search,
    Help,
}

pub struct App {
    pub page: Page,
    pub page_no: i64,
    pub page_size: i64,
    /// The query currently applied to the listing.
    pub query: String,
    /// What the user is typing while in search mode.
    pub input: String,
    pub cursor: usize,
    pub mode: Mode,
    pub show_detail: bool,
    pub error: Option<String>,
}

impl App {
    pub fn new(store: &TaskStore, page_size: i64) -> Result<Self> {
        let page = store.list(1, page_size)?;
        let mut app = App {
            page,
            page_no: 1,
            page_size,
            query: String::new(),
            input: String::new(),
            cursor: 0,
            mode: Mode::Normal,
            show_detail: false,
            error: None,
        };
        app.refresh(store)?;
        Ok(app)
    }

    /// Re-run the current query. If the page fell off the end (tasks were
    /// removed elsewhere), step back to the last page.
    pub fn refresh(&mut self, store: &TaskStore) -> Result<()> {
        self.page = store.search(&self.query, self.page_no, self.page_size)?;
        let total = self.page.pagination.total_pages as i64;
        if total > 0 && self.page_no > total {
            self.page_no = total;
            self.page = store.search(&self.query, self.page_no, self.page_size)?;
        }
        // Clamp cursor
        if self.page.tasks.is_empty() {
            self.cursor = 0;
        } else if self.cursor >= self.page.tasks.len() {
            self.cursor = self.page.tasks.len() - 1;
        }
        Ok(())
    }

    pub fn selected(&self) -> Option<&Task> {
        self.page.tasks.get(self.cursor)
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if !self.page.tasks.is_empty() && self.cursor < self.page.tasks.len() - 1 {
            self.cursor += 1;
        }
    }

    /// Returns true if the page changed.
    pub fn next_page(&mut self) -> bool {
        if self.page_no < self.page.pagination.total_pages as i64 {
            self.page_no += 1;
            self.cursor = 0;
            true
        } else {
            false
        }
    }

    /// Returns true if the page changed.
    pub fn prev_page(&mut self) -> bool {
        if self.page_no > 1 {
            self.page_no -= 1;
            self.cursor = 0;
            true
        } else {
            false
        }
    }

    pub fn start_search(&mut self) {
        self.input = self.query.clone();
        self.mode = Mode::Search;
    }

    pub fn apply_search(&mut self) {
        self.query = std::mem::take(&mut self.input);
        self.page_no = 1;
        self.cursor = 0;
        self.mode = Mode::Normal;
    }

    pub fn cancel_search(&mut self) {
        self.input.clear();
        self.mode = Mode::Normal;
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            Mode::Help => Mode::Normal,
            _ => Mode::Help,
        };
    }

    /// Advance the selected task to its next status and persist it.
    pub fn cycle_status(&mut self, store: &mut TaskStore) -> Result<()> {
        let Some(task) = self.selected() else {
            return Ok(());
        };
        let (id, next) = (task.id, task.status.next());
        self.error = None;
        if let Err(e) = store.change_status(id, next.as_str()) {
            self.error = Some(e.to_string());
        }
        self.refresh(store)
    }
}
