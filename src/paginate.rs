use serde::Serialize;

use crate::model::Task;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Echo of the requested page, even when it is out of range.
    pub current_page: i64,
    pub total_pages: usize,
    pub total_tasks: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub tasks: Vec<Task>,
    pub pagination: Pagination,
}

/// Slice one page out of `matching`, which is already in collection order.
/// Pages are 1-based; a page outside `1..=total_pages` is empty.
pub fn paginate(matching: Vec<&Task>, page: i64, page_size: usize) -> Page {
    let total_tasks = matching.len();
    let total_pages = total_tasks.div_ceil(page_size);

    let tasks = match usize::try_from(page) {
        Ok(p) if p >= 1 && p <= total_pages => matching
            .into_iter()
            .skip((p - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect(),
        _ => Vec::new(),
    };

    Page {
        tasks,
        pagination: Pagination {
            current_page: page,
            total_pages,
            total_tasks,
            page_size,
        },
    }
}
