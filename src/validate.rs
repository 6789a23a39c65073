use crate::error::{Result, TaskError};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Trim a title and check it is non-empty and at most 100 characters.
/// Returns the trimmed title.
pub fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(TaskError::validation(format!(
            "Title cannot exceed {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

/// Descriptions are stored verbatim; only the length is checked.
pub fn validate_description(description: &str) -> Result<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(TaskError::validation(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_page_size(page_size: i64) -> Result<usize> {
    if page_size <= 0 {
        return Err(TaskError::validation("Invalid page size"));
    }
    usize::try_from(page_size).map_err(|_| TaskError::validation("Invalid page size"))
}
