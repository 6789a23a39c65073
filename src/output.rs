use crate::model::Task;
use crate::paginate::Page;

const DESCRIPTION_WIDTH: usize = 40;

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(len)))
}

pub fn format_task_detail(task: &Task) -> String {
    let mut out = String::new();
    out.push_str(&format!("Task #{}\n", task.id));
    out.push_str(&format!("Title:       {}\n", task.title));
    if task.description.is_empty() {
        out.push_str("Description: (none)\n");
    } else {
        out.push_str(&format!("Description: {}\n", task.description));
    }
    out.push_str(&format!("Status:      {}\n", task.status));
    out.push_str(&format!("Created:     {}\n", task.created_at.to_rfc3339()));
    out
}

/// Render tasks as a fixed-width table: ID, status, title, description
/// (truncated, `-` when empty) and creation date.
pub fn format_task_table(tasks: &[Task]) -> String {
    let header = ["ID", "Status", "Title", "Description", "Created"];
    let rows: Vec<[String; 5]> = tasks
        .iter()
        .map(|t| {
            let desc = if t.description.is_empty() {
                "-".to_string()
            } else {
                truncate(&t.description, DESCRIPTION_WIDTH)
            };
            [
                t.id.to_string(),
                format!("{} {}", t.icon(), t.status),
                t.title.clone(),
                desc,
                t.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: &[String]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| pad(c, w))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };
    push_line(&header.map(String::from));
    push_line(&widths.map(|w| "-".repeat(w)));
    for row in &rows {
        push_line(row);
    }
    out
}

/// Table plus a `Total: N <noun> | Page X/Y` footer.
pub fn format_page(page: &Page, noun: &str) -> String {
    let p = &page.pagination;
    let mut out = format_task_table(&page.tasks);
    out.push_str(&format!(
        "Total: {} {noun} | Page {}/{}\n",
        p.total_tasks, p.current_page, p.total_pages
    ));
    out
}
