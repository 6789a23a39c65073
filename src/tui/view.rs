use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use super::app::{App, Mode};
use crate::model::Status;

pub fn render(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    if app.show_detail {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);
        render_list(frame, app, chunks[0]);
        render_detail(frame, app, chunks[1]);
    } else {
        render_list(frame, app, rows[0]);
    }
    render_status_line(frame, app, rows[1]);

    if app.mode == Mode::Help {
        render_help(frame);
    }
}

fn status_style(status: Status) -> Style {
    match status {
        Status::Todo => Style::default().fg(Color::Yellow),
        Status::Ongoing => Style::default().fg(Color::Green),
        Status::Done => Style::default().fg(Color::DarkGray),
    }
}

fn list_title(app: &App) -> String {
    let p = &app.page.pagination;
    if app.query.is_empty() {
        format!(" Tasks  page {}/{}  ({} total) ", p.current_page, p.total_pages, p.total_tasks)
    } else {
        format!(
            " Search '{}'  page {}/{}  ({} results) ",
            app.query, p.current_page, p.total_pages, p.total_tasks
        )
    }
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .page
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let line = Line::from(vec![
                Span::styled(format!("{:>4} ", task.id), Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{} {:<7} ", task.icon(), task.status),
                    status_style(task.status),
                ),
                Span::styled(task.title.clone(), Style::default().bold()),
            ]);
            let item = ListItem::new(line);
            if i == app.cursor {
                item.style(Style::default().bg(Color::DarkGray))
            } else {
                item
            }
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title(list_title(app));
    if items.is_empty() {
        let empty = if app.query.is_empty() {
            "No tasks found.".to_string()
        } else {
            format!("No tasks found for '{}'", app.query)
        };
        frame.render_widget(
            Paragraph::new(empty)
                .style(Style::default().fg(Color::Yellow))
                .block(block),
            area,
        );
    } else {
        frame.render_widget(List::new(items).block(block), area);
    }
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(task) = app.selected() else {
        frame.render_widget(
            Block::default().borders(Borders::ALL).title(" Details "),
            area,
        );
        return;
    };

    let description = if task.description.is_empty() {
        Line::styled("(no description)", Style::default().fg(Color::DarkGray))
    } else {
        Line::raw(task.description.clone())
    };
    let text = vec![
        Line::from(Span::styled(task.title.clone(), Style::default().bold())),
        Line::from(vec![
            Span::raw("Status:  "),
            Span::styled(task.status.as_str(), status_style(task.status)),
        ]),
        Line::raw(format!("Created: {}", task.created_at.format("%Y-%m-%d %H:%M"))),
        Line::raw(""),
        description,
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Task #{} ", task.id)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.mode == Mode::Search {
        Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Cyan)),
            Span::raw(format!("{}_", app.input)),
        ])
    } else if let Some(err) = &app.error {
        Line::styled(err.clone(), Style::default().fg(Color::Red))
    } else {
        Line::styled(
            "q quit  / search  s status  n/p page  Enter details  ? help",
            Style::default().fg(Color::DarkGray),
        )
    };
    frame.render_widget(Paragraph::new(line), area);
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn render_help(frame: &mut Frame) {
    let term = frame.area();
    let width = 44.min(term.width.saturating_sub(4));
    let height = 13.min(term.height.saturating_sub(2));
    let area = centered_rect(width, height, term);

    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let keys = [
        ("j/Down  ", "Move down"),
        ("k/Up    ", "Move up"),
        ("n/Right ", "Next page"),
        ("p/Left  ", "Previous page"),
        ("/       ", "Search title and description"),
        ("s       ", "Cycle status TODO/ONGOING/DONE"),
        ("Enter   ", "Toggle details"),
        ("r       ", "Reload from disk"),
        ("?       ", "Toggle help"),
        ("q/Esc   ", "Quit"),
    ];
    let help_text: Vec<Line> = keys
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(*key, Style::default().fg(Color::Cyan)),
                Span::raw(*what),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(help_text), inner);
}
