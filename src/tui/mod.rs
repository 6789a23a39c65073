//! Interactive browser over the task store.

mod app;
mod event;
mod view;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self as ct_event, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use log::debug;
use ratatui::prelude::*;

use crate::store::TaskStore;
use crate::watch;
use app::App;
use event::KeyAction;

pub fn run(
    store: &mut TaskStore,
    store_path: &Path,
    page_size: i64,
    poll_interval: u64,
) -> Result<()> {
    let mut app = App::new(store, page_size)?;

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, store, store_path, poll_interval);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &mut TaskStore,
    store_path: &Path,
    poll_interval: u64,
) -> Result<()> {
    let poll_duration = Duration::from_millis(poll_interval);

    // Set up file watcher
    let (_watcher, rx) = watch::watch_store(store_path)?;

    loop {
        terminal.draw(|frame| view::render(frame, app))?;

        if ct_event::poll(poll_duration)? {
            if let Event::Key(key) = ct_event::read()? {
                if key.kind == KeyEventKind::Press {
                    match event::handle_key(app, key) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Refresh => app.refresh(store)?,
                        KeyAction::Reload => {
                            store.reload();
                            app.refresh(store)?;
                        }
                        KeyAction::CycleStatus => app.cycle_status(store)?,
                        KeyAction::Continue => {}
                    }
                }
            }
        }

        // Our own saves also land here; reloading them is harmless.
        if watch::wait_for_change(&rx, Duration::ZERO) {
            watch::drain_events(&rx);
            debug!("store changed on disk, reloading");
            store.reload();
            app.refresh(store)?;
        }
    }
}
