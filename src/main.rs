mod cli;

use std::io::{BufRead as _, IsTerminal, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use cli::{Cli, Command};
use taskr::backend::{self, BackendKind};
use taskr::{output, paths, tui, TaskId, TaskStore, TaskUpdate};

fn resolve_store_path(cli_store: Option<PathBuf>) -> PathBuf {
    cli_store.unwrap_or_else(paths::default_store_path)
}

fn ensure_store_dir(store_path: &Path) -> Result<()> {
    if let Some(parent) = store_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn open_store(store_path: &Path, kind: Option<BackendKind>) -> TaskStore {
    let kind = kind.unwrap_or_else(|| BackendKind::infer(store_path));
    TaskStore::from_boxed(backend::open(kind, store_path))
}

fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(paths::LOG_ENV, "warn"))
        .format_timestamp_secs()
        .init();
}

fn parse_id(raw: &str) -> Result<TaskId> {
    Ok(raw.parse::<TaskId>()?)
}

fn prompt_line(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Ask before deleting. Without a terminal there is nobody to ask, so
/// `--yes` is required.
fn confirm_delete(id: TaskId, yes: bool, stdin_is_terminal: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !stdin_is_terminal {
        bail!("refusing to delete task {id} without confirmation (pass --yes)");
    }
    let answer = prompt_line(&format!("Delete task #{id}? [y/N] "))?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn dispatch(store: &mut TaskStore, store_path: &Path, command: Command) -> Result<()> {
    match command {
        Command::List { page, size, json } => {
            let page = store.list(page, size)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else if page.tasks.is_empty() {
                println!("No tasks found.");
            } else {
                print!("{}", output::format_page(&page, "tasks"));
            }
        }

        Command::Create { title, description } => {
            let task = store.create(&title, &description)?;
            eprintln!("Created task #{}", task.id);
            print!("{}", output::format_task_detail(&task));
        }

        Command::Show { id, json } => {
            let task = store.get(parse_id(&id)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(task)?);
            } else {
                print!("{}", output::format_task_detail(task));
            }
        }

        Command::Update {
            id,
            title,
            description,
        } => {
            let changes = TaskUpdate { title, description };
            if changes.is_empty() {
                bail!("nothing to update: pass at least one of --title or --description");
            }
            let id = parse_id(&id)?;
            let task = store.update(id, changes)?;
            eprintln!("Updated task #{id}");
            print!("{}", output::format_task_detail(&task));
        }

        Command::Status { id, status } => {
            let id = parse_id(&id)?;
            let task = store.change_status(id, &status)?;
            eprintln!("Task #{id} is now {}", task.status);
        }

        Command::Delete { id, yes } => {
            let id = parse_id(&id)?;
            // Resolve first so a missing task is reported before prompting
            store.get(id)?;
            if !confirm_delete(id, yes, std::io::stdin().is_terminal())? {
                eprintln!("Aborted");
                return Ok(());
            }
            store.delete(id)?;
            eprintln!("Deleted task #{id}");
        }

        Command::Search {
            query,
            page,
            size,
            json,
        } => {
            let query = match query {
                Some(q) => q,
                None if std::io::stdin().is_terminal() => prompt_line("Search: ")?,
                None => String::new(),
            };
            let page = store.search(&query, page, size)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else if page.tasks.is_empty() {
                println!("No tasks found for '{query}'");
            } else {
                print!("{}", output::format_page(&page, "results"));
            }
        }

        Command::Browse {
            size,
            poll_interval,
        } => {
            tui::run(store, store_path, size, poll_interval)?;
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let store_path = resolve_store_path(cli.store);
    ensure_store_dir(&store_path)?;
    let mut store = open_store(&store_path, cli.backend);

    dispatch(&mut store, &store_path, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, PathBuf, TaskStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let store = open_store(&path, None);
        (dir, path, store)
    }

    fn run_cmd(store: &mut TaskStore, path: &Path, args: &[&str]) -> Result<()> {
        let cli = Cli::try_parse_from(std::iter::once("taskr").chain(args.iter().copied()))?;
        dispatch(store, path, cli.command)
    }

    #[test]
    fn create_then_update_via_commands() {
        let (_dir, path, mut store) = temp_store();
        run_cmd(&mut store, &path, &["create", "--title", "  Écrire  "]).unwrap();
        run_cmd(&mut store, &path, &["update", "1", "--description", "brouillon"]).unwrap();
        run_cmd(&mut store, &path, &["status", "1", "ONGOING"]).unwrap();

        let reopened = open_store(&path, None);
        let task = reopened.get(TaskId(1)).unwrap();
        assert_eq!(task.title, "Écrire");
        assert_eq!(task.description, "brouillon");
        assert_eq!(task.status.as_str(), "ONGOING");
    }

    #[test]
    fn update_requires_a_field() {
        let (_dir, path, mut store) = temp_store();
        run_cmd(&mut store, &path, &["create", "-t", "x"]).unwrap();
        let err = run_cmd(&mut store, &path, &["update", "1"]).unwrap_err();
        assert!(err.to_string().contains("--title or --description"));
    }

    #[test]
    fn errors_carry_store_messages() {
        let (_dir, path, mut store) = temp_store();
        let err = run_cmd(&mut store, &path, &["show", "abc"]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid ID format");
        let err = run_cmd(&mut store, &path, &["show", "9"]).unwrap_err();
        assert_eq!(err.to_string(), "Task not found");
        let err = run_cmd(&mut store, &path, &["list", "--size", "0"]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid page size");
        let err = run_cmd(&mut store, &path, &["list", "--size", "-1"]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid page size");
    }

    #[test]
    fn delete_with_yes() {
        let (_dir, path, mut store) = temp_store();
        run_cmd(&mut store, &path, &["create", "-t", "gone"]).unwrap();
        run_cmd(&mut store, &path, &["delete", "1", "--yes"]).unwrap();
        assert!(store.is_empty());
        let err = run_cmd(&mut store, &path, &["delete", "1", "--yes"]).unwrap_err();
        assert_eq!(err.to_string(), "Task not found");
    }

    #[test]
    fn delete_needs_confirmation_without_terminal() {
        assert!(confirm_delete(TaskId(1), true, false).unwrap());
        let err = confirm_delete(TaskId(1), false, false).unwrap_err();
        assert!(err.to_string().contains("--yes"));
    }

    #[test]
    fn yes_answers() {
        for a in ["y", "Y", "yes", " YES "] {
            assert!(is_yes(a), "{a}");
        }
        for a in ["", "n", "no", "yep"] {
            assert!(!is_yes(a), "{a}");
        }
    }

    #[test]
    fn backend_flag_overrides_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let mut store = open_store(&path, Some(BackendKind::Sqlite));
        store.create("in sqlite", "").unwrap();

        // Read back as JSON fails (it's a database), so it degrades to empty
        assert!(open_store(&path, Some(BackendKind::Json)).is_empty());
        assert_eq!(open_store(&path, Some(BackendKind::Sqlite)).len(), 1);
    }

    #[test]
    fn store_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("tasks.json");
        ensure_store_dir(&path).unwrap();
        assert!(path.parent().unwrap().is_dir());
        ensure_store_dir(Path::new("tasks.json")).unwrap();
    }
}
