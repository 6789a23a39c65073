use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Creates a watcher for the store file and returns a receiver for change events.
/// The watcher must be kept alive for events to be received.
pub fn watch_store(store_path: &Path) -> Result<(RecommendedWatcher, Receiver<()>)> {
    let (tx, rx) = mpsc::channel();
    let file_name = store_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        let Ok(event) = res else {
            return;
        };
        // Reads of the store (including our own reload) must not wake us.
        if matches!(event.kind, EventKind::Access(_)) {
            return;
        }
        let relevant = event.paths.iter().any(|p| {
            p.file_name()
                .is_some_and(|n| is_store_file(&n.to_string_lossy(), &file_name))
        });
        if relevant {
            // Ignore send errors (receiver dropped)
            let _ = tx.send(());
        }
    })
    .context("failed to create file watcher")?;

    // Watch the parent directory since saves replace the file by rename
    let watch_path = match store_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    watcher
        .watch(watch_path, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", watch_path.display()))?;

    Ok((watcher, rx))
}

/// Whether `name` is the store file or its SQLite write-ahead log. Other
/// files in the directory (temp files, other stores) are ignored.
fn is_store_file(name: &str, store_name: &str) -> bool {
    match name.strip_prefix(store_name) {
        Some(rest) => rest.is_empty() || rest == "-wal",
        None => false,
    }
}

/// Waits for a store change event with timeout.
/// Returns true if an event was received, false on timeout.
pub fn wait_for_change(rx: &Receiver<()>, timeout: Duration) -> bool {
    rx.recv_timeout(timeout).is_ok()
}

/// Drains any pending events from the receiver.
pub fn drain_events(rx: &Receiver<()>) {
    while rx.try_recv().is_ok() {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_channel() {
        let (tx, rx) = mpsc::channel();
        tx.send(()).unwrap();
        tx.send(()).unwrap();
        drain_events(&rx);
        assert!(!wait_for_change(&rx, Duration::ZERO));
    }

    #[test]
    fn only_the_store_and_its_wal_count() {
        assert!(is_store_file("tasks.db", "tasks.db"));
        assert!(is_store_file("tasks.db-wal", "tasks.db"));
        assert!(!is_store_file("other.db-wal", "tasks.db"));
        assert!(!is_store_file("tasks.db-shm", "tasks.db"));
        assert!(!is_store_file(".tmpAbc123", "tasks.db"));
        assert!(!is_store_file("tasks", "tasks.db"));
    }

    #[test]
    fn reading_the_store_is_not_a_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "[]").unwrap();

        let (_watcher, rx) = watch_store(&path).unwrap();
        std::thread::sleep(Duration::from_millis(300));
        drain_events(&rx);

        std::fs::read_to_string(&path).unwrap();
        assert!(!wait_for_change(&rx, Duration::from_millis(500)));
    }

    #[test]
    fn writing_the_store_is_a_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "[]").unwrap();

        let (_watcher, rx) = watch_store(&path).unwrap();
        std::thread::sleep(Duration::from_millis(300));
        drain_events(&rx);

        std::fs::write(&path, "[ ]").unwrap();
        assert!(wait_for_change(&rx, Duration::from_secs(2)));
    }

    #[test]
    fn watching_a_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("tasks.json");
        assert!(watch_store(&path).is_err());
    }
}
