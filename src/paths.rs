//! Default locations for the task store.

use std::path::PathBuf;

pub const STORE_ENV: &str = "TASKR_STORE";
pub const BACKEND_ENV: &str = "TASKR_BACKEND";
pub const LOG_ENV: &str = "TASKR_LOG";

/// Resolve the default store path: `$HOME/.taskr/tasks.json`, or
/// `./tasks.json` when HOME is unset.
pub fn default_store_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".taskr").join("tasks.json"),
        None => PathBuf::from("tasks.json"),
    }
}
