use std::path::PathBuf;

use clap::{Parser, Subcommand};
use taskr::backend::BackendKind;
use taskr::paginate::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use taskr::paths;

#[derive(Parser)]
#[command(name = "taskr", about = "Personal task tracker")]
pub struct Cli {
    /// Path to the task store [default: ~/.taskr/tasks.json]
    #[arg(long, env = paths::STORE_ENV, global = true)]
    pub store: Option<PathBuf>,

    /// Storage format [default: inferred from the store extension]
    #[arg(long, value_enum, env = paths::BACKEND_ENV, global = true)]
    pub backend: Option<BackendKind>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List tasks, one page at a time
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value_t = DEFAULT_PAGE, allow_negative_numbers = true)]
        page: i64,
        /// Tasks per page
        #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE, allow_negative_numbers = true)]
        size: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a task
    Create {
        /// Task title (1-100 characters)
        #[arg(short, long)]
        title: String,
        /// Task description (up to 500 characters)
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Show task details
    Show {
        /// Task ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a task's title and/or description
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description (pass "" to clear)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Change a task's status
    Status {
        /// Task ID
        id: String,
        /// New status (TODO, ONGOING, DONE)
        status: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Search tasks by keyword in title or description
    Search {
        /// Text to look for (case-insensitive); prompted for when omitted
        query: Option<String>,
        /// Page number (1-based)
        #[arg(short, long, default_value_t = DEFAULT_PAGE, allow_negative_numbers = true)]
        page: i64,
        /// Results per page
        #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE, allow_negative_numbers = true)]
        size: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse tasks interactively
    Browse {
        /// Tasks per page
        #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: i64,
        /// Poll interval in milliseconds
        #[arg(long, default_value = "500")]
        poll_interval: u64,
    },
}
