pub mod backend;
pub mod error;
pub mod model;
pub mod output;
pub mod paginate;
pub mod paths;
pub mod store;
pub mod tui;
pub mod validate;
pub mod watch;

pub use error::{Result, TaskError};
pub use model::{Status, Task, TaskId};
pub use store::{TaskStore, TaskUpdate};
