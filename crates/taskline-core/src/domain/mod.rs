//! Domain model (ids, tasks, loop state, errors).

pub mod errors;
pub mod ids;
pub mod state;
pub mod task;

pub use errors::{LastError, TaskExecutionError};
pub use ids::TaskId;
pub use state::LoopState;
pub use task::{PendingTask, Task};
