//! Status - スケジューラのスナップショット

use serde::{Deserialize, Serialize};

use crate::domain::{LastError, LoopState};

/// Point-in-time view of a scheduler, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStatus {
    pub name: String,
    pub state: LoopState,
    /// Tasks waiting to run (the executing one is not counted).
    pub pending: usize,
    pub submitted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub last_error: Option<LastError>,
}

impl SchedulerStatus {
    /// Tasks that have left the queue and finished, either way.
    pub fn completed(&self) -> u64 {
        self.succeeded + self.failed
    }
}
