use serde::{Deserialize, Serialize};
use std::fmt;

use super::TaskId;
use crate::ports::TaskAction;

/// One unit of deferred work.
///
/// Owned by the pending queue until the drain loop takes it; dropped right after
/// its action completes.
pub struct Task {
    id: TaskId,
    name: String,
    priority: i32,
    action: Box<dyn TaskAction>,
}

impl Task {
    pub fn new(id: TaskId, name: String, priority: i32, action: Box<dyn TaskAction>) -> Self {
        Self {
            id,
            name,
            priority,
            action,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Descriptor without the action, for diagnostics.
    pub fn describe(&self) -> PendingTask {
        PendingTask {
            id: self.id,
            name: self.name.clone(),
            priority: self.priority,
        }
    }

    /// Split into the descriptor and the action to run.
    pub fn into_parts(self) -> (PendingTask, Box<dyn TaskAction>) {
        let Task {
            id,
            name,
            priority,
            action,
        } = self;
        (PendingTask { id, name, priority }, action)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Task descriptor (id, name, priority) without the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTask {
    pub id: TaskId,
    pub name: String,
    pub priority: i32,
}

impl fmt::Display for PendingTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, priority={})", self.id, self.name, self.priority)
    }
}
