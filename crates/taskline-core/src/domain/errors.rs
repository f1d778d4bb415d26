//! Errors - エラー型
//!
//! 実行時エラーは `TaskExecutionError` の 1 種類のみ。
//! ドレインループが捕捉して ErrorObserver に渡し、ループ外には伝播させない。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TaskId;

/// Raised when a task's action fails.
#[derive(Debug, Error)]
pub enum TaskExecutionError {
    /// The action returned an error.
    #[error("{id} ({name}) failed: {source}")]
    Failed {
        id: TaskId,
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// The action panicked.
    #[error("{id} ({name}) panicked: {message}")]
    Panicked {
        id: TaskId,
        name: String,
        message: String,
    },

    /// The action was dropped before it reported a result (inline panic or
    /// runtime shutdown).
    #[error("{id} ({name}) aborted before completion")]
    Aborted { id: TaskId, name: String },
}

impl TaskExecutionError {
    pub fn task_id(&self) -> TaskId {
        match self {
            TaskExecutionError::Failed { id, .. }
            | TaskExecutionError::Panicked { id, .. }
            | TaskExecutionError::Aborted { id, .. } => *id,
        }
    }

    pub fn task_name(&self) -> &str {
        match self {
            TaskExecutionError::Failed { name, .. }
            | TaskExecutionError::Panicked { name, .. }
            | TaskExecutionError::Aborted { name, .. } => name,
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, TaskExecutionError::Panicked { .. })
    }
}

/// Diagnostic copy of the most recent failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastError {
    pub task_id: TaskId,
    pub name: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl LastError {
    pub fn from_error(err: &TaskExecutionError, at: DateTime<Utc>) -> Self {
        let message = match err {
            // `{:#}` keeps the whole anyhow context chain on one line
            TaskExecutionError::Failed { source, .. } => format!("{source:#}"),
            TaskExecutionError::Panicked { message, .. } => message.clone(),
            TaskExecutionError::Aborted { .. } => "aborted before completion".to_string(),
        };
        Self {
            task_id: err.task_id(),
            name: err.task_name().to_string(),
            message,
            at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn failed_display_includes_task_and_cause() {
        let err = TaskExecutionError::Failed {
            id: TaskId::new(3),
            name: "backup".to_string(),
            source: anyhow::anyhow!("disk full"),
        };
        assert_eq!(err.to_string(), "task-3 (backup) failed: disk full");
        assert!(!err.is_panic());
    }

    #[test]
    fn last_error_keeps_context_chain() {
        let source = Err::<(), _>(anyhow::anyhow!("connection reset"))
            .context("send notification")
            .unwrap_err();
        let err = TaskExecutionError::Failed {
            id: TaskId::new(9),
            name: "notify".to_string(),
            source,
        };
        let last = LastError::from_error(&err, Utc::now());
        assert_eq!(last.task_id, TaskId::new(9));
        assert_eq!(last.name, "notify");
        assert_eq!(last.message, "send notification: connection reset");
    }

    #[test]
    fn panicked_exposes_message() {
        let err = TaskExecutionError::Panicked {
            id: TaskId::new(1),
            name: "boom".to_string(),
            message: "index out of bounds".to_string(),
        };
        assert!(err.is_panic());
        assert_eq!(err.task_name(), "boom");
        let last = LastError::from_error(&err, Utc::now());
        assert_eq!(last.message, "index out of bounds");
    }
}
