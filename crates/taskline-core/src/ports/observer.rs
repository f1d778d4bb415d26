//! ErrorObserver port - 実行エラーの通知先
//!
//! ドレインループは失敗をここに渡すだけで、ログ出力などの副作用は実装側が決める。
//!
//! # 実装
//! - **TracingObserver**: `tracing::warn!` で記録（デフォルト）
//! - **NoopObserver**: 何もしない
//! - `Fn(&TaskExecutionError)` クロージャ

use tracing::warn;

use crate::domain::TaskExecutionError;

/// Receives every task failure seen by the drain loop.
///
/// Called outside the queue lock, on the drain loop's task, so it should return
/// quickly.
pub trait ErrorObserver: Send + Sync {
    fn on_error(&self, err: &TaskExecutionError);
}

impl<F> ErrorObserver for F
where
    F: Fn(&TaskExecutionError) + Send + Sync,
{
    fn on_error(&self, err: &TaskExecutionError) {
        self(err)
    }
}

/// Logs failures as `warn` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ErrorObserver for TracingObserver {
    fn on_error(&self, err: &TaskExecutionError) {
        match err {
            TaskExecutionError::Failed { id, name, source } => {
                warn!(task_id = %id, name = %name, error = %format!("{source:#}"), "task failed");
            }
            TaskExecutionError::Panicked { id, name, message } => {
                warn!(task_id = %id, name = %name, panic = %message, "task panicked");
            }
            TaskExecutionError::Aborted { id, name } => {
                warn!(task_id = %id, name = %name, "task aborted");
            }
        }
    }
}

/// Drops failures silently.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ErrorObserver for NoopObserver {
    fn on_error(&self, _err: &TaskExecutionError) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    fn failure(name: &str) -> TaskExecutionError {
        TaskExecutionError::Failed {
            id: TaskId::new(1),
            name: name.to_string(),
            source: anyhow::anyhow!("disk full"),
        }
    }

    #[traced_test]
    #[test]
    fn tracing_observer_logs_failure() {
        TracingObserver.on_error(&failure("backup"));
        assert!(logs_contain("task failed"));
        assert!(logs_contain("disk full"));
    }

    #[test]
    fn closure_observer_receives_error() {
        let seen = Mutex::new(Vec::new());
        let observer = |err: &TaskExecutionError| {
            seen.lock().unwrap().push(err.task_name().to_string());
        };
        observer.on_error(&failure("notify"));
        assert_eq!(*seen.lock().unwrap(), vec!["notify".to_string()]);
    }
}
