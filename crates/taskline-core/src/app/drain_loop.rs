//! DrainLoop - タスク実行ループ
//!
//! # フロー
//! 1. ロック内で pending キューの先頭を取り出す（空なら Idle にして終了）
//! 2. ロックを外してアクションを最後まで await
//! 3. 失敗なら ErrorObserver に通知し、カウンタと last-error を更新
//! 4. 1 に戻る
//!
//! 同時に実行されるアクションはスケジューラあたり常に 1 つ。

use std::any::Any;
use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinError;
use tracing::{Instrument, debug, info_span, warn};

use super::scheduler::Shared;
use crate::domain::{LastError, LoopState, PendingTask, Task, TaskExecutionError};
use crate::ports::TaskAction;

/// Spawn a drain loop. The caller must already have flipped the state to
/// `Draining` under the queue lock.
pub(crate) fn spawn(shared: Arc<Shared>) {
    let span = info_span!("drain", scheduler = %shared.config.name);
    let runtime = shared.runtime.clone();
    runtime.spawn(run(shared).instrument(span));
}

async fn run(shared: Arc<Shared>) {
    let mut guard = DrainGuard {
        shared: Some(Arc::clone(&shared)),
        current: None,
    };
    debug!("drain loop started");

    while let Some(task) = next_task(&shared) {
        let (task, action) = task.into_parts();
        debug!(task_id = %task.id, name = %task.name, priority = task.priority, "task started");

        guard.current = Some(task.clone());
        let result = execute(&shared, &task, action).await;
        guard.current = None;

        match result {
            Ok(()) => {
                shared.lock().succeeded += 1;
                debug!(task_id = %task.id, name = %task.name, "task finished");
            }
            Err(err) => report_failure(&shared, err),
        }
    }

    guard.disarm();
    debug!("drain loop idle");
}

/// Pop the next task, or flip to `Idle` if there is none.
///
/// The emptiness check and the flip share the lock `submit` takes, so a
/// concurrent submit either lands before the check (and is popped here) or
/// sees `Idle` and starts a new loop.
fn next_task(shared: &Shared) -> Option<Task> {
    let mut state = shared.lock();
    if let Some(task) = state.pending.pop() {
        return Some(task);
    }
    state.loop_state = LoopState::Idle;
    drop(state);
    shared.idle.notify_waiters();
    None
}

async fn execute(
    shared: &Shared,
    task: &PendingTask,
    action: Box<dyn TaskAction>,
) -> Result<(), TaskExecutionError> {
    if !shared.config.isolate_panics {
        return action.run().await.map_err(|source| TaskExecutionError::Failed {
            id: task.id,
            name: task.name.clone(),
            source,
        });
    }

    match shared.runtime.spawn(action.run()).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(TaskExecutionError::Failed {
            id: task.id,
            name: task.name.clone(),
            source,
        }),
        Err(err) if err.is_panic() => Err(TaskExecutionError::Panicked {
            id: task.id,
            name: task.name.clone(),
            message: panic_message(err),
        }),
        Err(_) => Err(TaskExecutionError::Aborted {
            id: task.id,
            name: task.name.clone(),
        }),
    }
}

fn report_failure(shared: &Shared, err: TaskExecutionError) {
    {
        let mut state = shared.lock();
        state.failed += 1;
        if shared.config.record_last_error {
            state.last_error = Some(LastError::from_error(&err, Utc::now()));
        }
    }
    shared.observer.on_error(&err);
}

fn panic_message(err: JoinError) -> String {
    let payload: Box<dyn Any + Send> = err.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Keeps the loop state honest if the drain future is dropped mid-task
/// (an inline action panicked, or the runtime is shutting down).
///
/// The interrupted task is reported as aborted; remaining tasks are handed to
/// a fresh loop, otherwise the state goes back to `Idle`.
struct DrainGuard {
    shared: Option<Arc<Shared>>,
    current: Option<PendingTask>,
}

impl DrainGuard {
    /// Normal exit: `next_task` already flipped the state.
    fn disarm(&mut self) {
        self.shared = None;
    }
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        let Some(shared) = self.shared.take() else {
            return;
        };

        if let Some(task) = self.current.take() {
            warn!(task_id = %task.id, name = %task.name, "drain loop dropped while task was running");
            report_failure(
                &shared,
                TaskExecutionError::Aborted {
                    id: task.id,
                    name: task.name,
                },
            );
        }

        let respawn = {
            let mut state = shared.lock();
            if state.pending.is_empty() {
                state.loop_state = LoopState::Idle;
                false
            } else {
                true
            }
        };

        if respawn {
            debug!("handing pending tasks to a new drain loop");
            spawn(shared);
        } else {
            shared.idle.notify_waiters();
        }
    }
}
