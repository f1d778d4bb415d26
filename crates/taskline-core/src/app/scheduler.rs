//! Scheduler - 優先度付きタスクスケジューラ
//!
//! # 設計
//! - pending キュー・ID カウンタ・ループ状態を 1 つの Mutex で保護
//! - submit() はロック内でキューに積み、Idle なら Draining に切り替えてループを spawn
//! - ロックは await を跨がない（アクション実行中は保持しない）

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tracing::debug;

use super::builder::{BuildError, SchedulerBuilder};
use super::config::SchedulerConfig;
use super::drain_loop;
use super::status::SchedulerStatus;
use crate::domain::ids::TaskIdAllocator;
use crate::domain::{LastError, LoopState, PendingTask, Task, TaskId};
use crate::ports::{ErrorObserver, FnAction, TaskAction};
use crate::queue::PendingQueue;

/// Mutable state behind the queue lock.
pub(crate) struct SchedulerState {
    pub(crate) pending: PendingQueue,
    pub(crate) ids: TaskIdAllocator,
    pub(crate) loop_state: LoopState,
    pub(crate) succeeded: u64,
    pub(crate) failed: u64,
    pub(crate) last_error: Option<LastError>,
}

impl SchedulerState {
    fn new() -> Self {
        Self {
            pending: PendingQueue::new(),
            ids: TaskIdAllocator::new(),
            loop_state: LoopState::Idle,
            succeeded: 0,
            failed: 0,
            last_error: None,
        }
    }
}

/// State shared between scheduler handles and the drain loop.
pub(crate) struct Shared {
    state: Mutex<SchedulerState>,
    /// Woken every time the loop goes Draining -> Idle.
    pub(crate) idle: Notify,
    pub(crate) observer: Arc<dyn ErrorObserver>,
    pub(crate) runtime: Handle,
    pub(crate) config: SchedulerConfig,
}

impl Shared {
    /// Actions never run under this lock, so a poisoned guard only means a
    /// panic in our own bookkeeping; the state is still consistent.
    pub(crate) fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Priority task scheduler.
///
/// Tasks run one at a time, highest priority first, FIFO among equal
/// priorities. Cloning yields another handle to the same scheduler.
///
/// # Example
/// ```ignore
/// let scheduler = Scheduler::new()?;
/// scheduler.submit("backup", 1, || async { backup().await });
/// scheduler.submit("notify", 3, || async { notify().await });
/// scheduler.wait_idle().await;
/// ```
#[derive(Clone)]
pub struct Scheduler {
    shared: Arc<Shared>,
}

impl Scheduler {
    /// Scheduler with the default config on the current tokio runtime.
    pub fn new() -> Result<Self, BuildError> {
        SchedulerBuilder::new().build()
    }

    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::new()
    }

    pub(crate) fn from_parts(
        config: SchedulerConfig,
        observer: Arc<dyn ErrorObserver>,
        runtime: Handle,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SchedulerState::new()),
                idle: Notify::new(),
                observer,
                runtime,
                config,
            }),
        }
    }

    /// Queue an async closure. Returns immediately with the task's id.
    pub fn submit<F, Fut>(&self, name: impl Into<String>, priority: i32, action: F) -> TaskId
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.enqueue(name.into(), priority, Box::new(FnAction::new(action)))
    }

    /// Queue a [`TaskAction`]. Returns immediately with the task's id.
    pub fn submit_action<A: TaskAction>(
        &self,
        name: impl Into<String>,
        priority: i32,
        action: A,
    ) -> TaskId {
        self.enqueue(name.into(), priority, Box::new(action))
    }

    fn enqueue(&self, name: String, priority: i32, action: Box<dyn TaskAction>) -> TaskId {
        let (id, start_loop) = {
            let mut state = self.shared.lock();
            let id = state.ids.allocate();
            debug!(task_id = %id, name = %name, priority, "task submitted");
            state.pending.push(Task::new(id, name, priority, action));

            let start_loop = state.loop_state.is_idle();
            if start_loop {
                state.loop_state = LoopState::Draining;
            }
            (id, start_loop)
        };

        if start_loop {
            drain_loop::spawn(Arc::clone(&self.shared));
        }
        id
    }

    /// Tasks waiting to run, not counting the one executing.
    pub fn pending_count(&self) -> usize {
        self.shared.lock().pending.len()
    }

    /// Drop every pending task. The executing task is left alone.
    ///
    /// Returns the number of tasks dropped.
    pub fn clear(&self) -> usize {
        let dropped = self.shared.lock().pending.clear();
        debug!(dropped, "pending queue cleared");
        dropped
    }

    /// Pending tasks in the order they will run.
    pub fn pending_tasks(&self) -> Vec<PendingTask> {
        self.shared.lock().pending.snapshot()
    }

    pub fn is_idle(&self) -> bool {
        self.shared.lock().loop_state.is_idle()
    }

    pub fn last_error(&self) -> Option<LastError> {
        self.shared.lock().last_error.clone()
    }

    pub fn take_last_error(&self) -> Option<LastError> {
        self.shared.lock().last_error.take()
    }

    pub fn status(&self) -> SchedulerStatus {
        let state = self.shared.lock();
        SchedulerStatus {
            name: self.shared.config.name.clone(),
            state: state.loop_state,
            pending: state.pending.len(),
            submitted: state.ids.issued(),
            succeeded: state.succeeded,
            failed: state.failed,
            last_error: state.last_error.clone(),
        }
    }

    /// Resolves once the drain loop is idle. Returns at once if it already is.
    pub async fn wait_idle(&self) {
        let notified = self.shared.idle.notified();
        tokio::pin!(notified);
        // register before checking, so a transition in between is not missed
        notified.as_mut().enable();
        if self.is_idle() {
            return;
        }
        notified.await;
    }
}
