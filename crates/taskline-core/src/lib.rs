//! taskline-core
//!
//! Priority task scheduler: runs submitted async actions one at a time,
//! highest priority first, FIFO among equal priorities, and keeps going past
//! failures.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（TaskId, Task, LoopState, TaskExecutionError）
//! - **ports**: 呼び出し側との境界（TaskAction, ErrorObserver）
//! - **queue**: 優先度順の pending キュー
//! - **app**: Scheduler 本体・ドレインループ・builder・config・status

pub mod app;
pub mod domain;
pub mod ports;
pub mod queue;

pub use app::{
    BuildError, ConfigError, Scheduler, SchedulerBuilder, SchedulerConfig, SchedulerStatus,
};
pub use domain::{LastError, LoopState, PendingTask, TaskExecutionError, TaskId};
pub use ports::{ErrorObserver, NoopObserver, TaskAction, TracingObserver};
