//! Ports - スケジューラと呼び出し側の境界
//!
//! - **TaskAction**: 呼び出し側が渡す作業本体
//! - **ErrorObserver**: 実行エラーの通知先（差し替え可能）

pub mod action;
pub mod observer;

pub use self::action::{FnAction, TaskAction};
pub use self::observer::{ErrorObserver, NoopObserver, TracingObserver};
