//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **SchedulerBuilder**: 構築とワイヤリング
//! - **Scheduler**: submit / pending_count / clear の表面
//! - **DrainLoop**: キューが空になるまでタスクを 1 つずつ実行
//! - **SchedulerStatus**: 診断用スナップショット

pub mod builder;
pub mod config;
mod drain_loop;
pub mod scheduler;
pub mod status;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, SchedulerBuilder};
pub use self::config::{ConfigError, SchedulerConfig};
pub use self::scheduler::Scheduler;
pub use self::status::SchedulerStatus;
