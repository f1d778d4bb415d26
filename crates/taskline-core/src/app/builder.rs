//! SchedulerBuilder - スケジューラの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）: tokio ランタイムが無ければ build() でエラー

use std::sync::Arc;

use tokio::runtime::Handle;

use super::config::SchedulerConfig;
use super::scheduler::Scheduler;
use crate::ports::{ErrorObserver, TracingObserver};

/// Builds a [`Scheduler`].
///
/// # 使用例
/// ```ignore
/// let scheduler = SchedulerBuilder::new()
///     .name("ide-background")
///     .observer(|err: &TaskExecutionError| eprintln!("{err}"))
///     .build()?;
/// ```
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    observer: Option<Arc<dyn ErrorObserver>>,
    runtime: Option<Handle>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no tokio runtime available: build inside a runtime or pass one with `runtime()`")]
    NoRuntime,
}

impl SchedulerBuilder {
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
            observer: None,
            runtime: None,
        }
    }

    pub fn config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Where task failures go. Defaults to [`TracingObserver`].
    pub fn observer<O: ErrorObserver + 'static>(self, observer: O) -> Self {
        self.shared_observer(Arc::new(observer))
    }

    pub fn shared_observer(mut self, observer: Arc<dyn ErrorObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Runtime the drain loop is spawned on. Defaults to the current one.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn build(self) -> Result<Scheduler, BuildError> {
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| BuildError::NoRuntime)?,
        };
        let observer: Arc<dyn ErrorObserver> = match self.observer {
            Some(observer) => observer,
            None => Arc::new(TracingObserver),
        };
        Ok(Scheduler::from_parts(self.config, observer, runtime))
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::NoopObserver;

    #[test]
    fn build_outside_runtime_fails() {
        let result = SchedulerBuilder::new().build();
        assert!(matches!(result, Err(BuildError::NoRuntime)));
    }

    #[test]
    fn build_with_explicit_runtime() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let scheduler = SchedulerBuilder::new()
            .name("explicit")
            .observer(NoopObserver)
            .runtime(rt.handle().clone())
            .build()
            .unwrap();
        assert_eq!(scheduler.status().name, "explicit");
    }

    #[tokio::test]
    async fn build_picks_up_current_runtime() {
        let config = SchedulerConfig {
            name: "ambient".to_string(),
            ..SchedulerConfig::default()
        };
        let scheduler = SchedulerBuilder::new().config(config).build().unwrap();
        assert!(scheduler.is_idle());
        assert_eq!(scheduler.status().name, "ambient");
    }
}
