//! TaskAction port - タスク本体の抽象化
//!
//! # 学習ポイント
//! - `self: Box<Self>` で一度きりの実行を型で表現（FnOnce 相当）
//! - クロージャは `FnAction` でラップして trait object にする

use std::future::Future;

use async_trait::async_trait;

/// Zero-argument, fallible, asynchronous unit of work.
///
/// Consumed by the drain loop when the task runs.
///
/// # Example
/// ```ignore
/// struct PersistProfile { profile: Profile }
///
/// #[async_trait]
/// impl TaskAction for PersistProfile {
///     async fn run(self: Box<Self>) -> anyhow::Result<()> {
///         store.save(&self.profile).await
///     }
/// }
/// ```
#[async_trait]
pub trait TaskAction: Send + 'static {
    async fn run(self: Box<Self>) -> anyhow::Result<()>;
}

/// Adapter from an async closure to [`TaskAction`].
pub struct FnAction<F> {
    f: F,
}

impl<F> FnAction<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> TaskAction for FnAction<F>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn run(self: Box<Self>) -> anyhow::Result<()> {
        (self.f)().await
    }
}
