use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::{Duration, sleep};
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskline_core::{Scheduler, SchedulerConfig, TaskAction};

#[derive(Debug, Deserialize)]
struct HelloPayload {
    name: String,
}

/// Greets, after failing a configurable number of times.
struct HelloAction {
    payload: Vec<u8>,
    remaining_failures: Arc<AtomicU32>,
}

#[async_trait]
impl TaskAction for HelloAction {
    async fn run(self: Box<Self>) -> anyhow::Result<()> {
        let p: HelloPayload = serde_json::from_slice(&self.payload).context("json decode")?;

        let left = self.remaining_failures.load(Ordering::Relaxed);
        if left > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            anyhow::bail!("intentional failure (left={left})");
        }

        println!("Hello, {}!", p.name);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // (A) 設定: 引数に JSON ファイルがあれば読む
    let config = match std::env::args().nth(1) {
        Some(path) => SchedulerConfig::from_json_file(&path)?,
        None => SchedulerConfig {
            name: "demo".to_string(),
            ..SchedulerConfig::default()
        },
    };
    let scheduler = Scheduler::builder().config(config).build()?;

    // (B) タスク投入: 実行順は notify -> cleanup -> backup
    scheduler.submit("backup", 1, || async {
        sleep(Duration::from_millis(20)).await;
        println!("backup done");
        Ok(())
    });
    scheduler.submit("notify", 3, || async {
        println!("notification sent");
        Ok(())
    });
    scheduler.submit("cleanup", 2, || async {
        println!("cleanup done");
        Ok(())
    });

    // (C) 失敗してもループは止まらない。リトライは呼び出し側が再投入する
    let failures = Arc::new(AtomicU32::new(1));
    let payload = serde_json::to_vec(&serde_json::json!({ "name": "taskline" }))?;
    for attempt in 1..=2 {
        let id = scheduler.submit_action(
            format!("hello#{attempt}"),
            0,
            HelloAction {
                payload: payload.clone(),
                remaining_failures: Arc::clone(&failures),
            },
        );
        info!(task_id = %id, attempt, "submitted hello");
        scheduler.wait_idle().await;
        if scheduler.take_last_error().is_none() {
            break;
        }
    }

    // (D) 完了を待って状態を表示
    scheduler.wait_idle().await;
    println!("{}", serde_json::to_string_pretty(&scheduler.status())?);

    Ok(())
}
