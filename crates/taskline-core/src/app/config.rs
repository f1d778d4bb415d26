//! SchedulerConfig - スケジューラの設定
//!
//! すべてのフィールドにデフォルトがあるので、JSON では必要な項目だけ書けばよい。
//!
//! ```json
//! { "name": "ide-background", "isolate_panics": false }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Instance label, attached to the drain loop's tracing span.
    pub name: String,

    /// Keep the most recent failure in the last-error slot.
    pub record_last_error: bool,

    /// Run each action in its own tokio task so a panic is reported as a task
    /// failure. When off, actions are awaited inline on the drain loop.
    pub isolate_panics: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            name: "scheduler".to_string(),
            record_last_error: true,
            isolate_panics: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SchedulerConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
