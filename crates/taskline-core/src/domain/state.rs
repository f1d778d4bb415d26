//! State - ドレインループの状態
//!
//! # 状態遷移
//! - Idle -> Draining: submit() がキューロック内で切り替える
//! - Draining -> Idle: ループが空のキューを観測した時点で、同じロック内で切り替える
//!
//! 「空チェック」と「Idle への遷移」を submit と同じロックで行うことで、
//! Idle のままタスクが取り残されることはない。

use serde::{Deserialize, Serialize};

/// Drain loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// No drain loop is running.
    #[default]
    Idle,

    /// A drain loop is pulling and executing tasks.
    Draining,
}

impl LoopState {
    pub fn is_idle(self) -> bool {
        matches!(self, LoopState::Idle)
    }

    pub fn is_draining(self) -> bool {
        matches!(self, LoopState::Draining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert!(LoopState::default().is_idle());
        assert!(!LoopState::default().is_draining());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&LoopState::Draining).unwrap();
        assert_eq!(json, "\"draining\"");
    }
}
