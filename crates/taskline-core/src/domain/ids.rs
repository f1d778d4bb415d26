//! Task identifiers.
//!
//! # 採番ルール
//! - スケジューラ単位で単調増加（pre-increment、最初の ID は 1）
//! - 再利用しない
//! - 同じ優先度同士では ID の小さい方（= 先に submit された方）が先に実行される

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a submitted task.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Per-scheduler id counter.
///
/// Lives inside the scheduler state, so it is only touched under the queue lock.
#[derive(Debug, Default)]
pub(crate) struct TaskIdAllocator {
    last: u64,
}

impl TaskIdAllocator {
    pub(crate) fn new() -> Self {
        Self { last: 0 }
    }

    /// Allocate the next id (pre-increment).
    pub(crate) fn allocate(&mut self) -> TaskId {
        self.last += 1;
        TaskId(self.last)
    }

    /// Number of ids handed out so far.
    pub(crate) fn issued(&self) -> u64 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_starts_at_one_and_increments() {
        let mut alloc = TaskIdAllocator::new();
        assert_eq!(alloc.allocate(), TaskId::new(1));
        assert_eq!(alloc.allocate(), TaskId::new(2));
        assert_eq!(alloc.allocate(), TaskId::new(3));
        assert_eq!(alloc.issued(), 3);
    }

    #[test]
    fn ids_order_by_submission() {
        let mut alloc = TaskIdAllocator::new();
        let first = alloc.allocate();
        let second = alloc.allocate();
        assert!(first < second);
    }

    #[test]
    fn display_has_task_prefix() {
        assert_eq!(TaskId::new(42).to_string(), "task-42");
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&TaskId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
