//! Pending queue: tasks ordered by priority, FIFO within a priority.

use std::collections::VecDeque;

use crate::domain::{PendingTask, Task};

/// Ordered collection of tasks waiting for the drain loop.
///
/// Invariant: sorted by priority descending; among equal priorities, by
/// insertion order. Insertion goes right after the last task whose priority is
/// `>=` the new one, which yields the same order as push + stable sort.
#[derive(Debug, Default)]
pub struct PendingQueue {
    tasks: VecDeque<Task>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    pub fn push(&mut self, task: Task) {
        debug_assert!(
            self.tasks.iter().all(|t| t.id() != task.id()),
            "duplicate task id in pending queue"
        );
        let priority = task.priority();
        let at = self.tasks.partition_point(|t| t.priority() >= priority);
        self.tasks.insert(at, task);
    }

    /// Remove the highest-priority, earliest-submitted task.
    pub fn pop(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    pub fn peek(&self) -> Option<&Task> {
        self.tasks.front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drop every pending task. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let n = self.tasks.len();
        self.tasks.clear();
        n
    }

    /// Descriptors in execution order.
    pub fn snapshot(&self) -> Vec<PendingTask> {
        self.tasks.iter().map(Task::describe).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use crate::ports::FnAction;
    use rstest::rstest;

    fn task(id: u64, name: &str, priority: i32) -> Task {
        Task::new(
            TaskId::new(id),
            name.to_string(),
            priority,
            Box::new(FnAction::new(|| async { anyhow::Ok(()) })),
        )
    }

    fn names(queue: &PendingQueue) -> Vec<String> {
        queue.snapshot().into_iter().map(|t| t.name).collect()
    }

    #[test]
    fn orders_by_priority_descending() {
        let mut queue = PendingQueue::new();
        queue.push(task(1, "backup", 1));
        queue.push(task(2, "notify", 3));
        queue.push(task(3, "cleanup", 2));
        assert_eq!(names(&queue), vec!["notify", "cleanup", "backup"]);
    }

    #[rstest]
    #[case::same_priority(&[5, 5, 5], &["t1", "t2", "t3"])]
    #[case::negative(&[-1, 0, -1], &["t2", "t1", "t3"])]
    #[case::mixed(&[2, 7, 2, 7, 1], &["t2", "t4", "t1", "t3", "t5"])]
    #[case::ascending(&[1, 2, 3], &["t3", "t2", "t1"])]
    fn equal_priorities_keep_submission_order(
        #[case] priorities: &[i32],
        #[case] expected: &[&str],
    ) {
        let mut queue = PendingQueue::new();
        for (i, p) in priorities.iter().enumerate() {
            let id = i as u64 + 1;
            queue.push(task(id, &format!("t{id}"), *p));
        }
        assert_eq!(names(&queue), expected);
    }

    #[test]
    fn matches_stable_sort() {
        let priorities = [3, -2, 3, 0, 9, 0, -2, 9, 3, 1];
        let mut queue = PendingQueue::new();
        for (i, p) in priorities.iter().enumerate() {
            queue.push(task(i as u64 + 1, "t", *p));
        }

        let mut expected: Vec<(u64, i32)> = priorities
            .iter()
            .enumerate()
            .map(|(i, p)| (i as u64 + 1, *p))
            .collect();
        // sort_by is stable
        expected.sort_by(|a, b| b.1.cmp(&a.1));

        let actual: Vec<(u64, i32)> = queue
            .snapshot()
            .into_iter()
            .map(|t| (t.id.as_u64(), t.priority))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn pop_takes_head_and_clear_empties() {
        let mut queue = PendingQueue::new();
        queue.push(task(1, "low", 1));
        queue.push(task(2, "high", 10));
        assert_eq!(queue.peek().map(Task::id), Some(TaskId::new(2)));

        let head = queue.pop().unwrap();
        assert_eq!(head.name(), "high");
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.clear(), 1);
        assert!(queue.is_empty());
        assert!(queue.pop().is_none());
    }
}
