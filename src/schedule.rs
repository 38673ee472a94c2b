//! Deferred task queue.
//!
//! Work scheduled several times before the next tick runs only once.
//! The host drains the queue at its tick boundary (after the current
//! event has been handled), so tasks always observe the final state of
//! the gesture that scheduled them.

/// A queue of pending tasks, deduplicated until the next flush.
#[derive(Debug, Clone)]
pub struct TaskQueue<T> {
    pending: Vec<T>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T: PartialEq> TaskQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task for the next tick.
    ///
    /// Returns `false` if an equal task is already pending.
    pub fn schedule(&mut self, task: T) -> bool {
        if self.pending.contains(&task) {
            return false;
        }
        self.pending.push(task);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take all pending tasks in scheduling order.
    pub fn drain(&mut self) -> Vec<T> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_once_per_tick() {
        let mut queue = TaskQueue::new();
        assert!(queue.schedule("merge"));
        assert!(!queue.schedule("merge"));
        assert!(queue.schedule("redraw"));

        assert_eq!(queue.drain(), vec!["merge", "redraw"]);
        assert!(queue.is_empty());

        // A new tick accepts the task again
        assert!(queue.schedule("merge"));
    }
}
