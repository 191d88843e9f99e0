// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Delayed-task table drained once per frame
//!
//! Evictions schedule a cleanup for `now + T_FLIGHT`. Instead of a
//! fire-and-forget timer, each task is a `(fire_at, entity, generation)`
//! record kept in a min-heap. The frame loop drains every task that is due;
//! the consumer compares the captured generation with the entity's current
//! one, so a task whose entity was recycled in the meantime is simply
//! dropped.
//!
//! Tasks that share a fire time come out in scheduling order. No other
//! ordering between entities is promised.

use crate::entity::EntityId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/// A cleanup scheduled for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayedTask {
    /// Pool clock time at which the task becomes due
    pub fire_at: Duration,
    /// Entity the task is about
    pub entity: EntityId,
    /// Entity generation captured when the task was scheduled
    pub generation: u32,
    seq: u64,
}

// Reversed so that BinaryHeap (a max-heap) pops the earliest task first.
impl Ord for DelayedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for DelayedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of delayed tasks keyed by fire time
///
/// # Examples
///
/// ```
/// use actor_pool::scheduler::DelayedTaskQueue;
/// use actor_pool::EntityId;
/// use std::time::Duration;
///
/// let mut queue = DelayedTaskQueue::new();
/// queue.schedule(Duration::from_millis(100), EntityId::new(3), 1);
/// assert!(queue.drain_due(Duration::from_millis(50)).is_empty());
/// assert_eq!(queue.drain_due(Duration::from_millis(100)).len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DelayedTaskQueue {
    tasks: BinaryHeap<DelayedTask>,
    next_seq: u64,
}

impl DelayedTaskQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task for `entity` at `fire_at`
    pub fn schedule(&mut self, fire_at: Duration, entity: EntityId, generation: u32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(DelayedTask {
            fire_at,
            entity,
            generation,
            seq,
        });
    }

    /// Remove and return every task with `fire_at <= now`, earliest first
    pub fn drain_due(&mut self, now: Duration) -> Vec<DelayedTask> {
        let mut due = Vec::new();
        while let Some(task) = self.tasks.peek() {
            if task.fire_at > now {
                break;
            }
            if let Some(task) = self.tasks.pop() {
                due.push(task);
            }
        }
        due
    }

    /// Fire time of the earliest pending task
    pub fn next_due(&self) -> Option<Duration> {
        self.tasks.peek().map(|t| t.fire_at)
    }

    /// Number of pending tasks, stale ones included
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = DelayedTaskQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.next_due(), None);
        assert!(queue.drain_due(ms(1_000)).is_empty());
    }

    #[test]
    fn test_drains_in_fire_order() {
        let mut queue = DelayedTaskQueue::new();
        queue.schedule(ms(300), EntityId::new(3), 0);
        queue.schedule(ms(100), EntityId::new(1), 0);
        queue.schedule(ms(200), EntityId::new(2), 0);
        assert_eq!(queue.next_due(), Some(ms(100)));

        let due = queue.drain_due(ms(250));
        let ids: Vec<u64> = due.iter().map(|t| t.entity.raw()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_ties_keep_scheduling_order() {
        let mut queue = DelayedTaskQueue::new();
        for id in [5, 2, 9] {
            queue.schedule(ms(100), EntityId::new(id), 0);
        }
        let ids: Vec<u64> = queue.drain_due(ms(100)).iter().map(|t| t.entity.raw()).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn test_generation_is_carried() {
        let mut queue = DelayedTaskQueue::new();
        queue.schedule(ms(10), EntityId::new(1), 7);
        let task = queue.drain_due(ms(10))[0];
        assert_eq!(task.generation, 7);
        assert_eq!(task.fire_at, ms(10));
    }

    #[test]
    fn test_clear() {
        let mut queue = DelayedTaskQueue::new();
        queue.schedule(ms(10), EntityId::new(1), 0);
        queue.clear();
        assert!(queue.is_empty());
    }
}
