//! Deterministic one-shot timers
//!
//! Stands in for host timers (spawn cadence, enemy fire). Every entry has a
//! handle which its owner keeps so it can be cancelled when the owner goes
//! away. Repeating behavior is a callback that re-arms itself and stores the
//! new handle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Handle to a pending timer entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// What to do when a timer comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerTask {
    /// Spawn one enemy and re-arm the spawn schedule
    SpawnEnemy,
    /// Enemy with this id fires and re-arms its fire schedule
    EnemyFire { enemy_id: u32 },
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Due {
    pub handle: TimerHandle,
    /// Scheduled time; callbacks re-arm relative to this, not the frame time
    pub at_ms: f64,
    pub task: TimerTask,
}

/// Ordering key: due time (as ordered bits) then handle, so ties fire in
/// creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct DueKey {
    due_bits: u64,
    handle: TimerHandle,
}

/// Pending timers ordered by due time
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: BTreeMap<DueKey, TimerTask>,
    /// handle -> due bits, for O(log n) cancel
    index: BTreeMap<TimerHandle, u64>,
    next_handle: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot timer that comes due at `due_ms`
    pub fn schedule_at(&mut self, due_ms: f64, task: TimerTask) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let due_bits = order_bits(due_ms);
        self.queue.insert(DueKey { due_bits, handle }, task);
        self.index.insert(handle, due_bits);
        handle
    }

    /// Cancel a pending timer; false if it already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.index.remove(&handle) {
            Some(due_bits) => self.queue.remove(&DueKey { due_bits, handle }).is_some(),
            None => false,
        }
    }

    /// Pop the earliest timer due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<Due> {
        let limit = order_bits(now_ms);
        let (&key, _) = self.queue.first_key_value()?;
        if key.due_bits > limit {
            return None;
        }
        let task = self.queue.remove(&key)?;
        self.index.remove(&key.handle);
        Some(Due {
            handle: key.handle,
            at_ms: f64::from_bits(key.due_bits),
            task,
        })
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.index.contains_key(&handle)
    }

    /// Number of pending timers
    pub fn active(&self) -> usize {
        self.queue.len()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.queue.clear();
        self.index.clear();
    }

    /// Push every pending timer `delta_ms` later, keeping relative order
    pub fn postpone(&mut self, delta_ms: f64) {
        if !(delta_ms > 0.0) {
            return;
        }
        let queue = std::mem::take(&mut self.queue);
        self.index.clear();
        for (key, task) in queue {
            let due_bits = order_bits(f64::from_bits(key.due_bits) + delta_ms);
            self.queue.insert(
                DueKey {
                    due_bits,
                    handle: key.handle,
                },
                task,
            );
            self.index.insert(key.handle, due_bits);
        }
    }

    /// Earliest pending due time
    pub fn next_due(&self) -> Option<f64> {
        self.queue
            .first_key_value()
            .map(|(key, _)| f64::from_bits(key.due_bits))
    }
}

/// Non-negative finite f64s order the same as their bit patterns
fn order_bits(ms: f64) -> u64 {
    if ms.is_nan() || ms <= 0.0 {
        0.0f64.to_bits()
    } else {
        ms.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut sched = Scheduler::new();
        sched.schedule_at(300.0, TimerTask::SpawnEnemy);
        sched.schedule_at(100.0, TimerTask::EnemyFire { enemy_id: 1 });
        sched.schedule_at(200.0, TimerTask::EnemyFire { enemy_id: 2 });

        assert!(sched.pop_due(50.0).is_none());
        let due = sched.pop_due(1000.0).unwrap();
        assert_eq!(due.task, TimerTask::EnemyFire { enemy_id: 1 });
        assert_eq!(due.at_ms, 100.0);
        let due = sched.pop_due(1000.0).unwrap();
        assert_eq!(due.task, TimerTask::EnemyFire { enemy_id: 2 });
        let due = sched.pop_due(1000.0).unwrap();
        assert_eq!(due.task, TimerTask::SpawnEnemy);
        assert_eq!(due.at_ms, 300.0);
        assert!(sched.pop_due(1000.0).is_none());
    }

    #[test]
    fn test_ties_fire_in_creation_order() {
        let mut sched = Scheduler::new();
        let a = sched.schedule_at(100.0, TimerTask::EnemyFire { enemy_id: 7 });
        let b = sched.schedule_at(100.0, TimerTask::EnemyFire { enemy_id: 3 });
        assert_eq!(sched.pop_due(100.0).unwrap().handle, a);
        assert_eq!(sched.pop_due(100.0).unwrap().handle, b);
    }

    #[test]
    fn test_cancel_is_exactly_once() {
        let mut sched = Scheduler::new();
        let h = sched.schedule_at(100.0, TimerTask::SpawnEnemy);
        assert!(sched.is_pending(h));
        assert!(sched.cancel(h));
        assert!(!sched.cancel(h));
        assert_eq!(sched.active(), 0);
        assert!(sched.pop_due(1e9).is_none());
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut sched = Scheduler::new();
        let h = sched.schedule_at(10.0, TimerTask::SpawnEnemy);
        assert!(sched.pop_due(10.0).is_some());
        assert!(!sched.cancel(h));
    }

    #[test]
    fn test_postpone_shifts_everything() {
        let mut sched = Scheduler::new();
        let a = sched.schedule_at(100.0, TimerTask::SpawnEnemy);
        let b = sched.schedule_at(250.0, TimerTask::EnemyFire { enemy_id: 4 });
        sched.postpone(1000.0);
        assert!(sched.pop_due(1099.0).is_none());
        assert_eq!(sched.next_due(), Some(1100.0));

        // Handles survive so owners can still cancel
        assert!(sched.cancel(b));
        let due = sched.pop_due(1100.0).unwrap();
        assert_eq!(due.handle, a);
        assert_eq!(due.at_ms, 1100.0);
        assert_eq!(sched.active(), 0);
    }

    #[test]
    fn test_postpone_ignores_non_positive() {
        let mut sched = Scheduler::new();
        sched.schedule_at(100.0, TimerTask::SpawnEnemy);
        sched.postpone(-50.0);
        sched.postpone(f64::NAN);
        assert_eq!(sched.next_due(), Some(100.0));
    }

    #[test]
    fn test_next_due_and_clear() {
        let mut sched = Scheduler::new();
        assert_eq!(sched.next_due(), None);
        sched.schedule_at(2500.0, TimerTask::SpawnEnemy);
        sched.schedule_at(1200.5, TimerTask::SpawnEnemy);
        assert_eq!(sched.next_due(), Some(1200.5));
        sched.clear();
        assert_eq!(sched.active(), 0);
    }
}
