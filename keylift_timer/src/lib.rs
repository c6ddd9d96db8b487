// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keylift Timer: an owned registry of deferred, cancelable tasks.
//!
//! The registry does not own a clock or a platform timer. Hosts hand it the
//! current timestamp (milliseconds on a monotonic clock of their choosing) when
//! scheduling, and later drain whatever is due with [`TimerRegistry::pop_due`].
//! That keeps every deferred step of a state machine an inspectable value and
//! makes tests deterministic: a "fake clock" is just a number.
//!
//! The task payload `T` is whatever the owner wants to run later, typically a
//! small enum naming the step.
//!
//! ## Minimal example
//!
//! ```rust
//! use keylift_timer::TimerRegistry;
//!
//! let mut timers: TimerRegistry<&str> = TimerRegistry::new();
//! timers.schedule("recheck", 1_000, 100);
//! let settle = timers.schedule("settle", 1_000, 150).unwrap();
//!
//! assert_eq!(timers.next_deadline(), Some(1_100));
//! assert!(timers.pop_due(1_050).is_none());
//!
//! timers.cancel(settle);
//! assert_eq!(timers.pop_due(2_000).map(|(_, task)| task), Some("recheck"));
//! assert!(timers.is_empty());
//! ```
//!
//! ## Cancellation guarantees
//!
//! - A task is removed from the registry *before* it is handed to the caller, so
//!   an owner that cancels in response to an earlier task in the same drain
//!   never sees the canceled one, even if its deadline had already passed.
//! - After [`TimerRegistry::dispose`], the registry is empty and refuses new
//!   work; [`TimerRegistry::schedule`] returns `None`.
//!
//! This crate is `no_std`.

#![no_std]

use core::num::NonZeroU64;

use smallvec::SmallVec;

/// Handle to a scheduled task.
///
/// Handles are unique for the lifetime of a registry and are never reused, so a
/// stale handle cannot cancel a newer task.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(NonZeroU64);

impl TimerId {
    /// Returns the raw handle value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

#[derive(Clone, Debug)]
struct Entry<T> {
    id: TimerId,
    deadline: u64,
    task: T,
}

/// Collection of outstanding deferred tasks.
///
/// Due tasks are released in deadline order; tasks sharing a deadline are
/// released in the order they were scheduled.
#[derive(Clone, Debug)]
pub struct TimerRegistry<T> {
    // Rarely more than two or three entries are live at once.
    entries: SmallVec<[Entry<T>; 4]>,
    next_id: u64,
    disposed: bool,
}

impl<T> TimerRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
            next_id: 1,
            disposed: false,
        }
    }

    /// Schedules `task` to become due at `now + delay`.
    ///
    /// Returns `None` once the registry has been disposed.
    pub fn schedule(&mut self, task: T, now: u64, delay: u64) -> Option<TimerId> {
        if self.disposed {
            tracing::trace!(delay, "schedule refused: registry disposed");
            return None;
        }
        let id = TimerId(NonZeroU64::new(self.next_id)?);
        self.next_id += 1;
        let deadline = now.saturating_add(delay);
        self.entries.push(Entry { id, deadline, task });
        tracing::trace!(timer = id.get(), deadline, "timer scheduled");
        Some(id)
    }

    /// Cancels a single task.
    ///
    /// Returns `true` if the task was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let Some(idx) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        self.entries.remove(idx);
        tracing::trace!(timer = id.get(), "timer canceled");
        true
    }

    /// Cancels every pending task. Safe to call when empty.
    pub fn cancel_all(&mut self) {
        if !self.entries.is_empty() {
            tracing::trace!(count = self.entries.len(), "timers canceled");
        }
        self.entries.clear();
    }

    /// Cancels everything and refuses further scheduling.
    ///
    /// Calling this more than once is harmless.
    pub fn dispose(&mut self) {
        self.cancel_all();
        self.disposed = true;
    }

    /// Whether [`TimerRegistry::dispose`] has been called.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether `id` is still pending.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no task is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending deadline, if any.
    ///
    /// Hosts use this to arm a single platform timer for the whole registry.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Removes and returns the earliest task whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerId, T)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.id))
            .map(|(idx, _)| idx)?;
        let entry = self.entries.remove(idx);
        tracing::trace!(timer = entry.id.get(), deadline = entry.deadline, now, "timer fired");
        Some((entry.id, entry.task))
    }
}

impl<T> Default for TimerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_tasks_come_out_in_deadline_order() {
        let mut timers = TimerRegistry::new();
        timers.schedule('c', 0, 300);
        timers.schedule('a', 0, 100);
        timers.schedule('b', 0, 200);

        assert_eq!(timers.pop_due(1_000).map(|(_, t)| t), Some('a'));
        assert_eq!(timers.pop_due(1_000).map(|(_, t)| t), Some('b'));
        assert_eq!(timers.pop_due(1_000).map(|(_, t)| t), Some('c'));
        assert_eq!(timers.pop_due(1_000), None);
    }

    #[test]
    fn equal_deadlines_keep_schedule_order() {
        let mut timers = TimerRegistry::new();
        timers.schedule(1_u8, 50, 50);
        timers.schedule(2_u8, 0, 100);

        assert_eq!(timers.pop_due(100).map(|(_, t)| t), Some(1));
        assert_eq!(timers.pop_due(100).map(|(_, t)| t), Some(2));
    }

    #[test]
    fn nothing_is_due_before_its_deadline() {
        let mut timers = TimerRegistry::new();
        timers.schedule((), 10, 100);

        assert!(timers.pop_due(109).is_none());
        assert!(timers.pop_due(110).is_some());
    }

    #[test]
    fn cancel_removes_only_the_named_task() {
        let mut timers = TimerRegistry::new();
        let a = timers.schedule('a', 0, 10).unwrap();
        let b = timers.schedule('b', 0, 10).unwrap();

        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        assert!(timers.is_pending(b));
        assert_eq!(timers.pop_due(10), Some((b, 'b')));
    }

    #[test]
    fn cancel_after_deadline_still_prevents_firing() {
        let mut timers = TimerRegistry::new();
        let first = timers.schedule("first", 0, 10).unwrap();
        let second = timers.schedule("second", 0, 20).unwrap();

        // Host wakes late; the first task cancels the second before it is drained.
        let (id, _) = timers.pop_due(500).unwrap();
        assert_eq!(id, first);
        timers.cancel(second);
        assert!(timers.pop_due(500).is_none());
    }

    #[test]
    fn cancel_all_is_safe_when_empty() {
        let mut timers: TimerRegistry<()> = TimerRegistry::new();
        timers.cancel_all();
        timers.schedule((), 0, 1);
        timers.cancel_all();
        timers.cancel_all();
        assert!(timers.is_empty());
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn dispose_refuses_new_work() {
        let mut timers = TimerRegistry::new();
        timers.schedule(1, 0, 10);
        timers.dispose();
        timers.dispose();

        assert!(timers.is_disposed());
        assert!(timers.is_empty());
        assert_eq!(timers.schedule(2, 0, 10), None);
        assert!(timers.pop_due(u64::MAX).is_none());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut timers = TimerRegistry::new();
        let a = timers.schedule((), 0, 1).unwrap();
        timers.cancel_all();
        let b = timers.schedule((), 0, 1).unwrap();

        assert_ne!(a, b);
        assert!(!timers.cancel(a));
        assert!(timers.is_pending(b));
    }

    #[test]
    fn deadline_saturates_instead_of_wrapping() {
        let mut timers = TimerRegistry::new();
        timers.schedule((), u64::MAX - 1, 100);
        assert_eq!(timers.next_deadline(), Some(u64::MAX));
    }
}
