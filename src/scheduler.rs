//! Tick scheduling
//!
//! Timers never sleep or spawn threads. They ask a [`Scheduler`] for a
//! one-shot callback and get back a [`TickHandle`]; the host later delivers
//! that handle to the timer when the deadline passes. Two implementations:
//!
//! - [`DeadlineScheduler`] uses wall-clock `Instant`s and is polled by the
//!   terminal event loop.
//! - [`ManualScheduler`] keeps virtual time that only moves when told to,
//!   which makes timer behavior deterministic under test.
//!
//! A running timer chains its ticks with [`Scheduler::schedule_next`], which
//! counts from the deadline of the tick just delivered rather than from the
//! moment it was delivered. Ticks held back while the host was blocked come
//! due immediately afterwards, so no running time is lost.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Opaque identifier for one scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u64);

impl TickHandle {
    /// Raw id, for logging
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Capability to schedule and cancel one-shot ticks
pub trait Scheduler {
    /// Schedule a tick `delay` from now
    fn schedule_after(&mut self, delay: Duration) -> TickHandle;

    /// Schedule the tick following `previous`, `delay` after the deadline
    /// `previous` was due at. Falls back to `schedule_after` when that
    /// deadline is unknown.
    fn schedule_next(&mut self, _previous: TickHandle, delay: Duration) -> TickHandle {
        self.schedule_after(delay)
    }

    /// Cancel a previously scheduled tick. Unknown or already-fired handles
    /// are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

/// Table of outstanding ticks keyed by a monotonic deadline type
#[derive(Debug)]
struct PendingTicks<T> {
    next_id: u64,
    entries: Vec<(TickHandle, T)>,
    /// Deadlines of the last batch taken by `take_due`
    fired: HashMap<TickHandle, T>,
}

impl<T: Copy + Ord> PendingTicks<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
            fired: HashMap::new(),
        }
    }

    fn insert(&mut self, deadline: T) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id += 1;
        self.entries.push((handle, deadline));
        handle
    }

    fn remove(&mut self, handle: TickHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _)| *h != handle);
        self.entries.len() != before
    }

    /// Remove and return every handle due at `now`, earliest first
    fn take_due(&mut self, now: T) -> Vec<TickHandle> {
        self.fired.clear();
        let mut due: Vec<(TickHandle, T)> = Vec::new();
        self.entries.retain(|&(handle, deadline)| {
            if deadline <= now {
                due.push((handle, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(handle, deadline)| (deadline, handle));
        self.fired.extend(due.iter().copied());
        due.into_iter().map(|(handle, _)| handle).collect()
    }

    /// Deadline a handle from the last batch was due at
    fn fired_deadline(&mut self, handle: TickHandle) -> Option<T> {
        self.fired.remove(&handle)
    }

    fn next_deadline(&self) -> Option<T> {
        self.entries.iter().map(|&(_, deadline)| deadline).min()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Wall-clock scheduler polled by the host event loop
#[derive(Debug)]
pub struct DeadlineScheduler {
    pending: PendingTicks<Instant>,
}

impl DeadlineScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self {
            pending: PendingTicks::new(),
        }
    }

    /// Take every tick whose deadline has passed
    pub fn poll_due(&mut self, now: Instant) -> Vec<TickHandle> {
        self.pending.take_due(now)
    }

    /// Time until the earliest outstanding tick, if any
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.pending
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Number of outstanding ticks
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for DeadlineScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for DeadlineScheduler {
    fn schedule_after(&mut self, delay: Duration) -> TickHandle {
        self.pending.insert(Instant::now() + delay)
    }

    fn schedule_next(&mut self, previous: TickHandle, delay: Duration) -> TickHandle {
        let base = self
            .pending
            .fired_deadline(previous)
            .unwrap_or_else(Instant::now);
        self.pending.insert(base + delay)
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.pending.remove(handle);
    }
}

/// Virtual-time scheduler for deterministic tests and replay
#[derive(Debug)]
pub struct ManualScheduler {
    now: Duration,
    pending: PendingTicks<Duration>,
    cancelled: usize,
}

impl ManualScheduler {
    /// Create a scheduler at virtual time zero
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            pending: PendingTicks::new(),
            cancelled: 0,
        }
    }

    /// Move virtual time forward and take every tick that became due
    pub fn advance(&mut self, by: Duration) -> Vec<TickHandle> {
        self.now += by;
        self.pending.take_due(self.now)
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of outstanding ticks
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of cancel calls that removed an outstanding tick
    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&mut self, delay: Duration) -> TickHandle {
        self.pending.insert(self.now + delay)
    }

    fn schedule_next(&mut self, previous: TickHandle, delay: Duration) -> TickHandle {
        let base = self.pending.fired_deadline(previous).unwrap_or(self.now);
        self.pending.insert(base + delay)
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.pending.remove(handle) {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_manual_scheduler_fires_when_due() {
        let mut sched = ManualScheduler::new();
        let handle = sched.schedule_after(SECOND);

        assert!(sched.advance(Duration::from_millis(999)).is_empty());
        assert_eq!(sched.advance(Duration::from_millis(1)), vec![handle]);
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn test_manual_scheduler_cancel() {
        let mut sched = ManualScheduler::new();
        let handle = sched.schedule_after(SECOND);
        sched.cancel(handle);
        sched.cancel(handle);

        assert_eq!(sched.cancelled_count(), 1);
        assert!(sched.advance(SECOND * 5).is_empty());
    }

    #[test]
    fn test_handles_are_unique_and_ordered_by_deadline() {
        let mut sched = ManualScheduler::new();
        let late = sched.schedule_after(SECOND * 2);
        let early = sched.schedule_after(SECOND);
        assert_ne!(late, early);

        assert_eq!(sched.advance(SECOND * 3), vec![early, late]);
    }

    #[test]
    fn test_deadline_scheduler_poll() {
        let mut sched = DeadlineScheduler::new();
        let handle = sched.schedule_after(Duration::from_millis(10));
        assert_eq!(sched.pending_count(), 1);

        let now = Instant::now();
        assert!(sched.time_until_next(now).is_some());
        assert_eq!(sched.poll_due(now + SECOND), vec![handle]);
        assert!(sched.time_until_next(now).is_none());
    }

    #[test]
    fn test_schedule_next_counts_from_previous_deadline() {
        let mut sched = ManualScheduler::new();
        let first = sched.schedule_after(SECOND);
        assert_eq!(sched.advance(SECOND * 4), vec![first]);

        let second = sched.schedule_next(first, SECOND);
        assert_eq!(sched.advance(Duration::ZERO), vec![second]);
        let third = sched.schedule_next(second, SECOND);
        assert_eq!(sched.advance(Duration::ZERO), vec![third]);
        let fourth = sched.schedule_next(third, SECOND);
        assert_eq!(sched.advance(Duration::ZERO), vec![fourth]);

        // Caught up: the next deadline is in the future again
        let fifth = sched.schedule_next(fourth, SECOND);
        assert!(sched.advance(Duration::ZERO).is_empty());
        assert_eq!(sched.advance(SECOND), vec![fifth]);
    }

    #[test]
    fn test_schedule_next_unknown_handle_counts_from_now() {
        let mut sched = ManualScheduler::new();
        sched.advance(SECOND * 10);
        let stray = sched.schedule_after(SECOND);
        sched.cancel(stray);

        let handle = sched.schedule_next(stray, SECOND);
        assert!(sched.advance(Duration::from_millis(999)).is_empty());
        assert_eq!(sched.advance(Duration::from_millis(1)), vec![handle]);
    }

    #[test]
    fn test_deadline_scheduler_chains_from_deadline() {
        let mut sched = DeadlineScheduler::new();
        let start = Instant::now();
        let first = sched.schedule_after(Duration::ZERO);
        assert_eq!(sched.poll_due(start + SECOND * 5), vec![first]);

        let next = sched.schedule_next(first, SECOND);
        assert_eq!(sched.poll_due(start + SECOND * 5), vec![next]);
    }

    #[test]
    fn test_deadline_scheduler_cancel() {
        let mut sched = DeadlineScheduler::new();
        let handle = sched.schedule_after(Duration::ZERO);
        sched.cancel(handle);
        assert!(sched.poll_due(Instant::now() + SECOND).is_empty());
    }
}
