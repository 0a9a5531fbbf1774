//! Timer state machines
//!
//! [`TimerCore`] is the shared run/pause/reset/tick machine over a
//! [`Clock`]. [`Stopwatch`] counts up and saves labelled runs; [`Pomodoro`]
//! counts down and alternates focus and break phases.
//!
//! Ticks are never self-scheduled with a sleep. The core asks the injected
//! [`Scheduler`] for a one-shot tick and remembers the handle. Only a tick
//! carrying that exact handle advances the clock, and `pause`/`reset`
//! always cancel it first, so at most one tick chain exists per timer.

pub mod pomodoro;
pub mod stopwatch;

pub use pomodoro::{Phase, PhaseCompletion, Pomodoro, PomodoroTick};
pub use stopwatch::{SaveOutcome, Stopwatch};

use std::time::Duration;

use crate::clock::Clock;
use crate::record::StoreError;
use crate::scheduler::{Scheduler, TickHandle};

/// Default spacing between ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Error type for timer operations
#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    #[error("Cannot save record of 0 seconds!")]
    EmptySave,
    #[error("Label must be between 1 and 10 characters and cannot contain '|'.")]
    InvalidLabel,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TimerError {
    /// Short heading for an error dialog
    pub fn title(&self) -> &'static str {
        match self {
            TimerError::EmptySave => "Empty save",
            TimerError::InvalidLabel => "Invalid label",
            TimerError::Store(e) => e.title(),
        }
    }
}

/// Whether a timer is ticking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    /// Not running; seconds at rest
    #[default]
    Idle,
    /// A tick is scheduled
    Running,
}

/// Which way the clock moves on each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// What a delivered tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Handle was stale or the timer is idle; nothing changed
    Ignored,
    /// Clock moved one second and the next tick is scheduled
    Advanced,
    /// Countdown reached zero; no further tick is scheduled
    Expired,
}

/// Run/pause/reset/tick machine shared by both timers
#[derive(Debug, Clone)]
pub struct TimerCore {
    clock: Clock,
    state: TimerState,
    direction: Direction,
    pending: Option<TickHandle>,
    interval: Duration,
}

impl TimerCore {
    /// Create an idle timer at `baseline` seconds
    pub fn new(direction: Direction, baseline: u64) -> Self {
        Self {
            clock: Clock::new(baseline),
            state: TimerState::Idle,
            direction,
            pending: None,
            interval: TICK_INTERVAL,
        }
    }

    /// Use a different tick spacing (the clock still moves one second per
    /// tick)
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn seconds(&self) -> u64 {
        self.clock.seconds()
    }

    /// Display label in "HH:MM:SS" form
    pub fn label(&self) -> String {
        self.clock.label()
    }

    /// Handle of the outstanding tick, if any
    pub fn pending(&self) -> Option<TickHandle> {
        self.pending
    }

    /// Idle -> Running. No-op when already running.
    pub fn start(&mut self, scheduler: &mut dyn Scheduler) {
        if self.state == TimerState::Running {
            return;
        }
        self.state = TimerState::Running;
        self.schedule(scheduler);
    }

    /// Running -> Idle, cancelling the outstanding tick. No-op when idle.
    pub fn pause(&mut self, scheduler: &mut dyn Scheduler) {
        if self.state != TimerState::Running {
            return;
        }
        self.cancel_pending(scheduler);
        self.state = TimerState::Idle;
    }

    /// Cancel any outstanding tick and set the clock to `baseline`
    ///
    /// A running timer keeps running from the new value.
    pub fn reset(&mut self, scheduler: &mut dyn Scheduler, baseline: u64) {
        let was_running = self.is_running();
        self.cancel_pending(scheduler);
        self.state = TimerState::Idle;
        self.clock.set(baseline);
        if was_running {
            self.start(scheduler);
        }
    }

    /// Deliver a scheduled tick
    ///
    /// Only the handle returned by the last schedule is honoured. A
    /// countdown that reaches zero is left running with nothing scheduled;
    /// its owner decides what happens next.
    pub fn tick(&mut self, scheduler: &mut dyn Scheduler, handle: TickHandle) -> TickResult {
        if self.state != TimerState::Running || self.pending != Some(handle) {
            return TickResult::Ignored;
        }
        self.pending = None;

        match self.direction {
            Direction::Up => self.clock.increment(),
            Direction::Down => self.clock.decrement(),
        }

        if self.direction == Direction::Down && self.clock.is_zero() {
            return TickResult::Expired;
        }

        let next = scheduler.schedule_next(handle, self.interval);
        tracing::trace!("Scheduled tick {} after {}", next.id(), handle.id());
        self.pending = Some(next);
        TickResult::Advanced
    }

    fn schedule(&mut self, scheduler: &mut dyn Scheduler) {
        let handle = scheduler.schedule_after(self.interval);
        tracing::trace!("Scheduled tick {}", handle.id());
        self.pending = Some(handle);
    }

    fn cancel_pending(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;

    fn fire(core: &mut TimerCore, sched: &mut ManualScheduler) -> Vec<TickResult> {
        let due = sched.advance(TICK_INTERVAL);
        due.into_iter().map(|h| core.tick(sched, h)).collect()
    }

    #[test]
    fn test_start_schedules_one_tick() {
        let mut sched = ManualScheduler::new();
        let mut core = TimerCore::new(Direction::Up, 0);

        core.start(&mut sched);
        core.start(&mut sched);

        assert!(core.is_running());
        assert_eq!(sched.pending_count(), 1);
        assert!(core.pending().is_some());
    }

    #[test]
    fn test_start_then_pause_keeps_seconds() {
        let mut sched = ManualScheduler::new();
        let mut core = TimerCore::new(Direction::Up, 42);

        core.start(&mut sched);
        core.pause(&mut sched);

        assert_eq!(core.seconds(), 42);
        assert_eq!(core.state(), TimerState::Idle);
        assert_eq!(sched.pending_count(), 0);
        assert_eq!(sched.cancelled_count(), 1);
    }

    #[test]
    fn test_ticks_count_up() {
        let mut sched = ManualScheduler::new();
        let mut core = TimerCore::new(Direction::Up, 0);
        core.start(&mut sched);

        for _ in 0..3 {
            assert_eq!(fire(&mut core, &mut sched), vec![TickResult::Advanced]);
        }
        assert_eq!(core.seconds(), 3);
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn test_late_delivery_catches_up() {
        let mut sched = ManualScheduler::new();
        let mut core = TimerCore::new(Direction::Up, 0);
        core.start(&mut sched);

        // Host blocked for five intervals; only the first tick is handed over
        let mut due = sched.advance(TICK_INTERVAL * 5);
        while let Some(handle) = due.pop() {
            core.tick(&mut sched, handle);
            due = sched.advance(Duration::ZERO);
        }

        assert_eq!(core.seconds(), 5);
        assert_eq!(sched.pending_count(), 1);
        assert_eq!(sched.advance(TICK_INTERVAL).len(), 1);
    }

    #[test]
    fn test_countdown_expires_without_rescheduling() {
        let mut sched = ManualScheduler::new();
        let mut core = TimerCore::new(Direction::Down, 2);
        core.start(&mut sched);

        assert_eq!(fire(&mut core, &mut sched), vec![TickResult::Advanced]);
        assert_eq!(fire(&mut core, &mut sched), vec![TickResult::Expired]);
        assert_eq!(core.seconds(), 0);
        assert_eq!(sched.pending_count(), 0);
        assert!(core.pending().is_none());
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut sched = ManualScheduler::new();
        let mut core = TimerCore::new(Direction::Up, 0);
        core.start(&mut sched);
        let stale = core.pending().unwrap();

        core.reset(&mut sched, 0);
        assert_eq!(core.tick(&mut sched, stale), TickResult::Ignored);
        assert_eq!(core.seconds(), 0);
    }

    #[test]
    fn test_reset_while_running_restarts_with_one_tick() {
        let mut sched = ManualScheduler::new();
        let mut core = TimerCore::new(Direction::Up, 0);
        core.start(&mut sched);
        fire(&mut core, &mut sched);

        core.reset(&mut sched, 0);

        assert_eq!(core.seconds(), 0);
        assert!(core.is_running());
        assert_eq!(sched.pending_count(), 1);
        assert_eq!(sched.cancelled_count(), 1);
    }

    #[test]
    fn test_reset_while_idle_stays_idle() {
        let mut sched = ManualScheduler::new();
        let mut core = TimerCore::new(Direction::Down, 10);

        core.reset(&mut sched, 300);

        assert_eq!(core.seconds(), 300);
        assert!(!core.is_running());
        assert_eq!(sched.pending_count(), 0);
        assert_eq!(sched.cancelled_count(), 0);
    }

    #[test]
    fn test_tick_while_idle_is_ignored() {
        let mut sched = ManualScheduler::new();
        let mut core = TimerCore::new(Direction::Up, 0);
        core.start(&mut sched);
        let handle = core.pending().unwrap();
        core.pause(&mut sched);

        assert_eq!(core.tick(&mut sched, handle), TickResult::Ignored);
    }
}
