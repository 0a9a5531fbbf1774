//! Pomodoro countdown
//!
//! Alternates focus and break phases. When a phase reaches zero the timer
//! logs it, switches to the other phase paused at that phase's length, and
//! asks whether to carry on.

use std::fmt;
use std::time::Duration;

use super::{Direction, TickResult, TimerCore, TimerError, TimerState};
use crate::prompt::Prompter;
use crate::record::{today, Bucket, PhaseLabel, Record, RecordStore};
use crate::scheduler::{Scheduler, TickHandle};

/// Default focus phase length
pub const DEFAULT_FOCUS_SECS: u64 = 25 * 60;

/// Default break phase length
pub const DEFAULT_BREAK_SECS: u64 = 5 * 60;

/// Which half of the cycle is counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Focus,
    Break,
}

impl Phase {
    /// The phase that follows this one
    pub fn next(self) -> Phase {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    fn record_label(self) -> PhaseLabel {
        match self {
            Phase::Focus => PhaseLabel::Focus,
            Phase::Break => PhaseLabel::Break,
        }
    }

    /// Dialog shown once this phase finishes
    fn continue_prompt(self) -> (&'static str, &'static str) {
        match self {
            Phase::Focus => ("Focus complete", "Great work! Would you like to start the break now?"),
            Phase::Break => ("Break complete", "Break over! Would you like to start working now?"),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.record_label().as_str())
    }
}

/// What happened when a phase ran out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseCompletion {
    /// The phase that just finished
    pub finished: Phase,
    /// Record appended to the Pomodoro history
    pub record: Record,
    /// Whether the user chose to start the next phase straight away
    pub started_next: bool,
}

/// What a delivered tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PomodoroTick {
    /// Stale handle or idle timer
    Ignored,
    /// One second counted down
    Advanced,
    /// The phase reached zero
    PhaseComplete(PhaseCompletion),
}

/// Focus/break countdown timer
#[derive(Debug, Clone)]
pub struct Pomodoro {
    core: TimerCore,
    phase: Phase,
    focus_count: u32,
    break_count: u32,
    focus_secs: u64,
    break_secs: u64,
}

impl Pomodoro {
    /// Idle in the focus phase at `focus_secs`
    pub fn new(focus_secs: u64, break_secs: u64) -> Self {
        Self {
            core: TimerCore::new(Direction::Down, focus_secs),
            phase: Phase::Focus,
            focus_count: 0,
            break_count: 0,
            focus_secs,
            break_secs,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.core = self.core.with_interval(interval);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn focus_count(&self) -> u32 {
        self.focus_count
    }

    pub fn break_count(&self) -> u32 {
        self.break_count
    }

    pub fn focus_secs(&self) -> u64 {
        self.focus_secs
    }

    pub fn break_secs(&self) -> u64 {
        self.break_secs
    }

    /// Length of the current phase
    pub fn baseline(&self) -> u64 {
        match self.phase {
            Phase::Focus => self.focus_secs,
            Phase::Break => self.break_secs,
        }
    }

    pub fn state(&self) -> TimerState {
        self.core.state()
    }

    pub fn is_running(&self) -> bool {
        self.core.is_running()
    }

    pub fn seconds(&self) -> u64 {
        self.core.seconds()
    }

    pub fn label(&self) -> String {
        self.core.label()
    }

    pub fn pending(&self) -> Option<TickHandle> {
        self.core.pending()
    }

    pub fn start(&mut self, scheduler: &mut dyn Scheduler) {
        if self.core.seconds() == 0 {
            self.core.reset(scheduler, self.baseline());
        }
        self.core.start(scheduler);
    }

    pub fn pause(&mut self, scheduler: &mut dyn Scheduler) {
        self.core.pause(scheduler);
    }

    pub fn toggle(&mut self, scheduler: &mut dyn Scheduler) {
        if self.is_running() {
            self.pause(scheduler);
        } else {
            self.start(scheduler);
        }
    }

    /// Back to the current phase's full length, still running if it was.
    /// The phase and the counters are kept.
    pub fn reset(&mut self, scheduler: &mut dyn Scheduler) {
        self.core.reset(scheduler, self.baseline());
    }

    /// Deliver a scheduled tick, completing the phase when it hits zero
    pub fn tick(
        &mut self,
        scheduler: &mut dyn Scheduler,
        prompter: &mut dyn Prompter,
        store: &mut RecordStore,
        handle: TickHandle,
    ) -> Result<PomodoroTick, TimerError> {
        match self.core.tick(scheduler, handle) {
            TickResult::Ignored => Ok(PomodoroTick::Ignored),
            TickResult::Advanced => Ok(PomodoroTick::Advanced),
            TickResult::Expired => self
                .on_phase_complete(scheduler, prompter, store)
                .map(PomodoroTick::PhaseComplete),
        }
    }

    /// Finish the current phase
    ///
    /// Counts it, switches to the next phase paused at full length, appends
    /// the phase record to `store` and asks whether to start the next phase.
    pub fn on_phase_complete(
        &mut self,
        scheduler: &mut dyn Scheduler,
        prompter: &mut dyn Prompter,
        store: &mut RecordStore,
    ) -> Result<PhaseCompletion, TimerError> {
        let finished = self.phase;
        match finished {
            Phase::Focus => self.focus_count += 1,
            Phase::Break => self.break_count += 1,
        }

        self.core.pause(scheduler);
        self.phase = finished.next();
        self.core.reset(scheduler, self.baseline());

        let record = Record::phase(today(), finished.record_label());
        store.insert(record.clone(), Bucket::Uncategorised)?;
        tracing::info!(
            "{} phase complete (focus: {}, break: {})",
            finished,
            self.focus_count,
            self.break_count
        );

        let (title, message) = finished.continue_prompt();
        let started_next = prompter.confirm(title, message);
        if started_next {
            self.core.start(scheduler);
        }

        Ok(PhaseCompletion {
            finished,
            record,
            started_next,
        })
    }
}

impl Default for Pomodoro {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_SECS, DEFAULT_BREAK_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use crate::record::StoreKind;
    use crate::scheduler::ManualScheduler;
    use crate::timer::TICK_INTERVAL;

    struct Harness {
        sched: ManualScheduler,
        prompter: ScriptedPrompter,
        store: RecordStore,
    }

    impl Harness {
        fn new(prompter: ScriptedPrompter) -> Self {
            Self {
                sched: ManualScheduler::new(),
                prompter,
                store: RecordStore::new(StoreKind::Pomodoro),
            }
        }

        /// Advance one second and deliver whatever became due
        fn step(&mut self, pomo: &mut Pomodoro) -> Vec<PomodoroTick> {
            let due = self.sched.advance(TICK_INTERVAL);
            due.into_iter()
                .map(|h| {
                    pomo.tick(&mut self.sched, &mut self.prompter, &mut self.store, h)
                        .unwrap()
                })
                .collect()
        }

        fn run_phase(&mut self, pomo: &mut Pomodoro) -> PhaseCompletion {
            for _ in 0..10_000 {
                for tick in self.step(pomo) {
                    if let PomodoroTick::PhaseComplete(done) = tick {
                        return done;
                    }
                }
            }
            panic!("phase never completed");
        }
    }

    #[test]
    fn test_default_lengths() {
        let pomo = Pomodoro::default();
        assert_eq!(pomo.seconds(), 1500);
        assert_eq!(pomo.break_secs(), 300);
        assert_eq!(pomo.phase(), Phase::Focus);
        assert_eq!(pomo.state(), TimerState::Idle);
    }

    #[test]
    fn test_focus_completion_switches_to_paused_break() {
        let mut h = Harness::new(ScriptedPrompter::new().confirm_with(false));
        let mut pomo = Pomodoro::new(3, 2);
        pomo.start(&mut h.sched);

        let done = h.run_phase(&mut pomo);

        assert_eq!(done.finished, Phase::Focus);
        assert!(!done.started_next);
        assert_eq!(pomo.phase(), Phase::Break);
        assert_eq!(pomo.seconds(), 2);
        assert_eq!(pomo.state(), TimerState::Idle);
        assert_eq!(pomo.focus_count(), 1);
        assert_eq!(h.sched.pending_count(), 0);
        assert_eq!(
            h.prompter.confirm_prompts,
            vec!["Great work! Would you like to start the break now?".to_string()]
        );
    }

    #[test]
    fn test_phase_record_is_appended() {
        let mut h = Harness::new(ScriptedPrompter::new());
        let mut pomo = Pomodoro::new(1, 1);
        pomo.start(&mut h.sched);

        let done = h.run_phase(&mut pomo);

        assert_eq!(done.record, Record::phase(today(), PhaseLabel::Focus));
        assert_eq!(h.store.bucket(Bucket::Uncategorised), &[done.record]);
    }

    #[test]
    fn test_accepting_starts_next_phase() {
        let mut h = Harness::new(ScriptedPrompter::new().confirm_with(true).confirm_with(false));
        let mut pomo = Pomodoro::new(2, 3);
        pomo.start(&mut h.sched);

        let first = h.run_phase(&mut pomo);
        assert!(first.started_next);
        assert!(pomo.is_running());
        assert_eq!(pomo.seconds(), 3);

        let second = h.run_phase(&mut pomo);
        assert_eq!(second.finished, Phase::Break);
        assert_eq!(pomo.phase(), Phase::Focus);
        assert_eq!(pomo.seconds(), 2);
        assert_eq!(pomo.break_count(), 1);
        assert_eq!(
            h.prompter.confirm_prompts[1],
            "Break over! Would you like to start working now?"
        );
    }

    #[test]
    fn test_focus_count_matches_completions() {
        let answers = (0..7).fold(ScriptedPrompter::new(), |p, _| p.confirm_with(true));
        let mut h = Harness::new(answers);
        let mut pomo = Pomodoro::new(2, 1);
        pomo.start(&mut h.sched);

        for _ in 0..7 {
            h.run_phase(&mut pomo);
        }

        assert_eq!(pomo.focus_count(), 4);
        assert_eq!(pomo.break_count(), 3);
        assert_eq!(h.store.len(), 7);
    }

    #[test]
    fn test_reset_returns_to_phase_length() {
        let mut h = Harness::new(ScriptedPrompter::new());
        let mut pomo = Pomodoro::new(10, 5);
        pomo.start(&mut h.sched);
        h.step(&mut pomo);
        h.step(&mut pomo);
        assert_eq!(pomo.seconds(), 8);

        pomo.reset(&mut h.sched);

        assert_eq!(pomo.seconds(), 10);
        assert!(pomo.is_running());
        assert_eq!(h.sched.pending_count(), 1);
    }

    #[test]
    fn test_stale_tick_after_pause_is_ignored() {
        let mut h = Harness::new(ScriptedPrompter::new());
        let mut pomo = Pomodoro::new(10, 5);
        pomo.start(&mut h.sched);
        let stale = pomo.pending().unwrap();
        pomo.pause(&mut h.sched);

        let tick = pomo
            .tick(&mut h.sched, &mut h.prompter, &mut h.store, stale)
            .unwrap();

        assert_eq!(tick, PomodoroTick::Ignored);
        assert_eq!(pomo.seconds(), 10);
    }
}
