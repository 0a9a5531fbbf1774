//! Count-up stopwatch
//!
//! Saving a run pauses the stopwatch, asks what the time was spent on, files
//! the record under the chosen category and resets to zero.

use std::time::Duration;

use super::{Direction, TickResult, TimerCore, TimerError, TimerState};
use crate::prompt::{Answer, Prompter};
use crate::record::store::DEFAULT_MAX_LABEL_ATTEMPTS;
use crate::record::{is_valid_label, today, AddOutcome, Bucket, Category, Record, RecordStore};
use crate::scheduler::{Scheduler, TickHandle};

/// Result of [`Stopwatch::save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A record was stored and the stopwatch reset
    Saved { record: Record, category: Category },
    /// The user backed out; the stopwatch is idle with its time kept
    Cancelled,
}

/// Count-up timer whose runs become labelled history records
#[derive(Debug, Clone)]
pub struct Stopwatch {
    core: TimerCore,
    max_label_attempts: u32,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            core: TimerCore::new(Direction::Up, 0),
            max_label_attempts: DEFAULT_MAX_LABEL_ATTEMPTS,
        }
    }

    /// Limit how many invalid labels [`Stopwatch::save`] accepts before
    /// giving up
    pub fn with_max_label_attempts(mut self, attempts: u32) -> Self {
        self.max_label_attempts = attempts.max(1);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.core = self.core.with_interval(interval);
        self
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
        self.core.start(scheduler);
    }

    pub fn pause(&mut self, scheduler: &mut dyn Scheduler) {
        self.core.pause(scheduler);
    }

    /// Start when idle, pause when running
    pub fn toggle(&mut self, scheduler: &mut dyn Scheduler) {
        if self.is_running() {
            self.pause(scheduler);
        } else {
            self.start(scheduler);
        }
    }

    /// Back to zero, still running if it was
    pub fn reset(&mut self, scheduler: &mut dyn Scheduler) {
        self.core.reset(scheduler, 0);
    }

    pub fn tick(&mut self, scheduler: &mut dyn Scheduler, handle: TickHandle) -> TickResult {
        self.core.tick(scheduler, handle)
    }

    /// Save the current run as a history record
    ///
    /// Fails with [`TimerError::EmptySave`] at zero seconds without touching
    /// anything. Otherwise pauses, asks for a label and category (repeating
    /// while the label is not 1-10 characters), and adds the record to
    /// `store`. The stopwatch resets to zero only once the record is stored.
    pub fn save(
        &mut self,
        scheduler: &mut dyn Scheduler,
        prompter: &mut dyn Prompter,
        store: &mut RecordStore,
    ) -> Result<SaveOutcome, TimerError> {
        if self.seconds() == 0 {
            return Err(TimerError::EmptySave);
        }

        self.pause(scheduler);

        let mut rejected = 0;
        let input = loop {
            match prompter.ask_label(&Category::ALL) {
                Answer::Cancelled => {
                    tracing::debug!("Stopwatch save cancelled at {}", self.label());
                    return Ok(SaveOutcome::Cancelled);
                }
                Answer::Given(input) if is_valid_label(&input.label) => break input,
                Answer::Given(input) => {
                    tracing::debug!("Rejected stopwatch label {:?}", input.label);
                    let err = TimerError::InvalidLabel;
                    prompter.show_error(err.title(), &err.to_string());
                    rejected += 1;
                    if rejected >= self.max_label_attempts {
                        tracing::warn!("Stopwatch save abandoned after {} invalid labels", rejected);
                        return Ok(SaveOutcome::Cancelled);
                    }
                }
            }
        };

        let record = Record::stopwatch(today(), self.label(), input.label);
        let category = input.category;

        match store.add(record, Bucket::Category(category), prompter)? {
            AddOutcome::Added(record) => {
                tracing::info!("Saved stopwatch record {} under {}", record, category);
                self.reset(scheduler);
                Ok(SaveOutcome::Saved { record, category })
            }
            AddOutcome::Cancelled => Ok(SaveOutcome::Cancelled),
        }
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use crate::record::StoreKind;
    use crate::scheduler::ManualScheduler;
    use crate::timer::TICK_INTERVAL;

    fn run_for(sw: &mut Stopwatch, sched: &mut ManualScheduler, seconds: u64) {
        sw.start(sched);
        for _ in 0..seconds {
            for handle in sched.advance(TICK_INTERVAL) {
                sw.tick(sched, handle);
            }
        }
    }

    #[test]
    fn test_save_at_zero_is_refused() {
        let mut sched = ManualScheduler::new();
        let mut prompter = ScriptedPrompter::new().label("coding", Category::Work);
        let mut store = RecordStore::new(StoreKind::Stopwatch);
        let mut sw = Stopwatch::new();

        let result = sw.save(&mut sched, &mut prompter, &mut store);

        assert!(matches!(result, Err(TimerError::EmptySave)));
        assert!(store.is_empty());
        assert_eq!(prompter.label_prompts, 0);
    }

    #[test]
    fn test_save_stores_record_and_resets() {
        let mut sched = ManualScheduler::new();
        let mut prompter = ScriptedPrompter::new().label("coding", Category::Study);
        let mut store = RecordStore::new(StoreKind::Stopwatch);
        let mut sw = Stopwatch::new();
        run_for(&mut sw, &mut sched, 3661);

        let outcome = sw.save(&mut sched, &mut prompter, &mut store).unwrap();

        let expected = Record::stopwatch(today(), "01:01:01", "coding");
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                record: expected.clone(),
                category: Category::Study
            }
        );
        assert_eq!(store.bucket(Bucket::Category(Category::Study)), &[expected]);
        assert_eq!(sw.seconds(), 0);
        assert!(!sw.is_running());
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn test_save_cancelled_leaves_timer_idle_with_time() {
        let mut sched = ManualScheduler::new();
        let mut prompter = ScriptedPrompter::new().cancel_label();
        let mut store = RecordStore::new(StoreKind::Stopwatch);
        let mut sw = Stopwatch::new();
        run_for(&mut sw, &mut sched, 5);

        let outcome = sw.save(&mut sched, &mut prompter, &mut store).unwrap();

        assert_eq!(outcome, SaveOutcome::Cancelled);
        assert!(store.is_empty());
        assert_eq!(sw.seconds(), 5);
        assert_eq!(sw.state(), TimerState::Idle);
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn test_save_reprompts_on_invalid_label() {
        let mut sched = ManualScheduler::new();
        let mut prompter = ScriptedPrompter::new()
            .label("", Category::Work)
            .label("this label is too long", Category::Work)
            .label("ok", Category::Other);
        let mut store = RecordStore::new(StoreKind::Stopwatch);
        let mut sw = Stopwatch::new();
        run_for(&mut sw, &mut sched, 2);

        let outcome = sw.save(&mut sched, &mut prompter, &mut store).unwrap();

        assert!(matches!(outcome, SaveOutcome::Saved { category: Category::Other, .. }));
        assert_eq!(prompter.label_prompts, 3);
        assert_eq!(prompter.error_titles(), vec!["Invalid label", "Invalid label"]);
    }

    #[test]
    fn test_save_refuses_label_with_field_separator() {
        let mut sched = ManualScheduler::new();
        let mut prompter = ScriptedPrompter::new()
            .label("a | b", Category::Work)
            .label("a-b", Category::Work);
        let mut store = RecordStore::new(StoreKind::Stopwatch);
        let mut sw = Stopwatch::new();
        run_for(&mut sw, &mut sched, 4);

        let outcome = sw.save(&mut sched, &mut prompter, &mut store).unwrap();

        let expected = Record::stopwatch(today(), "00:00:04", "a-b");
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                record: expected,
                category: Category::Work
            }
        );
        assert_eq!(prompter.error_titles(), vec!["Invalid label"]);
    }

    #[test]
    fn test_save_gives_up_after_repeated_invalid_labels() {
        let mut sched = ManualScheduler::new();
        let mut prompter = ScriptedPrompter::new()
            .label("", Category::Work)
            .label("", Category::Work);
        let mut store = RecordStore::new(StoreKind::Stopwatch);
        let mut sw = Stopwatch::new().with_max_label_attempts(2);
        run_for(&mut sw, &mut sched, 2);

        let outcome = sw.save(&mut sched, &mut prompter, &mut store).unwrap();

        assert_eq!(outcome, SaveOutcome::Cancelled);
        assert_eq!(sw.seconds(), 2);
    }

    #[test]
    fn test_save_duplicate_relabels() {
        let mut sched = ManualScheduler::new();
        let mut store = RecordStore::new(StoreKind::Stopwatch);
        store
            .insert(
                Record::stopwatch(today(), "00:00:02", "coding"),
                Bucket::Category(Category::Work),
            )
            .unwrap();
        let mut prompter = ScriptedPrompter::new()
            .label("coding", Category::Work)
            .text("coding-2");
        let mut sw = Stopwatch::new();
        run_for(&mut sw, &mut sched, 2);

        let outcome = sw.save(&mut sched, &mut prompter, &mut store).unwrap();

        match outcome {
            SaveOutcome::Saved { record, .. } => assert_eq!(record.label, "coding-2"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_toggle() {
        let mut sched = ManualScheduler::new();
        let mut sw = Stopwatch::new();

        sw.toggle(&mut sched);
        assert!(sw.is_running());
        sw.toggle(&mut sched);
        assert!(!sw.is_running());
        assert_eq!(sched.pending_count(), 0);
    }
}
