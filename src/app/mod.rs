//! Application core
//!
//! Composes the two timers with their history stores and applies
//! [`Intent`]s to them. Nothing here touches the terminal: the host passes
//! in a [`Scheduler`] for ticks and a [`Prompter`] for dialogs, then
//! re-renders from the accessors after every dispatch.

mod intent;
mod state;

pub use intent::Intent;
pub use state::{AppState, TimerKind};

use std::path::PathBuf;

use crate::config::{expand_path, Config};
use crate::prompt::{Answer, PathPurpose, Prompter};
use crate::record::{RecordStore, StoreError, StoreKind};
use crate::scheduler::{Scheduler, TickHandle};
use crate::timer::{PhaseCompletion, Pomodoro, PomodoroTick, SaveOutcome, Stopwatch, TimerError};

/// Something the host should react to after a dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing beyond a re-render
    None,
    /// A Pomodoro phase ran out
    PhaseComplete(PhaseCompletion),
    /// The user asked to quit
    Quit,
}

/// Main application struct
pub struct App {
    config: Config,
    stopwatch: Stopwatch,
    pomodoro: Pomodoro,
    stopwatch_store: RecordStore,
    pomodoro_store: RecordStore,
    state: AppState,
}

impl App {
    /// Build the application and load both default history files
    ///
    /// A missing or useless history file is not an error here.
    pub fn new(config: Config) -> Self {
        let mut app = Self::without_history(config);
        app.load_default_histories();
        app
    }

    /// Build the application with empty histories
    pub fn without_history(config: Config) -> Self {
        let interval = config.tick_interval();
        let attempts = config.max_label_attempts;
        Self {
            stopwatch: Stopwatch::new()
                .with_interval(interval)
                .with_max_label_attempts(attempts),
            pomodoro: Pomodoro::new(config.focus_secs(), config.break_secs())
                .with_interval(interval),
            stopwatch_store: RecordStore::new(StoreKind::Stopwatch)
                .with_max_label_attempts(attempts),
            pomodoro_store: RecordStore::new(StoreKind::Pomodoro).with_max_label_attempts(attempts),
            state: AppState::default(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn active(&self) -> TimerKind {
        self.state.active
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn pomodoro(&self) -> &Pomodoro {
        &self.pomodoro
    }

    /// History store for a timer
    pub fn store(&self, kind: TimerKind) -> &RecordStore {
        match kind {
            TimerKind::Stopwatch => &self.stopwatch_store,
            TimerKind::Pomodoro => &self.pomodoro_store,
        }
    }

    fn store_mut(&mut self, kind: TimerKind) -> &mut RecordStore {
        match kind {
            TimerKind::Stopwatch => &mut self.stopwatch_store,
            TimerKind::Pomodoro => &mut self.pomodoro_store,
        }
    }

    /// Default history file for a timer
    pub fn default_history_path(&self, kind: TimerKind) -> PathBuf {
        match kind {
            TimerKind::Stopwatch => self.config.stopwatch_history_path(),
            TimerKind::Pomodoro => self.config.pomodoro_history_path(),
        }
    }

    /// Whether the delete affordance should be offered for a timer
    pub fn can_delete(&self, kind: TimerKind) -> bool {
        !self.store(kind).is_empty()
    }

    /// Label of the active timer, "HH:MM:SS"
    pub fn active_label(&self) -> String {
        match self.state.active {
            TimerKind::Stopwatch => self.stopwatch.label(),
            TimerKind::Pomodoro => self.pomodoro.label(),
        }
    }

    /// Whether delivering `handle` will end the current Pomodoro phase
    pub fn completes_phase(&self, handle: TickHandle) -> bool {
        self.pomodoro.pending() == Some(handle) && self.pomodoro.seconds() <= 1
    }

    fn load_default_histories(&mut self) {
        for kind in TimerKind::ALL {
            let path = self.default_history_path(kind);
            match self.store_mut(kind).load(&path) {
                Ok(report) => tracing::info!(
                    "Loaded {} {} records at startup",
                    report.imported,
                    kind.title()
                ),
                Err(e) => tracing::debug!("No {} history at startup: {}", kind.title(), e),
            }
        }
    }

    /// Apply an intent
    ///
    /// Domain errors never escape: they are logged and shown through
    /// `prompter`.
    pub fn dispatch(
        &mut self,
        intent: Intent,
        scheduler: &mut dyn Scheduler,
        prompter: &mut dyn Prompter,
    ) -> Effect {
        match self.apply(intent, scheduler, prompter) {
            Ok(effect) => effect,
            Err(e) => {
                tracing::warn!("{} failed: {}", intent.name(), e);
                prompter.show_error(e.title(), &e.to_string());
                Effect::None
            }
        }
    }

    fn apply(
        &mut self,
        intent: Intent,
        scheduler: &mut dyn Scheduler,
        prompter: &mut dyn Prompter,
    ) -> Result<Effect, TimerError> {
        let active = self.state.active;
        match intent {
            Intent::Start => match active {
                TimerKind::Stopwatch => self.stopwatch.start(scheduler),
                TimerKind::Pomodoro => self.pomodoro.start(scheduler),
            },
            Intent::Pause => match active {
                TimerKind::Stopwatch => self.stopwatch.pause(scheduler),
                TimerKind::Pomodoro => self.pomodoro.pause(scheduler),
            },
            Intent::ToggleRun => match active {
                TimerKind::Stopwatch => self.stopwatch.toggle(scheduler),
                TimerKind::Pomodoro => self.pomodoro.toggle(scheduler),
            },
            Intent::Reset => self.reset(active, scheduler),
            Intent::RequestReset => {
                if prompter.confirm("Reset", "Are you sure you want to reset?") {
                    self.reset(active, scheduler);
                }
            }
            Intent::Save => self.save_run(scheduler, prompter)?,
            Intent::SelectNext => {
                let count = self.store(active).len();
                self.state.select_next(active, count);
            }
            Intent::SelectPrev => {
                let count = self.store(active).len();
                self.state.select_prev(active, count);
            }
            Intent::Delete => self.delete_selected(active)?,
            Intent::LoadHistory => self.load_history(active, prompter)?,
            Intent::SaveHistory => self.save_history(active, prompter)?,
            Intent::SwitchTimer => {
                self.state.active = active.other();
                tracing::debug!("Switched to {}", self.state.active.title());
            }
            Intent::Tick(handle) => {
                if self.stopwatch.pending() == Some(handle) {
                    self.stopwatch.tick(scheduler, handle);
                } else if self.pomodoro.pending() == Some(handle) {
                    let tick =
                        self.pomodoro
                            .tick(scheduler, prompter, &mut self.pomodoro_store, handle)?;
                    if let PomodoroTick::PhaseComplete(done) = tick {
                        return Ok(Effect::PhaseComplete(done));
                    }
                } else {
                    tracing::trace!("Dropping stale tick {}", handle.id());
                }
            }
            Intent::Quit => {
                self.state.should_quit = true;
                return Ok(Effect::Quit);
            }
        }
        Ok(Effect::None)
    }

    fn reset(&mut self, kind: TimerKind, scheduler: &mut dyn Scheduler) {
        match kind {
            TimerKind::Stopwatch => self.stopwatch.reset(scheduler),
            TimerKind::Pomodoro => self.pomodoro.reset(scheduler),
        }
        tracing::debug!("{} reset", kind.title());
    }

    fn save_run(
        &mut self,
        scheduler: &mut dyn Scheduler,
        prompter: &mut dyn Prompter,
    ) -> Result<(), TimerError> {
        if self.state.active != TimerKind::Stopwatch {
            tracing::debug!("Save ignored: Pomodoro phases are recorded on completion");
            return Ok(());
        }
        match self
            .stopwatch
            .save(scheduler, prompter, &mut self.stopwatch_store)?
        {
            SaveOutcome::Saved { .. } => {
                let count = self.stopwatch_store.len();
                self.state.clamp_selection(TimerKind::Stopwatch, count);
            }
            SaveOutcome::Cancelled => {}
        }
        Ok(())
    }

    fn delete_selected(&mut self, kind: TimerKind) -> Result<(), StoreError> {
        let index = self.state.selected(kind);
        let Some((bucket, record)) = self.store(kind).nth(index).map(|(b, r)| (b, r.clone()))
        else {
            return Ok(());
        };

        let now_empty = self.store_mut(kind).delete(&record, bucket)?;
        let count = self.store(kind).len();
        self.state.clamp_selection(kind, count);
        if now_empty {
            tracing::debug!("{} history is now empty", kind.title());
        }
        Ok(())
    }

    /// Ask for a file and import it, asking again while the file is missing
    fn load_history(
        &mut self,
        kind: TimerKind,
        prompter: &mut dyn Prompter,
    ) -> Result<(), StoreError> {
        let default_path = self.default_history_path(kind);
        loop {
            let path = match prompter.choose_path(PathPurpose::Load, &default_path) {
                Answer::Given(path) => expand_path(&path.to_string_lossy()),
                Answer::Cancelled => return Ok(()),
            };

            match self.store_mut(kind).load(&path) {
                Ok(_) => {
                    let count = self.store(kind).len();
                    self.state.clamp_selection(kind, count);
                    return Ok(());
                }
                Err(e @ StoreError::FileNotFound { .. }) => {
                    tracing::warn!("{}", e);
                    prompter.show_error(e.title(), "File not found.");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Ask for a file and write the history there, asking again while the
    /// target directory is missing
    fn save_history(
        &mut self,
        kind: TimerKind,
        prompter: &mut dyn Prompter,
    ) -> Result<(), StoreError> {
        if self.store(kind).is_empty() {
            return Err(StoreError::EmptySave);
        }

        let default_path = self.default_history_path(kind);
        loop {
            let path = match prompter.choose_path(PathPurpose::Save, &default_path) {
                Answer::Given(path) => expand_path(&path.to_string_lossy()),
                Answer::Cancelled => return Ok(()),
            };

            match self.store(kind).save(&path) {
                Ok(_) => return Ok(()),
                Err(e @ StoreError::FileNotFound { .. }) => {
                    tracing::warn!("{}", e);
                    prompter.show_error(e.title(), "File not found.");
                }
                Err(e) => return Err(e),
            }
        }
    }
}
