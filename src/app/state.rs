//! Application state management
//!
//! Which timer is on screen, where each history selection sits, and
//! whether the user asked to quit.

use crate::record::StoreKind;

/// The two timers, each with its own history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerKind {
    #[default]
    Stopwatch,
    Pomodoro,
}

impl TimerKind {
    pub const ALL: [TimerKind; 2] = [TimerKind::Stopwatch, TimerKind::Pomodoro];

    /// The timer shown after a switch
    pub fn other(self) -> TimerKind {
        match self {
            TimerKind::Stopwatch => TimerKind::Pomodoro,
            TimerKind::Pomodoro => TimerKind::Stopwatch,
        }
    }

    pub fn store_kind(self) -> StoreKind {
        match self {
            TimerKind::Stopwatch => StoreKind::Stopwatch,
            TimerKind::Pomodoro => StoreKind::Pomodoro,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TimerKind::Stopwatch => "Stopwatch",
            TimerKind::Pomodoro => "Pomodoro",
        }
    }
}

/// UI-facing application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Timer currently on screen
    pub active: TimerKind,
    /// Selected row in the stopwatch history
    pub stopwatch_selected: usize,
    /// Selected row in the Pomodoro history
    pub pomodoro_selected: usize,
    /// Set by `Intent::Quit`
    pub should_quit: bool,
}

impl AppState {
    /// Selected history row for a timer
    pub fn selected(&self, kind: TimerKind) -> usize {
        match kind {
            TimerKind::Stopwatch => self.stopwatch_selected,
            TimerKind::Pomodoro => self.pomodoro_selected,
        }
    }

    fn set_selected(&mut self, kind: TimerKind, index: usize) {
        match kind {
            TimerKind::Stopwatch => self.stopwatch_selected = index,
            TimerKind::Pomodoro => self.pomodoro_selected = index,
        }
    }

    /// Select the next record, wrapping at the end
    pub fn select_next(&mut self, kind: TimerKind, item_count: usize) {
        if item_count > 0 {
            // Clamp first to handle stale indices
            let current = self.selected(kind).min(item_count - 1);
            self.set_selected(kind, (current + 1) % item_count);
        } else {
            self.set_selected(kind, 0);
        }
    }

    /// Select the previous record, wrapping at the start
    pub fn select_prev(&mut self, kind: TimerKind, item_count: usize) {
        if item_count > 0 {
            let current = self.selected(kind).min(item_count - 1);
            let prev = current.checked_sub(1).unwrap_or(item_count - 1);
            self.set_selected(kind, prev);
        } else {
            self.set_selected(kind, 0);
        }
    }

    /// Keep the selection inside a history that shrank
    pub fn clamp_selection(&mut self, kind: TimerKind, item_count: usize) {
        let clamped = self.selected(kind).min(item_count.saturating_sub(1));
        self.set_selected(kind, clamped);
    }
}
