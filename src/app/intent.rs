//! User intents
//!
//! Everything the host can ask of the application. Key presses and
//! delivered ticks are both translated into an [`Intent`] before they reach
//! [`App::dispatch`](super::App::dispatch).

use crate::scheduler::TickHandle;

/// A request from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start the active timer
    Start,
    /// Pause the active timer
    Pause,
    /// Start if idle, pause if running
    ToggleRun,
    /// Reset the active timer without asking
    Reset,
    /// Ask for confirmation, then reset the active timer
    RequestReset,
    /// Save the stopwatch run as a record
    Save,
    /// Move the history selection down
    SelectNext,
    /// Move the history selection up
    SelectPrev,
    /// Delete the selected history record
    Delete,
    /// Import records from a file chosen by the user
    LoadHistory,
    /// Write the active history to a file chosen by the user
    SaveHistory,
    /// Show the other timer
    SwitchTimer,
    /// A scheduled tick became due
    Tick(TickHandle),
    /// Leave the application
    Quit,
}

impl Intent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Start => "start",
            Intent::Pause => "pause",
            Intent::ToggleRun => "toggle",
            Intent::Reset => "reset",
            Intent::RequestReset => "request reset",
            Intent::Save => "save",
            Intent::SelectNext => "select next",
            Intent::SelectPrev => "select previous",
            Intent::Delete => "delete",
            Intent::LoadHistory => "load history",
            Intent::SaveHistory => "save history",
            Intent::SwitchTimer => "switch timer",
            Intent::Tick(_) => "tick",
            Intent::Quit => "quit",
        }
    }
}
