//! ticktally - terminal stopwatch and Pomodoro timer with a labelled history
//!
//! The timers, history stores and application core are terminal-agnostic;
//! [`tui`] hosts them in a Ratatui interface.

pub mod app;
pub mod clock;
pub mod config;
pub mod logging;
pub mod prompt;
pub mod record;
pub mod scheduler;
pub mod timer;
pub mod tui;
