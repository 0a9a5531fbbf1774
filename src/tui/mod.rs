//! Terminal UI module
//!
//! Terminal lifecycle, the event loop, key bindings, views and the modal
//! [`Prompter`](crate::prompt::Prompter) built on Ratatui.

mod event_loop;
pub mod keys;
mod prompter;
pub mod theme;
pub mod views;

pub use event_loop::run;
pub use prompter::TerminalPrompter;
pub use theme::{theme, Theme};

use anyhow::Result;
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::{self, stdout, Write};

/// Terminal UI wrapper
///
/// Handles terminal setup, teardown, and provides the rendering surface.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    /// Whether raw mode and the alternate screen are active
    entered: bool,
}

/// Error handler for terminal cleanup operations
/// Used during both normal exit and panic/drop scenarios
enum ErrorHandler {
    /// Log errors via tracing (normal exit)
    Tracing,
    /// Print errors to stderr (panic/drop, tracing may be unavailable)
    Stderr,
}

impl ErrorHandler {
    fn handle(&self, context: &str, error: impl std::fmt::Display) {
        match self {
            ErrorHandler::Tracing => tracing::warn!("{}: {}", context, error),
            ErrorHandler::Stderr => eprintln!("TUI teardown: {}: {}", context, error),
        }
    }
}

/// Show the cursor, leave the alternate screen and disable raw mode
fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    handler: &ErrorHandler,
) {
    if let Err(e) = terminal.show_cursor() {
        handler.handle("failed to show cursor", e);
    }
    if let Err(e) = stdout().execute(LeaveAlternateScreen) {
        handler.handle("failed to leave alternate screen", e);
    }
    if let Err(e) = disable_raw_mode() {
        handler.handle("failed to disable raw mode", e);
    }
}

impl Tui {
    /// Create a new TUI instance
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }

    /// Enter TUI mode (raw mode + alternate screen)
    pub fn enter(&mut self) -> Result<()> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        self.entered = true;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Exit TUI mode (restore terminal)
    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        tracing::debug!("Starting TUI exit sequence");
        restore_terminal(&mut self.terminal, &ErrorHandler::Tracing);
        self.entered = false;
        tracing::debug!("TUI exit sequence completed");
        Ok(())
    }

    /// Draw a frame
    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }

    /// Ring the terminal bell
    pub fn bell(&mut self) {
        print!("\x07");
        let _ = stdout().flush();
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // During drop, tracing may not be available, so errors go to stderr
        if self.entered {
            restore_terminal(&mut self.terminal, &ErrorHandler::Stderr);
        }
    }
}
