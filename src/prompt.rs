//! User prompts
//!
//! The core never draws anything. When it needs an answer from the user it
//! calls a [`Prompter`], which suspends the current action until the user
//! responds. Every prompt can be cancelled, and cancellation comes back as
//! [`Answer::Cancelled`] for the caller to branch on.

use std::path::{Path, PathBuf};

use crate::record::Category;

/// Result of a modal prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<T> {
    /// The user answered
    Given(T),
    /// The user dismissed the prompt
    Cancelled,
}

impl<T> Answer<T> {
    /// Convert into an `Option`, dropping the cancellation
    pub fn into_option(self) -> Option<T> {
        match self {
            Answer::Given(value) => Some(value),
            Answer::Cancelled => None,
        }
    }

    /// Whether the prompt was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Answer::Cancelled)
    }
}

/// Label and category entered when saving a stopwatch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelInput {
    pub label: String,
    pub category: Category,
}

/// Why a path is being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPurpose {
    /// Open an existing history file
    Load,
    /// Write the history to a file
    Save,
}

/// Modal dialogs supplied by the host
pub trait Prompter {
    /// Ask for a line of free text
    fn ask_text(&mut self, title: &str, prompt: &str) -> Answer<String>;

    /// Ask what a stopwatch run was for. `categories` is offered in order,
    /// with the first preselected.
    fn ask_label(&mut self, categories: &[Category]) -> Answer<LabelInput>;

    /// Ask a yes/no question; anything but an explicit yes is `false`
    fn confirm(&mut self, title: &str, message: &str) -> bool;

    /// Ask for a file path, suggesting `default_path`
    fn choose_path(&mut self, purpose: PathPurpose, default_path: &Path) -> Answer<PathBuf>;

    /// Show an error and wait for it to be acknowledged
    fn show_error(&mut self, title: &str, message: &str);
}

#[cfg(test)]
pub(crate) use scripted::ScriptedPrompter;
