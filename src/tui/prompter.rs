//! Modal dialogs in the terminal
//!
//! Each prompt runs its own blocking key loop: the main screen snapshot is
//! redrawn with the dialog on top until the user answers. Ticks that fall
//! due meanwhile are delivered once the dialog closes, and running timers
//! catch up on them.

use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;

use super::views::{
    render_confirm_dialog, render_error_dialog, render_label_dialog, render_screen,
    render_text_input_dialog, Screen,
};
use super::Tui;
use crate::prompt::{Answer, LabelInput, PathPurpose, Prompter};
use crate::record::Category;

/// What a key did to a line being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEdit {
    Submit,
    Cancel,
    Editing,
}

/// Apply a key to a single-line input buffer
fn edit_line(buffer: &mut String, key: KeyEvent) -> LineEdit {
    match key.code {
        KeyCode::Enter => LineEdit::Submit,
        KeyCode::Esc => LineEdit::Cancel,
        KeyCode::Backspace => {
            buffer.pop();
            LineEdit::Editing
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => LineEdit::Cancel,
        KeyCode::Char(c) => {
            buffer.push(c);
            LineEdit::Editing
        }
        _ => LineEdit::Editing,
    }
}

/// Block until the next key press
fn next_key_press() -> Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key);
            }
        }
    }
}

/// [`Prompter`] drawing its dialogs over a snapshot of the main screen
pub struct TerminalPrompter<'a> {
    tui: &'a mut Tui,
    backdrop: &'a Screen,
}

impl<'a> TerminalPrompter<'a> {
    pub fn new(tui: &'a mut Tui, backdrop: &'a Screen) -> Self {
        Self { tui, backdrop }
    }

    /// Redraw with `dialog` on top, then hand each key press to `on_key`
    /// until it returns a value
    fn modal<S, T>(
        &mut self,
        mut state: S,
        dialog: impl Fn(&mut Frame, &S),
        mut on_key: impl FnMut(&mut S, KeyEvent) -> Option<T>,
    ) -> Result<T> {
        loop {
            let backdrop = self.backdrop;
            self.tui.draw(|frame| {
                render_screen(frame, backdrop);
                dialog(frame, &state);
            })?;
            if let Some(answer) = on_key(&mut state, next_key_press()?) {
                return Ok(answer);
            }
        }
    }

    fn read_line(&mut self, title: &str, prompt: &str, initial: String) -> Result<Answer<String>> {
        self.modal(
            initial,
            |frame, input| render_text_input_dialog(frame, title, prompt, input),
            |input, key| match edit_line(input, key) {
                LineEdit::Submit => Some(Answer::Given(input.clone())),
                LineEdit::Cancel => Some(Answer::Cancelled),
                LineEdit::Editing => None,
            },
        )
    }
}

impl Prompter for TerminalPrompter<'_> {
    fn ask_text(&mut self, title: &str, prompt: &str) -> Answer<String> {
        self.read_line(title, prompt, String::new()).unwrap_or_else(|e| {
            tracing::warn!("Text prompt failed: {}", e);
            Answer::Cancelled
        })
    }

    fn ask_label(&mut self, categories: &[Category]) -> Answer<LabelInput> {
        let Some(&first) = categories.first() else {
            return Answer::Cancelled;
        };
        let result = self.modal(
            (String::new(), 0usize),
            |frame, (input, selected)| render_label_dialog(frame, input, categories, *selected),
            |(input, selected), key| match key.code {
                KeyCode::Down | KeyCode::Tab => {
                    *selected = (*selected + 1) % categories.len();
                    None
                }
                KeyCode::Up | KeyCode::BackTab => {
                    *selected = selected.checked_sub(1).unwrap_or(categories.len() - 1);
                    None
                }
                _ => match edit_line(input, key) {
                    LineEdit::Submit => Some(Answer::Given(LabelInput {
                        label: input.clone(),
                        category: categories.get(*selected).copied().unwrap_or(first),
                    })),
                    LineEdit::Cancel => Some(Answer::Cancelled),
                    LineEdit::Editing => None,
                },
            },
        );
        result.unwrap_or_else(|e| {
            tracing::warn!("Label prompt failed: {}", e);
            Answer::Cancelled
        })
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        self.modal(
            (),
            |frame, _| render_confirm_dialog(frame, title, message),
            |_, key| match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
                _ => None,
            },
        )
        .unwrap_or_else(|e| {
            tracing::warn!("Confirmation failed: {}", e);
            false
        })
    }

    fn choose_path(&mut self, purpose: PathPurpose, default_path: &Path) -> Answer<PathBuf> {
        let (title, prompt) = match purpose {
            PathPurpose::Load => ("Load history", "File to load:"),
            PathPurpose::Save => ("Save history", "File to write:"),
        };
        let initial = default_path.display().to_string();
        match self.read_line(title, prompt, initial) {
            Ok(Answer::Given(text)) if !text.trim().is_empty() => {
                Answer::Given(PathBuf::from(text))
            }
            Ok(_) => Answer::Cancelled,
            Err(e) => {
                tracing::warn!("Path prompt failed: {}", e);
                Answer::Cancelled
            }
        }
    }

    fn show_error(&mut self, title: &str, message: &str) {
        let result = self.modal(
            (),
            |frame, _| render_error_dialog(frame, title, message),
            |_, key| matches!(key.code, KeyCode::Enter | KeyCode::Esc).then_some(()),
        );
        if let Err(e) = result {
            tracing::warn!("Error dialog failed: {}", e);
        }
    }
}
