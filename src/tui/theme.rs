//! Theme module for centralized color and style definitions
//!
//! Semantic colors and styles used by every view.

use ratatui::style::{Color, Modifier, Style};

use crate::timer::Phase;

/// Application theme with all color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    // === Timer States ===
    /// Timer is counting
    pub timer_running: Color,
    /// Timer is paused or has not started
    pub timer_idle: Color,
    /// Pomodoro focus phase
    pub phase_focus: Color,
    /// Pomodoro break phase
    pub phase_break: Color,

    // === UI Elements ===
    /// Primary accent color (headers, titles)
    pub accent: Color,
    /// Text color for normal content
    pub text: Color,
    /// Text color for muted/secondary content
    pub text_muted: Color,
    /// Color for selected/focused items
    pub selected: Color,
    /// Color for text being typed into a dialog
    pub input_prompt: Color,

    // === Dialogs ===
    /// Error dialog border and title
    pub error: Color,

    // === Borders ===
    /// Normal border color
    pub border: Color,
    /// Focused/active border color
    pub border_focused: Color,
    /// Warning border color
    pub border_warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            timer_running: Color::Green,
            timer_idle: Color::DarkGray,
            phase_focus: Color::Red,
            phase_break: Color::Blue,

            accent: Color::Cyan,
            text: Color::White,
            text_muted: Color::DarkGray,
            selected: Color::White,
            input_prompt: Color::Magenta,

            error: Color::Red,

            border: Color::White,
            border_focused: Color::Cyan,
            border_warning: Color::Yellow,
        }
    }

    /// Color for a timer's run state
    pub fn timer_state_color(&self, running: bool) -> Color {
        if running {
            self.timer_running
        } else {
            self.timer_idle
        }
    }

    /// Color for a Pomodoro phase
    pub fn phase_color(&self, phase: Phase) -> Color {
        match phase {
            Phase::Focus => self.phase_focus,
            Phase::Break => self.phase_break,
        }
    }

    // === Style Builders ===

    /// Style for headers/titles
    pub fn header_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Style for muted text
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Style for selected items
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for input prompts
    pub fn input_style(&self) -> Style {
        Style::default().fg(self.input_prompt)
    }
}

/// Global theme instance
static THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

/// Get the current theme
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}
