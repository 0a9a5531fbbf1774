//! View rendering modules
//!
//! Views draw from a [`Screen`], a plain snapshot of what the application
//! shows. Modal dialogs need the main screen behind them while the
//! application itself is mid-dispatch, so the snapshot is taken up front.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};

use crate::app::{App, TimerKind};
use crate::timer::Phase;
use crate::tui::theme::theme;

mod dialog;
mod history;
mod timer;

pub use dialog::{
    render_confirm_dialog, render_error_dialog, render_label_dialog, render_text_input_dialog,
};
pub use history::render_history;
pub use timer::render_timer_panel;

/// What the timer panel shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerPanel {
    pub label: String,
    pub running: bool,
    /// Pomodoro only
    pub phase: Option<Phase>,
    pub focus_count: u32,
    pub break_count: u32,
}

/// One row of the history list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRow {
    /// Category heading with its record count
    Heading(String),
    /// A record; `index` is its position in file order
    Record { index: usize, text: String },
}

/// Snapshot of everything the main screen draws
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub active: TimerKind,
    pub timer: TimerPanel,
    pub history: Vec<HistoryRow>,
    pub selected: usize,
    pub can_delete: bool,
}

impl Screen {
    pub fn capture(app: &App) -> Self {
        let active = app.active();
        let timer = match active {
            TimerKind::Stopwatch => TimerPanel {
                label: app.stopwatch().label(),
                running: app.stopwatch().is_running(),
                phase: None,
                focus_count: 0,
                break_count: 0,
            },
            TimerKind::Pomodoro => {
                let pomodoro = app.pomodoro();
                TimerPanel {
                    label: pomodoro.label(),
                    running: pomodoro.is_running(),
                    phase: Some(pomodoro.phase()),
                    focus_count: pomodoro.focus_count(),
                    break_count: pomodoro.break_count(),
                }
            }
        };

        let mut history = Vec::new();
        let mut index = 0;
        for (bucket, records) in app.store(active).buckets() {
            if let Some(category) = bucket.category() {
                history.push(HistoryRow::Heading(format!(
                    "{} ({})",
                    category,
                    records.len()
                )));
            }
            for record in records {
                history.push(HistoryRow::Record {
                    index,
                    text: record.formatted(),
                });
                index += 1;
            }
        }

        Self {
            active,
            timer,
            history,
            selected: app.state().selected(active),
            can_delete: app.can_delete(active),
        }
    }

    /// Row position of the selected record, if there is one
    pub fn selected_row(&self) -> Option<usize> {
        self.history.iter().position(
            |row| matches!(row, HistoryRow::Record { index, .. } if *index == self.selected),
        )
    }
}

/// Render the main screen: tabs, timer, history and key hints
pub fn render_screen(frame: &mut Frame, screen: &Screen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(7), // Timer
            Constraint::Min(0),    // History
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    render_tabs(frame, chunks[0], screen.active);
    render_timer_panel(frame, chunks[1], screen.active, &screen.timer);
    render_history(frame, chunks[2], screen);
    render_footer(frame, chunks[3], screen);
}

fn render_tabs(frame: &mut Frame, area: Rect, active: TimerKind) {
    let t = theme();
    let titles: Vec<Line> = TimerKind::ALL.iter().map(|k| Line::from(k.title())).collect();
    let selected = TimerKind::ALL
        .iter()
        .position(|k| *k == active)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(t.muted_style())
        .highlight_style(t.header_style())
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .title(" ticktally "),
        );
    frame.render_widget(tabs, area);
}

fn render_footer(frame: &mut Frame, area: Rect, screen: &Screen) {
    let t = theme();
    let footer = Paragraph::new(footer_hint(screen))
        .style(t.muted_style())
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}

/// Key hints for the footer
pub fn footer_hint(screen: &Screen) -> String {
    let mut hints = vec!["Tab: switch", "Space: start/pause", "r: reset"];
    if screen.active == TimerKind::Stopwatch {
        hints.push("Enter: save");
    }
    hints.push("j/k: select");
    if screen.can_delete {
        hints.push("d: delete");
    }
    hints.extend(["l: load", "w: write", "q: quit"]);
    hints.join(" | ")
}

/// Center a box of at most `width` x `height` inside `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use tempfile::TempDir;

    fn app_with_history(content: &str) -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("stopwatch_history.txt"), content).unwrap();
        let config = Config {
            history_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let app = App::new(config);
        (dir, app)
    }

    #[test]
    fn test_capture_groups_history_under_headings() {
        let (_dir, app) = app_with_history(
            "05/03/2024 | 00:10:00 | run\tExercise\n05/03/2024 | 00:20:00 | code\tWork\n",
        );

        let screen = Screen::capture(&app);

        assert_eq!(
            screen.history,
            vec![
                HistoryRow::Heading("Work (1)".to_string()),
                HistoryRow::Record {
                    index: 0,
                    text: "05/03/2024 | 00:20:00 | code".to_string()
                },
                HistoryRow::Heading("Study (0)".to_string()),
                HistoryRow::Heading("Exercise (1)".to_string()),
                HistoryRow::Record {
                    index: 1,
                    text: "05/03/2024 | 00:10:00 | run".to_string()
                },
                HistoryRow::Heading("Other (0)".to_string()),
            ]
        );
        assert_eq!(screen.selected_row(), Some(1));
        assert!(screen.can_delete);
        assert_eq!(screen.timer.label, "00:00:00");
    }

    #[test]
    fn test_footer_hides_delete_when_empty() {
        let (_dir, app) = app_with_history("");
        let screen = Screen::capture(&app);
        assert_eq!(screen.selected_row(), None);
        assert!(!footer_hint(&screen).contains("d: delete"));
        assert!(footer_hint(&screen).contains("Enter: save"));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(50, 10, area), Rect::new(25, 15, 50, 10));
        assert_eq!(centered_rect(200, 10, area).width, 100);
    }
}
