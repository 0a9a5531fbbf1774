//! Timer panel

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::TimerPanel;
use crate::app::TimerKind;
use crate::tui::theme::theme;

/// Render the active timer: its label, run state and Pomodoro counters
pub fn render_timer_panel(frame: &mut Frame, area: Rect, kind: TimerKind, panel: &TimerPanel) {
    let t = theme();
    let state_color = t.timer_state_color(panel.running);
    let state_text = if panel.running { "Running" } else { "Paused" };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            panel.label.as_str(),
            Style::default().fg(t.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(state_text, Style::default().fg(state_color))),
    ];

    if let Some(phase) = panel.phase {
        lines.push(Line::from(vec![
            Span::styled(
                phase.to_string(),
                Style::default()
                    .fg(t.phase_color(phase))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "   focus: {}   break: {}",
                    panel.focus_count, panel.break_count
                ),
                t.muted_style(),
            ),
        ]));
    }

    let border_color = if panel.running {
        t.border_focused
    } else {
        t.border
    };
    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(format!(" {} ", kind.title())),
    );
    frame.render_widget(widget, area);
}
