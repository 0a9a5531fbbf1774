//! Modal dialogs
//!
//! Every dialog is drawn centred over the main screen on a cleared box.
//! Confirmations use the warning border, errors the error color.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;
use crate::record::Category;
use crate::tui::theme::theme;

const DIALOG_WIDTH: u16 = 60;

fn key_hint(keys: &[(&'static str, Color, &'static str)]) -> Line<'static> {
    let t = theme();
    let mut spans = Vec::new();
    for (i, (key, color, action)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(", ", Style::default().fg(t.text)));
        }
        spans.push(Span::styled(
            *key,
            Style::default().fg(*color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {}", action), Style::default().fg(t.text)));
    }
    Line::from(spans)
}

fn render_box(frame: &mut Frame, lines: Vec<Line>, title: &str, border: Color) {
    // Borders, one blank line above and below the content
    let height = lines.len() as u16 + 4;
    let area = centered_rect(DIALOG_WIDTH, height, frame.size());
    frame.render_widget(Clear, area);

    let mut content = vec![Line::from("")];
    content.extend(lines);
    let paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!(" {} ", title)),
        );
    frame.render_widget(paragraph, area);
}

/// Yes/no question
pub fn render_confirm_dialog(frame: &mut Frame, title: &str, message: &str) {
    let t = theme();
    let lines = vec![
        Line::from(Span::styled(message, Style::default().fg(t.text))),
        Line::from(""),
        key_hint(&[
            ("y", Color::Green, "yes"),
            ("n", Color::Red, "no"),
            ("Esc", Color::Red, "cancel"),
        ]),
    ];
    render_box(frame, lines, title, t.border_warning);
}

/// Error message waiting to be acknowledged
pub fn render_error_dialog(frame: &mut Frame, title: &str, message: &str) {
    let t = theme();
    let lines = vec![
        Line::from(Span::styled(
            message,
            Style::default().fg(t.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key_hint(&[("Enter", t.accent, "ok")]),
    ];
    render_box(frame, lines, title, t.error);
}

/// Single-line text entry
pub fn render_text_input_dialog(frame: &mut Frame, title: &str, prompt: &str, input: &str) {
    let t = theme();
    let lines = vec![
        Line::from(Span::styled(prompt, Style::default().fg(t.text))),
        Line::from(Span::styled(format!("{}_", input), t.input_style())),
        Line::from(""),
        key_hint(&[("Enter", Color::Green, "ok"), ("Esc", Color::Red, "cancel")]),
    ];
    render_box(frame, lines, title, t.border_focused);
}

/// Label entry with a category picker
pub fn render_label_dialog(
    frame: &mut Frame,
    input: &str,
    categories: &[Category],
    selected: usize,
) {
    let t = theme();
    let mut picker = Vec::new();
    for (i, category) in categories.iter().enumerate() {
        if i > 0 {
            picker.push(Span::raw("  "));
        }
        let style = if i == selected {
            t.selected_style().fg(t.accent)
        } else {
            t.muted_style()
        };
        let text = if i == selected {
            format!("[{}]", category)
        } else {
            category.to_string()
        };
        picker.push(Span::styled(text, style));
    }

    let lines = vec![
        Line::from(Span::styled("Label:", Style::default().fg(t.text))),
        Line::from(Span::styled(format!("{}_", input), t.input_style())),
        Line::from(""),
        Line::from(picker),
        Line::from(""),
        key_hint(&[
            ("Up/Down", t.accent, "category"),
            ("Enter", Color::Green, "save"),
            ("Esc", Color::Red, "cancel"),
        ]),
    ];
    render_box(frame, lines, "Save record", t.border_focused);
}
