//! History list

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use super::{HistoryRow, Screen};
use crate::tui::theme::{theme, Theme};

const SELECTED_MARKER: &str = "▶ ";
const UNSELECTED_MARKER: &str = "  ";

/// Render the active timer's history, grouped by category for the stopwatch
pub fn render_history(frame: &mut Frame, area: Rect, screen: &Screen) {
    let t = theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.border))
        .title(" History ");

    if !screen.can_delete {
        let empty = Paragraph::new("No records yet")
            .style(t.muted_style())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = screen
        .history
        .iter()
        .map(|row| match row {
            HistoryRow::Heading(text) => {
                ListItem::new(Line::from(Span::styled(text.as_str(), t.header_style())))
            }
            HistoryRow::Record { index, text } => {
                ListItem::new(record_line(text, *index == screen.selected, t))
            }
        })
        .collect();

    let mut state = ListState::default().with_selected(screen.selected_row());
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

/// A record row: arrow and bold accent when selected, no background
fn record_line<'a>(text: &'a str, is_selected: bool, t: &Theme) -> Line<'a> {
    if is_selected {
        Line::from(vec![
            Span::raw(SELECTED_MARKER),
            Span::styled(text, Style::default().fg(t.accent).bold()),
        ])
    } else {
        Line::from(vec![
            Span::raw(UNSELECTED_MARKER),
            Span::styled(text, Style::default().fg(t.text)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_line_marks_selection() {
        let t = Theme::dark();
        let line = record_line("05/03/2024 | 00:10:00 | run", true, &t);
        assert_eq!(line.spans[0].content, SELECTED_MARKER);
        assert_eq!(line.spans[1].style.fg, Some(t.accent));
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));

        let line = record_line("05/03/2024 | 00:10:00 | run", false, &t);
        assert_eq!(line.spans[0].content, UNSELECTED_MARKER);
        assert_eq!(line.spans[1].style.fg, Some(t.text));
    }
}
