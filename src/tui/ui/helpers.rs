//! UI helper functions

use crate::tui::screens::StatusLine;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

/// Create a centered rectangle for dialogs
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Status block: the status line if there is one, the key help otherwise
pub fn status_or_help<'a>(status: Option<&'a StatusLine>, help: &'a str) -> Paragraph<'a> {
    let (text, color) = match status {
        Some(status) if status.is_error => (status.text.as_str(), Color::Red),
        Some(status) => (status.text.as_str(), Color::Green),
        None => (help, Color::DarkGray),
    };
    Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}
