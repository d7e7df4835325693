//! Summary list and detail rendering

use super::helpers::status_or_help;
use crate::api::ChatBackend;
use crate::message::format_timestamp;
use crate::summary::EXCERPT_LEN;
use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Renders the summary list
pub fn render_summary_list<B: ChatBackend + 'static>(f: &mut Frame, app: &App<B>) {
    let size = f.size();

    let Some(screen) = &app.summary_list_screen else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Summaries
            Constraint::Length(3), // Help
        ])
        .split(size);

    let title = Paragraph::new(format!("Summaries ({})", screen.summaries.len()))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let placeholder = if screen.loading {
        Some(("Loading summaries...", Color::DarkGray))
    } else if let Some(error) = &screen.error {
        Some((error.as_str(), Color::Red))
    } else if screen.summaries.is_empty() {
        Some(("No summaries yet.", Color::DarkGray))
    } else {
        None
    };

    match placeholder {
        Some((text, color)) => {
            let widget = Paragraph::new(text)
                .style(Style::default().fg(color))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(widget, chunks[1]);
        }
        None => {
            let items: Vec<ListItem> = screen
                .summaries
                .iter()
                .enumerate()
                .map(|(i, summary)| {
                    let selected = i == screen.selected_index;
                    let title_style = if selected {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    };
                    ListItem::new(vec![
                        Line::from(vec![
                            Span::styled(if selected { "→ " } else { "  " }, Style::default().fg(Color::Cyan)),
                            Span::styled(summary.display_title().to_string(), title_style),
                            Span::styled(
                                format!("  {}", format_timestamp(&summary.timestamp)),
                                Style::default().fg(Color::DarkGray),
                            ),
                        ]),
                        Line::from(Span::styled(
                            format!("  {}", summary.body.excerpt(EXCERPT_LEN)),
                            Style::default().fg(Color::Gray),
                        )),
                    ])
                })
                .collect();
            f.render_widget(List::new(items).block(Block::default().borders(Borders::ALL)), chunks[1]);
        }
    }

    let help = "↑↓/j/k: Navigate | Enter: Open | r: Refresh | b/Esc: Back";
    f.render_widget(status_or_help(None, help), chunks[2]);
}

/// Renders one summary
pub fn render_summary_detail<B: ChatBackend + 'static>(f: &mut Frame, app: &App<B>) {
    let size = f.size();

    let Some(screen) = &app.summary_detail_screen else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Summary text
            Constraint::Length(3), // Status/Help
        ])
        .split(size);

    let heading = screen
        .summary
        .as_ref()
        .map(|s| s.display_title().to_string())
        .unwrap_or_else(|| "Summary".to_string());
    let title = Paragraph::new(heading)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let body = match (&screen.summary, &screen.error) {
        (Some(summary), _) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format_timestamp(&summary.timestamp),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
            ];
            lines.extend(
                summary
                    .body
                    .summary_text()
                    .lines()
                    .map(|line| Line::from(line.to_string())),
            );
            Paragraph::new(lines).style(Style::default().fg(Color::White))
        }
        (None, Some(error)) => Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
        (None, None) => Paragraph::new("Loading summary...").style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(
        body.wrap(Wrap { trim: false })
            .scroll((screen.scroll, 0))
            .block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    let help = "↑↓/j/k: Scroll | c: Copy | b/Esc: Back";
    f.render_widget(status_or_help(screen.status.as_ref(), help), chunks[2]);
}
