//! Main menu screen rendering

use super::helpers::status_or_help;
use crate::api::ChatBackend;
use crate::summary::EXCERPT_LEN;
use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Renders the screen
pub fn render_main_menu<B: ChatBackend + 'static>(f: &mut Frame, app: &App<B>) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Identity
            Constraint::Length(6), // Menu
            Constraint::Min(5),    // Recent summaries
            Constraint::Length(3), // Help text
        ])
        .split(size);

    let title = Paragraph::new("Butler - Chat & Summaries")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let identity = match app.session.identity() {
        Some(identity) => Paragraph::new(format!(
            "Signed in as {} ({}) | {}",
            identity.display_name(),
            identity.user_id,
            app.settings.api_base_url
        ))
        .style(Style::default().fg(Color::Green)),
        None => Paragraph::new(Line::from(vec![
            Span::styled("⚠ ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled("No signed-in user. ", Style::default().fg(Color::Yellow)),
            Span::styled("Set user_id in the settings file.", Style::default().fg(Color::DarkGray)),
        ])),
    };
    f.render_widget(
        identity
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Identity")),
        chunks[1],
    );

    let menu_items: Vec<ListItem> = app
        .menu_items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let content = if i == app.selected_index {
                Line::from(vec![
                    Span::styled("→ ", Style::default().fg(Color::Yellow)),
                    Span::styled(
                        item.label(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(item.label(), Style::default().fg(Color::White)),
                ])
            };
            ListItem::new(content)
        })
        .collect();

    let menu = List::new(menu_items).block(Block::default().borders(Borders::ALL).title("Main Menu"));
    f.render_widget(menu, chunks[2]);

    // Dashboard
    if app.recent_summaries.is_empty() {
        let empty = Paragraph::new("No summaries yet. Select messages in a chat and press s to create one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Recent Summaries"));
        f.render_widget(empty, chunks[3]);
    } else {
        let items: Vec<ListItem> = app
            .recent_summaries
            .iter()
            .map(|summary| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        summary.display_title().to_string(),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        summary.body.excerpt(EXCERPT_LEN),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect();
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Recent Summaries"));
        f.render_widget(list, chunks[3]);
    }

    let help = format!(
        "{} | ↑↓/j/k: Navigate | Enter: Select | c/n/s: Quick | q/Esc: Quit",
        app.selected_item().description()
    );
    f.render_widget(status_or_help(app.status.as_ref(), &help), chunks[4]);
}
