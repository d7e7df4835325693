//! Chat list screen rendering

use super::helpers::status_or_help;
use crate::api::{ChatBackend, ChatType};
use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
    Frame,
};

/// Renders the screen
pub fn render_chat_list<B: ChatBackend + 'static>(f: &mut Frame, app: &App<B>) {
    let size = f.size();

    let Some(screen) = &app.chat_list_screen else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(5),    // Chat list
            Constraint::Length(3), // Status / help
        ])
        .split(size);

    let selected_tab = match screen.tab {
        ChatType::Dm => 0,
        ChatType::Group => 1,
    };
    let tabs = Tabs::new(vec![ChatType::Dm.label(), ChatType::Group.label()])
        .select(selected_tab)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title("Chats"));
    f.render_widget(tabs, chunks[0]);

    let chats = app.visible_chats();
    if screen.loading {
        let loading = Paragraph::new("Loading chats...")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(loading, chunks[1]);
    } else if chats.is_empty() {
        let empty = Paragraph::new("No chats here yet. Press n to start one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = chats
            .iter()
            .enumerate()
            .map(|(i, chat)| {
                let selected = i == screen.selected_index;
                let marker = if selected { "→ " } else { "  " };
                let name_style = if selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                let mut spans = vec![
                    Span::styled(marker, Style::default().fg(Color::Cyan)),
                    Span::styled(chat.display_name().to_string(), name_style),
                ];
                if let Some(last) = &chat.last_message {
                    spans.push(Span::styled(
                        format!("  {}", last),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ({})", screen.tab.label(), chats.len())),
        );
        f.render_widget(list, chunks[1]);
    }

    let help = "↑↓/j/k: Navigate | Tab: DM/Group | Enter: Open | n: New Chat | r: Refresh | b/Esc: Back";
    f.render_widget(status_or_help(screen.status.as_ref(), help), chunks[2]);
}
