//! New chat screen rendering

use super::helpers::status_or_help;
use crate::api::{ChatBackend, ChatType};
use crate::tui::app::App;
use crate::tui::screens::NewChatField;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

/// Renders the screen
pub fn render_new_chat<B: ChatBackend + 'static>(f: &mut Frame, app: &App<B>) {
    let size = f.size();

    let Some(screen) = &app.new_chat_screen else {
        return;
    };
    let form = &screen.form;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Type
            Constraint::Length(3), // Name
            Constraint::Length(3), // Participant input
            Constraint::Min(3),    // Participants
            Constraint::Length(3), // Status/Help
        ])
        .split(size);

    let title = Paragraph::new("Start a New Chat")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let type_line = Line::from(
        [ChatType::Dm, ChatType::Group]
            .into_iter()
            .flat_map(|chat_type| {
                let (mark, style) = if chat_type == form.chat_type {
                    ("(•) ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                } else {
                    ("( ) ", Style::default().fg(Color::White))
                };
                [Span::styled(mark, style), Span::styled(format!("{}   ", chat_type.label()), style)]
            })
            .collect::<Vec<_>>(),
    );
    f.render_widget(
        Paragraph::new(type_line).block(field_block("Type (Space to switch)", screen.field == NewChatField::Type)),
        chunks[1],
    );

    let name = if form.chat_type == ChatType::Group {
        Paragraph::new(form.chat_name.as_str()).style(Style::default().fg(Color::Yellow))
    } else {
        Paragraph::new("Not needed for direct messages").style(Style::default().fg(Color::DarkGray))
    };
    f.render_widget(
        name.block(field_block("Group name", screen.field == NewChatField::Name)),
        chunks[2],
    );

    f.render_widget(
        Paragraph::new(screen.participant_input.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(field_block(
                "Participant e-mail (Enter to add)",
                screen.field == NewChatField::Participant,
            )),
        chunks[3],
    );

    let participants: Vec<ListItem> = form
        .participants
        .iter()
        .map(|email| ListItem::new(format!("• {}", email)))
        .collect();
    f.render_widget(
        List::new(participants).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Participants ({})", form.participants.len())),
        ),
        chunks[4],
    );

    let help = if screen.submitting {
        "Creating chat..."
    } else {
        "Tab: Next field | Enter: Add participant | Ctrl+S: Create | Esc: Back"
    };
    f.render_widget(status_or_help(screen.status.as_ref(), help), chunks[5]);
}
