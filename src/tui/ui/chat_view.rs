//! Chat view screen rendering

use super::helpers::{centered_rect, status_or_help};
use crate::api::ChatBackend;
use crate::message::{format_timestamp, DeliveryStatus, Message};
use crate::tui::app::App;
use crate::tui::screens::ChatViewScreen;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const HELP: &str = "Enter: Send | ↑↓: Highlight | Ctrl+E: Edit | Ctrl+D: Delete | Ctrl+S: Summary mode | Esc: Back";
const SUMMARY_HELP: &str = "↑↓: Highlight | Space: Select | Enter: Create summary | Ctrl+S: Leave summary mode";

/// Renders the screen
pub fn render_chat_view<B: ChatBackend + 'static>(f: &mut Frame, app: &App<B>) {
    let size = f.size();

    let (Some(screen), Some(conversation)) = (&app.chat_view_screen, &app.conversation) else {
        return;
    };
    let selection = conversation.selection();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Message history
            Constraint::Length(3), // Input box
            Constraint::Length(3), // Status/Help
        ])
        .split(size);

    let mode = if selection.is_submitting() {
        " - creating summary...".to_string()
    } else if selection.is_selecting() {
        format!(" - summary mode ({} selected)", selection.selected_count())
    } else {
        String::new()
    };
    let title = Paragraph::new(format!("{}{}", screen.chat_name, mode))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let total = conversation.store().len();
    if total == 0 {
        let text = if screen.loading {
            "Loading messages..."
        } else {
            "No messages yet. Type a message below and press Enter to send."
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Messages"));
        f.render_widget(empty, chunks[1]);
    } else {
        let visible = chunks[1].height.saturating_sub(2) as usize;
        let end = match screen.cursor {
            Some(cursor) => (cursor + 1).max(visible.min(total)).min(total),
            None => total,
        };
        let start = end.saturating_sub(visible);

        let lines: Vec<Line> = conversation
            .messages()
            .enumerate()
            .skip(start)
            .take(end - start)
            .map(|(i, message)| {
                let own = app.session.is_own(&message.sender_id);
                let checkbox = if !selection.is_selecting() {
                    None
                } else if selection.is_selected(&message.message_id) {
                    Some("[x] ")
                } else {
                    Some("[ ] ")
                };
                message_line(message, own, checkbox, screen.cursor == Some(i))
            })
            .collect();

        let messages = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Messages ({}/{})", end, total)),
        );
        f.render_widget(messages, chunks[1]);
    }

    let input = Paragraph::new(screen.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("Type your message"));
    f.render_widget(input, chunks[2]);

    let help = if selection.is_selecting() { SUMMARY_HELP } else { HELP };
    f.render_widget(status_or_help(screen.status.as_ref(), help), chunks[3]);

    if screen.edit.is_some() {
        render_edit_popup(f, screen);
    } else if screen.pending_delete.is_some() {
        render_delete_popup(f);
    }
}

fn message_line(message: &Message, own: bool, checkbox: Option<&'static str>, highlighted: bool) -> Line<'static> {
    let sender_color = if own { Color::Green } else { Color::Blue };
    let content_style = match message.delivery {
        DeliveryStatus::Pending => Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        DeliveryStatus::Failed => Style::default().fg(Color::Red),
        DeliveryStatus::Sent => Style::default().fg(Color::White),
    };

    let mut spans = Vec::new();
    if let Some(checkbox) = checkbox {
        spans.push(Span::styled(checkbox, Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::styled(
        format!("[{}] ", format_timestamp(&message.timestamp)),
        Style::default().fg(Color::DarkGray),
    ));
    spans.push(Span::styled(
        format!("{}: ", message.sender_label()),
        Style::default().fg(sender_color).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(message.content.clone(), content_style));
    if own {
        let status_color = match message.delivery {
            DeliveryStatus::Failed => Color::Red,
            _ => Color::DarkGray,
        };
        spans.push(Span::styled(
            format!("  {} {}", message.status_indicator(), message.status_text()),
            Style::default().fg(status_color),
        ));
    }

    let line = Line::from(spans);
    if highlighted {
        line.style(Style::default().add_modifier(Modifier::REVERSED))
    } else {
        line
    }
}

fn render_edit_popup(f: &mut Frame, screen: &ChatViewScreen) {
    let Some(edit) = &screen.edit else {
        return;
    };
    let area = centered_rect(60, 25, f.size());
    f.render_widget(Clear, area);

    let popup = Paragraph::new(vec![
        Line::from(Span::styled(edit.input.clone(), Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Save  "),
            Span::styled("Esc", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" Cancel"),
        ]),
    ])
    .wrap(Wrap { trim: false })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("Edit Message"),
    );
    f.render_widget(popup, area);
}

fn render_delete_popup(f: &mut Frame) {
    let area = centered_rect(50, 20, f.size());
    f.render_widget(Clear, area);

    let popup = Paragraph::new(vec![
        Line::from("Delete this message?"),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("es  "),
            Span::styled("[N]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw("o"),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title("Confirm Delete"),
    );
    f.render_widget(popup, area);
}
