// Screen Tests - Testing screen state structs

use super::super::support::summary;
use crate::api::ChatType;
use crate::chat::Notice;
use crate::tui::screens::*;

#[test]
fn test_chat_list_screen_navigation() {
    let mut screen = ChatListScreen::new();
    assert_eq!(screen.tab, ChatType::Dm);
    assert!(screen.loading);

    screen.next(3);
    screen.next(3);
    assert_eq!(screen.selected_index, 2);
    screen.next(3);
    assert_eq!(screen.selected_index, 0, "Should wrap to the top");
    screen.previous(3);
    assert_eq!(screen.selected_index, 2, "Should wrap to the bottom");

    screen.next(0);
    assert_eq!(screen.selected_index, 0);
}

#[test]
fn test_chat_list_switch_tab_resets_selection() {
    let mut screen = ChatListScreen::new();
    screen.next(5);

    screen.switch_tab();
    assert_eq!(screen.tab, ChatType::Group);
    assert_eq!(screen.selected_index, 0);

    screen.switch_tab();
    assert_eq!(screen.tab, ChatType::Dm);
}

#[test]
fn test_chat_view_input() {
    let mut screen = ChatViewScreen::new("c1".to_string(), "Bob".to_string());
    for c in "Hi!".chars() {
        screen.add_char(c);
    }
    screen.backspace();
    assert_eq!(screen.input, "Hi");

    screen.clear_input();
    assert!(screen.input.is_empty());
}

#[test]
fn test_chat_view_edit_popup_takes_input() {
    let mut screen = ChatViewScreen::new("c1".to_string(), "Bob".to_string());
    screen.add_char('x');
    screen.open_edit("m1".to_string(), "Old".to_string());

    screen.backspace();
    screen.add_char('k');

    assert_eq!(screen.edit.as_ref().unwrap().input, "Olk");
    assert_eq!(screen.input, "x", "Composer should be untouched");

    screen.close_edit();
    assert!(screen.edit.is_none());
}

#[test]
fn test_chat_view_cursor() {
    let mut screen = ChatViewScreen::new("c1".to_string(), "Bob".to_string());
    assert!(screen.follow_bottom);

    screen.cursor_up(0);
    assert_eq!(screen.cursor, None);

    screen.cursor_up(3);
    assert_eq!(screen.cursor, Some(2), "Starts at the newest message");
    assert!(!screen.follow_bottom);
    screen.cursor_up(3);
    screen.cursor_up(3);
    screen.cursor_up(3);
    assert_eq!(screen.cursor, Some(0), "Stops at the oldest message");

    screen.cursor_down(3);
    assert_eq!(screen.cursor, Some(1));
    screen.cursor_down(3);
    screen.cursor_down(3);
    assert_eq!(screen.cursor, None, "Moving past the newest releases the cursor");
    assert!(screen.follow_bottom);
}

#[test]
fn test_chat_view_delete_popup() {
    let mut screen = ChatViewScreen::new("c1".to_string(), "Bob".to_string());
    screen.show_delete_popup("m1".to_string());
    assert_eq!(screen.pending_delete.as_deref(), Some("m1"));
    screen.hide_delete_popup();
    assert!(screen.pending_delete.is_none());
}

#[test]
fn test_status_line_from_notice() {
    let info: StatusLine = Notice::Info("done".to_string()).into();
    let error: StatusLine = Notice::Error("broken".to_string()).into();

    assert_eq!(info.text, "done");
    assert!(!info.is_error);
    assert!(error.is_error);
}

#[test]
fn test_new_chat_screen_fields() {
    let mut screen = NewChatScreen::new();
    assert_eq!(screen.field, NewChatField::Type);

    screen.next_field();
    assert_eq!(screen.field, NewChatField::Participant, "Name is skipped for DMs");
    screen.next_field();
    assert_eq!(screen.field, NewChatField::Type);

    screen.add_char(' ');
    assert_eq!(screen.form.chat_type, ChatType::Group);
    screen.next_field();
    assert_eq!(screen.field, NewChatField::Name);

    for c in "Team".chars() {
        screen.add_char(c);
    }
    assert_eq!(screen.form.chat_name, "Team");
}

#[test]
fn test_new_chat_screen_participants() {
    let mut screen = NewChatScreen::new();
    screen.field = NewChatField::Participant;

    for c in "bob@example.com".chars() {
        screen.add_char(c);
    }
    assert!(screen.commit_participant());
    assert!(!screen.commit_participant(), "Empty input adds nothing");
    assert_eq!(screen.form.participants, vec!["bob@example.com"]);

    // Backspace on an empty input removes the last participant
    screen.backspace();
    assert!(screen.form.participants.is_empty());
}

#[test]
fn test_summary_list_screen_navigation() {
    let mut screen = SummaryListScreen::new();
    assert!(screen.selected().is_none());
    screen.next();
    assert_eq!(screen.selected_index, 0);

    screen.summaries = vec![summary("s1", "A", "a"), summary("s2", "B", "b")];
    screen.previous();
    assert_eq!(screen.selected().unwrap().summary_id, "s2");
    screen.next();
    assert_eq!(screen.selected().unwrap().summary_id, "s1");
}

#[test]
fn test_summary_detail_scroll() {
    let mut screen = SummaryDetailScreen::new("s1".to_string());
    assert!(screen.loading);

    screen.scroll_up();
    assert_eq!(screen.scroll, 0);
    screen.scroll_down();
    screen.scroll_down();
    screen.scroll_up();
    assert_eq!(screen.scroll, 1);
}
