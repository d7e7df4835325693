// App Tests - Testing App struct and its flows against a scripted backend

use super::{create_test_app, settle};
use crate::api::{ChatType, ConfirmedMessage};
use crate::message::DeliveryStatus;
use crate::settings::Settings;
use crate::tests::support::{chat, message, summary, MockBackend};
use crate::tui::clipboard::mock::MockClipboard;
use crate::tui::{App, MenuItem, Screen};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

fn chats() -> Vec<crate::api::Chat> {
    vec![
        chat("c1", ChatType::Dm, "Bob"),
        chat("g1", ChatType::Group, "Team"),
        chat("c2", ChatType::Dm, "Carol"),
    ]
}

/// App with the chat list loaded and `c1` open
async fn app_with_open_chat(backend: MockBackend) -> (App<MockBackend>, Arc<MockBackend>) {
    let (mut app, backend) = create_test_app(backend.with_chats(chats())).await;
    app.show_chat_list_screen();
    settle(&mut app, 1).await;
    app.open_selected_chat();
    settle(&mut app, 1).await;
    (app, backend)
}

fn type_text(app: &mut App<MockBackend>, text: &str) {
    let screen = app.chat_view_screen.as_mut().expect("Chat view should be open");
    for c in text.chars() {
        screen.add_char(c);
    }
}

#[tokio::test]
async fn test_app_initialization() {
    let (app, _backend) = create_test_app(
        MockBackend::new().with_summaries(vec![summary("s1", "Standup", "Ship it")]),
    )
    .await;

    assert_eq!(app.current_screen, Screen::MainMenu);
    assert_eq!(app.selected_index, 0);
    assert!(!app.should_quit);
    assert_eq!(app.menu_items.len(), 4);
    assert_eq!(app.session.user_id(), Some("u1"));
    assert_eq!(app.recent_summaries.len(), 1, "Dashboard should be loaded");
}

#[tokio::test]
async fn test_app_navigation() {
    let (mut app, _backend) = create_test_app(MockBackend::new()).await;

    app.next();
    assert_eq!(app.selected_item(), MenuItem::NewChat);
    app.previous();
    app.previous();
    assert_eq!(app.selected_item(), MenuItem::Exit, "Should wrap to the last item");
    app.next();
    assert_eq!(app.selected_index, 0, "Should wrap to the first item");

    app.previous();
    app.select();
    assert!(app.should_quit);
}

#[tokio::test]
async fn test_chat_list_tabs() {
    let (mut app, _backend) = create_test_app(MockBackend::new().with_chats(chats())).await;

    app.show_chat_list_screen();
    assert_eq!(app.current_screen, Screen::ChatList);
    assert!(app.chat_list_screen.as_ref().unwrap().loading);
    settle(&mut app, 1).await;

    assert!(!app.chat_list_screen.as_ref().unwrap().loading);
    let dms: Vec<_> = app.visible_chats().into_iter().map(|c| c.chat_id).collect();
    assert_eq!(dms, vec!["c1", "c2"]);

    app.chat_list_screen.as_mut().unwrap().switch_tab();
    let groups: Vec<_> = app.visible_chats().into_iter().map(|c| c.chat_id).collect();
    assert_eq!(groups, vec!["g1"]);
}

#[tokio::test]
async fn test_chat_list_load_failure() {
    let backend = MockBackend::new();
    *backend.chats.lock().unwrap() = None;
    let (mut app, _backend) = create_test_app(backend).await;

    app.show_chat_list_screen();
    settle(&mut app, 1).await;

    assert!(app.chats.is_empty());
    assert!(!app.chat_list_screen.as_ref().unwrap().loading);
}

#[tokio::test]
async fn test_open_chat_loads_history() {
    let (app, backend) = app_with_open_chat(
        MockBackend::new().with_history(vec![message("m1", "u2", "Bob", "Hi")]),
    )
    .await;

    assert_eq!(app.current_screen, Screen::ChatView);
    let conversation = app.conversation.as_ref().unwrap();
    assert_eq!(conversation.chat_id(), "c1");
    assert_eq!(conversation.store().len(), 1);
    assert_eq!(app.chat_view_screen.as_ref().unwrap().chat_name, "Bob");
    assert!(!app.chat_view_screen.as_ref().unwrap().loading);
    assert_eq!(backend.history_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_send_message_optimistic_then_confirmed() {
    let (mut app, backend) = app_with_open_chat(MockBackend::new()).await;
    backend.reply_to_send(Some(ConfirmedMessage::with_id("42")));

    type_text(&mut app, "  Hello ");
    app.send_message_in_chat();

    // Visible and cleared before the backend answers
    assert!(app.chat_view_screen.as_ref().unwrap().input.is_empty());
    {
        let messages: Vec<_> = app.conversation.as_ref().unwrap().messages().collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "Hello");
        assert!(messages[0].pending);
    }

    settle(&mut app, 1).await;

    let messages: Vec<_> = app.conversation.as_ref().unwrap().messages().collect();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_id, "42");
    assert!(!messages[0].pending);
    assert_eq!(backend.sent.lock().unwrap()[0].content, "Hello");
}

#[tokio::test]
async fn test_send_message_failure_marks_entry() {
    let (mut app, backend) = app_with_open_chat(MockBackend::new()).await;
    backend.reply_to_send(None);

    type_text(&mut app, "Hello");
    app.send_message_in_chat();
    settle(&mut app, 1).await;

    let messages: Vec<_> = app.conversation.as_ref().unwrap().messages().collect();
    assert_eq!(messages.len(), 1);
    assert!(!messages[0].pending);
    assert_eq!(messages[0].delivery, DeliveryStatus::Failed);
}

#[tokio::test]
async fn test_send_whitespace_is_noop() {
    let (mut app, backend) = app_with_open_chat(MockBackend::new()).await;

    type_text(&mut app, "   ");
    app.send_message_in_chat();

    assert!(app.conversation.as_ref().unwrap().store().is_empty());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(app.poll_events(), 0);
    assert_eq!(backend.sent_count(), 0);
}

#[tokio::test]
async fn test_result_for_closed_chat_is_ignored() {
    let backend = MockBackend::new();
    backend.delay_send("Hello", Duration::from_millis(50));
    let (mut app, backend) = app_with_open_chat(backend).await;

    type_text(&mut app, "Hello");
    app.send_message_in_chat();

    // Switch to Carol before the send settles
    app.back_to_chat_list();
    app.chat_list_screen.as_mut().unwrap().next(2);
    app.open_selected_chat();
    settle(&mut app, 3).await;

    let conversation = app.conversation.as_ref().unwrap();
    assert_eq!(conversation.chat_id(), "c2");
    assert!(conversation.store().is_empty());
    assert_eq!(backend.sent_count(), 1);
}

#[tokio::test]
async fn test_summary_flow() {
    let (mut app, backend) = app_with_open_chat(MockBackend::new().with_history(vec![
        message("m1", "u1", "Alice", "Hi"),
        message("m2", "u2", "Bob", "Yo"),
    ]))
    .await;

    app.toggle_summary_mode();
    let count = app.message_count();
    // Select the newest message first, then the older one
    app.chat_view_screen.as_mut().unwrap().cursor_up(count);
    app.toggle_highlighted_selection();
    app.chat_view_screen.as_mut().unwrap().cursor_up(count);
    app.toggle_highlighted_selection();
    assert_eq!(app.conversation.as_ref().unwrap().selection().selected_count(), 2);

    app.submit_summary();
    assert!(app.conversation.as_ref().unwrap().selection().is_submitting());
    settle(&mut app, 1).await;

    let requests = backend.summary_requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].content, "Alice: Hi\n\nBob: Yo");

    let screen = app.chat_view_screen.as_ref().unwrap();
    let status = screen.status.as_ref().unwrap();
    assert_eq!(status.text, "Summary created (id: s-1)");
    assert!(!status.is_error);
    assert!(!app.conversation.as_ref().unwrap().selection().is_selecting());
}

#[tokio::test]
async fn test_summary_confirmation_after_leaving_chat() {
    let (mut app, backend) =
        app_with_open_chat(MockBackend::new().with_history(vec![message("m1", "u2", "Bob", "Yo")])).await;

    app.toggle_summary_mode();
    let count = app.message_count();
    app.chat_view_screen.as_mut().unwrap().cursor_up(count);
    app.toggle_highlighted_selection();
    app.submit_summary();
    app.back_to_chat_list();
    assert!(app.conversation.is_none());

    // Chat list reload plus the summary answer
    settle(&mut app, 2).await;

    assert_eq!(backend.summary_requests.lock().unwrap().len(), 1);
    let status = app.chat_list_screen.as_ref().unwrap().status.clone().unwrap();
    assert_eq!(status.text, "Summary created (id: s-1)");
    assert!(!status.is_error);
}

#[tokio::test]
async fn test_summary_confirmation_on_main_menu() {
    let (mut app, _) =
        app_with_open_chat(MockBackend::new().with_history(vec![message("m1", "u2", "Bob", "Yo")])).await;

    app.toggle_summary_mode();
    let count = app.message_count();
    app.chat_view_screen.as_mut().unwrap().cursor_up(count);
    app.toggle_highlighted_selection();
    app.submit_summary();
    app.back_to_main_menu();

    // Dashboard reload plus the summary answer
    settle(&mut app, 2).await;

    assert_eq!(app.current_screen, Screen::MainMenu);
    assert_eq!(app.status.as_ref().unwrap().text, "Summary created (id: s-1)");
}

#[tokio::test]
async fn test_summary_with_nothing_selected() {
    let (mut app, backend) = app_with_open_chat(
        MockBackend::new().with_history(vec![message("m1", "u1", "Alice", "Hi")]),
    )
    .await;

    app.toggle_summary_mode();
    app.submit_summary();

    let status = app.chat_view_screen.as_ref().unwrap().status.clone().unwrap();
    assert!(status.is_error);
    assert!(app.conversation.as_ref().unwrap().selection().is_selecting());
    assert!(backend.summary_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_own_message() {
    let (mut app, backend) = app_with_open_chat(
        MockBackend::new().with_history(vec![message("m1", "u1", "Alice", "Hi")]),
    )
    .await;

    app.chat_view_screen.as_mut().unwrap().cursor_up(1);
    app.start_edit();
    {
        let screen = app.chat_view_screen.as_mut().unwrap();
        assert_eq!(screen.edit.as_ref().unwrap().input, "Hi");
        screen.backspace();
        screen.add_char('!');
    }
    app.confirm_edit();
    assert!(app.chat_view_screen.as_ref().unwrap().edit.is_none());
    settle(&mut app, 1).await;

    assert_eq!(app.conversation.as_ref().unwrap().store().get("m1").unwrap().content, "H!");
    assert_eq!(backend.edits.lock().unwrap()[0].new_content, "H!");
}

#[tokio::test]
async fn test_edit_blank_is_rejected() {
    let (mut app, backend) = app_with_open_chat(
        MockBackend::new().with_history(vec![message("m1", "u1", "Alice", "Hi")]),
    )
    .await;

    app.chat_view_screen.as_mut().unwrap().cursor_up(1);
    app.start_edit();
    app.chat_view_screen.as_mut().unwrap().edit.as_mut().unwrap().input = "  ".to_string();
    app.confirm_edit();

    let screen = app.chat_view_screen.as_ref().unwrap();
    assert!(screen.edit.is_some(), "Popup stays open");
    assert!(screen.status.as_ref().unwrap().is_error);
    assert!(backend.edits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_cannot_edit_or_delete_foreign_message() {
    let (mut app, _backend) = app_with_open_chat(
        MockBackend::new().with_history(vec![message("m1", "u2", "Bob", "Hi")]),
    )
    .await;

    app.chat_view_screen.as_mut().unwrap().cursor_up(1);
    app.start_edit();
    app.request_delete();

    let screen = app.chat_view_screen.as_ref().unwrap();
    assert!(screen.edit.is_none());
    assert!(screen.pending_delete.is_none());
}

#[tokio::test]
async fn test_delete_own_message() {
    let (mut app, backend) = app_with_open_chat(MockBackend::new().with_history(vec![
        message("m1", "u2", "Bob", "Hi"),
        message("m2", "u1", "Alice", "Bye"),
    ]))
    .await;

    app.chat_view_screen.as_mut().unwrap().cursor_up(2);
    app.request_delete();
    assert_eq!(app.chat_view_screen.as_ref().unwrap().pending_delete.as_deref(), Some("m2"));

    app.confirm_delete();
    settle(&mut app, 1).await;

    let ids: Vec<_> = app
        .conversation
        .as_ref()
        .unwrap()
        .messages()
        .map(|m| m.message_id.clone())
        .collect();
    assert_eq!(ids, vec!["m1"]);
    assert_eq!(*backend.deletes.lock().unwrap(), vec!["m2".to_string()]);
}

#[tokio::test]
async fn test_new_chat_flow() {
    let (mut app, backend) = create_test_app(MockBackend::new()).await;

    app.show_new_chat_screen();
    assert_eq!(app.current_screen, Screen::NewChat);
    app.new_chat_screen.as_mut().unwrap().toggle_type();

    app.submit_new_chat();
    let screen = app.new_chat_screen.as_ref().unwrap();
    assert!(screen.status.as_ref().unwrap().is_error, "Group without a name is rejected");
    assert!(!screen.submitting);

    {
        let screen = app.new_chat_screen.as_mut().unwrap();
        screen.form.chat_name = "Team".to_string();
        screen.participant_input = "bob@example.com".to_string();
    }
    app.submit_new_chat();
    assert!(app.new_chat_screen.as_ref().unwrap().submitting);
    settle(&mut app, 2).await;

    assert_eq!(app.current_screen, Screen::ChatList);
    assert!(app.new_chat_screen.is_none());
    let status = app.chat_list_screen.as_ref().unwrap().status.clone().unwrap();
    assert_eq!(status.text, "New chat created");

    let created = backend.created_chats.lock().unwrap().clone();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].chat_name.as_deref(), Some("Team"));
    assert_eq!(created[0].participants_emails[0].email, "bob@example.com");
}

#[tokio::test]
async fn test_new_chat_failure_stays_on_form() {
    let backend = MockBackend::new();
    *backend.fail_create_chat.lock().unwrap() = true;
    let (mut app, _backend) = create_test_app(backend).await;

    app.show_new_chat_screen();
    app.submit_new_chat();
    settle(&mut app, 1).await;

    assert_eq!(app.current_screen, Screen::NewChat);
    let screen = app.new_chat_screen.as_ref().unwrap();
    assert!(!screen.submitting);
    assert!(screen.status.as_ref().unwrap().is_error);
}

#[tokio::test]
async fn test_summary_list_detail_and_copy() {
    let (mut app, _backend) = create_test_app(MockBackend::new().with_summaries(vec![
        summary("s1", "Standup", "Ship Friday"),
        summary("s2", "Retro", "More tests"),
    ]))
    .await;
    let clipboard = MockClipboard::new();
    app.set_clipboard(Box::new(clipboard.clone()));

    app.show_summary_list_screen();
    settle(&mut app, 1).await;
    assert_eq!(app.summary_list_screen.as_ref().unwrap().summaries.len(), 2);

    app.summary_list_screen.as_mut().unwrap().next();
    app.open_selected_summary();
    assert_eq!(app.current_screen, Screen::SummaryDetail);
    settle(&mut app, 1).await;

    let detail = app.summary_detail_screen.as_ref().unwrap();
    assert!(!detail.loading);
    assert_eq!(detail.summary.as_ref().unwrap().display_title(), "Retro");

    app.copy_summary_to_clipboard();
    assert_eq!(clipboard.content().as_deref(), Some("Retro\n\nMore tests"));
    let status = app.summary_detail_screen.as_ref().unwrap().status.clone().unwrap();
    assert!(!status.is_error);

    app.back_from_summary_detail();
    assert_eq!(app.current_screen, Screen::SummaryList);
}

#[tokio::test]
async fn test_copy_without_clipboard() {
    let (mut app, _backend) =
        create_test_app(MockBackend::new().with_summaries(vec![summary("s1", "Standup", "Ship Friday")])).await;

    app.open_summary("s1".to_string());
    settle(&mut app, 1).await;
    app.copy_summary_to_clipboard();

    let status = app.summary_detail_screen.as_ref().unwrap().status.clone().unwrap();
    assert!(status.is_error);
}

#[tokio::test]
async fn test_missing_summary_shows_error() {
    let (mut app, _backend) = create_test_app(MockBackend::new()).await;

    app.open_summary("nope".to_string());
    settle(&mut app, 1).await;

    let detail = app.summary_detail_screen.as_ref().unwrap();
    assert!(detail.summary.is_none());
    assert!(detail.error.is_some());
}

#[tokio::test]
async fn test_anonymous_app_issues_no_requests() {
    let backend = Arc::new(MockBackend::new().with_chats(chats()));
    let mut app = App::with_backend(Settings::default(), backend.clone(), Handle::current());

    app.show_chat_list_screen();
    let screen = app.chat_list_screen.as_ref().unwrap();
    assert!(!screen.loading);
    assert!(screen.status.as_ref().unwrap().is_error);

    app.show_summary_list_screen();
    assert!(app.summary_list_screen.as_ref().unwrap().error.is_some());

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(app.poll_events(), 0);
}

#[tokio::test]
async fn test_history_refresh_when_due() {
    let (mut app, backend) = app_with_open_chat(
        MockBackend::new().with_history(vec![message("m1", "u2", "Bob", "Hi")]),
    )
    .await;

    app.refresh_open_chat_if_due();
    assert_eq!(backend.history_calls.load(Ordering::SeqCst), 1, "Polling is off by default");

    app.settings.history_poll_secs = 1;
    tokio::time::sleep(Duration::from_millis(1100)).await;
    app.refresh_open_chat_if_due();
    settle(&mut app, 1).await;

    assert_eq!(backend.history_calls.load(Ordering::SeqCst), 2);
    assert_eq!(app.conversation.as_ref().unwrap().store().len(), 1);
}

#[tokio::test]
async fn test_back_to_main_menu_resets_screens() {
    let (mut app, _backend) = app_with_open_chat(MockBackend::new()).await;

    app.back_to_main_menu();
    settle(&mut app, 1).await;

    assert_eq!(app.current_screen, Screen::MainMenu);
    assert!(app.conversation.is_none());
    assert!(app.chat_view_screen.is_none());
    assert!(app.chat_list_screen.is_none());
}
