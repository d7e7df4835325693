//! Main TUI application state and logic

use crate::api::{Chat, ChatBackend, ChatType, HttpBackend};
use crate::chat::{chats_of_type, ChatEvent, Conversation, ConversationEvent, Dispatcher, Notice};
use crate::session::Session;
use crate::settings::Settings;
use crate::summary::Summary;
use crate::tui::clipboard::ClipboardProvider;
use crate::tui::screens::*;
use crate::tui::types::{MenuItem, Screen};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;

/// Shown wherever an operation needs a user but none is configured
const NO_USER: &str = "No signed-in user. Set user_id in the settings file.";

/// Application state
///
/// All state is owned here and mutated from the UI loop only. Backend
/// requests run in the background and come back through [`App::poll_events`].
pub struct App<B = HttpBackend> {
    /// Current screen
    pub current_screen: Screen,
    /// Currently selected menu item
    pub selected_index: usize,
    /// Menu items
    pub menu_items: Vec<MenuItem>,
    /// Should quit
    pub should_quit: bool,
    /// Loaded settings
    pub settings: Settings,
    /// Signed-in user
    pub session: Session,
    /// Conversations of every kind, as last fetched
    pub chats: Vec<Chat>,
    /// Dashboard summaries
    pub recent_summaries: Vec<Summary>,
    /// Open conversation
    pub conversation: Option<Conversation>,
    /// Chat list screen (when active)
    pub chat_list_screen: Option<ChatListScreen>,
    /// Chat view screen (when active)
    pub chat_view_screen: Option<ChatViewScreen>,
    /// New chat screen (when active)
    pub new_chat_screen: Option<NewChatScreen>,
    /// Summary list screen (when active)
    pub summary_list_screen: Option<SummaryListScreen>,
    /// Summary detail screen (when active)
    pub summary_detail_screen: Option<SummaryDetailScreen>,
    /// Main menu status line
    pub status: Option<StatusLine>,
    dispatcher: Dispatcher<B>,
    events: UnboundedReceiver<ChatEvent>,
    clipboard: Option<Box<dyn ClipboardProvider>>,
    last_refresh: Instant,
}

impl App<HttpBackend> {
    /// Create the application against the backend named in the settings
    pub fn new(settings: Settings, runtime: Handle) -> Result<Self> {
        let backend = HttpBackend::from_settings(&settings)?;
        Ok(Self::with_backend(settings, Arc::new(backend), runtime))
    }
}

impl<B: ChatBackend + 'static> App<B> {
    /// Create the application against any backend
    pub fn with_backend(settings: Settings, backend: Arc<B>, runtime: Handle) -> Self {
        let (dispatcher, events) = Dispatcher::new(backend, runtime);
        let session = settings.session();

        let app = Self {
            current_screen: Screen::MainMenu,
            selected_index: 0,
            menu_items: MenuItem::all(),
            should_quit: false,
            settings,
            session,
            chats: Vec::new(),
            recent_summaries: Vec::new(),
            conversation: None,
            chat_list_screen: None,
            chat_view_screen: None,
            new_chat_screen: None,
            summary_list_screen: None,
            summary_detail_screen: None,
            status: None,
            dispatcher,
            events,
            clipboard: None,
            last_refresh: Instant::now(),
        };
        app.refresh_dashboard();
        app
    }

    /// Install the clipboard used to copy summaries
    pub fn set_clipboard(&mut self, clipboard: Box<dyn ClipboardProvider>) {
        self.clipboard = Some(clipboard);
    }

    /// Get currently selected menu item
    pub fn selected_item(&self) -> MenuItem {
        self.menu_items[self.selected_index]
    }

    /// Move to next menu item
    pub fn next(&mut self) {
        self.selected_index = (self.selected_index + 1) % self.menu_items.len();
    }

    /// Move to previous menu item
    pub fn previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        } else {
            self.selected_index = self.menu_items.len() - 1;
        }
    }

    /// Activate the selected menu item
    pub fn select(&mut self) {
        match self.selected_item() {
            MenuItem::Chats => self.show_chat_list_screen(),
            MenuItem::NewChat => self.show_new_chat_screen(),
            MenuItem::Summaries => self.show_summary_list_screen(),
            MenuItem::Exit => self.should_quit = true,
        }
    }

    /// Return to the main menu and refresh the dashboard
    pub fn back_to_main_menu(&mut self) {
        self.close_conversation();
        self.chat_list_screen = None;
        self.new_chat_screen = None;
        self.summary_list_screen = None;
        self.summary_detail_screen = None;
        self.current_screen = Screen::MainMenu;
        self.refresh_dashboard();
    }

    fn refresh_dashboard(&self) {
        if let Some(user_id) = self.session.user_id() {
            self.dispatcher.recent_summaries(user_id.to_string());
        }
    }

    // Chat list

    /// Show the chat list and fetch it
    pub fn show_chat_list_screen(&mut self) {
        let mut screen = ChatListScreen::new();
        match self.session.user_id() {
            Some(user_id) => self.dispatcher.list_chats(user_id.to_string()),
            None => {
                screen.loading = false;
                screen.set_status(StatusLine {
                    text: NO_USER.to_string(),
                    is_error: true,
                });
            }
        }
        self.chat_list_screen = Some(screen);
        self.current_screen = Screen::ChatList;
    }

    /// Conversations of the active tab
    pub fn visible_chats(&self) -> Vec<Chat> {
        let tab = self
            .chat_list_screen
            .as_ref()
            .map(|screen| screen.tab)
            .unwrap_or(ChatType::Dm);
        chats_of_type(&self.chats, tab)
    }

    /// Open the selected conversation and fetch its history
    pub fn open_selected_chat(&mut self) {
        let Some(index) = self.chat_list_screen.as_ref().map(|s| s.selected_index) else {
            return;
        };
        let Some(chat) = self.visible_chats().into_iter().nth(index) else {
            return;
        };

        let mut screen = ChatViewScreen::new(chat.chat_id.clone(), chat.display_name().to_string());
        match self.session.user_id() {
            Some(user_id) => self
                .dispatcher
                .load_history(chat.chat_id.clone(), user_id.to_string()),
            None => screen.loading = false,
        }

        self.conversation = Some(Conversation::new(chat.chat_id));
        self.chat_view_screen = Some(screen);
        self.current_screen = Screen::ChatView;
        self.last_refresh = Instant::now();
    }

    /// Leave the open conversation
    ///
    /// Requests still in flight are not cancelled; their results are
    /// ignored once they arrive.
    pub fn back_to_chat_list(&mut self) {
        self.close_conversation();
        self.show_chat_list_screen();
    }

    fn close_conversation(&mut self) {
        self.conversation = None;
        self.chat_view_screen = None;
    }

    // Chat view

    /// Send the composed message
    ///
    /// The message shows up immediately as pending and the input is cleared
    /// before the backend answers.
    pub fn send_message_in_chat(&mut self) {
        let (Some(conversation), Some(screen)) = (&mut self.conversation, &mut self.chat_view_screen) else {
            return;
        };

        if let Some(outgoing) = conversation.begin_send(&self.session, &screen.input) {
            screen.clear_input();
            screen.scroll_to_bottom();
            self.dispatcher.send_message(outgoing);
        }
    }

    /// Id of the highlighted message
    pub fn highlighted_message_id(&self) -> Option<String> {
        let index = self.chat_view_screen.as_ref()?.cursor?;
        let conversation = self.conversation.as_ref()?;
        conversation
            .messages()
            .nth(index)
            .map(|m| m.message_id.clone())
    }

    /// Number of messages in the open conversation
    pub fn message_count(&self) -> usize {
        self.conversation
            .as_ref()
            .map(|c| c.store().len())
            .unwrap_or(0)
    }

    /// Turn summary mode on or off
    pub fn toggle_summary_mode(&mut self) {
        if let Some(conversation) = &mut self.conversation {
            conversation.selection_mut().toggle_mode();
        }
    }

    /// Select or deselect the highlighted message for the summary
    pub fn toggle_highlighted_selection(&mut self) {
        let Some(message_id) = self.highlighted_message_id() else {
            return;
        };
        if let Some(conversation) = &mut self.conversation {
            conversation.selection_mut().toggle(&message_id);
        }
    }

    /// Submit the selected messages for summarization
    pub fn submit_summary(&mut self) {
        let (Some(conversation), Some(screen)) = (&mut self.conversation, &mut self.chat_view_screen) else {
            return;
        };

        match conversation.begin_summary(&self.session) {
            Ok(request) => {
                screen.set_status(StatusLine {
                    text: "Creating summary...".to_string(),
                    is_error: false,
                });
                self.dispatcher
                    .create_summary(conversation.chat_id().to_string(), request);
            }
            Err(Error::Validation(reason)) => screen.set_status(StatusLine {
                text: reason,
                is_error: true,
            }),
            Err(e) => {
                tracing::warn!("Cannot create summary: {}", e);
                screen.set_status(StatusLine {
                    text: NO_USER.to_string(),
                    is_error: true,
                });
            }
        }
    }

    /// Open the edit popup for the highlighted message
    pub fn start_edit(&mut self) {
        let Some(message_id) = self.highlighted_message_id() else {
            return;
        };
        let (Some(conversation), Some(screen)) = (&self.conversation, &mut self.chat_view_screen) else {
            return;
        };
        if !conversation.can_modify(&self.session, &message_id) {
            return;
        }
        if let Some(message) = conversation.store().get(&message_id) {
            screen.open_edit(message_id, message.content.clone());
        }
    }

    /// Submit the edit popup
    pub fn confirm_edit(&mut self) {
        let (Some(conversation), Some(screen)) = (&self.conversation, &mut self.chat_view_screen) else {
            return;
        };
        let Some(edit) = &screen.edit else {
            return;
        };

        match conversation.prepare_edit(&self.session, &edit.message_id, &edit.input) {
            Ok(request) => {
                self.dispatcher
                    .edit_message(conversation.chat_id().to_string(), request);
                screen.close_edit();
            }
            Err(e) => screen.set_status(StatusLine {
                text: e.to_string(),
                is_error: true,
            }),
        }
    }

    /// Close the edit popup without saving
    pub fn cancel_edit(&mut self) {
        if let Some(screen) = &mut self.chat_view_screen {
            screen.close_edit();
        }
    }

    /// Ask to confirm deletion of the highlighted message
    pub fn request_delete(&mut self) {
        let Some(message_id) = self.highlighted_message_id() else {
            return;
        };
        let (Some(conversation), Some(screen)) = (&self.conversation, &mut self.chat_view_screen) else {
            return;
        };
        if conversation.can_modify(&self.session, &message_id) {
            screen.show_delete_popup(message_id);
        }
    }

    /// Delete the message awaiting confirmation
    pub fn confirm_delete(&mut self) {
        let (Some(conversation), Some(screen)) = (&self.conversation, &mut self.chat_view_screen) else {
            return;
        };
        if let Some(message_id) = screen.pending_delete.take() {
            self.dispatcher
                .delete_message(conversation.chat_id().to_string(), message_id);
        }
        screen.cursor = None;
    }

    /// Dismiss the delete confirmation
    pub fn cancel_delete(&mut self) {
        if let Some(screen) = &mut self.chat_view_screen {
            screen.hide_delete_popup();
        }
    }

    /// Refetch the open conversation if the configured interval elapsed
    ///
    /// Pending placeholders survive the refresh.
    pub fn refresh_open_chat_if_due(&mut self) {
        let Some(interval) = self.settings.history_poll_interval() else {
            return;
        };
        if self.last_refresh.elapsed() < interval {
            return;
        }
        self.last_refresh = Instant::now();

        if let (Some(conversation), Some(user_id)) = (&self.conversation, self.session.user_id()) {
            self.dispatcher
                .load_history(conversation.chat_id().to_string(), user_id.to_string());
        }
    }

    // New chat

    /// Show the new chat form
    pub fn show_new_chat_screen(&mut self) {
        self.new_chat_screen = Some(NewChatScreen::new());
        self.current_screen = Screen::NewChat;
    }

    /// Validate the form and create the conversation
    pub fn submit_new_chat(&mut self) {
        let Some(screen) = &mut self.new_chat_screen else {
            return;
        };
        if screen.submitting {
            return;
        }
        screen.commit_participant();

        match screen.form.to_request(&self.session) {
            Ok(request) => {
                screen.submitting = true;
                screen.status = None;
                self.dispatcher.create_chat(request);
            }
            Err(Error::Validation(reason)) => screen.set_status(StatusLine {
                text: reason,
                is_error: true,
            }),
            Err(_) => screen.set_status(StatusLine {
                text: NO_USER.to_string(),
                is_error: true,
            }),
        }
    }

    // Summaries

    /// Show the summary list and fetch it
    pub fn show_summary_list_screen(&mut self) {
        let mut screen = SummaryListScreen::new();
        match self.session.user_id() {
            Some(user_id) => self.dispatcher.list_summaries(user_id.to_string()),
            None => {
                screen.loading = false;
                screen.error = Some(NO_USER.to_string());
            }
        }
        self.summary_list_screen = Some(screen);
        self.summary_detail_screen = None;
        self.current_screen = Screen::SummaryList;
    }

    /// Open the selected summary
    pub fn open_selected_summary(&mut self) {
        let Some(summary_id) = self
            .summary_list_screen
            .as_ref()
            .and_then(|screen| screen.selected())
            .map(|summary| summary.summary_id.clone())
        else {
            return;
        };
        self.open_summary(summary_id);
    }

    /// Open a summary by id and fetch it
    pub fn open_summary(&mut self, summary_id: String) {
        self.dispatcher.get_summary(summary_id.clone());
        self.summary_detail_screen = Some(SummaryDetailScreen::new(summary_id));
        self.current_screen = Screen::SummaryDetail;
    }

    /// Leave the summary detail
    pub fn back_from_summary_detail(&mut self) {
        self.summary_detail_screen = None;
        if self.summary_list_screen.is_some() {
            self.current_screen = Screen::SummaryList;
        } else {
            self.back_to_main_menu();
        }
    }

    /// Copy the open summary text to the clipboard
    pub fn copy_summary_to_clipboard(&mut self) {
        let Some(screen) = &mut self.summary_detail_screen else {
            return;
        };
        let Some(summary) = &screen.summary else {
            return;
        };

        let text = format!("{}\n\n{}", summary.display_title(), summary.body.summary_text());
        let status = match &mut self.clipboard {
            Some(clipboard) => match clipboard.set_text(&text) {
                Ok(()) => StatusLine {
                    text: "Copied to clipboard!".to_string(),
                    is_error: false,
                },
                Err(e) => StatusLine {
                    text: e.to_string(),
                    is_error: true,
                },
            },
            None => StatusLine {
                text: "Clipboard unavailable".to_string(),
                is_error: true,
            },
        };
        screen.set_status(status);
    }

    // Background results

    /// Apply every background result that has arrived
    ///
    /// Returns the number of events applied.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Apply one background result
    pub fn handle_event(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Conversation { chat_id, event } => self.handle_conversation_event(chat_id, event),
            ChatEvent::ChatsLoaded(outcome) => {
                let Some(screen) = &mut self.chat_list_screen else {
                    return;
                };
                screen.loading = false;
                match outcome {
                    Ok(chats) => self.chats = chats,
                    Err(e) => {
                        tracing::warn!("Failed to load chats: {}", e);
                        self.chats.clear();
                    }
                }
                let count = chats_of_type(&self.chats, screen.tab).len();
                if screen.selected_index >= count {
                    screen.selected_index = 0;
                }
            }
            ChatEvent::ChatCreated(outcome) => match outcome {
                Ok(()) => {
                    self.new_chat_screen = None;
                    self.show_chat_list_screen();
                    if let Some(screen) = &mut self.chat_list_screen {
                        screen.set_status(StatusLine {
                            text: "New chat created".to_string(),
                            is_error: false,
                        });
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to create chat: {}", e);
                    if let Some(screen) = &mut self.new_chat_screen {
                        screen.submitting = false;
                        screen.set_status(StatusLine {
                            text: format!("Failed to create chat: {}", e),
                            is_error: true,
                        });
                    }
                }
            },
            ChatEvent::SummariesLoaded(outcome) => {
                let Some(screen) = &mut self.summary_list_screen else {
                    return;
                };
                screen.loading = false;
                match outcome {
                    Ok(summaries) => {
                        screen.summaries = summaries;
                        screen.selected_index = 0;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load summaries: {}", e);
                        screen.error = Some("Failed to load summaries".to_string());
                    }
                }
            }
            ChatEvent::RecentSummariesLoaded(outcome) => match outcome {
                Ok(summaries) => self.recent_summaries = summaries,
                Err(e) => tracing::warn!("Failed to load recent summaries: {}", e),
            },
            ChatEvent::SummaryLoaded(outcome) => {
                let Some(screen) = &mut self.summary_detail_screen else {
                    return;
                };
                screen.loading = false;
                match outcome {
                    Ok(summary) => screen.summary = Some(summary),
                    Err(e) => {
                        tracing::warn!("Failed to load summary {}: {}", screen.summary_id, e);
                        screen.error = Some("Failed to load the summary".to_string());
                    }
                }
            }
        }
    }

    fn handle_conversation_event(&mut self, chat_id: String, event: ConversationEvent) {
        let is_open = self.conversation.as_ref().is_some_and(|c| c.chat_id() == chat_id);
        if !is_open {
            match event {
                ConversationEvent::SummaryCreated(outcome) => {
                    self.show_notice(Notice::for_summary(&chat_id, outcome));
                }
                _ => tracing::debug!("Dropping result for closed chat {}", chat_id),
            }
            return;
        }
        let (Some(conversation), Some(screen)) = (&mut self.conversation, &mut self.chat_view_screen) else {
            return;
        };

        if matches!(event, ConversationEvent::HistoryLoaded(_)) {
            screen.loading = false;
        }

        let applied = conversation.apply(event);
        if applied.scroll_to_bottom && screen.cursor.is_none() {
            screen.scroll_to_bottom();
        }
        if let Some(notice) = applied.notice {
            screen.set_status(notice.into());
        }

        let count = conversation.store().len();
        if screen.cursor.is_some_and(|index| index >= count) {
            screen.cursor = count.checked_sub(1);
        }
    }

    /// Show a notification on the current screen's status line
    fn show_notice(&mut self, notice: Notice) {
        let status = StatusLine::from(notice);
        let target = match self.current_screen {
            Screen::ChatList => self.chat_list_screen.as_mut().map(|s| &mut s.status),
            Screen::ChatView => self.chat_view_screen.as_mut().map(|s| &mut s.status),
            Screen::NewChat => self.new_chat_screen.as_mut().map(|s| &mut s.status),
            Screen::SummaryDetail => self.summary_detail_screen.as_mut().map(|s| &mut s.status),
            Screen::MainMenu | Screen::SummaryList => None,
        };
        match target {
            Some(slot) => *slot = Some(status),
            None => self.status = Some(status),
        }
    }
}
