//! Screen state structures for TUI

use crate::api::ChatType;
use crate::chat::{NewChatForm, Notice};
use crate::summary::Summary;

/// Move a list cursor forward, wrapping around
fn wrap_next(index: usize, count: usize) -> usize {
    if count == 0 { 0 } else { (index + 1) % count }
}

/// Move a list cursor backward, wrapping around
fn wrap_previous(index: usize, count: usize) -> usize {
    match count {
        0 => 0,
        _ if index == 0 => count - 1,
        _ => (index - 1).min(count - 1),
    }
}

/// Status line content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Text to show
    pub text: String,
    /// Whether to render it as an error
    pub is_error: bool,
}

impl From<Notice> for StatusLine {
    fn from(notice: Notice) -> Self {
        Self {
            is_error: notice.is_error(),
            text: notice.text().to_string(),
        }
    }
}

/// Chat List screen state
#[derive(Debug)]
pub struct ChatListScreen {
    /// Active tab
    pub tab: ChatType,
    /// Selected chat index within the active tab
    pub selected_index: usize,
    /// Whether the list is being fetched
    pub loading: bool,
    /// Status message
    pub status: Option<StatusLine>,
}

impl ChatListScreen {
    /// Create new chat list screen on the DM tab
    pub fn new() -> Self {
        Self {
            tab: ChatType::Dm,
            selected_index: 0,
            loading: true,
            status: None,
        }
    }

    /// Switch between the DM and group tabs
    pub fn switch_tab(&mut self) {
        self.tab = match self.tab {
            ChatType::Dm => ChatType::Group,
            ChatType::Group => ChatType::Dm,
        };
        self.selected_index = 0;
    }

    /// Move to next chat
    pub fn next(&mut self, chat_count: usize) {
        self.selected_index = wrap_next(self.selected_index, chat_count);
    }

    /// Move to previous chat
    pub fn previous(&mut self, chat_count: usize) {
        self.selected_index = wrap_previous(self.selected_index, chat_count);
    }

    /// Set status message
    pub fn set_status(&mut self, status: StatusLine) {
        self.status = Some(status);
    }
}

impl Default for ChatListScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// Edit popup state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPopup {
    /// Message being edited
    pub message_id: String,
    /// Edited text
    pub input: String,
}

/// Chat View screen state
#[derive(Debug)]
pub struct ChatViewScreen {
    /// Open conversation id
    pub chat_id: String,
    /// Conversation name for the title
    pub chat_name: String,
    /// Input buffer for message composition
    pub input: String,
    /// Index of the highlighted message (edit, delete, summary selection)
    pub cursor: Option<usize>,
    /// Keep the newest message in view
    pub follow_bottom: bool,
    /// Whether the history is being fetched
    pub loading: bool,
    /// Edit popup, when open
    pub edit: Option<EditPopup>,
    /// Message awaiting delete confirmation
    pub pending_delete: Option<String>,
    /// Status message
    pub status: Option<StatusLine>,
}

impl ChatViewScreen {
    /// Create new chat view screen
    pub fn new(chat_id: String, chat_name: String) -> Self {
        Self {
            chat_id,
            chat_name,
            input: String::new(),
            cursor: None,
            follow_bottom: true,
            loading: true,
            edit: None,
            pending_delete: None,
            status: None,
        }
    }

    /// Add character to input (or to the edit popup when open)
    pub fn add_char(&mut self, c: char) {
        match &mut self.edit {
            Some(edit) => edit.input.push(c),
            None => self.input.push(c),
        }
    }

    /// Remove last character from input (or from the edit popup when open)
    pub fn backspace(&mut self) {
        match &mut self.edit {
            Some(edit) => {
                edit.input.pop();
            }
            None => {
                self.input.pop();
            }
        }
    }

    /// Clear input buffer
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Highlight the previous message; starts from the newest one
    pub fn cursor_up(&mut self, message_count: usize) {
        if message_count == 0 {
            return;
        }
        self.cursor = Some(match self.cursor {
            None => message_count - 1,
            Some(index) => index.min(message_count - 1).saturating_sub(1),
        });
        self.follow_bottom = false;
    }

    /// Highlight the next message; moving past the newest one releases the cursor
    pub fn cursor_down(&mut self, message_count: usize) {
        match self.cursor {
            Some(index) if index + 1 < message_count => self.cursor = Some(index + 1),
            _ => self.scroll_to_bottom(),
        }
    }

    /// Release the cursor and follow new messages
    pub fn scroll_to_bottom(&mut self) {
        self.cursor = None;
        self.follow_bottom = true;
    }

    /// Open the edit popup
    pub fn open_edit(&mut self, message_id: String, current_content: String) {
        self.edit = Some(EditPopup {
            message_id,
            input: current_content,
        });
    }

    /// Close the edit popup
    pub fn close_edit(&mut self) {
        self.edit = None;
    }

    /// Ask for delete confirmation
    pub fn show_delete_popup(&mut self, message_id: String) {
        self.pending_delete = Some(message_id);
    }

    /// Hide delete confirmation
    pub fn hide_delete_popup(&mut self) {
        self.pending_delete = None;
    }

    /// Set status message
    pub fn set_status(&mut self, status: StatusLine) {
        self.status = Some(status);
    }
}

/// Field focused on the new chat form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewChatField {
    /// DM / group switch
    Type,
    /// Group name
    Name,
    /// Participant e-mail input
    Participant,
}

/// New Chat screen state
#[derive(Debug)]
pub struct NewChatScreen {
    /// Form content
    pub form: NewChatForm,
    /// Focused field
    pub field: NewChatField,
    /// Participant being typed
    pub participant_input: String,
    /// Whether the creation request is in flight
    pub submitting: bool,
    /// Status message
    pub status: Option<StatusLine>,
}

impl NewChatScreen {
    /// Create an empty form
    pub fn new() -> Self {
        Self {
            form: NewChatForm::new(),
            field: NewChatField::Type,
            participant_input: String::new(),
            submitting: false,
            status: None,
        }
    }

    /// Focus the next field; the name field is skipped for direct messages
    pub fn next_field(&mut self) {
        self.field = match (self.field, self.form.chat_type) {
            (NewChatField::Type, ChatType::Group) => NewChatField::Name,
            (NewChatField::Type, ChatType::Dm) => NewChatField::Participant,
            (NewChatField::Name, _) => NewChatField::Participant,
            (NewChatField::Participant, _) => NewChatField::Type,
        };
    }

    /// Type into the focused field
    pub fn add_char(&mut self, c: char) {
        match self.field {
            NewChatField::Type => {
                if c == ' ' {
                    self.toggle_type();
                }
            }
            NewChatField::Name => self.form.chat_name.push(c),
            NewChatField::Participant => self.participant_input.push(c),
        }
    }

    /// Delete from the focused field
    pub fn backspace(&mut self) {
        match self.field {
            NewChatField::Type => {}
            NewChatField::Name => {
                self.form.chat_name.pop();
            }
            NewChatField::Participant => {
                if self.participant_input.pop().is_none() {
                    if let Some(last) = self.form.participants.len().checked_sub(1) {
                        self.form.remove_participant(last);
                    }
                }
            }
        }
    }

    /// Switch between DM and group
    pub fn toggle_type(&mut self) {
        self.form.toggle_type();
    }

    /// Move the typed participant into the list
    ///
    /// Returns `true` if a participant was added.
    pub fn commit_participant(&mut self) -> bool {
        let added = self.form.add_participant(&self.participant_input);
        self.participant_input.clear();
        added
    }

    /// Set status message
    pub fn set_status(&mut self, status: StatusLine) {
        self.status = Some(status);
    }
}

impl Default for NewChatScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary List screen state
#[derive(Debug)]
pub struct SummaryListScreen {
    /// Loaded summaries
    pub summaries: Vec<Summary>,
    /// Selected summary index
    pub selected_index: usize,
    /// Whether the list is being fetched
    pub loading: bool,
    /// Load error to show instead of the list
    pub error: Option<String>,
}

impl SummaryListScreen {
    /// Create new summary list screen waiting for data
    pub fn new() -> Self {
        Self {
            summaries: Vec::new(),
            selected_index: 0,
            loading: true,
            error: None,
        }
    }

    /// Move to next summary
    pub fn next(&mut self) {
        self.selected_index = wrap_next(self.selected_index, self.summaries.len());
    }

    /// Move to previous summary
    pub fn previous(&mut self) {
        self.selected_index = wrap_previous(self.selected_index, self.summaries.len());
    }

    /// Currently selected summary
    pub fn selected(&self) -> Option<&Summary> {
        self.summaries.get(self.selected_index)
    }
}

impl Default for SummaryListScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary Detail screen state
#[derive(Debug)]
pub struct SummaryDetailScreen {
    /// Requested summary id
    pub summary_id: String,
    /// Loaded summary
    pub summary: Option<Summary>,
    /// Whether the summary is being fetched
    pub loading: bool,
    /// Load error to show instead of the summary
    pub error: Option<String>,
    /// Scroll offset in lines
    pub scroll: u16,
    /// Status message
    pub status: Option<StatusLine>,
}

impl SummaryDetailScreen {
    /// Create new detail screen waiting for data
    pub fn new(summary_id: String) -> Self {
        Self {
            summary_id,
            summary: None,
            loading: true,
            error: None,
            scroll: 0,
            status: None,
        }
    }

    /// Scroll up one line
    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    /// Scroll down one line
    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    /// Set status message
    pub fn set_status(&mut self, status: StatusLine) {
        self.status = Some(status);
    }
}
