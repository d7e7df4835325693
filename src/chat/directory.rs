//! Conversation list and conversation creation

use crate::api::{Chat, ChatType, CreateChatRequest, Participant};
use crate::session::Session;
use crate::{Error, Result};

/// Conversations of one kind, in server order
pub fn chats_of_type(chats: &[Chat], chat_type: ChatType) -> Vec<Chat> {
    chats
        .iter()
        .filter(|chat| chat.chat_type == chat_type)
        .cloned()
        .collect()
}

/// Input of the "new conversation" form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatForm {
    /// Conversation kind
    pub chat_type: ChatType,
    /// Group name; ignored for direct messages
    pub chat_name: String,
    /// Participant e-mail addresses added so far
    pub participants: Vec<String>,
}

impl Default for NewChatForm {
    fn default() -> Self {
        Self {
            chat_type: ChatType::Dm,
            chat_name: String::new(),
            participants: Vec::new(),
        }
    }
}

impl NewChatForm {
    /// Empty form for a direct message
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch between direct message and group
    pub fn toggle_type(&mut self) {
        self.chat_type = match self.chat_type {
            ChatType::Dm => ChatType::Group,
            ChatType::Group => ChatType::Dm,
        };
    }

    /// Add a participant; blank input is ignored
    ///
    /// Returns `true` if the participant was added.
    pub fn add_participant(&mut self, email: &str) -> bool {
        let email = email.trim();
        if email.is_empty() {
            return false;
        }
        self.participants.push(email.to_string());
        true
    }

    /// Remove the participant at `index`
    pub fn remove_participant(&mut self, index: usize) -> Option<String> {
        (index < self.participants.len()).then(|| self.participants.remove(index))
    }

    /// Validate the form and build the creation request
    ///
    /// # Errors
    /// * `Error::MissingIdentity` - nobody is signed in
    /// * `Error::Validation` - a group without a name
    pub fn to_request(&self, session: &Session) -> Result<CreateChatRequest> {
        let creator = session.user_id().ok_or(Error::MissingIdentity)?;

        let chat_name = match self.chat_type {
            ChatType::Dm => None,
            ChatType::Group => {
                let name = self.chat_name.trim();
                if name.is_empty() {
                    return Err(Error::Validation("A group chat needs a name".to_string()));
                }
                Some(name.to_string())
            }
        };

        Ok(CreateChatRequest {
            chat_type: self.chat_type,
            chat_name,
            participants_emails: self
                .participants
                .iter()
                .map(|email| Participant { email: email.clone() })
                .collect(),
            chat_creator_id: creator.to_string(),
        })
    }
}
