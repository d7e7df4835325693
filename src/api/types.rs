//! Wire types of the Butler backend
//!
//! Field names follow the backend's camelCase JSON.

use crate::message::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Conversation the message belongs to
    pub chat_id: String,
    /// Sender user id
    pub sender_id: String,
    /// Trimmed message text
    pub content: String,
}

/// Message record returned by a successful send
///
/// Only `messageId` is required. Fields the backend leaves out are taken
/// from the optimistic entry the record confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedMessage {
    /// Server-assigned id
    pub message_id: String,
    /// Sender user id
    #[serde(default)]
    pub sender_id: Option<String>,
    /// Sender display name
    #[serde(default)]
    pub sender_name: Option<String>,
    /// Stored text
    #[serde(default)]
    pub content: Option<String>,
    /// Server creation time
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ConfirmedMessage {
    /// Record carrying only the server id
    pub fn with_id(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            sender_id: None,
            sender_name: None,
            content: None,
            timestamp: None,
        }
    }

    /// Extract the record from a send response body
    ///
    /// The canonical response shape is `{"message": {...}}`. Returns `None`
    /// when the envelope or a non-empty string `messageId` is missing. Other
    /// fields that are absent or not strings are left to the placeholder.
    pub fn from_response(body: &Value) -> Option<Self> {
        let record = body.get("message")?;
        let message_id = record.get("messageId")?.as_str().filter(|id| !id.is_empty())?;
        let field = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            message_id: message_id.to_string(),
            sender_id: field("senderId"),
            sender_name: field("senderName"),
            content: field("content"),
            timestamp: field("timestamp"),
        })
    }

    /// Merge into the optimistic entry, producing the confirmed message
    pub fn into_message(self, placeholder: &Message) -> Message {
        Message::new(
            self.message_id,
            self.sender_id.unwrap_or_else(|| placeholder.sender_id.clone()),
            self.sender_name.or_else(|| placeholder.sender_name.clone()),
            self.content.unwrap_or_else(|| placeholder.content.clone()),
            self.timestamp.unwrap_or_else(|| placeholder.timestamp.clone()),
        )
    }
}

/// Body of `PUT /api/messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditMessageRequest {
    /// Message to edit
    pub message_id: String,
    /// Replacement text
    pub new_content: String,
}

/// Body of `POST /api/summaries`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSummaryRequest {
    /// Requesting user id
    pub uid: String,
    /// Concatenated messages to summarize
    pub content: String,
}

/// Response of `POST /api/summaries`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSummaryResponse {
    /// Id of the stored summary
    pub summary_id: String,
}

/// Conversation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    /// Direct message between two users
    Dm,
    /// Named group conversation
    Group,
}

impl ChatType {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dm => "Direct Messages",
            Self::Group => "Group Chats",
        }
    }
}

/// One conversation of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    /// Conversation id
    pub chat_id: String,
    /// Conversation kind
    #[serde(rename = "type")]
    pub chat_type: ChatType,
    /// Display name
    #[serde(default)]
    pub chat_name: String,
    /// Preview of the latest message
    #[serde(default)]
    pub last_message: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Chat {
    /// Accept a JSON value only if it is a chat with a non-empty id
    pub fn from_value(value: &Value) -> Option<Self> {
        let chat: Self = serde_json::from_value(value.clone()).ok()?;
        (!chat.chat_id.is_empty()).then_some(chat)
    }

    /// Name to display, falling back to the id
    pub fn display_name(&self) -> &str {
        if self.chat_name.trim().is_empty() {
            &self.chat_id
        } else {
            &self.chat_name
        }
    }
}

/// One invited participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant e-mail address
    pub email: String,
}

/// Body of `POST /api/chats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    /// Conversation kind
    #[serde(rename = "type")]
    pub chat_type: ChatType,
    /// Name, only sent for groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_name: Option<String>,
    /// Invited participants
    pub participants_emails: Vec<Participant>,
    /// Creating user id
    pub chat_creator_id: String,
}

/// Keep the elements of `body[key]` that `parse` accepts, in order
///
/// Returns `None` if `body[key]` is not an array.
pub(crate) fn filter_array<T, F>(body: &Value, key: &str, parse: F) -> Option<Vec<T>>
where
    F: Fn(&Value) -> Option<T>,
{
    let items = body.get(key)?.as_array()?;
    Some(items.iter().filter_map(parse).collect())
}
