//! Chat message records and delivery status tracking

use crate::session::Identity;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Display name used when the backend omits `senderName`
pub const UNKNOWN_SENDER: &str = "Unknown User";

/// Local delivery status of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryStatus {
    /// Optimistic entry waiting for the backend
    Pending,
    /// Confirmed by the backend
    #[default]
    Sent,
    /// The backend never confirmed it (error status, network failure or
    /// malformed response)
    Failed,
}

/// One chat message, confirmed or in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Server id, or a local placeholder id while pending
    pub message_id: String,
    /// Sender user id
    pub sender_id: String,
    /// Sender display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    /// Message text
    pub content: String,
    /// ISO-8601 creation time
    pub timestamp: String,
    /// True between optimistic insertion and the backend's answer
    #[serde(skip)]
    pub pending: bool,
    /// Local delivery status, never on the wire
    #[serde(skip)]
    pub delivery: DeliveryStatus,
}

impl Message {
    /// Build a confirmed message
    pub fn new(
        message_id: impl Into<String>,
        sender_id: impl Into<String>,
        sender_name: Option<String>,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            sender_id: sender_id.into(),
            sender_name,
            content: content.into(),
            timestamp: timestamp.into(),
            pending: false,
            delivery: DeliveryStatus::Sent,
        }
    }

    /// Build an optimistic entry for a message that has not been sent yet
    pub fn placeholder(placeholder_id: String, identity: &Identity, content: &str, timestamp: String) -> Self {
        Self {
            message_id: placeholder_id,
            sender_id: identity.user_id.clone(),
            sender_name: Some(identity.display_name().to_string()),
            content: content.to_string(),
            timestamp,
            pending: true,
            delivery: DeliveryStatus::Pending,
        }
    }

    /// Accept a JSON value only if it carries the identifying fields
    ///
    /// `messageId`, `senderId`, `content` and `timestamp` must be strings;
    /// `senderName` is optional. Anything else yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let field = |name: &str| obj.get(name).and_then(Value::as_str).map(str::to_string);

        Some(Self::new(
            field("messageId")?,
            field("senderId")?,
            field("senderName"),
            field("content")?,
            field("timestamp")?,
        ))
    }

    /// Mark as confirmed by the backend
    pub fn mark_sent(&mut self) {
        self.pending = false;
        self.delivery = DeliveryStatus::Sent;
    }

    /// Mark as never confirmed; the entry stays in the list
    pub fn mark_failed(&mut self) {
        self.pending = false;
        self.delivery = DeliveryStatus::Failed;
    }

    /// Check whether the message is still waiting for the backend
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Sender display name, falling back to a generic label
    pub fn sender_label(&self) -> &str {
        self.sender_name.as_deref().unwrap_or(UNKNOWN_SENDER)
    }

    /// Short delivery indicator for list rendering
    pub fn status_indicator(&self) -> &'static str {
        match self.delivery {
            DeliveryStatus::Pending => "↻",
            DeliveryStatus::Sent => "✓",
            DeliveryStatus::Failed => "✗",
        }
    }

    /// Delivery status text shown next to own messages
    pub fn status_text(&self) -> &'static str {
        match self.delivery {
            DeliveryStatus::Pending => "sending...",
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "not delivered",
        }
    }
}

/// Prefix marking a message id as locally generated
pub const PLACEHOLDER_PREFIX: &str = "local-";

/// Produce a fresh placeholder id of the form `local-{uuid}`
pub fn next_placeholder_id() -> String {
    format!("{}{}", PLACEHOLDER_PREFIX, Uuid::new_v4())
}

/// Format an ISO-8601 timestamp for display in local time
///
/// Unparseable input is returned unchanged.
pub fn format_timestamp(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y/%m/%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Current time as an RFC 3339 string with millisecond precision
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
