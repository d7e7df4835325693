//! AI summaries: stored records and the message selection flow
//!
//! The summarization itself runs on the backend. The client selects
//! messages, sends their concatenation, and later displays the stored
//! summaries. A summary's text embeds a fenced `json` block carrying
//! `{title, summary}`; it is parsed once into [`SummaryBody`] when the
//! record is decoded.

use crate::api::types::CreateSummaryRequest;
use crate::session::Session;
use crate::store::MessageStore;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Title shown for summaries without a structured block
pub const UNTITLED: &str = "Untitled";

/// Default excerpt length on list screens
pub const EXCERPT_LEN: usize = 70;

static JSON_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\s*(\{[\s\S]*?\})\s*```").expect("valid summary block regex"));

/// Structured part of a summary text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryBody {
    /// The fenced block was found and decoded
    Parsed {
        /// Generated title (may be empty)
        title: String,
        /// Generated summary (may be empty)
        summary: String,
    },
    /// No usable block; the raw text is kept as is
    Unparsed(String),
}

#[derive(Deserialize)]
struct EmbeddedSummary {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

impl SummaryBody {
    /// Extract the first fenced `json` block from a summary text
    pub fn parse(text: &str) -> Self {
        let Some(block) = JSON_BLOCK.captures(text).and_then(|c| c.get(1)) else {
            return Self::Unparsed(text.to_string());
        };

        match serde_json::from_str::<EmbeddedSummary>(block.as_str()) {
            Ok(embedded) => Self::Parsed {
                title: embedded.title.unwrap_or_default(),
                summary: embedded.summary.unwrap_or_default(),
            },
            Err(e) => {
                tracing::debug!("Summary block is not valid JSON: {}", e);
                Self::Unparsed(text.to_string())
            }
        }
    }

    /// Title, or [`UNTITLED`] when absent or empty
    pub fn display_title(&self) -> &str {
        match self {
            Self::Parsed { title, .. } if !title.trim().is_empty() => title,
            _ => UNTITLED,
        }
    }

    /// Summary text; empty when no block was found
    pub fn summary_text(&self) -> &str {
        match self {
            Self::Parsed { summary, .. } => summary,
            Self::Unparsed(_) => "",
        }
    }

    /// Summary text cut to `max_chars` characters plus `"..."`
    pub fn excerpt(&self, max_chars: usize) -> String {
        truncate_chars(self.summary_text(), max_chars)
    }
}

/// Cut `text` to `max_chars` characters, appending `"..."` if anything was cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryRecord {
    summary_id: String,
    #[serde(default)]
    uid: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    title: String,
}

/// A stored summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SummaryRecord")]
pub struct Summary {
    /// Summary id
    pub summary_id: String,
    /// Owner user id
    pub uid: String,
    /// Original concatenated messages
    pub content: String,
    /// Raw generated text containing the structured block
    pub summary: String,
    /// Creation time
    pub timestamp: String,
    /// Title field as stored by the backend (usually empty)
    pub title: String,
    /// Parsed structured block
    #[serde(skip)]
    pub body: SummaryBody,
}

impl From<SummaryRecord> for Summary {
    fn from(record: SummaryRecord) -> Self {
        let body = SummaryBody::parse(&record.summary);
        Self {
            summary_id: record.summary_id,
            uid: record.uid,
            content: record.content,
            summary: record.summary,
            timestamp: record.timestamp,
            title: record.title,
            body,
        }
    }
}

impl Default for SummaryBody {
    fn default() -> Self {
        Self::Unparsed(String::new())
    }
}

impl Summary {
    /// Accept a JSON value only if it decodes as a summary
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Title to display
    pub fn display_title(&self) -> &str {
        self.body.display_title()
    }
}

/// Summary mode of the chat view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Summary mode off
    #[default]
    Idle,
    /// Summary mode on; ids of the selected messages
    Selecting(HashSet<String>),
    /// Selection handed to the backend, waiting for the answer
    Submitting,
}

/// Multi-select of messages for summarization
#[derive(Debug, Clone, Default)]
pub struct SummarySelection {
    state: SelectionState,
}

impl SummarySelection {
    /// Start in [`SelectionState::Idle`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Check whether summary mode is on
    pub fn is_selecting(&self) -> bool {
        matches!(self.state, SelectionState::Selecting(_))
    }

    /// Check whether a submission is in flight
    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SelectionState::Submitting)
    }

    /// Turn summary mode on or off, clearing the selection either way
    ///
    /// Ignored while submitting.
    pub fn toggle_mode(&mut self) {
        self.state = match self.state {
            SelectionState::Idle => SelectionState::Selecting(HashSet::new()),
            SelectionState::Selecting(_) => SelectionState::Idle,
            SelectionState::Submitting => return,
        };
    }

    /// Select or deselect a message; only effective in summary mode
    pub fn toggle(&mut self, message_id: &str) {
        if let SelectionState::Selecting(selected) = &mut self.state {
            if !selected.remove(message_id) {
                selected.insert(message_id.to_string());
            }
        }
    }

    /// Check whether a message is selected
    pub fn is_selected(&self, message_id: &str) -> bool {
        match &self.state {
            SelectionState::Selecting(selected) => selected.contains(message_id),
            _ => false,
        }
    }

    /// Number of selected messages
    pub fn selected_count(&self) -> usize {
        match &self.state {
            SelectionState::Selecting(selected) => selected.len(),
            _ => 0,
        }
    }

    /// Build the summary request and move to [`SelectionState::Submitting`]
    ///
    /// Selected messages are concatenated in list order, not in the order
    /// they were clicked, as `"{senderName}: {content}"` separated by blank
    /// lines. Ids no longer in the store are skipped.
    ///
    /// # Errors
    /// * `Error::Validation` - not in summary mode, or nothing selected
    /// * `Error::MissingIdentity` - no signed-in user; the selection is
    ///   kept so the user can retry
    pub fn begin_submit(&mut self, store: &MessageStore, session: &Session) -> Result<CreateSummaryRequest> {
        let SelectionState::Selecting(selected) = &self.state else {
            return Err(Error::Validation("Summary mode is not active".to_string()));
        };

        let content = store
            .iter()
            .filter(|m| selected.contains(&m.message_id))
            .map(|m| format!("{}: {}", m.sender_label(), m.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        if content.is_empty() {
            return Err(Error::Validation("No messages selected for the summary".to_string()));
        }

        let uid = session.user_id().ok_or(Error::MissingIdentity)?.to_string();

        self.state = SelectionState::Submitting;
        Ok(CreateSummaryRequest { uid, content })
    }

    /// Leave summary mode after a submission, whatever its outcome
    pub fn finish_submit(&mut self) {
        self.state = SelectionState::Idle;
    }
}
