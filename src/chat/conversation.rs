//! Open conversation: optimistic sends and their reconciliation
//!
//! Every state change is a synchronous `&mut self` call, so the owner (the
//! UI loop, or a test) applies them one at a time. Network calls happen
//! between [`Conversation::begin_send`] and [`Conversation::settle_send`];
//! several sends may be in flight and settle in any order.

use crate::api::{ChatBackend, ConfirmedMessage, CreateSummaryRequest, EditMessageRequest, SendMessageRequest};
use crate::message::{next_placeholder_id, now_timestamp, DeliveryStatus, Message};
use crate::session::Session;
use crate::store::MessageStore;
use crate::summary::SummarySelection;
use crate::{Error, Result};
use tracing::{debug, info, warn};

/// A send that has been applied locally and must now reach the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Id of the optimistic entry to reconcile
    pub placeholder_id: String,
    /// Request to issue
    pub request: SendMessageRequest,
}

/// Client state of one open conversation
#[derive(Debug, Clone)]
pub struct Conversation {
    chat_id: String,
    store: MessageStore,
    selection: SummarySelection,
}

impl Conversation {
    /// Open a conversation with an empty message list
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            store: MessageStore::new(),
            selection: SummarySelection::new(),
        }
    }

    /// Conversation id
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Message list
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Messages in list order
    pub fn messages(&self) -> impl DoubleEndedIterator<Item = &Message> + '_ {
        self.store.iter()
    }

    /// Summary selection state
    pub fn selection(&self) -> &SummarySelection {
        &self.selection
    }

    /// Mutable summary selection state
    pub fn selection_mut(&mut self) -> &mut SummarySelection {
        &mut self.selection
    }

    /// Apply a send locally
    ///
    /// Trims `content`, appends a pending placeholder at the end of the list
    /// and returns the request to issue. Returns `None` without touching the
    /// list when the trimmed content is empty or nobody is signed in.
    pub fn begin_send(&mut self, session: &Session, content: &str) -> Option<OutgoingMessage> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let Some(identity) = session.identity() else {
            warn!("Cannot send to chat {}: no signed-in user", self.chat_id);
            return None;
        };

        let placeholder = Message::placeholder(next_placeholder_id(), identity, content, now_timestamp());
        let placeholder_id = placeholder.message_id.clone();
        self.store.append(placeholder);
        debug!("Queued placeholder {} in chat {}", placeholder_id, self.chat_id);

        Some(OutgoingMessage {
            placeholder_id,
            request: SendMessageRequest {
                chat_id: self.chat_id.clone(),
                sender_id: identity.user_id.clone(),
                content: content.to_string(),
            },
        })
    }

    /// Reconcile a placeholder with the backend's answer
    ///
    /// On success the placeholder is replaced in place by the server record.
    /// On any failure it stays in the list, no longer pending, marked failed.
    /// Returns `true` when the entry is still in the list, i.e. the view
    /// should scroll to the bottom.
    pub fn settle_send(&mut self, placeholder_id: &str, outcome: Result<ConfirmedMessage>) -> bool {
        let Some(placeholder) = self.store.get(placeholder_id) else {
            debug!("Placeholder {} is gone, ignoring send result", placeholder_id);
            return false;
        };

        match outcome {
            Ok(confirmed) => {
                let message = confirmed.into_message(placeholder);
                info!("Message {} confirmed as {}", placeholder_id, message.message_id);
                self.store.replace(placeholder_id, message)
            }
            Err(e) => {
                warn!("Failed to send message {} to chat {}: {}", placeholder_id, self.chat_id, e);
                self.store.update(placeholder_id, Message::mark_failed)
            }
        }
    }

    /// Send a message and reconcile the result
    ///
    /// Failures never propagate; they leave the entry marked as failed.
    /// Returns `true` if a placeholder was created.
    pub async fn send<B: ChatBackend>(&mut self, backend: &B, session: &Session, content: &str) -> bool {
        let Some(outgoing) = self.begin_send(session, content) else {
            return false;
        };
        let outcome = backend.send_message(&outgoing.request).await;
        self.settle_send(&outgoing.placeholder_id, outcome);
        true
    }

    /// Replace the list with freshly loaded history
    ///
    /// Placeholders still waiting for the backend are re-appended after the
    /// history so that a refresh during a send does not drop them.
    pub fn apply_history(&mut self, history: Vec<Message>) {
        let in_flight: Vec<Message> = self.store.iter().filter(|m| m.is_pending()).cloned().collect();
        self.store.replace_all(history);
        for placeholder in in_flight {
            self.store.append(placeholder);
        }
    }

    /// Load the history of this conversation
    ///
    /// Any failure, including a missing identity, leaves an empty list.
    pub async fn load<B: ChatBackend>(&mut self, backend: &B, session: &Session) {
        let Some(user_id) = session.user_id() else {
            warn!("Cannot load chat {}: no signed-in user", self.chat_id);
            self.store.clear();
            return;
        };

        match backend.list_messages(&self.chat_id, user_id).await {
            Ok(history) => self.store.replace_all(history),
            Err(e) => {
                warn!("Failed to load chat {}: {}", self.chat_id, e);
                self.store.clear();
            }
        }
    }

    /// Check whether the signed-in user may edit or delete a message
    ///
    /// Only confirmed messages of the signed-in user qualify; pending and
    /// failed entries carry a local id the backend does not know.
    pub fn can_modify(&self, session: &Session, message_id: &str) -> bool {
        self.store
            .get(message_id)
            .map(|m| session.is_own(&m.sender_id) && m.delivery == DeliveryStatus::Sent)
            .unwrap_or(false)
    }

    /// Validate an edit and build its request
    ///
    /// # Errors
    /// * `Error::Validation` - blank text, or the message cannot be modified
    pub fn prepare_edit(&self, session: &Session, message_id: &str, new_content: &str) -> Result<EditMessageRequest> {
        let new_content = new_content.trim();
        if new_content.is_empty() {
            return Err(Error::Validation("Message text cannot be empty".to_string()));
        }
        if !self.can_modify(session, message_id) {
            return Err(Error::Validation("Only your own sent messages can be edited".to_string()));
        }
        Ok(EditMessageRequest {
            message_id: message_id.to_string(),
            new_content: new_content.to_string(),
        })
    }

    /// Apply a confirmed edit locally
    pub fn apply_edit(&mut self, message_id: &str, new_content: &str) -> bool {
        self.store
            .update(message_id, |m| m.content = new_content.to_string())
    }

    /// Edit a message on the backend, then locally on success
    ///
    /// The response body is not trusted; the new text is applied as sent.
    /// Returns `true` if the edit was applied.
    pub async fn edit<B: ChatBackend>(&mut self, backend: &B, session: &Session, message_id: &str, new_content: &str) -> bool {
        let request = match self.prepare_edit(session, message_id, new_content) {
            Ok(request) => request,
            Err(e) => {
                debug!("Edit of {} rejected: {}", message_id, e);
                return false;
            }
        };

        match backend.edit_message(&request).await {
            Ok(()) => self.apply_edit(&request.message_id, &request.new_content),
            Err(e) => {
                warn!("Failed to edit message {}: {}", message_id, e);
                false
            }
        }
    }

    /// Apply a confirmed deletion locally
    pub fn apply_delete(&mut self, message_id: &str) -> bool {
        self.store.remove(message_id).is_some()
    }

    /// Delete a message on the backend, then locally on success
    ///
    /// Returns `true` if the message was removed.
    pub async fn delete<B: ChatBackend>(&mut self, backend: &B, session: &Session, message_id: &str) -> bool {
        if !self.can_modify(session, message_id) {
            debug!("Delete of {} rejected: not an own sent message", message_id);
            return false;
        }

        match backend.delete_message(message_id).await {
            Ok(()) => self.apply_delete(message_id),
            Err(e) => {
                warn!("Failed to delete message {}: {}", message_id, e);
                false
            }
        }
    }

    /// Build the summary request from the current selection
    pub fn begin_summary(&mut self, session: &Session) -> Result<CreateSummaryRequest> {
        self.selection.begin_submit(&self.store, session)
    }

    /// Leave summary mode after a submission
    pub fn finish_summary(&mut self) {
        self.selection.finish_submit();
    }

    /// Submit the selected messages for summarization
    ///
    /// Summary mode is left whatever the outcome, except when the request
    /// could not be built (nothing selected, nobody signed in).
    pub async fn summarize<B: ChatBackend>(&mut self, backend: &B, session: &Session) -> Result<String> {
        let request = self.begin_summary(session)?;
        let outcome = backend.create_summary(&request).await;
        self.finish_summary();
        match &outcome {
            Ok(summary_id) => info!("Summary {} created from chat {}", summary_id, self.chat_id),
            Err(e) => warn!("Failed to create summary from chat {}: {}", self.chat_id, e),
        }
        outcome
    }
}
