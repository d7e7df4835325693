//! Background requests and the events they report back
//!
//! Requests run as tokio tasks that never touch client state. Each task
//! turns its outcome into a [`ChatEvent`] and sends it over a channel; the
//! owner of the state drains the channel and applies events one at a time.

use crate::api::{Chat, ChatBackend, ConfirmedMessage, CreateChatRequest, CreateSummaryRequest, EditMessageRequest};
use crate::chat::conversation::{Conversation, OutgoingMessage};
use crate::message::Message;
use crate::summary::Summary;
use crate::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Outcome of a request scoped to one conversation
#[derive(Debug)]
pub enum ConversationEvent {
    /// History fetched
    HistoryLoaded(Result<Vec<Message>>),
    /// Backend answered a send
    SendSettled {
        /// Placeholder the send created
        placeholder_id: String,
        /// Server record or failure
        outcome: Result<ConfirmedMessage>,
    },
    /// Backend answered an edit
    EditSettled {
        /// Edit that was requested
        request: EditMessageRequest,
        /// Success or failure
        outcome: Result<()>,
    },
    /// Backend answered a deletion
    DeleteSettled {
        /// Message that was deleted
        message_id: String,
        /// Success or failure
        outcome: Result<()>,
    },
    /// Backend answered a summary request
    SummaryCreated(Result<String>),
}

/// Outcome of any background request
#[derive(Debug)]
pub enum ChatEvent {
    /// Event for one conversation
    Conversation {
        /// Conversation the request was issued for
        chat_id: String,
        /// What happened
        event: ConversationEvent,
    },
    /// Conversation list fetched
    ChatsLoaded(Result<Vec<Chat>>),
    /// Conversation creation answered
    ChatCreated(Result<()>),
    /// Summary list fetched
    SummariesLoaded(Result<Vec<Summary>>),
    /// Dashboard summaries fetched
    RecentSummariesLoaded(Result<Vec<Summary>>),
    /// One summary fetched
    SummaryLoaded(Result<Summary>),
}

/// User-facing notification produced by an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Something durable was created
    Info(String),
    /// Something the user asked for failed
    Error(String),
}

impl Notice {
    /// Notification text
    pub fn text(&self) -> &str {
        match self {
            Self::Info(text) | Self::Error(text) => text,
        }
    }

    /// Check whether this is an error notification
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Notification for the outcome of a summary request made from `chat_id`
    pub fn for_summary(chat_id: &str, outcome: Result<String>) -> Self {
        match outcome {
            Ok(summary_id) => Self::Info(format!("Summary created (id: {})", summary_id)),
            Err(e) => {
                warn!("Failed to create summary from chat {}: {}", chat_id, e);
                Self::Error("Failed to create the summary".to_string())
            }
        }
    }
}

/// What the view should do after a conversation event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Applied {
    /// The list settled; scroll to the newest message
    pub scroll_to_bottom: bool,
    /// Notification to show
    pub notice: Option<Notice>,
}

impl Conversation {
    /// Apply the outcome of a background request
    ///
    /// A failed history refresh keeps the current list. Failed sends, edits
    /// and deletions are only logged.
    pub fn apply(&mut self, event: ConversationEvent) -> Applied {
        match event {
            ConversationEvent::HistoryLoaded(Ok(history)) => {
                self.apply_history(history);
                Applied {
                    scroll_to_bottom: true,
                    notice: None,
                }
            }
            ConversationEvent::HistoryLoaded(Err(e)) => {
                warn!("Failed to load chat {}: {}", self.chat_id(), e);
                Applied::default()
            }
            ConversationEvent::SendSettled { placeholder_id, outcome } => Applied {
                scroll_to_bottom: self.settle_send(&placeholder_id, outcome),
                notice: None,
            },
            ConversationEvent::EditSettled { request, outcome } => {
                match outcome {
                    Ok(()) => {
                        self.apply_edit(&request.message_id, &request.new_content);
                    }
                    Err(e) => warn!("Failed to edit message {}: {}", request.message_id, e),
                }
                Applied::default()
            }
            ConversationEvent::DeleteSettled { message_id, outcome } => {
                match outcome {
                    Ok(()) => {
                        self.apply_delete(&message_id);
                    }
                    Err(e) => warn!("Failed to delete message {}: {}", message_id, e),
                }
                Applied::default()
            }
            ConversationEvent::SummaryCreated(outcome) => {
                self.finish_summary();
                Applied {
                    scroll_to_bottom: false,
                    notice: Some(Notice::for_summary(self.chat_id(), outcome)),
                }
            }
        }
    }
}

/// Issues backend requests as background tasks
///
/// Every request reports back exactly one [`ChatEvent`] on the channel
/// returned by [`Dispatcher::new`]. Requests cannot be cancelled.
pub struct Dispatcher<B> {
    backend: Arc<B>,
    runtime: Handle,
    events: UnboundedSender<ChatEvent>,
}

impl<B> Clone for Dispatcher<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            runtime: self.runtime.clone(),
            events: self.events.clone(),
        }
    }
}

impl<B: ChatBackend + 'static> Dispatcher<B> {
    /// Create a dispatcher and the receiving end of its event channel
    pub fn new(backend: Arc<B>, runtime: Handle) -> (Self, UnboundedReceiver<ChatEvent>) {
        let (events, receiver) = unbounded_channel();
        (
            Self {
                backend,
                runtime,
                events,
            },
            receiver,
        )
    }

    /// Backend the requests go to
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ChatEvent> + Send + 'static,
    {
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let event = task.await;
            if events.send(event).is_err() {
                debug!("Event receiver dropped, discarding result");
            }
        });
    }

    /// Issue a send prepared by [`Conversation::begin_send`]
    pub fn send_message(&self, outgoing: OutgoingMessage) {
        let backend = self.backend.clone();
        self.spawn(async move {
            let outcome = backend.send_message(&outgoing.request).await;
            ChatEvent::Conversation {
                chat_id: outgoing.request.chat_id,
                event: ConversationEvent::SendSettled {
                    placeholder_id: outgoing.placeholder_id,
                    outcome,
                },
            }
        });
    }

    /// Fetch the history of a conversation
    pub fn load_history(&self, chat_id: String, user_id: String) {
        let backend = self.backend.clone();
        self.spawn(async move {
            let outcome = backend.list_messages(&chat_id, &user_id).await;
            ChatEvent::Conversation {
                chat_id,
                event: ConversationEvent::HistoryLoaded(outcome),
            }
        });
    }

    /// Issue an edit prepared by [`Conversation::prepare_edit`]
    pub fn edit_message(&self, chat_id: String, request: EditMessageRequest) {
        let backend = self.backend.clone();
        self.spawn(async move {
            let outcome = backend.edit_message(&request).await;
            ChatEvent::Conversation {
                chat_id,
                event: ConversationEvent::EditSettled { request, outcome },
            }
        });
    }

    /// Delete a message
    pub fn delete_message(&self, chat_id: String, message_id: String) {
        let backend = self.backend.clone();
        self.spawn(async move {
            let outcome = backend.delete_message(&message_id).await;
            ChatEvent::Conversation {
                chat_id,
                event: ConversationEvent::DeleteSettled { message_id, outcome },
            }
        });
    }

    /// Issue a summary request prepared by [`Conversation::begin_summary`]
    pub fn create_summary(&self, chat_id: String, request: CreateSummaryRequest) {
        let backend = self.backend.clone();
        self.spawn(async move {
            let outcome = backend.create_summary(&request).await;
            ChatEvent::Conversation {
                chat_id,
                event: ConversationEvent::SummaryCreated(outcome),
            }
        });
    }

    /// Fetch the conversation list
    pub fn list_chats(&self, user_id: String) {
        let backend = self.backend.clone();
        self.spawn(async move { ChatEvent::ChatsLoaded(backend.list_chats(&user_id).await) });
    }

    /// Create a conversation
    pub fn create_chat(&self, request: CreateChatRequest) {
        let backend = self.backend.clone();
        self.spawn(async move { ChatEvent::ChatCreated(backend.create_chat(&request).await) });
    }

    /// Fetch all summaries
    pub fn list_summaries(&self, user_id: String) {
        let backend = self.backend.clone();
        self.spawn(async move { ChatEvent::SummariesLoaded(backend.list_summaries(&user_id).await) });
    }

    /// Fetch the dashboard summaries
    pub fn recent_summaries(&self, user_id: String) {
        let backend = self.backend.clone();
        self.spawn(async move { ChatEvent::RecentSummariesLoaded(backend.recent_summaries(&user_id).await) });
    }

    /// Fetch one summary
    pub fn get_summary(&self, summary_id: String) {
        let backend = self.backend.clone();
        self.spawn(async move { ChatEvent::SummaryLoaded(backend.get_summary(&summary_id).await) });
    }
}
