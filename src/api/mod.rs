//! Backend API
//!
//! [`ChatBackend`] is the seam between client state and the Butler backend.
//! [`HttpBackend`] talks to the real service; tests substitute an in-memory
//! implementation.

pub mod http;
pub mod types;

use crate::message::Message;
use crate::summary::Summary;
use crate::Result;
use std::future::Future;

pub use http::HttpBackend;
pub use types::{
    Chat, ChatType, ConfirmedMessage, CreateChatRequest, CreateSummaryRequest, EditMessageRequest,
    Participant, SendMessageRequest,
};

/// Operations the Butler backend offers to the client
///
/// Every method resolves to `Err` on a non-success status, a transport
/// failure, or a body that does not match the documented shape. List
/// operations drop malformed elements instead of failing.
pub trait ChatBackend: Send + Sync {
    /// History of a conversation, in server order
    fn list_messages(&self, chat_id: &str, user_id: &str) -> impl Future<Output = Result<Vec<Message>>> + Send;

    /// Store a new message and return the server's record of it
    fn send_message(&self, request: &SendMessageRequest) -> impl Future<Output = Result<ConfirmedMessage>> + Send;

    /// Replace the text of a message; the response body is ignored
    fn edit_message(&self, request: &EditMessageRequest) -> impl Future<Output = Result<()>> + Send;

    /// Delete a message
    fn delete_message(&self, message_id: &str) -> impl Future<Output = Result<()>> + Send;

    /// Request a summary and return its id
    fn create_summary(&self, request: &CreateSummaryRequest) -> impl Future<Output = Result<String>> + Send;

    /// All summaries of a user
    fn list_summaries(&self, user_id: &str) -> impl Future<Output = Result<Vec<Summary>>> + Send;

    /// Most recent summaries of a user, for the dashboard
    fn recent_summaries(&self, user_id: &str) -> impl Future<Output = Result<Vec<Summary>>> + Send;

    /// One summary by id
    fn get_summary(&self, summary_id: &str) -> impl Future<Output = Result<Summary>> + Send;

    /// Conversations of a user, all kinds
    fn list_chats(&self, user_id: &str) -> impl Future<Output = Result<Vec<Chat>>> + Send;

    /// Create a conversation
    fn create_chat(&self, request: &CreateChatRequest) -> impl Future<Output = Result<()>> + Send;
}
