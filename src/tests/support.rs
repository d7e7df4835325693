// Shared test helpers: a scripted in-memory backend and fixtures

use crate::api::{
    Chat, ChatBackend, ChatType, ConfirmedMessage, CreateChatRequest, CreateSummaryRequest, EditMessageRequest,
    SendMessageRequest,
};
use crate::message::Message;
use crate::session::{Identity, Session};
use crate::summary::Summary;
use crate::{Error, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Session of the default test user
pub fn alice() -> Session {
    Session::signed_in(Identity::new("u1", Some("Alice".to_string())))
}

/// Confirmed message fixture
pub fn message(id: &str, sender_id: &str, sender_name: &str, content: &str) -> Message {
    Message::new(id, sender_id, Some(sender_name.to_string()), content, "2024-05-01T10:00:00Z")
}

/// Chat fixture
pub fn chat(id: &str, chat_type: ChatType, name: &str) -> Chat {
    Chat {
        chat_id: id.to_string(),
        chat_type,
        chat_name: name.to_string(),
        last_message: None,
        avatar: None,
    }
}

/// Summary fixture with an embedded structured block
pub fn summary(id: &str, title: &str, text: &str) -> Summary {
    let value = serde_json::json!({
        "summaryId": id,
        "uid": "u1",
        "content": "Alice: hi",
        "summary": format!("```json\n{{\"title\": \"{}\", \"summary\": \"{}\"}}\n```", title, text),
        "timestamp": "2024-05-01T10:00:00Z",
        "title": "",
    });
    Summary::from_value(&value).unwrap()
}

/// In-memory backend with scripted answers
///
/// `None` in a scripted slot makes the call fail with a 500 status.
/// Every request is recorded.
#[derive(Default)]
pub struct MockBackend {
    pub history: Mutex<Option<Vec<Message>>>,
    pub send_replies: Mutex<VecDeque<Option<ConfirmedMessage>>>,
    pub send_delays: Mutex<HashMap<String, Duration>>,
    pub fail_edits: Mutex<bool>,
    pub fail_deletes: Mutex<bool>,
    pub summary_reply: Mutex<Option<String>>,
    pub chats: Mutex<Option<Vec<Chat>>>,
    pub fail_create_chat: Mutex<bool>,
    pub summaries: Mutex<Option<Vec<Summary>>>,

    pub sent: Mutex<Vec<SendMessageRequest>>,
    pub edits: Mutex<Vec<EditMessageRequest>>,
    pub deletes: Mutex<Vec<String>>,
    pub summary_requests: Mutex<Vec<CreateSummaryRequest>>,
    pub created_chats: Mutex<Vec<CreateChatRequest>>,
    pub history_calls: AtomicUsize,
    send_counter: AtomicUsize,
}

impl MockBackend {
    /// Backend that answers every call successfully with empty data
    pub fn new() -> Self {
        let backend = Self::default();
        *backend.history.lock().unwrap() = Some(Vec::new());
        *backend.summary_reply.lock().unwrap() = Some("s-1".to_string());
        *backend.chats.lock().unwrap() = Some(Vec::new());
        *backend.summaries.lock().unwrap() = Some(Vec::new());
        backend
    }

    pub fn with_history(self, history: Vec<Message>) -> Self {
        *self.history.lock().unwrap() = Some(history);
        self
    }

    pub fn with_chats(self, chats: Vec<Chat>) -> Self {
        *self.chats.lock().unwrap() = Some(chats);
        self
    }

    pub fn with_summaries(self, summaries: Vec<Summary>) -> Self {
        *self.summaries.lock().unwrap() = Some(summaries);
        self
    }

    /// Queue the answer of the next send
    pub fn reply_to_send(&self, reply: Option<ConfirmedMessage>) {
        self.send_replies.lock().unwrap().push_back(reply);
    }

    /// Delay the answer to sends of `content`
    pub fn delay_send(&self, content: &str, delay: Duration) {
        self.send_delays.lock().unwrap().insert(content.to_string(), delay);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

fn scripted<T>(slot: Option<T>) -> Result<T> {
    slot.ok_or(Error::Status(500))
}

impl ChatBackend for MockBackend {
    async fn list_messages(&self, _chat_id: &str, _user_id: &str) -> Result<Vec<Message>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        scripted(self.history.lock().unwrap().clone())
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<ConfirmedMessage> {
        self.sent.lock().unwrap().push(request.clone());
        let delay = self.send_delays.lock().unwrap().get(&request.content).copied();
        let reply = self.send_replies.lock().unwrap().pop_front();

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(reply) => scripted(reply),
            None => {
                let n = self.send_counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(ConfirmedMessage {
                    message_id: format!("srv-{}", n),
                    sender_id: Some(request.sender_id.clone()),
                    sender_name: None,
                    content: Some(request.content.clone()),
                    timestamp: Some("2024-05-01T10:05:00Z".to_string()),
                })
            }
        }
    }

    async fn edit_message(&self, request: &EditMessageRequest) -> Result<()> {
        self.edits.lock().unwrap().push(request.clone());
        if *self.fail_edits.lock().unwrap() {
            return Err(Error::Status(500));
        }
        Ok(())
    }

    async fn delete_message(&self, message_id: &str) -> Result<()> {
        self.deletes.lock().unwrap().push(message_id.to_string());
        if *self.fail_deletes.lock().unwrap() {
            return Err(Error::Status(404));
        }
        Ok(())
    }

    async fn create_summary(&self, request: &CreateSummaryRequest) -> Result<String> {
        self.summary_requests.lock().unwrap().push(request.clone());
        scripted(self.summary_reply.lock().unwrap().clone())
    }

    async fn list_summaries(&self, _user_id: &str) -> Result<Vec<Summary>> {
        scripted(self.summaries.lock().unwrap().clone())
    }

    async fn recent_summaries(&self, _user_id: &str) -> Result<Vec<Summary>> {
        let summaries = scripted(self.summaries.lock().unwrap().clone())?;
        Ok(summaries.into_iter().take(3).collect())
    }

    async fn get_summary(&self, summary_id: &str) -> Result<Summary> {
        let summaries = scripted(self.summaries.lock().unwrap().clone())?;
        summaries
            .into_iter()
            .find(|s| s.summary_id == summary_id)
            .ok_or(Error::Status(404))
    }

    async fn list_chats(&self, _user_id: &str) -> Result<Vec<Chat>> {
        scripted(self.chats.lock().unwrap().clone())
    }

    async fn create_chat(&self, request: &CreateChatRequest) -> Result<()> {
        self.created_chats.lock().unwrap().push(request.clone());
        if *self.fail_create_chat.lock().unwrap() {
            return Err(Error::Status(400));
        }
        Ok(())
    }
}
