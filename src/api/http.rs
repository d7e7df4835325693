//! HTTP implementation of the backend API

use crate::api::types::{
    filter_array, Chat, ConfirmedMessage, CreateChatRequest, CreateSummaryRequest,
    CreateSummaryResponse, EditMessageRequest, SendMessageRequest,
};
use crate::api::ChatBackend;
use crate::message::Message;
use crate::settings::{ApiRoutes, Settings};
use crate::summary::Summary;
use crate::{Error, Result};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use tracing::{debug, warn};

/// Backend client over HTTP
///
/// Requests share one cookie store, which carries the session credentials
/// set by the backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    routes: ApiRoutes,
}

impl HttpBackend {
    /// Create a client for the given routes
    pub fn new(routes: ApiRoutes, timeout: Option<std::time::Duration>) -> Result<Self> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            routes,
        })
    }

    /// Create a client from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.routes(), settings.request_timeout())
    }

    /// Routes this client calls
    pub fn routes(&self) -> &ApiRoutes {
        &self.routes
    }

    /// Send a request and return the body of a 2xx response
    async fn execute(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Backend answered {} for {}", status, response.url());
            return Err(Error::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }

    /// Send a request and decode the body of a 2xx response as JSON
    async fn execute_json(&self, request: RequestBuilder) -> Result<Value> {
        let body = self.execute(request).await?;
        serde_json::from_str(&body).map_err(|e| Error::MalformedResponse(format!("Invalid JSON body: {}", e)))
    }

    /// URL of one message, with the id as an escaped path segment
    fn message_url(&self, message_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.routes.messages)
            .map_err(|e| Error::Config(format!("Invalid messages route: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config("Messages route cannot take path segments".to_string()))?
            .push(message_id);
        Ok(url)
    }

    async fn summaries_from(&self, url: &str, user_id: &str) -> Result<Vec<Summary>> {
        let body = self
            .execute_json(self.client.get(url).query(&[("uid", user_id)]))
            .await?;
        filter_array(&body, "summaries", Summary::from_value)
            .ok_or_else(|| Error::MalformedResponse("Expected a `summaries` array".to_string()))
    }
}

impl ChatBackend for HttpBackend {
    async fn list_messages(&self, chat_id: &str, user_id: &str) -> Result<Vec<Message>> {
        debug!("Fetching history of chat {}", chat_id);
        let body = self
            .execute_json(
                self.client
                    .get(&self.routes.messages)
                    .query(&[("chatId", chat_id), ("uid", user_id)]),
            )
            .await?;

        filter_array(&body, "messages", Message::from_value)
            .ok_or_else(|| Error::MalformedResponse("Expected a `messages` array".to_string()))
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<ConfirmedMessage> {
        debug!("Sending message to chat {}", request.chat_id);
        let body = self
            .execute_json(self.client.post(&self.routes.messages).json(request))
            .await?;

        ConfirmedMessage::from_response(&body)
            .ok_or_else(|| Error::MalformedResponse(format!("Send response without a message record: {}", body)))
    }

    async fn edit_message(&self, request: &EditMessageRequest) -> Result<()> {
        debug!("Editing message {}", request.message_id);
        self.execute(self.client.put(&self.routes.messages).json(request))
            .await
            .map(|_| ())
    }

    async fn delete_message(&self, message_id: &str) -> Result<()> {
        debug!("Deleting message {}", message_id);
        let url = self.message_url(message_id)?;
        self.execute(self.client.delete(url)).await.map(|_| ())
    }

    async fn create_summary(&self, request: &CreateSummaryRequest) -> Result<String> {
        let body = self
            .execute_json(self.client.post(&self.routes.summaries).json(request))
            .await?;
        let response: CreateSummaryResponse = serde_json::from_value(body)
            .map_err(|e| Error::MalformedResponse(format!("Summary response without an id: {}", e)))?;
        Ok(response.summary_id)
    }

    async fn list_summaries(&self, user_id: &str) -> Result<Vec<Summary>> {
        self.summaries_from(&self.routes.summaries, user_id).await
    }

    async fn recent_summaries(&self, user_id: &str) -> Result<Vec<Summary>> {
        self.summaries_from(&self.routes.recent_summaries, user_id).await
    }

    async fn get_summary(&self, summary_id: &str) -> Result<Summary> {
        let body = self
            .execute_json(
                self.client
                    .get(&self.routes.summary)
                    .query(&[("summaryId", summary_id)]),
            )
            .await?;
        Summary::from_value(&body)
            .ok_or_else(|| Error::MalformedResponse("Expected a summary record".to_string()))
    }

    async fn list_chats(&self, user_id: &str) -> Result<Vec<Chat>> {
        let body = self
            .execute_json(self.client.get(&self.routes.chats).query(&[("uid", user_id)]))
            .await?;
        filter_array(&body, "chats", Chat::from_value)
            .ok_or_else(|| Error::MalformedResponse("Expected a `chats` array".to_string()))
    }

    async fn create_chat(&self, request: &CreateChatRequest) -> Result<()> {
        debug!("Creating {:?} chat", request.chat_type);
        self.execute(self.client.post(&self.routes.chats).json(request))
            .await
            .map(|_| ())
    }
}
