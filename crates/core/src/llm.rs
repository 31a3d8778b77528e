use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reply used by [`ModelClient::simple_chat`] when the server returned no choices.
pub const NO_RESPONSE: &str = "No response";

pub const SIMPLE_CHAT_MAX_TOKENS: u32 = 500;
pub const SIMPLE_CHAT_TEMPERATURE: f32 = 0.7;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system<S: Into<String>>(s: S) -> Self {
        Self {
            role: Role::System,
            content: s.into(),
        }
    }
    pub fn user<S: Into<String>>(s: S) -> Self {
        Self {
            role: Role::User,
            content: s.into(),
        }
    }
    pub fn assistant<S: Into<String>>(s: S) -> Self {
        Self {
            role: Role::Assistant,
            content: s.into(),
        }
    }
}

/// Body of `POST /v1/chat/completions`. Unset options are left out of the JSON.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ChatCompletionRequest {
    pub fn new<S: Into<String>>(model: S, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            temperature: None,
            stream: None,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// The canonical reply; any further choices are ignored.
    pub fn first_choice(&self) -> Option<&Choice> {
        self.choices.first()
    }

    pub fn first_message(&self) -> Option<&ChatMessage> {
        self.first_choice().map(|c| &c.message)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Model {
    pub id: String,
    pub object: String,
    pub owned_by: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModelListResponse {
    pub data: Vec<Model>,
}

impl ModelListResponse {
    pub fn ids(&self) -> Vec<String> {
        self.data.iter().map(|m| m.id.clone()).collect()
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("network: {0}")] Network(String),
    #[error("timeout: {0}")] Timeout(String),
    #[error("auth error: {0}")] Auth(String),
    #[error("rate limit: {0}")] RateLimit(String),
    #[error("http status {status}: {body}")] Status { status: u16, body: String },
    #[error("invalid request: {0}")] InvalidRequest(String),
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    #[error("decode: {0}")]
    Decode(String),
}

impl ChatError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ChatError::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ChatError::Decode(_))
    }
}

#[allow(async_fn_in_trait)]
pub trait ModelClient: Send + Sync {
    async fn list_models(&self) -> Result<ModelListResponse, ChatError>;

    async fn create_chat_completion(
        &self,
        req: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ChatError>;

    /// Single user turn with fixed defaults. `None` means the server sent zero choices.
    async fn simple_chat_reply(&self, message: &str, model: &str) -> Result<Option<String>, ChatError> {
        let req = ChatCompletionRequest::new(model, vec![ChatMessage::user(message)])
            .max_tokens(SIMPLE_CHAT_MAX_TOKENS)
            .temperature(SIMPLE_CHAT_TEMPERATURE);
        let resp = self.create_chat_completion(&req).await?;
        Ok(resp.first_message().map(|m| m.content.clone()))
    }

    async fn simple_chat(&self, message: &str, model: &str) -> Result<String, ChatError> {
        let reply = self.simple_chat_reply(message, model).await?;
        Ok(reply.unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}
