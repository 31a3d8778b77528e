use crate::openai::config::OpenAiConfig;
use lmchat_core::llm::{
    ChatCompletionRequest, ChatCompletionResponse, ChatError, ModelClient, ModelListResponse,
    TransportError,
};
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Client for an OpenAI-compatible server. The connection pool is released on drop.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    cfg: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(cfg: OpenAiConfig) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(key) = cfg.api_key.as_deref().filter(|k| !k.is_empty()) {
            let mut v = header::HeaderValue::from_str(&format!("Bearer {}", key))?;
            v.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, v);
        }
        let mut builder = Client::builder()
            .default_headers(headers)
            .use_rustls_tls()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(2)
            .timeout(cfg.timeout);
        if let Some(p) = &cfg.proxy {
            builder = builder.proxy(reqwest::Proxy::all(p)?);
        }
        let http = builder.build()?;
        let base_url = cfg.base_url.trim_end_matches('/').to_string();
        Ok(Self { http, base_url, cfg })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.cfg
    }

    pub fn models_url(&self) -> String {
        format!("{}/v1/models", self.base_url)
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Same as [`ModelClient::list_models`] with its own deadline.
    pub async fn list_models_with_timeout(
        &self,
        timeout: Duration,
    ) -> Result<ModelListResponse, ChatError> {
        self.fetch_models(Some(timeout)).await
    }

    /// Same as [`ModelClient::create_chat_completion`] with its own deadline.
    pub async fn create_chat_completion_with_timeout(
        &self,
        req: &ChatCompletionRequest,
        timeout: Duration,
    ) -> Result<ChatCompletionResponse, ChatError> {
        self.post_chat(req, Some(timeout)).await
    }

    async fn fetch_models(&self, timeout: Option<Duration>) -> Result<ModelListResponse, ChatError> {
        let url = self.models_url();
        info!(target: "providers::openai", "list models url={}", url);
        self.send_json(self.http.get(url), timeout).await
    }

    async fn post_chat(
        &self,
        req: &ChatCompletionRequest,
        timeout: Option<Duration>,
    ) -> Result<ChatCompletionResponse, ChatError> {
        if req.messages.is_empty() {
            return Err(TransportError::InvalidRequest("messages must not be empty".into()).into());
        }
        let url = self.chat_completions_url();
        info!(
            target: "providers::openai",
            "chat completion model={} messages={} url={}",
            req.model,
            req.messages.len(),
            url
        );
        // `.json` sets Content-Type: application/json.
        self.send_json(self.http.post(url).json(req), timeout).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        mut rb: RequestBuilder,
        timeout: Option<Duration>,
    ) -> Result<T, ChatError> {
        if let Some(t) = timeout {
            rb = rb.timeout(t);
        }
        let started = Instant::now();
        let resp = rb.send().await.map_err(map_reqwest_err)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.ok();
            error!(target: "providers::openai", "non-success status={} body={:?}", status, body);
            return Err(map_status_err(status, body).into());
        }
        let body = resp.text().await.map_err(map_reqwest_err)?;
        debug!(
            target: "providers::openai",
            "status={} bytes={} elapsed_ms={}",
            status,
            body.len(),
            started.elapsed().as_millis()
        );
        serde_json::from_str(&body).map_err(|e| ChatError::Decode(format!("{}: {}", e, snippet(&body))))
    }
}

impl ModelClient for OpenAiClient {
    async fn list_models(&self) -> Result<ModelListResponse, ChatError> {
        self.fetch_models(None).await
    }

    async fn create_chat_completion(
        &self,
        req: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ChatError> {
        self.post_chat(req, None).await
    }
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((i, _)) => format!("{}...", &body[..i]),
        None => body.to_string(),
    }
}

fn map_reqwest_err(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else {
        TransportError::Network(e.to_string())
    }
}

fn map_status_err(status: StatusCode, body: Option<String>) -> TransportError {
    let body = body.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            TransportError::Auth(format!("{} {}", status.as_u16(), body))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            TransportError::RateLimit(format!("{} {}", status.as_u16(), body))
        }
        _ => TransportError::Status {
            status: status.as_u16(),
            body,
        },
    }
}
