//! Ollama inference backend implementation.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use notewise_core::{defaults, Error, GenerationBackend, Result};

use crate::config::OllamaConfig;

/// Timeout for health checks (seconds).
const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Ollama generation backend.
pub struct OllamaBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OllamaBackend {
    /// Create a backend with default settings.
    pub fn new() -> Result<Self> {
        Self::from_config(&OllamaConfig::default())
    }

    /// Create a backend from a validated [`OllamaConfig`].
    pub fn from_config(config: &OllamaConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing Ollama backend: url={}, model={}, timeout={}s",
            config.base_url, config.model, config.timeout_secs
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Create with an explicit URL and model, other settings default.
    pub fn with_config(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::from_config(&OllamaConfig {
            base_url: base_url.into(),
            model: model.into(),
            ..OllamaConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Switch the generation model.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
        info!("Switched generation model to {}", self.model);
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Shared `/api/chat` call.
    ///
    /// The chat endpoint keeps reasoning output of thinking models out of
    /// `message.content`.
    async fn chat(
        &self,
        system: &str,
        prompt: &str,
        format: Option<serde_json::Value>,
    ) -> Result<String> {
        let start = Instant::now();

        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let think = if format.is_some() { Some(false) } else { None };
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            stream: false,
            format,
            think,
        };

        let response = self
            .authorize(self.client.post(format!("{}/api/chat", self.base_url)))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_status(status.as_u16(), &body));
        }

        let body = response.text().await?;
        let result: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            Error::Serialization(format!("Failed to parse Ollama response: {}", e))
        })?;

        let content = result.message.content;
        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = content.len(),
            duration_ms = elapsed,
            "Generation complete"
        );
        if elapsed > defaults::SLOW_GENERATION_MS {
            warn!(
                duration_ms = elapsed,
                prompt_len = prompt.len(),
                slow = true,
                "Slow generation operation"
            );
        }
        Ok(content)
    }
}

/// Map a non-success Ollama response to a core error.
///
/// Ollama reports failures as `{"error": "..."}`; other bodies are kept raw.
pub(crate) fn error_from_status(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());
    debug!(http_status = status, error = %message, "Ollama returned an error status");

    match status {
        401 => Error::Unauthorized(message),
        403 => Error::Forbidden(message),
        413 => Error::TokenLimit(message),
        _ if notewise_core::classify_http_status(status, &message)
            == notewise_core::AiErrorKind::TokenLimitExceeded =>
        {
            Error::TokenLimit(message)
        }
        _ => Error::Api { status, message },
    }
}

/// Chat API message for `/api/chat`.
#[derive(Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Request payload for the Ollama `/api/chat` endpoint.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    /// Set to `"json"` to force a JSON object response.
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
    /// Disable reasoning output on thinking models.
    #[serde(skip_serializing_if = "Option::is_none")]
    think: Option<bool>,
}

/// Response from the Ollama `/api/chat` endpoint.
#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    #[instrument(skip(self, system, prompt), fields(subsystem = "inference", component = "ollama", op = "generate", model = %self.model, prompt_len = prompt.len()))]
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(system, prompt, None).await
    }

    #[instrument(skip(self, system, prompt), fields(subsystem = "inference", component = "ollama", op = "generate_json", model = %self.model, prompt_len = prompt.len()))]
    async fn generate_json_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(system, prompt, Some(serde_json::json!("json"))).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .authorize(self.client.get(format!("{}/api/tags", self.base_url)))
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("Ollama health check passed");
                Ok(true)
            }
            Ok(resp) => {
                warn!("Ollama health check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Ollama health check error: {}", e);
                Ok(false)
            }
        }
    }
}
