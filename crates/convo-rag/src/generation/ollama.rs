//! Ollama chat client used for query rewriting and answer generation

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::providers::ChatModel;
use crate::types::{ChatMessage, Role};

/// Ollama chat API client
pub struct OllamaChat {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
    /// Model id actually sent to the server
    model: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: WireMessage,
}

impl WireMessage {
    /// Ollama expects user/assistant wire roles
    fn from_message(message: &ChatMessage) -> Self {
        let role = match message.role {
            Role::System => "system",
            Role::Human => "user",
            Role::Ai => "assistant",
        };
        Self {
            role: role.to_string(),
            content: message.content.clone(),
        }
    }
}

impl OllamaChat {
    /// Create a new Ollama chat client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {}", e)))?;

        let model = config.resolved_model().to_string();
        if config.model != model {
            tracing::warn!(
                requested = %config.model,
                deployed = %model,
                "requested model name is advisory only; using the deployed local model"
            );
        }

        Ok(Self {
            client,
            config: config.clone(),
            model,
        })
    }

    /// Send a message sequence to the model and return its reply text
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/api/chat", self.config.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.iter().map(WireMessage::from_message).collect(),
            stream: false,
            options: ChatOptions {
                temperature: self.config.temperature,
            },
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "sending chat request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::model_unavailable(format!("chat request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::model_unavailable(format!(
                "chat failed: HTTP {} - {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::model_unavailable(format!("failed to parse chat response: {}", e)))?;

        Ok(chat_response.message.content)
    }

    /// Send a message sequence and stream the reply as it is generated
    pub async fn chat_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<impl futures_util::Stream<Item = Result<String>>> {
        use futures_util::StreamExt;

        let url = format!("{}/api/chat", self.config.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.iter().map(WireMessage::from_message).collect(),
            stream: true,
            options: ChatOptions {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::model_unavailable(format!("stream request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::model_unavailable(format!(
                "stream failed: HTTP {}",
                response.status()
            )));
        }

        #[derive(Deserialize)]
        struct StreamChunk {
            message: WireMessage,
        }

        let stream = response.bytes_stream().map(move |chunk| {
            let bytes =
                chunk.map_err(|e| Error::model_unavailable(format!("stream error: {}", e)))?;
            let text = String::from_utf8_lossy(&bytes);

            // Parse NDJSON
            let mut output = String::new();
            for line in text.lines() {
                if let Ok(chunk) = serde_json::from_str::<StreamChunk>(line) {
                    output.push_str(&chunk.message.content);
                }
            }

            Ok(output)
        });

        Ok(stream)
    }
}

#[async_trait]
impl ChatModel for OllamaChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.chat(messages).await
    }

    /// Check if Ollama is available
    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
