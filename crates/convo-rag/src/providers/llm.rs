//! Chat model trait for rewriting and answer generation

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ChatMessage;

/// Trait for LLM-backed text completion over a message sequence
///
/// Implementations:
/// - `OllamaChat`: local Ollama server (`/api/chat`)
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send a message sequence to the model and return its text reply
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Check if the model server is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model id actually used for generation
    fn model(&self) -> &str;
}
