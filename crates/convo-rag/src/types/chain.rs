//! Chain input and output types

use serde::{Deserialize, Serialize};

use super::document::Document;
use super::message::ChatMessage;

/// Input to one chain invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainInput {
    /// The latest user turn
    pub input: String,
    /// Prior conversation turns, oldest first
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
}

impl ChainInput {
    /// Create an input with no prior history
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            chat_history: Vec::new(),
        }
    }

    /// Set the chat history
    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.chat_history = history;
        self
    }
}

/// Output of one chain invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainOutput {
    /// Generated answer
    pub answer: String,
    /// The documents the retriever returned for this invocation, unmodified
    pub context: Vec<Document>,
}
