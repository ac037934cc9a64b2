//! convo-rag: history-aware retrieval-augmented generation chain
//!
//! This crate wires a document retriever, a chat-history-aware query
//! reformulator, and an LLM answer generator into a single callable
//! pipeline. Vector-index construction, embedding generation, and model
//! serving stay external; the chain talks to both over narrow HTTP
//! interfaces and accepts test doubles through the provider traits.

pub mod chain;
pub mod config;
pub mod error;
pub mod generation;
pub mod providers;
pub mod retrieval;
pub mod types;

pub use chain::{QueryRewriter, RagChain};
pub use config::{ChainConfig, LlmConfig, DEPLOYED_MODEL};
pub use error::{Error, Result};
pub use providers::{ChatModel, Retriever};
pub use types::{ChainInput, ChainOutput, ChatMessage, Document, Role};
