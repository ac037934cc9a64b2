//! Core value types for the chain

pub mod chain;
pub mod document;
pub mod message;

pub use chain::{ChainInput, ChainOutput};
pub use document::Document;
pub use message::{ChatMessage, Role};
