//! Answer generation: Ollama client and prompt templates

pub mod ollama;
pub mod prompt;

pub use ollama::OllamaChat;
pub use prompt::{
    answer_template, build_context, contextualize_template, MessageTemplate, PromptSegment,
    PromptTemplate,
};
