//! Typed prompt templates for the chain
//!
//! A template is an ordered list of segments: fixed-role messages whose
//! content may carry `{slot}` placeholders, plus a marker for where the
//! chat history is spliced in. Rendering substitutes every slot and
//! produces the concrete message sequence sent to the model.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::{ChatMessage, Document, Role};

/// System instruction for rewriting a history-dependent question into a
/// standalone one.
pub const CONTEXTUALIZE_SYSTEM_PROMPT: &str = "Given a chat history and the latest user question \
which might reference context, formulate a standalone question. Do NOT answer it, just reformulate.";

/// System instruction for answer generation.
pub const ANSWER_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Use the following context to answer.";

/// A message template: fixed role, content with `{slot}` placeholders
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    pub role: Role,
    pub content: String,
}

impl MessageTemplate {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// One segment of a prompt template
#[derive(Debug, Clone)]
pub enum PromptSegment {
    /// A templated message
    Message(MessageTemplate),
    /// Splice the chat history at this position
    History,
}

/// An ordered prompt template rendered by slot substitution
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    segments: Vec<PromptSegment>,
}

impl PromptTemplate {
    pub fn new(segments: Vec<PromptSegment>) -> Self {
        Self { segments }
    }

    /// Builder: append a system message template
    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.segments
            .push(PromptSegment::Message(MessageTemplate::new(Role::System, content)));
        self
    }

    /// Builder: append a human message template
    pub fn human(mut self, content: impl Into<String>) -> Self {
        self.segments
            .push(PromptSegment::Message(MessageTemplate::new(Role::Human, content)));
        self
    }

    /// Builder: append the history splice marker
    pub fn history(mut self) -> Self {
        self.segments.push(PromptSegment::History);
        self
    }

    /// Render the template into a concrete message sequence.
    ///
    /// Every `{slot}` in message content must have a binding in `slots`;
    /// an unbound slot is a [`Error::Template`].
    pub fn render(
        &self,
        slots: &HashMap<&str, String>,
        history: &[ChatMessage],
    ) -> Result<Vec<ChatMessage>> {
        let mut messages = Vec::new();

        for segment in &self.segments {
            match segment {
                PromptSegment::Message(template) => {
                    let content = substitute(&template.content, slots)?;
                    messages.push(ChatMessage {
                        role: template.role,
                        content,
                    });
                }
                PromptSegment::History => {
                    messages.extend_from_slice(history);
                }
            }
        }

        Ok(messages)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Substitute `{slot}` placeholders in `content` with bound values
fn substitute(content: &str, slots: &HashMap<&str, String>) -> Result<String> {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();

    while let Some(c) = chars.next() {
        if c != '{' {
            out.push(c);
            continue;
        }

        let mut name = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) => name.push(c),
                None => {
                    return Err(Error::template(format!(
                        "unclosed slot starting at '{{{}'",
                        name
                    )))
                }
            }
        }

        match slots.get(name.as_str()) {
            Some(value) => out.push_str(value),
            None => return Err(Error::template(format!("unbound slot '{}'", name))),
        }
    }

    Ok(out)
}

/// Template for rewriting a question against chat history
pub fn contextualize_template() -> PromptTemplate {
    PromptTemplate::default()
        .system(CONTEXTUALIZE_SYSTEM_PROMPT)
        .history()
        .human("{input}")
}

/// Template for answer generation over retrieved context
pub fn answer_template() -> PromptTemplate {
    PromptTemplate::default()
        .system(ANSWER_SYSTEM_PROMPT)
        .system("Context: {context}")
        .history()
        .human("{input}")
}

/// Concatenate retrieved document contents into a single context block.
/// Empty input yields an empty block.
pub fn build_context(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
