//! History-aware query rewriting

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::generation::prompt::{contextualize_template, PromptTemplate};
use crate::providers::ChatModel;
use crate::types::ChatMessage;

/// Rewrites a context-dependent question into a standalone query.
///
/// With no prior history there is nothing to resolve, so the input passes
/// through unchanged without a model call.
pub struct QueryRewriter {
    model: Arc<dyn ChatModel>,
    template: PromptTemplate,
}

impl QueryRewriter {
    /// Create a rewriter using the default contextualize template
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            template: contextualize_template(),
        }
    }

    /// Produce a standalone query for `input` given the chat history
    pub async fn rewrite(&self, history: &[ChatMessage], input: &str) -> Result<String> {
        if history.is_empty() {
            return Ok(input.to_string());
        }

        let mut slots = HashMap::new();
        slots.insert("input", input.to_string());
        let messages = self.template.render(&slots, history)?;

        let rewritten = self.model.complete(&messages).await?;
        let rewritten = rewritten.trim().to_string();

        tracing::debug!(original = %input, standalone = %rewritten, "rewrote query");

        Ok(rewritten)
    }
}
