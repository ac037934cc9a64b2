//! Retriever trait over an external vector index

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Document;

/// Trait for top-k similarity search against an externally owned index
///
/// Implementations must return at most `k` documents, ordered by
/// non-increasing relevance, and must not mutate the underlying index.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Retrieve the documents most relevant to `query`
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Document>>;

    /// Get provider name for logging
    fn name(&self) -> &str {
        "retriever"
    }
}
