//! HTTP adapter for an externally owned vector index

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::providers::Retriever;
use crate::types::Document;

/// Retriever backed by a similarity-search HTTP endpoint.
///
/// Index construction and embedding happen on the remote side; this adapter
/// only issues read-only search calls.
pub struct HttpRetriever {
    /// HTTP client
    client: Client,
    /// Configuration
    config: IndexConfig,
}

#[derive(Serialize)]
struct SearchRequest {
    query: String,
    k: usize,
}

#[derive(Deserialize)]
struct SearchHit {
    content: String,
    #[serde(default)]
    metadata: HashMap<String, serde_json::Value>,
    /// Relevance score, higher is better
    score: f32,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

impl HttpRetriever {
    /// Create a new retriever against the configured index endpoint
    pub fn new(config: &IndexConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::config("index.base_url must not be empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

/// Order hits by non-increasing score, keep at most `k`, and strip them
/// down to documents
fn rank(mut hits: Vec<SearchHit>, k: usize) -> Vec<Document> {
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(k);
    hits.into_iter()
        .map(|hit| Document {
            content: hit.content,
            metadata: hit.metadata,
        })
        .collect()
}

#[async_trait]
impl Retriever for HttpRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        let url = format!("{}/api/search", self.config.base_url);

        let request = SearchRequest {
            query: query.to_string(),
            k,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::retriever(format!("search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::retriever(format!(
                "search failed: HTTP {} - {}",
                status, body
            )));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::retriever(format!("failed to parse search response: {}", e)))?;

        let documents = rank(search_response.results, k);
        tracing::debug!(query = %query, k, returned = documents.len(), "retrieved documents");

        Ok(documents)
    }

    fn name(&self) -> &str {
        "http-index"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(content: &str, score: f32) -> SearchHit {
        SearchHit {
            content: content.to_string(),
            metadata: HashMap::new(),
            score,
        }
    }

    #[test]
    fn test_rank_orders_by_decreasing_score() {
        let docs = rank(vec![hit("low", 0.2), hit("high", 0.9), hit("mid", 0.5)], 3);
        let contents: Vec<_> = docs.iter().map(|d| d.content.as_str()).collect();
        assert_eq!(contents, ["high", "mid", "low"]);
    }

    #[test]
    fn test_rank_returns_at_most_k() {
        let docs = rank(vec![hit("a", 0.9), hit("b", 0.8), hit("c", 0.7)], 2);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "a");
        assert_eq!(docs[1].content, "b");
    }

    #[test]
    fn test_rank_empty_hits() {
        assert!(rank(Vec::new(), 2).is_empty());
    }

    #[test]
    fn test_new_rejects_empty_base_url() {
        let config = IndexConfig {
            base_url: String::new(),
            timeout_secs: 5,
        };
        assert!(matches!(HttpRetriever::new(&config), Err(Error::Config(_))));
    }
}
