//! The retrieval chain: rewrite, retrieve, generate

pub mod rewriter;

pub use rewriter::QueryRewriter;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ChainConfig;
use crate::error::Result;
use crate::generation::prompt::{answer_template, build_context, PromptTemplate};
use crate::generation::OllamaChat;
use crate::providers::{ChatModel, Retriever};
use crate::retrieval::HttpRetriever;
use crate::types::{ChainInput, ChainOutput};

/// Retrieval-augmented generation chain.
///
/// One `run` is a single linear pass: the rewriter produces a standalone
/// query, the retriever fetches the top-k documents for it, and the model
/// answers over the stuffed context. Failures at any stage abort the
/// request; there are no retries at this layer.
pub struct RagChain {
    rewriter: QueryRewriter,
    retriever: Arc<dyn Retriever>,
    model: Arc<dyn ChatModel>,
    answer_template: PromptTemplate,
    top_k: usize,
}

impl RagChain {
    /// Create a chain from explicitly constructed collaborators.
    ///
    /// The same model serves both the rewriter and the answer generator.
    pub fn new(
        model: Arc<dyn ChatModel>,
        retriever: Arc<dyn Retriever>,
        config: &ChainConfig,
    ) -> Result<Self> {
        config.validate()?;

        tracing::info!(
            model = model.model(),
            retriever = retriever.name(),
            top_k = config.retrieval.top_k,
            "chain constructed"
        );

        Ok(Self {
            rewriter: QueryRewriter::new(Arc::clone(&model)),
            retriever,
            model,
            answer_template: answer_template(),
            top_k: config.retrieval.top_k,
        })
    }

    /// Create a chain wired to the shipped collaborators: a local Ollama
    /// server and an HTTP vector index.
    pub fn from_config(config: ChainConfig) -> Result<Self> {
        let model = Arc::new(OllamaChat::new(&config.llm)?);
        let retriever = Arc::new(HttpRetriever::new(&config.index)?);
        Self::new(model, retriever, &config)
    }

    /// Run one chain invocation
    pub async fn run(&self, input: ChainInput) -> Result<ChainOutput> {
        let standalone = self
            .rewriter
            .rewrite(&input.chat_history, &input.input)
            .await?;

        let documents = self.retriever.retrieve(&standalone, self.top_k).await?;
        tracing::debug!(query = %standalone, count = documents.len(), "context retrieved");

        let mut slots = HashMap::new();
        slots.insert("context", build_context(&documents));
        slots.insert("input", input.input.clone());
        let messages = self.answer_template.render(&slots, &input.chat_history)?;

        let answer = self.model.complete(&messages).await?;

        Ok(ChainOutput {
            answer,
            context: documents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{ChatMessage, Document};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeModel {
        replies: Mutex<Vec<String>>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
        fail: bool,
    }

    impl FakeModel {
        /// Replies are popped front-to-back, one per `complete` call
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                replies: Mutex::new(Vec::new()),
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl ChatModel for FakeModel {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
            if self.fail {
                return Err(Error::model_unavailable("connection refused"));
            }
            self.calls.lock().unwrap().push(messages.to_vec());
            Ok(self
                .replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| "fallback answer".to_string()))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(!self.fail)
        }

        fn name(&self) -> &str {
            "fake"
        }

        fn model(&self) -> &str {
            "fake-model"
        }
    }

    struct FakeRetriever {
        documents: Vec<Document>,
        queries: Mutex<Vec<(String, usize)>>,
        fail: bool,
    }

    impl FakeRetriever {
        fn new(documents: Vec<Document>) -> Self {
            Self {
                documents,
                queries: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                documents: Vec::new(),
                queries: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl Retriever for FakeRetriever {
        async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Document>> {
            if self.fail {
                return Err(Error::retriever("index unreachable"));
            }
            self.queries.lock().unwrap().push((query.to_string(), k));
            Ok(self.documents.clone())
        }
    }

    fn two_documents() -> Vec<Document> {
        vec![
            Document::new("A vector store indexes embeddings.")
                .with_metadata("source", serde_json::json!("intro.md")),
            Document::new("Nearest-neighbor search powers retrieval.")
                .with_metadata("source", serde_json::json!("search.md")),
        ]
    }

    #[tokio::test]
    async fn test_run_without_history() {
        let model = Arc::new(FakeModel::new(&["It stores embedding vectors."]));
        let retriever = Arc::new(FakeRetriever::new(two_documents()));
        let chain = RagChain::new(model.clone(), retriever.clone(), &ChainConfig::default()).unwrap();

        let output = chain
            .run(ChainInput::new("What is a vector store?"))
            .await
            .unwrap();

        // Empty history: retriever sees the original input verbatim, k = 2
        let queries = retriever.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0], ("What is a vector store?".to_string(), 2));

        assert!(!output.answer.is_empty());
        assert!(output.context.len() <= 2);
        // Context is exactly what the retriever returned, unmodified
        assert_eq!(output.context, two_documents());

        // No rewrite call happened, only answer generation
        assert_eq!(model.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_run_with_history_uses_rewritten_query() {
        let model = Arc::new(FakeModel::new(&[
            "What does HNSW stand for?",
            "Hierarchical Navigable Small World.",
        ]));
        let retriever = Arc::new(FakeRetriever::new(two_documents()));
        let chain = RagChain::new(model.clone(), retriever.clone(), &ChainConfig::default()).unwrap();

        let input = ChainInput::new("What does it stand for?").with_history(vec![
            ChatMessage::human("Tell me about HNSW."),
            ChatMessage::ai("It is a graph index."),
        ]);

        let output = chain.run(input).await.unwrap();

        let queries = retriever.queries.lock().unwrap();
        assert_eq!(queries[0].0, "What does HNSW stand for?");
        assert_eq!(output.answer, "Hierarchical Navigable Small World.");

        // Two model calls: rewrite, then answer
        let calls = model.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        // The answer prompt carries the stuffed context block and the
        // original (not rewritten) question
        let answer_messages = &calls[1];
        assert!(answer_messages[1]
            .content
            .contains("A vector store indexes embeddings."));
        assert_eq!(
            answer_messages.last().unwrap().content,
            "What does it stand for?"
        );
    }

    #[tokio::test]
    async fn test_empty_retrieval_still_answers() {
        let model = Arc::new(FakeModel::new(&["Answered from general instructions."]));
        let retriever = Arc::new(FakeRetriever::new(Vec::new()));
        let chain = RagChain::new(model.clone(), retriever, &ChainConfig::default()).unwrap();

        let output = chain.run(ChainInput::new("Anything?")).await.unwrap();

        assert!(output.context.is_empty());
        // The model still received an (empty) context block
        let calls = model.calls.lock().unwrap();
        assert_eq!(calls[0][1].content, "Context: ");
    }

    #[tokio::test]
    async fn test_retriever_failure_aborts() {
        let model = Arc::new(FakeModel::new(&["unused"]));
        let retriever = Arc::new(FakeRetriever::failing());
        let chain = RagChain::new(model.clone(), retriever, &ChainConfig::default()).unwrap();

        let err = chain.run(ChainInput::new("query")).await.unwrap_err();
        assert!(matches!(err, Error::Retriever(_)));
        // Generation was never reached
        assert!(model.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_aborts() {
        let model = Arc::new(FakeModel::failing());
        let retriever = Arc::new(FakeRetriever::new(two_documents()));
        let chain = RagChain::new(model, retriever, &ChainConfig::default()).unwrap();

        let err = chain.run(ChainInput::new("query")).await.unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable(_)));
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let model = Arc::new(FakeModel::new(&[]));
        let retriever = Arc::new(FakeRetriever::new(Vec::new()));
        let mut config = ChainConfig::default();
        config.retrieval.top_k = 0;

        assert!(matches!(
            RagChain::new(model, retriever, &config),
            Err(Error::Config(_))
        ));
    }
}
