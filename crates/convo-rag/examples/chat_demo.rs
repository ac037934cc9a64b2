//! Minimal chain demo against a local Ollama server and vector index
//!
//! Run with: cargo run -p convo-rag --example chat_demo

use convo_rag::{ChainConfig, ChainInput, ChatMessage, ChatModel, RagChain};
use convo_rag::generation::OllamaChat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convo_rag=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ChainConfig::default();

    let model = OllamaChat::new(&config.llm)?;
    if !model.health_check().await? {
        tracing::warn!("Ollama not reachable at {}", config.llm.base_url);
        tracing::warn!("Start it with: ollama serve && ollama pull mistral");
    }

    let chain = RagChain::from_config(config)?;

    // First turn: no history
    let output = chain.run(ChainInput::new("What is a vector store?")).await?;
    println!("Answer: {}", output.answer);
    println!("Sources: {}", output.context.len());

    // Follow-up turn: the rewriter resolves "it" against the history
    let history = vec![
        ChatMessage::human("What is a vector store?"),
        ChatMessage::ai(output.answer),
    ];
    let output = chain
        .run(ChainInput::new("How is it different from a relational database?").with_history(history))
        .await?;
    println!("Answer: {}", output.answer);

    Ok(())
}
