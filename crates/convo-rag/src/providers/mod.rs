//! Provider traits for the chain's external collaborators
//!
//! The chain never constructs its collaborators internally; both the model
//! and the retriever are passed in behind these traits so lifecycle and
//! test doubles stay controllable.

pub mod llm;
pub mod retriever;

pub use llm::ChatModel;
pub use retriever::Retriever;
