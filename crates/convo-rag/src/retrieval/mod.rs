//! Retrieval against an external vector index

pub mod http;

pub use http::HttpRetriever;
