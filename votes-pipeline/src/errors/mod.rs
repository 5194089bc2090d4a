//! Error types for the votes pipeline.
mod service;

pub use service::VoteServiceError;
