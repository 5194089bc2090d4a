//! # Votes Pipeline
//! This crate holds the voting core for votable content.
//! It includes the pure vote engine that decides transitions, the vote
//! service that applies them against a repository, and their configuration
//! and error types.
pub mod config;
pub mod engine;
pub mod errors;
pub mod service;

pub use config::VoteServiceConfig;
pub use errors::VoteServiceError;
pub use service::VoteService;
