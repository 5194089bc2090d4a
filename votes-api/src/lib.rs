//! # Votes API
//!
//! HTTP adapter for the voting core. Clients upvote and downvote comments,
//! answers, posts and questions; the vote service keeps each item's counts and
//! voter sets consistent.
//!
//! ## Modules
//!
//! - [`config`]: Environment settings and dependency initialization
//! - [`guard`]: Voter identity extractor
//! - [`routes`]: Router and handlers
//! - [`errors`]: Error types and their HTTP rendering
pub mod config;
pub mod errors;
pub mod guard;
pub mod response;
pub mod routes;

pub use config::Dependencies;
pub use errors::{ApiError, StartupError};
pub use routes::{AppState, cors_layer, router};
