//! Error types for the votes API.
mod api;
mod startup;

pub use api::ApiError;
pub use startup::StartupError;
