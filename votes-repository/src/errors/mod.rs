//! Error types for the votes repository.
mod repository;

pub use repository::RepositoryError;
