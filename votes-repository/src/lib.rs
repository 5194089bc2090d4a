//! # Votes Repository
//! This crate provides the storage contract for votable items and its
//! implementations. It includes definitions for errors, the repository
//! interface, a PostgreSQL backend and an in-process memory backend.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::RepositoryError;
pub use interfaces::VotableItemRepository;
pub use memory::MemoryVotableItemRepository;
pub use postgres::PostgresVotableItemRepository;
