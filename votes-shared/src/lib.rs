//! # Votes Shared
//! This crate defines the data structures shared across the voting core.
//! It includes content kinds, vote directions, vote tallies, votable items and
//! the transitions produced by the vote engine.
pub mod types;
