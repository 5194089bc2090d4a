//! This module defines and re-exports the interfaces for the votes repository.
mod votable_items;

pub use votable_items::VotableItemRepository;
