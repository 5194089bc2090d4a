//! This module defines the `VotableItemRepository` trait, the storage contract
//! between the vote service and wherever votable items are persisted.
use async_trait::async_trait;
use votes_shared::types::{AuthorId, ContentKind, ItemId, VersionedItem, VoteCommit};

use crate::errors::RepositoryError;

/// A trait that defines the interface for loading and committing votable items.
///
/// Every content kind shares this contract; implementations decide how each
/// kind is bound to storage. `commit` is the atomic-apply boundary: it writes
/// all four vote fields at once, and only if the item is still at the version
/// the caller read.
#[async_trait]
pub trait VotableItemRepository: Send + Sync {
    /// Loads an item together with its current version.
    ///
    /// # Returns
    ///
    /// * `Ok(VersionedItem)` - The item as currently stored
    /// * `Err(RepositoryError::NotFound)` - No item with this id exists for `kind`
    /// * `Err(RepositoryError)` - The store failed
    async fn load(&self, kind: ContentKind, id: ItemId) -> Result<VersionedItem, RepositoryError>;

    /// Replaces the item's vote fields if its version still matches.
    ///
    /// # Arguments
    ///
    /// * `kind` - Content kind of the item
    /// * `id` - Item identifier
    /// * `commit` - The expected version and the tally to write
    ///
    /// # Returns
    ///
    /// * `Ok(VersionedItem)` - The item after the write, at the next version
    /// * `Err(RepositoryError::Conflict)` - Another write landed first
    /// * `Err(RepositoryError::NotFound)` - The item no longer exists
    /// * `Err(RepositoryError)` - The store failed; nothing was written
    async fn commit(
        &self,
        kind: ContentKind,
        id: ItemId,
        commit: &VoteCommit,
    ) -> Result<VersionedItem, RepositoryError>;

    /// Creates an item with no votes, as happens when content is posted.
    async fn create(
        &self,
        kind: ContentKind,
        id: ItemId,
        author_id: AuthorId,
    ) -> Result<VersionedItem, RepositoryError>;

    /// Deletes an item along with its vote fields.
    async fn delete(&self, kind: ContentKind, id: ItemId) -> Result<(), RepositoryError>;
}
