//! In-process implementation of the votable item repository.
//!
//! Items are held behind their own mutex so commits to different items never
//! contend; the map-wide lock is only taken for writing when items are created
//! or deleted.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use votes_shared::types::{AuthorId, ContentKind, ItemId, VersionedItem, VotableItem, VoteCommit};

use crate::{RepositoryError, VotableItemRepository};

type ItemSlot = Arc<Mutex<VersionedItem>>;

/// Memory-backed votable item repository.
#[derive(Default)]
pub struct MemoryVotableItemRepository {
    items: RwLock<HashMap<(ContentKind, ItemId), ItemSlot>>,
}

impl MemoryVotableItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items across all kinds.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    async fn slot(&self, kind: ContentKind, id: ItemId) -> Result<ItemSlot, RepositoryError> {
        self.items
            .read()
            .await
            .get(&(kind, id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(kind, id))
    }
}

#[async_trait]
impl VotableItemRepository for MemoryVotableItemRepository {
    async fn load(&self, kind: ContentKind, id: ItemId) -> Result<VersionedItem, RepositoryError> {
        let slot = self.slot(kind, id).await?;
        let current = slot.lock().await;
        Ok(current.clone())
    }

    async fn commit(
        &self,
        kind: ContentKind,
        id: ItemId,
        commit: &VoteCommit,
    ) -> Result<VersionedItem, RepositoryError> {
        commit
            .tally
            .validate()
            .map_err(|e| RepositoryError::corrupt(kind, id, e.to_string()))?;
        let slot = self.slot(kind, id).await?;
        let mut current = slot.lock().await;
        if current.version != commit.expected_version {
            return Err(RepositoryError::Conflict {
                kind,
                id,
                expected_version: commit.expected_version,
            });
        }
        current.item.tally = commit.tally.clone();
        current.version += 1;
        Ok(current.clone())
    }

    async fn create(
        &self,
        kind: ContentKind,
        id: ItemId,
        author_id: AuthorId,
    ) -> Result<VersionedItem, RepositoryError> {
        let mut items = self.items.write().await;
        if items.contains_key(&(kind, id)) {
            return Err(RepositoryError::AlreadyExists { kind, id });
        }
        let created = VersionedItem {
            item: VotableItem::new(kind, id, author_id),
            version: 0,
        };
        items.insert((kind, id), Arc::new(Mutex::new(created.clone())));
        Ok(created)
    }

    async fn delete(&self, kind: ContentKind, id: ItemId) -> Result<(), RepositoryError> {
        self.items
            .write()
            .await
            .remove(&(kind, id))
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(kind, id))
    }
}
