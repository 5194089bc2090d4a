//! Vote service implementation.
//!
//! This module provides the service that applies votes to votable items. Each
//! request is a read-decide-write cycle: the item is loaded with its version,
//! the engine picks a transition, and the new tally is committed only if no
//! other write landed in between. Lost races are retried from the top.
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tokio::time::timeout;
use tokio_retry::RetryIf;
use tracing::{debug, instrument, warn};
use votes_repository::{RepositoryError, VotableItemRepository};
use votes_shared::types::{
    AuthorId, ContentKind, ItemId, VotableItem, VoteCommit, VoteDirection, VoterId,
};

use crate::config::VoteServiceConfig;
use crate::engine;
use crate::errors::VoteServiceError;

/// The main service for applying and reading votes.
///
/// One service handles every content kind; the repository decides where each
/// kind is stored. Clones share the same repository.
#[derive(Clone)]
pub struct VoteService {
    repository: Arc<dyn VotableItemRepository>,
    config: VoteServiceConfig,
}

impl VoteService {
    /// Create a new VoteService with default configuration.
    pub fn new(repository: Arc<dyn VotableItemRepository>) -> Self {
        Self {
            repository,
            config: VoteServiceConfig::default(),
        }
    }

    /// Create a new VoteService with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `repository` - Where votable items are loaded from and committed to
    /// * `config` - Retry, timeout and self-vote settings
    pub fn with_config(
        repository: Arc<dyn VotableItemRepository>,
        config: VoteServiceConfig,
    ) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &VoteServiceConfig {
        &self.config
    }

    /// Apply an upvote or downvote request from `voter_id` to an item.
    ///
    /// Repeating a standing vote retracts it and voting the other way switches
    /// it. The whole read-decide-write cycle is retried when another vote on the
    /// same item commits first.
    ///
    /// # Returns
    ///
    /// * `Ok(VotableItem)` - The item after the transition
    /// * `Err(VoteServiceError::NotFound)` - No such item; nothing was written
    /// * `Err(VoteServiceError::ConcurrentConflict)` - Every attempt lost a race
    /// * `Err(VoteServiceError::PersistenceUnavailable)` - The store failed or timed out
    #[instrument(skip(self), fields(kind = %kind, item_id = %item_id, voter_id = %voter_id, direction = %direction))]
    pub async fn apply_vote(
        &self,
        kind: ContentKind,
        item_id: ItemId,
        voter_id: VoterId,
        direction: VoteDirection,
    ) -> Result<VotableItem, VoteServiceError> {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;

        let result = RetryIf::start(
            self.config.retry_strategy(),
            move || {
                let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
                self.try_apply_vote(kind, item_id, voter_id, direction, attempt)
            },
            VoteServiceError::is_conflict,
        )
        .await;

        result.map_err(|err| match err {
            VoteServiceError::ConcurrentConflict { kind, id, .. } => {
                let attempts = attempts.load(Ordering::SeqCst);
                warn!(attempts, "Giving up on vote after repeated conflicts");
                VoteServiceError::ConcurrentConflict { kind, id, attempts }
            }
            other => other,
        })
    }

    async fn try_apply_vote(
        &self,
        kind: ContentKind,
        item_id: ItemId,
        voter_id: VoterId,
        direction: VoteDirection,
        attempt: u32,
    ) -> Result<VotableItem, VoteServiceError> {
        let current = self
            .with_timeout("load", self.repository.load(kind, item_id))
            .await?;

        if !self.config.allow_self_votes && current.item.author_id == voter_id {
            return Err(VoteServiceError::SelfVote { kind, id: item_id });
        }

        let prior = current.item.tally.prior_vote(&voter_id);
        let (transition, tally) = engine::cast(&current.item.tally, voter_id, direction);
        debug!(
            ?prior,
            ?transition,
            version = current.version,
            attempt,
            "Vote decided"
        );

        let commit = VoteCommit {
            expected_version: current.version,
            tally,
        };
        match self
            .with_timeout("commit", self.repository.commit(kind, item_id, &commit))
            .await
        {
            Ok(updated) => {
                debug!(
                    upvotes = updated.item.tally.upvotes(),
                    downvotes = updated.item.tally.downvotes(),
                    version = updated.version,
                    "Vote committed"
                );
                Ok(updated.item)
            }
            Err(err) => {
                if err.is_conflict() {
                    warn!(attempt, "Item changed while voting, retrying");
                }
                Err(err)
            }
        }
    }

    /// Fetch an item with its current vote fields.
    #[instrument(skip(self), fields(kind = %kind, item_id = %item_id))]
    pub async fn get_item(
        &self,
        kind: ContentKind,
        item_id: ItemId,
    ) -> Result<VotableItem, VoteServiceError> {
        let current = self
            .with_timeout("load", self.repository.load(kind, item_id))
            .await?;
        Ok(current.item)
    }

    /// Whether `user_id` authored the item.
    pub async fn is_author(
        &self,
        kind: ContentKind,
        item_id: ItemId,
        user_id: AuthorId,
    ) -> Result<bool, VoteServiceError> {
        let item = self.get_item(kind, item_id).await?;
        Ok(item.author_id == user_id)
    }

    /// Register a newly posted item with empty vote fields.
    #[instrument(skip(self), fields(kind = %kind, item_id = %item_id))]
    pub async fn create_item(
        &self,
        kind: ContentKind,
        item_id: ItemId,
        author_id: AuthorId,
    ) -> Result<VotableItem, VoteServiceError> {
        let created = self
            .with_timeout("create", self.repository.create(kind, item_id, author_id))
            .await?;
        Ok(created.item)
    }

    /// Remove an item together with its votes.
    #[instrument(skip(self), fields(kind = %kind, item_id = %item_id))]
    pub async fn delete_item(
        &self,
        kind: ContentKind,
        item_id: ItemId,
    ) -> Result<(), VoteServiceError> {
        self.with_timeout("delete", self.repository.delete(kind, item_id))
            .await
    }

    async fn with_timeout<T, F>(
        &self,
        operation: &'static str,
        future: F,
    ) -> Result<T, VoteServiceError>
    where
        F: Future<Output = Result<T, RepositoryError>>,
    {
        match timeout(self.config.store_timeout, future).await {
            Ok(result) => result.map_err(VoteServiceError::from),
            Err(_) => Err(VoteServiceError::unavailable(format!(
                "store {} timed out after {}ms",
                operation,
                self.config.store_timeout.as_millis()
            ))),
        }
    }
}
