//! Errors raised while resolving or persisting votable items.
use thiserror::Error;
use votes_shared::types::{ContentKind, ItemId};

/// Represents errors that can occur within a votable item repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{kind} {id} not found")]
    NotFound { kind: ContentKind, id: ItemId },

    #[error("{kind} {id} was modified concurrently (expected version {expected_version})")]
    Conflict {
        kind: ContentKind,
        id: ItemId,
        expected_version: u64,
    },

    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: ContentKind, id: ItemId },

    #[error("Stored {kind} {id} is inconsistent: {reason}")]
    CorruptRecord {
        kind: ContentKind,
        id: ItemId,
        reason: String,
    },

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

impl RepositoryError {
    pub fn not_found(kind: ContentKind, id: ItemId) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn corrupt(kind: ContentKind, id: ItemId, reason: impl Into<String>) -> Self {
        Self::CorruptRecord {
            kind,
            id,
            reason: reason.into(),
        }
    }
}
