//! Error types for the vote service.
//! The vote engine itself never fails; every error here comes from resolving
//! or persisting an item.
use thiserror::Error;
use votes_repository::RepositoryError;
use votes_shared::types::{ContentKind, ItemId};

/// Represents errors that can occur while applying or reading votes.
#[derive(Debug, Error)]
pub enum VoteServiceError {
    /// The referenced item does not exist. Not retried.
    #[error("{kind} {id} not found")]
    NotFound { kind: ContentKind, id: ItemId },

    /// Every attempt lost a compare-and-swap race to another vote.
    #[error("{kind} {id} kept changing concurrently; gave up after {attempts} attempts")]
    ConcurrentConflict {
        kind: ContentKind,
        id: ItemId,
        attempts: u32,
    },

    /// The store failed or did not answer in time. Nothing was written.
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: ContentKind, id: ItemId },

    #[error("Stored item is inconsistent: {0}")]
    CorruptItem(String),

    /// Raised only when self-voting is disabled in the service config.
    #[error("Voting on your own {kind} is not allowed")]
    SelfVote { kind: ContentKind, id: ItemId },
}

impl VoteServiceError {
    /// Create a persistence unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::PersistenceUnavailable(msg.into())
    }

    /// Whether the failed read-decide-write may be retried from the top.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ConcurrentConflict { .. })
    }
}

impl From<RepositoryError> for VoteServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { kind, id } => Self::NotFound { kind, id },
            RepositoryError::Conflict { kind, id, .. } => Self::ConcurrentConflict {
                kind,
                id,
                attempts: 1,
            },
            RepositoryError::AlreadyExists { kind, id } => Self::AlreadyExists { kind, id },
            RepositoryError::CorruptRecord { .. } => Self::CorruptItem(err.to_string()),
            RepositoryError::DatabaseError(_) | RepositoryError::MigrationError(_) => {
                Self::PersistenceUnavailable(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_repository_errors_map_to_service_errors() {
        let id = Uuid::new_v4();

        let err: VoteServiceError = RepositoryError::not_found(ContentKind::Comment, id).into();
        assert!(matches!(err, VoteServiceError::NotFound { kind: ContentKind::Comment, .. }));

        let err: VoteServiceError = RepositoryError::Conflict {
            kind: ContentKind::Post,
            id,
            expected_version: 3,
        }
        .into();
        assert!(err.is_conflict());

        let err: VoteServiceError = RepositoryError::DatabaseError(sqlx::Error::PoolClosed).into();
        assert!(matches!(err, VoteServiceError::PersistenceUnavailable(_)));

        let err: VoteServiceError = RepositoryError::corrupt(ContentKind::Answer, id, "bad").into();
        assert!(matches!(err, VoteServiceError::CorruptItem(_)));
    }
}
