//! PostgreSQL implementation of the votable item repository.
//!
//! Each content kind lives in its own table (`comments`, `answers`, `posts`,
//! `questions`) with identical vote columns:
//!
//! - `upvotes`, `downvotes`: counters, kept equal to the array cardinalities
//!   by table constraints
//! - `upvoted_by`, `downvoted_by`: voter id arrays, constrained to be disjoint
//! - `version`: bumped on every commit
//!
//! Commits are a single `UPDATE ... WHERE version = $expected`, so a write is
//! either applied whole or not at all, and a stale read is detected as a
//! conflict instead of overwriting a concurrent vote.
use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::{debug, instrument};
use uuid::Uuid;
use votes_shared::types::{
    AuthorId, ContentKind, ItemId, VersionedItem, VotableItem, VoteCommit, VoteTally,
};

use crate::{RepositoryError, VotableItemRepository};

const ITEM_COLUMNS: &str = "id, author_id, upvotes, downvotes, upvoted_by, downvoted_by, version";

/// PostgreSQL-backed votable item repository.
pub struct PostgresVotableItemRepository {
    pool: sqlx::PgPool,
}

impl PostgresVotableItemRepository {
    /// Creates a new repository over an existing pool.
    ///
    /// # Arguments
    ///
    /// * `pool` - PostgreSQL connection pool with the votable item tables
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresVotableItemRepository)` - Ready-to-use repository instance
    /// * `Err(RepositoryError)` - Future validation errors (currently always succeeds)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, RepositoryError> {
        Ok(Self { pool })
    }

    /// Connects a new pool and wraps it in a repository.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Self::new(pool).await
    }

    /// Applies the embedded schema migrations.
    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("src/postgres/migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Checks that a table exists for every content kind.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If all tables are created
    /// * `Ok(false)` - If at least one table is missing
    pub async fn check_tables_created(&self) -> Result<bool, RepositoryError> {
        for kind in ContentKind::ALL {
            let table_exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
            )
            .bind(kind.collection())
            .fetch_one(&self.pool)
            .await?;
            if !table_exists {
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn exists(&self, kind: ContentKind, id: ItemId) -> Result<bool, RepositoryError> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            kind.collection()
        );
        let exists: bool = sqlx::query_scalar(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

/// Decodes a row into a versioned item, re-checking the tally invariants.
fn row_to_item(kind: ContentKind, row: &PgRow) -> Result<VersionedItem, RepositoryError> {
    let id: Uuid = row.try_get("id")?;
    let author_id: Uuid = row.try_get("author_id")?;
    let upvotes: i64 = row.try_get("upvotes")?;
    let downvotes: i64 = row.try_get("downvotes")?;
    let upvoted_by: Vec<Uuid> = row.try_get("upvoted_by")?;
    let downvoted_by: Vec<Uuid> = row.try_get("downvoted_by")?;
    let version: i64 = row.try_get("version")?;

    let upvotes = u64::try_from(upvotes)
        .map_err(|_| RepositoryError::corrupt(kind, id, format!("negative upvotes {}", upvotes)))?;
    let downvotes = u64::try_from(downvotes).map_err(|_| {
        RepositoryError::corrupt(kind, id, format!("negative downvotes {}", downvotes))
    })?;
    let version = u64::try_from(version)
        .map_err(|_| RepositoryError::corrupt(kind, id, format!("negative version {}", version)))?;

    let tally = VoteTally::from_parts(
        upvotes,
        downvotes,
        upvoted_by.into_iter().collect::<BTreeSet<_>>(),
        downvoted_by.into_iter().collect::<BTreeSet<_>>(),
    )
    .map_err(|e| RepositoryError::corrupt(kind, id, e.to_string()))?;

    Ok(VersionedItem {
        item: VotableItem {
            id,
            kind,
            author_id,
            tally,
        },
        version,
    })
}

#[async_trait]
impl VotableItemRepository for PostgresVotableItemRepository {
    #[instrument(skip(self), fields(table = kind.collection()))]
    async fn load(&self, kind: ContentKind, id: ItemId) -> Result<VersionedItem, RepositoryError> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1",
            ITEM_COLUMNS,
            kind.collection()
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::not_found(kind, id))?;

        row_to_item(kind, &row)
    }

    #[instrument(skip(self, commit), fields(table = kind.collection(), expected_version = commit.expected_version))]
    async fn commit(
        &self,
        kind: ContentKind,
        id: ItemId,
        commit: &VoteCommit,
    ) -> Result<VersionedItem, RepositoryError> {
        let query = format!(
            r#"
            UPDATE {}
            SET upvotes = $3,
                downvotes = $4,
                upvoted_by = $5,
                downvoted_by = $6,
                version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING {}
            "#,
            kind.collection(),
            ITEM_COLUMNS
        );
        let upvoted_by: Vec<Uuid> = commit.tally.upvoted_by().iter().copied().collect();
        let downvoted_by: Vec<Uuid> = commit.tally.downvoted_by().iter().copied().collect();

        let row = sqlx::query(&query)
            .bind(id)
            .bind(commit.expected_version as i64)
            .bind(commit.tally.upvotes() as i64)
            .bind(commit.tally.downvotes() as i64)
            .bind(upvoted_by)
            .bind(downvoted_by)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row {
            return row_to_item(kind, &row);
        }

        if !self.exists(kind, id).await? {
            return Err(RepositoryError::not_found(kind, id));
        }
        debug!("Version moved since load");
        Err(RepositoryError::Conflict {
            kind,
            id,
            expected_version: commit.expected_version,
        })
    }

    #[instrument(skip(self), fields(table = kind.collection()))]
    async fn create(
        &self,
        kind: ContentKind,
        id: ItemId,
        author_id: AuthorId,
    ) -> Result<VersionedItem, RepositoryError> {
        let query = format!(
            "INSERT INTO {} (id, author_id) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING RETURNING {}",
            kind.collection(),
            ITEM_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::AlreadyExists { kind, id })?;

        row_to_item(kind, &row)
    }

    #[instrument(skip(self), fields(table = kind.collection()))]
    async fn delete(&self, kind: ContentKind, id: ItemId) -> Result<(), RepositoryError> {
        let query = format!("DELETE FROM {} WHERE id = $1", kind.collection());
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(kind, id));
        }
        Ok(())
    }
}
