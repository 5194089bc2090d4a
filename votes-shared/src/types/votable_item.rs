use serde::{Deserialize, Serialize};

use super::{AuthorId, ContentKind, ItemId, VoteTally};

/// A content item that can receive votes.
///
/// Comments, answers, posts and questions all carry the same vote fields; the
/// `kind` selects which collection the item lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotableItem {
    pub id: ItemId,
    pub kind: ContentKind,
    pub author_id: AuthorId,
    #[serde(flatten)]
    pub tally: VoteTally,
}

impl VotableItem {
    /// A freshly created item with no votes.
    pub fn new(kind: ContentKind, id: ItemId, author_id: AuthorId) -> Self {
        Self {
            id,
            kind,
            author_id,
            tally: VoteTally::new(),
        }
    }
}

/// A votable item paired with the concurrency token it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedItem {
    pub item: VotableItem,
    pub version: u64,
}

/// A compare-and-swap write of an item's vote fields.
///
/// The store applies `tally` only if the item is still at `expected_version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteCommit {
    pub expected_version: u64,
    pub tally: VoteTally,
}
