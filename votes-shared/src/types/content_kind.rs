use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of content that can receive votes.
///
/// Every kind shares the same voting policy; only the storage binding differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Answer,
    Comment,
    Post,
    Question,
}

impl ContentKind {
    /// All votable kinds, in a stable order.
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Answer,
        ContentKind::Comment,
        ContentKind::Post,
        ContentKind::Question,
    ];

    /// Plural collection name, used for route segments and table names.
    pub fn collection(&self) -> &'static str {
        match self {
            ContentKind::Answer => "answers",
            ContentKind::Comment => "comments",
            ContentKind::Post => "posts",
            ContentKind::Question => "questions",
        }
    }

    /// Resolves a collection name (`"comments"`) back to its kind.
    pub fn from_collection(collection: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.collection() == collection)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Answer => "Answer",
            ContentKind::Comment => "Comment",
            ContentKind::Post => "Post",
            ContentKind::Question => "Question",
        };
        f.write_str(name)
    }
}
