use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the direction of a vote cast by a user.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    /// Indicates an upvote or positive endorsement.
    Up,
    /// Indicates a downvote or negative endorsement.
    Down,
}

impl VoteDirection {
    /// Returns the other direction.
    pub fn opposite(self) -> Self {
        match self {
            VoteDirection::Up => VoteDirection::Down,
            VoteDirection::Down => VoteDirection::Up,
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteDirection::Up => f.write_str("up"),
            VoteDirection::Down => f.write_str("down"),
        }
    }
}

/// A voter's standing vote on one item, as read from the item's voter sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PriorVote {
    #[default]
    None,
    Upvoted,
    Downvoted,
}

impl PriorVote {
    /// The direction of the standing vote, if any.
    pub fn direction(self) -> Option<VoteDirection> {
        match self {
            PriorVote::None => None,
            PriorVote::Upvoted => Some(VoteDirection::Up),
            PriorVote::Downvoted => Some(VoteDirection::Down),
        }
    }
}

impl From<VoteDirection> for PriorVote {
    fn from(direction: VoteDirection) -> Self {
        match direction {
            VoteDirection::Up => PriorVote::Upvoted,
            VoteDirection::Down => PriorVote::Downvoted,
        }
    }
}
