mod content_kind;
mod transition;
mod votable_item;
mod vote_direction;
mod vote_tally;

pub use content_kind::ContentKind;
pub use transition::{Transition, VotesDelta};
pub use votable_item::{VersionedItem, VotableItem, VoteCommit};
pub use vote_direction::{PriorVote, VoteDirection};
pub use vote_tally::{TallyError, VoteTally};

/// Identifier of a votable content item.
pub type ItemId = uuid::Uuid;
/// Identifier of an account casting votes.
pub type VoterId = uuid::Uuid;
/// Identifier of the account that authored a content item.
pub type AuthorId = uuid::Uuid;
