use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use super::{PriorVote, VoteDirection, VoterId};

/// Violations of the tally invariants, reported when a tally is rebuilt from
/// stored or untrusted parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TallyError {
    #[error("{direction} count {count} does not match {voters} recorded voters")]
    CountMismatch {
        direction: VoteDirection,
        count: u64,
        voters: usize,
    },

    #[error("voter {0} is recorded as both upvoting and downvoting")]
    OverlappingVoter(VoterId),
}

/// The four vote fields carried by every votable item.
///
/// The counters always equal the sizes of the voter sets and the two sets are
/// always disjoint. Fields are private so the only way to change a tally is
/// through [`VoteTally::insert_voter`] and [`VoteTally::remove_voter`], which
/// keep the counters in step with the sets and the sets disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TallyRecord")]
pub struct VoteTally {
    upvotes: u64,
    downvotes: u64,
    upvoted_by: BTreeSet<VoterId>,
    downvoted_by: BTreeSet<VoterId>,
}

/// Unchecked wire form of a tally.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TallyRecord {
    upvotes: u64,
    downvotes: u64,
    upvoted_by: BTreeSet<VoterId>,
    downvoted_by: BTreeSet<VoterId>,
}

impl TryFrom<TallyRecord> for VoteTally {
    type Error = TallyError;

    fn try_from(record: TallyRecord) -> Result<Self, Self::Error> {
        VoteTally::from_parts(
            record.upvotes,
            record.downvotes,
            record.upvoted_by,
            record.downvoted_by,
        )
    }
}

impl VoteTally {
    /// An empty tally, as held by newly created content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tally from voter sets, deriving the counters.
    pub fn from_voters(
        upvoted_by: impl IntoIterator<Item = VoterId>,
        downvoted_by: impl IntoIterator<Item = VoterId>,
    ) -> Result<Self, TallyError> {
        let upvoted_by: BTreeSet<VoterId> = upvoted_by.into_iter().collect();
        let downvoted_by: BTreeSet<VoterId> = downvoted_by.into_iter().collect();
        Self::from_parts(
            upvoted_by.len() as u64,
            downvoted_by.len() as u64,
            upvoted_by,
            downvoted_by,
        )
    }

    /// Rebuilds a tally from its four stored fields, checking every invariant.
    pub fn from_parts(
        upvotes: u64,
        downvotes: u64,
        upvoted_by: BTreeSet<VoterId>,
        downvoted_by: BTreeSet<VoterId>,
    ) -> Result<Self, TallyError> {
        let tally = Self {
            upvotes,
            downvotes,
            upvoted_by,
            downvoted_by,
        };
        tally.validate()?;
        Ok(tally)
    }

    /// Checks count consistency and disjointness.
    pub fn validate(&self) -> Result<(), TallyError> {
        if self.upvotes != self.upvoted_by.len() as u64 {
            return Err(TallyError::CountMismatch {
                direction: VoteDirection::Up,
                count: self.upvotes,
                voters: self.upvoted_by.len(),
            });
        }
        if self.downvotes != self.downvoted_by.len() as u64 {
            return Err(TallyError::CountMismatch {
                direction: VoteDirection::Down,
                count: self.downvotes,
                voters: self.downvoted_by.len(),
            });
        }
        if let Some(voter) = self.upvoted_by.intersection(&self.downvoted_by).next() {
            return Err(TallyError::OverlappingVoter(*voter));
        }
        Ok(())
    }

    pub fn upvotes(&self) -> u64 {
        self.upvotes
    }

    pub fn downvotes(&self) -> u64 {
        self.downvotes
    }

    pub fn upvoted_by(&self) -> &BTreeSet<VoterId> {
        &self.upvoted_by
    }

    pub fn downvoted_by(&self) -> &BTreeSet<VoterId> {
        &self.downvoted_by
    }

    /// Looks up the voter's standing vote.
    pub fn prior_vote(&self, voter: &VoterId) -> PriorVote {
        if self.upvoted_by.contains(voter) {
            PriorVote::Upvoted
        } else if self.downvoted_by.contains(voter) {
            PriorVote::Downvoted
        } else {
            PriorVote::None
        }
    }

    /// Adds the voter to the set for `direction`, dropping them from the other
    /// set. Returns `false` if the voter was already present in `direction`.
    pub fn insert_voter(&mut self, direction: VoteDirection, voter: VoterId) -> bool {
        self.voters_mut(direction.opposite()).remove(&voter);
        let inserted = self.voters_mut(direction).insert(voter);
        self.sync_counts();
        inserted
    }

    /// Removes the voter from the set for `direction`. Returns `false` if the
    /// voter was not present.
    pub fn remove_voter(&mut self, direction: VoteDirection, voter: &VoterId) -> bool {
        let removed = self.voters_mut(direction).remove(voter);
        self.sync_counts();
        removed
    }

    fn voters_mut(&mut self, direction: VoteDirection) -> &mut BTreeSet<VoterId> {
        match direction {
            VoteDirection::Up => &mut self.upvoted_by,
            VoteDirection::Down => &mut self.downvoted_by,
        }
    }

    fn sync_counts(&mut self) {
        self.upvotes = self.upvoted_by.len() as u64;
        self.downvotes = self.downvoted_by.len() as u64;
    }
}
