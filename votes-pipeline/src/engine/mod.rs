//! The vote engine: pure decision logic for a single vote request.
//!
//! Given a voter's standing vote and the direction they asked for, the engine
//! picks a [`Transition`] and produces the next tally. It performs no I/O and
//! cannot fail.
//!
//! | prior     | up                  | down                |
//! |-----------|---------------------|---------------------|
//! | none      | add up              | add down            |
//! | upvoted   | remove up           | switch up → down    |
//! | downvoted | switch down → up    | remove down         |
use votes_shared::types::{PriorVote, Transition, VoteDirection, VoteTally, VoterId};

/// Decides the transition for a vote request.
///
/// Repeating the standing vote retracts it; voting the other way switches it.
pub fn decide(prior: PriorVote, requested: VoteDirection) -> Transition {
    match prior.direction() {
        None => Transition::AddVote(requested),
        Some(current) if current == requested => Transition::RemoveVote(requested),
        Some(current) => Transition::SwitchVote {
            from: current,
            to: requested,
        },
    }
}

/// Produces the tally that results from applying `transition` for `voter`.
///
/// A switch removes the voter from one set and adds them to the other before
/// the tally is handed back, so no caller ever observes the voter in both sets.
pub fn apply(tally: &VoteTally, voter: VoterId, transition: Transition) -> VoteTally {
    let mut next = tally.clone();
    match transition {
        Transition::AddVote(direction) => {
            next.insert_voter(direction, voter);
        }
        Transition::RemoveVote(direction) => {
            next.remove_voter(direction, &voter);
        }
        Transition::SwitchVote { from, to } => {
            next.remove_voter(from, &voter);
            next.insert_voter(to, voter);
        }
    }
    next
}

/// Looks up the voter's standing vote, decides, and applies in one call.
pub fn cast(tally: &VoteTally, voter: VoterId, requested: VoteDirection) -> (Transition, VoteTally) {
    let transition = decide(tally.prior_vote(&voter), requested);
    (transition, apply(tally, voter, transition))
}
