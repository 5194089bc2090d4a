use super::{PriorVote, VoteDirection};

/// The change a single vote request makes to an item's tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The voter had no standing vote; add them in this direction.
    AddVote(VoteDirection),
    /// The voter repeated their standing vote; retract it.
    RemoveVote(VoteDirection),
    /// The voter reversed their standing vote; move them across in one step.
    SwitchVote {
        from: VoteDirection,
        to: VoteDirection,
    },
}

/// Net change to the two counters caused by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VotesDelta {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VotesDelta {
    fn for_direction(direction: VoteDirection, amount: i64) -> Self {
        match direction {
            VoteDirection::Up => Self {
                upvotes: amount,
                downvotes: 0,
            },
            VoteDirection::Down => Self {
                upvotes: 0,
                downvotes: amount,
            },
        }
    }
}

impl Transition {
    /// Count deltas implied by this transition.
    pub fn delta(&self) -> VotesDelta {
        match *self {
            Transition::AddVote(direction) => VotesDelta::for_direction(direction, 1),
            Transition::RemoveVote(direction) => VotesDelta::for_direction(direction, -1),
            Transition::SwitchVote { from, to } => {
                let removed = VotesDelta::for_direction(from, -1);
                let added = VotesDelta::for_direction(to, 1);
                VotesDelta {
                    upvotes: removed.upvotes + added.upvotes,
                    downvotes: removed.downvotes + added.downvotes,
                }
            }
        }
    }

    /// The voter's standing vote once the transition is applied.
    pub fn resulting_vote(&self) -> PriorVote {
        match *self {
            Transition::AddVote(direction) => direction.into(),
            Transition::RemoveVote(_) => PriorVote::None,
            Transition::SwitchVote { to, .. } => to.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_vote_delta() {
        assert_eq!(
            Transition::AddVote(VoteDirection::Down).delta(),
            VotesDelta {
                upvotes: 0,
                downvotes: 1
            }
        );
    }

    #[test]
    fn test_remove_vote_delta() {
        assert_eq!(
            Transition::RemoveVote(VoteDirection::Up).delta(),
            VotesDelta {
                upvotes: -1,
                downvotes: 0
            }
        );
    }

    #[test]
    fn test_switch_vote_delta() {
        let switch = Transition::SwitchVote {
            from: VoteDirection::Up,
            to: VoteDirection::Down,
        };
        assert_eq!(
            switch.delta(),
            VotesDelta {
                upvotes: -1,
                downvotes: 1
            }
        );
        assert_eq!(switch.resulting_vote(), PriorVote::Downvoted);
    }
}
