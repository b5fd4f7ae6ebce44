use crate::Configuration;
use serde::{Deserialize, Serialize};

/// Whether the player to move can force a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every move hands the opponent a winning configuration.
    Losing,
    /// Some move leaves the opponent in a losing configuration.
    Winning,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub(super) struct Entry {
    outcome: Outcome,
    refutation: Option<Configuration>,
}

impl Entry {
    pub fn losing() -> Entry {
        Entry {
            outcome: Outcome::Losing,
            refutation: None,
        }
    }
    /// Whoever faces an empty row did not take the last stick.
    pub fn terminal() -> Entry {
        Entry {
            outcome: Outcome::Winning,
            refutation: None,
        }
    }
    /// A winning entry, remembering the losing child that proves it.
    pub fn winning(refutation: Configuration) -> Entry {
        Entry {
            outcome: Outcome::Winning,
            refutation: Some(refutation),
        }
    }
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
    pub fn is_losing(&self) -> bool {
        self.outcome == Outcome::Losing
    }
    pub fn refutation(&self) -> Option<&Configuration> {
        self.refutation.as_ref()
    }
}
