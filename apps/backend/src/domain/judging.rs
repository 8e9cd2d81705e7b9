//! Two-party judgment of a match attempt.

use serde::{Deserialize, Serialize};

use crate::entities::game_moves::Vote;
use crate::errors::domain::{ConflictKind, DomainError};

/// Which side of the current round a player is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Attacker,
    Defender,
}

/// Consensus rule: matching votes stand, a split vote goes to the defender
/// as landed.
pub fn consensus(attacker: Vote, defender: Vote) -> Vote {
    if attacker == defender {
        attacker
    } else {
        Vote::Landed
    }
}

/// Votes cast on a single match attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JudgmentVotes {
    pub attacker: Option<Vote>,
    pub defender: Option<Vote>,
}

impl JudgmentVotes {
    pub fn new(attacker: Option<Vote>, defender: Option<Vote>) -> Self {
        Self { attacker, defender }
    }

    /// Records a vote for `role`; each role votes at most once.
    pub fn cast(&mut self, role: Role, vote: Vote) -> Result<(), DomainError> {
        let slot = match role {
            Role::Attacker => &mut self.attacker,
            Role::Defender => &mut self.defender,
        };
        if slot.is_some() {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyVoted,
                format!("{role:?} has already voted on this attempt"),
            ));
        }
        *slot = Some(vote);
        Ok(())
    }

    /// Final outcome once both sides have voted.
    pub fn final_result(&self) -> Option<Vote> {
        match (self.attacker, self.defender) {
            (Some(a), Some(d)) => Some(consensus(a, d)),
            _ => None,
        }
    }
}
