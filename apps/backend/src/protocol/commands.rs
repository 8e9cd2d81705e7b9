use serde::{Deserialize, Serialize};

use crate::domain::idempotency::CommandAction;
use crate::entities::game_moves::Vote;
use crate::errors::domain::DomainError;

pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 128;
pub const MAX_TRICK_NAME_LEN: usize = 120;

/// Body of `POST /api/games`. The caller must be `player1_id`, the challenger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposeGame {
    pub player1_id: i64,
    pub player2_id: i64,
}

/// A mutating command against one game.
///
/// ```json
/// {"type": "cast-vote", "turn_id": 12, "vote": "landed", "idempotency_key": "abc"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameCommand {
    Join {
        #[serde(default)]
        idempotency_key: Option<String>,
    },
    SubmitTrick {
        is_set_trick: bool,
        clip_ref: String,
        #[serde(default)]
        trick_name: Option<String>,
        #[serde(default)]
        idempotency_key: Option<String>,
    },
    CastVote {
        turn_id: i64,
        vote: Vote,
        #[serde(default)]
        idempotency_key: Option<String>,
    },
    #[serde(alias = "abandon")]
    Forfeit {
        #[serde(default)]
        idempotency_key: Option<String>,
    },
    FileDispute {
        turn_id: i64,
        #[serde(default)]
        idempotency_key: Option<String>,
    },
    ResolveDispute {
        dispute_id: i64,
        final_result: Vote,
        #[serde(default)]
        idempotency_key: Option<String>,
    },
}

impl GameCommand {
    pub fn action(&self) -> CommandAction {
        match self {
            GameCommand::Join { .. } => CommandAction::Join,
            GameCommand::SubmitTrick { .. } => CommandAction::SubmitTrick,
            GameCommand::CastVote { .. } => CommandAction::CastVote,
            GameCommand::Forfeit { .. } => CommandAction::Forfeit,
            GameCommand::FileDispute { .. } => CommandAction::FileDispute,
            GameCommand::ResolveDispute { .. } => CommandAction::ResolveDispute,
        }
    }

    pub fn idempotency_key(&self) -> Option<&str> {
        match self {
            GameCommand::Join { idempotency_key }
            | GameCommand::SubmitTrick { idempotency_key, .. }
            | GameCommand::CastVote { idempotency_key, .. }
            | GameCommand::Forfeit { idempotency_key }
            | GameCommand::FileDispute { idempotency_key, .. }
            | GameCommand::ResolveDispute { idempotency_key, .. } => idempotency_key.as_deref(),
        }
    }

    /// Payload checks that need no game state.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(key) = self.idempotency_key() {
            if key.trim().is_empty() {
                return Err(DomainError::invalid_command("idempotency_key must not be blank"));
            }
            if key.len() > MAX_IDEMPOTENCY_KEY_LEN {
                return Err(DomainError::invalid_command(format!(
                    "idempotency_key must be at most {MAX_IDEMPOTENCY_KEY_LEN} characters"
                )));
            }
        }

        match self {
            GameCommand::SubmitTrick {
                clip_ref,
                trick_name,
                ..
            } => {
                if clip_ref.trim().is_empty() {
                    return Err(DomainError::invalid_command("clip_ref must not be blank"));
                }
                if let Some(name) = trick_name {
                    if name.chars().count() > MAX_TRICK_NAME_LEN {
                        return Err(DomainError::invalid_command(format!(
                            "trick_name must be at most {MAX_TRICK_NAME_LEN} characters"
                        )));
                    }
                }
            }
            GameCommand::CastVote { turn_id, .. } | GameCommand::FileDispute { turn_id, .. } => {
                if *turn_id <= 0 {
                    return Err(DomainError::invalid_command("turn_id must be positive"));
                }
            }
            GameCommand::ResolveDispute { dispute_id, .. } => {
                if *dispute_id <= 0 {
                    return Err(DomainError::invalid_command("dispute_id must be positive"));
                }
            }
            GameCommand::Join { .. } | GameCommand::Forfeit { .. } => {}
        }
        Ok(())
    }
}
