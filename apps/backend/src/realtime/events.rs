use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::session::{GameSession, LetterAwarded};
use crate::entities::game_moves::Vote;
use crate::entities::games::{GameStatus, TurnPhase};

/// Events published to a game's room after the transaction that caused them commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum GameEvent {
    #[serde(rename = "game:turn")]
    Turn {
        game_id: i64,
        round_number: i32,
        turn_phase: Option<TurnPhase>,
        current_turn: Option<i64>,
        offensive_player_id: Option<i64>,
        defensive_player_id: Option<i64>,
        #[serde(with = "time::serde::rfc3339::option")]
        vote_deadline: Option<OffsetDateTime>,
        version: i32,
    },
    #[serde(rename = "game:letter")]
    Letter {
        game_id: i64,
        player_id: i64,
        letters: String,
    },
    #[serde(rename = "game:ended")]
    Ended {
        game_id: i64,
        status: GameStatus,
        winner_id: Option<i64>,
    },
    #[serde(rename = "game:paused")]
    Paused {
        game_id: i64,
        dispute_id: i64,
        disputed_by: i64,
    },
    #[serde(rename = "game:resumed")]
    Resumed {
        game_id: i64,
        dispute_id: i64,
        final_result: Vote,
    },
}

impl GameEvent {
    pub fn turn(session: &GameSession) -> Self {
        GameEvent::Turn {
            game_id: session.id,
            round_number: session.round_number,
            turn_phase: session.turn_phase,
            current_turn: session.current_turn,
            offensive_player_id: session.offensive_player_id,
            defensive_player_id: session.defensive_player_id,
            vote_deadline: session.vote_deadline,
            version: session.version,
        }
    }

    pub fn letter(game_id: i64, change: &LetterAwarded) -> Self {
        GameEvent::Letter {
            game_id,
            player_id: change.player_id,
            letters: change.letters.as_str().to_string(),
        }
    }

    pub fn ended(session: &GameSession) -> Self {
        GameEvent::Ended {
            game_id: session.id,
            status: session.status,
            winner_id: session.winner_id,
        }
    }

    pub fn game_id(&self) -> i64 {
        match self {
            GameEvent::Turn { game_id, .. }
            | GameEvent::Letter { game_id, .. }
            | GameEvent::Ended { game_id, .. }
            | GameEvent::Paused { game_id, .. }
            | GameEvent::Resumed { game_id, .. } => *game_id,
        }
    }

    /// Wire name, e.g. `game:turn`.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Turn { .. } => "game:turn",
            GameEvent::Letter { .. } => "game:letter",
            GameEvent::Ended { .. } => "game:ended",
            GameEvent::Paused { .. } => "game:paused",
            GameEvent::Resumed { .. } => "game:resumed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::Ended { .. })
    }
}
