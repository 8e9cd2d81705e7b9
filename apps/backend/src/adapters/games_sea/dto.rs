//! DTOs for games_sea adapter.

use time::OffsetDateTime;

use crate::entities::games::{GameStatus, TurnPhase};

/// DTO for proposing a new game between two players.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub player1_id: i64,
    pub player2_id: i64,
}

impl GameCreate {
    pub fn new(player1_id: i64, player2_id: i64) -> Self {
        Self {
            player1_id,
            player2_id,
        }
    }
}

/// Full write of the mutable game columns, guarded by `expected_version`.
///
/// Every field is written; a successful update bumps `version` by one.
#[derive(Debug, Clone)]
pub struct GameUpdate {
    pub id: i64,
    pub expected_version: i32,
    pub status: GameStatus,
    pub current_turn: Option<i64>,
    pub offensive_player_id: Option<i64>,
    pub defensive_player_id: Option<i64>,
    pub turn_phase: Option<TurnPhase>,
    pub round_number: i32,
    pub player1_letters: String,
    pub player2_letters: String,
    pub winner_id: Option<i64>,
    pub vote_deadline: Option<OffsetDateTime>,
    pub player1_dispute_used: bool,
    pub player2_dispute_used: bool,
    pub processed_idempotency_keys: String,
    pub started_at: Option<OffsetDateTime>,
    pub completed_at: Option<OffsetDateTime>,
}
