use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::letters::Letters;
use crate::domain::session::GameSession;
use crate::entities::game_moves::{MoveType, TrickResult, Vote};
use crate::entities::games::{GameStatus, TurnPhase};
use crate::repos::disputes::Dispute;
use crate::repos::moves::GameMove;

/// Public snapshot of a game; the idempotency ledger stays server-side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    pub id: i64,
    pub player1_id: i64,
    pub player2_id: i64,
    pub status: GameStatus,
    pub current_turn: Option<i64>,
    pub offensive_player_id: Option<i64>,
    pub defensive_player_id: Option<i64>,
    pub turn_phase: Option<TurnPhase>,
    pub round_number: i32,
    pub player1_letters: Letters,
    pub player2_letters: Letters,
    pub winner_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub vote_deadline: Option<OffsetDateTime>,
    pub player1_dispute_used: bool,
    pub player2_dispute_used: bool,
    pub version: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

impl From<&GameSession> for GameView {
    fn from(session: &GameSession) -> Self {
        Self {
            id: session.id,
            player1_id: session.player1_id,
            player2_id: session.player2_id,
            status: session.status,
            current_turn: session.current_turn,
            offensive_player_id: session.offensive_player_id,
            defensive_player_id: session.defensive_player_id,
            turn_phase: session.turn_phase,
            round_number: session.round_number,
            player1_letters: session.player1_letters,
            player2_letters: session.player2_letters,
            winner_id: session.winner_id,
            vote_deadline: session.vote_deadline,
            player1_dispute_used: session.player1_dispute_used,
            player2_dispute_used: session.player2_dispute_used,
            version: session.version,
            created_at: session.created_at,
            started_at: session.started_at,
            completed_at: session.completed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveView {
    pub id: i64,
    pub round_number: i32,
    pub player_id: i64,
    pub move_type: MoveType,
    pub trick_name: Option<String>,
    pub clip_ref: String,
    pub result: TrickResult,
    pub attacker_vote: Option<Vote>,
    pub defender_vote: Option<Vote>,
    pub judged_by: Option<i64>,
    pub timed_out: bool,
    pub auto_resolved: Option<Vote>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<GameMove> for MoveView {
    fn from(mv: GameMove) -> Self {
        Self {
            id: mv.id,
            round_number: mv.round_number,
            player_id: mv.player_id,
            move_type: mv.move_type,
            trick_name: mv.trick_name,
            clip_ref: mv.clip_ref,
            result: mv.result,
            attacker_vote: mv.attacker_vote,
            defender_vote: mv.defender_vote,
            judged_by: mv.judged_by,
            timed_out: mv.timed_out,
            auto_resolved: mv.auto_resolved,
            created_at: mv.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisputeView {
    pub id: i64,
    pub game_id: i64,
    pub turn_id: i64,
    pub disputed_by: i64,
    pub against_player_id: i64,
    pub original_result: TrickResult,
    pub final_result: Option<Vote>,
    pub resolved_by: Option<i64>,
    pub penalty_applied_to: Option<i64>,
}

impl From<Dispute> for DisputeView {
    fn from(d: Dispute) -> Self {
        Self {
            id: d.id,
            game_id: d.game_id,
            turn_id: d.turn_id,
            disputed_by: d.disputed_by,
            against_player_id: d.against_player_id,
            original_result: d.original_result,
            final_result: d.final_result,
            resolved_by: d.resolved_by,
            penalty_applied_to: d.penalty_applied_to,
        }
    }
}

/// Result of a command: the game after it, plus any ids it produced.
///
/// `duplicate` is true when the command had already been applied and this
/// reply replays the earlier outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandReply {
    pub game: GameView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispute_id: Option<i64>,
    pub duplicate: bool,
}
