//! DTOs for moves_sea adapter.

use crate::entities::game_moves::{MoveType, TrickResult, Vote};

/// DTO for recording a set or match attempt.
#[derive(Debug, Clone)]
pub struct MoveCreate {
    pub game_id: i64,
    pub round_number: i32,
    pub player_id: i64,
    pub move_type: MoveType,
    pub trick_name: Option<String>,
    pub clip_ref: String,
}

/// Final judgment written onto a move.
#[derive(Debug, Clone)]
pub struct MoveJudgment {
    pub id: i64,
    pub result: TrickResult,
    pub judged_by: Option<i64>,
    pub timed_out: bool,
    pub auto_resolved: Option<Vote>,
}
