use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[sea_orm(string_value = "waiting")]
    Waiting,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "abandoned")]
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    #[sea_orm(string_value = "set_trick")]
    SetTrick,
    #[sea_orm(string_value = "attacker_recording")]
    AttackerRecording,
    #[sea_orm(string_value = "defender_recording")]
    DefenderRecording,
    #[sea_orm(string_value = "judging")]
    Judging,
    #[sea_orm(string_value = "round_complete")]
    RoundComplete,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub player1_id: i64,
    pub player2_id: i64,
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
    #[sea_orm(column_type = "Text")]
    pub processed_idempotency_keys: String,
    pub version: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub started_at: Option<OffsetDateTime>,
    pub completed_at: Option<OffsetDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_moves::Entity")]
    GameMoves,
    #[sea_orm(has_many = "super::game_disputes::Entity")]
    GameDisputes,
}

impl Related<super::game_moves::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameMoves.def()
    }
}

impl Related<super::game_disputes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameDisputes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
