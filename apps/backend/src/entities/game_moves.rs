use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    #[sea_orm(string_value = "set")]
    Set,
    #[sea_orm(string_value = "match")]
    Match,
}

/// Outcome of an attempt; `Pending` until judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum TrickResult {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "landed")]
    Landed,
    #[sea_orm(string_value = "missed")]
    Missed,
}

/// A judgment: a player's vote, a consensus, or a dispute verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    #[sea_orm(string_value = "landed")]
    Landed,
    #[sea_orm(string_value = "missed")]
    Missed,
}

impl From<Vote> for TrickResult {
    fn from(vote: Vote) -> Self {
        match vote {
            Vote::Landed => TrickResult::Landed,
            Vote::Missed => TrickResult::Missed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "game_moves")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub game_id: i64,
    pub round_number: i32,
    pub player_id: i64,
    pub move_type: MoveType,
    pub trick_name: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub clip_ref: String,
    pub result: TrickResult,
    pub attacker_vote: Option<Vote>,
    pub defender_vote: Option<Vote>,
    pub judged_by: Option<i64>,
    pub timed_out: bool,
    pub auto_resolved: Option<Vote>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id",
        on_delete = "Cascade"
    )]
    Game,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
