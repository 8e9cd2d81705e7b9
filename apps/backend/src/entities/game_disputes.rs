use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

use super::game_moves::{TrickResult, Vote};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "game_disputes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub game_id: i64,
    pub turn_id: i64,
    pub disputed_by: i64,
    pub against_player_id: i64,
    pub original_result: TrickResult,
    pub final_result: Option<Vote>,
    pub resolved_by: Option<i64>,
    pub resolved_at: Option<OffsetDateTime>,
    pub penalty_applied_to: Option<i64>,
    pub created_at: OffsetDateTime,
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
    #[sea_orm(
        belongs_to = "super::game_moves::Entity",
        from = "Column::TurnId",
        to = "super::game_moves::Column::Id",
        on_delete = "Cascade"
    )]
    Turn,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
