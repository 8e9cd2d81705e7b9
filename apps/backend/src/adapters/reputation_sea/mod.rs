//! SeaORM adapter for player_reputation.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entities::player_reputation;

pub async fn find_by_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<player_reputation::Model>, sea_orm::DbErr> {
    player_reputation::Entity::find_by_id(player_id).one(conn).await
}

/// Adds one penalty to the player's record, creating it on first use.
///
/// Insert-if-missing followed by an in-place increment keeps concurrent
/// penalties for the same player from losing updates.
pub async fn increment_penalty<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<player_reputation::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let seed = player_reputation::ActiveModel {
        player_id: Set(player_id),
        penalty_count: Set(0),
        updated_at: Set(now),
    };
    player_reputation::Entity::insert(seed)
        .on_conflict(
            OnConflict::column(player_reputation::Column::PlayerId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    player_reputation::Entity::update_many()
        .col_expr(
            player_reputation::Column::PenaltyCount,
            Expr::col(player_reputation::Column::PenaltyCount).add(1),
        )
        .col_expr(player_reputation::Column::UpdatedAt, Expr::val(now).into())
        .filter(player_reputation::Column::PlayerId.eq(player_id))
        .exec(conn)
        .await?;

    find_by_player(conn, player_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Reputation not found".to_string()))
}
