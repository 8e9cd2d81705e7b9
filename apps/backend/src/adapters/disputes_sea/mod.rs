//! SeaORM adapter for game_disputes.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, NotSet, QueryFilter,
    QuerySelect, Set,
};

use crate::entities::game_disputes;
use crate::entities::game_moves::TrickResult;

pub mod dto;

pub use dto::{DisputeCreate, DisputeResolution};

pub async fn create_dispute<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: DisputeCreate,
) -> Result<game_disputes::Model, sea_orm::DbErr> {
    let active = game_disputes::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        turn_id: Set(dto.turn_id),
        disputed_by: Set(dto.disputed_by),
        against_player_id: Set(dto.against_player_id),
        original_result: Set(TrickResult::Missed),
        final_result: Set(None),
        resolved_by: Set(None),
        resolved_at: Set(None),
        penalty_applied_to: Set(None),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };
    active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dispute_id: i64,
) -> Result<Option<game_disputes::Model>, sea_orm::DbErr> {
    game_disputes::Entity::find_by_id(dispute_id).one(conn).await
}

/// Reads the dispute row for update (row lock on Postgres).
pub async fn lock_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dispute_id: i64,
) -> Result<Option<game_disputes::Model>, sea_orm::DbErr> {
    let mut query = game_disputes::Entity::find_by_id(dispute_id);
    if conn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.one(conn).await
}

/// Records the verdict on an open dispute.
///
/// Returns `false` when the dispute had already been resolved.
pub async fn resolve<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: DisputeResolution,
) -> Result<bool, sea_orm::DbErr> {
    let changes = game_disputes::ActiveModel {
        final_result: Set(Some(dto.final_result)),
        resolved_by: Set(Some(dto.resolved_by)),
        resolved_at: Set(Some(dto.resolved_at)),
        penalty_applied_to: Set(Some(dto.penalty_applied_to)),
        ..Default::default()
    };
    let res = game_disputes::Entity::update_many()
        .set(changes)
        .filter(game_disputes::Column::Id.eq(dto.id))
        .filter(game_disputes::Column::FinalResult.is_null())
        .exec(conn)
        .await?;
    Ok(res.rows_affected == 1)
}
