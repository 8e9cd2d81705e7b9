//! SeaORM adapter for recorded attempts (game_moves).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::game_moves::{self, MoveType, TrickResult, Vote};

pub mod dto;

pub use dto::{MoveCreate, MoveJudgment};

pub async fn create_move<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MoveCreate,
) -> Result<game_moves::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = game_moves::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        round_number: Set(dto.round_number),
        player_id: Set(dto.player_id),
        move_type: Set(dto.move_type),
        trick_name: Set(dto.trick_name),
        clip_ref: Set(dto.clip_ref),
        result: Set(TrickResult::Pending),
        attacker_vote: Set(None),
        defender_vote: Set(None),
        judged_by: Set(None),
        timed_out: Set(false),
        auto_resolved: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    move_id: i64,
) -> Result<Option<game_moves::Model>, sea_orm::DbErr> {
    game_moves::Entity::find_by_id(move_id).one(conn).await
}

pub async fn find_all_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<game_moves::Model>, sea_orm::DbErr> {
    game_moves::Entity::find()
        .filter(game_moves::Column::GameId.eq(game_id))
        .order_by_asc(game_moves::Column::Id)
        .all(conn)
        .await
}

/// The still-pending match attempt of a round, if any.
pub async fn find_pending_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    round_number: i32,
) -> Result<Option<game_moves::Model>, sea_orm::DbErr> {
    game_moves::Entity::find()
        .filter(game_moves::Column::GameId.eq(game_id))
        .filter(game_moves::Column::RoundNumber.eq(round_number))
        .filter(game_moves::Column::MoveType.eq(MoveType::Match))
        .filter(game_moves::Column::Result.eq(TrickResult::Pending))
        .order_by_desc(game_moves::Column::Id)
        .one(conn)
        .await
}

pub async fn update_votes<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    move_id: i64,
    attacker_vote: Option<Vote>,
    defender_vote: Option<Vote>,
) -> Result<(), sea_orm::DbErr> {
    let changes = game_moves::ActiveModel {
        attacker_vote: Set(attacker_vote),
        defender_vote: Set(defender_vote),
        updated_at: Set(time::OffsetDateTime::now_utc()),
        ..Default::default()
    };
    game_moves::Entity::update_many()
        .set(changes)
        .filter(game_moves::Column::Id.eq(move_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Writes a judgment onto a still-pending move.
///
/// Returns `false` when the move was no longer pending.
pub async fn apply_judgment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MoveJudgment,
) -> Result<bool, sea_orm::DbErr> {
    let changes = game_moves::ActiveModel {
        result: Set(dto.result),
        judged_by: Set(dto.judged_by),
        timed_out: Set(dto.timed_out),
        auto_resolved: Set(dto.auto_resolved),
        updated_at: Set(time::OffsetDateTime::now_utc()),
        ..Default::default()
    };
    let res = game_moves::Entity::update_many()
        .set(changes)
        .filter(game_moves::Column::Id.eq(dto.id))
        .filter(game_moves::Column::Result.eq(TrickResult::Pending))
        .exec(conn)
        .await?;
    Ok(res.rows_affected == 1)
}

/// Marks the set attempts of a round as landed once the round resolves.
pub async fn settle_set_moves<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    round_number: i32,
) -> Result<u64, sea_orm::DbErr> {
    let changes = game_moves::ActiveModel {
        result: Set(TrickResult::Landed),
        updated_at: Set(time::OffsetDateTime::now_utc()),
        ..Default::default()
    };
    let res = game_moves::Entity::update_many()
        .set(changes)
        .filter(game_moves::Column::GameId.eq(game_id))
        .filter(game_moves::Column::RoundNumber.eq(round_number))
        .filter(game_moves::Column::MoveType.eq(MoveType::Set))
        .filter(game_moves::Column::Result.eq(TrickResult::Pending))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

/// Overwrites the result of a judged move (dispute reversal).
pub async fn overturn_result<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    move_id: i64,
    result: TrickResult,
) -> Result<(), sea_orm::DbErr> {
    let changes = game_moves::ActiveModel {
        result: Set(result),
        updated_at: Set(time::OffsetDateTime::now_utc()),
        ..Default::default()
    };
    game_moves::Entity::update_many()
        .set(changes)
        .filter(game_moves::Column::Id.eq(move_id))
        .exec(conn)
        .await?;
    Ok(())
}
