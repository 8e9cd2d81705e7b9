//! SeaORM adapter for game repository - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, NotSet, QueryFilter,
    QuerySelect, Set,
};

use crate::entities::games::{self, GameStatus, TurnPhase};

pub mod dto;

pub use dto::{GameCreate, GameUpdate};

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

/// Helper: Apply optimistic update with version check, then refetch.
///
/// - Adds the version increment and updated_at to the update
/// - Filters by id and the expected version
/// - Checks rows_affected to distinguish NotFound vs OptimisticLock
/// - Refetches and returns the updated model
async fn optimistic_update_then_fetch<C, F>(
    conn: &C,
    id: i64,
    expected_version: i32,
    configure_update: F,
) -> Result<games::Model, sea_orm::DbErr>
where
    C: ConnectionTrait + Send + Sync,
    F: FnOnce(sea_orm::UpdateMany<games::Entity>) -> sea_orm::UpdateMany<games::Entity>,
{
    use sea_orm::sea_query::Expr;

    let now = time::OffsetDateTime::now_utc();

    let result = configure_update(games::Entity::update_many())
        .col_expr(games::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(games::Column::Version, Expr::col(games::Column::Version).add(1))
        .filter(games::Column::Id.eq(id))
        .filter(games::Column::Version.eq(expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let game = games::Entity::find_by_id(id).one(conn).await?;
        if let Some(game) = game {
            let payload = format!(
                "OPTIMISTIC_LOCK:{{\"expected\":{},\"actual\":{}}}",
                expected_version, game.version
            );
            return Err(sea_orm::DbErr::Custom(payload));
        } else {
            return Err(sea_orm::DbErr::RecordNotFound("Game not found".to_string()));
        }
    }

    games::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Game not found".to_string()))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id).one(conn).await
}

/// Reads the game row for update.
///
/// On Postgres this takes a row lock (`SELECT ... FOR UPDATE`) held until the
/// surrounding transaction ends. SQLite has no row locks; writers there are
/// serialized by the connection pool and the in-process game locks.
pub async fn lock_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    let mut query = games::Entity::find_by_id(game_id);
    if conn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.one(conn).await
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let game_active = games::ActiveModel {
        id: NotSet,
        player1_id: Set(dto.player1_id),
        player2_id: Set(dto.player2_id),
        status: Set(GameStatus::Waiting),
        current_turn: Set(None),
        offensive_player_id: Set(None),
        defensive_player_id: Set(None),
        turn_phase: Set(None),
        round_number: Set(0),
        player1_letters: Set(String::new()),
        player2_letters: Set(String::new()),
        winner_id: Set(None),
        vote_deadline: Set(None),
        player1_dispute_used: Set(false),
        player2_dispute_used: Set(false),
        processed_idempotency_keys: Set("[]".to_string()),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        started_at: Set(None),
        completed_at: Set(None),
    };

    game_active.insert(conn).await
}

pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameUpdate,
) -> Result<games::Model, sea_orm::DbErr> {
    let changes = games::ActiveModel {
        status: Set(dto.status),
        current_turn: Set(dto.current_turn),
        offensive_player_id: Set(dto.offensive_player_id),
        defensive_player_id: Set(dto.defensive_player_id),
        turn_phase: Set(dto.turn_phase),
        round_number: Set(dto.round_number),
        player1_letters: Set(dto.player1_letters),
        player2_letters: Set(dto.player2_letters),
        winner_id: Set(dto.winner_id),
        vote_deadline: Set(dto.vote_deadline),
        player1_dispute_used: Set(dto.player1_dispute_used),
        player2_dispute_used: Set(dto.player2_dispute_used),
        processed_idempotency_keys: Set(dto.processed_idempotency_keys),
        started_at: Set(dto.started_at),
        completed_at: Set(dto.completed_at),
        ..Default::default()
    };

    optimistic_update_then_fetch(conn, dto.id, dto.expected_version, |update| {
        update.set(changes)
    })
    .await
}

/// Active games currently in the judging phase, with their deadlines.
///
/// Deadline comparison happens in the caller so timestamp encoding
/// differences between backends never affect which games are selected.
pub async fn find_judging<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<(i64, Option<time::OffsetDateTime>)>, sea_orm::DbErr> {
    games::Entity::find()
        .select_only()
        .column(games::Column::Id)
        .column(games::Column::VoteDeadline)
        .filter(games::Column::Status.eq(GameStatus::Active))
        .filter(games::Column::TurnPhase.eq(TurnPhase::Judging))
        .into_tuple::<(i64, Option<time::OffsetDateTime>)>()
        .all(conn)
        .await
}
