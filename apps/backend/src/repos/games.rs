//! Game repository functions for domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::OffsetDateTime;

use crate::adapters::games_sea as games_adapter;
use crate::domain::idempotency::IdempotencyLedger;
use crate::domain::session::GameSession;
use crate::entities::games;
use crate::errors::domain::{DomainError, NotFoundKind};

impl TryFrom<games::Model> for GameSession {
    type Error = DomainError;

    fn try_from(model: games::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            player1_id: model.player1_id,
            player2_id: model.player2_id,
            status: model.status,
            current_turn: model.current_turn,
            offensive_player_id: model.offensive_player_id,
            defensive_player_id: model.defensive_player_id,
            turn_phase: model.turn_phase,
            round_number: model.round_number,
            player1_letters: model.player1_letters.parse()?,
            player2_letters: model.player2_letters.parse()?,
            winner_id: model.winner_id,
            vote_deadline: model.vote_deadline,
            player1_dispute_used: model.player1_dispute_used,
            player2_dispute_used: model.player2_dispute_used,
            ledger: IdempotencyLedger::from_json(&model.processed_idempotency_keys)?,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
            started_at: model.started_at,
            completed_at: model.completed_at,
        })
    }
}

fn game_not_found(game_id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<GameSession>, DomainError> {
    games_adapter::find_by_id(conn, game_id)
        .await?
        .map(GameSession::try_from)
        .transpose()
}

/// Find game by ID or return a `NotFound` domain error.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<GameSession, DomainError> {
    find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| game_not_found(game_id))
}

/// Loads the game for mutation inside `txn` (row-locked on Postgres).
pub async fn lock_game(txn: &DatabaseTransaction, game_id: i64) -> Result<GameSession, DomainError> {
    games_adapter::lock_by_id(txn, game_id)
        .await?
        .ok_or_else(|| game_not_found(game_id))
        .and_then(GameSession::try_from)
}

pub async fn create_game(
    txn: &DatabaseTransaction,
    player1_id: i64,
    player2_id: i64,
) -> Result<GameSession, DomainError> {
    let game = games_adapter::create_game(txn, games_adapter::GameCreate::new(player1_id, player2_id)).await?;
    GameSession::try_from(game)
}

/// Persists every mutable field of `session`, conditional on its version.
///
/// Returns the stored session with the bumped version; a concurrent writer
/// surfaces as `ConflictKind::OptimisticLock`.
pub async fn save_session(
    txn: &DatabaseTransaction,
    session: &GameSession,
) -> Result<GameSession, DomainError> {
    let dto = games_adapter::GameUpdate {
        id: session.id,
        expected_version: session.version,
        status: session.status,
        current_turn: session.current_turn,
        offensive_player_id: session.offensive_player_id,
        defensive_player_id: session.defensive_player_id,
        turn_phase: session.turn_phase,
        round_number: session.round_number,
        player1_letters: session.player1_letters.as_str().to_string(),
        player2_letters: session.player2_letters.as_str().to_string(),
        winner_id: session.winner_id,
        vote_deadline: session.vote_deadline,
        player1_dispute_used: session.player1_dispute_used,
        player2_dispute_used: session.player2_dispute_used,
        processed_idempotency_keys: session.ledger.to_json()?,
        started_at: session.started_at,
        completed_at: session.completed_at,
    };
    let updated = games_adapter::update_game(txn, dto).await?;
    GameSession::try_from(updated)
}

/// Ids of active games whose judging deadline is at or before `now`.
pub async fn find_expired_judgments<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    now: OffsetDateTime,
) -> Result<Vec<i64>, DomainError> {
    let rows = games_adapter::find_judging(conn).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(id, deadline)| match deadline {
            Some(deadline) if deadline <= now => Some(id),
            _ => None,
        })
        .collect())
}
