//! Per-player penalty counts from resolved disputes.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::reputation_sea as reputation_adapter;
use crate::errors::domain::DomainError;

/// Adds a penalty and returns the player's new total.
pub async fn add_penalty(txn: &DatabaseTransaction, player_id: i64) -> Result<i32, DomainError> {
    let record = reputation_adapter::increment_penalty(txn, player_id).await?;
    Ok(record.penalty_count)
}

/// Total penalties for a player; zero for players never penalized.
pub async fn penalty_count<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<i32, DomainError> {
    Ok(reputation_adapter::find_by_player(conn, player_id)
        .await?
        .map(|r| r.penalty_count)
        .unwrap_or(0))
}
