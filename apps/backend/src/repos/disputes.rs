//! Dispute records.

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::OffsetDateTime;

use crate::adapters::disputes_sea as disputes_adapter;
use crate::entities::game_moves::Vote;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

pub use crate::entities::game_disputes::Model as Dispute;

impl Dispute {
    pub fn is_resolved(&self) -> bool {
        self.final_result.is_some()
    }
}

fn dispute_not_found(dispute_id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::Dispute, format!("Dispute {dispute_id} not found"))
}

pub async fn require_dispute<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dispute_id: i64,
) -> Result<Dispute, DomainError> {
    disputes_adapter::find_by_id(conn, dispute_id)
        .await?
        .ok_or_else(|| dispute_not_found(dispute_id))
}

pub async fn lock_dispute(txn: &DatabaseTransaction, dispute_id: i64) -> Result<Dispute, DomainError> {
    disputes_adapter::lock_by_id(txn, dispute_id)
        .await?
        .ok_or_else(|| dispute_not_found(dispute_id))
}

pub async fn file_dispute(
    txn: &DatabaseTransaction,
    game_id: i64,
    turn_id: i64,
    disputed_by: i64,
    against_player_id: i64,
) -> Result<Dispute, DomainError> {
    Ok(disputes_adapter::create_dispute(
        txn,
        disputes_adapter::DisputeCreate {
            game_id,
            turn_id,
            disputed_by,
            against_player_id,
        },
    )
    .await?)
}

pub async fn record_verdict(
    txn: &DatabaseTransaction,
    dispute_id: i64,
    final_result: Vote,
    resolved_by: i64,
    penalty_applied_to: i64,
    resolved_at: OffsetDateTime,
) -> Result<(), DomainError> {
    let applied = disputes_adapter::resolve(
        txn,
        disputes_adapter::DisputeResolution {
            id: dispute_id,
            final_result,
            resolved_by,
            resolved_at,
            penalty_applied_to,
        },
    )
    .await?;
    if !applied {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyResolved,
            format!("Dispute {dispute_id} is already resolved"),
        ));
    }
    Ok(())
}
