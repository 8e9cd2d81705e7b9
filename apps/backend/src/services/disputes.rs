//! One-time appeals against a `missed` ruling.
//!
//! A player may dispute the judgment of their own match attempt once per
//! game. The judge who made the call resolves it; whoever is found at fault
//! takes a permanent reputation penalty.

use sea_orm::DatabaseTransaction;
use time::OffsetDateTime;
use tracing::info;

use crate::config::game::GameConfig;
use crate::domain::idempotency::CommandAction;
use crate::entities::game_moves::{TrickResult, Vote};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::realtime::GameEvent;
use crate::repos::{disputes, games, moves, reputation};
use crate::services::game_flow::{
    remember, replay, require_active, require_participant, GameFlowOutcome,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct DisputeService {
    config: GameConfig,
}

impl DisputeService {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub async fn file_dispute(
        &self,
        txn: &DatabaseTransaction,
        game_id: i64,
        player_id: i64,
        turn_id: i64,
        idempotency_key: Option<&str>,
    ) -> Result<GameFlowOutcome, AppError> {
        let mut session = games::lock_game(txn, game_id).await?;

        require_participant(&session, player_id)?;
        if let Some(outcome) = replay(&session, idempotency_key, CommandAction::FileDispute)? {
            return Ok(outcome);
        }
        require_active(&session)?;

        let seat = session
            .seat_of(player_id)
            .ok_or_else(|| DomainError::forbidden("player is not seated"))?;
        if session.dispute_used(seat) {
            return Err(DomainError::conflict(
                ConflictKind::DisputeAlreadyUsed,
                format!("Player {player_id} has already used their dispute in game {game_id}"),
            )
            .into());
        }

        let mv = moves::require_move_in_game(txn, game_id, turn_id).await?;
        if mv.player_id != player_id {
            return Err(DomainError::forbidden("Only the player who attempted the trick may dispute it").into());
        }
        let judge = match (mv.result, mv.judged_by) {
            (TrickResult::Missed, Some(judge)) => judge,
            _ => {
                return Err(DomainError::invalid_state(format!(
                    "Move {turn_id} was not judged as missed"
                ))
                .into())
            }
        };

        session.mark_dispute_used(seat);
        let dispute = disputes::file_dispute(txn, game_id, turn_id, player_id, judge).await?;
        remember(
            &mut session,
            idempotency_key,
            CommandAction::FileDispute,
            Some(turn_id),
            Some(dispute.id),
        );
        let saved = games::save_session(txn, &session).await?;

        info!(game_id, player_id, move_id = turn_id, dispute_id = dispute.id, "dispute filed");
        let events = vec![GameEvent::Paused {
            game_id,
            dispute_id: dispute.id,
            disputed_by: player_id,
        }];
        Ok(GameFlowOutcome::applied(saved, events)
            .with_move(turn_id)
            .with_dispute(dispute.id))
    }

    /// The original judge rules on a dispute.
    ///
    /// `landed` overturns the call: the disputer loses their latest letter and
    /// takes the attack from a fresh set, and the judge is penalised.
    /// `missed` upholds it and penalises the disputer.
    pub async fn resolve_dispute(
        &self,
        txn: &DatabaseTransaction,
        game_id: i64,
        judge_id: i64,
        dispute_id: i64,
        final_result: Vote,
        idempotency_key: Option<&str>,
    ) -> Result<GameFlowOutcome, AppError> {
        let dispute = disputes::lock_dispute(txn, dispute_id).await?;
        if dispute.game_id != game_id {
            return Err(DomainError::not_found(
                NotFoundKind::Dispute,
                format!("Dispute {dispute_id} not found in game {game_id}"),
            )
            .into());
        }
        let mut session = games::lock_game(txn, game_id).await?;

        require_participant(&session, judge_id)?;
        if let Some(outcome) = replay(&session, idempotency_key, CommandAction::ResolveDispute)? {
            return Ok(outcome);
        }
        if dispute.is_resolved() {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyResolved,
                format!("Dispute {dispute_id} is already resolved"),
            )
            .into());
        }
        if judge_id != dispute.against_player_id {
            return Err(DomainError::forbidden("Only the original judge may resolve this dispute").into());
        }
        require_active(&session)?;

        let now = OffsetDateTime::now_utc();
        let penalty_target = match final_result {
            Vote::Landed => dispute.against_player_id,
            Vote::Missed => dispute.disputed_by,
        };
        let penalties = reputation::add_penalty(txn, penalty_target).await?;

        let mut events = Vec::new();
        if final_result == Vote::Landed {
            let deadline = self.config.turn_deadline_from(now);
            if let Some(removed) = session.reverse_missed_call(dispute.disputed_by, deadline)? {
                events.push(GameEvent::letter(game_id, &removed));
            }
            moves::overturn_to_landed(txn, dispute.turn_id).await?;
        }
        disputes::record_verdict(txn, dispute_id, final_result, judge_id, penalty_target, now).await?;

        remember(
            &mut session,
            idempotency_key,
            CommandAction::ResolveDispute,
            Some(dispute.turn_id),
            Some(dispute_id),
        );
        let saved = games::save_session(txn, &session).await?;

        info!(
            game_id,
            dispute_id,
            judge_id,
            final_result = ?final_result,
            penalty_player_id = penalty_target,
            penalty_count = penalties,
            "dispute resolved"
        );
        events.push(GameEvent::Resumed {
            game_id,
            dispute_id,
            final_result,
        });
        if final_result == Vote::Landed {
            events.push(GameEvent::turn(&saved));
        }
        Ok(GameFlowOutcome::applied(saved, events)
            .with_move(dispute.turn_id)
            .with_dispute(dispute_id))
    }
}
