use sea_orm::DatabaseTransaction;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::{remember, replay, require_active, require_participant, GameFlowOutcome, GameFlowService};
use crate::domain::idempotency::CommandAction;
use crate::entities::game_moves::MoveType;
use crate::entities::games::TurnPhase;
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::realtime::GameEvent;
use crate::repos::{games, moves};

/// A recorded attempt: the attacker's set or the defender's match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrickSubmission {
    pub is_set_trick: bool,
    pub clip_ref: String,
    pub trick_name: Option<String>,
}

impl GameFlowService {
    /// Records a set (attacker) or match (defender) attempt for the current round.
    ///
    /// A set hands the turn to the defender; a match opens judging until the
    /// vote deadline.
    pub async fn submit_trick(
        &self,
        txn: &DatabaseTransaction,
        game_id: i64,
        caller_id: i64,
        submission: TrickSubmission,
        idempotency_key: Option<&str>,
    ) -> Result<GameFlowOutcome, AppError> {
        let mut session = games::lock_game(txn, game_id).await?;

        require_participant(&session, caller_id)?;
        if let Some(outcome) = replay(&session, idempotency_key, CommandAction::SubmitTrick)? {
            return Ok(outcome);
        }
        require_active(&session)?;
        if session.current_turn != Some(caller_id) {
            return Err(DomainError::forbidden(format!(
                "It is not player {caller_id}'s turn"
            ))
            .into());
        }

        let move_type = if submission.is_set_trick {
            if session.offensive_player_id != Some(caller_id) {
                return Err(DomainError::forbidden("Only the attacker sets a trick").into());
            }
            if !matches!(
                session.turn_phase,
                Some(TurnPhase::AttackerRecording | TurnPhase::SetTrick)
            ) {
                return Err(DomainError::invalid_state(format!(
                    "Cannot set a trick during {:?}",
                    session.turn_phase
                ))
                .into());
            }
            MoveType::Set
        } else {
            if session.defensive_player_id != Some(caller_id) {
                return Err(DomainError::forbidden("Only the defender matches a trick").into());
            }
            if session.turn_phase != Some(TurnPhase::DefenderRecording) {
                return Err(DomainError::invalid_state(format!(
                    "Cannot match a trick during {:?}",
                    session.turn_phase
                ))
                .into());
            }
            MoveType::Match
        };

        let mv = moves::create_move(
            txn,
            moves::new_move(
                game_id,
                session.round_number,
                caller_id,
                move_type,
                submission.trick_name,
                submission.clip_ref,
            ),
        )
        .await?;

        match move_type {
            MoveType::Set => session.record_set(),
            MoveType::Match => {
                let deadline = self.config().vote_deadline_from(OffsetDateTime::now_utc());
                session.record_match(deadline);
                debug!(game_id, move_id = mv.id, deadline = %deadline, "judging opened");
            }
        }
        remember(
            &mut session,
            idempotency_key,
            CommandAction::SubmitTrick,
            Some(mv.id),
            None,
        );
        let saved = games::save_session(txn, &session).await?;

        info!(
            game_id,
            player_id = caller_id,
            round = saved.round_number,
            move_id = mv.id,
            move_type = ?move_type,
            "trick submitted"
        );
        let events = vec![GameEvent::turn(&saved)];
        Ok(GameFlowOutcome::applied(saved, events).with_move(mv.id))
    }
}
