use sea_orm::DatabaseTransaction;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::{
    remember, replay, require_active, require_participant, state_event, GameFlowOutcome,
    GameFlowService,
};
use crate::domain::idempotency::CommandAction;
use crate::domain::session::GameSession;
use crate::entities::game_moves::{MoveType, Vote};
use crate::entities::games::{GameStatus, TurnPhase};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};
use crate::realtime::GameEvent;
use crate::repos::games;
use crate::repos::moves::{self, GameMove};

impl GameFlowService {
    /// Records one player's judgment of the current match attempt.
    ///
    /// When the second vote arrives the round is resolved in the same
    /// transaction, so two concurrent votes can never both see a half-judged
    /// attempt.
    pub async fn cast_vote(
        &self,
        txn: &DatabaseTransaction,
        game_id: i64,
        voter_id: i64,
        turn_id: i64,
        vote: Vote,
        idempotency_key: Option<&str>,
    ) -> Result<GameFlowOutcome, AppError> {
        let mut session = games::lock_game(txn, game_id).await?;

        require_participant(&session, voter_id)?;
        if let Some(outcome) = replay(&session, idempotency_key, CommandAction::CastVote)? {
            return Ok(outcome);
        }
        require_active(&session)?;

        let mv = moves::require_move_in_game(txn, game_id, turn_id).await?;
        if mv.move_type != MoveType::Match {
            return Err(DomainError::invalid_state("Only match attempts are judged").into());
        }
        if !mv.is_pending() {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyResolved,
                format!("Move {turn_id} has already been judged"),
            )
            .into());
        }
        if session.turn_phase != Some(TurnPhase::Judging) || mv.round_number != session.round_number {
            return Err(DomainError::invalid_state(format!(
                "Move {turn_id} is not open for judging"
            ))
            .into());
        }

        let role = session
            .role_of(voter_id)
            .ok_or_else(|| DomainError::forbidden("Voter has no role this round"))?;
        let mut votes = mv.votes();
        votes.cast(role, vote)?;
        moves::save_votes(txn, mv.id, votes).await?;
        debug!(game_id, move_id = mv.id, player_id = voter_id, ?role, ?vote, "vote recorded");

        let final_result = votes.final_result();
        let mut events = match final_result {
            Some(result) => {
                let judge = session.offensive_player_id;
                self.conclude_round(txn, &mut session, &mv, result, judge, OffsetDateTime::now_utc())
                    .await?
            }
            None => Vec::new(),
        };

        remember(
            &mut session,
            idempotency_key,
            CommandAction::CastVote,
            Some(mv.id),
            None,
        );
        let saved = games::save_session(txn, &session).await?;
        if final_result.is_some() {
            events.push(state_event(&saved));
        }
        Ok(GameFlowOutcome::applied(saved, events).with_move(mv.id))
    }

    /// Resolves a judging phase whose vote deadline has passed as `landed`.
    ///
    /// Returns `None` when the game is no longer due, e.g. because the last
    /// vote or another sweep got there first.
    pub async fn resolve_expired_judgment(
        &self,
        txn: &DatabaseTransaction,
        game_id: i64,
        now: OffsetDateTime,
    ) -> Result<Option<GameFlowOutcome>, AppError> {
        let mut session = games::lock_game(txn, game_id).await?;

        let due = session.status == GameStatus::Active
            && session.turn_phase == Some(TurnPhase::Judging)
            && session.vote_deadline.is_some_and(|deadline| deadline <= now);
        if !due {
            debug!(game_id, "judging no longer due; skipping");
            return Ok(None);
        }

        let mv = moves::find_pending_match(txn, game_id, session.round_number)
            .await?
            .ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!(
                        "Game {game_id} is judging round {} without a pending match",
                        session.round_number
                    ),
                )
            })?;

        let mut events = self
            .conclude_round(txn, &mut session, &mv, Vote::Landed, None, now)
            .await?;
        let saved = games::save_session(txn, &session).await?;
        events.push(state_event(&saved));

        info!(game_id, move_id = mv.id, round = mv.round_number, "judging timed out; resolved as landed");
        Ok(Some(GameFlowOutcome::applied(saved, events).with_move(mv.id)))
    }

    /// Writes the final judgment to the attempt and advances the session.
    ///
    /// `judged_by` is `None` for timeouts. Returns the letter events; the
    /// caller adds the turn/ended event once the session is saved.
    async fn conclude_round(
        &self,
        txn: &DatabaseTransaction,
        session: &mut GameSession,
        mv: &GameMove,
        result: Vote,
        judged_by: Option<i64>,
        now: OffsetDateTime,
    ) -> Result<Vec<GameEvent>, AppError> {
        moves::record_round_result(txn, mv, result, judged_by).await?;
        let resolution = session.resolve_round(result, now)?;

        info!(
            game_id = session.id,
            round = mv.round_number,
            result = ?result,
            roles_swapped = resolution.roles_swapped,
            winner_id = ?resolution.winner_id,
            "round resolved"
        );

        Ok(resolution
            .letter
            .map(|letter| GameEvent::letter(session.id, &letter))
            .into_iter()
            .collect())
    }
}
