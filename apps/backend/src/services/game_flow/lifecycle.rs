use sea_orm::DatabaseTransaction;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::{remember, replay, require_active, require_participant, GameFlowOutcome, GameFlowService};
use crate::domain::idempotency::CommandAction;
use crate::domain::session::GameSession;
use crate::entities::games::GameStatus;
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::realtime::GameEvent;
use crate::repos::games;

impl GameFlowService {
    /// Creates a `waiting` game in which `player1_id` challenges `player2_id`.
    pub async fn propose_game(
        &self,
        txn: &DatabaseTransaction,
        player1_id: i64,
        player2_id: i64,
    ) -> Result<GameSession, AppError> {
        if player1_id <= 0 || player2_id <= 0 {
            return Err(DomainError::invalid_command("player ids must be positive").into());
        }
        if player1_id == player2_id {
            return Err(DomainError::invalid_command("a player cannot challenge themselves").into());
        }

        let game = games::create_game(txn, player1_id, player2_id).await?;
        info!(game_id = game.id, player1_id, player2_id, "game proposed");
        Ok(game)
    }

    /// The invited player accepts; the challenger attacks first.
    ///
    /// Joining a game the caller has already joined is a no-op reported as a
    /// duplicate.
    pub async fn join_game(
        &self,
        txn: &DatabaseTransaction,
        game_id: i64,
        caller_id: i64,
        idempotency_key: Option<&str>,
    ) -> Result<GameFlowOutcome, AppError> {
        let mut session = games::lock_game(txn, game_id).await?;

        if caller_id != session.player2_id {
            return Err(DomainError::forbidden(format!(
                "Only the invited player may join game {game_id}"
            ))
            .into());
        }
        if let Some(outcome) = replay(&session, idempotency_key, CommandAction::Join)? {
            return Ok(outcome);
        }
        if session.status == GameStatus::Active {
            debug!(game_id, caller_id, "join on active game treated as duplicate");
            return Ok(GameFlowOutcome::duplicate(session));
        }
        if session.status != GameStatus::Waiting {
            return Err(DomainError::invalid_state(format!(
                "Game {game_id} can no longer be joined"
            ))
            .into());
        }

        session.start(OffsetDateTime::now_utc());
        remember(&mut session, idempotency_key, CommandAction::Join, None, None);
        let saved = games::save_session(txn, &session).await?;

        info!(game_id, player_id = caller_id, "game started");
        let events = vec![GameEvent::turn(&saved)];
        Ok(GameFlowOutcome::applied(saved, events))
    }

    /// Ends the game in the opponent's favour. `abandon` is the same command.
    ///
    /// Forfeiting a game that is already over is a no-op reported as a
    /// duplicate.
    pub async fn forfeit_game(
        &self,
        txn: &DatabaseTransaction,
        game_id: i64,
        caller_id: i64,
        idempotency_key: Option<&str>,
    ) -> Result<GameFlowOutcome, AppError> {
        let mut session = games::lock_game(txn, game_id).await?;

        require_participant(&session, caller_id)?;
        if let Some(outcome) = replay(&session, idempotency_key, CommandAction::Forfeit)? {
            return Ok(outcome);
        }
        if session.is_finished() {
            debug!(game_id, caller_id, "forfeit on finished game treated as duplicate");
            return Ok(GameFlowOutcome::duplicate(session));
        }
        require_active(&session)?;

        let winner_id = session
            .forfeit(caller_id, OffsetDateTime::now_utc())
            .ok_or_else(|| DomainError::forbidden("forfeiting player is not seated"))?;
        remember(&mut session, idempotency_key, CommandAction::Forfeit, None, None);
        let saved = games::save_session(txn, &session).await?;

        info!(game_id, player_id = caller_id, winner_id, "game forfeited");
        let events = vec![GameEvent::ended(&saved)];
        Ok(GameFlowOutcome::applied(saved, events))
    }
}
