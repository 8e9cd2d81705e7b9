//! Entry point for mutating game commands.

use tracing::{debug, info_span, Instrument};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::protocol::commands::GameCommand;
use crate::protocol::views::CommandReply;
use crate::services::disputes::DisputeService;
use crate::services::game_flow::{GameFlowOutcome, GameFlowService, TrickSubmission};
use crate::services::publish::publish_outcome;
use crate::state::app_state::AppState;

pub struct CommandService;

impl CommandService {
    /// Applies `command` from `caller_id` to `game_id`.
    ///
    /// Commands for one game are serialised by the game's advisory lock and
    /// each runs in its own transaction. Events go out only after commit.
    pub async fn execute(
        state: &AppState,
        caller_id: i64,
        game_id: i64,
        command: GameCommand,
    ) -> Result<CommandReply, AppError> {
        command.validate()?;
        let action = command.action();
        let span = info_span!("game_command", game_id, player_id = caller_id, action = ?action);

        async move {
            let outcome = {
                let _guard = state.locks.acquire(game_id).await;
                Self::apply(state, caller_id, game_id, command).await?
            };
            debug!(duplicate = outcome.duplicate, events = outcome.events.len(), "command committed");

            publish_outcome(state, &outcome).await;
            Ok(outcome.reply())
        }
        .instrument(span)
        .await
    }

    async fn apply(
        state: &AppState,
        caller_id: i64,
        game_id: i64,
        command: GameCommand,
    ) -> Result<GameFlowOutcome, AppError> {
        let flow = GameFlowService::new(state.game_config);
        let disputes = DisputeService::new(state.game_config);

        with_txn(state, move |txn| {
            Box::pin(async move {
                match command {
                    GameCommand::Join { idempotency_key } => {
                        flow.join_game(txn, game_id, caller_id, idempotency_key.as_deref())
                            .await
                    }
                    GameCommand::SubmitTrick {
                        is_set_trick,
                        clip_ref,
                        trick_name,
                        idempotency_key,
                    } => {
                        let submission = TrickSubmission {
                            is_set_trick,
                            clip_ref,
                            trick_name,
                        };
                        flow.submit_trick(
                            txn,
                            game_id,
                            caller_id,
                            submission,
                            idempotency_key.as_deref(),
                        )
                        .await
                    }
                    GameCommand::CastVote {
                        turn_id,
                        vote,
                        idempotency_key,
                    } => {
                        flow.cast_vote(
                            txn,
                            game_id,
                            caller_id,
                            turn_id,
                            vote,
                            idempotency_key.as_deref(),
                        )
                        .await
                    }
                    GameCommand::Forfeit { idempotency_key } => {
                        flow.forfeit_game(txn, game_id, caller_id, idempotency_key.as_deref())
                            .await
                    }
                    GameCommand::FileDispute {
                        turn_id,
                        idempotency_key,
                    } => {
                        disputes
                            .file_dispute(
                                txn,
                                game_id,
                                caller_id,
                                turn_id,
                                idempotency_key.as_deref(),
                            )
                            .await
                    }
                    GameCommand::ResolveDispute {
                        dispute_id,
                        final_result,
                        idempotency_key,
                    } => {
                        disputes
                            .resolve_dispute(
                                txn,
                                game_id,
                                caller_id,
                                dispute_id,
                                final_result,
                                idempotency_key.as_deref(),
                            )
                            .await
                    }
                }
            })
        })
        .await
    }
}
