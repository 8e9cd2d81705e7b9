//! Read-side queries and game creation.

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::protocol::commands::ProposeGame;
use crate::protocol::views::{DisputeView, GameView, MoveView};
use crate::repos::{disputes, games, moves, reputation};
use crate::services::game_flow::GameFlowService;
use crate::state::app_state::AppState;

pub struct GameService;

impl GameService {
    /// Creates a proposal on behalf of `caller_id`, who must be the challenger.
    pub async fn propose(
        state: &AppState,
        caller_id: i64,
        proposal: ProposeGame,
    ) -> Result<GameView, AppError> {
        if proposal.player1_id != caller_id {
            return Err(DomainError::forbidden("Games can only be proposed by their first player").into());
        }
        let flow = GameFlowService::new(state.game_config);
        let game = with_txn(state, move |txn| {
            Box::pin(async move {
                flow.propose_game(txn, proposal.player1_id, proposal.player2_id)
                    .await
            })
        })
        .await?;
        Ok(GameView::from(&game))
    }

    pub async fn get_game(state: &AppState, game_id: i64) -> Result<GameView, AppError> {
        let game = games::require_game(&state.db, game_id).await?;
        Ok(GameView::from(&game))
    }

    /// Every recorded attempt of a game, oldest first.
    pub async fn list_moves(state: &AppState, game_id: i64) -> Result<Vec<MoveView>, AppError> {
        games::require_game(&state.db, game_id).await?;
        let moves = moves::list_for_game(&state.db, game_id).await?;
        Ok(moves.into_iter().map(MoveView::from).collect())
    }

    pub async fn get_dispute(
        state: &AppState,
        game_id: i64,
        dispute_id: i64,
    ) -> Result<DisputeView, AppError> {
        let dispute = disputes::require_dispute(&state.db, dispute_id).await?;
        if dispute.game_id != game_id {
            return Err(DomainError::not_found(
                NotFoundKind::Dispute,
                format!("Dispute {dispute_id} not found in game {game_id}"),
            )
            .into());
        }
        Ok(DisputeView::from(dispute))
    }

    pub async fn penalty_count(state: &AppState, player_id: i64) -> Result<i32, AppError> {
        Ok(reputation::penalty_count(&state.db, player_id).await?)
    }
}
