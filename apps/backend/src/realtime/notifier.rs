//! Out-of-band notifications for finished games.

use async_trait::async_trait;
use tracing::info;

use crate::domain::session::GameSession;
use crate::error::AppError;

/// Runs after a game reaches a terminal state; spawned so it never delays the
/// command that finished the game.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn game_ended(&self, game: &GameSession) -> Result<(), AppError>;
}

/// Default notifier: records the result in the structured log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn game_ended(&self, game: &GameSession) -> Result<(), AppError> {
        info!(
            game_id = game.id,
            status = ?game.status,
            winner_id = ?game.winner_id,
            rounds = game.round_number,
            player1_letters = %game.player1_letters,
            player2_letters = %game.player2_letters,
            "game finished"
        );
        Ok(())
    }
}
