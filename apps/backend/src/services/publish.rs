//! Post-commit delivery of a command's events.

use std::sync::Arc;

use tracing::warn;

use crate::realtime::GameEvent;
use crate::services::game_flow::GameFlowOutcome;
use crate::state::app_state::AppState;

/// Publishes `outcome`'s events to the game's room and, for finished games,
/// spawns the notifier.
///
/// Must only be called after the transaction that produced `outcome` has
/// committed. Failures are logged and never reach the caller.
pub async fn publish_outcome(state: &AppState, outcome: &GameFlowOutcome) {
    if outcome.duplicate {
        return;
    }
    let game_id = outcome.game.id;

    for event in &outcome.events {
        if let Err(err) = state.broadcaster.publish(game_id, event.clone()).await {
            warn!(game_id, event = event.name(), error = %err, "failed to publish game event");
        }
    }

    if outcome.events.iter().any(GameEvent::is_terminal) {
        let notifier = Arc::clone(&state.notifier);
        let game = outcome.game.clone();
        tokio::spawn(async move {
            if let Err(err) = notifier.game_ended(&game).await {
                warn!(game_id = game.id, error = %err, "game-ended notification failed");
            }
        });
    }
}
