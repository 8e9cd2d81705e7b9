//! Broken delivery never affects the command result.

use std::sync::Arc;
use std::time::Duration;

use skate_backend::entities::games::GameStatus;
use skate_backend::error::AppError;

use crate::support::game_setup::{forfeit, game, join, propose, run, P1, P2};
use crate::support::recording::{FailingBroadcaster, RecordingNotifier};
use crate::support::test_state::test_state_builder;

#[tokio::test]
async fn failing_broadcaster_does_not_fail_the_command() -> Result<(), AppError> {
    let state = test_state_builder()?
        .with_broadcaster(Arc::new(FailingBroadcaster))
        .build()
        .await?;
    let game_id = propose(&state).await?;

    let reply = run(&state, P2, game_id, join()).await?;
    assert_eq!(reply.game.status, GameStatus::Active);
    assert_eq!(game(&state, game_id).await?.status, GameStatus::Active);
    Ok(())
}

#[tokio::test]
async fn failing_notifier_does_not_fail_the_command() -> Result<(), AppError> {
    let notifier = RecordingNotifier::failing();
    let state = test_state_builder()?
        .with_broadcaster(Arc::new(FailingBroadcaster))
        .with_notifier(notifier.clone())
        .build()
        .await?;
    let game_id = propose(&state).await?;
    run(&state, P2, game_id, join()).await?;

    let reply = run(&state, P1, game_id, forfeit()).await?;
    assert_eq!(reply.game.status, GameStatus::Abandoned);

    tokio::time::timeout(Duration::from_secs(2), notifier.notify.notified())
        .await
        .expect("notifier was invoked");
    assert_eq!(game(&state, game_id).await?.winner_id, Some(P2));
    Ok(())
}
