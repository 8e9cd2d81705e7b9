//! start / stop of the background loop.

use std::time::Duration;

use skate_backend::entities::games::TurnPhase;
use skate_backend::error::AppError;
use skate_backend::services::games::GameService;
use skate_backend::services::timeouts::JudgingTimeoutScheduler;

use crate::support::game_setup::{open_judging, started_game};
use crate::support::test_state::{build_state_with_config, build_test_state, expired_vote_config};

#[tokio::test]
async fn start_and_stop_are_idempotent() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let scheduler = JudgingTimeoutScheduler::with_interval(state, Duration::from_millis(100));

    assert!(!scheduler.is_started());
    assert!(scheduler.start());
    assert!(!scheduler.start());
    assert!(scheduler.is_started());

    scheduler.stop().await;
    assert!(!scheduler.is_started());
    scheduler.stop().await;

    // It can be started again after stopping.
    assert!(scheduler.start());
    scheduler.stop().await;
    Ok(())
}

#[tokio::test]
async fn interval_uses_the_game_config() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let expected = state.game_config.sweep_interval;
    assert_eq!(JudgingTimeoutScheduler::new(state).interval(), expected);
    Ok(())
}

#[tokio::test]
async fn running_scheduler_unblocks_stalled_judging() -> Result<(), AppError> {
    let state = build_state_with_config(expired_vote_config()).await?;
    let game_id = started_game(&state).await?;
    open_judging(&state, game_id).await?;

    let scheduler = JudgingTimeoutScheduler::with_interval(state.clone(), Duration::from_millis(50));
    scheduler.start();

    let mut phase = Some(TurnPhase::Judging);
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        phase = GameService::get_game(&state, game_id).await?.turn_phase;
        if phase != Some(TurnPhase::Judging) {
            break;
        }
    }
    scheduler.stop().await;

    assert_eq!(phase, Some(TurnPhase::AttackerRecording));
    Ok(())
}
