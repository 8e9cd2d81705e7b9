//! What one sweep does to due and not-yet-due games.

use std::time::Duration;

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use skate_backend::config::game::GameConfig;
use skate_backend::db::txn::with_txn;
use skate_backend::entities::game_moves::{TrickResult, Vote};
use skate_backend::entities::games::{self, TurnPhase};
use skate_backend::error::AppError;
use skate_backend::errors::ErrorCode;
use skate_backend::services::game_flow::GameFlowService;
use skate_backend::services::games::GameService;
use skate_backend::services::timeouts::{JudgingTimeoutScheduler, SweepReport};
use time::OffsetDateTime;

use crate::support::game_setup::{
    file_dispute, open_judging, play_missed_round, resolve_dispute, run, set_trick, started_game,
    vote, P1, P2,
};
use crate::support::test_state::{
    build_state_with_config, build_test_state, expired_vote_config, test_game_config,
};

#[tokio::test]
async fn expired_judging_resolves_as_landed_without_votes() -> Result<(), AppError> {
    let state = build_state_with_config(expired_vote_config()).await?;
    let game_id = started_game(&state).await?;
    let move_id = open_judging(&state, game_id).await?;

    let scheduler = JudgingTimeoutScheduler::new(state.clone());
    let report = scheduler.force_run().await;
    assert_eq!(report.scanned, 1);
    assert_eq!(report.resolved, 1);
    assert_eq!(report.failed, 0);

    let view = GameService::get_game(&state, game_id).await?;
    assert_eq!(view.turn_phase, Some(TurnPhase::AttackerRecording));
    assert_eq!(view.offensive_player_id, Some(P2));
    assert_eq!(view.defensive_player_id, Some(P1));
    assert_eq!(view.current_turn, Some(P2));
    assert_eq!(view.round_number, 2);
    assert_eq!(view.player2_letters.as_str(), "");
    assert!(view.vote_deadline.is_none());

    let moves = GameService::list_moves(&state, game_id).await?;
    let matched = moves.iter().find(|m| m.id == move_id).expect("match move");
    assert_eq!(matched.result, TrickResult::Landed);
    assert!(matched.timed_out);
    assert_eq!(matched.auto_resolved, Some(Vote::Landed));
    assert_eq!(matched.judged_by, None);
    Ok(())
}

#[tokio::test]
async fn a_lone_missed_vote_does_not_survive_the_timeout() -> Result<(), AppError> {
    let state = build_state_with_config(expired_vote_config()).await?;
    let game_id = started_game(&state).await?;
    let move_id = open_judging(&state, game_id).await?;
    run(&state, P1, game_id, vote(move_id, Vote::Missed)).await?;

    let report = JudgingTimeoutScheduler::new(state.clone()).force_run().await;
    assert_eq!(report.resolved, 1);

    let view = GameService::get_game(&state, game_id).await?;
    assert_eq!(view.player2_letters.as_str(), "");
    assert_eq!(view.offensive_player_id, Some(P2));

    // The late vote finds the attempt already judged.
    let err = run(&state, P2, game_id, vote(move_id, Vote::Missed)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyResolved);
    Ok(())
}

#[tokio::test]
async fn games_within_their_window_are_left_alone() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = started_game(&state).await?;
    open_judging(&state, game_id).await?;

    let report = JudgingTimeoutScheduler::new(state.clone()).force_run().await;
    assert_eq!(report, SweepReport::default());
    assert_eq!(
        GameService::get_game(&state, game_id).await?.turn_phase,
        Some(TurnPhase::Judging)
    );
    Ok(())
}

#[tokio::test]
async fn set_trick_deadline_after_a_reversal_is_not_swept() -> Result<(), AppError> {
    let config = GameConfig {
        turn_window: Duration::ZERO,
        ..test_game_config()
    };
    let state = build_state_with_config(config).await?;
    let game_id = started_game(&state).await?;
    let (move_id, _) = play_missed_round(&state, game_id).await?;
    let dispute_id = run(&state, P2, game_id, file_dispute(move_id))
        .await?
        .dispute_id
        .expect("dispute id");
    let reversed = run(&state, P1, game_id, resolve_dispute(dispute_id, Vote::Landed)).await?;
    assert_eq!(reversed.game.turn_phase, Some(TurnPhase::SetTrick));
    assert!(reversed.game.vote_deadline.is_some());

    let report = JudgingTimeoutScheduler::new(state.clone()).force_run().await;
    assert_eq!(report, SweepReport::default());

    let view = GameService::get_game(&state, game_id).await?;
    assert_eq!(view.turn_phase, Some(TurnPhase::SetTrick));
    assert_eq!(view.version, reversed.game.version);
    assert_eq!(view.player2_letters.as_str(), "");

    // The disputer still sets the next trick.
    run(&state, P2, game_id, set_trick("clips/comeback.mp4")).await?;
    Ok(())
}

#[tokio::test]
async fn games_no_longer_due_are_skipped_once_locked() -> Result<(), AppError> {
    let state = build_state_with_config(expired_vote_config()).await?;
    let game_id = started_game(&state).await?;
    let move_id = open_judging(&state, game_id).await?;
    run(&state, P1, game_id, vote(move_id, Vote::Landed)).await?;
    run(&state, P2, game_id, vote(move_id, Vote::Landed)).await?;

    let flow = GameFlowService::new(state.game_config);
    let now = OffsetDateTime::now_utc();
    let outcome = with_txn(&state, move |txn| {
        Box::pin(async move { flow.resolve_expired_judgment(txn, game_id, now).await })
    })
    .await?;
    assert!(outcome.is_none());

    let report = JudgingTimeoutScheduler::new(state.clone()).force_run().await;
    assert_eq!(report.scanned, 0);
    Ok(())
}

#[tokio::test]
async fn one_broken_game_does_not_stop_the_sweep() -> Result<(), AppError> {
    let state = build_state_with_config(expired_vote_config()).await?;
    let broken = started_game(&state).await?;
    let healthy = started_game(&state).await?;
    open_judging(&state, broken).await?;
    open_judging(&state, healthy).await?;

    games::Entity::update_many()
        .col_expr(
            games::Column::ProcessedIdempotencyKeys,
            Expr::val("{not a ledger").into(),
        )
        .filter(games::Column::Id.eq(broken))
        .exec(&state.db)
        .await?;

    let report = JudgingTimeoutScheduler::new(state.clone()).force_run().await;
    assert_eq!(report.scanned, 2);
    assert_eq!(report.resolved, 1);
    assert_eq!(report.failed, 1);

    let view = GameService::get_game(&state, healthy).await?;
    assert_eq!(view.round_number, 2);
    Ok(())
}

#[tokio::test]
async fn overlapping_sweeps_are_skipped() -> Result<(), AppError> {
    let state = build_state_with_config(expired_vote_config()).await?;
    let game_id = started_game(&state).await?;
    open_judging(&state, game_id).await?;

    let scheduler = JudgingTimeoutScheduler::new(state.clone());
    let (first, second) = tokio::join!(scheduler.force_run(), scheduler.force_run());

    assert!(!first.overlapped);
    assert!(second.overlapped);
    assert_eq!(second, SweepReport::skipped_overlap());
    assert_eq!(first.resolved, 1);

    // The guard is released afterwards.
    let third = scheduler.force_run().await;
    assert!(!third.overlapped);
    assert_eq!(third.scanned, 0);
    Ok(())
}
