//! Set and match submissions.

use skate_backend::entities::game_moves::{MoveType, TrickResult};
use skate_backend::entities::games::TurnPhase;
use skate_backend::error::AppError;
use skate_backend::errors::ErrorCode;
use skate_backend::protocol::commands::GameCommand;
use skate_backend::services::games::GameService;
use time::OffsetDateTime;

use crate::support::game_setup::{
    game, match_trick, propose, run, set_trick, started_game, P1, P2, STRANGER,
};
use crate::support::test_state::build_test_state;

#[tokio::test]
async fn set_trick_hands_the_turn_to_the_defender() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = started_game(&state).await?;

    let reply = run(&state, P1, game_id, set_trick("clips/p1-set.mp4")).await?;
    let move_id = reply.move_id.expect("set returns its move id");
    assert_eq!(reply.game.turn_phase, Some(TurnPhase::DefenderRecording));
    assert_eq!(reply.game.current_turn, Some(P2));

    let moves = GameService::list_moves(&state, game_id).await?;
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].id, move_id);
    assert_eq!(moves[0].move_type, MoveType::Set);
    assert_eq!(moves[0].player_id, P1);
    assert_eq!(moves[0].result, TrickResult::Pending);
    assert_eq!(moves[0].round_number, 1);
    assert_eq!(moves[0].trick_name.as_deref(), Some("kickflip"));
    Ok(())
}

#[tokio::test]
async fn match_opens_judging_with_a_deadline() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = started_game(&state).await?;
    run(&state, P1, game_id, set_trick("clips/set.mp4")).await?;

    let before = OffsetDateTime::now_utc();
    let reply = run(&state, P2, game_id, match_trick("clips/match.mp4")).await?;
    let view = reply.game;

    assert_eq!(view.turn_phase, Some(TurnPhase::Judging));
    assert_eq!(view.current_turn, Some(P2));
    let deadline = view.vote_deadline.expect("judging has a deadline");
    assert!(deadline >= before + time::Duration::seconds(59));
    assert!(deadline <= OffsetDateTime::now_utc() + time::Duration::seconds(61));

    let moves = GameService::list_moves(&state, game_id).await?;
    assert_eq!(moves.len(), 2);
    assert_eq!(moves[1].move_type, MoveType::Match);
    assert_eq!(Some(moves[1].id), reply.move_id);
    Ok(())
}

#[tokio::test]
async fn submissions_out_of_turn_are_forbidden() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = started_game(&state).await?;

    // Defender acting on the attacker's turn.
    let err = run(&state, P2, game_id, set_trick("c")).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);
    let err = run(&state, P2, game_id, match_trick("c")).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);

    // The attacker cannot match their own set.
    let err = run(&state, P1, game_id, match_trick("c")).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);

    run(&state, P1, game_id, set_trick("c")).await?;
    let err = run(&state, P1, game_id, set_trick("c2")).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let err = run(&state, STRANGER, game_id, set_trick("c")).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);
    Ok(())
}

#[tokio::test]
async fn submissions_in_the_wrong_phase_are_invalid_state() -> Result<(), AppError> {
    let state = build_test_state().await?;

    let waiting = propose(&state).await?;
    let err = run(&state, P1, waiting, set_trick("c")).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidState);
    assert_eq!(err.status().as_u16(), 409);

    let game_id = started_game(&state).await?;
    run(&state, P1, game_id, set_trick("c")).await?;
    run(&state, P2, game_id, match_trick("c")).await?;

    // The defender still holds the turn while judging, but may not record again.
    let err = run(&state, P2, game_id, match_trick("again")).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidState);
    assert_eq!(game(&state, game_id).await?.turn_phase, Some(TurnPhase::Judging));
    Ok(())
}

#[tokio::test]
async fn malformed_submissions_never_reach_the_game() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = started_game(&state).await?;
    let before = game(&state, game_id).await?;

    let blank_clip = GameCommand::SubmitTrick {
        is_set_trick: true,
        clip_ref: "   ".into(),
        trick_name: None,
        idempotency_key: None,
    };
    let err = run(&state, P1, game_id, blank_clip).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert_eq!(err.status().as_u16(), 422);

    let long_name = GameCommand::SubmitTrick {
        is_set_trick: true,
        clip_ref: "c".into(),
        trick_name: Some("x".repeat(121)),
        idempotency_key: None,
    };
    assert!(run(&state, P1, game_id, long_name).await.is_err());

    assert_eq!(game(&state, game_id).await?, before);
    assert!(GameService::list_moves(&state, game_id).await?.is_empty());
    Ok(())
}
