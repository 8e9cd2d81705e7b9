//! Voting, consensus and round resolution.

use skate_backend::entities::game_moves::{MoveType, TrickResult, Vote};
use skate_backend::entities::games::{GameStatus, TurnPhase};
use skate_backend::error::AppError;
use skate_backend::errors::ErrorCode;
use skate_backend::services::games::GameService;

use crate::support::game_setup::{
    game, open_judging, play_missed_round, play_round, roles, run, set_trick, started_game, vote,
    P1, P2, STRANGER,
};
use crate::support::test_state::build_test_state;

#[tokio::test]
async fn agreed_miss_gives_the_defender_a_letter() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = started_game(&state).await?;

    let (move_id, reply) = play_missed_round(&state, game_id).await?;
    let view = reply.game;
    assert_eq!(view.player2_letters.as_str(), "S");
    assert_eq!(view.player1_letters.as_str(), "");
    assert_eq!(view.offensive_player_id, Some(P1));
    assert_eq!(view.current_turn, Some(P1));
    assert_eq!(view.turn_phase, Some(TurnPhase::AttackerRecording));
    assert_eq!(view.round_number, 2);
    assert!(view.vote_deadline.is_none());

    let moves = GameService::list_moves(&state, game_id).await?;
    let matched = moves.iter().find(|m| m.id == move_id).expect("match move");
    assert_eq!(matched.result, TrickResult::Missed);
    assert_eq!(matched.attacker_vote, Some(Vote::Missed));
    assert_eq!(matched.defender_vote, Some(Vote::Missed));
    assert_eq!(matched.judged_by, Some(P1));
    assert!(!matched.timed_out);

    let set = moves.iter().find(|m| m.move_type == MoveType::Set).expect("set move");
    assert_eq!(set.result, TrickResult::Landed);
    Ok(())
}

#[tokio::test]
async fn disagreement_resolves_as_landed_and_swaps_roles() -> Result<(), AppError> {
    let state = build_test_state().await?;

    for (attacker_vote, defender_vote) in [(Vote::Missed, Vote::Landed), (Vote::Landed, Vote::Missed)] {
        let game_id = started_game(&state).await?;
        let (move_id, reply) = play_round(&state, game_id, attacker_vote, defender_vote).await?;
        let view = reply.game;

        assert_eq!(view.player1_letters.as_str(), "");
        assert_eq!(view.player2_letters.as_str(), "");
        assert_eq!(view.offensive_player_id, Some(P2));
        assert_eq!(view.defensive_player_id, Some(P1));
        assert_eq!(view.current_turn, Some(P2));
        assert_eq!(view.round_number, 2);

        let moves = GameService::list_moves(&state, game_id).await?;
        let matched = moves.iter().find(|m| m.id == move_id).expect("match move");
        assert_eq!(matched.result, TrickResult::Landed);
    }
    Ok(())
}

#[tokio::test]
async fn agreed_landing_swaps_roles() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = started_game(&state).await?;

    play_round(&state, game_id, Vote::Landed, Vote::Landed).await?;
    assert_eq!(roles(&state, game_id).await?, (P2, P1));

    // The new attacker sets the next trick.
    let reply = run(&state, P2, game_id, set_trick("clips/p2.mp4")).await?;
    assert_eq!(reply.game.current_turn, Some(P1));
    Ok(())
}

#[tokio::test]
async fn a_single_vote_leaves_judging_open() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = started_game(&state).await?;
    let move_id = open_judging(&state, game_id).await?;

    let reply = run(&state, P2, game_id, vote(move_id, Vote::Landed)).await?;
    assert_eq!(reply.move_id, Some(move_id));
    assert_eq!(reply.game.turn_phase, Some(TurnPhase::Judging));

    let moves = GameService::list_moves(&state, game_id).await?;
    let matched = moves.iter().find(|m| m.id == move_id).expect("match move");
    assert_eq!(matched.defender_vote, Some(Vote::Landed));
    assert_eq!(matched.attacker_vote, None);
    assert_eq!(matched.result, TrickResult::Pending);
    Ok(())
}

#[tokio::test]
async fn each_role_votes_once() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = started_game(&state).await?;
    let move_id = open_judging(&state, game_id).await?;

    run(&state, P1, game_id, vote(move_id, Vote::Missed)).await?;
    let err = run(&state, P1, game_id, vote(move_id, Vote::Landed)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyVoted);
    assert_eq!(err.status().as_u16(), 409);

    run(&state, P2, game_id, vote(move_id, Vote::Missed)).await?;
    let err = run(&state, P2, game_id, vote(move_id, Vote::Landed)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyResolved);
    Ok(())
}

#[tokio::test]
async fn votes_are_checked_against_the_game() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = started_game(&state).await?;
    let move_id = open_judging(&state, game_id).await?;

    let err = run(&state, STRANGER, game_id, vote(move_id, Vote::Missed)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let moves = GameService::list_moves(&state, game_id).await?;
    let set_id = moves.iter().find(|m| m.move_type == MoveType::Set).map(|m| m.id).expect("set");
    let err = run(&state, P1, game_id, vote(set_id, Vote::Missed)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidState);

    let other_game = started_game(&state).await?;
    let err = run(&state, P1, other_game, vote(move_id, Vote::Missed)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::MoveNotFound);
    Ok(())
}

#[tokio::test]
async fn fifth_letter_completes_the_game() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = started_game(&state).await?;

    for expected in ["S", "SK", "SKA", "SKAT"] {
        let (_, reply) = play_missed_round(&state, game_id).await?;
        assert_eq!(reply.game.player2_letters.as_str(), expected);
        assert_eq!(reply.game.status, GameStatus::Active);
    }

    let (_, reply) = play_missed_round(&state, game_id).await?;
    let view = reply.game;
    assert_eq!(view.player2_letters.as_str(), "SKATE");
    assert_eq!(view.status, GameStatus::Completed);
    assert_eq!(view.winner_id, Some(P1));
    assert_eq!(view.turn_phase, Some(TurnPhase::RoundComplete));
    assert_eq!(view.current_turn, None);
    assert_eq!(view.round_number, 5);
    assert!(view.completed_at.is_some());

    // Terminal states are absorbing.
    let err = run(&state, P1, game_id, set_trick("c")).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidState);
    assert_eq!(game(&state, game_id).await?.status, GameStatus::Completed);
    Ok(())
}
