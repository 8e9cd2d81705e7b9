//! Commands racing on the same game.

use futures::future::join_all;
use skate_backend::entities::game_moves::{TrickResult, Vote};
use skate_backend::entities::games::GameStatus;
use skate_backend::error::AppError;
use skate_backend::services::games::GameService;

use crate::support::game_setup::{
    join, open_judging, propose, run, started_game, vote, P1, P2,
};
use crate::support::test_state::build_test_state;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_votes_resolve_the_round_once() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = started_game(&state).await?;
    let move_id = open_judging(&state, game_id).await?;

    let attacker = {
        let state = state.clone();
        tokio::spawn(async move { run(&state, P1, game_id, vote(move_id, Vote::Missed)).await })
    };
    let defender = {
        let state = state.clone();
        tokio::spawn(async move { run(&state, P2, game_id, vote(move_id, Vote::Landed)).await })
    };
    attacker.await.expect("attacker task")?;
    defender.await.expect("defender task")?;

    let view = GameService::get_game(&state, game_id).await?;
    assert_eq!(view.round_number, 2);
    assert_eq!(view.offensive_player_id, Some(P2));
    assert_eq!(view.player2_letters.as_str(), "");

    let moves = GameService::list_moves(&state, game_id).await?;
    let matched = moves.iter().find(|m| m.id == move_id).expect("match move");
    assert_eq!(matched.result, TrickResult::Landed);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_joins_start_the_game_once() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = propose(&state).await?;

    let attempts = (0..5).map(|_| {
        let state = state.clone();
        tokio::spawn(async move { run(&state, P2, game_id, join()).await })
    });
    let replies = join_all(attempts).await;

    let mut fresh = 0;
    for reply in replies {
        let reply = reply.expect("join task")?;
        assert_eq!(reply.game.status, GameStatus::Active);
        if !reply.duplicate {
            fresh += 1;
        }
    }
    assert_eq!(fresh, 1);
    assert_eq!(GameService::get_game(&state, game_id).await?.round_number, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_games_progress_concurrently() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(started_game(&state).await?);
    }

    let rounds = ids.iter().copied().map(|game_id| {
        let state = state.clone();
        tokio::spawn(async move {
            crate::support::game_setup::play_missed_round(&state, game_id).await
        })
    });
    for result in join_all(rounds).await {
        result.expect("round task")?;
    }

    for game_id in ids {
        let view = GameService::get_game(&state, game_id).await?;
        assert_eq!(view.player2_letters.as_str(), "S");
        assert_eq!(view.round_number, 2);
    }
    Ok(())
}
