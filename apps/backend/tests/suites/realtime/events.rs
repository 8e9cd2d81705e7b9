//! Which events each command publishes.

use std::time::Duration;

use skate_backend::entities::game_moves::Vote;
use skate_backend::entities::games::GameStatus;
use skate_backend::error::AppError;
use skate_backend::realtime::GameEvent;

use crate::support::game_setup::{
    file_dispute, forfeit, join, keyed, match_trick, play_missed_round, propose, resolve_dispute,
    run, set_trick, started_game, vote, P1, P2,
};
use crate::support::recording::{RecordingBroadcaster, RecordingNotifier};
use crate::support::test_state::{build_test_state, test_state_builder};

#[tokio::test]
async fn a_round_publishes_turns_then_the_letter() -> Result<(), AppError> {
    let events = RecordingBroadcaster::new();
    let state = test_state_builder()?
        .with_broadcaster(events.clone())
        .build()
        .await?;
    let game_id = propose(&state).await?;
    assert!(events.names().is_empty(), "proposals are not broadcast");

    run(&state, P2, game_id, join()).await?;
    run(&state, P1, game_id, set_trick("s")).await?;
    let move_id = run(&state, P2, game_id, match_trick("m")).await?.move_id.expect("move id");
    assert_eq!(events.names(), ["game:turn", "game:turn", "game:turn"]);

    events.clear();
    run(&state, P1, game_id, vote(move_id, Vote::Missed)).await?;
    assert!(events.names().is_empty(), "a half-judged attempt publishes nothing");

    run(&state, P2, game_id, vote(move_id, Vote::Missed)).await?;
    assert_eq!(events.names(), ["game:letter", "game:turn"]);
    match &events.events()[0] {
        (id, GameEvent::Letter { player_id, letters, .. }) => {
            assert_eq!(*id, game_id);
            assert_eq!(*player_id, P2);
            assert_eq!(letters, "S");
        }
        other => panic!("unexpected event {other:?}"),
    }
    match &events.events()[1] {
        (_, GameEvent::Turn { round_number, current_turn, version, .. }) => {
            assert_eq!(*round_number, 2);
            assert_eq!(*current_turn, Some(P1));
            assert!(*version > 0);
        }
        other => panic!("unexpected event {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn duplicates_and_failures_publish_nothing() -> Result<(), AppError> {
    let events = RecordingBroadcaster::new();
    let state = test_state_builder()?
        .with_broadcaster(events.clone())
        .build()
        .await?;
    let game_id = started_game(&state).await?;
    run(&state, P1, game_id, keyed(set_trick("s"), "k-set")).await?;
    events.clear();

    run(&state, P1, game_id, keyed(set_trick("s"), "k-set")).await?;
    assert!(run(&state, P1, game_id, set_trick("again")).await.is_err());
    run(&state, P2, game_id, join()).await?;

    assert!(events.names().is_empty());
    Ok(())
}

#[tokio::test]
async fn disputes_pause_and_resume_the_room() -> Result<(), AppError> {
    let events = RecordingBroadcaster::new();
    let state = test_state_builder()?
        .with_broadcaster(events.clone())
        .build()
        .await?;
    let game_id = started_game(&state).await?;
    let (move_id, _) = play_missed_round(&state, game_id).await?;
    events.clear();

    let dispute_id = run(&state, P2, game_id, file_dispute(move_id))
        .await?
        .dispute_id
        .expect("dispute id");
    assert_eq!(events.names(), ["game:paused"]);

    events.clear();
    run(&state, P1, game_id, resolve_dispute(dispute_id, Vote::Landed)).await?;
    assert_eq!(events.names(), ["game:letter", "game:resumed", "game:turn"]);
    match &events.events()[0] {
        (_, GameEvent::Letter { player_id, letters, .. }) => {
            assert_eq!(*player_id, P2);
            assert_eq!(letters, "");
        }
        other => panic!("unexpected event {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn finished_games_are_announced_and_notified() -> Result<(), AppError> {
    let events = RecordingBroadcaster::new();
    let notifier = RecordingNotifier::new();
    let state = test_state_builder()?
        .with_broadcaster(events.clone())
        .with_notifier(notifier.clone())
        .build()
        .await?;
    let game_id = started_game(&state).await?;
    events.clear();

    run(&state, P1, game_id, forfeit()).await?;
    assert_eq!(events.names(), ["game:ended"]);
    match &events.events()[0] {
        (_, GameEvent::Ended { status, winner_id, .. }) => {
            assert_eq!(*status, GameStatus::Abandoned);
            assert_eq!(*winner_id, Some(P2));
        }
        other => panic!("unexpected event {other:?}"),
    }

    tokio::time::timeout(Duration::from_secs(2), notifier.notify.notified())
        .await
        .expect("notifier runs after commit");
    assert_eq!(notifier.ended(), vec![game_id]);

    // A duplicate forfeit does not notify again.
    run(&state, P1, game_id, forfeit()).await?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(notifier.ended(), vec![game_id]);
    Ok(())
}

#[tokio::test]
async fn room_subscribers_receive_committed_events() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let game_id = propose(&state).await?;
    let mut room = state.rooms.subscribe(game_id);
    assert_eq!(state.rooms.subscriber_count(game_id), 1);

    run(&state, P2, game_id, join()).await?;
    let event = tokio::time::timeout(Duration::from_secs(1), room.recv())
        .await
        .expect("event arrives")
        .expect("room open");
    assert_eq!(event.game_id(), game_id);
    assert_eq!(event.name(), "game:turn");

    Ok(())
}
