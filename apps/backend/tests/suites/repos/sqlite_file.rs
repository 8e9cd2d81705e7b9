//! Games survive a restart when stored in a SQLite file.

use std::env;

use serial_test::serial;
use skate_backend::config::db::{DbKind, RuntimeEnv};
use skate_backend::entities::games::GameStatus;
use skate_backend::error::AppError;
use skate_backend::infra::state::build_state;
use skate_backend::repos::games;

use crate::support::game_setup::{join, propose, run, P2};
use crate::support::test_state::test_game_config;

#[tokio::test]
#[serial]
async fn file_database_persists_across_reconnects() -> Result<(), AppError> {
    let dir = tempfile::tempdir().map_err(|e| AppError::config(e.to_string()))?;
    let path = dir.path().join("nested").join("skate_test.sqlite");
    env::set_var("SQLITE_DB_PATH", &path);

    let builder = || {
        build_state()
            .with_env(RuntimeEnv::Test)
            .with_db(DbKind::SqliteFile)
            .with_game_config(test_game_config())
    };

    let state = builder().build().await?;
    let game_id = propose(&state).await?;
    run(&state, P2, game_id, join()).await?;
    drop(state);

    // Migrations are idempotent on an existing file.
    let reopened = builder().build().await?;
    let game = games::require_game(&reopened.db, game_id).await?;
    assert_eq!(game.status, GameStatus::Active);
    assert!(path.exists());

    env::remove_var("SQLITE_DB_PATH");
    Ok(())
}
