use std::sync::Arc;

use crate::config::db::{DbKind, RuntimeEnv};
use crate::config::game::GameConfig;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::realtime::{Notifier, RoomBroadcaster};
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    env: RuntimeEnv,
    db_kind: DbKind,
    game_config: Option<GameConfig>,
    broadcaster: Option<Arc<dyn RoomBroadcaster>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            env: RuntimeEnv::Prod,
            db_kind: DbKind::Postgres,
            game_config: None,
            broadcaster: None,
            notifier: None,
        }
    }

    pub fn with_env(mut self, env: RuntimeEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = kind;
        self
    }

    /// Explicit timing; otherwise read from the environment at build time.
    pub fn with_game_config(mut self, game_config: GameConfig) -> Self {
        self.game_config = Some(game_config);
        self
    }

    pub fn with_broadcaster(mut self, broadcaster: Arc<dyn RoomBroadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Connects, migrates and assembles the state.
    pub async fn build(self) -> Result<AppState, AppError> {
        let game_config = match self.game_config {
            Some(cfg) => cfg,
            None => GameConfig::from_env()?,
        };
        let conn = bootstrap_db(self.env, self.db_kind).await?;

        let mut state = AppState::new(conn, game_config);
        if let Some(broadcaster) = self.broadcaster {
            state = state.with_broadcaster(broadcaster);
        }
        if let Some(notifier) = self.notifier {
            state = state.with_notifier(notifier);
        }
        Ok(state)
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
