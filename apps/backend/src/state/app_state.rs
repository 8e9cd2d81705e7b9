use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::game::GameConfig;
use crate::db::GameLocks;
use crate::realtime::{LogNotifier, Notifier, RoomBroadcaster, RoomHub};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub game_config: GameConfig,
    /// Per-game command serialization
    pub locks: Arc<GameLocks>,
    /// Room registry that clients subscribe to
    pub rooms: Arc<RoomHub>,
    /// Where committed events are published; the room hub unless overridden
    pub broadcaster: Arc<dyn RoomBroadcaster>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, game_config: GameConfig) -> Self {
        let rooms = Arc::new(RoomHub::new());
        Self {
            db,
            game_config,
            locks: Arc::new(GameLocks::new()),
            broadcaster: rooms.clone(),
            rooms,
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_broadcaster(mut self, broadcaster: Arc<dyn RoomBroadcaster>) -> Self {
        self.broadcaster = broadcaster;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}
