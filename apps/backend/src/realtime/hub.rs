//! In-process room registry: one broadcast channel per game.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::trace;

use super::events::GameEvent;
use crate::error::AppError;

const ROOM_CAPACITY: usize = 64;

/// Delivers events to everyone watching a game.
///
/// Called only after the producing transaction has committed; a failure here
/// never rolls back game state.
#[async_trait]
pub trait RoomBroadcaster: Send + Sync {
    async fn publish(&self, game_id: i64, event: GameEvent) -> Result<(), AppError>;
}

#[derive(Debug, Default)]
pub struct RoomHub {
    rooms: DashMap<i64, broadcast::Sender<GameEvent>>,
}

impl RoomHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the room for `game_id`; lagging receivers skip missed events.
    pub fn subscribe(&self, game_id: i64) -> broadcast::Receiver<GameEvent> {
        self.rooms
            .entry(game_id)
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
            .subscribe()
    }

    pub fn subscriber_count(&self, game_id: i64) -> usize {
        self.rooms
            .get(&game_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Forgets rooms with nobody listening.
    pub fn prune_empty(&self) {
        self.rooms.retain(|_, sender| sender.receiver_count() > 0);
    }
}

#[async_trait]
impl RoomBroadcaster for RoomHub {
    async fn publish(&self, game_id: i64, event: GameEvent) -> Result<(), AppError> {
        let delivered = match self.rooms.get(&game_id) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        };
        trace!(game_id, delivered, "room event published");
        Ok(())
    }
}
