//! Broadcaster and notifier doubles.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use skate_backend::domain::session::GameSession;
use skate_backend::error::AppError;
use skate_backend::realtime::{GameEvent, Notifier, RoomBroadcaster};
use tokio::sync::Notify;

/// Keeps every published event in order.
#[derive(Default)]
pub struct RecordingBroadcaster {
    events: Mutex<Vec<(i64, GameEvent)>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<(i64, GameEvent)> {
        self.events.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|(_, e)| e.name()).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[async_trait]
impl RoomBroadcaster for RecordingBroadcaster {
    async fn publish(&self, game_id: i64, event: GameEvent) -> Result<(), AppError> {
        self.events.lock().push((game_id, event));
        Ok(())
    }
}

/// Fails every publish.
#[derive(Default)]
pub struct FailingBroadcaster;

#[async_trait]
impl RoomBroadcaster for FailingBroadcaster {
    async fn publish(&self, _game_id: i64, _event: GameEvent) -> Result<(), AppError> {
        Err(AppError::internal("room transport is down"))
    }
}

/// Records finished games and wakes waiters.
#[derive(Default)]
pub struct RecordingNotifier {
    ended: Mutex<Vec<i64>>,
    pub notify: Notify,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn ended(&self) -> Vec<i64> {
        self.ended.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn game_ended(&self, game: &GameSession) -> Result<(), AppError> {
        self.ended.lock().push(game.id);
        self.notify.notify_one();
        if self.fail {
            return Err(AppError::internal("notification service unavailable"));
        }
        Ok(())
    }
}
