//! Post-commit fan-out of game events to room subscribers and notifiers.

pub mod events;
pub mod hub;
pub mod notifier;

pub use events::GameEvent;
pub use hub::{RoomBroadcaster, RoomHub};
pub use notifier::{LogNotifier, Notifier};
