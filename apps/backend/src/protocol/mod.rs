//! Wire types for the HTTP surface: commands in, views out.

pub mod commands;
pub mod views;

pub use commands::{GameCommand, ProposeGame};
pub use views::{CommandReply, DisputeView, GameView, MoveView};
