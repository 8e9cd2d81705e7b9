#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod protocol;
pub mod realtime;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;

// Re-exports for public API
pub use config::db::{db_url, DbKind, RuntimeEnv};
pub use config::game::GameConfig;
pub use error::AppError;
pub use extractors::{CallerId, GameId};
pub use infra::db::connect_db;
pub use infra::state::build_state;
pub use protocol::{CommandReply, GameCommand, GameView};
pub use services::{CommandService, JudgingTimeoutScheduler};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::test_logging::init();
}
