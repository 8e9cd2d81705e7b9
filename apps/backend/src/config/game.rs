//! Game timing configuration.

use std::env;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_VOTE_WINDOW_SECS: u64 = 60;
const DEFAULT_TURN_WINDOW_SECS: u64 = 300;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// How long both players have to judge a match attempt.
    pub vote_window: Duration,
    /// Deadline handed to the new attacker after a dispute reversal.
    pub turn_window: Duration,
    /// Period of the judging timeout sweep.
    pub sweep_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            vote_window: Duration::from_secs(DEFAULT_VOTE_WINDOW_SECS),
            turn_window: Duration::from_secs(DEFAULT_TURN_WINDOW_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

impl GameConfig {
    /// Reads `SKATE_VOTE_WINDOW_SECS`, `SKATE_TURN_WINDOW_SECS` and
    /// `SKATE_TIMEOUT_SWEEP_SECS`, falling back to defaults when unset.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            vote_window: secs_var("SKATE_VOTE_WINDOW_SECS", DEFAULT_VOTE_WINDOW_SECS)?,
            turn_window: secs_var("SKATE_TURN_WINDOW_SECS", DEFAULT_TURN_WINDOW_SECS)?,
            sweep_interval: secs_var("SKATE_TIMEOUT_SWEEP_SECS", DEFAULT_SWEEP_INTERVAL_SECS)?,
        })
    }

    pub fn vote_deadline_from(&self, now: time::OffsetDateTime) -> time::OffsetDateTime {
        now + self.vote_window
    }

    pub fn turn_deadline_from(&self, now: time::OffsetDateTime) -> time::OffsetDateTime {
        now + self.turn_window
    }
}

fn secs_var(name: &str, default: u64) -> Result<Duration, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| AppError::config(format!("{name} must be a whole number of seconds, got '{raw}'"))),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}
