//! Game flow orchestration - applies player commands to a locked session.
//!
//! Every method here runs inside the caller's transaction and after the
//! caller has taken the game's advisory lock. Methods return a
//! [`GameFlowOutcome`] whose events must only be published after commit.

mod judging;
mod lifecycle;
mod turns;

use crate::config::game::GameConfig;
use crate::domain::idempotency::{CommandAction, ProcessedRequest};
use crate::domain::session::GameSession;
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::protocol::views::{CommandReply, GameView};
use crate::realtime::GameEvent;

pub use turns::TrickSubmission;

#[derive(Debug, Clone, Copy, Default)]
pub struct GameFlowService {
    config: GameConfig,
}

impl GameFlowService {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

/// Result of one command against a game.
#[derive(Debug, Clone)]
pub struct GameFlowOutcome {
    /// The session as committed (or as found, for duplicates).
    pub game: GameSession,
    pub move_id: Option<i64>,
    pub dispute_id: Option<i64>,
    /// True when nothing was mutated because the command had already been applied.
    pub duplicate: bool,
    /// Events to publish once the transaction commits.
    pub events: Vec<GameEvent>,
}

impl GameFlowOutcome {
    pub fn applied(game: GameSession, events: Vec<GameEvent>) -> Self {
        Self {
            game,
            move_id: None,
            dispute_id: None,
            duplicate: false,
            events,
        }
    }

    pub fn duplicate(game: GameSession) -> Self {
        Self {
            game,
            move_id: None,
            dispute_id: None,
            duplicate: true,
            events: Vec::new(),
        }
    }

    pub fn with_move(mut self, move_id: i64) -> Self {
        self.move_id = Some(move_id);
        self
    }

    pub fn with_dispute(mut self, dispute_id: i64) -> Self {
        self.dispute_id = Some(dispute_id);
        self
    }

    pub fn reply(&self) -> CommandReply {
        CommandReply {
            game: GameView::from(&self.game),
            move_id: self.move_id,
            dispute_id: self.dispute_id,
            duplicate: self.duplicate,
        }
    }
}

/// Replays a previously processed command if `key` is in the session's ledger.
///
/// A key recorded for a different kind of command is rejected rather than
/// silently replayed.
pub(crate) fn replay(
    session: &GameSession,
    key: Option<&str>,
    action: CommandAction,
) -> Result<Option<GameFlowOutcome>, AppError> {
    let Some(key) = key else {
        return Ok(None);
    };
    let Some(prior) = session.ledger.find(key) else {
        return Ok(None);
    };
    if prior.action != action {
        return Err(DomainError::invalid_command(format!(
            "idempotency key '{key}' was already used for {:?}",
            prior.action
        ))
        .into());
    }

    let mut outcome = GameFlowOutcome::duplicate(session.clone());
    outcome.move_id = prior.move_id;
    outcome.dispute_id = prior.dispute_id;
    Ok(Some(outcome))
}

/// Records `key` in the session's ledger; keyless commands are not remembered.
pub(crate) fn remember(
    session: &mut GameSession,
    key: Option<&str>,
    action: CommandAction,
    move_id: Option<i64>,
    dispute_id: Option<i64>,
) {
    if let Some(key) = key {
        session.ledger.record(ProcessedRequest {
            key: key.to_string(),
            action,
            move_id,
            dispute_id,
        });
    }
}

/// `game:ended` for a finished session, otherwise `game:turn`.
pub(crate) fn state_event(session: &GameSession) -> GameEvent {
    if session.is_finished() {
        GameEvent::ended(session)
    } else {
        GameEvent::turn(session)
    }
}

pub(crate) fn require_participant(session: &GameSession, player_id: i64) -> Result<(), AppError> {
    if session.is_participant(player_id) {
        Ok(())
    } else {
        Err(DomainError::forbidden(format!(
            "Player {player_id} is not part of game {}",
            session.id
        ))
        .into())
    }
}

pub(crate) fn require_active(session: &GameSession) -> Result<(), AppError> {
    if session.status == crate::entities::games::GameStatus::Active {
        Ok(())
    } else {
        Err(DomainError::invalid_state(format!(
            "Game {} is {:?}, not active",
            session.id, session.status
        ))
        .into())
    }
}
