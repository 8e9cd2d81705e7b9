//! Domain layer: pure game logic types and helpers.

pub mod idempotency;
pub mod judging;
pub mod letters;
pub mod session;

#[cfg(test)]
mod tests_props_rounds;

pub use idempotency::{CommandAction, IdempotencyLedger, ProcessedRequest};
pub use judging::{consensus, JudgmentVotes, Role};
pub use letters::Letters;
pub use session::{GameSession, LetterAwarded, RoundResolution, Seat};
