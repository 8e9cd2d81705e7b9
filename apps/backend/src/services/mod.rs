//! Services: game rules applied inside transactions, plus the command entry
//! point and the judging timeout sweep.

pub mod commands;
pub mod disputes;
pub mod game_flow;
pub mod games;
pub mod publish;
pub mod timeouts;

pub use commands::CommandService;
pub use disputes::DisputeService;
pub use game_flow::{GameFlowOutcome, GameFlowService, TrickSubmission};
pub use timeouts::{JudgingTimeoutScheduler, SweepReport};
