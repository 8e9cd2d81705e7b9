//! Adapters for external dependencies.

pub mod disputes_sea;
pub mod games_sea;
pub mod moves_sea;
pub mod reputation_sea;
