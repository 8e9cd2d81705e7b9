//! Repository layer: domain-typed access over the sea-orm adapters.

pub mod disputes;
pub mod games;
pub mod moves;
pub mod reputation;
