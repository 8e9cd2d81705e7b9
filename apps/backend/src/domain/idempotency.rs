//! Bounded per-game record of processed idempotency keys.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, InfraErrorKind};

/// Oldest keys are evicted once the ledger holds this many.
pub const LEDGER_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    Join,
    SubmitTrick,
    CastVote,
    Forfeit,
    FileDispute,
    ResolveDispute,
}

/// What a processed command produced, so a retry can report the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedRequest {
    pub key: String,
    pub action: CommandAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispute_id: Option<i64>,
}

/// FIFO ledger persisted as a JSON array on the game row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyLedger {
    entries: VecDeque<ProcessedRequest>,
}

impl IdempotencyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(raw).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("unreadable idempotency ledger: {e}"),
            )
        })
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string(self).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::Other("Serialization".into()),
                format!("could not encode idempotency ledger: {e}"),
            )
        })
    }

    pub fn find(&self, key: &str) -> Option<&ProcessedRequest> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Records a processed request, evicting the oldest entries beyond capacity.
    /// Re-recording a key that is already present is a no-op.
    pub fn record(&mut self, request: ProcessedRequest) {
        if self.contains(&request.key) {
            return;
        }
        self.entries.push_back(request);
        while self.entries.len() > LEDGER_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }
}
