//! Letter progression: a player's penalty letters are always a prefix of "SKATE".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::domain::{DomainError, InfraErrorKind};

pub const WORD: &str = "SKATE";
pub const MAX_LETTERS: usize = WORD.len();

/// Letters earned so far, stored as how far along "SKATE" the player is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Letters(u8);

impl Letters {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn count(self) -> usize {
        self.0 as usize
    }

    pub fn as_str(self) -> &'static str {
        &WORD[..self.count()]
    }

    /// All five letters: the player has lost.
    pub fn is_full(self) -> bool {
        self.count() == MAX_LETTERS
    }

    /// Next letter a player would receive, or `None` when already full.
    pub fn next_letter(self) -> Option<char> {
        WORD.chars().nth(self.count())
    }

    /// Appends the next letter; returns the letter added (none once full).
    pub fn push(&mut self) -> Option<char> {
        let next = self.next_letter()?;
        self.0 += 1;
        Some(next)
    }

    /// Removes the most recent letter; returns it (none when empty).
    pub fn pop(&mut self) -> Option<char> {
        if self.0 == 0 {
            return None;
        }
        self.0 -= 1;
        WORD.chars().nth(self.count())
    }
}

impl fmt::Display for Letters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Letters {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() <= MAX_LETTERS && WORD.starts_with(s) {
            Ok(Self(s.len() as u8))
        } else {
            Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("letters '{s}' are not a prefix of {WORD}"),
            ))
        }
    }
}

impl Serialize for Letters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Letters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
