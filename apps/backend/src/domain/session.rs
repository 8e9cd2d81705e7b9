//! In-memory model of a game row and the state transitions applied to it.
//!
//! Services load a [`GameSession`] under lock, validate the caller, apply one
//! of the transitions below and persist the result with a version check.

use time::OffsetDateTime;

use crate::domain::idempotency::IdempotencyLedger;
use crate::domain::judging::Role;
use crate::domain::letters::Letters;
use crate::entities::game_moves::Vote;
use crate::entities::games::{GameStatus, TurnPhase};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Player1,
    Player2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub id: i64,
    pub player1_id: i64,
    pub player2_id: i64,
    pub status: GameStatus,
    pub current_turn: Option<i64>,
    pub offensive_player_id: Option<i64>,
    pub defensive_player_id: Option<i64>,
    pub turn_phase: Option<TurnPhase>,
    pub round_number: i32,
    pub player1_letters: Letters,
    pub player2_letters: Letters,
    pub winner_id: Option<i64>,
    pub vote_deadline: Option<OffsetDateTime>,
    pub player1_dispute_used: bool,
    pub player2_dispute_used: bool,
    pub ledger: IdempotencyLedger,
    pub version: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub started_at: Option<OffsetDateTime>,
    pub completed_at: Option<OffsetDateTime>,
}

/// A letter handed out when a round resolves as missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterAwarded {
    pub player_id: i64,
    pub letter: char,
    pub letters: Letters,
}

/// What resolving a round did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResolution {
    pub result: Vote,
    pub letter: Option<LetterAwarded>,
    pub roles_swapped: bool,
    pub winner_id: Option<i64>,
}

impl RoundResolution {
    pub fn game_over(&self) -> bool {
        self.winner_id.is_some()
    }
}

impl GameSession {
    pub fn seat_of(&self, player_id: i64) -> Option<Seat> {
        if player_id == self.player1_id {
            Some(Seat::Player1)
        } else if player_id == self.player2_id {
            Some(Seat::Player2)
        } else {
            None
        }
    }

    pub fn is_participant(&self, player_id: i64) -> bool {
        self.seat_of(player_id).is_some()
    }

    pub fn opponent_of(&self, player_id: i64) -> Option<i64> {
        match self.seat_of(player_id)? {
            Seat::Player1 => Some(self.player2_id),
            Seat::Player2 => Some(self.player1_id),
        }
    }

    pub fn player_at(&self, seat: Seat) -> i64 {
        match seat {
            Seat::Player1 => self.player1_id,
            Seat::Player2 => self.player2_id,
        }
    }

    /// Role in the current round; `None` for non-participants or before the match starts.
    pub fn role_of(&self, player_id: i64) -> Option<Role> {
        if self.offensive_player_id == Some(player_id) {
            Some(Role::Attacker)
        } else if self.defensive_player_id == Some(player_id) {
            Some(Role::Defender)
        } else {
            None
        }
    }

    pub fn letters(&self, seat: Seat) -> Letters {
        match seat {
            Seat::Player1 => self.player1_letters,
            Seat::Player2 => self.player2_letters,
        }
    }

    fn letters_mut(&mut self, seat: Seat) -> &mut Letters {
        match seat {
            Seat::Player1 => &mut self.player1_letters,
            Seat::Player2 => &mut self.player2_letters,
        }
    }

    pub fn dispute_used(&self, seat: Seat) -> bool {
        match seat {
            Seat::Player1 => self.player1_dispute_used,
            Seat::Player2 => self.player2_dispute_used,
        }
    }

    pub fn mark_dispute_used(&mut self, seat: Seat) {
        match seat {
            Seat::Player1 => self.player1_dispute_used = true,
            Seat::Player2 => self.player2_dispute_used = true,
        }
    }

    /// Completed or abandoned.
    pub fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::Completed | GameStatus::Abandoned)
    }

    /// Activates a waiting game: player1 attacks first in round 1.
    pub fn start(&mut self, now: OffsetDateTime) {
        self.status = GameStatus::Active;
        self.offensive_player_id = Some(self.player1_id);
        self.defensive_player_id = Some(self.player2_id);
        self.current_turn = Some(self.player1_id);
        self.turn_phase = Some(TurnPhase::AttackerRecording);
        self.round_number = 1;
        self.started_at = Some(now);
    }

    /// The set trick is recorded; the defender must now match it.
    pub fn record_set(&mut self) {
        self.turn_phase = Some(TurnPhase::DefenderRecording);
        self.current_turn = self.defensive_player_id;
    }

    /// The match attempt is recorded; both players now judge it until `deadline`.
    pub fn record_match(&mut self, deadline: OffsetDateTime) {
        self.turn_phase = Some(TurnPhase::Judging);
        self.vote_deadline = Some(deadline);
    }

    /// Applies the final judgment of the current round.
    ///
    /// Missed: the defender takes the next letter and the attacker keeps
    /// the set; a fifth letter completes the game in the attacker's favour.
    /// Landed: no letter, roles swap.
    pub fn resolve_round(
        &mut self,
        result: Vote,
        now: OffsetDateTime,
    ) -> Result<RoundResolution, DomainError> {
        let (attacker, defender) = match (self.offensive_player_id, self.defensive_player_id) {
            (Some(a), Some(d)) => (a, d),
            _ => {
                return Err(DomainError::invalid_state(
                    "round cannot resolve before roles are assigned",
                ))
            }
        };

        let mut resolution = RoundResolution {
            result,
            letter: None,
            roles_swapped: false,
            winner_id: None,
        };

        match result {
            Vote::Missed => {
                let seat = self
                    .seat_of(defender)
                    .ok_or_else(|| DomainError::invalid_state("defender is not seated"))?;
                let letters = self.letters_mut(seat);
                if let Some(letter) = letters.push() {
                    resolution.letter = Some(LetterAwarded {
                        player_id: defender,
                        letter,
                        letters: *letters,
                    });
                }
                if self.letters(seat).is_full() {
                    self.status = GameStatus::Completed;
                    self.winner_id = Some(attacker);
                    self.turn_phase = Some(TurnPhase::RoundComplete);
                    self.current_turn = None;
                    self.vote_deadline = None;
                    self.completed_at = Some(now);
                    resolution.winner_id = Some(attacker);
                    return Ok(resolution);
                }
            }
            Vote::Landed => {
                self.offensive_player_id = Some(defender);
                self.defensive_player_id = Some(attacker);
                resolution.roles_swapped = true;
            }
        }

        self.round_number += 1;
        self.turn_phase = Some(TurnPhase::AttackerRecording);
        self.current_turn = self.offensive_player_id;
        self.vote_deadline = None;
        Ok(resolution)
    }

    /// Ends the game with the opponent of `forfeiting` as winner.
    pub fn forfeit(&mut self, forfeiting: i64, now: OffsetDateTime) -> Option<i64> {
        let winner = self.opponent_of(forfeiting)?;
        self.status = GameStatus::Abandoned;
        self.winner_id = Some(winner);
        self.vote_deadline = None;
        self.completed_at = Some(now);
        Some(winner)
    }

    /// Overturns a missed call: the disputer loses their latest letter and
    /// takes the attack, starting from a fresh set.
    ///
    /// `deadline` is informational while in `set_trick`; only `judging`
    /// deadlines are enforced by the timeout sweep.
    pub fn reverse_missed_call(
        &mut self,
        disputer: i64,
        deadline: OffsetDateTime,
    ) -> Result<Option<LetterAwarded>, DomainError> {
        let seat = self
            .seat_of(disputer)
            .ok_or_else(|| DomainError::forbidden("disputer is not part of this game"))?;
        let opponent = self.player_at(match seat {
            Seat::Player1 => Seat::Player2,
            Seat::Player2 => Seat::Player1,
        });

        let letters = self.letters_mut(seat);
        let removed = letters.pop().map(|letter| LetterAwarded {
            player_id: disputer,
            letter,
            letters: *letters,
        });

        self.offensive_player_id = Some(disputer);
        self.defensive_player_id = Some(opponent);
        self.current_turn = Some(disputer);
        self.turn_phase = Some(TurnPhase::SetTrick);
        self.vote_deadline = Some(deadline);
        Ok(removed)
    }
}
