//! Property tests for round resolution and the idempotency ledger (pure domain, no DB).
//!
//! Properties tested:
//! - Matching votes stand; split votes resolve as landed
//! - Letters stay a prefix of SKATE and only grow on missed rounds
//! - Attacker and defender are always distinct participants
//! - A game completes exactly when a player reaches five letters
//! - The ledger never exceeds capacity and keeps the newest keys

use proptest::prelude::*;

use crate::domain::idempotency::{CommandAction, IdempotencyLedger, ProcessedRequest, LEDGER_CAPACITY};
use crate::domain::judging::consensus;
use crate::domain::session::fixtures::{active_session, P1, P2};
use crate::entities::game_moves::Vote;
use crate::entities::games::GameStatus;

fn vote() -> impl Strategy<Value = Vote> {
    prop_oneof![Just(Vote::Landed), Just(Vote::Missed)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_consensus_keeps_agreement_and_favors_landed(a in vote(), d in vote()) {
        let result = consensus(a, d);
        if a == d {
            prop_assert_eq!(result, a);
        } else {
            prop_assert_eq!(result, Vote::Landed);
        }
        prop_assert_eq!(result == Vote::Missed, a == Vote::Missed && d == Vote::Missed);
    }

    #[test]
    fn prop_round_sequence_keeps_invariants(results in prop::collection::vec(vote(), 1..40)) {
        let mut session = active_session();
        let now = session.created_at;

        for result in results {
            if session.status != GameStatus::Active {
                break;
            }
            let before_p1 = session.player1_letters.count();
            let before_p2 = session.player2_letters.count();
            let round_before = session.round_number;

            let res = session.resolve_round(result, now).unwrap();

            let p1 = session.player1_letters;
            let p2 = session.player2_letters;
            prop_assert!("SKATE".starts_with(p1.as_str()));
            prop_assert!("SKATE".starts_with(p2.as_str()));

            match result {
                Vote::Landed => {
                    prop_assert_eq!(p1.count(), before_p1);
                    prop_assert_eq!(p2.count(), before_p2);
                }
                Vote::Missed => {
                    prop_assert_eq!(p1.count() + p2.count(), before_p1 + before_p2 + 1);
                }
            }

            if res.game_over() {
                prop_assert_eq!(session.status, GameStatus::Completed);
                prop_assert!(p1.is_full() || p2.is_full());
                prop_assert_eq!(session.round_number, round_before);
            } else {
                prop_assert!(!p1.is_full() && !p2.is_full());
                prop_assert_eq!(session.round_number, round_before + 1);
                let attacker = session.offensive_player_id.unwrap();
                let defender = session.defensive_player_id.unwrap();
                prop_assert_ne!(attacker, defender);
                prop_assert!(attacker == P1 || attacker == P2);
                prop_assert!(defender == P1 || defender == P2);
                prop_assert_eq!(session.current_turn, Some(attacker));
            }
        }
    }

    #[test]
    fn prop_ledger_is_bounded_and_keeps_newest(n in 0usize..150, replays in prop::collection::vec(0usize..150, 0..20)) {
        let mut ledger = IdempotencyLedger::new();
        let record = |ledger: &mut IdempotencyLedger, i: usize| {
            ledger.record(ProcessedRequest { key: format!("key-{i}"), action: CommandAction::Join, move_id: None, dispute_id: None });
        };
        for i in 0..n {
            record(&mut ledger, i);
        }
        // replaying a retained key never reorders or grows the ledger
        for i in replays {
            let key = format!("key-{i}");
            if ledger.contains(&key) {
                let before: Vec<String> = ledger.keys().map(str::to_string).collect();
                record(&mut ledger, i);
                let after: Vec<String> = ledger.keys().map(str::to_string).collect();
                prop_assert_eq!(before, after);
            }
        }

        prop_assert_eq!(ledger.len(), n.min(LEDGER_CAPACITY));
        let first_kept = n.saturating_sub(LEDGER_CAPACITY);
        for i in 0..n {
            prop_assert_eq!(ledger.contains(&format!("key-{i}")), i >= first_kept);
        }
    }
}
