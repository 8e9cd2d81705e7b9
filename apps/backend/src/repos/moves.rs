//! Recorded attempts (set and match clips) and their judgments.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::moves_sea as moves_adapter;
use crate::domain::judging::JudgmentVotes;
use crate::entities::game_moves::{MoveType, TrickResult, Vote};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

pub use crate::entities::game_moves::Model as GameMove;
pub use moves_adapter::MoveCreate;

impl GameMove {
    pub fn votes(&self) -> JudgmentVotes {
        JudgmentVotes::new(self.attacker_vote, self.defender_vote)
    }

    pub fn is_pending(&self) -> bool {
        self.result == TrickResult::Pending
    }
}

/// A move that must belong to `game_id`; moves of other games are reported as missing.
pub async fn require_move_in_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    move_id: i64,
) -> Result<GameMove, DomainError> {
    match moves_adapter::find_by_id(conn, move_id).await? {
        Some(mv) if mv.game_id == game_id => Ok(mv),
        _ => Err(DomainError::not_found(
            NotFoundKind::Move,
            format!("Move {move_id} not found in game {game_id}"),
        )),
    }
}

pub async fn list_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<GameMove>, DomainError> {
    Ok(moves_adapter::find_all_by_game(conn, game_id).await?)
}

pub async fn create_move(txn: &DatabaseTransaction, dto: MoveCreate) -> Result<GameMove, DomainError> {
    Ok(moves_adapter::create_move(txn, dto).await?)
}

pub async fn find_pending_match(
    txn: &DatabaseTransaction,
    game_id: i64,
    round_number: i32,
) -> Result<Option<GameMove>, DomainError> {
    Ok(moves_adapter::find_pending_match(txn, game_id, round_number).await?)
}

pub async fn save_votes(
    txn: &DatabaseTransaction,
    move_id: i64,
    votes: JudgmentVotes,
) -> Result<(), DomainError> {
    moves_adapter::update_votes(txn, move_id, votes.attacker, votes.defender).await?;
    Ok(())
}

/// Writes the round's final judgment onto the match attempt and settles the set.
///
/// `judged_by` is `None` for timeout resolutions, which are flagged as
/// auto-resolved instead.
pub async fn record_round_result(
    txn: &DatabaseTransaction,
    mv: &GameMove,
    result: Vote,
    judged_by: Option<i64>,
) -> Result<(), DomainError> {
    let timed_out = judged_by.is_none();
    let applied = moves_adapter::apply_judgment(
        txn,
        moves_adapter::MoveJudgment {
            id: mv.id,
            result: result.into(),
            judged_by,
            timed_out,
            auto_resolved: timed_out.then_some(result),
        },
    )
    .await?;
    if !applied {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyResolved,
            format!("Move {} has already been judged", mv.id),
        ));
    }
    moves_adapter::settle_set_moves(txn, mv.game_id, mv.round_number).await?;
    Ok(())
}

pub async fn overturn_to_landed(txn: &DatabaseTransaction, move_id: i64) -> Result<(), DomainError> {
    moves_adapter::overturn_result(txn, move_id, TrickResult::Landed).await?;
    Ok(())
}

pub fn new_move(
    game_id: i64,
    round_number: i32,
    player_id: i64,
    move_type: MoveType,
    trick_name: Option<String>,
    clip_ref: String,
) -> MoveCreate {
    MoveCreate {
        game_id,
        round_number,
        player_id,
        move_type,
        trick_name,
        clip_ref,
    }
}
