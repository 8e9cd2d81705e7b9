//! DTOs for disputes_sea adapter.

use time::OffsetDateTime;

use crate::entities::game_moves::Vote;

/// DTO for filing a dispute against a missed call.
#[derive(Debug, Clone)]
pub struct DisputeCreate {
    pub game_id: i64,
    pub turn_id: i64,
    pub disputed_by: i64,
    pub against_player_id: i64,
}

/// Verdict recorded when a dispute is resolved.
#[derive(Debug, Clone)]
pub struct DisputeResolution {
    pub id: i64,
    pub final_result: Vote,
    pub resolved_by: i64,
    pub resolved_at: OffsetDateTime,
    pub penalty_applied_to: i64,
}
