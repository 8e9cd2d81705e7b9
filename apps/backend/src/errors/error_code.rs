//! Error codes for the S.K.A.T.E. backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that appears
/// in HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Caller identity missing or malformed
    Unauthorized,
    /// Caller is not allowed to perform the action
    Forbidden,

    // Request Validation
    /// Invalid game ID provided
    InvalidGameId,
    /// Action not legal in the current game phase or status
    InvalidState,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// Game not found
    GameNotFound,
    /// Move not found
    MoveNotFound,
    /// Dispute not found
    DisputeNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Caller already voted on this attempt
    AlreadyVoted,
    /// Attempt or dispute is already resolved
    AlreadyResolved,
    /// Player already spent their dispute for this game
    DisputeAlreadyUsed,
    /// Optimistic lock failure on the game row
    OptimisticLock,
    /// General conflict error
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Internal server error
    InternalError,
    /// Configuration error
    ConfigError,
    /// Stored data could not be interpreted
    DataCorruption,
}

impl ErrorCode {
    /// Every code, for exhaustiveness checks in tests.
    pub const ALL: [ErrorCode; 21] = [
        ErrorCode::Unauthorized,
        ErrorCode::Forbidden,
        ErrorCode::InvalidGameId,
        ErrorCode::InvalidState,
        ErrorCode::ValidationError,
        ErrorCode::BadRequest,
        ErrorCode::GameNotFound,
        ErrorCode::MoveNotFound,
        ErrorCode::DisputeNotFound,
        ErrorCode::NotFound,
        ErrorCode::AlreadyVoted,
        ErrorCode::AlreadyResolved,
        ErrorCode::DisputeAlreadyUsed,
        ErrorCode::OptimisticLock,
        ErrorCode::Conflict,
        ErrorCode::DbError,
        ErrorCode::DbUnavailable,
        ErrorCode::DbTimeout,
        ErrorCode::InternalError,
        ErrorCode::ConfigError,
        ErrorCode::DataCorruption,
    ];

    /// Canonical SCREAMING_SNAKE_CASE string for this code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidGameId => "INVALID_GAME_ID",
            Self::InvalidState => "INVALID_STATE",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::MoveNotFound => "MOVE_NOT_FOUND",
            Self::DisputeNotFound => "DISPUTE_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::AlreadyResolved => "ALREADY_RESOLVED",
            Self::DisputeAlreadyUsed => "DISPUTE_ALREADY_USED",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
