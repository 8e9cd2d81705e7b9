// DomainError -> AppError mapping, without HTTP or database.
use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;
use crate::AppError;

#[test]
fn invalid_commands_are_unprocessable() {
    let app: AppError = DomainError::invalid_command("clip_ref must not be blank").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 422);

    let app: AppError =
        DomainError::validation(ValidationKind::Other("KEY_REUSED".into()), "key reused").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 422);
}

#[test]
fn wrong_phase_is_a_conflict() {
    let app: AppError = DomainError::invalid_state("game is not judging").into();
    assert_eq!(app.code(), ErrorCode::InvalidState);
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn conflicts_keep_their_code() {
    let cases = [
        (ConflictKind::AlreadyVoted, "ALREADY_VOTED"),
        (ConflictKind::AlreadyResolved, "ALREADY_RESOLVED"),
        (ConflictKind::DisputeAlreadyUsed, "DISPUTE_ALREADY_USED"),
        (ConflictKind::OptimisticLock, "OPTIMISTIC_LOCK"),
        (ConflictKind::Other("x".into()), "CONFLICT"),
    ];
    for (kind, code) in cases {
        let app: AppError = DomainError::conflict(kind, "conflict").into();
        assert_eq!(app.code().as_str(), code);
        assert_eq!(app.status().as_u16(), 409);
    }
}

#[test]
fn not_found_names_the_resource() {
    let cases = [
        (NotFoundKind::Game, "GAME_NOT_FOUND"),
        (NotFoundKind::Move, "MOVE_NOT_FOUND"),
        (NotFoundKind::Dispute, "DISPUTE_NOT_FOUND"),
        (NotFoundKind::Other("player".into()), "NOT_FOUND"),
    ];
    for (kind, code) in cases {
        let app: AppError = DomainError::not_found(kind, "missing").into();
        assert_eq!(app.code().as_str(), code);
        assert_eq!(app.status().as_u16(), 404);
    }
}

#[test]
fn forbidden_is_403() {
    let app: AppError = DomainError::forbidden("not your turn").into();
    assert_eq!(app.code(), ErrorCode::Forbidden);
    assert_eq!(app.status().as_u16(), 403);
}

#[test]
fn infra_failures() {
    let app: AppError = DomainError::infra(InfraErrorKind::Timeout, "timeout").into();
    assert_eq!(app.code(), ErrorCode::DbTimeout);
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));

    let app: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(app.code(), ErrorCode::DbUnavailable);
    assert_eq!(app.status().as_u16(), 503);

    let app: AppError = DomainError::infra(InfraErrorKind::DataCorruption, "bad ledger").into();
    assert_eq!(app.code(), ErrorCode::DataCorruption);
    assert_eq!(app.status().as_u16(), 500);

    let app: AppError = DomainError::infra(InfraErrorKind::Other("io".into()), "other").into();
    assert_eq!(app.code(), ErrorCode::DbError);
    assert_eq!(app.status().as_u16(), 500);
}
