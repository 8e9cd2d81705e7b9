use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Games {
    Table,
    Id,
    Player1Id,
    Player2Id,
    Status,
    CurrentTurn,
    OffensivePlayerId,
    DefensivePlayerId,
    TurnPhase,
    RoundNumber,
    Player1Letters,
    Player2Letters,
    WinnerId,
    VoteDeadline,
    Player1DisputeUsed,
    Player2DisputeUsed,
    ProcessedIdempotencyKeys,
    Version,
    CreatedAt,
    UpdatedAt,
    StartedAt,
    CompletedAt,
}

#[derive(Iden)]
enum GameMoves {
    Table,
    Id,
    GameId,
    RoundNumber,
    PlayerId,
    MoveType,
    TrickName,
    ClipRef,
    Result,
    AttackerVote,
    DefenderVote,
    JudgedBy,
    TimedOut,
    AutoResolved,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum GameDisputes {
    Table,
    Id,
    GameId,
    TurnId,
    DisputedBy,
    AgainstPlayerId,
    OriginalResult,
    FinalResult,
    ResolvedBy,
    ResolvedAt,
    PenaltyAppliedTo,
    CreatedAt,
}

#[derive(Iden)]
enum PlayerReputation {
    Table,
    PlayerId,
    PenaltyCount,
    UpdatedAt,
}

// Status-like columns are stored as short strings on every backend so the
// same entity definitions work against Postgres and SQLite.
const ENUM_LEN: u32 = 24;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // games table
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Games::Player1Id).big_integer().not_null())
                    .col(ColumnDef::new(Games::Player2Id).big_integer().not_null())
                    .col(
                        ColumnDef::new(Games::Status)
                            .string_len(ENUM_LEN)
                            .not_null()
                            .default("waiting"),
                    )
                    .col(ColumnDef::new(Games::CurrentTurn).big_integer().null())
                    .col(
                        ColumnDef::new(Games::OffensivePlayerId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Games::DefensivePlayerId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Games::TurnPhase).string_len(ENUM_LEN).null())
                    .col(
                        ColumnDef::new(Games::RoundNumber)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Games::Player1Letters)
                            .string_len(5)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Games::Player2Letters)
                            .string_len(5)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Games::WinnerId).big_integer().null())
                    .col(
                        ColumnDef::new(Games::VoteDeadline)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Games::Player1DisputeUsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Games::Player2DisputeUsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Games::ProcessedIdempotencyKeys)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Games::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Games::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // the timeout sweep filters on (status, turn_phase)
        manager
            .create_index(
                Index::create()
                    .name("ix_games_status_phase")
                    .table(Games::Table)
                    .col(Games::Status)
                    .col(Games::TurnPhase)
                    .to_owned(),
            )
            .await?;

        // game_moves table
        manager
            .create_table(
                Table::create()
                    .table(GameMoves::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameMoves::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(GameMoves::GameId).big_integer().not_null())
                    .col(ColumnDef::new(GameMoves::RoundNumber).integer().not_null())
                    .col(ColumnDef::new(GameMoves::PlayerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GameMoves::MoveType)
                            .string_len(ENUM_LEN)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GameMoves::TrickName).string_len(120).null())
                    .col(ColumnDef::new(GameMoves::ClipRef).text().not_null())
                    .col(
                        ColumnDef::new(GameMoves::Result)
                            .string_len(ENUM_LEN)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(GameMoves::AttackerVote)
                            .string_len(ENUM_LEN)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GameMoves::DefenderVote)
                            .string_len(ENUM_LEN)
                            .null(),
                    )
                    .col(ColumnDef::new(GameMoves::JudgedBy).big_integer().null())
                    .col(
                        ColumnDef::new(GameMoves::TimedOut)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GameMoves::AutoResolved)
                            .string_len(ENUM_LEN)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GameMoves::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameMoves::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_moves_game_id")
                            .from(GameMoves::Table, GameMoves::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_game_moves_game_round")
                    .table(GameMoves::Table)
                    .col(GameMoves::GameId)
                    .col(GameMoves::RoundNumber)
                    .to_owned(),
            )
            .await?;

        // game_disputes table
        manager
            .create_table(
                Table::create()
                    .table(GameDisputes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameDisputes::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(GameDisputes::GameId).big_integer().not_null())
                    .col(ColumnDef::new(GameDisputes::TurnId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GameDisputes::DisputedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameDisputes::AgainstPlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameDisputes::OriginalResult)
                            .string_len(ENUM_LEN)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameDisputes::FinalResult)
                            .string_len(ENUM_LEN)
                            .null(),
                    )
                    .col(ColumnDef::new(GameDisputes::ResolvedBy).big_integer().null())
                    .col(
                        ColumnDef::new(GameDisputes::ResolvedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GameDisputes::PenaltyAppliedTo)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GameDisputes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_disputes_game_id")
                            .from(GameDisputes::Table, GameDisputes::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_disputes_turn_id")
                            .from(GameDisputes::Table, GameDisputes::TurnId)
                            .to(GameMoves::Table, GameMoves::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // one dispute per player per game
        manager
            .create_index(
                Index::create()
                    .name("ux_game_disputes_game_player")
                    .table(GameDisputes::Table)
                    .col(GameDisputes::GameId)
                    .col(GameDisputes::DisputedBy)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // player_reputation table
        manager
            .create_table(
                Table::create()
                    .table(PlayerReputation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlayerReputation::PlayerId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PlayerReputation::PenaltyCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlayerReputation::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(PlayerReputation::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ux_game_disputes_game_player")
                    .table(GameDisputes::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(GameDisputes::Table).if_exists().to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_game_moves_game_round")
                    .table(GameMoves::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(GameMoves::Table).if_exists().to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_games_status_phase")
                    .table(Games::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Games::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
