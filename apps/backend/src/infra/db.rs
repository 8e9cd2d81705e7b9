//! Connection management and bootstrap (connect + migrate).

use std::future::Future;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use migration::MigrationCommand;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector, SqlxSqliteConnector};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::{info, warn};

use crate::config::db::{db_url, sqlite_path, DbKind, RuntimeEnv};
use crate::error::AppError;

const SQLITE_BUSY_TIMEOUT_MS: u32 = 5_000;
const PG_STATEMENT_TIMEOUT: &str = "15s";
const PG_IDLE_IN_TXN_TIMEOUT: &str = "60s";
const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_MS: u64 = 500;

/// Get database engine name for logging
fn db_engine(db_kind: DbKind) -> &'static str {
    match db_kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

/// Ordered session-level SQL statements applied to every new connection.
fn session_statements(db_kind: DbKind) -> Vec<String> {
    match db_kind {
        DbKind::SqliteFile | DbKind::SqliteMemory => vec![
            "PRAGMA foreign_keys = ON;".to_string(),
            format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS};"),
        ],
        DbKind::Postgres => vec![
            "SET application_name = 'skate-backend';".to_string(),
            "SET timezone = 'UTC';".to_string(),
            format!("SET statement_timeout = '{PG_STATEMENT_TIMEOUT}';"),
            format!("SET idle_in_transaction_session_timeout = '{PG_IDLE_IN_TXN_TIMEOUT}';"),
        ],
    }
}

/// Retry a connection attempt with fixed interval delays.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection retry succeeded");
                }
                return Ok(result);
            }
            Err(e) if attempt < max_attempts => {
                warn!(attempt, max_attempts, interval_ms, error = %e, "connection attempt failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn connect_err(e: sqlx::Error) -> AppError {
    AppError::db(format!("could not open database pool: {e}"))
}

/// Opens a pooled connection for `kind`. Does NOT run migrations.
pub async fn connect_db(env: RuntimeEnv, kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let url = db_url(env, kind)?;

    let conn = match kind {
        DbKind::Postgres => {
            let max_connections = (num_cpus::get() as u32 * 2).clamp(4, 32);
            let pool = retry_connection(
                || {
                    let url = url.clone();
                    async move {
                        PgPoolOptions::new()
                            .max_connections(max_connections)
                            .min_connections(1)
                            .acquire_timeout(Duration::from_secs(5))
                            .after_connect(|conn, _meta| {
                                Box::pin(async move {
                                    for stmt in session_statements(DbKind::Postgres) {
                                        sqlx::query(&stmt).execute(&mut *conn).await?;
                                    }
                                    Ok(())
                                })
                            })
                            .connect(&url)
                            .await
                            .map_err(connect_err)
                    }
                },
                CONNECT_ATTEMPTS,
                CONNECT_RETRY_MS,
            )
            .await?;
            SqlxPostgresConnector::from_sqlx_postgres_pool(pool)
        }
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            let mut options = SqliteConnectOptions::from_str(&url).map_err(connect_err)?;
            if kind == DbKind::SqliteFile {
                let path = sqlite_path(env);
                if let Some(parent) = Path::new(&path).parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::config(format!("cannot create sqlite directory {}: {e}", parent.display()))
                    })?;
                }
                options = options
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal);
            }

            // A single long-lived connection: in-memory databases live only as
            // long as their connection, and SQLite allows one writer anyway.
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .after_connect(|conn, _meta| {
                    Box::pin(async move {
                        for stmt in session_statements(DbKind::SqliteMemory) {
                            sqlx::query(&stmt).execute(&mut *conn).await?;
                        }
                        Ok(())
                    })
                })
                .connect_with(options)
                .await
                .map_err(connect_err)?;
            SqlxSqliteConnector::from_sqlx_sqlite_pool(pool)
        }
    };

    info!(engine = db_engine(kind), ?env, "database connected");
    Ok(conn)
}

/// Connects and brings the schema up to date.
pub async fn bootstrap_db(env: RuntimeEnv, kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(env, kind).await?;
    migration::migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("migration failed: {e}")))?;
    Ok(conn)
}
