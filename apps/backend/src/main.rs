use actix_web::{web, App, HttpServer};
use skate_backend::config::db::{DbKind, RuntimeEnv};
use skate_backend::infra::state::build_state;
use skate_backend::routes;
use skate_backend::services::JudgingTimeoutScheduler;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or sourced manually for local dev).
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });
    let db_kind = match std::env::var("SKATE_DB_KIND") {
        Ok(raw) => raw.parse::<DbKind>().unwrap_or_else(|e| {
            eprintln!("SKATE_DB_KIND is invalid: {e}");
            std::process::exit(1);
        }),
        Err(_) => DbKind::Postgres,
    };

    let app_state = match build_state()
        .with_env(RuntimeEnv::Prod)
        .with_db(db_kind)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };
    info!(?db_kind, "database connected");

    let scheduler = JudgingTimeoutScheduler::new(app_state.clone());
    scheduler.start();

    let data = web::Data::new(app_state);

    info!(%host, port, "starting skate backend");
    let result = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await;

    scheduler.stop().await;
    info!("shutdown complete");
    result
}
