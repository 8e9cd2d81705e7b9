use actix_web::web;

pub mod games;
pub mod health;
pub mod players;

/// Registers every route. Shared by `main.rs` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Games: /api/games/**
    cfg.service(web::scope("/api/games").configure(games::configure_routes));

    // Players: /api/players/**
    cfg.service(web::scope("/api/players").configure(players::configure_routes));
}
