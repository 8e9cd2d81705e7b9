//! Player reputation routes.

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::services::games::GameService;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct ReputationResponse {
    player_id: i64,
    penalty_count: i32,
}

/// GET /api/players/{player_id}/reputation
async fn get_reputation(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let player_id = path.into_inner();
    let penalty_count = GameService::penalty_count(&app_state, player_id).await?;
    Ok(HttpResponse::Ok().json(ReputationResponse {
        player_id,
        penalty_count,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{player_id}/reputation").route(web::get().to(get_reputation)));
}
