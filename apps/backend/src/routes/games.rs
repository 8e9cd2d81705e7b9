//! Game-related HTTP routes.

use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::{CallerId, GameId, ValidatedJson};
use crate::protocol::commands::{GameCommand, ProposeGame};
use crate::services::commands::CommandService;
use crate::services::games::GameService;
use crate::state::app_state::AppState;

/// POST /api/games
///
/// The caller challenges `player2_id`; the game waits for them to join.
async fn propose_game(
    caller: CallerId,
    body: ValidatedJson<ProposeGame>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game = GameService::propose(&app_state, caller.0, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(game))
}

/// GET /api/games/{game_id}
async fn get_game(
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game = GameService::get_game(&app_state, game_id.0).await?;
    Ok(HttpResponse::Ok().json(game))
}

/// GET /api/games/{game_id}/moves
async fn list_moves(
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let moves = GameService::list_moves(&app_state, game_id.0).await?;
    Ok(HttpResponse::Ok().json(moves))
}

/// GET /api/games/{game_id}/disputes/{dispute_id}
async fn get_dispute(
    game_id: GameId,
    path: web::Path<(i64, i64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (_, dispute_id) = path.into_inner();
    let dispute = GameService::get_dispute(&app_state, game_id.0, dispute_id).await?;
    Ok(HttpResponse::Ok().json(dispute))
}

/// POST /api/games/{game_id}/commands
///
/// Applies one command. A retried command with a known `idempotency_key`
/// answers with the original ids and `"duplicate": true`.
async fn post_command(
    caller: CallerId,
    game_id: GameId,
    body: ValidatedJson<GameCommand>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let reply = CommandService::execute(&app_state, caller.0, game_id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reply))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(propose_game)));
    cfg.service(web::resource("/{game_id}").route(web::get().to(get_game)));
    cfg.service(web::resource("/{game_id}/moves").route(web::get().to(list_moves)));
    cfg.service(
        web::resource("/{game_id}/disputes/{dispute_id}").route(web::get().to(get_dispute)),
    );
    cfg.service(web::resource("/{game_id}/commands").route(web::post().to(post_command)));
}
