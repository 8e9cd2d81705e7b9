use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;

/// Header carrying the caller's player id, set by the upstream identity layer.
pub const CALLER_ID_HEADER: &str = "x-caller-id";

/// Authenticated player id of the caller.
///
/// Identity is established upstream; this only checks the header is present
/// and well formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub i64);

impl FromRequest for CallerId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_caller(req))
    }
}

fn parse_caller(req: &HttpRequest) -> Result<CallerId, AppError> {
    let raw = req
        .headers()
        .get(CALLER_ID_HEADER)
        .ok_or_else(|| AppError::unauthorized("Missing caller identity"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Caller identity is not valid text"))?;

    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(CallerId(id)),
        _ => Err(AppError::unauthorized("Caller identity must be a positive player id")),
    }
}
