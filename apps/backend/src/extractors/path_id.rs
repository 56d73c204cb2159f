use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::error::AppError;
use crate::errors::ErrorCode;

fn parse_segment(req: &HttpRequest, name: &str, label: &str) -> Result<Uuid, AppError> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| AppError::bad_request(ErrorCode::InvalidId, format!("Missing {label} id")))?;
    Uuid::parse_str(raw)
        .map_err(|_| AppError::bad_request(ErrorCode::InvalidId, format!("Invalid {label} id")))
}

/// `{id}` path segment of a post route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostId(pub Uuid);

impl FromRequest for PostId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_segment(req, "id", "blog").map(PostId))
    }
}

/// `{user_id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserIdParam(pub Uuid);

impl FromRequest for UserIdParam {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_segment(req, "user_id", "user").map(UserIdParam))
    }
}
