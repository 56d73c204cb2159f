// Unit tests for error mapping - pure logic without HTTP server or database
use actix_web::ResponseError;

use crate::auth::{AuthError, ExternalFlowError};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::errors::ErrorCode;

#[test]
fn maps_validation_to_400() {
    let app: AppError = DomainError::validation("bad field").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn maps_conflicts() {
    let unique = DomainError::conflict(ConflictKind::UniqueEmail, "email exists");
    let app: AppError = unique.into();
    assert_eq!(app.code().as_str(), "EMAIL_TAKEN");
    assert_eq!(app.status().as_u16(), 409);

    let other = DomainError::conflict(ConflictKind::Unique, "generic conflict");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::not_found(NotFoundKind::Post, "no post").into();
    assert_eq!(app.code().as_str(), "POST_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);
}

#[test]
fn maps_infra() {
    let app: AppError = DomainError::infra(InfraErrorKind::Timeout, "timeout").into();
    assert_eq!(app.code().as_str(), "DB_TIMEOUT");
    assert_eq!(app.status().as_u16(), 504);

    let app: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 503);

    let app: AppError = DomainError::infra(InfraErrorKind::Database, "boom").into();
    assert_eq!(app.code().as_str(), "DB_ERROR");
    assert_eq!(app.status().as_u16(), 500);
}

#[test]
fn maps_auth_errors() {
    let app: AppError = AuthError::Unauthenticated.into();
    assert_eq!(app.code(), ErrorCode::Unauthorized);
    assert_eq!(app.status().as_u16(), 401);

    let app: AppError = AuthError::Unauthorized.into();
    assert_eq!(app.code(), ErrorCode::NotOwner);
    assert_eq!(app.status().as_u16(), 403);

    let app: AppError = AuthError::InvalidCredentials.into();
    assert_eq!(app.code(), ErrorCode::InvalidCredentials);
    assert_eq!(app.status().as_u16(), 401);

    let app: AppError = AuthError::ConflictingIdentity.into();
    assert_eq!(app.code(), ErrorCode::EmailTaken);
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError = AuthError::FatalConfiguration("empty secret".into()).into();
    assert_eq!(app.code(), ErrorCode::ConfigError);
    assert_eq!(app.status().as_u16(), 500);
}

#[test]
fn maps_external_flow_errors_to_500() {
    let cases = [
        (ExternalFlowError::InvalidState, "OAUTH_INVALID_STATE"),
        (ExternalFlowError::MissingCode, "OAUTH_MISSING_CODE"),
        (
            ExternalFlowError::ExchangeFailed("timeout".into()),
            "OAUTH_EXCHANGE_FAILED",
        ),
        (
            ExternalFlowError::ProfileFetchFailed("no email".into()),
            "OAUTH_PROFILE_FETCH_FAILED",
        ),
    ];
    for (flow, code) in cases {
        let app: AppError = AuthError::External(flow).into();
        assert_eq!(app.code().as_str(), code);
        assert_eq!(app.status().as_u16(), 500);
    }
}

#[test]
fn unauthorized_response_carries_bearer_challenge() {
    let resp = AppError::Unauthorized.error_response();
    assert_eq!(resp.status().as_u16(), 401);
    assert_eq!(
        resp.headers()
            .get("www-authenticate")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );
    assert!(resp.headers().contains_key("x-trace-id"));
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/problem+json")
    );
}

#[test]
fn forbidden_response_has_no_bearer_challenge() {
    let resp = AppError::from(AuthError::Unauthorized).error_response();
    assert_eq!(resp.status().as_u16(), 403);
    assert!(!resp.headers().contains_key("www-authenticate"));
}
