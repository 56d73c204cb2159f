use std::time::SystemTime;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::user::AccountResponse;
use crate::auth::oauth::{ExternalIdentityBridge, STATE_COOKIE};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::ValidatedJson;
use crate::services::users::{login, register, Registration};
use crate::state::app_state::AppState;

const STATE_COOKIE_PATH: &str = "/api";
const STATE_COOKIE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub fullname: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ExternalLoginResponse {
    pub token: String,
    /// Provider profile JSON, passed through as a string.
    #[serde(rename = "userDetail")]
    pub user_detail: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub state: Option<String>,
    pub code: Option<String>,
}

async fn login_handler(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { email, password } = body.into_inner();
    let token = login(
        app_state.users.as_ref(),
        &app_state.passwords,
        &app_state.security,
        &email,
        password,
        SystemTime::now(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

async fn register_handler(
    body: ValidatedJson<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let RegisterRequest {
        email,
        password,
        fullname,
    } = body.into_inner();
    let account = register(
        app_state.users.as_ref(),
        &app_state.passwords,
        Registration {
            email,
            password,
            fullname,
        },
    )
    .await?;
    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

fn bridge(app_state: &AppState) -> Result<&ExternalIdentityBridge, AppError> {
    app_state.identity.as_ref().ok_or_else(|| {
        AppError::not_found(ErrorCode::OauthDisabled, "External login is not configured")
    })
}

fn state_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build(STATE_COOKIE, value)
        .path(STATE_COOKIE_PATH)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::minutes(STATE_COOKIE_TTL_MINUTES))
        .finish()
}

async fn login_google(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let request = bridge(&app_state)?.begin();
    Ok(HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, request.url))
        .cookie(state_cookie(request.state, app_state.cookie_secure))
        .finish())
}

fn spent_state_cookie(secure: bool) -> Cookie<'static> {
    let mut spent = state_cookie(String::new(), secure);
    spent.make_removal();
    spent
}

/// The state is single-use: every answer from the bridge, success or
/// failure, clears the cookie so a failed flow restarts from the redirect.
async fn callback_google(
    req: HttpRequest,
    query: web::Query<CallbackQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let expected = req.cookie(STATE_COOKIE).map(|c| c.value().to_string());
    let outcome = bridge(&app_state)?
        .complete(
            expected.as_deref(),
            query.state.as_deref(),
            query.code.as_deref(),
            app_state.users.as_ref(),
            &app_state.security,
            SystemTime::now(),
        )
        .await;
    let spent = spent_state_cookie(app_state.cookie_secure);

    match outcome {
        Ok(external) => Ok(HttpResponse::Ok().cookie(spent).json(ExternalLoginResponse {
            token: external.token,
            user_detail: external.raw_profile,
        })),
        Err(err) => {
            let mut resp = AppError::from(err).error_response();
            if let Err(e) = resp.add_cookie(&spent) {
                warn!(error = %e, "Could not clear OAuth state cookie");
            }
            Ok(resp)
        }
    }
}

/// Public authentication endpoints under `/api`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login_handler)))
        .service(web::resource("/register").route(web::post().to(register_handler)))
        .service(web::resource("/login-google").route(web::get().to(login_google)))
        .service(web::resource("/callback-google").route(web::get().to(callback_google)));
}
