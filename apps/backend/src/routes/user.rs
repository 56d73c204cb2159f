use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::users::Account;
use crate::services::users::{update_profile, ProfileUpdate};
use crate::state::app_state::AppState;

/// Public view of an account. The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub fullname: String,
    #[serde(rename = "createdAt", serialize_with = "time::serde::rfc3339::serialize")]
    pub created_at: OffsetDateTime,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            fullname: account.fullname,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub fullname: Option<String>,
}

impl From<CurrentUser> for AccountResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            fullname: user.fullname,
            created_at: user.created_at,
        }
    }
}

/// Rendered from the identity `AuthGate` already loaded.
async fn get_me(current_user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(AccountResponse::from(current_user))
}

async fn update_me(
    current_user: CurrentUser,
    body: ValidatedJson<UpdateUserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let account = update_profile(
        app_state.users.as_ref(),
        &app_state.passwords,
        current_user.id,
        ProfileUpdate {
            email: body.email,
            password: body.password,
            fullname: body.fullname,
        },
    )
    .await?;
    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

/// Routes under `/api/user`; the caller wraps the scope in `AuthGate`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(get_me))
            .route(web::put().to(update_me)),
    );
}
