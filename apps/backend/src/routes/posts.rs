use actix_web::{guard, web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{CurrentUser, PostId, UserIdParam, ValidatedJson};
use crate::middleware::AuthGate;
use crate::repos::posts::{OwnershipStamp, Post};
use crate::services::posts::{self, PostDraft};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct StampResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub fullname: String,
    #[serde(serialize_with = "time::serde::rfc3339::serialize")]
    pub at: OffsetDateTime,
}

impl From<OwnershipStamp> for StampResponse {
    fn from(stamp: OwnershipStamp) -> Self {
        Self {
            id: stamp.id,
            email: stamp.email,
            fullname: stamp.fullname,
            at: stamp.at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub header: String,
    pub content: String,
    pub category: Vec<String>,
    #[serde(rename = "createdBy")]
    pub created_by: StampResponse,
    #[serde(rename = "updatedBy", skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<StampResponse>,
    #[serde(rename = "isDeleted")]
    pub is_deleted: bool,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            header: post.header,
            content: post.content,
            category: post.category,
            created_by: post.created_by.into(),
            updated_by: post.updated_by.map(Into::into),
            is_deleted: post.is_deleted,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: Vec<String>,
}

impl From<PostRequest> for PostDraft {
    fn from(req: PostRequest) -> Self {
        Self {
            header: req.header,
            content: req.content,
            category: req.category,
        }
    }
}

fn many(posts: Vec<Post>) -> HttpResponse {
    let body: Vec<PostResponse> = posts.into_iter().map(PostResponse::from).collect();
    HttpResponse::Ok().json(body)
}

async fn list(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(many(app_state.posts.list().await?))
}

async fn get_one(id: PostId, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let post = posts::get(app_state.posts.as_ref(), id.0).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

async fn by_owner(
    owner: UserIdParam,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(many(app_state.posts.list_by_owner(owner.0).await?))
}

async fn by_category(
    category: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(many(app_state.posts.list_by_category(&category).await?))
}

async fn create(
    current_user: CurrentUser,
    body: ValidatedJson<PostRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let post = posts::create(
        app_state.posts.as_ref(),
        &current_user,
        body.into_inner().into(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

async fn update(
    id: PostId,
    current_user: CurrentUser,
    body: ValidatedJson<PostRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let post = posts::update(
        app_state.posts.as_ref(),
        &current_user,
        id.0,
        body.into_inner().into(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

async fn delete(
    id: PostId,
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let post = posts::delete(app_state.posts.as_ref(), &current_user, id.0).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// Routes under `/api/blog`. Reads are public; writes go through `AuthGate`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").guard(guard::Get()).to(list))
        .service(
            web::resource("")
                .guard(guard::Post())
                .wrap(AuthGate)
                .to(create),
        )
        .service(web::resource("/user/{user_id}").route(web::get().to(by_owner)))
        .service(web::resource("/category/{category}").route(web::get().to(by_category)))
        .service(web::resource("/{id}").guard(guard::Get()).to(get_one))
        .service(
            web::resource("/{id}")
                .guard(guard::Any(guard::Put()).or(guard::Delete()))
                .wrap(AuthGate)
                .route(web::put().to(update))
                .route(web::delete().to(delete)),
        );
}
