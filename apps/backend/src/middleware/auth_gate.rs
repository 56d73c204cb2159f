//! Bearer authentication for protected routes.
//!
//! Verifies the `Authorization` header, loads the subject's live account once
//! and stores a [`CurrentUser`] in the request extensions. Every failure is
//! the same 401 problem response; the cause is only logged.

use std::rc::Rc;
use std::time::SystemTime;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::{debug, error};

use crate::auth::jwt::verify_bearer_header;
use crate::auth::AuthError;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::state::app_state::AppState;

pub struct AuthGate;

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthGateMiddleware<S> {
    service: Rc<S>,
}

async fn resolve(state: &AppState, raw_header: Option<&str>) -> Result<CurrentUser, AppError> {
    let raw = raw_header.ok_or_else(|| {
        debug!("Missing Authorization header");
        AuthError::Unauthenticated
    })?;
    let claims = verify_bearer_header(raw, SystemTime::now(), &state.security)?;
    let subject = claims.subject_id()?;

    let account = state.users.find_by_id(subject).await?.ok_or_else(|| {
        debug!(user_id = %subject, "Token subject has no live account");
        AuthError::Unauthenticated
    })?;
    Ok(CurrentUser::from(&account))
}

impl<S, B> Service<ServiceRequest> for AuthGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                error!("AppState missing from app data");
                let err = AppError::config("Server configuration error");
                return Ok(req.error_response(err).map_into_right_body());
            };

            let raw = req
                .headers()
                .get(header::AUTHORIZATION)
                .map(|v| v.to_str().unwrap_or_default().to_string());

            match resolve(&state, raw.as_deref()).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}
