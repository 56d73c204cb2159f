use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use time::OffsetDateTime;
use tracing::error;
use uuid::Uuid;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::users::Account;

/// Identity resolved by `AuthGate` for the current request.
///
/// Built from the freshly loaded account, not from token claims, so a renamed
/// or re-emailed account is reflected immediately. Carries everything the
/// public account view shows, so handlers never reload the account to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub fullname: String,
    pub created_at: OffsetDateTime,
}

impl From<&Account> for CurrentUser {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            fullname: account.fullname.clone(),
            created_at: account.created_at,
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let found = req.extensions().get::<CurrentUser>().cloned();
        ready(found.ok_or_else(|| {
            // Handler declared CurrentUser but its route is not wrapped by AuthGate.
            error!(path = %req.path(), "CurrentUser requested on a route without AuthGate");
            AppError::internal(ErrorCode::MissingIdentity, "Request identity unavailable")
        }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use actix_web::HttpMessage;

    use super::*;

    #[actix_web::test]
    async fn reads_identity_from_extensions() {
        let user = CurrentUser {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            fullname: "A".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(user.clone());

        let extracted = CurrentUser::extract(&req).await.unwrap();
        assert_eq!(extracted, user);
    }

    #[actix_web::test]
    async fn missing_identity_is_an_internal_error() {
        let req = TestRequest::default().to_http_request();
        let err = CurrentUser::extract(&req).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingIdentity);
        assert_eq!(err.status().as_u16(), 500);
    }
}
