use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, Error};
use serde_json::{json, Value};

pub const PASSWORD: &str = "secret1";

/// Register `email` with the default password; returns the account JSON.
pub async fn register<S>(app: &S, email: &str, fullname: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({ "email": email, "password": PASSWORD, "fullname": fullname }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200, "registration failed");
    test::read_body_json(resp).await
}

pub async fn login<S>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200, "login failed");
    let body: Value = test::read_body_json(resp).await;
    body["token"].as_str().expect("token").to_string()
}

/// Register then log in; returns `(account, token)`.
pub async fn signed_in<S>(app: &S, email: &str) -> (Value, String)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let account = register(app, email, "Test Writer").await;
    let token = login(app, email).await;
    (account, token)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
