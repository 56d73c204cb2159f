mod common;
mod support;

use std::sync::Arc;
use std::time::SystemTime;

use actix_web::cookie::time::Duration;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use backend_test_support::unique_helpers::unique_email;
use common::ok_json;
use quill_backend::auth::oauth::STATE_COOKIE;
use quill_backend::{verify_access_token, ExternalIdentityBridge};
use support::fake_provider::FakeProvider;
use support::flows::register;
use support::{create_test_app, memory_state};

fn clears_state_cookie<B>(resp: &ServiceResponse<B>) -> bool {
    resp.response().cookies().any(|c| {
        c.name() == STATE_COOKIE && c.value().is_empty() && c.max_age() == Some(Duration::ZERO)
    })
}

fn with_provider(provider: Arc<FakeProvider>) -> quill_backend::AppState {
    memory_state()
        .with_identity(ExternalIdentityBridge::new(provider))
        .with_cookie_secure(false)
}

#[actix_web::test]
async fn login_google_redirects_and_sets_state_cookie() {
    let provider = Arc::new(FakeProvider::for_email("g@example.test"));
    let app = create_test_app(with_provider(provider)).build().await;

    let req = test::TestRequest::get().uri("/api/login-google").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == STATE_COOKIE)
        .expect("state cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert!(location.ends_with(&format!("state={}", cookie.value())));
}

#[actix_web::test]
async fn callback_with_mismatched_state_never_reaches_provider() {
    let provider = Arc::new(FakeProvider::for_email("g@example.test"));
    let app = create_test_app(with_provider(provider.clone())).build().await;

    let req = test::TestRequest::get()
        .uri("/api/callback-google?state=forged&code=abc")
        .cookie(Cookie::new(STATE_COOKIE, "issued"))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "OAUTH_INVALID_STATE",
        StatusCode::INTERNAL_SERVER_ERROR,
        Some("Invalid state"),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/callback-google?state=issued&code=abc")
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "OAUTH_INVALID_STATE",
        StatusCode::INTERNAL_SERVER_ERROR,
        None,
    )
    .await;

    assert_eq!(provider.calls(), 0);
}

#[actix_web::test]
async fn callback_without_code_is_rejected() {
    let provider = Arc::new(FakeProvider::for_email("g@example.test"));
    let app = create_test_app(with_provider(provider.clone())).build().await;

    let req = test::TestRequest::get()
        .uri("/api/callback-google?state=issued")
        .cookie(Cookie::new(STATE_COOKIE, "issued"))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "OAUTH_MISSING_CODE",
        StatusCode::INTERNAL_SERVER_ERROR,
        Some("Code not found."),
    )
    .await;
    assert_eq!(provider.calls(), 0);
}

#[actix_web::test]
async fn profile_failure_is_reported_and_spends_state() {
    let provider = Arc::new(FakeProvider::failing_profile("g@example.test"));
    let app = create_test_app(with_provider(provider)).build().await;

    let req = test::TestRequest::get()
        .uri("/api/callback-google?state=s1&code=abc")
        .cookie(Cookie::new(STATE_COOKIE, "s1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(clears_state_cookie(&resp), "failed callback must clear the state cookie");
    assert_problem_details(
        resp,
        "OAUTH_PROFILE_FETCH_FAILED",
        StatusCode::INTERNAL_SERVER_ERROR,
        Some("Failed to fetch user profile"),
    )
    .await;
}

#[actix_web::test]
async fn successful_callback_reuses_account_with_same_email() {
    let email = unique_email("merge");
    let provider = Arc::new(FakeProvider::for_email(&email));
    let state = with_provider(provider.clone());
    let security = state.security.clone();
    let app = create_test_app(state).build().await;
    let account = register(&app, &email, "Password User").await;

    let req = test::TestRequest::get()
        .uri("/api/callback-google?state=s1&code=abc")
        .cookie(Cookie::new(STATE_COOKIE, "s1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(clears_state_cookie(&resp));
    let body = ok_json(resp).await;

    assert_eq!(body["userDetail"], provider.raw_profile());
    let claims =
        verify_access_token(body["token"].as_str().unwrap(), SystemTime::now(), &security).unwrap();
    assert_eq!(claims.sub, account["_id"].as_str().unwrap());
    assert_eq!(claims.fullname, "Password User");
    assert_eq!(provider.calls(), 2);
}

#[actix_web::test]
async fn external_login_disabled_without_provider() {
    let app = create_test_app(memory_state()).build().await;
    let req = test::TestRequest::get().uri("/api/login-google").to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "OAUTH_DISABLED",
        StatusCode::NOT_FOUND,
        None,
    )
    .await;
}
