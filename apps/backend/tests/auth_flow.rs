mod common;
mod support;

use std::time::SystemTime;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use backend_test_support::unique_helpers::unique_email;
use quill_backend::verify_access_token;
use serde_json::json;
use support::flows::{login, register, PASSWORD};
use support::{create_test_app, memory_state};

#[actix_web::test]
async fn register_then_login_issues_token_for_account() {
    let state = memory_state();
    let security = state.security.clone();
    let app = create_test_app(state).build().await;
    let email = unique_email("writer");

    let account = register(&app, &email, "  Ada Writer ").await;
    assert_eq!(account["email"], email);
    assert_eq!(account["fullname"], "Ada Writer");
    assert!(account["_id"].is_string());
    assert!(account["createdAt"].is_string());
    assert!(account.get("password").is_none());
    assert!(account.get("password_hash").is_none());

    let token = login(&app, &email).await;
    let claims = verify_access_token(&token, SystemTime::now(), &security).unwrap();
    assert_eq!(claims.email, email);
    assert_eq!(claims.fullname, "Ada Writer");
    assert_eq!(claims.sub, account["_id"].as_str().unwrap());
    assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
}

#[actix_web::test]
async fn login_normalizes_email_case() {
    let app = create_test_app(memory_state()).build().await;
    let email = unique_email("case");
    register(&app, &email.to_uppercase(), "Case").await;

    let token = login(&app, &email).await;
    assert!(!token.is_empty());
}

#[actix_web::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = create_test_app(memory_state()).build().await;
    let email = unique_email("writer");
    register(&app, &email, "Writer").await;

    for (email, password) in [(email.as_str(), "wrong-one"), ("nobody@example.test", PASSWORD)] {
        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details(
            resp,
            "INVALID_CREDENTIALS",
            StatusCode::UNAUTHORIZED,
            Some("Wrong email or password"),
        )
        .await;
    }
}

#[actix_web::test]
async fn duplicate_registration_is_a_conflict() {
    let app = create_test_app(memory_state()).build().await;
    let email = unique_email("dup");
    register(&app, &email, "First").await;

    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({ "email": email, "password": "another1", "fullname": "Second" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(
        resp,
        "EMAIL_TAKEN",
        StatusCode::CONFLICT,
        Some("The email provided is already taken"),
    )
    .await;
}

#[actix_web::test]
async fn registration_form_is_validated() {
    let app = create_test_app(memory_state()).build().await;
    let cases = [
        (json!({ "email": "not-an-email", "password": PASSWORD, "fullname": "X" }), "INVALID_EMAIL"),
        (json!({ "email": unique_email("short"), "password": "12345", "fullname": "X" }), "INVALID_PASSWORD"),
        (json!({ "email": unique_email("noname"), "password": PASSWORD, "fullname": "  " }), "INVALID_FULLNAME"),
    ];

    for (body, code) in cases {
        let req = test::TestRequest::post()
            .uri("/api/register")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details(resp, code, StatusCode::BAD_REQUEST, None).await;
    }
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let app = create_test_app(memory_state()).build().await;
    let req = test::TestRequest::post()
        .uri("/api/login")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"email": "a@x.com", "password": "#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let problem = assert_problem_details(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, None).await;
    assert!(problem.detail.starts_with("Invalid JSON"));
}
