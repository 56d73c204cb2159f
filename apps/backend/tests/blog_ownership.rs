mod common;
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use backend_test_support::unique_helpers::unique_email;
use common::ok_json;
use serde_json::{json, Value};
use support::flows::{bearer, signed_in};
use support::{create_test_app, memory_state};

fn post_body(header: &str) -> Value {
    json!({ "header": header, "content": "Body text", "category": ["rust", "web"] })
}

#[actix_web::test]
async fn writes_require_authentication_but_reads_do_not() {
    let app = create_test_app(memory_state()).build().await;

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .set_json(post_body("Anon"))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "UNAUTHORIZED",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;

    let req = test::TestRequest::get().uri("/api/blog").to_request();
    assert_eq!(ok_json(test::call_service(&app, req).await).await, json!([]));
}

#[actix_web::test]
async fn owner_creates_updates_and_deletes() {
    let app = create_test_app(memory_state()).build().await;
    let email = unique_email("owner");
    let (account, token) = signed_in(&app, &email).await;

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .insert_header(bearer(&token))
        .set_json(post_body("First post"))
        .to_request();
    let post = ok_json(test::call_service(&app, req).await).await;
    assert_eq!(post["createdBy"]["_id"], account["_id"]);
    assert_eq!(post["createdBy"]["email"], email);
    assert_eq!(post["category"], json!(["rust", "web"]));
    assert_eq!(post["isDeleted"], false);
    assert!(post.get("updatedBy").is_none());
    let id = post["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/blog/{id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "header": "Edited" }))
        .to_request();
    let edited = ok_json(test::call_service(&app, req).await).await;
    assert_eq!(edited["header"], "Edited");
    assert_eq!(edited["content"], "Body text");
    assert_eq!(edited["updatedBy"]["_id"], account["_id"]);

    let req = test::TestRequest::get()
        .uri("/api/blog/category/rust")
        .to_request();
    let tagged = ok_json(test::call_service(&app, req).await).await;
    assert_eq!(tagged.as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blog/{id}"))
        .insert_header(bearer(&token))
        .to_request();
    let deleted = ok_json(test::call_service(&app, req).await).await;
    assert_eq!(deleted["isDeleted"], true);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blog/{id}"))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "POST_NOT_FOUND",
        StatusCode::NOT_FOUND,
        None,
    )
    .await;
}

#[actix_web::test]
async fn non_owner_is_forbidden_and_post_is_untouched() {
    let app = create_test_app(memory_state()).build().await;
    let (owner, owner_token) = signed_in(&app, &unique_email("owner")).await;
    let (_, intruder_token) = signed_in(&app, &unique_email("intruder")).await;

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .insert_header(bearer(&owner_token))
        .set_json(post_body("Mine"))
        .to_request();
    let post = ok_json(test::call_service(&app, req).await).await;
    let id = post["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/blog/{id}"))
        .insert_header(bearer(&intruder_token))
        .set_json(json!({ "header": "Hijacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.headers().get("www-authenticate").is_none());
    assert_problem_details(
        resp,
        "NOT_OWNER",
        StatusCode::FORBIDDEN,
        Some("You are not permitted to modify this resource"),
    )
    .await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blog/{id}"))
        .insert_header(bearer(&intruder_token))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "NOT_OWNER",
        StatusCode::FORBIDDEN,
        None,
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/blog/{id}"))
        .to_request();
    let current = ok_json(test::call_service(&app, req).await).await;
    assert_eq!(current["header"], "Mine");
    assert_eq!(current["isDeleted"], false);

    let owner_id = owner["_id"].as_str().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/blog/user/{owner_id}"))
        .to_request();
    let listed = ok_json(test::call_service(&app, req).await).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn malformed_ids_and_empty_updates_are_bad_requests() {
    let app = create_test_app(memory_state()).build().await;
    let (_, token) = signed_in(&app, &unique_email("ids")).await;

    let req = test::TestRequest::get().uri("/api/blog/not-a-uuid").to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "INVALID_ID",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/blog/user/not-a-uuid")
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "INVALID_ID",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .insert_header(bearer(&token))
        .set_json(post_body("To edit"))
        .to_request();
    let post = ok_json(test::call_service(&app, req).await).await;
    let id = post["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/blog/{id}"))
        .insert_header(bearer(&token))
        .set_json(json!({}))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "NOTHING_TO_UPDATE",
        StatusCode::BAD_REQUEST,
        Some("Nothing to update"),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .insert_header(bearer(&token))
        .set_json(json!({ "header": "No body" }))
        .to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        "VALIDATION_ERROR",
        StatusCode::BAD_REQUEST,
        Some("Content is required."),
    )
    .await;
}
