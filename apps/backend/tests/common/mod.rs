#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use serde_json::Value;

#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Read a JSON body, asserting a 200 first so failures show the error body.
pub async fn ok_json<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status.as_u16(),
        200,
        "unexpected status, body: {}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("JSON body")
}
