use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use quill_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use quill_backend::routes;
use quill_backend::{AppState, CredentialVerifier, SecurityConfig};

/// In-memory state with a random signing secret.
pub fn memory_state() -> AppState {
    AppState::in_memory(SecurityConfig::for_tests(), CredentialVerifier::new(2))
}

/// Test service with the production routes and request middlewares.
pub struct TestAppBuilder {
    state: AppState,
}

impl TestAppBuilder {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn build(
        self,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
        test::init_service(
            App::new()
                .wrap(StructuredLogger)
                .wrap(TraceSpan)
                .wrap(RequestTrace)
                .app_data(web::Data::new(self.state))
                .configure(routes::configure),
        )
        .await
    }
}

pub fn create_test_app(state: AppState) -> TestAppBuilder {
    TestAppBuilder::new(state)
}
