use actix_web::web;

use crate::middleware::AuthGate;

pub mod auth;
pub mod health;
pub mod posts;
pub mod user;

/// Register every route. Shared by `main` and the HTTP tests so both see
/// the same gating.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes))
        .service(
            web::scope("/api/user")
                .wrap(AuthGate)
                .configure(user::configure_routes),
        )
        .service(web::scope("/api/blog").configure(posts::configure_routes))
        .service(web::scope("/api").configure(auth::configure_routes));
}
