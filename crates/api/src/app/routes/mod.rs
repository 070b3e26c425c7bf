use axum::{routing::get, Router};

pub mod accounts;
pub mod system;

/// Router for every endpoint; access rules are applied by the auth middleware.
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .nest("/api/v1/accounts", accounts::router())
}
