//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: domain wiring (store, IBAN generator, clock)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and their mapping to domain commands
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use tally_auth::{Hs256JwtValidator, RouteTable};
use tally_core::SystemClock;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    with_services(config, services::build_services(config))
}

/// Same router over a caller-provided store.
pub fn build_app_with_store(config: &ApiConfig, store: services::SharedStore) -> Router {
    with_services(config, services::build_services_with_store(config, store))
}

fn with_services(config: &ApiConfig, services: services::AppServices) -> Router {
    let auth_state = middleware::AuthState {
        jwt: Arc::new(Hs256JwtValidator::new(config.jwt_secret.clone().into_bytes())),
        routes: Arc::new(RouteTable::account_api()),
        clock: Arc::new(SystemClock),
    };

    routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            ))
            .layer(Extension(Arc::new(services))),
    )
}
