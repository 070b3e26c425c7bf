use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use tally_core::AccountId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::ClientContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_account))
        .route("/:id", put(close_account).get(get_account))
        .route("/:id/transactions", get(list_transactions))
}

pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(client): Extension<ClientContext>,
    body: Result<Json<dto::CreateAccountRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text());
        }
    };

    tracing::info!(client_id = ?client.client_id().map(|c| c.as_str()), "create account request");

    let cmd = match body.into_command() {
        Ok(cmd) => cmd,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.open_account(cmd) {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn close_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };

    match services.close_account(id) {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };

    match services.get_account(id) {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(params): Query<dto::TransactionsParams>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };

    let (frame, interval) = match params.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.list_transactions(id, frame, interval) {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

fn parse_id(raw: &str) -> Result<AccountId, axum::response::Response> {
    raw.parse::<AccountId>()
        .map_err(errors::domain_error_to_response)
}
