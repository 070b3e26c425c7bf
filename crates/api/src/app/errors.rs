use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use tally_auth::AuthzError;
use tally_core::DomainError;
use tally_ledger::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> Response {
    match err {
        LedgerError::Domain(e) => domain_error_to_response(e),
        LedgerError::Store(e) => {
            tracing::error!(error = %e, "account store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation(_) => (StatusCode::BAD_REQUEST, Json(err.messages())).into_response(),
        DomainError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            msg,
        )
            .into_response(),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn authz_error_to_response(err: AuthzError) -> Response {
    match err {
        AuthzError::Unauthenticated => {
            let mut res = json_error(StatusCode::UNAUTHORIZED, "unauthenticated", err.to_string());
            res.headers_mut()
                .insert(header::WWW_AUTHENTICATE, header::HeaderValue::from_static("Bearer"));
            res
        }
        AuthzError::Forbidden(_) => json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string()),
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
