//! API-side authorization guard for requests.
//!
//! Translates the HTTP request line into the transport-agnostic gate inputs,
//! keeping `tally-auth` free of any axum types.

use axum::http::Method;

use tally_auth::{AuthzError, JwtClaims, RequestMethod, RouteTable, authorize_request};

/// Check a request against the route table before it reaches a handler.
pub fn authorize_route(
    table: &RouteTable,
    method: &Method,
    path: &str,
    claims: Option<&JwtClaims>,
) -> Result<(), AuthzError> {
    authorize_request(table, RequestMethod::parse(method.as_str()), path, claims)
}
