use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use tally_auth::{AuthzError, JwtClaims, JwtValidator, RouteTable};
use tally_core::Clock;

use crate::app::errors::authz_error_to_response;
use crate::authz::authorize_route;
use crate::context::ClientContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
    pub routes: Arc<RouteTable>,
    pub clock: Arc<dyn Clock>,
}

/// Verify the bearer token (if any), gate the request against the route
/// table and attach the [`ClientContext`] for handlers.
///
/// A token that is present but invalid is rejected even on open routes.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let claims = match verify_bearer(&state, req.headers()) {
        Ok(claims) => claims,
        Err(e) => return authz_error_to_response(e),
    };

    // Nested routers see a stripped URI; the table is written against the full path.
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    if let Err(e) = authorize_route(&state.routes, req.method(), &path, claims.as_ref()) {
        tracing::debug!(method = %req.method(), path = %path, error = %e, "request rejected");
        return authz_error_to_response(e);
    }

    if let Some(claims) = claims {
        req.extensions_mut().insert(ClientContext::from(claims));
    }

    next.run(req).await
}

fn verify_bearer(state: &AuthState, headers: &HeaderMap) -> Result<Option<JwtClaims>, AuthzError> {
    let Some(token) = extract_bearer(headers)? else {
        return Ok(None);
    };

    state
        .jwt
        .validate(token, state.clock.now())
        .map(Some)
        .map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            AuthzError::Unauthenticated
        })
}

/// `Ok(None)` when no `Authorization` header is sent; a header that is not a
/// well-formed bearer credential is an authentication failure.
fn extract_bearer(headers: &HeaderMap) -> Result<Option<&str>, AuthzError> {
    let Some(header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header.to_str().map_err(|_| AuthzError::Unauthenticated)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthzError::Unauthenticated)?
        .trim();

    if token.is_empty() {
        return Err(AuthzError::Unauthenticated);
    }

    Ok(Some(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        h
    }

    #[test]
    fn missing_header_is_anonymous() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Ok(None));
    }

    #[test]
    fn bearer_token_is_trimmed() {
        let h = headers("Bearer  abc.def.ghi ");
        assert_eq!(extract_bearer(&h), Ok(Some("abc.def.ghi")));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_rejected() {
        assert_eq!(extract_bearer(&headers("Basic Zm9vOmJhcg==")), Err(AuthzError::Unauthenticated));
        assert_eq!(extract_bearer(&headers("Bearer ")), Err(AuthzError::Unauthenticated));
    }
}
