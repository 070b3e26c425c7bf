use thiserror::Error;

use crate::routes::{Access, RequestMethod, RouteTable};
use crate::{JwtClaims, Scope};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: missing scope '{0}'")]
    Forbidden(Scope),
}

/// Check that verified claims carry `required`.
pub fn authorize(claims: &JwtClaims, required: &Scope) -> Result<(), AuthzError> {
    if claims.has_scope(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.clone()))
    }
}

/// Gate a request against the access table.
///
/// `claims` are the already verified claims of the bearer token, or `None`
/// when the request carried no token.
///
/// - No IO
/// - No panics
/// - Pure lookup followed by a scope check
pub fn authorize_request(
    table: &RouteTable,
    method: RequestMethod,
    path: &str,
    claims: Option<&JwtClaims>,
) -> Result<(), AuthzError> {
    match (table.resolve(method, path), claims) {
        (Access::PermitAll, _) => Ok(()),
        (_, None) => Err(AuthzError::Unauthenticated),
        (Access::Authenticated, Some(_)) => Ok(()),
        (Access::Scope(scope), Some(claims)) => authorize(claims, scope),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientId;
    use chrono::{Duration, Utc};
    use proptest::prelude::*;

    fn claims_with(scopes: Vec<Scope>) -> JwtClaims {
        let now = Utc::now();
        JwtClaims::issued_to(ClientId::new("client"), scopes, now, Duration::minutes(5))
    }

    #[test]
    fn missing_token_is_unauthenticated() {
        let t = RouteTable::account_api();
        assert_eq!(
            authorize_request(&t, RequestMethod::Post, "/api/v1/accounts", None),
            Err(AuthzError::Unauthenticated)
        );
    }

    #[test]
    fn root_is_open_without_token() {
        let t = RouteTable::account_api();
        assert_eq!(authorize_request(&t, RequestMethod::Get, "/", None), Ok(()));
    }

    #[test]
    fn read_token_cannot_write() {
        let t = RouteTable::account_api();
        let c = claims_with(vec![Scope::READ]);
        assert_eq!(
            authorize_request(&t, RequestMethod::Post, "/api/v1/accounts", Some(&c)),
            Err(AuthzError::Forbidden(Scope::WRITE))
        );
        assert_eq!(
            authorize_request(&t, RequestMethod::Put, "/api/v1/accounts/100", Some(&c)),
            Err(AuthzError::Forbidden(Scope::WRITE))
        );
    }

    #[test]
    fn write_token_cannot_read() {
        let t = RouteTable::account_api();
        let c = claims_with(vec![Scope::WRITE]);
        assert_eq!(
            authorize_request(&t, RequestMethod::Get, "/api/v1/accounts/100/transactions", Some(&c)),
            Err(AuthzError::Forbidden(Scope::READ))
        );
    }

    #[test]
    fn both_scopes_pass_everything() {
        let t = RouteTable::account_api();
        let c = claims_with(vec![Scope::READ, Scope::WRITE]);
        for m in [RequestMethod::Get, RequestMethod::Post, RequestMethod::Put] {
            assert_eq!(authorize_request(&t, m, "/api/v1/accounts", Some(&c)), Ok(()));
        }
    }

    proptest! {
        /// Property: whatever else a token carries, without `write` it never
        /// passes a POST or PUT under /api.
        #[test]
        fn writes_need_write_scope(
            extra in prop::collection::vec("[a-z]{1,8}", 0..4),
            tail in "[a-z0-9/]{0,20}",
            put in any::<bool>(),
        ) {
            let scopes: Vec<Scope> = extra
                .into_iter()
                .filter(|s| s != "write")
                .map(Scope::new)
                .collect();
            let c = claims_with(scopes);
            let method = if put { RequestMethod::Put } else { RequestMethod::Post };
            let path = format!("/api/{tail}");

            prop_assert_eq!(
                authorize_request(&RouteTable::account_api(), method, &path, Some(&c)),
                Err(AuthzError::Forbidden(Scope::WRITE))
            );
        }
    }
}
