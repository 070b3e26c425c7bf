//! `tally-auth`: pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the API layer
//! hands it a method, a path and (optionally) verified claims.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod principal;
pub mod routes;
pub mod scopes;

pub use authorize::{AuthzError, authorize, authorize_request};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use principal::ClientId;
pub use routes::{Access, PathPattern, RequestMethod, RouteRule, RouteTable};
pub use scopes::Scope;
