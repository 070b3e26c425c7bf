use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ClientId, Scope};

/// Access-token claims model (transport-agnostic).
///
/// Standard OAuth2 access-token claims as issued by the client-credentials
/// server: `sub` (or `client_id`), `scope`, and NumericDate `iat` / `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject; for client-credentials tokens this is the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<ClientId>,

    /// Client the token was issued to, when the server sends it separately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,

    /// Granted scopes.
    #[serde(default, deserialize_with = "crate::scopes::deserialize_scopes")]
    pub scope: Vec<Scope>,

    /// Issued-at (`iat`, seconds since the epoch). Optional per RFC 7519.
    #[serde(
        rename = "iat",
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub issued_at: Option<DateTime<Utc>>,

    /// Expiration (`exp`, seconds since the epoch).
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl JwtClaims {
    /// Token for `client` valid from `issued_at` for `ttl`.
    pub fn issued_to(client: ClientId, scope: Vec<Scope>, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: Some(client),
            client_id: None,
            scope,
            issued_at: Some(issued_at),
            expires_at: issued_at + ttl,
        }
    }

    /// The calling client: `client_id` when present, otherwise `sub`.
    pub fn client(&self) -> Option<&ClientId> {
        self.client_id.as_ref().or(self.sub.as_ref())
    }

    pub fn has_scope(&self, scope: &Scope) -> bool {
        self.scope.iter().any(|s| s == scope)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Tolerated clock drift (seconds) between the token issuer and this
/// service when checking `iat`.
pub const ISSUED_AT_LEEWAY_SECS: i64 = 60;

/// Deterministically validate token claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// lives in [`crate::jwt`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if let Some(issued_at) = claims.issued_at {
        if claims.expires_at <= issued_at {
            return Err(TokenValidationError::InvalidTimeWindow);
        }
        if now + Duration::seconds(ISSUED_AT_LEEWAY_SECS) < issued_at {
            return Err(TokenValidationError::NotYetValid);
        }
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(issued_at: DateTime<Utc>, ttl: Duration) -> JwtClaims {
        JwtClaims::issued_to(ClientId::new("reader"), vec![Scope::READ], issued_at, ttl)
    }

    #[test]
    fn accepts_claims_inside_window() {
        let now = Utc::now();
        assert_eq!(validate_claims(&claims(now, Duration::minutes(5)), now), Ok(()));
    }

    #[test]
    fn rejects_expired_and_future_claims() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(10), Duration::minutes(5));
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::Expired));

        let c = claims(now + Duration::minutes(5), Duration::minutes(5));
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::NotYetValid));
    }

    #[test]
    fn small_issuer_clock_drift_is_tolerated() {
        let now = Utc::now();
        let c = claims(now + Duration::seconds(30), Duration::minutes(5));
        assert_eq!(validate_claims(&c, now), Ok(()));
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc::now();
        let c = claims(now, Duration::zero());
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::InvalidTimeWindow));
    }

    #[test]
    fn decodes_standard_numeric_date_claims() {
        let json = serde_json::json!({
            "sub": "reader-client",
            "scope": "read",
            "iat": 1_704_067_200,
            "exp": 1_704_070_800,
        });
        let c: JwtClaims = serde_json::from_value(json).unwrap();
        assert_eq!(c.client().map(ClientId::as_str), Some("reader-client"));
        assert!(c.has_scope(&Scope::READ));
        assert_eq!(c.issued_at.map(|t| t.timestamp()), Some(1_704_067_200));
        assert_eq!(c.expires_at.timestamp(), 1_704_070_800);
    }

    #[test]
    fn client_id_claim_wins_and_iat_is_optional() {
        let json = serde_json::json!({
            "sub": "service-account-42",
            "client_id": "billing",
            "exp": 1_704_070_800,
        });
        let c: JwtClaims = serde_json::from_value(json).unwrap();
        assert_eq!(c.client().map(ClientId::as_str), Some("billing"));
        assert_eq!(c.issued_at, None);

        let now = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        assert_eq!(validate_claims(&c, now), Ok(()));
    }

    #[test]
    fn serializes_standard_claim_names() {
        let at = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        let json = serde_json::to_value(claims(at, Duration::hours(1))).unwrap();
        assert_eq!(json["iat"], 1_704_067_200);
        assert_eq!(json["exp"], 1_704_070_800);
        assert_eq!(json["sub"], "reader");
        assert!(json.get("client_id").is_none());
    }

    #[test]
    fn missing_scope_claim_means_no_scopes() {
        let json = serde_json::json!({
            "sub": "anon",
            "iat": 1_704_067_200,
            "exp": 1_704_070_800,
        });
        let c: JwtClaims = serde_json::from_value(json).unwrap();
        assert!(c.scope.is_empty());
        assert!(!c.has_scope(&Scope::READ));
    }
}
