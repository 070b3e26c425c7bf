use tally_auth::{ClientId, JwtClaims};

/// Authenticated client for a request.
///
/// Only present on requests that carried a valid bearer token. Tokens may
/// omit both `sub` and `client_id`, hence the optional id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    client_id: Option<ClientId>,
}

impl ClientContext {
    pub fn new(client_id: Option<ClientId>) -> Self {
        Self { client_id }
    }

    pub fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }
}

impl From<JwtClaims> for ClientContext {
    fn from(claims: JwtClaims) -> Self {
        Self::new(claims.client().cloned())
    }
}
