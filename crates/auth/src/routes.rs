//! Data-driven access table: (method, path pattern) → required access.

use std::borrow::Cow;

use crate::Scope;

/// HTTP method as seen by the access table (kept free of any HTTP crate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Other,
}

impl RequestMethod {
    pub fn parse(method: &str) -> Self {
        match method {
            "GET" => Self::Get,
            "HEAD" => Self::Head,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "OPTIONS" => Self::Options,
            _ => Self::Other,
        }
    }
}

/// Path matcher.
///
/// `Prefix` follows Ant `/**` semantics: `/api/**` matches `/api` and anything
/// under `/api/`, but not `/apix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(Cow<'static, str>),
    Prefix(Cow<'static, str>),
}

impl PathPattern {
    pub fn parse(pattern: &'static str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(prefix) => Self::Prefix(Cow::Borrowed(prefix)),
            None => Self::Exact(Cow::Borrowed(pattern)),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(p) => path == p.as_ref(),
            PathPattern::Prefix(p) => match path.strip_prefix(p.as_ref()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

/// What a matched request needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// No token required.
    PermitAll,
    /// Any valid token.
    Authenticated,
    /// A valid token carrying this scope.
    Scope(Scope),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    /// `None` matches every method.
    pub method: Option<RequestMethod>,
    pub pattern: PathPattern,
    pub access: Access,
}

impl RouteRule {
    fn matches(&self, method: RequestMethod, path: &str) -> bool {
        self.method.map_or(true, |m| m == method) && self.pattern.matches(path)
    }
}

/// Ordered rule list; the first matching rule wins, otherwise `fallback`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
    fallback: Access,
}

impl RouteTable {
    /// Empty table where every request needs a valid token.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Access::Authenticated,
        }
    }

    pub fn rule(mut self, method: Option<RequestMethod>, pattern: &'static str, access: Access) -> Self {
        self.rules.push(RouteRule {
            method,
            pattern: PathPattern::parse(pattern),
            access,
        });
        self
    }

    pub fn fallback(mut self, access: Access) -> Self {
        self.fallback = access;
        self
    }

    /// The account API's policy: writes need `write`, reads need `read`,
    /// the root and health probe are open.
    pub fn account_api() -> Self {
        Self::new()
            .rule(Some(RequestMethod::Post), "/api/**", Access::Scope(Scope::WRITE))
            .rule(Some(RequestMethod::Put), "/api/**", Access::Scope(Scope::WRITE))
            .rule(Some(RequestMethod::Get), "/api/**", Access::Scope(Scope::READ))
            .rule(None, "/", Access::PermitAll)
            .rule(None, "/health", Access::PermitAll)
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn resolve(&self, method: RequestMethod, path: &str) -> &Access {
        self.rules
            .iter()
            .find(|r| r.matches(method, path))
            .map(|r| &r.access)
            .unwrap_or(&self.fallback)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::account_api()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ant_prefix_matches_subtree_only() {
        let p = PathPattern::parse("/api/**");
        assert!(p.matches("/api"));
        assert!(p.matches("/api/v1/accounts/1"));
        assert!(!p.matches("/apix"));
        assert!(!p.matches("/"));
    }

    #[test]
    fn account_api_table_maps_methods_to_scopes() {
        let t = RouteTable::account_api();
        assert_eq!(
            t.resolve(RequestMethod::Post, "/api/v1/accounts"),
            &Access::Scope(Scope::WRITE)
        );
        assert_eq!(
            t.resolve(RequestMethod::Put, "/api/v1/accounts/100"),
            &Access::Scope(Scope::WRITE)
        );
        assert_eq!(
            t.resolve(RequestMethod::Get, "/api/v1/accounts/100/transactions"),
            &Access::Scope(Scope::READ)
        );
        assert_eq!(t.resolve(RequestMethod::Get, "/"), &Access::PermitAll);
    }

    #[test]
    fn unmatched_requests_fall_back_to_authenticated() {
        let t = RouteTable::account_api();
        assert_eq!(
            t.resolve(RequestMethod::Delete, "/api/v1/accounts/1"),
            &Access::Authenticated
        );
        assert_eq!(t.resolve(RequestMethod::Get, "/metrics"), &Access::Authenticated);
    }

    #[test]
    fn first_matching_rule_wins() {
        let t = RouteTable::new()
            .rule(None, "/api/public/**", Access::PermitAll)
            .rule(None, "/api/**", Access::Scope(Scope::WRITE));
        assert_eq!(t.resolve(RequestMethod::Get, "/api/public/x"), &Access::PermitAll);
    }
}
