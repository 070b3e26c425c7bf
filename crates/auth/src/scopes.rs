use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};

/// OAuth2 scope granted to a client token.
///
/// Scopes are opaque strings on the wire. Only [`Scope::READ`] and
/// [`Scope::WRITE`] are recognized by the route table; anything else is
/// carried through but never satisfies a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(Cow<'static, str>);

impl Scope {
    pub const READ: Scope = Scope(Cow::Borrowed("read"));
    pub const WRITE: Scope = Scope(Cow::Borrowed("write"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_recognized(&self) -> bool {
        *self == Self::READ || *self == Self::WRITE
    }
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accepts either a JSON array of scopes or an RFC 6749 space-delimited string.
pub(crate) fn deserialize_scopes<'de, D>(deserializer: D) -> Result<Vec<Scope>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        List(Vec<String>),
        Delimited(String),
    }

    let names = match Repr::deserialize(deserializer)? {
        Repr::List(v) => v,
        Repr::Delimited(s) => s.split_whitespace().map(str::to_owned).collect(),
    };

    Ok(names
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(Scope::new)
        .collect())
}
