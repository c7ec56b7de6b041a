use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, externally-visible tenant identifier sent by the client widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantHash(pub String);

impl fmt::Display for TenantHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TenantHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TenantHash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Canonical tenant identifier, resolved from a `TenantHash` via the mappings object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TenantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
