//! Member address type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Identity of a (prospective) community member.
///
/// The governance module treats addresses as opaque: it only compares them
/// and hands them to the membership oracle. Any non-empty string without
/// whitespace is accepted (e.g. `0x56C5...`, `did:key:...`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create an address from a raw string without validation.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse and validate an address.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let addr = Self::new(raw);
        if addr.is_valid() {
            Ok(addr)
        } else {
            Err(TypesError::InvalidAddress(raw.to_string()))
        }
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this address is well-formed.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && !self.0.chars().any(char::is_whitespace)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
