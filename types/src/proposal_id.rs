//! Sequential proposal identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Identifier of a proposal.
///
/// Assigned densely starting at 1. The value 0 is reserved and never names
/// a stored proposal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProposalId(u64);

impl ProposalId {
    /// The reserved "does not exist" id.
    pub const NONE: Self = Self(0);

    /// The first id ever assigned.
    pub const FIRST: Self = Self(1);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// The id following this one, or `None` on overflow.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Big-endian key bytes, so byte order matches numeric order in storage.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    pub fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ProposalId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl FromStr for ProposalId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim_start_matches('#')
            .parse::<u64>()
            .map(Self)
            .map_err(|e| TypesError::InvalidProposalId(format!("{s}: {e}")))
    }
}
