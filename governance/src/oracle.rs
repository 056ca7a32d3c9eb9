//! Membership oracle: the external source of truth for "is this address
//! currently part of the governed community".
//!
//! The engine never caches an answer. Implementations live in `agora-groups`
//! (static roster, HTTP group endpoint) and `agora-nullables` (tests).

use agora_types::Address;
use thiserror::Error;

pub trait MembershipOracle: Send + Sync {
    /// Whether `address` is a current member.
    ///
    /// An `Err` means the question could not be answered; it must never be
    /// reported as `Ok(false)`.
    fn is_member(&self, address: &Address) -> Result<bool, OracleError>;
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("membership source unreachable: {0}")]
    Unreachable(String),

    #[error("invalid response from membership source: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Other(String),
}
