//! Membership oracles for the governance module.
//!
//! A community decides who its members are; governance only asks. Two
//! sources are provided:
//! - [`RosterOracle`]: a fixed, runtime-editable member list (from config)
//! - [`HttpMembershipOracle`]: a group's HTTP endpoint,
//!   `GET {endpoint}/verify/{address}` → `{"valid": bool, ...}`
//!
//! Both answer freshly on every call; nothing is cached.

pub mod client;
pub mod error;
pub mod roster;

pub use client::{HttpMembershipOracle, MemberStatus};
pub use error::GroupError;
pub use roster::RosterOracle;
