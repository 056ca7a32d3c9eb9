//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the governance engine (clock, storage,
//! membership oracle) sits behind a trait. This crate provides stand-ins
//! that:
//! - return deterministic values
//! - can be controlled programmatically (advance time, add members, inject faults)
//! - never touch the filesystem or network

pub mod clock;
pub mod membership;
pub mod store;

pub use clock::NullClock;
pub use membership::NullMembership;
pub use store::NullGovernanceStore;
