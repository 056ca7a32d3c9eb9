//! Community governance for Agora.
//!
//! Members create time-bounded proposals and vote on them yes/no, exactly
//! once each. Results are readable at any time.
//!
//! Key principles:
//! - one member = one vote, checked against a [`MembershipOracle`] on every call
//! - proposal ids are dense and sequential, starting at 1 (0 means "none")
//! - the voting window is inclusive: `start_time <= now <= end_time`
//! - reads never fail; unknown ids read as the zero-valued [`Proposal`]
//! - the active-proposal index is pruned lazily on every insert and read

pub mod active;
pub mod engine;
pub mod error;
pub mod oracle;
pub mod proposal;

pub use active::Pruned;
pub use engine::GovernanceEngine;
pub use error::GovernanceError;
pub use oracle::{MembershipOracle, OracleError};
pub use proposal::{Proposal, WindowStatus};
