//! Fundamental types for the Agora governance workspace.
//!
//! Shared by every other crate: member addresses, proposal identifiers,
//! timestamps and the clock abstraction the state machine reads time from.

pub mod address;
pub mod error;
pub mod proposal_id;
pub mod time;

pub use address::Address;
pub use error::TypesError;
pub use proposal_id::ProposalId;
pub use time::{Clock, SystemClock, Timestamp};
