//! LMDB storage backend for the Agora governance module.
//!
//! Implements [`agora_store::GovernanceStore`] using the `heed` LMDB bindings.
//! Proposals, vote records, the active index and metadata each live in their
//! own named database within a single environment; every batch is one write
//! transaction.

pub mod environment;
pub mod error;
pub mod governance;
pub mod keys;

pub use environment::{LmdbEnvironment, CURRENT_SCHEMA_VERSION};
pub use error::LmdbError;
pub use governance::LmdbGovernanceStore;
pub use keys::vote_key;
