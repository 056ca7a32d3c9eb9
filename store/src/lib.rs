//! Abstract storage traits for the Agora governance module.
//!
//! Every storage backend implements [`GovernanceStore`]: LMDB in
//! `agora-store-lmdb`, and [`MemoryGovernanceStore`] here. The governance
//! engine depends only on the trait.

pub mod batch;
pub mod error;
pub mod governance;
pub mod memory;

pub use batch::{BatchOp, GovernanceBatch};
pub use error::StoreError;
pub use governance::GovernanceStore;
pub use memory::MemoryGovernanceStore;

