//! Governance storage trait.

use agora_types::{Address, ProposalId};

use crate::{GovernanceBatch, StoreError};

/// Storage for governance state: proposals, the proposal counter, vote
/// records and the active-proposal index.
///
/// Proposals are opaque bytes at this layer; encoding belongs to the
/// governance crate. Writes only happen through [`GovernanceStore::commit`],
/// which must apply a whole batch or nothing.
pub trait GovernanceStore: Send + Sync {
    /// Get the encoded proposal, if the id was ever assigned.
    fn get_proposal(&self, id: ProposalId) -> Result<Option<Vec<u8>>, StoreError>;

    /// Highest assigned proposal id (0 before the first proposal).
    fn proposal_count(&self) -> Result<u64, StoreError>;

    /// Whether `voter` has a vote record on proposal `id`.
    fn has_voted(&self, id: ProposalId, voter: &Address) -> Result<bool, StoreError>;

    /// Number of distinct voters recorded on proposal `id`.
    fn voter_count(&self, id: ProposalId) -> Result<u64, StoreError>;

    /// Ids currently in the active index, ascending.
    fn list_active_proposals(&self) -> Result<Vec<ProposalId>, StoreError>;

    /// Apply every operation in `batch` atomically.
    fn commit(&self, batch: GovernanceBatch) -> Result<(), StoreError>;
}
