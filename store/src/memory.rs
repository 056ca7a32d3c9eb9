//! In-memory governance storage.
//!
//! State lives for as long as the store value does. A whole batch is applied
//! under one lock, so readers never observe half of it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use agora_types::{Address, ProposalId};

use crate::{BatchOp, GovernanceBatch, GovernanceStore, StoreError};

#[derive(Debug, Default)]
struct State {
    proposals: BTreeMap<ProposalId, Vec<u8>>,
    proposal_count: u64,
    /// Keyed like the durable backends: `(id, voter)` sorts by proposal first.
    votes: BTreeSet<(ProposalId, Address)>,
    active: BTreeSet<ProposalId>,
}

#[derive(Debug, Default)]
pub struct MemoryGovernanceStore {
    state: Mutex<State>,
}

impl MemoryGovernanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // Batches are applied op by op without early exit, so a poisoned
        // lock still guards a consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GovernanceStore for MemoryGovernanceStore {
    fn get_proposal(&self, id: ProposalId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state().proposals.get(&id).cloned())
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        Ok(self.state().proposal_count)
    }

    fn has_voted(&self, id: ProposalId, voter: &Address) -> Result<bool, StoreError> {
        Ok(self.state().votes.contains(&(id, voter.clone())))
    }

    fn voter_count(&self, id: ProposalId) -> Result<u64, StoreError> {
        let state = self.state();
        let first = (id, Address::new(""));
        Ok(state
            .votes
            .range(first..)
            .take_while(|(p, _)| *p == id)
            .count() as u64)
    }

    fn list_active_proposals(&self) -> Result<Vec<ProposalId>, StoreError> {
        Ok(self.state().active.iter().copied().collect())
    }

    fn commit(&self, batch: GovernanceBatch) -> Result<(), StoreError> {
        let mut state = self.state();
        for op in batch.into_ops() {
            match op {
                BatchOp::PutProposal { id, data } => {
                    state.proposals.insert(id, data);
                }
                BatchOp::SetProposalCount(count) => state.proposal_count = count,
                BatchOp::RecordVote { id, voter } => {
                    state.votes.insert((id, voter));
                }
                BatchOp::InsertActive(id) => {
                    state.active.insert(id);
                }
                BatchOp::RemoveActive(id) => {
                    state.active.remove(&id);
                }
            }
        }
        Ok(())
    }
}
