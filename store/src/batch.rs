//! Write batches. Every state change of one governance operation is
//! collected here and handed to the store in a single
//! [`GovernanceStore::commit`](crate::GovernanceStore::commit).
//!
//! Backends apply the operations in order, inside one transaction.

use agora_types::{Address, ProposalId};

/// A single write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOp {
    /// Insert or overwrite an encoded proposal.
    PutProposal { id: ProposalId, data: Vec<u8> },
    /// Set the highest assigned proposal id.
    SetProposalCount(u64),
    /// Add a (proposal, voter) vote record.
    RecordVote { id: ProposalId, voter: Address },
    /// Add an id to the active index.
    InsertActive(ProposalId),
    /// Remove an id from the active index.
    RemoveActive(ProposalId),
}

/// Ordered list of writes applied atomically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GovernanceBatch {
    ops: Vec<BatchOp>,
}

impl GovernanceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_proposal(&mut self, id: ProposalId, data: Vec<u8>) -> &mut Self {
        self.ops.push(BatchOp::PutProposal { id, data });
        self
    }

    pub fn set_proposal_count(&mut self, count: u64) -> &mut Self {
        self.ops.push(BatchOp::SetProposalCount(count));
        self
    }

    pub fn record_vote(&mut self, id: ProposalId, voter: Address) -> &mut Self {
        self.ops.push(BatchOp::RecordVote { id, voter });
        self
    }

    pub fn insert_active(&mut self, id: ProposalId) -> &mut Self {
        self.ops.push(BatchOp::InsertActive(id));
        self
    }

    pub fn remove_active(&mut self, id: ProposalId) -> &mut Self {
        self.ops.push(BatchOp::RemoveActive(id));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}
