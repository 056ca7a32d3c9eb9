//! Nullable store: in-memory governance storage with fault injection.

use agora_store::{GovernanceBatch, GovernanceStore, MemoryGovernanceStore, StoreError};
use agora_types::{Address, ProposalId};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A [`MemoryGovernanceStore`] whose reads and commits can be made to fail.
#[derive(Debug, Default)]
pub struct NullGovernanceStore {
    inner: MemoryGovernanceStore,
    fail_reads: AtomicBool,
    fail_commits: AtomicBool,
    commits: AtomicUsize,
}

impl NullGovernanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following read return a backend error (or stop doing so).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every following commit return a backend error (or stop doing so).
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Number of successful commits so far.
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Ids in the active index as stored, without pruning or fault injection.
    pub fn raw_active(&self) -> Vec<ProposalId> {
        self.inner.list_active_proposals().unwrap_or_default()
    }

    /// Put an id into the active index without a matching proposal.
    pub fn inject_active(&self, id: ProposalId) {
        let mut batch = GovernanceBatch::new();
        batch.insert_active(id);
        self.inner.commit(batch).unwrap();
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store reads disabled".to_string()));
        }
        Ok(())
    }
}

impl GovernanceStore for NullGovernanceStore {
    fn get_proposal(&self, id: ProposalId) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_read()?;
        self.inner.get_proposal(id)
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        self.check_read()?;
        self.inner.proposal_count()
    }

    fn has_voted(&self, id: ProposalId, voter: &Address) -> Result<bool, StoreError> {
        self.check_read()?;
        self.inner.has_voted(id, voter)
    }

    fn voter_count(&self, id: ProposalId) -> Result<u64, StoreError> {
        self.check_read()?;
        self.inner.voter_count(id)
    }

    fn list_active_proposals(&self) -> Result<Vec<ProposalId>, StoreError> {
        self.check_read()?;
        self.inner.list_active_proposals()
    }

    fn commit(&self, batch: GovernanceBatch) -> Result<(), StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store commits disabled".to_string()));
        }
        self.inner.commit(batch)?;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
