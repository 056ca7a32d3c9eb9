//! LMDB implementation of GovernanceStore.

use std::path::Path;

use agora_store::{BatchOp, GovernanceBatch, GovernanceStore, StoreError};
use agora_types::{Address, ProposalId};

use crate::environment::decode_u64;
use crate::keys::vote_key;
use crate::{LmdbEnvironment, LmdbError};

const PROPOSAL_COUNT_KEY: &[u8] = b"proposal_count";

pub struct LmdbGovernanceStore {
    env: LmdbEnvironment,
}

impl LmdbGovernanceStore {
    pub fn new(env: LmdbEnvironment) -> Self {
        Self { env }
    }

    /// Open (or create) a store in the directory `path`.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        Ok(Self::new(LmdbEnvironment::open(path, map_size)?))
    }

    pub fn environment(&self) -> &LmdbEnvironment {
        &self.env
    }

    /// Flush and close the underlying environment.
    pub fn close(self) {
        self.env.close();
    }

    fn apply(&self, batch: GovernanceBatch) -> Result<(), LmdbError> {
        let mut wtxn = self.env.env.write_txn()?;
        for op in batch.ops() {
            match op {
                BatchOp::PutProposal { id, data } => {
                    self.env
                        .proposals_db
                        .put(&mut wtxn, &id.get(), data.as_slice())?;
                }
                BatchOp::SetProposalCount(count) => {
                    self.env
                        .meta_db
                        .put(&mut wtxn, PROPOSAL_COUNT_KEY, &count.to_le_bytes())?;
                }
                BatchOp::RecordVote { id, voter } => {
                    self.env
                        .votes_db
                        .put(&mut wtxn, &vote_key(*id, voter)[..], &())?;
                }
                BatchOp::InsertActive(id) => {
                    self.env.active_db.put(&mut wtxn, &id.get(), &())?;
                }
                BatchOp::RemoveActive(id) => {
                    self.env.active_db.delete(&mut wtxn, &id.get())?;
                }
            }
        }
        // Dropping `wtxn` on any error above aborts the whole batch.
        wtxn.commit()?;
        Ok(())
    }
}

impl GovernanceStore for LmdbGovernanceStore {
    fn get_proposal(&self, id: ProposalId) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .env
            .proposals_db
            .get(&rtxn, &id.get())
            .map_err(LmdbError::from)?;
        Ok(val.map(<[u8]>::to_vec))
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .env
            .meta_db
            .get(&rtxn, PROPOSAL_COUNT_KEY)
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => Ok(decode_u64(bytes)?),
            None => Ok(0),
        }
    }

    fn has_voted(&self, id: ProposalId, voter: &Address) -> Result<bool, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let found = self
            .env
            .votes_db
            .get(&rtxn, &vote_key(id, voter)[..])
            .map_err(LmdbError::from)?;
        Ok(found.is_some())
    }

    fn voter_count(&self, id: ProposalId) -> Result<u64, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let prefix = id.to_be_bytes();
        let mut count = 0u64;
        for entry in self
            .env
            .votes_db
            .prefix_iter(&rtxn, &prefix[..])
            .map_err(LmdbError::from)?
        {
            entry.map_err(LmdbError::from)?;
            count += 1;
        }
        Ok(count)
    }

    fn list_active_proposals(&self) -> Result<Vec<ProposalId>, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let mut ids = Vec::new();
        for entry in self.env.active_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (raw, ()) = entry.map_err(LmdbError::from)?;
            ids.push(ProposalId::new(raw));
        }
        Ok(ids)
    }

    fn commit(&self, batch: GovernanceBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let ops = batch.len();
        self.apply(batch)?;
        tracing::trace!(ops, "committed governance batch");
        Ok(())
    }
}
