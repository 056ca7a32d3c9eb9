//! Core governance engine: proposal creation, voting and queries.
//!
//! Mutating operations (create, vote, and the prune done by
//! [`GovernanceEngine::get_active_proposal_ids`]) run under one writer lock
//! from validation through commit, and hand the store a single
//! [`GovernanceBatch`]. The membership oracle is always consulted before the
//! lock is taken.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use agora_store::{GovernanceBatch, GovernanceStore};
use agora_types::{Address, Clock, ProposalId, Timestamp};
use tracing::{debug, error, info, warn};

use crate::active::{self, Pruned};
use crate::error::GovernanceError;
use crate::oracle::MembershipOracle;
use crate::proposal::{Proposal, WindowStatus};

pub struct GovernanceEngine {
    store: Arc<dyn GovernanceStore>,
    oracle: Arc<dyn MembershipOracle>,
    clock: Arc<dyn Clock>,
    /// Serializes every operation that writes to the store.
    write_lock: Mutex<()>,
}

impl GovernanceEngine {
    /// Build an engine without checking who is setting it up.
    pub fn new(
        store: Arc<dyn GovernanceStore>,
        oracle: Arc<dyn MembershipOracle>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            oracle,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Open the governance module on behalf of `deployer`, who must be a
    /// current member of the community.
    ///
    /// Existing state in `store` is picked up as-is, so numbering continues
    /// after the last stored proposal.
    pub fn open(
        deployer: &Address,
        store: Arc<dyn GovernanceStore>,
        oracle: Arc<dyn MembershipOracle>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, GovernanceError> {
        let engine = Self::new(store, oracle, clock);
        engine.require_member(deployer, "create a governance module")?;
        let count = engine.store.proposal_count()?;
        info!(deployer = %deployer, proposals = count, "governance module opened");
        Ok(engine)
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Create a proposal and return its id.
    ///
    /// The caller must be a member. The new id is `proposal_count() + 1`.
    pub fn create_proposal(
        &self,
        caller: &Address,
        start_time: Timestamp,
        end_time: Timestamp,
        metadata: impl Into<String>,
    ) -> Result<ProposalId, GovernanceError> {
        self.require_member(caller, "create proposals")?;
        if end_time < start_time {
            return Err(GovernanceError::InvalidWindow {
                start: start_time,
                end: end_time,
            });
        }

        let _guard = self.lock_writes();
        let now = self.clock.now();

        let mut batch = GovernanceBatch::new();
        self.prune_into(&mut batch, now)?;

        let id = ProposalId::new(self.store.proposal_count()?)
            .next()
            .ok_or(GovernanceError::IdSpaceExhausted)?;
        let proposal = Proposal::new(start_time, end_time, metadata);
        batch
            .put_proposal(id, proposal.encode()?)
            .insert_active(id)
            .set_proposal_count(id.get());
        self.store.commit(batch)?;

        info!(
            id = %id,
            creator = %caller,
            start = %start_time,
            end = %end_time,
            "proposal created"
        );
        Ok(id)
    }

    /// Cast `caller`'s single ballot on proposal `id`.
    ///
    /// Checks run in this order: proposal exists, caller is a member,
    /// window has opened, window has not closed, caller has not voted yet.
    pub fn vote(
        &self,
        caller: &Address,
        id: ProposalId,
        support: bool,
    ) -> Result<(), GovernanceError> {
        // Proposals are never deleted, so existence can be checked unlocked.
        if self.load(id)?.is_none() {
            return Err(GovernanceError::NotFound(id));
        }
        self.require_member(caller, "vote")?;

        let _guard = self.lock_writes();
        let now = self.clock.now();

        let mut proposal = self.load(id)?.ok_or(GovernanceError::NotFound(id))?;
        match proposal.window_status(now) {
            WindowStatus::NotStarted => return Err(GovernanceError::NotStarted),
            WindowStatus::Ended => return Err(GovernanceError::Ended),
            WindowStatus::Open => {}
        }
        if self.store.has_voted(id, caller)? {
            return Err(GovernanceError::AlreadyVoted);
        }

        proposal.tally(support);
        let mut batch = GovernanceBatch::new();
        batch
            .put_proposal(id, proposal.encode()?)
            .record_vote(id, caller.clone());
        self.store.commit(batch)?;

        info!(
            id = %id,
            voter = %caller,
            support,
            votes_for = proposal.votes_for,
            votes_against = proposal.votes_against,
            "vote recorded"
        );
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// The stored proposal, or the zero-valued proposal for unknown ids.
    pub fn get_proposal(&self, id: ProposalId) -> Proposal {
        match self.load(id) {
            Ok(found) => found.unwrap_or_default(),
            Err(e) => {
                error!(id = %id, error = %e, "failed to read proposal");
                Proposal::default()
            }
        }
    }

    /// Ids of proposals whose `end_time` has not passed, ascending.
    ///
    /// Expired ids are dropped from the index as a side effect.
    pub fn get_active_proposal_ids(&self) -> Vec<ProposalId> {
        let _guard = self.lock_writes();
        let now = self.clock.now();

        let mut batch = GovernanceBatch::new();
        let live = match self.prune_into(&mut batch, now) {
            Ok(live) => live,
            Err(e) => {
                error!(error = %e, "failed to read active proposal index");
                return Vec::new();
            }
        };
        if !batch.is_empty() {
            if let Err(e) = self.store.commit(batch) {
                // The answer is still correct; the index just lags until the next prune.
                error!(error = %e, "failed to persist active index prune");
            }
        }
        live
    }

    /// Number of proposals ever created (also the highest id).
    pub fn proposal_count(&self) -> u64 {
        self.store.proposal_count().unwrap_or_else(|e| {
            error!(error = %e, "failed to read proposal count");
            0
        })
    }

    /// Whether `voter` has already voted on proposal `id`.
    pub fn has_voted(&self, id: ProposalId, voter: &Address) -> bool {
        self.store.has_voted(id, voter).unwrap_or_else(|e| {
            error!(id = %id, voter = %voter, error = %e, "failed to read vote record");
            false
        })
    }

    /// Number of distinct members who voted on proposal `id`.
    pub fn voter_count(&self, id: ProposalId) -> u64 {
        self.store.voter_count(id).unwrap_or_else(|e| {
            error!(id = %id, error = %e, "failed to count vote records");
            0
        })
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn require_member(&self, caller: &Address, action: &'static str) -> Result<(), GovernanceError> {
        match self.oracle.is_member(caller) {
            Ok(true) => Ok(()),
            Ok(false) => {
                debug!(caller = %caller, action, "rejected non-member");
                Err(GovernanceError::Unauthorized { action })
            }
            Err(e) => {
                warn!(caller = %caller, action, error = %e, "membership check failed");
                Err(GovernanceError::OracleUnavailable(e.to_string()))
            }
        }
    }

    fn load(&self, id: ProposalId) -> Result<Option<Proposal>, GovernanceError> {
        if id.is_none() {
            return Ok(None);
        }
        self.store
            .get_proposal(id)?
            .map(|bytes| Proposal::decode(&bytes))
            .transpose()
    }

    /// Prune the active index as of `now`, queueing removals into `batch`.
    /// Returns the live ids.
    fn prune_into(
        &self,
        batch: &mut GovernanceBatch,
        now: Timestamp,
    ) -> Result<Vec<ProposalId>, GovernanceError> {
        let active = self.store.list_active_proposals()?;
        let Pruned { live, removed } = active::prune(active, now, |id| self.load(id))?;
        if !removed.is_empty() {
            debug!(now = %now, removed = removed.len(), live = live.len(), "pruned active index");
        }
        for id in removed {
            batch.remove_active(id);
        }
        Ok(live)
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        // Store state only changes through atomic commits, so a poisoned guard is safe to reuse.
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
