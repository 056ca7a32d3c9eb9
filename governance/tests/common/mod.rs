#![allow(dead_code)]

use std::sync::Arc;

use agora_governance::GovernanceEngine;
use agora_nullables::{NullClock, NullGovernanceStore, NullMembership};
use agora_types::{Address, Timestamp};

pub const ONE_DAY: u64 = 60 * 60 * 24;
pub const ONE_WEEK: u64 = ONE_DAY * 7;

/// Fixed start time for every harness clock.
pub const GENESIS: u64 = 1_700_000_000;

pub struct Harness {
    pub engine: Arc<GovernanceEngine>,
    pub store: Arc<NullGovernanceStore>,
    pub members: Arc<NullMembership>,
    pub clock: Arc<NullClock>,
}

impl Harness {
    /// `dao_member` and `voter` are members; `random_guy` is not.
    pub fn new() -> Self {
        let store = Arc::new(NullGovernanceStore::new());
        let members = Arc::new(NullMembership::with_members([dao_member(), voter()]));
        let clock = Arc::new(NullClock::new(GENESIS));
        let engine = GovernanceEngine::open(
            &dao_member(),
            store.clone(),
            members.clone(),
            clock.clone(),
        )
        .expect("dao member can open the module");
        Self {
            engine: Arc::new(engine),
            store,
            members,
            clock,
        }
    }

    pub fn now(&self) -> Timestamp {
        agora_types::Clock::now(self.clock.as_ref())
    }
}

pub fn dao_member() -> Address {
    Address::new("0xDa0Member000000000000000000000000000001")
}

pub fn voter() -> Address {
    Address::new("0xVoter000000000000000000000000000000000002")
}

pub fn random_guy() -> Address {
    Address::new("0xRandomGuy00000000000000000000000000000003")
}

pub fn ts(secs: u64) -> Timestamp {
    Timestamp::new(secs)
}
