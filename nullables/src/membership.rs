//! Nullable membership oracle with scriptable members and outages.

use agora_governance::{MembershipOracle, OracleError};
use agora_types::Address;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// An in-memory membership oracle for testing.
///
/// Counts every query so tests can check that answers are never cached.
#[derive(Debug, Default)]
pub struct NullMembership {
    members: Mutex<HashSet<Address>>,
    unreachable: AtomicBool,
    queries: AtomicUsize,
}

impl NullMembership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members<I, A>(members: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Address>,
    {
        let oracle = Self::new();
        for m in members {
            oracle.add(m.into());
        }
        oracle
    }

    pub fn add(&self, member: Address) {
        self.members.lock().unwrap().insert(member);
    }

    pub fn remove(&self, member: &Address) {
        self.members.lock().unwrap().remove(member);
    }

    /// Make every following query fail (or succeed again).
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of `is_member` calls so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl MembershipOracle for NullMembership {
    fn is_member(&self, address: &Address) -> Result<bool, OracleError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(OracleError::Unreachable("null membership set offline".to_string()));
        }
        Ok(self.members.lock().unwrap().contains(address))
    }
}
