//! Static member roster.

use agora_governance::{MembershipOracle, OracleError};
use agora_types::Address;
use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock};

/// A member list held in memory, typically loaded from configuration.
#[derive(Debug, Default)]
pub struct RosterOracle {
    members: RwLock<BTreeSet<Address>>,
}

impl RosterOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a member. Returns `false` if already present.
    pub fn add(&self, member: Address) -> bool {
        self.members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(member)
    }

    /// Remove a member. Returns `false` if not present.
    pub fn remove(&self, member: &Address) -> bool {
        self.members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(member)
    }

    /// All members, sorted.
    pub fn list(&self) -> Vec<Address> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.members.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Address> for RosterOracle {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        Self {
            members: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl MembershipOracle for RosterOracle {
    fn is_member(&self, address: &Address) -> Result<bool, OracleError> {
        Ok(self
            .members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(address))
    }
}
