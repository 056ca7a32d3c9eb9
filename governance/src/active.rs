//! Active-proposal index maintenance.
//!
//! The index is a cache of ids believed to be live. Expiry is always
//! recomputed from the stored proposal's `end_time`; there is no background
//! sweep. Every insert and every read of the index runs [`prune`] first.

use agora_types::{ProposalId, Timestamp};

use crate::Proposal;

/// Result of pruning the active index at one instant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pruned {
    /// Ids still live, ascending.
    pub live: Vec<ProposalId>,
    /// Ids to drop from the index: expired, or naming no stored proposal.
    pub removed: Vec<ProposalId>,
}

/// Split `active` into live and removable ids as of `now`.
///
/// `lookup` loads a stored proposal. An id with no stored proposal is
/// removed, since the index must never name a proposal that does not exist.
pub fn prune<E>(
    active: impl IntoIterator<Item = ProposalId>,
    now: Timestamp,
    mut lookup: impl FnMut(ProposalId) -> Result<Option<Proposal>, E>,
) -> Result<Pruned, E> {
    let mut pruned = Pruned::default();
    for id in active {
        match lookup(id)? {
            Some(p) if !p.is_expired(now) => pruned.live.push(id),
            Some(_) => pruned.removed.push(id),
            None => {
                tracing::warn!(id = %id, "active index named a missing proposal");
                pruned.removed.push(id);
            }
        }
    }
    pruned.live.sort_unstable();
    Ok(pruned)
}
