//! Governance proposals and their voting window.

use agora_types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::GovernanceError;

/// A governance proposal.
///
/// The default value is the "absent" proposal returned for ids that were
/// never assigned: zero times, empty metadata, zero tallies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// First second at which votes are accepted.
    pub start_time: Timestamp,
    /// Last second at which votes are accepted.
    pub end_time: Timestamp,
    /// Opaque description, usually a content address (`ipfs://...`).
    pub metadata: String,
    pub votes_for: u64,
    pub votes_against: u64,
}

/// Where a point in time falls relative to a proposal's voting window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowStatus {
    NotStarted,
    Open,
    Ended,
}

impl Proposal {
    pub fn new(start_time: Timestamp, end_time: Timestamp, metadata: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            metadata: metadata.into(),
            votes_for: 0,
            votes_against: 0,
        }
    }

    /// Inclusive window check: `start_time <= now <= end_time` is open.
    pub fn window_status(&self, now: Timestamp) -> WindowStatus {
        if now < self.start_time {
            WindowStatus::NotStarted
        } else if now > self.end_time {
            WindowStatus::Ended
        } else {
            WindowStatus::Open
        }
    }

    /// Whether the proposal has left the active set as of `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.end_time < now
    }

    pub fn total_votes(&self) -> u64 {
        self.votes_for + self.votes_against
    }

    /// Count one ballot.
    pub(crate) fn tally(&mut self, support: bool) {
        if support {
            self.votes_for += 1;
        } else {
            self.votes_against += 1;
        }
    }

    pub(crate) fn encode(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(self).map_err(|e| GovernanceError::Codec(e.to_string()))
    }

    pub(crate) fn decode(bytes: &[u8]) -> Result<Self, GovernanceError> {
        bincode::deserialize(bytes).map_err(|e| GovernanceError::Codec(e.to_string()))
    }
}
