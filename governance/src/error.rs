use agora_store::StoreError;
use agora_types::{ProposalId, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("only members of the community can {action}")]
    Unauthorized { action: &'static str },

    #[error("cannot vote before start time")]
    NotStarted,

    #[error("cannot vote after end time")]
    Ended,

    #[error("cannot vote twice")]
    AlreadyVoted,

    #[error("proposal {0} not found")]
    NotFound(ProposalId),

    #[error("end time {end} is before start time {start}")]
    InvalidWindow { start: Timestamp, end: Timestamp },

    #[error("membership oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("proposal id space exhausted")]
    IdSpaceExhausted,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("proposal codec error: {0}")]
    Codec(String),
}

impl GovernanceError {
    /// Whether retrying the same call later may succeed.
    ///
    /// Policy violations are deterministic; only collaborator faults are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::OracleUnavailable(_) | Self::Store(_))
    }
}
