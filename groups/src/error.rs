use agora_governance::OracleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("invalid group endpoint {0:?}")]
    InvalidEndpoint(String),

    #[error("HTTP request to group endpoint failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from group: {0}")]
    InvalidResponse(String),

    #[error("group endpoint unreachable: {0}")]
    Unreachable(String),
}

impl From<GroupError> for OracleError {
    fn from(e: GroupError) -> Self {
        match e {
            GroupError::Unreachable(msg) => OracleError::Unreachable(msg),
            GroupError::InvalidResponse(msg) => OracleError::InvalidResponse(msg),
            other => OracleError::Other(other.to_string()),
        }
    }
}
