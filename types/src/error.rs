use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid proposal id: {0}")]
    InvalidProposalId(String),
}
