use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("governance error: {0}")]
    Governance(#[from] agora_governance::GovernanceError),

    #[error("store error: {0}")]
    Store(#[from] agora_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] agora_store_lmdb::LmdbError),

    #[error("membership source error: {0}")]
    Group(#[from] agora_groups::GroupError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
