//! Wiring for the Agora governance module.
//!
//! Reads a [`NodeConfig`], initialises logging, and opens a
//! [`GovernanceEngine`] over the configured store and membership source.
//! Transports (CLI, RPC) embed this crate; none ship here.

pub mod config;
pub mod error;
pub mod logging;

use std::sync::Arc;

use agora_governance::{GovernanceEngine, MembershipOracle};
use agora_groups::{HttpMembershipOracle, RosterOracle};
use agora_store::{GovernanceStore, MemoryGovernanceStore};
use agora_store_lmdb::LmdbGovernanceStore;
use agora_types::{Address, Clock, SystemClock};

pub use config::{MembershipConfig, NodeConfig, StorageBackend, StorageConfig};
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};

/// Build the store described by `config`.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn GovernanceStore>, NodeError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryGovernanceStore::new())),
        StorageBackend::Lmdb => {
            let store = LmdbGovernanceStore::open(&config.data_dir, config.map_size)?;
            tracing::info!(path = %config.data_dir.display(), "opened LMDB governance store");
            Ok(Arc::new(store))
        }
    }
}

/// Build the membership oracle described by `config`.
pub fn open_membership(config: &MembershipConfig) -> Result<Arc<dyn MembershipOracle>, NodeError> {
    match config {
        MembershipConfig::Roster { members } => {
            let roster = members
                .iter()
                .map(|m| Address::parse(m).map_err(|e| NodeError::Config(e.to_string())))
                .collect::<Result<RosterOracle, _>>()?;
            tracing::info!(members = roster.len(), "using static member roster");
            Ok(Arc::new(roster))
        }
        MembershipConfig::Http {
            endpoint,
            timeout_secs,
        } => {
            let oracle = HttpMembershipOracle::with_timeout(
                endpoint,
                std::time::Duration::from_secs(*timeout_secs),
            )?;
            tracing::info!(endpoint = %endpoint, "using HTTP group membership");
            Ok(Arc::new(oracle))
        }
    }
}

/// Open the governance module from configuration, reading time from the
/// system clock.
///
/// When `deployer` is set it must be a member, otherwise the module is not
/// opened.
pub fn open_engine(config: &NodeConfig) -> Result<GovernanceEngine, NodeError> {
    open_engine_with_clock(config, Arc::new(SystemClock))
}

/// [`open_engine`] with an explicit clock.
pub fn open_engine_with_clock(
    config: &NodeConfig,
    clock: Arc<dyn Clock>,
) -> Result<GovernanceEngine, NodeError> {
    let store = open_store(&config.storage)?;
    let oracle = open_membership(&config.membership)?;
    match &config.deployer {
        Some(raw) => {
            let deployer = Address::parse(raw).map_err(|e| NodeError::Config(e.to_string()))?;
            Ok(GovernanceEngine::open(&deployer, store, oracle, clock)?)
        }
        None => Ok(GovernanceEngine::new(store, oracle, clock)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_governance::GovernanceError;
    use agora_types::{ProposalId, Timestamp};

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            Timestamp::new(self.0)
        }
    }

    fn roster_config(members: &[&str], deployer: Option<&str>) -> NodeConfig {
        NodeConfig {
            deployer: deployer.map(str::to_string),
            membership: MembershipConfig::Roster {
                members: members.iter().map(|m| m.to_string()).collect(),
            },
            ..NodeConfig::default()
        }
    }

    #[test]
    fn member_deployer_opens_module() {
        let config = roster_config(&["0xdao", "0xvoter"], Some("0xdao"));
        let engine = open_engine_with_clock(&config, Arc::new(FixedClock(1_000))).unwrap();

        let id = engine
            .create_proposal(&Address::new("0xvoter"), Timestamp::new(1_000), Timestamp::new(2_000), "ipfs://x")
            .unwrap();
        assert_eq!(id, ProposalId::FIRST);
        assert_eq!(engine.get_active_proposal_ids(), vec![id]);
    }

    #[test]
    fn non_member_deployer_is_refused() {
        let config = roster_config(&["0xdao"], Some("0xrandom"));
        let err = open_engine(&config).err().unwrap();
        assert!(matches!(
            err,
            NodeError::Governance(GovernanceError::Unauthorized { .. })
        ));
        assert_eq!(
            err.to_string(),
            "governance error: only members of the community can create a governance module"
        );
    }

    #[test]
    fn invalid_roster_entry_is_config_error() {
        let config = roster_config(&["good", "has space"], None);
        assert!(matches!(open_engine(&config), Err(NodeError::Config(_))));
    }

    #[test]
    fn invalid_http_endpoint_is_rejected() {
        let config = NodeConfig {
            membership: MembershipConfig::Http {
                endpoint: "not a url".to_string(),
                timeout_secs: 1,
            },
            ..NodeConfig::default()
        };
        assert!(matches!(open_engine(&config), Err(NodeError::Group(_))));
    }

    #[test]
    fn lmdb_backend_keeps_numbering_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = roster_config(&["0xdao"], Some("0xdao"));
        config.storage = StorageConfig {
            backend: StorageBackend::Lmdb,
            data_dir: dir.path().to_path_buf(),
            map_size: 10 * 1024 * 1024,
        };
        let member = Address::new("0xdao");
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(500));

        {
            let engine = open_engine_with_clock(&config, clock.clone()).unwrap();
            engine
                .create_proposal(&member, Timestamp::new(500), Timestamp::new(900), "ipfs://a")
                .unwrap();
            engine.vote(&member, ProposalId::FIRST, true).unwrap();
        }

        let engine = open_engine_with_clock(&config, clock).unwrap();
        assert_eq!(engine.proposal_count(), 1);
        assert_eq!(engine.get_proposal(ProposalId::FIRST).votes_for, 1);
        assert!(engine.has_voted(ProposalId::FIRST, &member));
        let next = engine
            .create_proposal(&member, Timestamp::new(500), Timestamp::new(900), "ipfs://b")
            .unwrap();
        assert_eq!(next, ProposalId::new(2));
        assert_eq!(engine.get_active_proposal_ids(), vec![ProposalId::FIRST, next]);
    }
}
