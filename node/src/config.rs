//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for an Agora governance node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
///
/// ```toml
/// deployer = "0xdao"
///
/// [storage]
/// backend = "lmdb"
/// data_dir = "./agora_data"
///
/// [membership]
/// kind = "roster"
/// members = ["0xdao", "0xvoter"]
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Member on whose behalf the module is opened. When unset the module
    /// opens without a membership check.
    #[serde(default)]
    pub deployer: Option<String>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where governance state is kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Who counts as a member.
    #[serde(default)]
    pub membership: MembershipConfig,
}

/// Storage backend selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// State lives for the lifetime of the process.
    #[default]
    Memory,
    /// Durable LMDB environment under `data_dir`.
    Lmdb,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Data directory for the LMDB backend.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,
}

/// Membership source selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MembershipConfig {
    /// Fixed member list.
    Roster {
        #[serde(default)]
        members: Vec<String>,
    },
    /// Group verification endpoint (`GET {endpoint}/verify/{address}`).
    Http {
        endpoint: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./agora_data")
}

fn default_map_size() -> usize {
    64 * 1024 * 1024
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(format!("{path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// The parsed `log_format`.
    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            deployer: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
            storage: StorageConfig::default(),
            membership: MembershipConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
            map_size: default_map_size(),
        }
    }
}

impl Default for MembershipConfig {
    fn default() -> Self {
        MembershipConfig::Roster {
            members: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig {
            deployer: Some("0xdao".to_string()),
            membership: MembershipConfig::Roster {
                members: vec!["0xdao".to_string(), "0xvoter".to_string()],
            },
            ..NodeConfig::default()
        };
        let toml_str = config.to_toml_string().unwrap();
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.deployer, config.deployer);
        assert_eq!(parsed.storage, config.storage);
        assert_eq!(parsed.membership, config.membership);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.deployer, None);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.map_size, 64 * 1024 * 1024);
        assert_eq!(config.membership, MembershipConfig::Roster { members: vec![] });
        assert_eq!(config.log_format, "human");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn http_membership_section_parses() {
        let toml = r#"
            deployer = "0xdao"
            log_format = "json"

            [storage]
            backend = "lmdb"
            data_dir = "/var/lib/agora"

            [membership]
            kind = "http"
            endpoint = "https://group.example"
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.storage.backend, StorageBackend::Lmdb);
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/agora"));
        assert_eq!(
            config.membership,
            MembershipConfig::Http {
                endpoint: "https://group.example".to_string(),
                timeout_secs: 10,
            }
        );
        assert_eq!(config.log_format().unwrap(), LogFormat::Json);
    }

    #[test]
    fn unknown_membership_kind_is_config_error() {
        let toml = r#"
            [membership]
            kind = "carrier-pigeon"
        "#;
        assert!(matches!(NodeConfig::from_toml_str(toml), Err(NodeError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "deployer = \"0xdao\"\nlog_level = \"debug\"").unwrap();
        let config = NodeConfig::from_toml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.deployer.as_deref(), Some("0xdao"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/agora.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
