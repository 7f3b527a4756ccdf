// Path: crates/types/src/config/mod.rs

//! Shared configuration structures for the credential client.
//!
//! The configuration is read once at process start and passed explicitly to each
//! component. Nothing in the workspace keeps process-wide configuration state.

use crate::app::{program_address, Address, ProgramId};
use crate::error::CredentialError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding `network.algod_url`.
pub const ENV_ALGOD_URL: &str = "CREDCHAIN_ALGOD_URL";
/// Environment variable overriding `network.algod_token`.
pub const ENV_ALGOD_TOKEN: &str = "CREDCHAIN_ALGOD_TOKEN";
/// Environment variable overriding `deployment.program_id`.
pub const ENV_PROGRAM_ID: &str = "CREDCHAIN_PROGRAM_ID";
/// Environment variable overriding `deployment.program_address`.
pub const ENV_PROGRAM_ADDRESS: &str = "CREDCHAIN_PROGRAM_ADDRESS";
/// Environment variable overriding `content_store.api_key`.
pub const ENV_PINATA_KEY: &str = "CREDCHAIN_PINATA_KEY";
/// Environment variable overriding `content_store.api_secret`.
pub const ENV_PINATA_SECRET: &str = "CREDCHAIN_PINATA_SECRET";

/// Top-level configuration file (`credchain.toml`).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct CredchainConfig {
    /// Ledger node endpoint.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Deployed credential program, if any.
    #[serde(default)]
    pub deployment: DeploymentConfig,
    /// Content-addressed store for credential documents and metadata.
    #[serde(default)]
    pub content_store: ContentStoreConfig,
    /// Submission and confirmation settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Issuance defaults.
    #[serde(default)]
    pub issuance: IssuanceConfig,
}

/// Connection settings for the ledger node.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Base URL of the node's REST API.
    #[serde(default = "default_algod_url")]
    pub algod_url: String,
    /// API token sent with every request. May be empty for public nodes.
    #[serde(default)]
    pub algod_token: String,
    /// Per-request timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_algod_url() -> String {
    "https://testnet-api.algonode.cloud".to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            algod_url: default_algod_url(),
            algod_token: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// The deployed credential program. `program_id == 0` means "not deployed".
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct DeploymentConfig {
    /// Identifier of the deployed program.
    #[serde(default)]
    pub program_id: ProgramId,
    /// Account controlled by the program. Derived from `program_id` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_address: Option<Address>,
}

impl DeploymentConfig {
    /// Returns true if a program identifier is configured and positive.
    pub fn is_deployed(&self) -> bool {
        self.program_id > 0
    }

    /// Returns the program account, if a program is deployed.
    pub fn program_account(&self) -> Option<Address> {
        if !self.is_deployed() {
            return None;
        }
        Some(
            self.program_address
                .unwrap_or_else(|| program_address(self.program_id)),
        )
    }
}

/// Settings for the pinning service that stores credential documents.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ContentStoreConfig {
    /// Base URL of the pinning API.
    #[serde(default = "default_content_api_url")]
    pub api_url: String,
    /// API key.
    #[serde(default)]
    pub api_key: String,
    /// API secret.
    #[serde(default)]
    pub api_secret: String,
    /// HTTP gateway used to render `ipfs://` URLs.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
}

fn default_content_api_url() -> String {
    "https://api.pinata.cloud".to_string()
}
fn default_gateway_url() -> String {
    "https://gateway.pinata.cloud/ipfs/".to_string()
}

impl Default for ContentStoreConfig {
    fn default() -> Self {
        Self {
            api_url: default_content_api_url(),
            api_key: String::new(),
            api_secret: String::new(),
            gateway_url: default_gateway_url(),
        }
    }
}

/// Bounds for the submission and confirmation pipeline.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of rounds to wait for a submitted call before giving up.
    #[serde(default = "default_max_rounds_to_wait")]
    pub max_rounds_to_wait: u64,
    /// Upper bound on waiting for the signer. Unset waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_timeout_secs: Option<u64>,
}

fn default_max_rounds_to_wait() -> u64 {
    4
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_rounds_to_wait: default_max_rounds_to_wait(),
            signing_timeout_secs: None,
        }
    }
}

/// Defaults applied to every issued credential.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IssuanceConfig {
    /// Unit label of directly created credential tokens.
    #[serde(default = "default_unit_label")]
    pub unit_label: String,
}

fn default_unit_label() -> String {
    "CRED".to_string()
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            unit_label: default_unit_label(),
        }
    }
}

impl CredchainConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, CredentialError> {
        toml::from_str(text).map_err(|e| CredentialError::Config(e.to_string()))
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CredentialError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Applies `CREDCHAIN_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), CredentialError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), CredentialError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_ALGOD_URL) {
            self.network.algod_url = url;
        }
        if let Some(token) = lookup(ENV_ALGOD_TOKEN) {
            self.network.algod_token = token;
        }
        if let Some(id) = lookup(ENV_PROGRAM_ID) {
            self.deployment.program_id = id.trim().parse().map_err(|_| {
                CredentialError::Config(format!("{} must be an unsigned integer", ENV_PROGRAM_ID))
            })?;
        }
        if let Some(address) = lookup(ENV_PROGRAM_ADDRESS) {
            self.deployment.program_address = if address.is_empty() {
                None
            } else {
                Some(address.parse()?)
            };
        }
        if let Some(key) = lookup(ENV_PINATA_KEY) {
            self.content_store.api_key = key;
        }
        if let Some(secret) = lookup(ENV_PINATA_SECRET) {
            self.content_store.api_secret = secret;
        }
        Ok(())
    }

    /// Rejects configurations that cannot work.
    pub fn validate(&self) -> Result<(), CredentialError> {
        for (name, url) in [
            ("network.algod_url", &self.network.algod_url),
            ("content_store.api_url", &self.content_store.api_url),
            ("content_store.gateway_url", &self.content_store.gateway_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CredentialError::Config(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }
        if self.pipeline.max_rounds_to_wait == 0 {
            return Err(CredentialError::Config(
                "pipeline.max_rounds_to_wait must be at least 1".into(),
            ));
        }
        if self.issuance.unit_label.is_empty() || self.issuance.unit_label.len() > 8 {
            return Err(CredentialError::Config(
                "issuance.unit_label must be 1 to 8 bytes".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_yields_defaults() {
        let cfg = CredchainConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, CredchainConfig::default());
        assert_eq!(cfg.pipeline.max_rounds_to_wait, 4);
        assert_eq!(cfg.issuance.unit_label, "CRED");
        assert!(!cfg.deployment.is_deployed());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_program_account_is_derived_when_absent() {
        let cfg = CredchainConfig::from_toml_str("[deployment]\nprogram_id = 10\n").unwrap();
        assert!(cfg.deployment.is_deployed());
        assert_eq!(cfg.deployment.program_account(), Some(program_address(10)));
    }

    #[test]
    fn test_env_overrides() {
        let explicit = Address::from_bytes([4u8; 32]);
        let vars: HashMap<&str, String> = [
            (ENV_PROGRAM_ID, "77".to_string()),
            (ENV_PROGRAM_ADDRESS, explicit.to_string()),
            (ENV_ALGOD_TOKEN, "secret".to_string()),
        ]
        .into_iter()
        .collect();
        let mut cfg = CredchainConfig::default();
        cfg.apply_overrides_from(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(cfg.deployment.program_id, 77);
        assert_eq!(cfg.deployment.program_account(), Some(explicit));
        assert_eq!(cfg.network.algod_token, "secret");

        let mut bad = CredchainConfig::default();
        assert!(bad
            .apply_overrides_from(|k| (k == ENV_PROGRAM_ID).then(|| "-3".to_string()))
            .is_err());
    }

    #[test]
    fn test_validate_rejects_zero_round_budget() {
        let mut cfg = CredchainConfig::default();
        cfg.pipeline.max_rounds_to_wait = 0;
        assert!(matches!(cfg.validate(), Err(CredentialError::Config(_))));
    }

    #[test]
    fn test_load_roundtrips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credchain.toml");
        let mut cfg = CredchainConfig::default();
        cfg.deployment.program_id = 10;
        std::fs::write(&path, toml::to_string_pretty(&cfg).unwrap()).unwrap();
        assert_eq!(CredchainConfig::load(&path).unwrap(), cfg);
    }
}
