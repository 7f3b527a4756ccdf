// Path: crates/cli/src/context.rs

//! Configuration loading and service wiring for one CLI invocation.

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use credchain_client::{AlgodClient, PinataStore};
use credchain_services::{CredentialVerifier, IssuanceOrchestrator};
use credchain_types::config::{CredchainConfig, DeploymentConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "credchain.toml";

/// Resolves which configuration file to read, if any.
///
/// An explicit path must exist. Without one, `credchain.toml` in the working
/// directory is used when present, and built-in defaults otherwise.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    }
}

/// Reads the configuration, applies `CREDCHAIN_*` environment overrides and validates it.
pub fn load_config(explicit: Option<&Path>) -> Result<CredchainConfig> {
    let mut config = match resolve_config_path(explicit) {
        Some(path) => CredchainConfig::load(&path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => {
            tracing::debug!(target: "cli", "no configuration file, using defaults");
            CredchainConfig::default()
        }
    };
    config
        .apply_env_overrides()
        .context("applying environment overrides")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Everything a command needs, built once from the configuration.
pub struct AppContext {
    /// The effective configuration.
    pub config: CredchainConfig,
    network: Arc<AlgodClient>,
    deployment: Arc<ArcSwap<DeploymentConfig>>,
}

impl AppContext {
    /// Builds the network client for `config`.
    pub fn new(config: CredchainConfig) -> Result<Self> {
        let network =
            Arc::new(AlgodClient::new(&config.network).context("creating the node client")?);
        let deployment = Arc::new(ArcSwap::from_pointee(config.deployment.clone()));
        Ok(Self {
            config,
            network,
            deployment,
        })
    }

    /// Loads the configuration and builds the context in one step.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::new(load_config(explicit)?)
    }

    /// An orchestrator without a content store.
    pub fn orchestrator(&self) -> IssuanceOrchestrator {
        IssuanceOrchestrator::new(
            self.network.clone(),
            self.deployment.clone(),
            self.config.pipeline.clone(),
            self.config.issuance.clone(),
        )
    }

    /// An orchestrator that can upload documents. Needs content-store credentials.
    pub fn orchestrator_with_store(&self) -> Result<IssuanceOrchestrator> {
        let store = PinataStore::new(&self.config.content_store)
            .context("configuring the content store")?;
        Ok(self.orchestrator().with_content_store(Arc::new(store)))
    }

    /// A verifier reading from the configured node.
    pub fn verifier(&self) -> CredentialVerifier {
        CredentialVerifier::new(self.network.clone(), self.deployment.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[deployment]\nprogram_id = 10\n\n[pipeline]\nmax_rounds_to_wait = 8\n",
        )
        .unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.pipeline.max_rounds_to_wait, 8);
        assert_eq!(resolve_config_path(Some(&path)), Some(path));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(format!("{:#}", err).contains("absent.toml"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[pipeline]\nmax_rounds_to_wait = 0\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_store_requires_credentials() {
        let ctx = AppContext::new(CredchainConfig::default()).unwrap();
        assert!(ctx.orchestrator_with_store().is_err());
    }
}
