// Path: crates/services/src/verification/mod.rs
//! # Credential Verifier
//!
//! Read-only queries against the ledger. Nothing here signs or submits a call;
//! the on-chain verdict is obtained by simulating an unsigned call into the
//! deployed credential program.

use arc_swap::ArcSwap;
use credchain_api::network::NetworkClient;
use credchain_telemetry::issuance_metrics;
use credchain_tx::builder::build_program_call;
use credchain_tx::extract::extract_verification_verdict;
use credchain_tx::selectors::VERIFY_CREDENTIAL;
use credchain_tx::wire::encode_simulate_request;
use credchain_types::app::{Address, CallArgument, CredentialRecord, ProgramInfo, TokenId};
use credchain_types::config::DeploymentConfig;
use credchain_types::error::CredentialError;
use std::sync::Arc;

/// Status reported for an existing token when no program is deployed.
pub const TOKEN_EXISTS_STATUS: &str = "Verified (ASA)";
/// Status reported for a token that does not exist.
pub const NOT_FOUND_STATUS: &str = "Not Found";

/// Looks up and verifies issued credentials.
pub struct CredentialVerifier {
    network: Arc<dyn NetworkClient>,
    deployment: Arc<ArcSwap<DeploymentConfig>>,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("deployment", &**self.deployment.load())
            .finish()
    }
}

impl CredentialVerifier {
    /// Creates a verifier reading from `network`.
    pub fn new(network: Arc<dyn NetworkClient>, deployment: Arc<ArcSwap<DeploymentConfig>>) -> Self {
        Self {
            network,
            deployment,
        }
    }

    /// Returns the credential recorded under `token_id`, or `None` if no such token exists.
    pub async fn lookup_by_token_id(
        &self,
        token_id: TokenId,
    ) -> Result<Option<CredentialRecord>, CredentialError> {
        let record = self
            .network
            .get_token_state(token_id)
            .await?
            .map(CredentialRecord::from);
        tracing::debug!(target: "verify", token_id, found = record.is_some(), "token lookup");
        Ok(record)
    }

    /// Asks the deployed program for its verdict on `token_id`.
    ///
    /// The call is simulated unsigned and never committed. Returns the logged
    /// verdict text, or `"Unknown"` if the program logged none. Fails with
    /// `Config` when no program is deployed.
    pub async fn verify_on_chain(&self, token_id: TokenId) -> Result<String, CredentialError> {
        let deployment = self.deployment.load_full();
        self.verify_with(&deployment, token_id).await
    }

    async fn verify_with(
        &self,
        deployment: &DeploymentConfig,
        token_id: TokenId,
    ) -> Result<String, CredentialError> {
        if token_id == 0 {
            return Err(CredentialError::Validation("token id must be positive".into()));
        }
        let program_account = deployment.program_account().ok_or_else(|| {
            CredentialError::Config("on-chain verification needs a deployed program".into())
        })?;

        let params = self.network.get_parameters().await?;
        let call = build_program_call(
            &program_account,
            deployment.program_id,
            VERIFY_CREDENTIAL,
            &[CallArgument::FixedUint64(token_id)],
            params,
        )?;
        let request = encode_simulate_request(&call)?;
        let result = self.network.simulate(&request).await?;
        let verdict = extract_verification_verdict(&result);

        issuance_metrics().inc_verifications(&verdict);
        tracing::info!(
            target: "verify",
            token_id,
            program_id = deployment.program_id,
            %verdict,
            "on-chain verification"
        );
        Ok(verdict)
    }

    /// Reports the best available verification signal for `token_id`.
    ///
    /// With a deployed program this is the on-chain verdict. Without one, the
    /// existence of the token is the signal.
    pub async fn verification_status(&self, token_id: TokenId) -> Result<String, CredentialError> {
        let deployment = self.deployment.load_full();
        if deployment.is_deployed() {
            return self.verify_with(&deployment, token_id).await;
        }
        let status = match self.lookup_by_token_id(token_id).await? {
            Some(_) => TOKEN_EXISTS_STATUS,
            None => NOT_FOUND_STATUS,
        };
        issuance_metrics().inc_verifications(status);
        Ok(status.to_string())
    }

    /// Lists the credentials created by `address`.
    pub async fn credentials_of(
        &self,
        address: &Address,
    ) -> Result<Vec<CredentialRecord>, CredentialError> {
        let records: Vec<CredentialRecord> = self
            .network
            .get_account_state(address)
            .await?
            .into_iter()
            .map(CredentialRecord::from)
            .collect();
        tracing::debug!(target: "verify", %address, count = records.len(), "listed credentials");
        Ok(records)
    }

    /// Returns a snapshot of the deployed program, or `None` when nothing is deployed
    /// or the network does not know the program.
    pub async fn program_info(&self) -> Result<Option<ProgramInfo>, CredentialError> {
        let deployment = self.deployment.load_full();
        let Some(program_address) = deployment.program_account() else {
            return Ok(None);
        };
        let Some(state) = self.network.get_program_state(deployment.program_id).await? else {
            tracing::warn!(target: "verify", program_id = deployment.program_id, "program not found");
            return Ok(None);
        };
        let global_state = state
            .into_iter()
            .map(|(key, value)| (String::from_utf8_lossy(&key).into_owned(), value))
            .collect();
        Ok(Some(ProgramInfo {
            program_id: deployment.program_id,
            program_address,
            global_state,
        }))
    }
}
