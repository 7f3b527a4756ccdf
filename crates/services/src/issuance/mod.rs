// Path: crates/services/src/issuance/mod.rs
//! # Issuance Orchestrator
//!
//! Drives one credential issuance from validated inputs to a confirmed token.
//! Two paths exist: a call into the deployed credential program, or the direct
//! creation of a one-of-one token. The path is chosen once per attempt from a
//! snapshot of the deployment configuration and never re-evaluated, so a
//! deployment swapped in by another actor only affects later attempts.

mod document;
mod state;

pub use document::DocumentIssuanceRequest;
pub use state::{IssuanceError, IssuanceState};

use arc_swap::ArcSwap;
use credchain_api::content::ContentStore;
use credchain_api::network::NetworkClient;
use credchain_api::signer::CallSigner;
use credchain_client::pipeline::{submit_and_confirm, ConfirmedCall};
use credchain_telemetry::issuance_metrics;
use credchain_telemetry::time::StageTimer;
use credchain_tx::builder::{
    build_opt_in, build_program_call, build_token_create, build_token_transfer,
};
use credchain_tx::extract::extract_created_token_id;
use credchain_tx::selectors::ISSUE_CREDENTIAL;
use credchain_types::app::{
    decode_address, Address, CallArgument, IssuanceOutcome, IssuancePath, PreparedCall,
    ProgramId, TokenId,
};
use credchain_types::config::{DeploymentConfig, IssuanceConfig, PipelineConfig};
use credchain_types::error::CredentialError;
use state::Attempt;
use std::sync::Arc;

/// The number of units moved by a credential transfer.
pub const CREDENTIAL_TRANSFER_AMOUNT: u64 = 1;

/// The issuance path of one attempt, fixed before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Contract { program_id: ProgramId },
    Direct,
}

impl Route {
    fn select(deployment: &DeploymentConfig) -> Self {
        if deployment.is_deployed() {
            Self::Contract {
                program_id: deployment.program_id,
            }
        } else {
            Self::Direct
        }
    }

    fn stage(self) -> IssuanceState {
        match self {
            Self::Contract { .. } => IssuanceState::ContractCall,
            Self::Direct => IssuanceState::DirectCreate,
        }
    }

    fn path(self) -> IssuancePath {
        match self {
            Self::Contract { .. } => IssuancePath::ContractPath,
            Self::Direct => IssuancePath::DirectPath,
        }
    }
}

/// Validated inputs of one mint.
#[derive(Debug)]
struct MintRequest<'a> {
    issuer: Address,
    student: Address,
    credential_name: &'a str,
    metadata_url: &'a str,
}

fn required(value: &str, field: &str) -> Result<(), CredentialError> {
    if value.trim().is_empty() {
        return Err(CredentialError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate<'a>(
    issuer: &str,
    student: &str,
    credential_name: &'a str,
    metadata_url: &'a str,
) -> Result<MintRequest<'a>, CredentialError> {
    required(issuer, "issuer")?;
    required(student, "student")?;
    required(credential_name, "credential name")?;
    Ok(MintRequest {
        issuer: decode_address(issuer.trim())?,
        student: decode_address(student.trim())?,
        credential_name,
        metadata_url,
    })
}

/// Issues credentials and moves them to their holders.
///
/// Holds no per-attempt state; concurrent calls are independent.
pub struct IssuanceOrchestrator {
    network: Arc<dyn NetworkClient>,
    content: Option<Arc<dyn ContentStore>>,
    deployment: Arc<ArcSwap<DeploymentConfig>>,
    pipeline: PipelineConfig,
    issuance: IssuanceConfig,
}

impl std::fmt::Debug for IssuanceOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuanceOrchestrator")
            .field("deployment", &**self.deployment.load())
            .field("pipeline", &self.pipeline)
            .field("issuance", &self.issuance)
            .field("content_store", &self.content.is_some())
            .finish()
    }
}

impl IssuanceOrchestrator {
    /// Creates an orchestrator without a content store.
    pub fn new(
        network: Arc<dyn NetworkClient>,
        deployment: Arc<ArcSwap<DeploymentConfig>>,
        pipeline: PipelineConfig,
        issuance: IssuanceConfig,
    ) -> Self {
        Self {
            network,
            content: None,
            deployment,
            pipeline,
            issuance,
        }
    }

    /// Attaches the content store used by [`Self::issue_document`].
    pub fn with_content_store(mut self, content: Arc<dyn ContentStore>) -> Self {
        self.content = Some(content);
        self
    }

    fn route(&self) -> Route {
        let route = Route::select(&self.deployment.load_full());
        tracing::debug!(target: "issuance", ?route, "selected issuance route");
        route
    }

    /// Issues a credential whose metadata already lives at `metadata_url`.
    ///
    /// Fails with `Validation` before any network call when `issuer`, `student`
    /// or `credential_name` is empty. An outcome is returned only for a call
    /// confirmed on-chain.
    pub async fn issue(
        &self,
        issuer: &str,
        student: &str,
        credential_name: &str,
        metadata_url: &str,
        signer: &dyn CallSigner,
    ) -> Result<IssuanceOutcome, IssuanceError> {
        let mut attempt = Attempt::new();
        let request = validate(issuer, student, credential_name, metadata_url)
            .map_err(|e| attempt.fail(e))?;
        let route = self.route();
        self.mint(&mut attempt, route, &request, signer).await
    }

    /// Uploads a credential document and its metadata, then issues the credential.
    ///
    /// Requires a content store (see [`Self::with_content_store`]). The course
    /// becomes the token's display name and the metadata document's URL its
    /// content URL.
    pub async fn issue_document(
        &self,
        request: &DocumentIssuanceRequest,
        signer: &dyn CallSigner,
    ) -> Result<IssuanceOutcome, IssuanceError> {
        let mut attempt = Attempt::new();
        let content = self
            .content
            .as_ref()
            .ok_or_else(|| CredentialError::Config("no content store configured".into()))
            .and_then(|content| request.validate().map(|_| content))
            .map_err(|e| attempt.fail(e))?;
        // Addresses are checked before anything is uploaded.
        validate(&request.issuer, &request.student_wallet, &request.course, "")
            .map_err(|e| attempt.fail(e))?;
        let route = self.route();

        attempt.advance(IssuanceState::Uploading);
        let document_id = {
            let _timer = StageTimer::new(issuance_metrics(), "uploading");
            content
                .put_file(&request.file_name, request.document.clone())
                .await
        }
        .map_err(|e| attempt.fail(e))?;
        tracing::info!(target: "issuance", cid = %document_id, "document uploaded");

        attempt.advance(IssuanceState::BuildingMetadata);
        let metadata = request.metadata(&document_id);
        let metadata_id = {
            let _timer = StageTimer::new(issuance_metrics(), "building_metadata");
            content.put_json(&metadata).await
        }
        .map_err(|e| attempt.fail(e))?;
        let metadata_url = metadata_id.to_url();
        tracing::info!(target: "issuance", %metadata_url, "metadata uploaded");

        let mint = validate(
            &request.issuer,
            &request.student_wallet,
            &request.course,
            &metadata_url,
        )
        .map_err(|e| attempt.fail(e))?;
        self.mint(&mut attempt, route, &mint, signer).await
    }

    async fn mint(
        &self,
        attempt: &mut Attempt,
        route: Route,
        request: &MintRequest<'_>,
        signer: &dyn CallSigner,
    ) -> Result<IssuanceOutcome, IssuanceError> {
        attempt.advance(route.stage());
        let stage_name = attempt.state().name();
        let confirmed = {
            let _timer = StageTimer::new(issuance_metrics(), stage_name);
            self.submit_mint(route, request, signer).await
        }
        .map_err(|e| attempt.fail(e))?;

        attempt.advance(IssuanceState::Minted);
        let token_id = match route {
            Route::Contract { .. } => extract_created_token_id(&confirmed.result),
            Route::Direct => confirmed
                .result
                .created_token_id
                .or_else(|| extract_created_token_id(&confirmed.result)),
        };
        let path = route.path();
        if token_id.is_none() {
            tracing::warn!(
                target: "issuance",
                call_id = %confirmed.call_id,
                %path,
                "call confirmed but the created token could not be identified"
            );
        }

        attempt.advance(IssuanceState::Done);
        issuance_metrics().inc_issuances(&path.to_string());
        tracing::info!(
            target: "issuance",
            call_id = %confirmed.call_id,
            token_id = ?token_id,
            %path,
            "credential issued"
        );
        Ok(IssuanceOutcome {
            token_id,
            call_id: confirmed.call_id,
            path,
        })
    }

    async fn submit_mint(
        &self,
        route: Route,
        request: &MintRequest<'_>,
        signer: &dyn CallSigner,
    ) -> Result<ConfirmedCall, CredentialError> {
        let params = self.network.get_parameters().await?;
        let prepared = match route {
            Route::Contract { program_id } => build_program_call(
                &request.issuer,
                program_id,
                ISSUE_CREDENTIAL,
                &[
                    CallArgument::FixedAddress(request.student),
                    CallArgument::VariableString(request.credential_name.to_string()),
                    CallArgument::VariableString(request.metadata_url.to_string()),
                ],
                params,
            )?,
            Route::Direct => build_token_create(
                &request.issuer,
                &self.issuance.unit_label,
                request.credential_name,
                request.metadata_url,
                params,
            )?,
        };
        self.confirm(&prepared, signer).await
    }

    async fn confirm(
        &self,
        prepared: &PreparedCall,
        signer: &dyn CallSigner,
    ) -> Result<ConfirmedCall, CredentialError> {
        submit_and_confirm(prepared, signer, self.network.as_ref(), &self.pipeline).await
    }

    /// Opts `account` in to holding `token_id`, a prerequisite for receiving it.
    pub async fn opt_in(
        &self,
        account: &str,
        token_id: TokenId,
        signer: &dyn CallSigner,
    ) -> Result<ConfirmedCall, CredentialError> {
        let account = decode_address(account.trim())?;
        let params = self.network.get_parameters().await?;
        let prepared = build_opt_in(&account, token_id, params)?;
        let confirmed = self.confirm(&prepared, signer).await?;
        tracing::info!(target: "issuance", %account, token_id, call_id = %confirmed.call_id, "opted in");
        Ok(confirmed)
    }

    /// Moves the single unit of credential `token_id` from `sender` to `receiver`.
    ///
    /// The receiver must have opted in first.
    pub async fn transfer(
        &self,
        sender: &str,
        receiver: &str,
        token_id: TokenId,
        signer: &dyn CallSigner,
    ) -> Result<ConfirmedCall, CredentialError> {
        let sender = decode_address(sender.trim())?;
        let receiver = decode_address(receiver.trim())?;
        let params = self.network.get_parameters().await?;
        let prepared = build_token_transfer(
            &sender,
            token_id,
            &receiver,
            CREDENTIAL_TRANSFER_AMOUNT,
            params,
        )?;
        let confirmed = self.confirm(&prepared, signer).await?;
        tracing::info!(
            target: "issuance",
            %sender,
            %receiver,
            token_id,
            call_id = %confirmed.call_id,
            "credential transferred"
        );
        Ok(confirmed)
    }
}
