// Path: crates/services/src/issuance/state.rs
//! The issuance state machine and its stage-tagged error.

use credchain_types::error::{CredentialError, ErrorCode};
use std::fmt;
use thiserror::Error;

/// The stage of one issuance attempt.
///
/// `Idle → [Uploading → BuildingMetadata →] (ContractCall | DirectCreate) →
/// Minted → Done`, with `Failed` reachable from every state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuanceState {
    /// Validating inputs; nothing has touched the network yet.
    Idle,
    /// Uploading the credential document to the content store.
    Uploading,
    /// Uploading the credential metadata to the content store.
    BuildingMetadata,
    /// Issuing through the deployed credential program.
    ContractCall,
    /// Issuing by creating a one-of-one token directly.
    DirectCreate,
    /// The call is confirmed; the token id is being extracted.
    Minted,
    /// The outcome has been produced.
    Done,
    /// The attempt failed with the given reason.
    Failed(String),
}

impl IssuanceState {
    /// A short, stable name for logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::BuildingMetadata => "building_metadata",
            Self::ContractCall => "contract_call",
            Self::DirectCreate => "direct_create",
            Self::Minted => "minted",
            Self::Done => "done",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for IssuanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "failed: {}", reason),
            other => f.write_str(other.name()),
        }
    }
}

/// A failure of one issuance attempt, tagged with the stage it happened in.
///
/// The inner error is carried unchanged; [`IssuanceError::kind`] exposes it.
#[derive(Debug, Error)]
#[error("issuance failed during {stage}: {source}")]
pub struct IssuanceError {
    /// The stage that was running when the failure occurred.
    pub stage: IssuanceState,
    /// The underlying failure.
    #[source]
    pub source: CredentialError,
}

impl IssuanceError {
    /// The underlying failure, unchanged in kind.
    pub fn kind(&self) -> &CredentialError {
        &self.source
    }
}

impl ErrorCode for IssuanceError {
    fn code(&self) -> &'static str {
        self.source.code()
    }
}

/// The running state of one issuance attempt.
#[derive(Debug)]
pub(crate) struct Attempt {
    state: IssuanceState,
}

impl Attempt {
    pub(crate) fn new() -> Self {
        Self {
            state: IssuanceState::Idle,
        }
    }

    pub(crate) fn state(&self) -> &IssuanceState {
        &self.state
    }

    pub(crate) fn advance(&mut self, next: IssuanceState) {
        tracing::debug!(target: "issuance", from = %self.state, to = %next, "transition");
        self.state = next;
    }

    /// Moves to `Failed` and returns the error tagged with the stage that failed.
    pub(crate) fn fail(&mut self, source: CredentialError) -> IssuanceError {
        let stage = std::mem::replace(&mut self.state, IssuanceState::Failed(source.to_string()));
        tracing::warn!(target: "issuance", %stage, code = source.code(), error = %source, "issuance failed");
        credchain_telemetry::error_metrics().inc_error("issuance", source.code());
        IssuanceError { stage, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_fail_keeps_stage_and_kind() {
        let mut attempt = Attempt::new();
        attempt.advance(IssuanceState::DirectCreate);
        let err = attempt.fail(CredentialError::Network("down".into()));
        assert_eq!(err.stage, IssuanceState::DirectCreate);
        assert!(matches!(err.kind(), CredentialError::Network(_)));
        assert_eq!(err.code(), "NETWORK_ERROR");
        assert!(err.source().is_some());
        assert!(matches!(attempt.state(), IssuanceState::Failed(_)));
        assert_eq!(
            err.to_string(),
            "issuance failed during direct_create: Network error: down"
        );
    }
}
