// Path: crates/client/src/pipeline.rs

//! Signing hand-off, submission and bounded confirmation polling for one call.

use credchain_api::network::{CallStatus, NetworkClient};
use credchain_api::signer::CallSigner;
use credchain_telemetry::issuance_metrics;
use credchain_types::app::{ConfirmationResult, PreparedCall, SignedCallBytes};
use credchain_types::config::PipelineConfig;
use credchain_types::error::CredentialError;
use credchain_tx::wire::encode_unsigned;
use std::time::Duration;

/// A call confirmed on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedCall {
    /// The network's identifier of the call.
    pub call_id: String,
    /// The call's effects.
    pub result: ConfirmationResult,
}

async fn sign_one(
    unsigned: Vec<u8>,
    signer: &dyn CallSigner,
    timeout_secs: Option<u64>,
) -> Result<SignedCallBytes, CredentialError> {
    let request = signer.sign(vec![unsigned]);
    let signed = match timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), request)
            .await
            .map_err(|_| {
                CredentialError::SigningRejected(format!("signer did not answer within {}s", secs))
            })??,
        None => request.await?,
    };
    if signed.len() != 1 {
        return Err(CredentialError::SigningRejected(format!(
            "expected 1 signed call, signer returned {}",
            signed.len()
        )));
    }
    signed
        .into_iter()
        .next()
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| CredentialError::SigningRejected("signer returned empty bytes".into()))
}

/// Signs, submits and waits for one prepared call.
///
/// The signer may take arbitrarily long unless `config.signing_timeout_secs` is
/// set. After submission the pipeline polls once per round for at most
/// `config.max_rounds_to_wait` rounds. Network failures propagate immediately;
/// nothing is retried here, and signed bytes are never resubmitted.
pub async fn submit_and_confirm(
    prepared: &PreparedCall,
    signer: &dyn CallSigner,
    network: &dyn NetworkClient,
    config: &PipelineConfig,
) -> Result<ConfirmedCall, CredentialError> {
    let unsigned = encode_unsigned(prepared)?;
    tracing::debug!(target: "pipeline", kind = ?prepared.kind(), "awaiting signature");
    let signed = sign_one(unsigned, signer, config.signing_timeout_secs).await?;

    let call_id = network.submit_raw(signed.as_bytes()).await?;
    let start = network.current_round().await?;
    let budget = config.max_rounds_to_wait;
    tracing::info!(target: "pipeline", %call_id, start, budget, "submitted, waiting for confirmation");

    let mut round = start;
    while round < start.saturating_add(budget) {
        match network.get_confirmed_status(&call_id).await? {
            CallStatus::Confirmed(result) if result.confirmed_round > 0 => {
                let waited = round - start;
                issuance_metrics().observe_confirmation_rounds(waited);
                tracing::info!(
                    target: "pipeline",
                    %call_id,
                    confirmed_round = result.confirmed_round,
                    waited,
                    "call confirmed"
                );
                return Ok(ConfirmedCall { call_id, result });
            }
            CallStatus::Rejected(reason) => {
                tracing::warn!(target: "pipeline", %call_id, %reason, "call rejected by pool");
                return Err(CredentialError::Rejected { call_id, reason });
            }
            CallStatus::Confirmed(_) | CallStatus::Pending => {
                network.wait_for_round_after(round).await?;
                round += 1;
            }
        }
    }

    tracing::warn!(target: "pipeline", %call_id, budget, "confirmation budget exhausted");
    Err(CredentialError::ConfirmationTimeout {
        call_id,
        rounds: budget,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use credchain_api::test_utils::{MockNetwork, MockSigner, SignerMode};
    use credchain_types::app::{Address, NestedCall};
    use credchain_tx::builder::build_token_create;

    fn prepared() -> PreparedCall {
        build_token_create(
            &Address::from_bytes([1u8; 32]),
            "CRED",
            "B.Tech CS",
            "ipfs://abc123",
            MockNetwork::default_params(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_confirms_after_pending_rounds() {
        let net = MockNetwork::new();
        net.push_status(CallStatus::Pending);
        net.push_status(CallStatus::Pending);
        net.confirm_next(ConfirmationResult {
            nested_calls: vec![NestedCall {
                created_token_id: Some(9),
            }],
            ..Default::default()
        });
        let signer = MockSigner::approving();
        let call = prepared();

        let confirmed = submit_and_confirm(&call, &signer, &net, &PipelineConfig::default())
            .await
            .unwrap();
        assert_eq!(confirmed.call_id, "MOCKCALL1");
        assert_eq!(confirmed.result.confirmed_round, 1002);
        assert_eq!(net.polls(), 3);
        // The echo signer hands back the unsigned bytes, which must be what was submitted.
        assert_eq!(net.submitted(), signer.requests());
        assert_eq!(net.submitted()[0], encode_unsigned(&call).unwrap());
    }

    #[tokio::test]
    async fn test_never_confirming_network_times_out() {
        let net = MockNetwork::new();
        let signer = MockSigner::approving();
        let err = submit_and_confirm(&prepared(), &signer, &net, &PipelineConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CredentialError::ConfirmationTimeout { rounds: 4, .. }
        ));
        assert_eq!(net.polls(), 4);
        assert_eq!(net.submitted().len(), 1);
    }

    #[tokio::test]
    async fn test_declined_or_empty_signature_is_rejected_before_submission() {
        for mode in [SignerMode::Reject, SignerMode::Empty] {
            let net = MockNetwork::new();
            let signer = MockSigner::new(mode);
            let err =
                submit_and_confirm(&prepared(), &signer, &net, &PipelineConfig::default())
                    .await
                    .unwrap_err();
            assert!(matches!(err, CredentialError::SigningRejected(_)));
            assert!(net.submitted().is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_signer_resolves_with_timeout() {
        let net = MockNetwork::new();
        let signer = MockSigner::new(SignerMode::Hang);
        let config = PipelineConfig {
            signing_timeout_secs: Some(30),
            ..Default::default()
        };
        let err = submit_and_confirm(&prepared(), &signer, &net, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialError::SigningRejected(_)));
        assert!(net.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_pool_error_is_rejected() {
        let net = MockNetwork::new();
        net.push_status(CallStatus::Rejected("overspend".into()));
        let err = submit_and_confirm(
            &prepared(),
            &MockSigner::approving(),
            &net,
            &PipelineConfig::default(),
        )
        .await
        .unwrap_err();
        match err {
            CredentialError::Rejected { call_id, reason } => {
                assert_eq!(call_id, "MOCKCALL1");
                assert_eq!(reason, "overspend");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_network_failure_propagates() {
        let net = MockNetwork::new();
        net.set_offline(true);
        let err = submit_and_confirm(
            &prepared(),
            &MockSigner::approving(),
            &net,
            &PipelineConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CredentialError::Network(_)));
    }
}
