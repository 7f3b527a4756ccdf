// Path: crates/services/tests/issuance_scenarios.rs
//! End-to-end issuance against the in-memory network: one run per path, and a
//! deployment swapped while the signer is waiting.

use arc_swap::ArcSwap;
use credchain_api::test_utils::{MockNetwork, MockSigner};
use credchain_services::IssuanceOrchestrator;
use credchain_tx::selectors::{selector_for, ISSUE_CREDENTIAL};
use credchain_tx::wire::decode_unsigned;
use credchain_types::app::{Address, ConfirmationResult, IssuancePath, NestedCall};
use credchain_types::codec::encode_variable_string;
use credchain_types::config::{DeploymentConfig, IssuanceConfig, PipelineConfig};
use std::sync::Arc;

const ISSUER_KEY: [u8; 32] = [0x11; 32];
const STUDENT_KEY: [u8; 32] = [0x22; 32];

fn deployment(program_id: u64) -> Arc<ArcSwap<DeploymentConfig>> {
    Arc::new(ArcSwap::from_pointee(DeploymentConfig {
        program_id,
        program_address: None,
    }))
}

fn orchestrator(
    net: &Arc<MockNetwork>,
    deployment: Arc<ArcSwap<DeploymentConfig>>,
) -> IssuanceOrchestrator {
    IssuanceOrchestrator::new(
        net.clone(),
        deployment,
        PipelineConfig::default(),
        IssuanceConfig::default(),
    )
}

fn addr1() -> String {
    Address::from_bytes(ISSUER_KEY).to_string()
}

fn addr2() -> String {
    Address::from_bytes(STUDENT_KEY).to_string()
}

#[tokio::test]
async fn direct_path_creates_one_of_one_token() {
    let net = Arc::new(MockNetwork::new());
    net.confirm_next(ConfirmationResult {
        created_token_id: Some(555),
        ..Default::default()
    });

    let outcome = orchestrator(&net, deployment(0))
        .issue(
            &addr1(),
            &addr2(),
            "B.Tech CS",
            "ipfs://abc123",
            &MockSigner::approving(),
        )
        .await
        .unwrap();
    assert_eq!(outcome.token_id, Some(555));
    assert_eq!(outcome.path, IssuancePath::DirectPath);

    let submitted = net.submitted();
    assert_eq!(submitted.len(), 1);
    let call = decode_unsigned(&submitted[0]).unwrap();
    assert_eq!(call.kind, "acfg");
    assert_eq!(call.sender.to_vec(), ISSUER_KEY.to_vec());
    let token = call.token_params.unwrap();
    assert_eq!(token.total, 1);
    assert_eq!(token.decimals, 0);
    assert_eq!(token.content_url, "ipfs://abc123");
    assert_eq!(token.unit_label, "CRED");
    assert_eq!(token.display_name, "B.Tech CS");
}

#[tokio::test]
async fn contract_path_calls_issue_credential() {
    let net = Arc::new(MockNetwork::new());
    net.confirm_next(ConfirmationResult {
        nested_calls: vec![NestedCall {
            created_token_id: Some(556),
        }],
        ..Default::default()
    });

    let outcome = orchestrator(&net, deployment(10))
        .issue(
            &addr1(),
            &addr2(),
            "B.Tech CS",
            "ipfs://abc123",
            &MockSigner::approving(),
        )
        .await
        .unwrap();
    assert_eq!(outcome.token_id, Some(556));
    assert_eq!(outcome.path, IssuancePath::ContractPath);

    let call = decode_unsigned(&net.submitted()[0]).unwrap();
    assert_eq!(call.kind, "appl");
    assert_eq!(call.program_id, 10);
    let args: Vec<Vec<u8>> = call.program_args.iter().map(|a| a.to_vec()).collect();
    let selector = selector_for(ISSUE_CREDENTIAL).unwrap();
    assert_eq!(
        args,
        vec![
            selector.as_bytes().to_vec(),
            STUDENT_KEY.to_vec(),
            encode_variable_string("B.Tech CS").unwrap(),
            encode_variable_string("ipfs://abc123").unwrap(),
        ]
    );
}

#[tokio::test]
async fn deployment_swapped_mid_flow_keeps_the_initial_path() {
    let net = Arc::new(MockNetwork::new());
    net.confirm_next(ConfirmationResult {
        created_token_id: Some(555),
        ..Default::default()
    });
    let shared = deployment(0);
    let swapper = shared.clone();
    // Another actor deploys the program while the signer is waiting for approval.
    let signer = MockSigner::approving().with_hook(move || {
        swapper.store(Arc::new(DeploymentConfig {
            program_id: 10,
            program_address: None,
        }));
    });
    let orch = orchestrator(&net, shared.clone());

    let outcome = orch
        .issue(&addr1(), &addr2(), "B.Tech CS", "ipfs://abc123", &signer)
        .await
        .unwrap();
    assert_eq!(outcome.path, IssuancePath::DirectPath);
    assert_eq!(decode_unsigned(&net.submitted()[0]).unwrap().kind, "acfg");
    assert_eq!(shared.load().program_id, 10);

    // The next attempt sees the new deployment.
    net.confirm_next(ConfirmationResult {
        nested_calls: vec![NestedCall {
            created_token_id: Some(556),
        }],
        ..Default::default()
    });
    let outcome = orch
        .issue(&addr1(), &addr2(), "B.Tech CS", "ipfs://abc123", &signer)
        .await
        .unwrap();
    assert_eq!(outcome.path, IssuancePath::ContractPath);
}

#[tokio::test]
async fn long_display_name_is_truncated_on_direct_path() {
    let net = Arc::new(MockNetwork::new());
    net.confirm_next(ConfirmationResult {
        created_token_id: Some(9),
        ..Default::default()
    });
    let name = "Bachelor of Technology in CompSci"; // 33 bytes
    orchestrator(&net, deployment(0))
        .issue(&addr1(), &addr2(), name, "ipfs://abc123", &MockSigner::approving())
        .await
        .unwrap();
    let token = decode_unsigned(&net.submitted()[0])
        .unwrap()
        .token_params
        .unwrap();
    assert_eq!(token.display_name, &name[..32]);
}
