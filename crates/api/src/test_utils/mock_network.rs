// Path: crates/api/src/test_utils/mock_network.rs
//! Mock ledger network for testing

use super::lock;
use crate::network::{CallStatus, NetworkClient, TokenSummary};
use async_trait::async_trait;
use credchain_types::app::{
    Address, ConfirmationResult, GlobalValue, NetworkParameters, ProgramId, TokenId,
};
use credchain_types::error::CredentialError;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// The round the mock network starts at.
pub const MOCK_START_ROUND: u64 = 1000;

/// Mock network implementation for testing.
///
/// Status polls pop from a scripted queue and report [`CallStatus::Pending`]
/// once the queue is empty, so an unscripted network never confirms anything.
/// Rounds advance only when the pipeline waits for the next one.
#[derive(Debug)]
pub struct MockNetwork {
    params: Mutex<NetworkParameters>,
    round: AtomicU64,
    statuses: Mutex<VecDeque<CallStatus>>,
    submitted: Mutex<Vec<Vec<u8>>>,
    polls: AtomicU64,
    tokens: Mutex<BTreeMap<TokenId, TokenSummary>>,
    programs: Mutex<BTreeMap<ProgramId, BTreeMap<Vec<u8>, GlobalValue>>>,
    simulation: Mutex<ConfirmationResult>,
    simulated: Mutex<Vec<Vec<u8>>>,
    offline: AtomicBool,
}

impl Default for MockNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNetwork {
    /// Creates a network with valid parameters and nothing scripted.
    pub fn new() -> Self {
        Self {
            params: Mutex::new(Self::default_params()),
            round: AtomicU64::new(MOCK_START_ROUND),
            statuses: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
            polls: AtomicU64::new(0),
            tokens: Mutex::new(BTreeMap::new()),
            programs: Mutex::new(BTreeMap::new()),
            simulation: Mutex::new(ConfirmationResult::default()),
            simulated: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
        }
    }

    /// The parameters every new mock hands out.
    pub fn default_params() -> NetworkParameters {
        NetworkParameters {
            fee: 0,
            min_fee: 1000,
            flat_fee: false,
            first_valid: MOCK_START_ROUND,
            last_valid: MOCK_START_ROUND + 1000,
            genesis_id: "testnet-v1.0".to_string(),
            genesis_hash: [7u8; 32],
        }
    }

    /// Replaces the parameters returned by `get_parameters`.
    pub fn set_params(&self, params: NetworkParameters) {
        *lock(&self.params) = params;
    }

    /// Queues the status returned by the next poll.
    pub fn push_status(&self, status: CallStatus) {
        lock(&self.statuses).push_back(status);
    }

    /// Queues a confirmation of the next submitted call.
    pub fn confirm_next(&self, result: ConfirmationResult) {
        self.push_status(CallStatus::Confirmed(result));
    }

    /// Registers a token for the token and account queries.
    pub fn insert_token(&self, token: TokenSummary) {
        lock(&self.tokens).insert(token.token_id, token);
    }

    /// Registers a program's global state.
    pub fn insert_program(&self, id: ProgramId, state: BTreeMap<Vec<u8>, GlobalValue>) {
        lock(&self.programs).insert(id, state);
    }

    /// Sets the effects returned by `simulate`.
    pub fn set_simulation(&self, result: ConfirmationResult) {
        *lock(&self.simulation) = result;
    }

    /// Makes every subsequent request fail with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// The raw bytes submitted so far, in order.
    pub fn submitted(&self) -> Vec<Vec<u8>> {
        lock(&self.submitted).clone()
    }

    /// The simulation requests received so far, in order.
    pub fn simulated(&self) -> Vec<Vec<u8>> {
        lock(&self.simulated).clone()
    }

    /// The number of status polls served.
    pub fn polls(&self) -> u64 {
        self.polls.load(Ordering::SeqCst)
    }

    /// The current round.
    pub fn round(&self) -> u64 {
        self.round.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), CredentialError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CredentialError::Network("mock network is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl NetworkClient for MockNetwork {
    async fn get_parameters(&self) -> Result<NetworkParameters, CredentialError> {
        self.check_online()?;
        Ok(lock(&self.params).clone())
    }

    async fn submit_raw(&self, signed: &[u8]) -> Result<String, CredentialError> {
        self.check_online()?;
        let mut submitted = lock(&self.submitted);
        submitted.push(signed.to_vec());
        Ok(format!("MOCKCALL{}", submitted.len()))
    }

    async fn get_confirmed_status(&self, _call_id: &str) -> Result<CallStatus, CredentialError> {
        self.check_online()?;
        self.polls.fetch_add(1, Ordering::SeqCst);
        let status = lock(&self.statuses).pop_front();
        Ok(match status {
            Some(CallStatus::Confirmed(mut result)) => {
                if result.confirmed_round == 0 {
                    result.confirmed_round = self.round();
                }
                CallStatus::Confirmed(result)
            }
            Some(other) => other,
            None => CallStatus::Pending,
        })
    }

    async fn current_round(&self) -> Result<u64, CredentialError> {
        self.check_online()?;
        Ok(self.round())
    }

    async fn wait_for_round_after(&self, round: u64) -> Result<u64, CredentialError> {
        self.check_online()?;
        let next = round.saturating_add(1);
        self.round.fetch_max(next, Ordering::SeqCst);
        Ok(self.round())
    }

    async fn get_account_state(
        &self,
        address: &Address,
    ) -> Result<Vec<TokenSummary>, CredentialError> {
        self.check_online()?;
        Ok(lock(&self.tokens)
            .values()
            .filter(|t| &t.creator == address)
            .cloned()
            .collect())
    }

    async fn get_token_state(&self, id: TokenId) -> Result<Option<TokenSummary>, CredentialError> {
        self.check_online()?;
        Ok(lock(&self.tokens).get(&id).cloned())
    }

    async fn get_program_state(
        &self,
        program_id: ProgramId,
    ) -> Result<Option<BTreeMap<Vec<u8>, GlobalValue>>, CredentialError> {
        self.check_online()?;
        Ok(lock(&self.programs).get(&program_id).cloned())
    }

    async fn simulate(&self, request: &[u8]) -> Result<ConfirmationResult, CredentialError> {
        self.check_online()?;
        lock(&self.simulated).push(request.to_vec());
        Ok(lock(&self.simulation).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unscripted_polls_stay_pending() {
        let net = MockNetwork::new();
        let id = net.submit_raw(b"abc").await.unwrap();
        assert_eq!(id, "MOCKCALL1");
        assert_eq!(
            net.get_confirmed_status(&id).await.unwrap(),
            CallStatus::Pending
        );
        assert_eq!(net.polls(), 1);
    }

    #[tokio::test]
    async fn test_confirmed_status_carries_current_round() {
        let net = MockNetwork::new();
        net.wait_for_round_after(MOCK_START_ROUND).await.unwrap();
        net.confirm_next(ConfirmationResult::default());
        match net.get_confirmed_status("x").await.unwrap() {
            CallStatus::Confirmed(r) => assert_eq!(r.confirmed_round, MOCK_START_ROUND + 1),
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_offline_fails_with_network_error() {
        let net = MockNetwork::new();
        net.set_offline(true);
        assert!(matches!(
            net.get_parameters().await,
            Err(CredentialError::Network(_))
        ));
    }
}
