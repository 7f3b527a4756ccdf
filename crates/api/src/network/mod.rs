// Path: crates/api/src/network/mod.rs
//! Defines the `NetworkClient` trait for talking to the ledger.

use async_trait::async_trait;
use credchain_types::app::{
    Address, ConfirmationResult, CredentialRecord, GlobalValue, NetworkParameters, ProgramId,
    TokenId,
};
use credchain_types::error::CredentialError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The status of a submitted call as reported by the network's pending pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallStatus {
    /// The call has not been confirmed yet.
    Pending,
    /// The call was confirmed in a round.
    Confirmed(ConfirmationResult),
    /// The call was dropped from the pool with the given reason.
    Rejected(String),
}

/// A token as summarized by the ledger's account and token queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSummary {
    /// The token identifier.
    pub token_id: TokenId,
    /// The creating account.
    pub creator: Address,
    /// The display name, if set.
    pub name: Option<String>,
    /// The unit label, if set.
    pub unit_name: Option<String>,
    /// The total supply.
    pub total: u64,
    /// The number of decimals.
    pub decimals: u32,
    /// The content URL, if set.
    pub url: Option<String>,
}

impl From<TokenSummary> for CredentialRecord {
    fn from(summary: TokenSummary) -> Self {
        CredentialRecord {
            token_id: summary.token_id,
            display_name: summary.name.unwrap_or_default(),
            unit_label: summary.unit_name.unwrap_or_default(),
            creator_address: summary.creator,
            total_supply: summary.total,
            content_url: summary.url.unwrap_or_default(),
        }
    }
}

/// The ledger operations the protocol core depends on.
///
/// Every method is a suspension point and fails with
/// [`CredentialError::Network`] on transport failure. No implementation retries
/// internally; retry policy belongs to the caller.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Fetches fresh suggested parameters for building one call.
    async fn get_parameters(&self) -> Result<NetworkParameters, CredentialError>;

    /// Submits raw signed bytes and returns the network's call identifier.
    async fn submit_raw(&self, signed: &[u8]) -> Result<String, CredentialError>;

    /// Reports the pool status of a submitted call.
    async fn get_confirmed_status(&self, call_id: &str) -> Result<CallStatus, CredentialError>;

    /// Returns the latest round known to the node.
    async fn current_round(&self) -> Result<u64, CredentialError>;

    /// Suspends until a round after `round` exists and returns the new latest round.
    async fn wait_for_round_after(&self, round: u64) -> Result<u64, CredentialError>;

    /// Lists the tokens created by an account.
    async fn get_account_state(
        &self,
        address: &Address,
    ) -> Result<Vec<TokenSummary>, CredentialError>;

    /// Looks up a token. `Ok(None)` means the token does not exist.
    async fn get_token_state(&self, id: TokenId) -> Result<Option<TokenSummary>, CredentialError>;

    /// Reads a program's global state keyed by raw key bytes. `Ok(None)` means
    /// the program does not exist.
    async fn get_program_state(
        &self,
        program_id: ProgramId,
    ) -> Result<Option<BTreeMap<Vec<u8>, GlobalValue>>, CredentialError>;

    /// Executes an encoded simulation request (unsigned calls, empty signatures
    /// allowed) without committing it and returns the effects of its first call.
    async fn simulate(&self, request: &[u8]) -> Result<ConfirmationResult, CredentialError>;
}
