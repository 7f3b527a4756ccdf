// Path: crates/client/src/algod.rs

//! A [`NetworkClient`] over the ledger node's REST API.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use credchain_api::network::{CallStatus, NetworkClient, TokenSummary};
use credchain_types::app::{
    Address, ConfirmationResult, GlobalValue, LogRecord, NestedCall, NetworkParameters,
    ProgramId, TokenId,
};
use credchain_types::config::NetworkConfig;
use credchain_types::error::CredentialError;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// The header carrying the node API token.
pub const TOKEN_HEADER: &str = "X-Algo-API-Token";

/// How many rounds past the current one a freshly built call stays valid.
pub const VALIDITY_WINDOW_ROUNDS: u64 = 1000;

const GLOBAL_STATE_BYTES: u64 = 1;
const GLOBAL_STATE_UINT: u64 = 2;

fn network(e: reqwest::Error) -> CredentialError {
    CredentialError::Network(e.to_string())
}

fn snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    text.trim().chars().take(160).collect::<String>().replace('\n', "\\n")
}

fn decode_b64(field: &str, value: &str) -> Result<Vec<u8>, CredentialError> {
    B64.decode(value)
        .map_err(|e| CredentialError::Decode(format!("{} is not base64: {}", field, e)))
}

// --- Response shapes ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ParamsResponse {
    fee: u64,
    genesis_hash: String,
    genesis_id: String,
    last_round: u64,
    min_fee: u64,
}

impl ParamsResponse {
    fn into_parameters(self) -> Result<NetworkParameters, CredentialError> {
        let hash = decode_b64("genesis-hash", &self.genesis_hash)?;
        let genesis_hash: [u8; 32] = hash.try_into().map_err(|h: Vec<u8>| {
            CredentialError::Decode(format!("genesis-hash has {} bytes, want 32", h.len()))
        })?;
        Ok(NetworkParameters {
            fee: self.fee,
            min_fee: self.min_fee,
            flat_fee: false,
            first_valid: self.last_round,
            last_valid: self.last_round.saturating_add(VALIDITY_WINDOW_ROUNDS),
            genesis_id: self.genesis_id,
            genesis_hash,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    tx_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct StatusResponse {
    last_round: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PendingResponse {
    #[serde(default)]
    confirmed_round: Option<u64>,
    #[serde(default)]
    pool_error: String,
    #[serde(default)]
    asset_index: Option<u64>,
    #[serde(default)]
    inner_txns: Vec<PendingResponse>,
    #[serde(default)]
    logs: Vec<String>,
}

impl PendingResponse {
    fn into_result(self) -> ConfirmationResult {
        ConfirmationResult {
            confirmed_round: self.confirmed_round.unwrap_or_default(),
            created_token_id: self.asset_index.filter(|id| *id > 0),
            nested_calls: self
                .inner_txns
                .into_iter()
                .map(|inner| NestedCall {
                    created_token_id: inner.asset_index.filter(|id| *id > 0),
                })
                .collect(),
            log_records: self.logs.into_iter().map(LogRecord).collect(),
        }
    }

    fn into_status(self) -> CallStatus {
        if self.confirmed_round.unwrap_or_default() > 0 {
            CallStatus::Confirmed(self.into_result())
        } else if !self.pool_error.is_empty() {
            CallStatus::Rejected(self.pool_error)
        } else {
            CallStatus::Pending
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct AssetParams {
    creator: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    unit_name: Option<String>,
    total: u64,
    #[serde(default)]
    decimals: u32,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    index: u64,
    params: AssetParams,
}

impl AssetResponse {
    fn into_summary(self) -> Result<TokenSummary, CredentialError> {
        let creator = self.params.creator.parse::<Address>().map_err(|e| {
            CredentialError::Decode(format!("asset {} creator: {}", self.index, e))
        })?;
        Ok(TokenSummary {
            token_id: self.index,
            creator,
            name: self.params.name,
            unit_name: self.params.unit_name,
            total: self.params.total,
            decimals: self.params.decimals,
            url: self.params.url,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct AccountResponse {
    #[serde(default)]
    created_assets: Vec<AssetResponse>,
}

#[derive(Debug, Deserialize)]
struct StateValue {
    #[serde(rename = "type")]
    kind: u64,
    #[serde(default)]
    bytes: String,
    #[serde(default)]
    uint: u64,
}

#[derive(Debug, Deserialize)]
struct StateEntry {
    key: String,
    value: StateValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ApplicationParams {
    #[serde(default)]
    global_state: Vec<StateEntry>,
}

#[derive(Debug, Deserialize)]
struct ApplicationResponse {
    params: ApplicationParams,
}

impl ApplicationResponse {
    fn into_state(self) -> Result<BTreeMap<Vec<u8>, GlobalValue>, CredentialError> {
        let mut state = BTreeMap::new();
        for entry in self.params.global_state {
            let key = decode_b64("global-state key", &entry.key)?;
            let value = match entry.value.kind {
                GLOBAL_STATE_BYTES => {
                    GlobalValue::Bytes(decode_b64("global-state value", &entry.value.bytes)?)
                }
                GLOBAL_STATE_UINT => GlobalValue::Uint(entry.value.uint),
                other => {
                    tracing::debug!(target: "algod", kind = other, "skipping unknown state type");
                    continue;
                }
            };
            state.insert(key, value);
        }
        Ok(state)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SimulateTxnResult {
    txn_result: PendingResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SimulateGroupResult {
    #[serde(default)]
    failure_message: Option<String>,
    #[serde(default)]
    txn_results: Vec<SimulateTxnResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SimulateResponse {
    txn_groups: Vec<SimulateGroupResult>,
}

impl SimulateResponse {
    fn into_result(self) -> Result<ConfirmationResult, CredentialError> {
        let group = self
            .txn_groups
            .into_iter()
            .next()
            .ok_or_else(|| CredentialError::Decode("simulation returned no groups".into()))?;
        if let Some(reason) = group.failure_message.filter(|m| !m.is_empty()) {
            return Err(CredentialError::Rejected {
                call_id: "simulation".into(),
                reason,
            });
        }
        group
            .txn_results
            .into_iter()
            .next()
            .map(|r| r.txn_result.into_result())
            .ok_or_else(|| CredentialError::Decode("simulation returned no results".into()))
    }
}

// --- Client ---

/// A client for the ledger node's REST API.
#[derive(Clone)]
pub struct AlgodClient {
    base: String,
    token: String,
    client: Client,
}

impl std::fmt::Debug for AlgodClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgodClient").field("base", &self.base).finish()
    }
}

impl AlgodClient {
    /// Creates a client for the configured node.
    pub fn new(config: &NetworkConfig) -> Result<Self, CredentialError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CredentialError::Config(format!("http client: {}", e)))?;
        Ok(Self {
            base: config.algod_url.trim_end_matches('/').to_string(),
            token: config.algod_token.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, CredentialError> {
        tracing::debug!(target: "algod", path, "request");
        request
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(network)
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        response: Response,
    ) -> Result<T, CredentialError> {
        let status = response.status();
        let body = response.bytes().await.map_err(network)?;
        if !status.is_success() {
            return Err(CredentialError::Network(format!(
                "{} returned {}: {}",
                path,
                status,
                snippet(&body)
            )));
        }
        serde_json::from_slice(&body)
            .map_err(|e| CredentialError::Decode(format!("{}: {}", path, e)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CredentialError> {
        let response = self.send(self.client.get(self.url(path)), path).await?;
        Self::decode(path, response).await
    }

    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, CredentialError> {
        let response = self.send(self.client.get(self.url(path)), path).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(path, response).await.map(Some)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<T, CredentialError> {
        let request = self
            .client
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body);
        let response = self.send(request, path).await?;
        Self::decode(path, response).await
    }
}

#[async_trait]
impl NetworkClient for AlgodClient {
    async fn get_parameters(&self) -> Result<NetworkParameters, CredentialError> {
        self.get::<ParamsResponse>("/v2/transactions/params")
            .await?
            .into_parameters()
    }

    async fn submit_raw(&self, signed: &[u8]) -> Result<String, CredentialError> {
        let response: SubmitResponse = self
            .post("/v2/transactions", "application/x-binary", signed.to_vec())
            .await?;
        tracing::info!(target: "algod", call_id = %response.tx_id, "submitted call");
        Ok(response.tx_id)
    }

    async fn get_confirmed_status(&self, call_id: &str) -> Result<CallStatus, CredentialError> {
        let path = format!("/v2/transactions/pending/{}", call_id);
        Ok(self.get::<PendingResponse>(&path).await?.into_status())
    }

    async fn current_round(&self) -> Result<u64, CredentialError> {
        Ok(self.get::<StatusResponse>("/v2/status").await?.last_round)
    }

    async fn wait_for_round_after(&self, round: u64) -> Result<u64, CredentialError> {
        let path = format!("/v2/status/wait-for-block-after/{}", round);
        Ok(self.get::<StatusResponse>(&path).await?.last_round)
    }

    async fn get_account_state(
        &self,
        address: &Address,
    ) -> Result<Vec<TokenSummary>, CredentialError> {
        let path = format!("/v2/accounts/{}", address);
        self.get::<AccountResponse>(&path)
            .await?
            .created_assets
            .into_iter()
            .map(AssetResponse::into_summary)
            .collect()
    }

    async fn get_token_state(&self, id: TokenId) -> Result<Option<TokenSummary>, CredentialError> {
        let path = format!("/v2/assets/{}", id);
        self.get_optional::<AssetResponse>(&path)
            .await?
            .map(AssetResponse::into_summary)
            .transpose()
    }

    async fn get_program_state(
        &self,
        program_id: ProgramId,
    ) -> Result<Option<BTreeMap<Vec<u8>, GlobalValue>>, CredentialError> {
        let path = format!("/v2/applications/{}", program_id);
        self.get_optional::<ApplicationResponse>(&path)
            .await?
            .map(ApplicationResponse::into_state)
            .transpose()
    }

    async fn simulate(&self, request: &[u8]) -> Result<ConfirmationResult, CredentialError> {
        self.post::<SimulateResponse>(
            "/v2/transactions/simulate?format=json",
            "application/msgpack",
            request.to_vec(),
        )
        .await?
        .into_result()
    }
}
