// Path: crates/client/src/pinata.rs

//! A [`ContentStore`] backed by the Pinata pinning API.

use async_trait::async_trait;
use credchain_api::content::{ContentId, ContentStore};
use credchain_types::config::ContentStoreConfig;
use credchain_types::error::CredentialError;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const PIN_FILE_PATH: &str = "/pinning/pinFileToIPFS";
const PIN_JSON_PATH: &str = "/pinning/pinJSONToIPFS";
const UPLOAD_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

fn status_error<E: std::fmt::Display>(
    path: &str,
    status: StatusCode,
    body: Result<String, E>,
) -> CredentialError {
    match body {
        Ok(body) => CredentialError::Network(format!("{} returned {}: {}", path, status, body.trim())),
        Err(e) => {
            tracing::debug!(target: "content_store", path, %status, error = %e, "error body unreadable");
            CredentialError::Network(format!(
                "{} returned {} (body unreadable: {})",
                path, status, e
            ))
        }
    }
}

/// Uploads credential documents and metadata to a Pinata account.
#[derive(Clone)]
pub struct PinataStore {
    api_url: String,
    api_key: String,
    api_secret: String,
    client: Client,
}

impl std::fmt::Debug for PinataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinataStore")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl PinataStore {
    /// Creates a store from the configured credentials. Both key and secret are required.
    pub fn new(config: &ContentStoreConfig) -> Result<Self, CredentialError> {
        if config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(CredentialError::Config(
                "content_store.api_key and content_store.api_secret must be set".into(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| CredentialError::Config(format!("http client: {}", e)))?;
        Ok(Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            client,
        })
    }

    async fn pin(&self, path: &str, request: RequestBuilder) -> Result<ContentId, CredentialError> {
        let response = request
            .header("pinata_api_key", &self.api_key)
            .header("pinata_secret_api_key", &self.api_secret)
            .send()
            .await
            .map_err(|e| CredentialError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(path, status, response.text().await));
        }
        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|e| CredentialError::Decode(format!("{}: {}", path, e)))?;
        if pinned.ipfs_hash.is_empty() {
            return Err(CredentialError::Decode(format!("{}: empty IpfsHash", path)));
        }
        tracing::info!(target: "content_store", cid = %pinned.ipfs_hash, path, "pinned");
        Ok(ContentId(pinned.ipfs_hash))
    }
}

#[async_trait]
impl ContentStore for PinataStore {
    async fn put_file(&self, name: &str, bytes: Vec<u8>) -> Result<ContentId, CredentialError> {
        let size = bytes.len();
        let form = Form::new().part("file", Part::bytes(bytes).file_name(name.to_string()));
        tracing::debug!(target: "content_store", name, size, "uploading file");
        let request = self
            .client
            .post(format!("{}{}", self.api_url, PIN_FILE_PATH))
            .multipart(form);
        self.pin(PIN_FILE_PATH, request).await
    }

    async fn put_json(&self, document: &serde_json::Value) -> Result<ContentId, CredentialError> {
        let request = self
            .client
            .post(format!("{}{}", self.api_url, PIN_JSON_PATH))
            .json(document);
        self.pin(PIN_JSON_PATH, request).await
    }
}
