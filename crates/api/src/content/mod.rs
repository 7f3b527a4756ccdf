// Path: crates/api/src/content/mod.rs
//! Defines the `ContentStore` trait for content-addressed uploads.

use async_trait::async_trait;
use credchain_types::error::CredentialError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The URL scheme under which content identifiers are embedded in call arguments.
pub const CONTENT_URL_SCHEME: &str = "ipfs://";

/// An opaque identifier returned by the content store for uploaded bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub String);

impl ContentId {
    /// Returns the identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Embeds the identifier verbatim into an `ipfs://<id>` URL.
    pub fn to_url(&self) -> String {
        format!("{}{}", CONTENT_URL_SCHEME, self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A content-addressed store for credential documents and their metadata.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Uploads a file and returns its content identifier.
    async fn put_file(&self, name: &str, bytes: Vec<u8>) -> Result<ContentId, CredentialError>;

    /// Uploads a JSON document and returns its content identifier.
    async fn put_json(&self, document: &serde_json::Value) -> Result<ContentId, CredentialError>;
}

/// Renders a content URL as an HTTP gateway URL.
///
/// `ipfs://<id>` and bare identifiers are appended to `gateway`; `http(s)://`
/// URLs are returned unchanged.
pub fn gateway_url(content_url: &str, gateway: &str) -> String {
    if content_url.starts_with("http://") || content_url.starts_with("https://") {
        return content_url.to_string();
    }
    let id = content_url
        .strip_prefix(CONTENT_URL_SCHEME)
        .unwrap_or(content_url);
    if gateway.ends_with('/') {
        format!("{}{}", gateway, id)
    } else {
        format!("{}/{}", gateway, id)
    }
}
