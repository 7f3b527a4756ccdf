// Path: crates/api/src/test_utils/mock_content.rs
//! Mock content store for testing

use super::lock;
use crate::content::{ContentId, ContentStore};
use async_trait::async_trait;
use credchain_types::error::CredentialError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Mock content store implementation for testing.
///
/// Files get identifiers `file-<n>` and JSON documents `json-<n>`, counted
/// separately from 1.
#[derive(Debug, Default)]
pub struct MockContentStore {
    files: Mutex<Vec<(String, Vec<u8>)>>,
    documents: Mutex<Vec<serde_json::Value>>,
    failing: AtomicBool,
}

impl MockContentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent upload fail with a network error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// The uploaded files as `(name, bytes)`, in order.
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        lock(&self.files).clone()
    }

    /// The uploaded JSON documents, in order.
    pub fn documents(&self) -> Vec<serde_json::Value> {
        lock(&self.documents).clone()
    }

    fn check(&self) -> Result<(), CredentialError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CredentialError::Network("mock content store is down".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn put_file(&self, name: &str, bytes: Vec<u8>) -> Result<ContentId, CredentialError> {
        self.check()?;
        let mut files = lock(&self.files);
        files.push((name.to_string(), bytes));
        Ok(ContentId(format!("file-{}", files.len())))
    }

    async fn put_json(&self, document: &serde_json::Value) -> Result<ContentId, CredentialError> {
        self.check()?;
        let mut documents = lock(&self.documents);
        documents.push(document.clone());
        Ok(ContentId(format!("json-{}", documents.len())))
    }
}
