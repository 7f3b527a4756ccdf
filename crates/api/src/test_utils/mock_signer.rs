// Path: crates/api/src/test_utils/mock_signer.rs
//! Mock signer for testing

use super::lock;
use crate::signer::CallSigner;
use async_trait::async_trait;
use credchain_types::app::SignedCallBytes;
use credchain_types::error::CredentialError;
use std::sync::Mutex;

/// How a [`MockSigner`] answers a signing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerMode {
    /// Returns every payload unchanged as its "signed" form.
    Echo,
    /// Fails with `SigningRejected`, as when the user declines.
    Reject,
    /// Returns an empty result, as when the approval prompt is closed.
    Empty,
    /// Never answers, as when the user walks away from the prompt.
    Hang,
}

type SignHook = Box<dyn Fn() + Send + Sync>;

/// Mock signer implementation for testing.
///
/// Records every payload it is asked to sign. An optional hook runs before each
/// answer, so tests can act as an external party while the signer "waits".
pub struct MockSigner {
    mode: SignerMode,
    requests: Mutex<Vec<Vec<u8>>>,
    hook: Option<SignHook>,
}

impl std::fmt::Debug for MockSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSigner")
            .field("mode", &self.mode)
            .field("requests", &lock(&self.requests).len())
            .finish()
    }
}

impl MockSigner {
    /// Creates a signer answering in `mode`.
    pub fn new(mode: SignerMode) -> Self {
        Self {
            mode,
            requests: Mutex::new(Vec::new()),
            hook: None,
        }
    }

    /// A signer that approves everything.
    pub fn approving() -> Self {
        Self::new(SignerMode::Echo)
    }

    /// Runs `hook` every time a request arrives, before answering.
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Every unsigned payload received so far, in order.
    pub fn requests(&self) -> Vec<Vec<u8>> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl CallSigner for MockSigner {
    async fn sign(&self, unsigned: Vec<Vec<u8>>) -> Result<Vec<SignedCallBytes>, CredentialError> {
        lock(&self.requests).extend(unsigned.iter().cloned());
        if let Some(hook) = &self.hook {
            hook();
        }
        match self.mode {
            SignerMode::Echo => Ok(unsigned.into_iter().map(SignedCallBytes).collect()),
            SignerMode::Reject => Err(CredentialError::SigningRejected(
                "user declined the request".into(),
            )),
            SignerMode::Empty => Ok(Vec::new()),
            SignerMode::Hang => std::future::pending().await,
        }
    }
}
