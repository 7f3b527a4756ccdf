// Path: crates/api/src/signer/mod.rs
//! Defines the `CallSigner` trait, the hand-off to an external signing capability.

use async_trait::async_trait;
use credchain_types::app::SignedCallBytes;
use credchain_types::error::CredentialError;

/// An external capability that signs unsigned call payloads.
///
/// Implementations may suspend for an arbitrary amount of real time while a
/// human approves the request. The returned vector corresponds one-to-one, by
/// position, to the input payloads. A declined or abandoned request must resolve
/// to [`CredentialError::SigningRejected`] (or an empty result, which callers
/// treat the same way) rather than never completing.
#[async_trait]
pub trait CallSigner: Send + Sync {
    /// Signs each unsigned payload.
    async fn sign(&self, unsigned: Vec<Vec<u8>>) -> Result<Vec<SignedCallBytes>, CredentialError>;
}
