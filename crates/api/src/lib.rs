// Path: crates/api/src/lib.rs

//! # Credchain API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
#![deny(missing_docs)]
//! # Credchain API
//!
//! The traits at the seams between the protocol core and its external
//! collaborators: the ledger network client, the (possibly interactive) signer,
//! and the content-addressed store. Concrete HTTP implementations live in
//! `credchain-client`; in-memory fakes for tests live in [`test_utils`].

/// The content-addressed store for credential documents and metadata.
pub mod content;
/// Re-exports the error taxonomy from `credchain-types`.
pub mod error;
/// The ledger network client.
pub mod network;
/// The external signer capability.
pub mod signer;
/// In-memory fakes of every collaborator, for tests.
pub mod test_utils;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::content::{ContentId, ContentStore};
    pub use crate::error::{CredentialError, ErrorCode};
    pub use crate::network::{CallStatus, NetworkClient, TokenSummary};
    pub use crate::signer::CallSigner;
}
