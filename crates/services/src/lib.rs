// Path: crates/services/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Credchain Services
//!
//! The two flows built on top of the call protocol: issuing a credential
//! (through the deployed program or by direct token creation) and reading it
//! back for verification.

pub mod issuance;
pub mod verification;

pub use issuance::{
    DocumentIssuanceRequest, IssuanceError, IssuanceOrchestrator, IssuanceState,
};
pub use verification::CredentialVerifier;
