// Path: crates/client/src/lib.rs
//! # Credchain Client Crate Lints
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
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Credchain Client
//!
//! HTTP implementations of the ledger network client and the content store, and
//! the submission and confirmation pipeline that drives one signed call from
//! hand-off to confirmation.

pub mod algod;
pub mod pinata;
pub mod pipeline;

// Re-export for convenience
pub use algod::AlgodClient;
pub use pinata::PinataStore;
pub use pipeline::{submit_and_confirm, ConfirmedCall};
