// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
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

//! # Credchain Types
//!
//! This crate is the foundational library for the credential ledger client,
//! containing the call data model, the binary argument encoder, the address
//! codec, configuration objects and the error taxonomy.
//!
//! ## Architectural Role
//!
//! As the base crate, `credchain-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. This prevents circular
//! dependencies and gives one canonical definition for shared types like
//! `Address`, `PreparedCall`, `ConfirmationResult` and `CredentialError`.

/// The maximum encoded size in bytes of a single call argument.
pub const MAX_ARGUMENT_BYTES: usize = 4 * 1024; // 4 KiB

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::CredentialError> = std::result::Result<T, E>;

/// Call, address and record data structures shared by every layer.
pub mod app;
/// The binary encoder for program call arguments.
pub mod codec;
/// Shared configuration structures (`CredchainConfig` and its sections).
pub mod config;
/// The unified error taxonomy used across the workspace.
pub mod error;
