// Path: crates/cli/src/lib.rs
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

//! # Credchain CLI Library
//!
//! The pieces of the `credchain` binary that are worth testing on their own:
//! loading configuration and wiring the HTTP clients into the services, and
//! the interactive signer that hands unsigned calls to the operator.
//!
//! Like any other consumer, this crate only uses the public APIs of the
//! `credchain-*` libraries. It contains no protocol logic.

pub mod context;
pub mod signer;

pub use context::AppContext;
pub use signer::PromptSigner;
