// Path: crates/tx/src/lib.rs
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

//! Pure, I/O-free construction and decoding of ledger calls.
//!
//! `selectors` maps method signatures to their selectors, `builder` assembles
//! [`PreparedCall`](credchain_types::app::PreparedCall)s, `wire` serializes them
//! to the network's unsigned-call format and `extract` decodes confirmed
//! effects back into token ids and verification verdicts.

pub mod builder;
pub mod extract;
pub mod selectors;
pub mod wire;

pub use builder::{
    build_opt_in, build_program_call, build_token_create, build_token_transfer,
    encode_arguments, MAX_DISPLAY_NAME_BYTES,
};
pub use extract::{extract_created_token_id, extract_verification_verdict};
pub use selectors::{selector_for, ISSUE_CREDENTIAL, VERIFY_CREDENTIAL};
pub use wire::{encode_unsigned, UnsignedCall};
