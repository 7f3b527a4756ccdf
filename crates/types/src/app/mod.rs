// Path: crates/types/src/app/mod.rs
//! Core application-level data structures: addresses, calls and results.

/// Ledger addresses and their checksummed text form.
pub mod address;
/// Prepared calls, call arguments and network parameters.
pub mod call;
/// Confirmation results and records derived from ledger state.
pub mod record;

pub use address::{decode_address, encode_address_text, program_address, Address};
pub use call::{
    CallArgument, CallBody, CallKind, NetworkParameters, PreparedCall, Selector,
    SignedCallBytes, TokenCreateParams, TokenTransferParams,
};
pub use record::{
    ConfirmationResult, CredentialRecord, GlobalValue, IssuanceOutcome, IssuancePath,
    LogRecord, NestedCall, ProgramInfo,
};

/// The ledger identifier of a token.
pub type TokenId = u64;

/// The ledger identifier of a deployed program. Zero means "not deployed".
pub type ProgramId = u64;
