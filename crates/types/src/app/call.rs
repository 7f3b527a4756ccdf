// Path: crates/types/src/app/call.rs
//! Prepared ledger calls and the inputs needed to build them.

use super::address::Address;
use super::{ProgramId, TokenId};
use crate::error::CredentialError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The width of a method selector.
pub const SELECTOR_BYTES: usize = 4;

/// A 4-byte method selector prefixed to program call arguments.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector(pub [u8; SELECTOR_BYTES]);

impl Selector {
    /// Returns the raw selector bytes.
    pub fn as_bytes(&self) -> &[u8; SELECTOR_BYTES] {
        &self.0
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Selector(")?;
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        f.write_str(")")
    }
}

/// A typed argument to a program method, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArgument {
    /// A 32-byte account address.
    FixedAddress(Address),
    /// A UTF-8 string, length-prefixed on the wire.
    VariableString(String),
    /// An unsigned 64-bit integer, big-endian on the wire.
    FixedUint64(u64),
}

impl CallArgument {
    /// The ABI type name this argument satisfies in a method signature.
    pub fn abi_type(&self) -> &'static str {
        match self {
            Self::FixedAddress(_) => "address",
            Self::VariableString(_) => "string",
            Self::FixedUint64(_) => "uint64",
        }
    }
}

/// Suggested parameters fetched from the network immediately before building a call.
///
/// A value of this type must never be reused across calls: its validity window expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParameters {
    /// Fee per byte, or the absolute fee when `flat_fee` is set.
    pub fee: u64,
    /// The minimum fee the network accepts for one call.
    pub min_fee: u64,
    /// Whether `fee` is an absolute fee rather than a per-byte rate.
    pub flat_fee: bool,
    /// The first round in which the call is valid.
    pub first_valid: u64,
    /// The last round in which the call is valid.
    pub last_valid: u64,
    /// The human-readable genesis identifier of the network.
    pub genesis_id: String,
    /// The hash of the network's genesis block.
    pub genesis_hash: [u8; 32],
}

impl NetworkParameters {
    /// Checks that every field a call needs is present and consistent.
    pub fn validate(&self) -> Result<(), CredentialError> {
        if self.genesis_id.is_empty() {
            return Err(CredentialError::InvalidParameters(
                "genesis id is missing".into(),
            ));
        }
        if self.genesis_hash == [0u8; 32] {
            return Err(CredentialError::InvalidParameters(
                "genesis hash is missing".into(),
            ));
        }
        if self.last_valid <= self.first_valid {
            return Err(CredentialError::InvalidParameters(format!(
                "empty validity window [{}, {}]",
                self.first_valid, self.last_valid
            )));
        }
        Ok(())
    }
}

/// The kind of a prepared call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallKind {
    /// An application call into a deployed program.
    ProgramCall,
    /// The creation of a new token.
    TokenCreate,
    /// A transfer of token units (an opt-in is a zero-amount self transfer).
    TokenTransfer,
}

/// Parameters of a token-creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreateParams {
    /// Total number of base units ever in existence.
    pub total: u64,
    /// Number of decimal places of one unit.
    pub decimals: u32,
    /// Whether holdings start frozen.
    pub default_frozen: bool,
    /// Short unit label, e.g. `CRED`.
    pub unit_label: String,
    /// Display name of the token.
    pub display_name: String,
    /// URL of the off-chain content describing the token.
    pub content_url: String,
    /// Account allowed to reconfigure the token.
    pub manager: Address,
    /// Account holding non-minted units.
    pub reserve: Address,
    /// Account allowed to freeze holdings.
    pub freeze: Address,
    /// Account allowed to revoke holdings.
    pub clawback: Address,
}

/// Parameters of a token-transfer call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransferParams {
    /// The token being moved.
    pub token_id: TokenId,
    /// The receiving account.
    pub receiver: Address,
    /// The number of base units moved.
    pub amount: u64,
}

/// The kind-specific body of a prepared call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallBody {
    /// A program call: selector followed by encoded arguments.
    Program {
        /// The target program.
        program_id: ProgramId,
        /// The method selector.
        selector: Selector,
        /// The encoded arguments, in declaration order.
        args: Vec<Vec<u8>>,
    },
    /// A token creation.
    TokenCreate(TokenCreateParams),
    /// A token transfer.
    TokenTransfer(TokenTransferParams),
}

/// An immutable, fully built call awaiting serialization and signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedCall {
    sender: Address,
    body: CallBody,
    params: NetworkParameters,
}

impl PreparedCall {
    /// Assembles a prepared call. Callers are expected to have validated the inputs.
    pub fn new(sender: Address, body: CallBody, params: NetworkParameters) -> Self {
        Self {
            sender,
            body,
            params,
        }
    }

    /// The account that sends (and signs) the call.
    pub fn sender(&self) -> &Address {
        &self.sender
    }

    /// The kind-specific body.
    pub fn body(&self) -> &CallBody {
        &self.body
    }

    /// The network parameters the call was built with.
    pub fn params(&self) -> &NetworkParameters {
        &self.params
    }

    /// The kind of this call.
    pub fn kind(&self) -> CallKind {
        match self.body {
            CallBody::Program { .. } => CallKind::ProgramCall,
            CallBody::TokenCreate(_) => CallKind::TokenCreate,
            CallBody::TokenTransfer(_) => CallKind::TokenTransfer,
        }
    }

    /// The method selector, for program calls.
    pub fn selector(&self) -> Option<&Selector> {
        match &self.body {
            CallBody::Program { selector, .. } => Some(selector),
            _ => None,
        }
    }

    /// The encoded arguments, for program calls; empty otherwise.
    pub fn args(&self) -> &[Vec<u8>] {
        match &self.body {
            CallBody::Program { args, .. } => args,
            _ => &[],
        }
    }

    /// The target program, for program calls.
    pub fn program_id(&self) -> Option<ProgramId> {
        match &self.body {
            CallBody::Program { program_id, .. } => Some(*program_id),
            _ => None,
        }
    }
}

/// Opaque signed bytes returned by the external signer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignedCallBytes(pub Vec<u8>);

impl SignedCallBytes {
    /// Returns true if the signer produced no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw signed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> NetworkParameters {
        NetworkParameters {
            fee: 0,
            min_fee: 1000,
            flat_fee: false,
            first_valid: 100,
            last_valid: 1100,
            genesis_id: "testnet-v1.0".into(),
            genesis_hash: [1u8; 32],
        }
    }

    #[test]
    fn test_params_validation() {
        assert!(params().validate().is_ok());

        let mut missing_id = params();
        missing_id.genesis_id.clear();
        assert!(matches!(
            missing_id.validate(),
            Err(CredentialError::InvalidParameters(_))
        ));

        let mut missing_hash = params();
        missing_hash.genesis_hash = [0u8; 32];
        assert!(missing_hash.validate().is_err());

        let mut closed_window = params();
        closed_window.last_valid = closed_window.first_valid;
        assert!(closed_window.validate().is_err());
    }

    #[test]
    fn test_accessors_follow_body() {
        let call = PreparedCall::new(
            Address::default(),
            CallBody::Program {
                program_id: 10,
                selector: Selector([1, 2, 3, 4]),
                args: vec![vec![9]],
            },
            params(),
        );
        assert_eq!(call.kind(), CallKind::ProgramCall);
        assert_eq!(call.program_id(), Some(10));
        assert_eq!(call.args().len(), 1);
        assert_eq!(format!("{:?}", call.selector().unwrap()), "Selector(01020304)");
    }
}
