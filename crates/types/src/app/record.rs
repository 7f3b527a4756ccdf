// Path: crates/types/src/app/record.rs
//! Confirmation results and the records derived from ledger state.

use super::address::Address;
use super::{ProgramId, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A base64-encoded log record emitted by a confirmed call, as reported by the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord(pub String);

/// A call executed as a side effect of another call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NestedCall {
    /// The token created by this nested call, if any.
    pub created_token_id: Option<TokenId>,
}

/// The side effects of one confirmed call. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfirmationResult {
    /// The round in which the call was confirmed. Zero for simulated reads.
    pub confirmed_round: u64,
    /// The token created by the call itself (direct token creation), if any.
    pub created_token_id: Option<TokenId>,
    /// Nested calls, in execution order.
    pub nested_calls: Vec<NestedCall>,
    /// Emitted log records, in emission order.
    pub log_records: Vec<LogRecord>,
}

/// Which issuance path produced a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssuancePath {
    /// Issued through a call into the deployed credential program.
    ContractPath,
    /// Issued by creating a one-of-one token directly.
    DirectPath,
}

impl fmt::Display for IssuancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ContractPath => "contract",
            Self::DirectPath => "direct",
        })
    }
}

/// The result of one successful issuance.
///
/// Exists only for calls confirmed on-chain. `token_id` is `None` when the call
/// was confirmed but the created token could not be identified from its effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceOutcome {
    /// The created credential token, when it could be determined.
    pub token_id: Option<TokenId>,
    /// The identifier of the confirmed call.
    pub call_id: String,
    /// The path that issued the credential.
    pub path: IssuancePath,
}

/// A credential as currently recorded on the ledger. Recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// The credential token.
    pub token_id: TokenId,
    /// The token's display name.
    pub display_name: String,
    /// The token's unit label.
    pub unit_label: String,
    /// The account that created the token.
    pub creator_address: Address,
    /// The total supply (1 for a one-of-one credential).
    pub total_supply: u64,
    /// The URL of the credential's off-chain metadata.
    pub content_url: String,
}

/// A value held in a program's global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlobalValue {
    /// A byte-string value.
    Bytes(Vec<u8>),
    /// An unsigned integer value.
    Uint(u64),
}

impl fmt::Display for GlobalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(n) => write!(f, "{}", n),
            // 32-byte values in program state are accounts.
            Self::Bytes(bytes) if bytes.len() == 32 => {
                let mut key = [0u8; 32];
                key.copy_from_slice(bytes);
                write!(f, "{}", Address::from_bytes(key))
            }
            Self::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
        }
    }
}

/// A normalized snapshot of a deployed credential program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInfo {
    /// The program identifier.
    pub program_id: ProgramId,
    /// The account controlled by the program.
    pub program_address: Address,
    /// Global state with keys decoded to text.
    pub global_state: BTreeMap<String, GlobalValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_value_display() {
        assert_eq!(GlobalValue::Uint(7).to_string(), "7");
        assert_eq!(GlobalValue::Bytes(b"hello".to_vec()).to_string(), "hello");
        let account = Address::from_bytes([5u8; 32]);
        assert_eq!(
            GlobalValue::Bytes(vec![5u8; 32]).to_string(),
            account.to_string()
        );
    }
}
