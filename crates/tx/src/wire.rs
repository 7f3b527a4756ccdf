// Path: crates/tx/src/wire.rs

//! The network's unsigned-call wire format.
//!
//! Calls are canonical MessagePack maps: keys in lexicographic order, zero and
//! empty fields omitted, byte strings as `bin`. Field order in the structs below
//! is the key order on the wire and must stay sorted.

use credchain_types::app::{Address, CallBody, NetworkParameters, PreparedCall};
use credchain_types::error::CredentialError;
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

/// Bytes a signature adds to an encoded call, used for per-byte fees.
pub const SIGNATURE_OVERHEAD_BYTES: u64 = 75;

const TYPE_PROGRAM_CALL: &str = "appl";
const TYPE_TOKEN_CREATE: &str = "acfg";
const TYPE_TOKEN_TRANSFER: &str = "axfer";

fn is_zero(n: &u64) -> bool {
    *n == 0
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Token parameters of a creation call (`apar`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTokenParams {
    /// Display name.
    #[serde(rename = "an", default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    /// Content URL.
    #[serde(rename = "au", default, skip_serializing_if = "String::is_empty")]
    pub content_url: String,
    /// Clawback authority.
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub clawback: Option<ByteBuf>,
    /// Decimals.
    #[serde(rename = "dc", default, skip_serializing_if = "is_zero")]
    pub decimals: u64,
    /// Default frozen.
    #[serde(rename = "df", default, skip_serializing_if = "is_false")]
    pub default_frozen: bool,
    /// Freeze authority.
    #[serde(rename = "f", default, skip_serializing_if = "Option::is_none")]
    pub freeze: Option<ByteBuf>,
    /// Manager authority.
    #[serde(rename = "m", default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<ByteBuf>,
    /// Reserve account.
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub reserve: Option<ByteBuf>,
    /// Total supply.
    #[serde(rename = "t", default, skip_serializing_if = "is_zero")]
    pub total: u64,
    /// Unit label.
    #[serde(rename = "un", default, skip_serializing_if = "String::is_empty")]
    pub unit_label: String,
}

/// One unsigned call as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedCall {
    /// Transferred amount.
    #[serde(rename = "aamt", default, skip_serializing_if = "is_zero")]
    pub amount: u64,
    /// Program arguments, selector first.
    #[serde(rename = "apaa", default, skip_serializing_if = "Vec::is_empty")]
    pub program_args: Vec<ByteBuf>,
    /// Token creation parameters.
    #[serde(rename = "apar", default, skip_serializing_if = "Option::is_none")]
    pub token_params: Option<WireTokenParams>,
    /// Target program.
    #[serde(rename = "apid", default, skip_serializing_if = "is_zero")]
    pub program_id: u64,
    /// Transfer receiver.
    #[serde(rename = "arcv", default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<ByteBuf>,
    /// Absolute fee.
    #[serde(rename = "fee", default, skip_serializing_if = "is_zero")]
    pub fee: u64,
    /// First valid round.
    #[serde(rename = "fv", default, skip_serializing_if = "is_zero")]
    pub first_valid: u64,
    /// Genesis identifier.
    #[serde(rename = "gen", default, skip_serializing_if = "String::is_empty")]
    pub genesis_id: String,
    /// Genesis hash.
    #[serde(rename = "gh")]
    pub genesis_hash: ByteBuf,
    /// Last valid round.
    #[serde(rename = "lv", default, skip_serializing_if = "is_zero")]
    pub last_valid: u64,
    /// Sender.
    #[serde(rename = "snd")]
    pub sender: ByteBuf,
    /// Call type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Transferred token.
    #[serde(rename = "xaid", default, skip_serializing_if = "is_zero")]
    pub token_id: u64,
}

#[derive(Serialize)]
struct SignedEnvelope<'a> {
    txn: &'a UnsignedCall,
}

#[derive(Serialize)]
struct SimulateGroup<'a> {
    txns: Vec<SignedEnvelope<'a>>,
}

#[derive(Serialize)]
struct SimulateRequest<'a> {
    #[serde(rename = "allow-empty-signatures")]
    allow_empty_signatures: bool,
    #[serde(rename = "txn-groups")]
    txn_groups: Vec<SimulateGroup<'a>>,
}

fn account(address: &Address) -> Option<ByteBuf> {
    (!address.is_zero()).then(|| ByteBuf::from(address.as_bytes().to_vec()))
}

fn to_msgpack<T: Serialize>(value: &T) -> Result<Vec<u8>, CredentialError> {
    rmp_serde::to_vec_named(value).map_err(|e| CredentialError::Encoding(e.to_string()))
}

fn without_fee(call: &PreparedCall) -> UnsignedCall {
    let params = call.params();
    let mut wire = UnsignedCall {
        first_valid: params.first_valid,
        last_valid: params.last_valid,
        genesis_id: params.genesis_id.clone(),
        genesis_hash: ByteBuf::from(params.genesis_hash.to_vec()),
        sender: ByteBuf::from(call.sender().as_bytes().to_vec()),
        ..Default::default()
    };
    match call.body() {
        CallBody::Program {
            program_id,
            selector,
            args,
        } => {
            wire.kind = TYPE_PROGRAM_CALL.to_string();
            wire.program_id = *program_id;
            wire.program_args = std::iter::once(selector.as_bytes().to_vec())
                .chain(args.iter().cloned())
                .map(ByteBuf::from)
                .collect();
        }
        CallBody::TokenCreate(p) => {
            wire.kind = TYPE_TOKEN_CREATE.to_string();
            wire.token_params = Some(WireTokenParams {
                display_name: p.display_name.clone(),
                content_url: p.content_url.clone(),
                clawback: account(&p.clawback),
                decimals: u64::from(p.decimals),
                default_frozen: p.default_frozen,
                freeze: account(&p.freeze),
                manager: account(&p.manager),
                reserve: account(&p.reserve),
                total: p.total,
                unit_label: p.unit_label.clone(),
            });
        }
        CallBody::TokenTransfer(t) => {
            wire.kind = TYPE_TOKEN_TRANSFER.to_string();
            wire.amount = t.amount;
            wire.receiver = account(&t.receiver);
            wire.token_id = t.token_id;
        }
    }
    wire
}

/// Computes the fee a call pays given its encoded length.
///
/// A flat fee is used as-is. Otherwise the per-byte rate is charged for the
/// encoded length plus [`SIGNATURE_OVERHEAD_BYTES`], and never less than the
/// network minimum.
pub fn compute_fee(params: &NetworkParameters, encoded_len: usize) -> u64 {
    if params.flat_fee {
        return params.fee;
    }
    let size = (encoded_len as u64).saturating_add(SIGNATURE_OVERHEAD_BYTES);
    params.fee.saturating_mul(size).max(params.min_fee)
}

/// Converts a prepared call into its wire struct with the fee filled in.
pub fn to_wire(call: &PreparedCall) -> Result<UnsignedCall, CredentialError> {
    let mut wire = without_fee(call);
    let params = call.params();
    // Size the call with the per-byte rate in the fee slot.
    wire.fee = params.fee;
    if !params.flat_fee {
        let encoded_len = to_msgpack(&wire)?.len();
        wire.fee = compute_fee(params, encoded_len);
    }
    Ok(wire)
}

/// Serializes a prepared call to the unsigned-call wire format.
pub fn encode_unsigned(call: &PreparedCall) -> Result<Vec<u8>, CredentialError> {
    let wire = to_wire(call)?;
    let bytes = to_msgpack(&wire)?;
    tracing::debug!(
        target: "tx",
        kind = %wire.kind,
        fee = wire.fee,
        bytes = bytes.len(),
        "encoded unsigned call"
    );
    Ok(bytes)
}

/// Parses unsigned-call bytes back into their wire struct.
pub fn decode_unsigned(bytes: &[u8]) -> Result<UnsignedCall, CredentialError> {
    rmp_serde::from_slice(bytes).map_err(|e| CredentialError::Decode(e.to_string()))
}

/// Serializes a simulation request running `call` unsigned.
pub fn encode_simulate_request(call: &PreparedCall) -> Result<Vec<u8>, CredentialError> {
    let wire = to_wire(call)?;
    to_msgpack(&SimulateRequest {
        allow_empty_signatures: true,
        txn_groups: vec![SimulateGroup {
            txns: vec![SignedEnvelope { txn: &wire }],
        }],
    })
}
