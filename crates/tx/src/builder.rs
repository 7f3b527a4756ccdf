// Path: crates/tx/src/builder.rs

//! Assembly of program calls, token creations and token transfers.
//!
//! Every builder validates the freshly fetched [`NetworkParameters`] first and
//! returns an immutable [`PreparedCall`]. Nothing here performs I/O.

use crate::selectors::{parameter_types, selector_for};
use credchain_types::app::{
    Address, CallArgument, CallBody, NetworkParameters, PreparedCall, ProgramId,
    TokenCreateParams, TokenId, TokenTransferParams,
};
use credchain_types::codec::encode_argument;
use credchain_types::error::CredentialError;

/// The longest display name a token may carry, in bytes.
pub const MAX_DISPLAY_NAME_BYTES: usize = 32;
/// The longest unit label a token may carry, in bytes.
pub const MAX_UNIT_LABEL_BYTES: usize = 8;
/// The longest content URL a token may carry, in bytes.
pub const MAX_CONTENT_URL_BYTES: usize = 96;

/// A credential is a one-of-one token.
const CREDENTIAL_TOTAL: u64 = 1;
const CREDENTIAL_DECIMALS: u32 = 0;

/// Encodes each argument in order.
///
/// Fails with the encoder's own [`CredentialError::Encoding`]; call builders wrap
/// it as a construction failure.
pub fn encode_arguments(args: &[CallArgument]) -> Result<Vec<Vec<u8>>, CredentialError> {
    args.iter().map(encode_argument).collect()
}

fn check_argument_types(method: &str, args: &[CallArgument]) -> Result<(), CredentialError> {
    let declared = parameter_types(method)?;
    if declared.len() != args.len() {
        return Err(CredentialError::construction(CredentialError::Encoding(
            format!(
                "{} takes {} arguments, got {}",
                method,
                declared.len(),
                args.len()
            ),
        )));
    }
    for (position, (expected, arg)) in declared.iter().zip(args).enumerate() {
        if *expected != arg.abi_type() {
            return Err(CredentialError::construction(CredentialError::Encoding(
                format!(
                    "argument {} of {} must be {}, got {}",
                    position,
                    method,
                    expected,
                    arg.abi_type()
                ),
            )));
        }
    }
    Ok(())
}

/// Builds a call into a deployed program.
///
/// The selector comes first, followed by each encoded argument in the order the
/// method signature declares them. Argument types are checked against the
/// signature before encoding.
pub fn build_program_call(
    sender: &Address,
    program_id: ProgramId,
    method: &str,
    args: &[CallArgument],
    params: NetworkParameters,
) -> Result<PreparedCall, CredentialError> {
    params.validate()?;
    if program_id == 0 {
        return Err(CredentialError::InvalidParameters(
            "program id must be positive".into(),
        ));
    }
    let selector = selector_for(method)?;
    check_argument_types(method, args)?;
    let encoded = encode_arguments(args).map_err(CredentialError::construction)?;

    tracing::debug!(
        target: "tx",
        program_id,
        method,
        selector = %hex::encode(selector.as_bytes()),
        args = encoded.len(),
        "built program call"
    );
    Ok(PreparedCall::new(
        *sender,
        CallBody::Program {
            program_id,
            selector,
            args: encoded,
        },
        params,
    ))
}

/// Cuts `name` to at most [`MAX_DISPLAY_NAME_BYTES`] bytes without splitting a
/// character.
pub fn truncate_display_name(name: &str) -> &str {
    if name.len() <= MAX_DISPLAY_NAME_BYTES {
        return name;
    }
    let mut end = MAX_DISPLAY_NAME_BYTES;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name.get(..end).unwrap_or_default()
}

/// Builds the creation of a one-of-one credential token.
///
/// The sender becomes manager, reserve, freeze and clawback authority. The total
/// supply is fixed to 1 with 0 decimals. Display names longer than
/// [`MAX_DISPLAY_NAME_BYTES`] are truncated.
pub fn build_token_create(
    sender: &Address,
    unit_label: &str,
    display_name: &str,
    content_url: &str,
    params: NetworkParameters,
) -> Result<PreparedCall, CredentialError> {
    params.validate()?;
    if unit_label.len() > MAX_UNIT_LABEL_BYTES {
        return Err(CredentialError::construction(CredentialError::Encoding(
            format!(
                "unit label '{}' exceeds {} bytes",
                unit_label, MAX_UNIT_LABEL_BYTES
            ),
        )));
    }
    if content_url.len() > MAX_CONTENT_URL_BYTES {
        return Err(CredentialError::construction(CredentialError::Encoding(
            format!("content url exceeds {} bytes", MAX_CONTENT_URL_BYTES),
        )));
    }
    let name = truncate_display_name(display_name);
    if name.len() < display_name.len() {
        tracing::debug!(
            target: "tx",
            original = display_name.len(),
            kept = name.len(),
            "truncated display name"
        );
    }

    Ok(PreparedCall::new(
        *sender,
        CallBody::TokenCreate(TokenCreateParams {
            total: CREDENTIAL_TOTAL,
            decimals: CREDENTIAL_DECIMALS,
            default_frozen: false,
            unit_label: unit_label.to_string(),
            display_name: name.to_string(),
            content_url: content_url.to_string(),
            manager: *sender,
            reserve: *sender,
            freeze: *sender,
            clawback: *sender,
        }),
        params,
    ))
}

/// Builds a transfer of `amount` units of `token_id` to `receiver`.
pub fn build_token_transfer(
    sender: &Address,
    token_id: TokenId,
    receiver: &Address,
    amount: u64,
    params: NetworkParameters,
) -> Result<PreparedCall, CredentialError> {
    params.validate()?;
    if token_id == 0 {
        return Err(CredentialError::Validation("token id must be positive".into()));
    }
    Ok(PreparedCall::new(
        *sender,
        CallBody::TokenTransfer(TokenTransferParams {
            token_id,
            receiver: *receiver,
            amount,
        }),
        params,
    ))
}

/// Builds an opt-in: a zero-amount transfer of `token_id` from `account` to itself.
pub fn build_opt_in(
    account: &Address,
    token_id: TokenId,
    params: NetworkParameters,
) -> Result<PreparedCall, CredentialError> {
    build_token_transfer(account, token_id, account, 0, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectors::{ISSUE_CREDENTIAL, VERIFY_CREDENTIAL};
    use crate::wire::encode_unsigned;
    use credchain_types::app::{CallKind, Selector};

    fn params() -> NetworkParameters {
        NetworkParameters {
            fee: 0,
            min_fee: 1000,
            flat_fee: false,
            first_valid: 500,
            last_valid: 1500,
            genesis_id: "testnet-v1.0".into(),
            genesis_hash: [9u8; 32],
        }
    }

    fn issuer() -> Address {
        Address::from_bytes([1u8; 32])
    }

    fn student() -> Address {
        Address::from_bytes([2u8; 32])
    }

    fn issue_args() -> Vec<CallArgument> {
        vec![
            CallArgument::FixedAddress(student()),
            CallArgument::VariableString("B.Tech CS".into()),
            CallArgument::VariableString("ipfs://abc123".into()),
        ]
    }

    #[test]
    fn test_program_call_layout() {
        let call = build_program_call(&issuer(), 10, ISSUE_CREDENTIAL, &issue_args(), params())
            .unwrap();
        assert_eq!(call.kind(), CallKind::ProgramCall);
        assert_eq!(call.program_id(), Some(10));
        assert_eq!(call.selector(), Some(&Selector([0x38, 0x8c, 0xaf, 0xfb])));
        let args = call.args();
        assert_eq!(args.len(), 3);
        assert_eq!(args[0], student().as_bytes().to_vec());
        assert_eq!(&args[1][..8], &9u64.to_be_bytes());
        assert_eq!(&args[1][8..], b"B.Tech CS");
        assert_eq!(&args[2][8..], b"ipfs://abc123");
    }

    #[test]
    fn test_program_call_is_deterministic() {
        let a = build_program_call(&issuer(), 10, ISSUE_CREDENTIAL, &issue_args(), params())
            .unwrap();
        let b = build_program_call(&issuer(), 10, ISSUE_CREDENTIAL, &issue_args(), params())
            .unwrap();
        assert_eq!(encode_unsigned(&a).unwrap(), encode_unsigned(&b).unwrap());
    }

    #[test]
    fn test_swapping_arguments_changes_encoding() {
        let forward = encode_arguments(&[
            CallArgument::FixedUint64(7),
            CallArgument::VariableString("x".into()),
        ])
        .unwrap()
        .concat();
        let swapped = encode_arguments(&[
            CallArgument::VariableString("x".into()),
            CallArgument::FixedUint64(7),
        ])
        .unwrap()
        .concat();
        assert_ne!(forward, swapped);
    }

    #[test]
    fn test_argument_types_must_match_signature() {
        let mut args = issue_args();
        args.swap(0, 1);
        let err = build_program_call(&issuer(), 10, ISSUE_CREDENTIAL, &args, params())
            .unwrap_err();
        assert!(matches!(err, CredentialError::Construction(_)));
        assert!(matches!(err.root(), CredentialError::Encoding(_)));

        let err = build_program_call(&issuer(), 10, VERIFY_CREDENTIAL, &[], params())
            .unwrap_err();
        assert!(matches!(err, CredentialError::Construction(_)));
    }

    #[test]
    fn test_oversized_argument_is_a_construction_error() {
        let args = vec![
            CallArgument::FixedAddress(student()),
            CallArgument::VariableString("x".repeat(5000)),
            CallArgument::VariableString("ipfs://abc123".into()),
        ];
        let err = build_program_call(&issuer(), 10, ISSUE_CREDENTIAL, &args, params())
            .unwrap_err();
        assert!(matches!(err.root(), CredentialError::Encoding(_)));
    }

    #[test]
    fn test_unknown_method_and_bad_params() {
        assert!(matches!(
            build_program_call(&issuer(), 10, "mint()void", &[], params()),
            Err(CredentialError::UnknownMethod(_))
        ));
        let mut missing = params();
        missing.genesis_id.clear();
        assert!(matches!(
            build_program_call(&issuer(), 10, ISSUE_CREDENTIAL, &issue_args(), missing),
            Err(CredentialError::InvalidParameters(_))
        ));
        assert!(matches!(
            build_program_call(&issuer(), 0, ISSUE_CREDENTIAL, &issue_args(), params()),
            Err(CredentialError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_token_create_is_one_of_one() {
        let call =
            build_token_create(&issuer(), "CRED", "B.Tech CS", "ipfs://abc123", params()).unwrap();
        assert_eq!(call.kind(), CallKind::TokenCreate);
        match call.body() {
            CallBody::TokenCreate(p) => {
                assert_eq!(p.total, 1);
                assert_eq!(p.decimals, 0);
                assert_eq!(p.unit_label, "CRED");
                assert_eq!(p.content_url, "ipfs://abc123");
                for authority in [p.manager, p.reserve, p.freeze, p.clawback] {
                    assert_eq!(authority, issuer());
                }
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_display_name_truncated_to_32() {
        let long = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789abcd";
        assert_eq!(long.chars().count(), 40);
        let call = build_token_create(&issuer(), "CRED", long, "ipfs://x", params()).unwrap();
        match call.body() {
            CallBody::TokenCreate(p) => assert_eq!(p.display_name, &long[..32]),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 31 ASCII bytes followed by a 2-byte character straddling the limit.
        let name = format!("{}é", "a".repeat(31));
        assert_eq!(truncate_display_name(&name), "a".repeat(31));
        assert_eq!(truncate_display_name("short"), "short");
    }

    #[test]
    fn test_token_create_limits() {
        assert!(build_token_create(&issuer(), "TOOLONGLABEL", "n", "u", params()).is_err());
        let url = format!("ipfs://{}", "a".repeat(100));
        assert!(matches!(
            build_token_create(&issuer(), "CRED", "n", &url, params()),
            Err(CredentialError::Construction(_))
        ));
    }

    #[test]
    fn test_opt_in_is_zero_self_transfer() {
        let call = build_opt_in(&student(), 555, params()).unwrap();
        match call.body() {
            CallBody::TokenTransfer(t) => {
                assert_eq!(t.token_id, 555);
                assert_eq!(t.receiver, student());
                assert_eq!(t.amount, 0);
            }
            other => panic!("unexpected body {:?}", other),
        }
        assert!(matches!(
            build_opt_in(&student(), 0, params()),
            Err(CredentialError::Validation(_))
        ));
    }
}
