// Path: crates/types/src/codec.rs

//! The binary encoder for program call arguments.
//!
//! Every argument is encoded into a byte layout whose length is known before the
//! call is assembled:
//!
//! * fixed-width unsigned integers are 8 bytes, big-endian;
//! * addresses are the raw 32-byte public key;
//! * variable-length strings are an 8-byte big-endian length prefix followed by
//!   the UTF-8 bytes.
//!
//! No encoded argument may exceed [`MAX_ARGUMENT_BYTES`](crate::MAX_ARGUMENT_BYTES).

use crate::app::CallArgument;
use crate::error::CredentialError;
use crate::MAX_ARGUMENT_BYTES;

/// The width of the length prefix in front of a variable-length string.
pub const LENGTH_PREFIX_BYTES: usize = 8;

/// The width of an encoded fixed `uint64`.
pub const UINT64_BYTES: usize = 8;

/// The largest string payload that still fits into one argument.
pub const MAX_VARIABLE_STRING_BYTES: usize = MAX_ARGUMENT_BYTES - LENGTH_PREFIX_BYTES;

/// Encodes `s` as an 8-byte big-endian length prefix followed by its UTF-8 bytes.
///
/// Fails with [`CredentialError::Encoding`] if the payload exceeds
/// [`MAX_VARIABLE_STRING_BYTES`].
pub fn encode_variable_string(s: &str) -> Result<Vec<u8>, CredentialError> {
    let payload = s.as_bytes();
    if payload.len() > MAX_VARIABLE_STRING_BYTES {
        return Err(CredentialError::Encoding(format!(
            "string of {} bytes exceeds the {} byte argument cap",
            payload.len(),
            MAX_VARIABLE_STRING_BYTES
        )));
    }
    let mut out = Vec::with_capacity(LENGTH_PREFIX_BYTES + payload.len());
    out.extend_from_slice(&(payload.len() as u64).to_be_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Decodes a length-prefixed string produced by [`encode_variable_string`].
///
/// The prefix must describe exactly the remaining bytes.
pub fn decode_variable_string(bytes: &[u8]) -> Result<String, CredentialError> {
    let (prefix, payload) = split_prefix(bytes)?;
    let declared = u64::from_be_bytes(prefix);
    if declared != payload.len() as u64 {
        return Err(CredentialError::Encoding(format!(
            "length prefix declares {} bytes but {} follow",
            declared,
            payload.len()
        )));
    }
    String::from_utf8(payload.to_vec())
        .map_err(|e| CredentialError::Encoding(format!("string payload is not UTF-8: {}", e)))
}

/// Encodes `n` as exactly 8 big-endian bytes.
pub fn encode_fixed_uint64(n: u64) -> [u8; UINT64_BYTES] {
    n.to_be_bytes()
}

/// Encodes a wide signed integer as a fixed `uint64`, rejecting values outside
/// `0..=u64::MAX`.
///
/// This is the entry point for values that arrive untyped (command-line input,
/// JSON numbers) and may therefore be negative or too large.
pub fn encode_fixed_uint64_checked(n: i128) -> Result<[u8; UINT64_BYTES], CredentialError> {
    u64::try_from(n)
        .map(encode_fixed_uint64)
        .map_err(|_| CredentialError::Encoding(format!("{} is not representable as uint64", n)))
}

/// Decodes exactly 8 big-endian bytes into a `u64`.
pub fn decode_fixed_uint64(bytes: &[u8]) -> Result<u64, CredentialError> {
    let raw: [u8; UINT64_BYTES] = bytes.try_into().map_err(|_| {
        CredentialError::Encoding(format!(
            "uint64 must be {} bytes, got {}",
            UINT64_BYTES,
            bytes.len()
        ))
    })?;
    Ok(u64::from_be_bytes(raw))
}

/// Encodes one typed call argument into its protocol byte layout.
pub fn encode_argument(arg: &CallArgument) -> Result<Vec<u8>, CredentialError> {
    match arg {
        CallArgument::FixedAddress(address) => Ok(address.as_bytes().to_vec()),
        CallArgument::VariableString(s) => encode_variable_string(s),
        CallArgument::FixedUint64(n) => Ok(encode_fixed_uint64(*n).to_vec()),
    }
}

fn split_prefix(bytes: &[u8]) -> Result<([u8; LENGTH_PREFIX_BYTES], &[u8]), CredentialError> {
    if bytes.len() < LENGTH_PREFIX_BYTES {
        return Err(CredentialError::Encoding(format!(
            "variable string needs a {} byte prefix, got {} bytes",
            LENGTH_PREFIX_BYTES,
            bytes.len()
        )));
    }
    let (prefix, payload) = bytes.split_at(LENGTH_PREFIX_BYTES);
    let prefix: [u8; LENGTH_PREFIX_BYTES] = prefix
        .try_into()
        .map_err(|_| CredentialError::Encoding("length prefix is truncated".into()))?;
    Ok((prefix, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Address;

    #[test]
    fn test_variable_string_layout() {
        let encoded = encode_variable_string("B.Tech CS").unwrap();
        assert_eq!(&encoded[..8], &[0, 0, 0, 0, 0, 0, 0, 9]);
        assert_eq!(&encoded[8..], b"B.Tech CS");
    }

    #[test]
    fn test_variable_string_roundtrip_up_to_cap() {
        let longest = "x".repeat(MAX_VARIABLE_STRING_BYTES);
        for s in ["", "ipfs://abc123", "Grüße, 世界", longest.as_str()] {
            let encoded = encode_variable_string(s).unwrap();
            assert!(encoded.len() <= MAX_ARGUMENT_BYTES);
            assert_eq!(decode_variable_string(&encoded).unwrap(), s);
        }
    }

    #[test]
    fn test_variable_string_over_cap_is_rejected() {
        let s = "x".repeat(MAX_VARIABLE_STRING_BYTES + 1);
        assert!(matches!(
            encode_variable_string(&s),
            Err(CredentialError::Encoding(_))
        ));
    }

    #[test]
    fn test_decode_rejects_mismatched_prefix() {
        let mut encoded = encode_variable_string("abc").unwrap();
        encoded.push(b'd');
        assert!(decode_variable_string(&encoded).is_err());
        assert!(decode_variable_string(&[0, 0, 0]).is_err());
    }

    #[test]
    fn test_fixed_uint64() {
        assert_eq!(encode_fixed_uint64(555), [0, 0, 0, 0, 0, 0, 0x02, 0x2b]);
        assert_eq!(encode_fixed_uint64(u64::MAX), [0xff; 8]);
        assert_eq!(decode_fixed_uint64(&encode_fixed_uint64(999_999)).unwrap(), 999_999);
        assert!(decode_fixed_uint64(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_checked_uint64_bounds() {
        assert!(encode_fixed_uint64_checked(-1).is_err());
        assert!(encode_fixed_uint64_checked(i128::from(u64::MAX) + 1).is_err());
        assert_eq!(
            encode_fixed_uint64_checked(i128::from(u64::MAX)).unwrap(),
            [0xff; 8]
        );
    }

    #[test]
    fn test_encode_argument_address_is_raw_key() {
        let address = Address::from_bytes([7u8; 32]);
        let encoded = encode_argument(&CallArgument::FixedAddress(address)).unwrap();
        assert_eq!(encoded, vec![7u8; 32]);
    }
}
