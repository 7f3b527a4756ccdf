// Path: crates/types/src/app/address.rs
//! Ledger account addresses and their checksummed text form.

use crate::error::CredentialError;
use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha512_256};
use std::fmt;
use std::str::FromStr;

/// The length of the raw public key behind an address.
pub const PUBLIC_KEY_BYTES: usize = 32;
/// The number of trailing hash bytes appended as a checksum.
pub const CHECKSUM_BYTES: usize = 4;
/// The length of an address in its base32 text form.
pub const ADDRESS_TEXT_LEN: usize = 58;
/// The domain prefix hashed together with a program id to derive its account.
pub const PROGRAM_ADDRESS_PREFIX: &[u8] = b"appID";

/// A 32-byte ledger account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; PUBLIC_KEY_BYTES]);

impl Address {
    /// Wraps a raw 32-byte public key.
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// Returns the raw public key.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_BYTES] {
        &self.0
    }

    /// Returns true for the all-zero address, which the ledger treats as "unset".
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn checksum(public_key: &[u8]) -> [u8; CHECKSUM_BYTES] {
    let digest = Sha512_256::digest(public_key);
    let mut out = [0u8; CHECKSUM_BYTES];
    if let Some(tail) = digest.get(digest.len() - CHECKSUM_BYTES..) {
        out.copy_from_slice(tail);
    }
    out
}

/// Decodes checksummed address text into its 32-byte public key.
///
/// Fails with [`CredentialError::AddressFormat`] when the text is not valid
/// base32, has the wrong length, or carries a checksum that does not match.
pub fn decode_address(text: &str) -> Result<Address, CredentialError> {
    if text.len() != ADDRESS_TEXT_LEN {
        return Err(CredentialError::AddressFormat(format!(
            "expected {} characters, got {}",
            ADDRESS_TEXT_LEN,
            text.len()
        )));
    }
    let raw = BASE32_NOPAD
        .decode(text.as_bytes())
        .map_err(|e| CredentialError::AddressFormat(format!("invalid base32: {}", e)))?;
    if raw.len() != PUBLIC_KEY_BYTES + CHECKSUM_BYTES {
        return Err(CredentialError::AddressFormat(format!(
            "decoded public key is {} bytes, expected {}",
            raw.len().saturating_sub(CHECKSUM_BYTES),
            PUBLIC_KEY_BYTES
        )));
    }
    let (key, sum) = raw.split_at(PUBLIC_KEY_BYTES);
    if checksum(key) != sum {
        return Err(CredentialError::AddressFormat(
            "checksum does not match public key".into(),
        ));
    }
    let mut bytes = [0u8; PUBLIC_KEY_BYTES];
    bytes.copy_from_slice(key);
    Ok(Address(bytes))
}

/// Renders an address as checksummed base32 text. Inverse of [`decode_address`].
pub fn encode_address_text(address: &Address) -> String {
    let mut raw = Vec::with_capacity(PUBLIC_KEY_BYTES + CHECKSUM_BYTES);
    raw.extend_from_slice(&address.0);
    raw.extend_from_slice(&checksum(&address.0));
    BASE32_NOPAD.encode(&raw)
}

/// Derives the account address controlled by a deployed program.
pub fn program_address(program_id: u64) -> Address {
    let mut hasher = Sha512_256::new();
    hasher.update(PROGRAM_ADDRESS_PREFIX);
    hasher.update(program_id.to_be_bytes());
    let mut bytes = [0u8; PUBLIC_KEY_BYTES];
    bytes.copy_from_slice(&hasher.finalize());
    Address(bytes)
}

impl FromStr for Address {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_address(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_address_text(self))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        decode_address(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_ADDRESS: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ";

    #[test]
    fn test_zero_address_text() {
        let zero = Address::default();
        assert!(zero.is_zero());
        assert_eq!(encode_address_text(&zero), ZERO_ADDRESS);
        assert_eq!(decode_address(ZERO_ADDRESS).unwrap(), zero);
    }

    #[test]
    fn test_address_text_roundtrip() {
        for seed in [1u8, 42, 0xfe] {
            let mut bytes = [0u8; 32];
            for (i, b) in bytes.iter_mut().enumerate() {
                *b = seed.wrapping_mul(i as u8 + 1);
            }
            let address = Address::from_bytes(bytes);
            let text = encode_address_text(&address);
            assert_eq!(text.len(), ADDRESS_TEXT_LEN);
            assert_eq!(decode_address(&text).unwrap(), address);
            assert_eq!(text.parse::<Address>().unwrap(), address);
        }
    }

    #[test]
    fn test_bad_checksum_is_rejected() {
        let mut text = encode_address_text(&Address::from_bytes([9u8; 32]));
        // Flip one character inside the public key portion.
        let replacement = if text.starts_with('B') { "C" } else { "B" };
        text.replace_range(0..1, replacement);
        assert!(matches!(
            decode_address(&text),
            Err(CredentialError::AddressFormat(_))
        ));
    }

    #[test]
    fn test_malformed_text_is_rejected() {
        assert!(decode_address("ADDR1").is_err());
        assert!(decode_address(&"1".repeat(ADDRESS_TEXT_LEN)).is_err());
        assert!(decode_address("").is_err());
    }

    #[test]
    fn test_program_address_is_deterministic() {
        assert_eq!(program_address(10), program_address(10));
        assert_ne!(program_address(10), program_address(11));
        let text = program_address(10).to_string();
        assert_eq!(decode_address(&text).unwrap(), program_address(10));
    }

    #[test]
    fn test_serde_uses_text_form() {
        let address = Address::from_bytes([3u8; 32]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", address));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
