// Path: crates/tx/src/selectors.rs

//! The compiled-in method selector table of the credential program.

use credchain_types::app::Selector;
use credchain_types::error::CredentialError;

/// Issues a credential to a student: `(student, credential name, metadata url) -> token id`.
pub const ISSUE_CREDENTIAL: &str = "issue_credential(address,string,string)uint64";

/// Returns the verification verdict for a credential token.
pub const VERIFY_CREDENTIAL: &str = "verify_credential(uint64)string";

/// Exact signature text to selector. Lookups never hash at runtime.
const METHOD_SELECTORS: &[(&str, Selector)] = &[
    (ISSUE_CREDENTIAL, Selector([0x38, 0x8c, 0xaf, 0xfb])),
    (VERIFY_CREDENTIAL, Selector([0x30, 0x6a, 0x2f, 0x53])),
];

/// Looks up the selector of a method by its exact signature text.
///
/// An unknown signature fails with [`CredentialError::UnknownMethod`]; there is
/// no placeholder selector.
pub fn selector_for(signature: &str) -> Result<Selector, CredentialError> {
    METHOD_SELECTORS
        .iter()
        .find(|(known, _)| *known == signature)
        .map(|(_, selector)| *selector)
        .ok_or_else(|| CredentialError::UnknownMethod(signature.to_string()))
}

/// Splits a signature such as `m(address,string)uint64` into its declared
/// parameter type names, in order.
pub fn parameter_types(signature: &str) -> Result<Vec<&str>, CredentialError> {
    let malformed = || CredentialError::UnknownMethod(format!("malformed signature '{}'", signature));
    let open = signature.find('(').ok_or_else(malformed)?;
    let close = signature.rfind(')').ok_or_else(malformed)?;
    if close < open {
        return Err(malformed());
    }
    let inner = signature.get(open + 1..close).ok_or_else(malformed)?;
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    Ok(inner.split(',').collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha512_256};

    #[test]
    fn test_known_selectors() {
        assert_eq!(
            selector_for(ISSUE_CREDENTIAL).unwrap(),
            Selector([0x38, 0x8c, 0xaf, 0xfb])
        );
        assert_eq!(
            selector_for(VERIFY_CREDENTIAL).unwrap(),
            Selector([0x30, 0x6a, 0x2f, 0x53])
        );
    }

    #[test]
    fn test_table_matches_signature_hash() {
        for (signature, selector) in METHOD_SELECTORS {
            let digest = Sha512_256::digest(signature.as_bytes());
            assert_eq!(&digest[..4], &selector.0[..], "{}", signature);
        }
    }

    #[test]
    fn test_unknown_signature_fails_loudly() {
        let err = selector_for("revoke_credential(uint64)void").unwrap_err();
        assert!(matches!(err, CredentialError::UnknownMethod(_)));
        // A near miss is still a miss.
        assert!(selector_for("issue_credential(address,string,string)").is_err());
    }

    #[test]
    fn test_parameter_types() {
        assert_eq!(
            parameter_types(ISSUE_CREDENTIAL).unwrap(),
            vec!["address", "string", "string"]
        );
        assert_eq!(parameter_types(VERIFY_CREDENTIAL).unwrap(), vec!["uint64"]);
        assert!(parameter_types("noop()void").unwrap().is_empty());
        assert!(parameter_types("broken").is_err());
    }
}
