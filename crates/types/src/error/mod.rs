// Path: crates/types/src/error/mod.rs
//! Core error types for the credential ledger client.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Every failure the protocol core can report.
///
/// Errors propagate through the layers unchanged in kind. Absence results
/// (an undetermined token id, an `"Unknown"` verdict, a token that does not
/// exist) are modelled as values, never as variants of this enum.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Malformed or oversized input to the binary encoder. Always a caller bug.
    #[error("Encoding error: {0}")]
    Encoding(String),
    /// A method signature is not present in the compiled-in selector table.
    #[error("Unknown method signature: '{0}'")]
    UnknownMethod(String),
    /// Address text failed the base32/checksum/length checks.
    #[error("Invalid address format: {0}")]
    AddressFormat(String),
    /// A required issuance field is missing or invalid.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The network parameters are missing a required field.
    #[error("Invalid network parameters: {0}")]
    InvalidParameters(String),
    /// Building a call failed because an upstream encoding step failed.
    #[error("Call construction failed: {0}")]
    Construction(#[source] Box<CredentialError>),
    /// The signer declined, returned nothing, or was abandoned.
    #[error("Signing rejected: {0}")]
    SigningRejected(String),
    /// A submitted call was not confirmed within the round budget.
    #[error("Call {call_id} was not confirmed within {rounds} rounds")]
    ConfirmationTimeout {
        /// The identifier returned by the network on submission.
        call_id: String,
        /// The number of rounds waited.
        rounds: u64,
    },
    /// The network dropped a submitted call from its pool.
    #[error("Call {call_id} was rejected by the network: {reason}")]
    Rejected {
        /// The identifier returned by the network on submission.
        call_id: String,
        /// The pool error reported by the network.
        reason: String,
    },
    /// A transport-level failure talking to the network or content store.
    #[error("Network error: {0}")]
    Network(String),
    /// The network answered, but the response body could not be decoded.
    #[error("Malformed network response: {0}")]
    Decode(String),
    /// The configuration file is missing, unreadable or inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CredentialError {
    /// Wraps an upstream failure as a call-construction error.
    pub fn construction(inner: CredentialError) -> Self {
        Self::Construction(Box::new(inner))
    }

    /// Returns the innermost error, looking through `Construction` wrappers.
    pub fn root(&self) -> &CredentialError {
        match self {
            Self::Construction(inner) => inner.root(),
            other => other,
        }
    }
}

impl ErrorCode for CredentialError {
    fn code(&self) -> &'static str {
        match self {
            Self::Encoding(_) => "ENCODING_ERROR",
            Self::UnknownMethod(_) => "UNKNOWN_METHOD",
            Self::AddressFormat(_) => "ADDRESS_FORMAT",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::InvalidParameters(_) => "INVALID_PARAMETERS",
            Self::Construction(_) => "CONSTRUCTION_FAILED",
            Self::SigningRejected(_) => "SIGNING_REJECTED",
            Self::ConfirmationTimeout { .. } => "CONFIRMATION_TIMEOUT",
            Self::Rejected { .. } => "CALL_REJECTED",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn construction_keeps_the_upstream_error_as_source() {
        let err = CredentialError::construction(CredentialError::Encoding("too long".into()));
        assert_eq!(err.code(), "CONSTRUCTION_FAILED");
        assert!(matches!(err.root(), CredentialError::Encoding(_)));
        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.contains("too long"));
    }

    #[test]
    fn timeout_message_names_call_and_budget() {
        let err = CredentialError::ConfirmationTimeout {
            call_id: "TXID".into(),
            rounds: 4,
        };
        assert_eq!(
            err.to_string(),
            "Call TXID was not confirmed within 4 rounds"
        );
    }
}
