// Path: crates/tx/src/extract.rs

//! Recovery of created token ids and verification verdicts from confirmed effects.
//!
//! Both extractors are total: "not found" is a result (`None` or
//! [`UNKNOWN_VERDICT`]), never an error.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use credchain_types::app::{ConfirmationResult, TokenId};

/// Candidate ids must be strictly greater than this.
pub const TOKEN_ID_LOWER_BOUND: u64 = 0;
/// Candidate ids must be strictly less than this.
pub const TOKEN_ID_UPPER_BOUND: u64 = 1_000_000_000_000_000;
/// A log record's candidate id is its trailing big-endian `u64`.
pub const TOKEN_ID_TAIL_BYTES: usize = 8;
/// Substrings that mark a log record as a verification verdict, checked in order.
pub const VERDICT_MARKERS: [&str; 2] = ["Verified", "Invalid"];
/// The verdict when no log record carries a marker.
pub const UNKNOWN_VERDICT: &str = "Unknown";
/// Prefix the program emits before a method's return value.
pub const RETURN_VALUE_PREFIX: [u8; 4] = [0x15, 0x1f, 0x7c, 0x75];

fn decoded_records(result: &ConfirmationResult) -> impl Iterator<Item = Vec<u8>> + '_ {
    result.log_records.iter().filter_map(|record| {
        match BASE64.decode(record.0.as_bytes()) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::debug!(target: "tx", error = %e, "skipping undecodable log record");
                None
            }
        }
    })
}

fn tail_candidate(bytes: &[u8]) -> Option<u64> {
    let start = bytes.len().checked_sub(TOKEN_ID_TAIL_BYTES)?;
    let tail: [u8; TOKEN_ID_TAIL_BYTES] = bytes.get(start..)?.try_into().ok()?;
    Some(u64::from_be_bytes(tail))
}

fn in_bounds(id: u64) -> bool {
    id > TOKEN_ID_LOWER_BOUND && id < TOKEN_ID_UPPER_BOUND
}

/// Recovers the token created by a confirmed call.
///
/// Nested calls are authoritative and scanned first. Failing that, each log
/// record is base64-decoded and its trailing 8 bytes read as a big-endian
/// candidate; the first candidate within bounds wins. `None` means the call
/// succeeded but the id could not be determined.
pub fn extract_created_token_id(result: &ConfirmationResult) -> Option<TokenId> {
    if let Some(id) = result
        .nested_calls
        .iter()
        .find_map(|nested| nested.created_token_id)
    {
        return Some(id);
    }
    decoded_records(result)
        .filter_map(|bytes| tail_candidate(&bytes))
        .find(|candidate| {
            let accepted = in_bounds(*candidate);
            if !accepted {
                tracing::debug!(target: "tx", candidate, "log candidate out of bounds");
            }
            accepted
        })
}

// A return value is the prefix, a 2-byte length, then the string bytes.
fn unwrap_return_value(bytes: &[u8]) -> &[u8] {
    let Some(rest) = bytes.strip_prefix(RETURN_VALUE_PREFIX.as_slice()) else {
        return bytes;
    };
    match rest {
        [hi, lo, payload @ ..] if usize::from(u16::from_be_bytes([*hi, *lo])) == payload.len() => {
            payload
        }
        _ => bytes,
    }
}

/// Returns the first logged text containing a verdict marker, or
/// [`UNKNOWN_VERDICT`].
pub fn extract_verification_verdict(result: &ConfirmationResult) -> String {
    decoded_records(result)
        .map(|bytes| String::from_utf8_lossy(unwrap_return_value(&bytes)).into_owned())
        .find(|text| VERDICT_MARKERS.iter().any(|marker| text.contains(marker)))
        .unwrap_or_else(|| UNKNOWN_VERDICT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use credchain_types::app::{LogRecord, NestedCall};

    fn log(bytes: &[u8]) -> LogRecord {
        LogRecord(BASE64.encode(bytes))
    }

    fn id_log(id: u64) -> LogRecord {
        log(&id.to_be_bytes())
    }

    #[test]
    fn test_nested_call_takes_priority() {
        let result = ConfirmationResult {
            nested_calls: vec![
                NestedCall::default(),
                NestedCall {
                    created_token_id: Some(777),
                },
            ],
            log_records: vec![id_log(42)],
            ..Default::default()
        };
        assert_eq!(extract_created_token_id(&result), Some(777));
    }

    #[test]
    fn test_log_fallback() {
        let result = ConfirmationResult {
            log_records: vec![id_log(999_999)],
            ..Default::default()
        };
        assert_eq!(extract_created_token_id(&result), Some(999_999));
    }

    #[test]
    fn test_log_uses_trailing_bytes() {
        let mut bytes = b"minted:".to_vec();
        bytes.extend_from_slice(&1234u64.to_be_bytes());
        let result = ConfirmationResult {
            log_records: vec![log(&bytes)],
            ..Default::default()
        };
        assert_eq!(extract_created_token_id(&result), Some(1234));
    }

    #[test]
    fn test_out_of_bound_candidates_are_skipped() {
        let result = ConfirmationResult {
            log_records: vec![
                id_log(10_000_000_000_000_000),
                id_log(0),
                log(b"short"),
                LogRecord("%%%not base64%%%".into()),
                id_log(31337),
            ],
            ..Default::default()
        };
        assert_eq!(extract_created_token_id(&result), Some(31337));

        let rejected = ConfirmationResult {
            log_records: vec![id_log(TOKEN_ID_UPPER_BOUND)],
            ..Default::default()
        };
        assert_eq!(extract_created_token_id(&rejected), None);
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(extract_created_token_id(&ConfirmationResult::default()), None);
    }

    #[test]
    fn test_verdict_first_match() {
        let result = ConfirmationResult {
            log_records: vec![
                log(b"checking credential"),
                log(b"Credential Verified"),
                log(b"Invalid"),
            ],
            ..Default::default()
        };
        assert_eq!(extract_verification_verdict(&result), "Credential Verified");
    }

    #[test]
    fn test_verdict_unwraps_return_value() {
        let text = b"Invalid credential";
        let mut bytes = RETURN_VALUE_PREFIX.to_vec();
        bytes.extend_from_slice(&(text.len() as u16).to_be_bytes());
        bytes.extend_from_slice(text);
        let result = ConfirmationResult {
            log_records: vec![log(&bytes)],
            ..Default::default()
        };
        assert_eq!(extract_verification_verdict(&result), "Invalid credential");
    }

    #[test]
    fn test_verdict_unknown() {
        let result = ConfirmationResult {
            log_records: vec![log(b"nothing to see"), LogRecord("!!".into())],
            ..Default::default()
        };
        assert_eq!(extract_verification_verdict(&result), UNKNOWN_VERDICT);
    }
}
