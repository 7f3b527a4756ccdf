// Path: crates/api/src/error/mod.rs
// Re-export all core error types from the central types crate.
pub use credchain_types::error::{CredentialError, ErrorCode};
pub use credchain_types::Result;
