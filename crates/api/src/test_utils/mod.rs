// Path: crates/api/src/test_utils/mod.rs
//! In-memory fakes of the external collaborators.
//!
//! None of these types perform I/O. They are compiled unconditionally so that
//! downstream crates can use them from their own tests.

use std::sync::{Mutex, MutexGuard};

/// A scripted in-memory content store.
pub mod mock_content;
/// A scripted in-memory ledger network.
pub mod mock_network;
/// A scripted signer.
pub mod mock_signer;

pub use mock_content::MockContentStore;
pub use mock_network::MockNetwork;
pub use mock_signer::{MockSigner, SignerMode};

// A poisoned fake is still usable: the data is plain test bookkeeping.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
