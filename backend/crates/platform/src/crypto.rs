//! Cryptographic Utilities
//!
//! All randomness in the process comes from a single `StdRng` that is seeded
//! once from the operating system on first use. It is never reseeded from a
//! clock or any other observable value.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use std::sync::{LazyLock, Mutex, PoisonError};

static PROCESS_RNG: LazyLock<Mutex<StdRng>> =
    LazyLock::new(|| Mutex::new(StdRng::from_entropy()));

/// Sample `len` characters uniformly from `alphabet` using the process RNG
///
/// `alphabet` must be non-empty ASCII; callers validate this once when the
/// alphabet is configured.
pub fn random_string(alphabet: &[u8], len: usize) -> String {
    debug_assert!(!alphabet.is_empty());
    debug_assert!(alphabet.is_ascii());

    // A poisoned lock only means another thread panicked mid-sample; the
    // generator state is still valid.
    let mut rng = PROCESS_RNG.lock().unwrap_or_else(PoisonError::into_inner);
    (0..len)
        .map(|_| char::from(alphabet[rng.gen_range(0..alphabet.len())]))
        .collect()
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Short, non-reversible label for a secret value
///
/// First 8 bytes of SHA-256 as hex. Lets log lines about the same token be
/// correlated without writing the token itself.
pub fn fingerprint(data: &[u8]) -> String {
    hex::encode(&sha256(data)[..8])
}
