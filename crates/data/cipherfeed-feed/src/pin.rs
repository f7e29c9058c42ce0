//! PIN digests
//!
//! Posts store only the SHA-256 of the PIN, as lowercase hex.

use sha2::{Digest, Sha256};

/// Digits in a post PIN
pub const PIN_LENGTH: usize = 4;

/// Lowercase hex SHA-256 of the PIN's UTF-8 bytes
pub fn hash_pin(pin: &str) -> String {
    hex::encode(Sha256::digest(pin.as_bytes()))
}

/// Does `pin` hash to `stored`?
pub fn verify_pin(pin: &str, stored: &str) -> bool {
    hash_pin(pin).eq_ignore_ascii_case(stored)
}

/// Is `digest` shaped like a stored PIN hash?
pub(crate) fn is_pin_digest(digest: &str) -> bool {
    digest.len() == 64 && digest.chars().all(|c| c.is_ascii_hexdigit())
}
