//! Hash functions.

use sha2::{Digest, Sha256 as Sha256Impl};

/// Output of a SHA-256 hash.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Sha256(pub [u8; 32]);

impl Sha256 {
    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for Sha256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sha256({})", hex::encode(self.0))
    }
}

/// Calculate the SHA-256 hash of `bytes`.
pub fn calculate_sha256(bytes: &[u8]) -> Sha256 {
    let mut hasher = Sha256Impl::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&digest);
    Sha256(hash)
}

/// Hash the concatenation of two byte strings. Used throughout the core to
/// build deterministic nonces and seeds, e.g. `H(tx || block_height)` (spec
/// §3, `ValidationRequest.nonce`) and `H(tx_hash || block_height)` (spec
/// §4.5, validator-selection seed).
pub fn calculate_sha256_concat(parts: &[&[u8]]) -> Sha256 {
    let mut hasher = Sha256Impl::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&digest);
    Sha256(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_is_deterministic() {
        let a = calculate_sha256(b"hello");
        let b = calculate_sha256(b"hello");
        assert_eq!(a.0, b.0);
    }

    #[test]
    fn concat_matches_manual_concat() {
        let concatenated = calculate_sha256(b"foobar");
        let split = calculate_sha256_concat(&[b"foo", b"bar"]);
        assert_eq!(concatenated.0, split.0);
    }
}
