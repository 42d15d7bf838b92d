//! `select_random_validators` (spec §4.5 step 2): deterministic RNG seeded
//! from `H(tx_hash || block_height)`, sampling without replacement from the
//! eligible set.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use wot_crypto::hash::calculate_sha256_concat;
use wot_types::{Address, BlockHeight, TxHash};

use crate::types::MIN_VALIDATORS;

/// Deterministic seed for a `(tx_hash, block_height)` pair (spec §4.5:
/// "deterministic RNG seeded from `H(tx_hash || block_height)`").
pub fn selection_seed(tx_hash: TxHash, block_height: BlockHeight) -> [u8; 32] {
    calculate_sha256_concat(&[&tx_hash.0, &block_height.to_le_bytes()]).0
}

/// Sample up to `MIN_VALIDATORS` addresses from `eligible` without
/// replacement, using a seed derived from `tx_hash`/`block_height` so every
/// honest node re-derives the same selection independently (spec §9:
/// "deterministic randomness ... Fisher-Yates over the sorted eligible set").
///
/// `eligible` is sorted by address before sampling: callers (e.g.
/// `ValidatorRegistry`) may assemble their candidate pool from a `HashMap`
/// whose iteration order is arbitrary, and two honest nodes must derive the
/// same quorum from the same seed regardless of the order candidates arrived
/// in.
pub fn select_random_validators(tx_hash: TxHash, block_height: BlockHeight, eligible: &[Address]) -> Vec<Address> {
    let mut pool: Vec<Address> = eligible.to_vec();
    pool.sort();

    let seed = selection_seed(tx_hash, block_height);
    let mut rng = ChaCha20Rng::from_seed(seed);

    // Fisher-Yates: shuffle the full pool, then take the first
    // `MIN_VALIDATORS` (or all of it, if smaller).
    let n = pool.len();
    for i in (1..n).rev() {
        let j = rng.gen_range(0..=i);
        pool.swap(i, j);
    }
    pool.truncate(MIN_VALIDATORS);
    pool
}
