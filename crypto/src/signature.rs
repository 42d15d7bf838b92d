//! Signing and verification of `ValidationResponse` messages (spec §3, §4.5).

use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};

use crate::hash::calculate_sha256;

/// Sign a 32-byte digest with `secret_key`. Callers must pass the output of a
/// cryptographically secure hash function, e.g. [`crate::hash::calculate_sha256`]
/// over the canonical encoding of every response field except the signature
/// itself (spec §3: "Signature covers all fields except `signature`").
pub fn sign(secret_key: &SecretKey, digest: &[u8; 32]) -> Signature {
    let msg = Message::from_digest(*digest);
    SECP256K1.sign_ecdsa(&msg, secret_key)
}

/// Verify `sig` over `digest` under `public_key`.
pub fn verify(public_key: &PublicKey, digest: &[u8; 32], sig: &Signature) -> bool {
    let msg = Message::from_digest(*digest);
    SECP256K1.verify_ecdsa(&msg, sig, public_key).is_ok()
}

/// Derive the 20-byte address a public key hashes to. A `ValidationResponse`
/// is only valid if `validator_pubkey` hashes to the claimed `validator`
/// address (spec §3).
pub fn pubkey_to_address(public_key: &PublicKey) -> [u8; 20] {
    let serialized = public_key.serialize();
    let digest = calculate_sha256(&serialized);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest.0[..20]);
    address
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn sign_then_verify_round_trips() {
        let (secret_key, public_key) = SECP256K1.generate_keypair(&mut OsRng);
        let digest = calculate_sha256(b"a validation response").0;

        let sig = sign(&secret_key, &digest);
        assert!(verify(&public_key, &digest, &sig));
    }

    #[test]
    fn verify_rejects_tampered_digest() {
        let (secret_key, public_key) = SECP256K1.generate_keypair(&mut OsRng);
        let digest = calculate_sha256(b"original").0;
        let other_digest = calculate_sha256(b"tampered").0;

        let sig = sign(&secret_key, &digest);
        assert!(!verify(&public_key, &other_digest, &sig));
    }

    #[test]
    fn pubkey_to_address_is_deterministic() {
        let (_, public_key) = SECP256K1.generate_keypair(&mut OsRng);
        assert_eq!(pubkey_to_address(&public_key), pubkey_to_address(&public_key));
    }
}
