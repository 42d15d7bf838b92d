//! Per-validator response computation (spec §4.5 step 4).

use secp256k1::{PublicKey, SecretKey};
use wot_crypto::hash::calculate_sha256;
use wot_crypto::signature;
use wot_storage::Database;
use wot_trust_graph::{TrustGraph, DEFAULT_MAX_DEPTH};
use wot_types::{Address, TxHash};

use crate::components::ComponentSource;
use crate::types::{
    ComponentStatus, HATv2Score, ValidationRequest, ValidationResponse, ValidationVote, NON_WOT_VOTE_WEIGHT,
    SCORE_TOLERANCE, WOT_VOTE_WEIGHT,
};

/// Bytes signed for a response: every field except `signature` itself (spec
/// §3: "Signature covers all fields except `signature`").
fn signing_digest(response: &ValidationResponse) -> [u8; 32] {
    let payload = (
        response.tx,
        response.validator,
        response.calculated,
        response.vote,
        response.confidence.to_bits(),
        response.has_wot,
        &response.relevant_paths,
        response.trust_graph_hash,
        response.component_status,
        response.verified_components,
        &response.validator_pubkey,
        response.nonce,
        response.ts,
    );
    calculate_sha256(&bincode::serialize(&payload).expect("signable payload is always serializable")).0
}

/// Classify `calculated` against `claimed` per the vote rule (spec §4.5
/// step 4): exact match within tolerance accepts; a WoT-connected validator
/// rejects otherwise; a non-WoT validator only compares the non-WoT
/// components and abstains if those still line up.
fn classify_vote(claimed: &HATv2Score, calculated: &HATv2Score, has_wot: bool) -> (ValidationVote, ComponentStatus) {
    if (claimed.final_score - calculated.final_score).abs() <= SCORE_TOLERANCE {
        return (
            ValidationVote::Accept,
            ComponentStatus {
                behavior_checked: true,
                wot_checked: true,
                economic_checked: true,
                temporal_checked: true,
            },
        );
    }
    if has_wot {
        return (
            ValidationVote::Reject,
            ComponentStatus {
                behavior_checked: true,
                wot_checked: true,
                economic_checked: true,
                temporal_checked: true,
            },
        );
    }
    let non_wot_matches = component_matches(claimed.behavior, calculated.behavior)
        && component_matches(claimed.economic, calculated.economic)
        && component_matches(claimed.temporal, calculated.temporal);
    let status = ComponentStatus {
        behavior_checked: true,
        wot_checked: false,
        economic_checked: true,
        temporal_checked: true,
    };
    if non_wot_matches {
        (ValidationVote::Abstain, status)
    } else {
        (ValidationVote::Reject, status)
    }
}

fn component_matches(claimed: f64, calculated: f64) -> bool {
    (claimed - calculated).abs() <= f64::from(SCORE_TOLERANCE)
}

/// Compute and sign this validator's response to `request` (spec §4.5 step 4).
///
/// `wot_path_strength` is scaled from `weighted_reputation` (which can range
/// outside `[0,1]` with highly-weighted multi-path graphs) into the `[0,100]`
/// component scale via a straight `*100` clamp; see DESIGN.md.
pub fn compute_validator_response<D: Database>(
    validator: Address,
    secret_key: &SecretKey,
    public_key: &PublicKey,
    request: &ValidationRequest,
    trust_graph: &TrustGraph<D>,
    components: &dyn ComponentSource,
    validator_accuracy: f64,
    trust_graph_hash: TxHash,
    ts: u64,
) -> ValidationResponse {
    let behavior = components.behavior(request.sender, request.block_height);
    let economic = components.economic(request.sender, request.block_height);
    let temporal = components.temporal(request.sender, request.block_height);

    let paths = trust_graph.find_paths(validator, request.sender, DEFAULT_MAX_DEPTH);
    let has_wot = !paths.is_empty();
    let wot_path_strength = trust_graph.weighted_reputation(validator, request.sender, DEFAULT_MAX_DEPTH);
    let wot = (wot_path_strength * 100.0).clamp(0.0, 100.0);

    let calculated = HATv2Score::compose(
        request.sender,
        ts,
        behavior,
        wot,
        economic,
        temporal,
        has_wot,
        paths.len() as u32,
        wot_path_strength,
    );

    let (vote, component_status) = classify_vote(&request.claimed_score, &calculated, has_wot);
    let confidence = (if has_wot { WOT_VOTE_WEIGHT } else { NON_WOT_VOTE_WEIGHT }) * validator_accuracy;

    let mut response = ValidationResponse {
        tx: request.tx,
        validator,
        calculated,
        vote,
        confidence,
        has_wot,
        relevant_paths: paths,
        trust_graph_hash,
        component_status,
        verified_components: calculated,
        validator_pubkey: public_key.serialize().to_vec(),
        signature: Vec::new(),
        nonce: request.nonce,
        ts,
    };
    let digest = signing_digest(&response);
    response.signature = signature::sign(secret_key, &digest).serialize_compact().to_vec();
    response
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use secp256k1::SECP256K1;
    use wot_config::TrustGraphConfig;
    use wot_storage::backends::hashmap::HashMapBackend;

    use super::*;
    use crate::components::StaticComponentSource;
    use crate::types::HATv2Score;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    fn request_for(sender: Address, claimed: HATv2Score) -> ValidationRequest {
        ValidationRequest {
            tx: TxHash::zero(),
            sender,
            claimed_score: claimed,
            nonce: TxHash::zero(),
            ts: 0,
            block_height: 100,
        }
    }

    #[test]
    fn s3_matching_scores_accept() {
        let trust_graph =
            TrustGraph::load(Arc::new(HashMapBackend::new()), TrustGraphConfig::default()).unwrap();
        let mut components = StaticComponentSource::new();
        let sender = addr(9);
        // behavior*0.4 + wot*0.3 + economic*0.2 + temporal*0.1 = 70 when
        // every component is 70 (no WoT path, so wot stays 0 and we solve
        // for components so the non-wot-only final score comes out to 70).
        components.set(sender, 70.0, 70.0, 70.0);

        let claimed = HATv2Score::compose(sender, 0, 70.0, 0.0, 70.0, 70.0, false, 0, 0.0);
        let request = request_for(sender, claimed);

        let (secret_key, public_key) = SECP256K1.generate_keypair(&mut rand::rngs::OsRng);
        let response = compute_validator_response(
            addr(1),
            &secret_key,
            &public_key,
            &request,
            &trust_graph,
            &components,
            1.0,
            TxHash::zero(),
            0,
        );

        assert_eq!(response.vote, ValidationVote::Accept);
    }

    #[test]
    fn s4_fraudulent_claim_with_wot_path_rejects() {
        let trust_graph =
            TrustGraph::load(Arc::new(HashMapBackend::new()), TrustGraphConfig::default()).unwrap();
        let validator = addr(1);
        let sender = addr(9);
        trust_graph
            .add_trust_edge(validator, sender, 80, 10_000, TxHash::zero(), 0, String::new())
            .unwrap();

        let mut components = StaticComponentSource::new();
        components.set(sender, 50.0, 50.0, 50.0);

        // Sender claims 90; true calculated score is far lower.
        let claimed = HATv2Score::compose(sender, 0, 90.0, 90.0, 90.0, 90.0, true, 1, 0.8);
        let request = request_for(sender, claimed);

        let (secret_key, public_key) = SECP256K1.generate_keypair(&mut rand::rngs::OsRng);
        let response = compute_validator_response(
            validator,
            &secret_key,
            &public_key,
            &request,
            &trust_graph,
            &components,
            1.0,
            TxHash::zero(),
            0,
        );

        assert!(response.has_wot);
        assert_eq!(response.vote, ValidationVote::Reject);
    }
}
