//! Response verification, anti-Sybil exclusion, and weighted tally (spec
//! §4.5 steps 5-6).

use secp256k1::PublicKey;
use wot_clustering::WalletClusterer;
use wot_crypto::hash::calculate_sha256;
use wot_crypto::signature;
use wot_storage::Database;
use wot_sybil::ValidatorRegistry;
use wot_types::Address;

use crate::types::{HatConsensusResult, ValidationRequest, ValidationResponse, ValidationVote};

/// Bytes signed for a response (mirrors `response::signing_digest`; kept in
/// sync manually since the signed payload is part of the wire contract, not
/// an implementation detail either module owns exclusively).
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

/// Verify one response's nonce, pubkey-to-address binding, and signature
/// (spec §3: "Response is only valid if `nonce == req.nonce` and signature
/// verifies under `validator_pubkey` and `pubkey` hashes to `validator`").
pub fn verify_response(request: &ValidationRequest, response: &ValidationResponse) -> bool {
    if response.nonce != request.nonce || response.tx != request.tx {
        return false;
    }
    let Ok(public_key) = PublicKey::from_slice(&response.validator_pubkey) else {
        return false;
    };
    if signature::pubkey_to_address(&public_key) != response.validator.0 {
        return false;
    }
    let Ok(sig) = secp256k1::ecdsa::Signature::from_compact(&response.signature) else {
        return false;
    };
    let digest = signing_digest(response);
    signature::verify(&public_key, &digest, &sig)
}

/// Weighted tally and consensus verdict over a validated response set (spec
/// §4.5 step 6, §8 property 6).
///
/// `responders_flagged_sybil` records whether [`detect_coordinated_sybil`]
/// found and excluded a majority cluster, so callers (e.g. fraud recording)
/// can refuse to act on a tally whose responder set was compromised.
pub struct TallyOutcome {
    pub result: HatConsensusResult,
    pub responders_flagged_sybil: bool,
}

/// `detect_coordinated_sybil_attack(responses)` (spec §4.5): if a majority
/// of responders share one wallet cluster, flag and exclude them. Returns
/// the surviving responses and whether exclusion occurred.
pub fn detect_coordinated_sybil<S: Database>(
    clusterer: &WalletClusterer<S>,
    responses: Vec<ValidationResponse>,
) -> (Vec<ValidationResponse>, bool) {
    if responses.is_empty() {
        return (responses, false);
    }
    let mut cluster_counts: std::collections::HashMap<Address, usize> = std::collections::HashMap::new();
    for r in &responses {
        *cluster_counts.entry(clusterer.find(r.validator)).or_insert(0) += 1;
    }
    let (dominant_cluster, dominant_count) = cluster_counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .expect("responses is non-empty");
    let majority = dominant_count * 2 > responses.len();
    if !majority {
        return (responses, false);
    }
    warn!(
        "excluding {} responses sharing wallet cluster {} from tally (coordinated Sybil attack suspected)",
        dominant_count, dominant_cluster
    );
    let survivors = responses
        .into_iter()
        .filter(|r| clusterer.find(r.validator) != dominant_cluster)
        .collect();
    (survivors, true)
}

/// Tally verified, Sybil-screened responses (spec §4.5 step 6).
pub fn tally_responses<D: Database>(
    request: &ValidationRequest,
    responses: Vec<ValidationResponse>,
    clusterer: &WalletClusterer<D>,
    min_validators: usize,
    consensus_threshold: f64,
    wot_coverage_threshold: f64,
) -> TallyOutcome {
    let verified: Vec<ValidationResponse> = responses
        .into_iter()
        .filter(|r| verify_response(request, r))
        .collect();

    let (survivors, responders_flagged_sybil) = detect_coordinated_sybil(clusterer, verified);

    let mut accept_count = 0u32;
    let mut reject_count = 0u32;
    let mut abstain_count = 0u32;
    let mut weighted_accept = 0.0;
    let mut weighted_reject = 0.0;
    let mut weighted_abstain = 0.0;
    let mut wot_responders = 0usize;

    for r in &survivors {
        if r.has_wot {
            wot_responders += 1;
        }
        match r.vote {
            ValidationVote::Accept => {
                accept_count += 1;
                weighted_accept += r.confidence;
            }
            ValidationVote::Reject => {
                reject_count += 1;
                weighted_reject += r.confidence;
            }
            ValidationVote::Abstain => {
                abstain_count += 1;
                weighted_abstain += r.confidence;
            }
        }
    }

    let wot_coverage = if survivors.is_empty() {
        0.0
    } else {
        wot_responders as f64 / survivors.len() as f64
    };

    let enough_validators = survivors.len() >= min_validators;
    let accept_share = weighted_accept / (weighted_accept + weighted_reject).max(f64::EPSILON);
    let reject_share = weighted_reject / (weighted_accept + weighted_reject).max(f64::EPSILON);
    let has_any_vote = weighted_accept + weighted_reject > 0.0;

    let reached = enough_validators
        && has_any_vote
        && wot_coverage >= wot_coverage_threshold
        && (accept_share >= consensus_threshold || reject_share >= consensus_threshold);
    let approved = reached && accept_share >= consensus_threshold;
    let needs_dao_review = !reached;

    let result = HatConsensusResult {
        tx: request.tx,
        reached,
        approved,
        needs_dao_review,
        accept_count,
        reject_count,
        abstain_count,
        weighted_accept,
        weighted_reject,
        weighted_abstain,
        wot_coverage,
        responses: survivors,
    };
    TallyOutcome {
        result,
        responders_flagged_sybil,
    }
}
