//! HAT v2 data model (spec §3): `HATv2Score`, `ValidationRequest`,
//! `ValidationResponse`, `HatConsensusResult`, `FraudRecord`.

use serde::{Deserialize, Serialize};
use wot_trust_graph::TrustPath;
use wot_types::{Address, Amount, BlockHeight, Timestamp, TxHash};

/// Weight of the behavior component in a final HAT v2 score.
pub const BEHAVIOR_WEIGHT: f64 = 0.40;
/// Weight of the WoT component.
pub const WOT_WEIGHT: f64 = 0.30;
/// Weight of the economic component.
pub const ECONOMIC_WEIGHT: f64 = 0.20;
/// Weight of the temporal component.
pub const TEMPORAL_WEIGHT: f64 = 0.10;

/// A reputation score broken into its four weighted components (spec §3).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct HATv2Score {
    pub address: Address,
    pub final_score: i16,
    pub ts: u64,
    pub behavior: f64,
    pub wot: f64,
    pub economic: f64,
    pub temporal: f64,
    pub has_wot_connection: bool,
    pub wot_path_count: u32,
    pub wot_path_strength: f64,
}

impl HATv2Score {
    /// Combine components into `final_score`, clamped to `[0,100]` (spec §3).
    pub fn compose(
        address: Address,
        ts: u64,
        behavior: f64,
        wot: f64,
        economic: f64,
        temporal: f64,
        has_wot_connection: bool,
        wot_path_count: u32,
        wot_path_strength: f64,
    ) -> Self {
        let weighted =
            BEHAVIOR_WEIGHT * behavior + WOT_WEIGHT * wot + ECONOMIC_WEIGHT * economic + TEMPORAL_WEIGHT * temporal;
        let final_score = weighted.round().clamp(0.0, 100.0) as i16;
        HATv2Score {
            address,
            final_score,
            ts,
            behavior,
            wot,
            economic,
            temporal,
            has_wot_connection,
            wot_path_count,
            wot_path_strength,
        }
    }
}

/// A validator's vote on a `ValidationRequest` (spec §9: "implement as a
/// tagged variant, not subclass hierarchy").
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValidationVote {
    Accept,
    Reject,
    Abstain,
}

/// Which individual score components a responder could verify, carried
/// alongside `ValidationResponse` so a DAO reviewer can see what was and
/// was not checked (spec §3 `component_status`).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ComponentStatus {
    pub behavior_checked: bool,
    pub wot_checked: bool,
    pub economic_checked: bool,
    pub temporal_checked: bool,
}

/// Challenge sent to a selected validator (spec §3).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValidationRequest {
    pub tx: TxHash,
    pub sender: Address,
    pub claimed_score: HATv2Score,
    pub nonce: TxHash,
    pub ts: u64,
    pub block_height: BlockHeight,
}

/// A validator's signed response to a `ValidationRequest` (spec §3).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValidationResponse {
    pub tx: TxHash,
    pub validator: Address,
    pub calculated: HATv2Score,
    pub vote: ValidationVote,
    pub confidence: f64,
    pub has_wot: bool,
    pub relevant_paths: Vec<TrustPath>,
    pub trust_graph_hash: TxHash,
    pub component_status: ComponentStatus,
    pub verified_components: HATv2Score,
    pub validator_pubkey: Vec<u8>,
    pub signature: Vec<u8>,
    pub nonce: TxHash,
    pub ts: u64,
}

/// Tally and outcome of one HAT v2 validation round (spec §3 `ConsensusResult`;
/// renamed here to avoid colliding with this crate's `Result` alias).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HatConsensusResult {
    pub tx: TxHash,
    pub reached: bool,
    pub approved: bool,
    pub needs_dao_review: bool,
    pub accept_count: u32,
    pub reject_count: u32,
    pub abstain_count: u32,
    pub weighted_accept: f64,
    pub weighted_reject: f64,
    pub weighted_abstain: f64,
    pub wot_coverage: f64,
    pub responses: Vec<ValidationResponse>,
}

/// Threshold a weighted accept or reject share must clear to reach
/// consensus (spec §4.5).
pub const CONSENSUS_THRESHOLD: f64 = 0.70;
/// Minimum fraction of responders that must have a direct WoT path (spec §4.5).
pub const WOT_COVERAGE_THRESHOLD: f64 = 0.30;
/// Minimum number of selected validators; fewer ⇒ `needs_dao_review` (spec §4.5).
pub const MIN_VALIDATORS: usize = 10;
/// `|claimed.final - calculated.final| <= SCORE_TOLERANCE` ⇒ `Accept` (spec §4.5).
pub const SCORE_TOLERANCE: i16 = 5;
/// Confidence multiplier for a responder with a WoT path to the sender.
pub const WOT_VOTE_WEIGHT: f64 = 1.0;
/// Confidence multiplier for a responder without one.
pub const NON_WOT_VOTE_WEIGHT: f64 = 0.5;

/// An append-only record of a detected fraud attempt (spec §3).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FraudRecord {
    pub tx: TxHash,
    pub fraudster: Address,
    pub claimed_score: i16,
    pub actual_score: i16,
    pub score_difference: i16,
    pub ts: Timestamp,
    pub block_height: BlockHeight,
    pub reputation_penalty: i16,
    pub bond_slashed: Amount,
}
