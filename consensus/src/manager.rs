//! `HatConsensusManager`: orchestrates HAT v2 validator selection, challenge
//! distribution, and response tallying (spec §4.5).
//!
//! Response *collection* itself — waiting up to `VALIDATION_TIMEOUT` and
//! discarding late arrivals — is a scheduling concern the host drives (spec
//! §5: "worker threads + bounded channels... a correlation map keyed by
//! `tx_hash` with a deadline"); this crate exposes the pure steps
//! (`select_validators`, `distribute_challenges`, `tally`) a host calls once
//! it has assembled whatever responses arrived before the deadline.

use std::sync::Arc;

use wot_clustering::WalletClusterer;
use wot_config::HatConfig;
use wot_crypto::hash::calculate_sha256_concat;
use wot_net::{NetError, Peers};
use wot_storage::Database;
use wot_sybil::ValidatorRegistry;
use wot_trust_graph::{DAODispute, TrustGraph};
use wot_types::{Address, Amount, BlockHeight, Timestamp, TxHash};

use crate::fraud::FraudLedger;
use crate::selection;
use crate::tally::{self, TallyOutcome};
use crate::types::{HATv2Score, HatConsensusResult, ValidationRequest, ValidationResponse};

/// Outcome of [`HatConsensusManager::distribute_challenges`]: validators a
/// request was actually sent to, versus ones with no known peer mapping
/// (spec §5: those "count immediately as non-responsive").
#[derive(Debug, Default, Clone)]
pub struct DistributionOutcome {
    pub sent: Vec<Address>,
    pub immediately_non_responsive: Vec<Address>,
}

/// Orchestrates one node's side of HAT v2 consensus: selection, challenge
/// fan-out, and tally (spec C5).
pub struct HatConsensusManager<D: Database, P: Peers> {
    peers: Arc<P>,
    config: HatConfig,
    fraud: FraudLedger<D>,
}

impl<D: Database, P: Peers> HatConsensusManager<D, P> {
    /// Build a manager with its own fraud ledger backed by `db`.
    pub fn load(db: Arc<D>, peers: Arc<P>, config: HatConfig) -> crate::error::ConsensusResult<Self> {
        Ok(HatConsensusManager {
            peers,
            config,
            fraud: FraudLedger::load(db)?,
        })
    }

    /// Borrow this manager's fraud ledger.
    pub fn fraud_ledger(&self) -> &FraudLedger<D> {
        &self.fraud
    }

    /// `initiate_validation(tx, claimed)` (spec §4.5 step 1): build a
    /// `ValidationRequest` with `nonce = H(tx || block_height)`.
    pub fn build_request(
        &self,
        tx: TxHash,
        sender: Address,
        claimed_score: HATv2Score,
        block_height: BlockHeight,
        ts: u64,
    ) -> ValidationRequest {
        let nonce = TxHash(calculate_sha256_concat(&[&tx.0, &block_height.to_le_bytes()]).0);
        ValidationRequest {
            tx,
            sender,
            claimed_score,
            nonce,
            ts,
            block_height,
        }
    }

    /// `select_random_validators(tx_hash, block_height)` (spec §4.5 step 2):
    /// eligibility is re-evaluated at `block_height` before the deterministic
    /// sample is drawn, so an address that lost eligibility since it was
    /// last seen never gets selected.
    pub fn select_validators(
        &self,
        registry: &ValidatorRegistry<D>,
        tx_hash: TxHash,
        block_height: BlockHeight,
        candidate_pool: &[Address],
    ) -> Vec<Address> {
        let eligible = registry.filter_eligible(candidate_pool, block_height);
        selection::select_random_validators(tx_hash, block_height, &eligible)
    }

    /// Send `request` to every selected validator (spec §4.5 step 3).
    /// Validators with no peer mapping are reported as immediately
    /// non-responsive rather than surfaced as an error, matching spec §5.
    pub fn distribute_challenges(&self, request: &ValidationRequest, validators: &[Address]) -> DistributionOutcome {
        let mut outcome = DistributionOutcome::default();
        let payload = bincode::serialize(request).expect("ValidationRequest is always serializable");
        for validator in validators {
            match self.peers.send(*validator, payload.clone()) {
                Ok(()) => outcome.sent.push(*validator),
                Err(NetError::UnknownValidator(_)) => outcome.immediately_non_responsive.push(*validator),
            }
        }
        outcome
    }

    /// `Tally` (spec §4.5 step 6): verify signatures/nonces, screen for a
    /// coordinated Sybil responder majority, and compute the weighted
    /// consensus verdict.
    pub fn tally<S: Database>(
        &self,
        request: &ValidationRequest,
        responses: Vec<ValidationResponse>,
        clusterer: &WalletClusterer<S>,
    ) -> TallyOutcome {
        tally::tally_responses(
            request,
            responses,
            clusterer,
            self.config.min_validators as usize,
            self.config.consensus_threshold,
            self.config.wot_coverage_threshold,
        )
    }

    /// Update each selected validator's running accuracy (spec §4.5 step 4
    /// "the validator's running accuracy", §4.7 eligibility signal): a
    /// responder is scored correct if its vote agrees with the tally's
    /// final `approved` direction; a validator that never responded (in
    /// `selected` but absent from `outcome.responses`) is scored incorrect,
    /// penalizing a non-responder's accuracy per spec §5 step 5.
    pub fn apply_accuracy_updates(
        &self,
        registry: &ValidatorRegistry<D>,
        selected: &[Address],
        outcome: &HatConsensusResult,
    ) -> crate::error::ConsensusResult<()> {
        use crate::types::ValidationVote;
        let responded: std::collections::HashMap<Address, ValidationVote> =
            outcome.responses.iter().map(|r| (r.validator, r.vote)).collect();
        for validator in selected {
            let correct = match responded.get(validator) {
                Some(ValidationVote::Accept) => outcome.approved,
                Some(ValidationVote::Reject) => outcome.reached && !outcome.approved,
                Some(ValidationVote::Abstain) => !outcome.reached,
                None => false,
            };
            registry
                .record_validation(*validator, correct)
                .map_err(|e| crate::error::ConsensusError::Decode {
                    key: format!("validator_profile_{}", validator),
                    msg: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// `record_fraud_attempt` for a rejected validation (spec §4.5 step 7):
    /// `actual_score` is the mean calculated final score across responders
    /// who had a WoT path (the more authoritative population), falling back
    /// to the mean over every responder if none did.
    #[allow(clippy::too_many_arguments)]
    pub fn record_fraud_if_rejected(
        &self,
        request: &ValidationRequest,
        outcome: &HatConsensusResult,
        responders_flagged_sybil: bool,
        ts: Timestamp,
        reputation_penalty: i16,
        bond_slashed: wot_types::Amount,
    ) -> crate::error::ConsensusResult<Option<crate::types::FraudRecord>> {
        if outcome.approved || !outcome.reached {
            return Ok(None);
        }
        let wot_scores: Vec<i16> = outcome
            .responses
            .iter()
            .filter(|r| r.has_wot)
            .map(|r| r.calculated.final_score)
            .collect();
        let pool = if wot_scores.is_empty() {
            outcome.responses.iter().map(|r| r.calculated.final_score).collect()
        } else {
            wot_scores
        };
        if pool.is_empty() {
            return Ok(None);
        }
        let actual_score = (pool.iter().map(|s| *s as i64).sum::<i64>() / pool.len() as i64) as i16;
        let record = self.fraud.record_fraud_attempt(
            request.tx,
            request.sender,
            request.claimed_score.final_score,
            actual_score,
            ts,
            request.block_height,
            reputation_penalty,
            bond_slashed,
            responders_flagged_sybil,
        )?;
        Ok(Some(record))
    }

    /// Escalation hand-off for `needs_dao_review` (spec §4.5 step 7,
    /// "Disputed → dispute created (C6)"): open a `DAODispute` against
    /// `disputed_vote_tx` — a bonded vote the host associates with this
    /// validation claim — so `wot-dispute`'s commit-reveal machinery can
    /// take over. This crate only opens the record; running the commit and
    /// reveal phases is `wot-dispute::DisputeManager`'s job, composed by the
    /// host alongside this manager (see DESIGN.md, "C5/C6 integration").
    #[allow(clippy::too_many_arguments)]
    pub fn escalate_to_dao<S: Database>(
        &self,
        trust_graph: &TrustGraph<S>,
        dispute_id: TxHash,
        disputed_vote_tx: TxHash,
        challenger: Address,
        challenge_bond: Amount,
        reason: String,
        created_ts: Timestamp,
        commit_phase_start: BlockHeight,
        dispute_config: &wot_config::DisputeConfig,
    ) -> crate::error::ConsensusResult<DAODispute> {
        trust_graph
            .create_dispute(
                dispute_id,
                disputed_vote_tx,
                challenger,
                challenge_bond,
                reason,
                created_ts,
                commit_phase_start,
                dispute_config.commit_phase_duration,
                dispute_config.reveal_phase_duration,
                dispute_config.enable_commit_reveal,
            )
            .map_err(|e| crate::error::ConsensusError::Decode {
                key: format!("dispute_{}", dispute_id),
                msg: e.to_string(),
            })
    }
}
