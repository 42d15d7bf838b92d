//! `BlockDispatcher`: processes one block's transactions in order, routing
//! reputation ops to their handlers, then running the per-block cluster
//! update, anomaly observation, and degradation health tick (spec §4.1).

use std::sync::Arc;

use wot_audit::{SecurityAuditLog, SecurityEventType, Severity};
use wot_clustering::{query, ClusterUpdateSummary, WalletClusterer};
use wot_config::DisputeConfig;
use wot_degradation::{DegradationManager, ALL as ALL_SUBSYSTEMS};
use wot_dispute::DisputeManager;
use wot_storage::Database;
use wot_trust_graph::TrustGraph;
use wot_types::external::Block;
use wot_types::{Timestamp, TxHash};

use crate::handlers::{self, AppliedOp, HandleOutcome};

/// A transaction whose op was skipped because it failed to decode or apply.
#[derive(Debug, Clone)]
pub struct SkippedTx {
    pub tx: TxHash,
    pub reason: String,
}

/// Outcome of processing one block (spec §4.1).
#[derive(Debug, Default, Clone)]
pub struct BlockProcessingSummary {
    /// Number of ops successfully applied.
    pub applied: usize,
    /// Ops recognized but out of this core's scope (`CVM_DEPLOY`/`CVM_CALL`).
    pub out_of_scope: usize,
    /// Transactions whose op failed and was isolated (spec §7:
    /// `MalformedPayload` "isolated, tx skipped, audit event").
    pub skipped: Vec<SkippedTx>,
    pub cluster_summary: ClusterUpdateSummary,
}

/// Routes a block's reputation ops to the crates that own them (spec C1).
pub struct BlockDispatcher<D: Database> {
    trust_graph: Arc<TrustGraph<D>>,
    clusterer: Arc<WalletClusterer<D>>,
    dispute_manager: Arc<DisputeManager<D>>,
    audit: Arc<SecurityAuditLog<D>>,
    degradation: Arc<DegradationManager>,
    dispute_config: DisputeConfig,
    reputation_anomaly: wot_audit::ReputationAnomalyDetector,
    voting_anomaly: wot_audit::VotingAnomalyDetector,
}

impl<D: Database> BlockDispatcher<D> {
    pub fn new(
        trust_graph: Arc<TrustGraph<D>>,
        clusterer: Arc<WalletClusterer<D>>,
        dispute_manager: Arc<DisputeManager<D>>,
        audit: Arc<SecurityAuditLog<D>>,
        degradation: Arc<DegradationManager>,
        dispute_config: DisputeConfig,
    ) -> Self {
        BlockDispatcher {
            trust_graph,
            clusterer,
            dispute_manager,
            audit,
            degradation,
            dispute_config,
            reputation_anomaly: wot_audit::ReputationAnomalyDetector::new(),
            voting_anomaly: wot_audit::VotingAnomalyDetector::new(),
        }
    }

    /// Process `block`'s transactions in order (spec §4.1, §5 "block-ordered
    /// effects"). `now` is the wall-clock time attributed to every mutation
    /// this call produces.
    pub fn process_block(&self, block: &Block, now: Timestamp) -> BlockProcessingSummary {
        let mut summary = BlockProcessingSummary::default();

        for tx in &block.transactions {
            for output in &tx.op_return_outputs {
                match handlers::handle_output(
                    output,
                    tx,
                    block.height,
                    now,
                    &self.trust_graph,
                    &self.dispute_manager,
                    &self.dispute_config,
                ) {
                    Ok(HandleOutcome::Applied(op)) => {
                        summary.applied += 1;
                        self.audit_mutation(tx.hash, now);
                        self.observe_applied_op(op);
                    }
                    Ok(HandleOutcome::OutOfScope) => summary.out_of_scope += 1,
                    Err(err) => {
                        log::warn!("tx {} op isolated: {}", tx.hash, err);
                        let _ = self.audit.record(
                            SecurityEventType::TrustGraphMutation,
                            Severity::Warning,
                            now,
                            format!("isolated op error: {err}"),
                            None,
                            Some(tx.hash),
                        );
                        summary.skipped.push(SkippedTx {
                            tx: tx.hash,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        match self
            .clusterer
            .process_block(&self.trust_graph, &block.transactions, block.height, now)
        {
            Ok(cluster_summary) => summary.cluster_summary = cluster_summary,
            Err(err) => {
                log::warn!("cluster update for block {} failed: {}", block.height, err);
                let _ = self.audit.record(
                    SecurityEventType::ClusterUpdate,
                    Severity::Error,
                    now,
                    format!("cluster update failed: {err}"),
                    None,
                    None,
                );
            }
        }

        self.run_health_check(now);
        summary
    }

    fn audit_mutation(&self, tx: TxHash, now: Timestamp) {
        let _ = self.audit.record(
            SecurityEventType::TrustGraphMutation,
            Severity::Info,
            now,
            "op applied",
            None,
            Some(tx),
        );
    }

    /// Observe a resolved address's post-mutation reputation for anomaly
    /// detection (spec §4.10).
    pub fn observe_reputation(&self, addr: wot_types::Address) -> bool {
        let score = query::global_reputation(&self.trust_graph, addr).round() as i16;
        self.reputation_anomaly.observe(addr, score)
    }

    /// Observe one DAO/HAT vote for the voting-pattern anomaly detector
    /// (spec §4.10).
    pub fn observe_vote(&self, validator: wot_types::Address, vote: i8) -> bool {
        self.voting_anomaly.observe(validator, vote)
    }

    /// Drive C10 anomaly observation from one applied op, so that a host
    /// calling only `process_block` still gets reputation/voting anomaly
    /// detection (spec §4.1: "triggers the anomaly detector (C10) ... after
    /// per-tx processing").
    fn observe_applied_op(&self, op: AppliedOp) {
        match op {
            AppliedOp::TrustEdge { to } => {
                if self.observe_reputation(to) {
                    log::warn!("reputation anomaly flagged for {}", to);
                }
            }
            AppliedOp::Vote { voter, target, value } => {
                if self.observe_vote(voter, value.signum() as i8) {
                    log::warn!("voting anomaly flagged for validator {}", voter);
                }
                if self.observe_reputation(target) {
                    log::warn!("reputation anomaly flagged for {}", target);
                }
            }
            AppliedOp::Dispute => {}
        }
    }

    /// Tick every subsystem's circuit breaker forward in time (spec §4.1:
    /// "triggers ... the degradation health check (C9)"), letting breakers
    /// that have been idle transition `Open -> HalfOpen` once their timeout
    /// has elapsed.
    fn run_health_check(&self, now: Timestamp) {
        if self.degradation.is_emergency_mode() {
            log::warn!("degradation manager is in emergency mode");
        }
        for subsystem in ALL_SUBSYSTEMS {
            self.degradation.allow_request(subsystem, now);
        }
    }
}
