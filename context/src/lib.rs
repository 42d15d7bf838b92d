//! `CoreContext`: the single struct a host node constructs at init time and
//! threads through every call into this workspace (spec §9 "Shared mutable
//! state": "Global singletons in the source (`g_securityAudit`,
//! `g_dosProtection`, etc.) must become explicitly passed capabilities:
//! construct a `CoreContext` at node init holding handles to database,
//! peers, audit sink, degradation manager; pass it into each subsystem").
//!
//! This crate owns no algorithm of its own — every operation in spec §4
//! lives in the crate that names it (`wot-trust-graph`, `wot-consensus`,
//! ...). `CoreContext` only:
//!
//! 1. Loads every subsystem from a shared `Database`/`Peers` pair and a
//!    validated `Config`, replaying persisted state (each subsystem's own
//!    `load` does the replay; this crate just calls them in dependency
//!    order, per spec §2's "leaves first" description).
//! 2. Exposes a `process_block` entry point that is the host's only required
//!    integration point for block-ordered effects (spec §5).
//! 3. Implements the shutdown sequence spec §5 describes: "drains worker
//!    threads, persists the known-cluster-memberships table, and flips all
//!    circuit breakers to `Open`."

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

#[macro_use]
extern crate log;

mod error;

pub use error::{CoreError, CoreResult};

use std::sync::Arc;

use wot_audit::SecurityAuditLog;
use wot_clustering::WalletClusterer;
use wot_config::Config;
use wot_consensus::HatConsensusManager;
use wot_crosschain::CrossChainAggregator;
use wot_degradation::DegradationManager;
use wot_dispatch::{BlockDispatcher, BlockProcessingSummary};
use wot_dispute::DisputeManager;
use wot_dos::RateLimiter;
use wot_net::Peers;
use wot_storage::Database;
use wot_sybil::ValidatorRegistry;
use wot_trust_graph::TrustGraph;
use wot_types::external::Block;
use wot_types::{Address, Timestamp};

/// Minimum severity the audit log persists (spec §4.10 "a configurable
/// min-level filter"); a host wanting a different floor constructs its own
/// `SecurityAuditLog` and wires it by hand instead of going through
/// `CoreContext::load`.
const DEFAULT_AUDIT_LEVEL: wot_audit::Severity = wot_audit::Severity::Info;

/// Everything one CVM node needs to run the reputation/trust-verification
/// core, wired once at node init and dropped at node shutdown (spec §9: no
/// reconstruction in between).
///
/// `D` is the host's `Database` implementation, `P` its `Peers` capability.
/// Every field is `Arc`-shared so a host can hand the same context to
/// multiple worker threads (spec §5's thread-pool model) without cloning
/// state.
pub struct CoreContext<D: Database, P: Peers> {
    pub config: Config,
    pub database: Arc<D>,
    pub peers: Arc<P>,

    pub trust_graph: Arc<TrustGraph<D>>,
    pub clusterer: Arc<WalletClusterer<D>>,
    pub dispute_manager: Arc<DisputeManager<D>>,
    pub validator_registry: Arc<ValidatorRegistry<D>>,
    pub consensus: Arc<HatConsensusManager<D, P>>,
    pub rate_limiter: Arc<RateLimiter<D>>,
    pub degradation: Arc<DegradationManager>,
    pub audit: Arc<SecurityAuditLog<D>>,
    pub cross_chain: Arc<CrossChainAggregator>,

    dispatcher: BlockDispatcher<D>,
}

impl<D: Database, P: Peers> CoreContext<D, P> {
    /// Build every subsystem over `database`/`peers`, in the dependency
    /// order spec §2 lays out (database and peers are the only leaves;
    /// everything else composes forward from there), replaying whatever
    /// persisted state `database` already holds.
    pub fn load(database: Arc<D>, peers: Arc<P>, config: Config) -> CoreResult<Self> {
        config.validate().map_err(CoreError::Config)?;

        let trust_graph = Arc::new(
            TrustGraph::load(database.clone(), config.trust_graph.clone()).map_err(CoreError::TrustGraph)?,
        );
        let clusterer = Arc::new(WalletClusterer::load(database.clone()).map_err(CoreError::Clustering)?);
        let dispute_manager = Arc::new(
            DisputeManager::load(database.clone(), config.dispute.clone()).map_err(CoreError::Dispute)?,
        );
        let validator_registry =
            Arc::new(ValidatorRegistry::load(database.clone()).map_err(CoreError::Sybil)?);
        let consensus = Arc::new(
            HatConsensusManager::load(database.clone(), peers.clone(), config.hat.clone())
                .map_err(CoreError::Consensus)?,
        );
        let rate_limiter =
            Arc::new(RateLimiter::load(database.clone(), config.dos.clone()).map_err(CoreError::Dos)?);
        let degradation = Arc::new(DegradationManager::new(config.degradation.clone()));
        let audit = Arc::new(
            SecurityAuditLog::load(database.clone(), DEFAULT_AUDIT_LEVEL).map_err(CoreError::Audit)?,
        );
        let cross_chain = Arc::new(CrossChainAggregator::new(config.cross_chain.clone()));

        let dispatcher = BlockDispatcher::new(
            trust_graph.clone(),
            clusterer.clone(),
            dispute_manager.clone(),
            audit.clone(),
            degradation.clone(),
            config.dispute.clone(),
        );

        Ok(CoreContext {
            config,
            database,
            peers,
            trust_graph,
            clusterer,
            dispute_manager,
            validator_registry,
            consensus,
            rate_limiter,
            degradation,
            audit,
            cross_chain,
            dispatcher,
        })
    }

    /// Process one block's reputation ops (spec §4.1 / §5 "block-ordered
    /// effects"): the host's single required call per block. HAT v2
    /// consensus itself is driven separately by the host, since it needs a
    /// P2P round-trip the dispatcher's synchronous per-tx pass cannot wait
    /// on (spec §5: `collect_validator_responses` is a host-scheduled,
    /// timeout-bounded operation, not a pure function of block contents).
    pub fn process_block(&self, block: &Block, now: Timestamp) -> BlockProcessingSummary {
        self.dispatcher.process_block(block, now)
    }

    /// Feed one post-mutation reputation score to the anomaly detector
    /// (spec §4.10) and return whether it was flagged.
    pub fn observe_reputation(&self, addr: Address) -> bool {
        self.dispatcher.observe_reputation(addr)
    }

    /// `EnterEmergencyMode` pass-through (spec §4.9).
    pub fn enter_emergency_mode(&self, reason: &str, now: Timestamp) {
        self.degradation.enter_emergency_mode(reason, now);
    }

    /// Node shutdown sequence (spec §5): worker-thread draining is the
    /// host's responsibility (this crate has no threads of its own to
    /// drain); what this context owns is flipping every circuit breaker to
    /// `Open` so any call still in flight short-circuits to a fallback
    /// rather than touching state mid-teardown. Cluster memberships and
    /// every other persisted record are already durable as of their last
    /// write (spec §3 "Lifecycle summary": writes are not buffered), so
    /// there is nothing left to flush.
    pub fn shutdown(&self, now: Timestamp) {
        info!("core context shutting down");
        self.degradation.force_open_all(now);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wot_net::InMemoryPeers;
    use wot_storage::backends::hashmap::HashMapBackend;
    use wot_types::external::{Block, Transaction};
    use wot_types::TxHash;

    use super::*;

    fn context() -> CoreContext<HashMapBackend, InMemoryPeers> {
        CoreContext::load(
            Arc::new(HashMapBackend::new()),
            Arc::new(InMemoryPeers::new()),
            Config::default(),
        )
        .unwrap()
    }

    #[test]
    fn loads_with_default_config() {
        let ctx = context();
        assert_eq!(ctx.trust_graph.get_outgoing(Address([0; 20])).len(), 0);
    }

    #[test]
    fn rejects_an_invalid_config() {
        let mut config = Config::default();
        config.dispute.burn_pct = 99;
        let err = CoreContext::load(
            Arc::new(HashMapBackend::new()),
            Arc::new(InMemoryPeers::new()),
            config,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn process_block_runs_an_empty_block_without_error() {
        let ctx = context();
        let block = Block {
            height: 1,
            hash: wot_types::BlockHash::zero(),
            transactions: vec![Transaction {
                hash: TxHash::zero(),
                input_addresses: vec![],
                op_return_outputs: vec![],
                is_coinbase: true,
            }],
        };
        let summary = ctx.process_block(&block, 0);
        assert_eq!(summary.applied, 0);
    }

    #[test]
    fn shutdown_opens_every_breaker() {
        let ctx = context();
        ctx.shutdown(0);
        assert!(!ctx
            .degradation
            .allow_request(wot_degradation::Subsystem::HatValidation, 0));
    }
}
