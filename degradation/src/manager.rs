//! `DegradationManager`: owns one [`CircuitBreaker`] per [`Subsystem`] and
//! the fallback helpers built on top of them (spec §4.9).

use std::collections::HashMap;

use parking_lot::RwLock;
use wot_config::DegradationConfig;
use wot_types::{Address, Timestamp};

use crate::breaker::CircuitBreaker;
use crate::fallback::FallbackResult;
use crate::subsystem::{Subsystem, ALL};

/// Owns every subsystem's circuit breaker plus the caches the fallback
/// helpers read from. Construct once at node init and pass by reference
/// (spec §9: "construct a `CoreContext` at node init ... no reconstruction").
pub struct DegradationManager {
    config: DegradationConfig,
    breakers: RwLock<HashMap<Subsystem, CircuitBreaker>>,
    emergency: RwLock<bool>,
    reputation_cache: RwLock<HashMap<Address, (i16, Timestamp)>>,
}

impl DegradationManager {
    /// Build a manager with every subsystem starting `Closed`, all sharing
    /// `config.default_breaker` (spec §4.9: a single breaker shape applied
    /// to every named subsystem unless the host overrides it).
    pub fn new(config: DegradationConfig) -> Self {
        let mut breakers = HashMap::new();
        for subsystem in ALL {
            breakers.insert(subsystem, CircuitBreaker::new(config.default_breaker.clone()));
        }
        DegradationManager {
            config,
            breakers: RwLock::new(breakers),
            emergency: RwLock::new(false),
            reputation_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Whether a call to `subsystem` should proceed right now. Always false
    /// for non-essential subsystems while emergency mode is active (spec
    /// §4.9: "only `TrustContext` and `ReputationQuery` remain available").
    pub fn allow_request(&self, subsystem: Subsystem, now: Timestamp) -> bool {
        if *self.emergency.read() && !subsystem.is_essential() {
            return false;
        }
        self.breakers
            .write()
            .get_mut(&subsystem)
            .expect("every Subsystem has a breaker")
            .allow_request(now)
    }

    /// Record a successful call to `subsystem`.
    pub fn record_success(&self, subsystem: Subsystem, now: Timestamp) {
        self.breakers.write().get_mut(&subsystem).expect("every Subsystem has a breaker").on_success(now);
    }

    /// Record a failed call to `subsystem`.
    pub fn record_failure(&self, subsystem: Subsystem, now: Timestamp) {
        self.breakers.write().get_mut(&subsystem).expect("every Subsystem has a breaker").on_failure(now);
    }

    /// `get_reputation_with_fallback` (spec §4.9): if `ReputationQuery`'s
    /// breaker is open, serve the cached value (TTL
    /// `reputation_cache_ttl_secs`) or `default_reputation`. Otherwise call
    /// `live` and refresh the cache on success.
    pub fn get_reputation_with_fallback(
        &self,
        addr: Address,
        now: Timestamp,
        live: impl FnOnce() -> Option<i16>,
    ) -> FallbackResult<i16> {
        if self.allow_request(Subsystem::ReputationQuery, now) {
            if let Some(value) = live() {
                self.reputation_cache.write().insert(addr, (value, now));
                self.record_success(Subsystem::ReputationQuery, now);
                return FallbackResult::live(value);
            }
            self.record_failure(Subsystem::ReputationQuery, now);
        }
        self.cached_or_default_reputation(addr, now)
    }

    fn cached_or_default_reputation(&self, addr: Address, now: Timestamp) -> FallbackResult<i16> {
        let cache = self.reputation_cache.read();
        if let Some(&(value, cached_at)) = cache.get(&addr) {
            if now.saturating_sub(cached_at) <= self.config.reputation_cache_ttl_secs as Timestamp {
                return FallbackResult::fallback(value, "cached reputation");
            }
        }
        FallbackResult::fallback(self.config.default_reputation, "default reputation")
    }

    /// `hat_v2_validation_with_fallback` (spec §4.9): when HAT consensus is
    /// unavailable, accept any self-reported `claimed_score` in `[0,100]`
    /// rather than blocking the transaction.
    pub fn hat_v2_validation_with_fallback(&self, claimed_score: i16, consensus_available: bool) -> FallbackResult<bool> {
        if consensus_available {
            return FallbackResult::live(true);
        }
        let accepted = (0..=100).contains(&claimed_score);
        FallbackResult::fallback(accepted, "HAT consensus unavailable, trusting self-reported score")
    }

    /// `EnterEmergencyMode(reason)` (spec §4.9): force every non-essential
    /// breaker open and latch emergency mode until the process restarts (no
    /// exit operation is specified, see DESIGN.md).
    pub fn enter_emergency_mode(&self, reason: &str, now: Timestamp) {
        error!("entering emergency mode: {}", reason);
        *self.emergency.write() = true;
        let mut breakers = self.breakers.write();
        for subsystem in ALL {
            if !subsystem.is_essential() {
                breakers.get_mut(&subsystem).expect("every Subsystem has a breaker").force_open(now);
            }
        }
    }

    pub fn is_emergency_mode(&self) -> bool {
        *self.emergency.read()
    }

    /// Flip every breaker to `Open` regardless of subsystem (spec §5
    /// shutdown drain: "flips all circuit breakers to `Open` to
    /// short-circuit late callers").
    pub fn force_open_all(&self, now: Timestamp) {
        let mut breakers = self.breakers.write();
        for subsystem in ALL {
            breakers.get_mut(&subsystem).expect("every Subsystem has a breaker").force_open(now);
        }
    }
}
