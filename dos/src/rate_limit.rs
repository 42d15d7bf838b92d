//! Reputation-tiered rate limiting and the consecutive-violation ban list
//! (spec §4.8).

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use wot_config::{DosConfig, RateLimitTier};
use wot_storage::Database;
use wot_types::{Address, Timestamp};

use crate::error::{DosError, DosResult};

/// Persisted ban record (spec §4.8 ban list).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct BanRecord {
    addr: Address,
    ban_until: Timestamp,
}

const TX_WINDOW_SECS: Timestamp = 60;
const DEPLOY_WINDOW_SECS: Timestamp = 3_600;
const RPC_WINDOW_SECS: Timestamp = 60;

/// The kind of action a rate-limit check is guarding, each with its own
/// per-tier limit and sliding window (spec §4.8 table).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    Tx,
    Deploy,
    Rpc,
}

impl Action {
    fn window_secs(self) -> Timestamp {
        match self {
            Action::Tx => TX_WINDOW_SECS,
            Action::Deploy => DEPLOY_WINDOW_SECS,
            Action::Rpc => RPC_WINDOW_SECS,
        }
    }

    fn limit(self, tier: &RateLimitTier) -> u32 {
        match self {
            Action::Tx => tier.tx_per_min,
            Action::Deploy => tier.deploys_per_hour,
            Action::Rpc => tier.rpc_per_min,
        }
    }
}

/// Reputation tier classification (spec §4.8 table).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReputationTier {
    Critical,
    High,
    Normal,
    Low,
}

/// Classify a reputation score into its rate-limit tier (spec §4.8: `≥90`
/// Critical, `70-89` High, `50-69` Normal, `<50` Low).
pub fn reputation_tier(reputation: i16) -> ReputationTier {
    if reputation >= 90 {
        ReputationTier::Critical
    } else if reputation >= 70 {
        ReputationTier::High
    } else if reputation >= 50 {
        ReputationTier::Normal
    } else {
        ReputationTier::Low
    }
}

fn ban_key(addr: &Address) -> Vec<u8> {
    format!("dos_ban_{}", addr).into_bytes()
}

fn ban_prefix() -> Vec<u8> {
    b"dos_ban_".to_vec()
}

/// Per-address sliding-window rate limiter and ban list, backed by `db` for
/// the ban list only (windows and violation counters are process-local, as
/// nothing in spec §6's key layout persists them).
pub struct RateLimiter<D: Database> {
    db: Arc<D>,
    config: DosConfig,
    windows: RwLock<HashMap<(Address, Action), VecDeque<Timestamp>>>,
    violations: RwLock<HashMap<Address, u32>>,
    bans: RwLock<HashMap<Address, Timestamp>>,
}

impl<D: Database> RateLimiter<D> {
    /// Build a limiter backed by `db`, replaying persisted bans.
    pub fn load(db: Arc<D>, config: DosConfig) -> DosResult<Self> {
        let limiter = RateLimiter {
            db,
            config,
            windows: RwLock::new(HashMap::new()),
            violations: RwLock::new(HashMap::new()),
            bans: RwLock::new(HashMap::new()),
        };
        limiter.reload()?;
        Ok(limiter)
    }

    fn reload(&self) -> DosResult<()> {
        for (_, value) in self.db.list_prefix(&ban_prefix())? {
            if let Ok(record) = bincode::deserialize::<BanRecord>(&value) {
                self.bans.write().insert(record.addr, record.ban_until);
            }
        }
        Ok(())
    }

    fn persist_ban(&self, addr: Address, ban_until: Timestamp) -> DosResult<()> {
        let record = BanRecord { addr, ban_until };
        let bytes = bincode::serialize(&record).expect("BanRecord is always serializable");
        self.db.write(&ban_key(&addr), bytes)?;
        Ok(())
    }

    /// Whether `addr` is currently serving a ban.
    pub fn is_banned(&self, addr: Address, now: Timestamp) -> Option<Timestamp> {
        let bans = self.bans.read();
        bans.get(&addr).copied().filter(|&until| now < until)
    }

    /// Check and record one `action` attempt by `addr` at reputation
    /// `reputation`. Evicts stale window entries, then either admits the
    /// attempt or records a violation (spec §4.8: "ten consecutive limit
    /// violations auto-ban for `300s * violation_count`").
    pub fn check(&self, addr: Address, action: Action, reputation: i16, now: Timestamp) -> DosResult<()> {
        if let Some(until) = self.is_banned(addr, now) {
            return Err(DosError::Banned(addr, until));
        }

        let tier = reputation_tier(reputation);
        let limit = action.limit(self.tier_config(tier));
        let window = action.window_secs();

        let mut windows = self.windows.write();
        let entry = windows.entry((addr, action)).or_default();
        while let Some(&oldest) = entry.front() {
            if now.saturating_sub(oldest) >= window {
                entry.pop_front();
            } else {
                break;
            }
        }

        if entry.len() as u32 >= limit {
            drop(windows);
            self.record_violation(addr, now)?;
            return Err(DosError::RateLimited(addr));
        }

        entry.push_back(now);
        drop(windows);
        self.violations.write().remove(&addr);
        Ok(())
    }

    fn tier_config(&self, tier: ReputationTier) -> &RateLimitTier {
        match tier {
            ReputationTier::Critical => &self.config.critical,
            ReputationTier::High => &self.config.high,
            ReputationTier::Normal => &self.config.normal,
            ReputationTier::Low => &self.config.low,
        }
    }

    fn record_violation(&self, addr: Address, now: Timestamp) -> DosResult<()> {
        let mut violations = self.violations.write();
        let count = violations.entry(addr).or_insert(0);
        *count += 1;
        let count = *count;
        drop(violations);

        if count >= self.config.consecutive_violations_to_ban {
            let ban_seconds = self.config.ban_seconds_per_violation * u64::from(count);
            let ban_until = now + ban_seconds as Timestamp;
            self.bans.write().insert(addr, ban_until);
            self.persist_ban(addr, ban_until)?;
            warn!("{} banned until {} after {} consecutive rate-limit violations", addr, ban_until, count);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wot_storage::backends::hashmap::HashMapBackend;

    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    #[test]
    fn classifies_reputation_tiers() {
        assert_eq!(reputation_tier(95), ReputationTier::Critical);
        assert_eq!(reputation_tier(75), ReputationTier::High);
        assert_eq!(reputation_tier(55), ReputationTier::Normal);
        assert_eq!(reputation_tier(10), ReputationTier::Low);
    }

    #[test]
    fn s7_eleventh_tx_in_window_is_rate_limited_then_banned() {
        let db = Arc::new(HashMapBackend::new());
        let mut config = DosConfig::default();
        config.low.tx_per_min = 10;
        let limiter = RateLimiter::load(db, config).unwrap();

        for i in 0..10 {
            limiter.check(addr(1), Action::Tx, 10, i).unwrap();
        }
        let err = limiter.check(addr(1), Action::Tx, 10, 10).unwrap_err();
        assert_eq!(err, DosError::RateLimited(addr(1)));

        for i in 11..20 {
            let _ = limiter.check(addr(1), Action::Tx, 10, i);
        }
        // The 10th consecutive violation (i=10 from the rejection above,
        // then i=11..=19) is the one that trips the ban, at `now == 19`.
        let banned = limiter.is_banned(addr(1), 20);
        assert_eq!(banned, Some(19 + 3_000));
    }

    #[test]
    fn window_evicts_entries_older_than_60_seconds() {
        let db = Arc::new(HashMapBackend::new());
        let mut config = DosConfig::default();
        config.low.tx_per_min = 1;
        let limiter = RateLimiter::load(db, config).unwrap();

        limiter.check(addr(1), Action::Tx, 10, 0).unwrap();
        assert!(limiter.check(addr(1), Action::Tx, 10, 30).is_err());
        assert!(limiter.check(addr(1), Action::Tx, 10, 61).is_ok());
    }

    #[test]
    fn ban_persists_across_reload() {
        let db = Arc::new(HashMapBackend::new());
        let mut config = DosConfig::default();
        config.low.tx_per_min = 1;
        config.consecutive_violations_to_ban = 2;
        {
            let limiter = RateLimiter::load(db.clone(), config.clone()).unwrap();
            limiter.check(addr(1), Action::Tx, 10, 0).unwrap();
            let _ = limiter.check(addr(1), Action::Tx, 10, 0);
            let _ = limiter.check(addr(1), Action::Tx, 10, 0);
        }
        let reloaded = RateLimiter::load(db, config).unwrap();
        assert!(reloaded.is_banned(addr(1), 0).is_some());
    }
}
