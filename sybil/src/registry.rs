//! `ValidatorRegistry`: persisted `ValidatorProfile` store plus the
//! eligibility-aware validator-set builder C5 uses during selection
//! (spec §4.5 step 2, §4.7).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use wot_clustering::WalletClusterer;
use wot_net::SubnetKey;
use wot_storage::Database;
use wot_types::{Address, BlockHeight};

use crate::detection::{self, SYBIL_CONFIDENCE_THRESHOLD};
use crate::eligibility::is_validator_eligible;
use crate::error::{SybilError, SybilResult};
use crate::profile::{self, ValidatorProfile};

/// Owns every known `ValidatorProfile`, persisted through `db`.
pub struct ValidatorRegistry<D: Database> {
    db: Arc<D>,
    profiles: RwLock<HashMap<Address, ValidatorProfile>>,
}

impl<D: Database> ValidatorRegistry<D> {
    /// Build a registry backed by `db`, replaying persisted profiles.
    pub fn load(db: Arc<D>) -> SybilResult<Self> {
        let registry = ValidatorRegistry {
            db,
            profiles: RwLock::new(HashMap::new()),
        };
        registry.reload()?;
        Ok(registry)
    }

    fn reload(&self) -> SybilResult<()> {
        for (key, value) in self.db.list_prefix(&profile::validator_profile_prefix())? {
            let profile: ValidatorProfile =
                bincode::deserialize(&value).map_err(|e| SybilError::Decode {
                    key: String::from_utf8_lossy(&key).into_owned(),
                    msg: e.to_string(),
                })?;
            self.profiles.write().insert(profile.address, profile);
        }
        Ok(())
    }

    fn persist(&self, profile: &ValidatorProfile) -> SybilResult<()> {
        let bytes = bincode::serialize(profile).expect("ValidatorProfile is always serializable");
        self.db.write(&profile::validator_profile_key(&profile.address), bytes)?;
        Ok(())
    }

    /// Register a validator first observed at `first_seen_height`, a no-op
    /// if already known.
    pub fn observe(&self, address: Address, first_seen_height: BlockHeight) -> SybilResult<()> {
        if self.profiles.read().contains_key(&address) {
            return Ok(());
        }
        let profile = ValidatorProfile::new(address, first_seen_height);
        self.profiles.write().insert(address, profile.clone());
        self.persist(&profile)
    }

    /// Update topology/stake fields reported by the host's connection
    /// manager and stake tracker.
    pub fn update_topology(
        &self,
        address: Address,
        subnet: Option<SubnetKey>,
        peers: std::collections::HashSet<Address>,
        stake_age_blocks: u32,
        funding_sources: u32,
        dominant_funding_source_share: f64,
    ) -> SybilResult<()> {
        let mut profiles = self.profiles.write();
        let profile = profiles.entry(address).or_insert_with(|| ValidatorProfile::new(address, 0));
        profile.subnet = subnet;
        profile.peers = peers;
        profile.stake_age_blocks = stake_age_blocks;
        profile.funding_sources = funding_sources;
        profile.dominant_funding_source_share = dominant_funding_source_share;
        let snapshot = profile.clone();
        drop(profiles);
        self.persist(&snapshot)
    }

    /// Record a validation response's outcome against `address`'s running
    /// accuracy (spec §4.5, §4.7).
    pub fn record_validation(&self, address: Address, was_correct: bool) -> SybilResult<()> {
        let mut profiles = self.profiles.write();
        let profile = profiles.entry(address).or_insert_with(|| ValidatorProfile::new(address, 0));
        profile.record_validation(was_correct);
        let snapshot = profile.clone();
        drop(profiles);
        self.persist(&snapshot)
    }

    /// Fetch a validator's profile, if known.
    pub fn get(&self, address: Address) -> Option<ValidatorProfile> {
        self.profiles.read().get(&address).cloned()
    }

    /// Greedily build an eligible validator set from `candidates` at height
    /// `h`, in the order given (spec §4.5 step 2 draws candidates from a
    /// deterministic RNG in `wot-consensus`; this only filters by
    /// eligibility, re-evaluated against the set accumulated so far so
    /// topology/overlap checks compose across selections).
    pub fn filter_eligible(&self, candidates: &[Address], h: BlockHeight) -> Vec<Address> {
        let profiles = self.profiles.read();
        let mut selected = Vec::new();
        let mut selected_subnets = Vec::new();
        let mut selected_peer_sets: Vec<std::collections::HashSet<Address>> = Vec::new();
        for candidate in candidates {
            let profile = match profiles.get(candidate) {
                Some(p) => p,
                None => continue,
            };
            let peer_refs: Vec<&std::collections::HashSet<Address>> = selected_peer_sets.iter().collect();
            if is_validator_eligible(profile, h, &selected_subnets, &peer_refs) {
                if let Some(subnet) = profile.subnet {
                    selected_subnets.push(subnet);
                }
                selected_peer_sets.push(profile.peers.clone());
                selected.push(*candidate);
            }
        }
        selected
    }

    /// Whether `validators` forms a suspected coordinated Sybil set (spec
    /// §4.7: confidence `> 0.60` auto-escalates to DAO).
    pub fn is_suspected_sybil_set<S: Database>(
        &self,
        clusterer: &WalletClusterer<S>,
        validators: &[Address],
    ) -> bool {
        self.sybil_confidence(clusterer, validators) > SYBIL_CONFIDENCE_THRESHOLD
    }

    /// Raw confidence score for `validators` being a coordinated Sybil set.
    pub fn sybil_confidence<S: Database>(&self, clusterer: &WalletClusterer<S>, validators: &[Address]) -> f64 {
        let profiles = self.profiles.read();
        let refs: Vec<&ValidatorProfile> = validators.iter().filter_map(|a| profiles.get(a)).collect();
        detection::detect_coordinated_sybil_network(clusterer, &refs)
    }
}

#[cfg(test)]
mod tests {
    use wot_storage::backends::hashmap::HashMapBackend;

    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    #[test]
    fn observe_then_reload_preserves_profile() {
        let db = Arc::new(HashMapBackend::new());
        let registry = ValidatorRegistry::load(db.clone()).unwrap();
        registry.observe(addr(1), 5).unwrap();
        registry.record_validation(addr(1), true).unwrap();

        let reloaded = ValidatorRegistry::load(db).unwrap();
        let profile = reloaded.get(addr(1)).unwrap();
        assert_eq!(profile.validations_total, 1);
        assert_eq!(profile.first_seen_height, 5);
    }

    #[test]
    fn filter_eligible_drops_unknown_and_ineligible_candidates() {
        let registry = ValidatorRegistry::load(Arc::new(HashMapBackend::new())).unwrap();
        registry.observe(addr(1), 0).unwrap();
        for _ in 0..60 {
            registry.record_validation(addr(1), true).unwrap();
        }
        registry
            .update_topology(addr(1), None, Default::default(), 2_000, 4, 0.0)
            .unwrap();

        let eligible = registry.filter_eligible(&[addr(1), addr(2)], 20_000);
        assert_eq!(eligible, vec![addr(1)]);
    }
}
