//! `ComponentSource`: the external collaborator C5 consults for the
//! behavior/economic/temporal score components (spec §1 "out of scope":
//! behavior and temporal come from the local database; economic "from
//! base-chain coin age/balance", which is this core's interface onto the
//! host chain).

use wot_types::{Address, BlockHeight};

/// Capability a host node supplies so C5 can compute a `HATv2Score` for an
/// arbitrary address without this crate owning chain-state or a behavior
/// database itself.
pub trait ComponentSource {
    /// Behavior component in `[0,100]`, drawn from this node's own
    /// transaction-history database.
    fn behavior(&self, address: Address, at_height: BlockHeight) -> f64;
    /// Economic component in `[0,100]`, drawn from base-chain coin age and
    /// balance.
    fn economic(&self, address: Address, at_height: BlockHeight) -> f64;
    /// Temporal component in `[0,100]`, drawn from this node's own
    /// transaction-history database.
    fn temporal(&self, address: Address, at_height: BlockHeight) -> f64;
}

/// In-memory `ComponentSource` for tests: returns whatever was configured
/// per address, `0.0` for anything unset.
#[derive(Default)]
pub struct StaticComponentSource {
    entries: std::collections::HashMap<Address, (f64, f64, f64)>,
}

impl StaticComponentSource {
    /// Build an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the `(behavior, economic, temporal)` triple returned for `address`.
    pub fn set(&mut self, address: Address, behavior: f64, economic: f64, temporal: f64) {
        self.entries.insert(address, (behavior, economic, temporal));
    }
}

impl ComponentSource for StaticComponentSource {
    fn behavior(&self, address: Address, _at_height: BlockHeight) -> f64 {
        self.entries.get(&address).map(|(b, _, _)| *b).unwrap_or(0.0)
    }

    fn economic(&self, address: Address, _at_height: BlockHeight) -> f64 {
        self.entries.get(&address).map(|(_, e, _)| *e).unwrap_or(0.0)
    }

    fn temporal(&self, address: Address, _at_height: BlockHeight) -> f64 {
        self.entries.get(&address).map(|(_, _, t)| *t).unwrap_or(0.0)
    }
}
