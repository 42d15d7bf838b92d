//! The fixed set of subsystems degradation tracks a circuit breaker for
//! (spec §4.9).

use serde::{Deserialize, Serialize};

/// One of the ten subsystems spec §4.9 names explicitly. Kept as a closed
/// sum (spec §9 "Polymorphism") rather than an open string key, so every
/// consumer of this crate is checked at compile time.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Subsystem {
    TrustContext,
    ReputationQuery,
    HatValidation,
    GasDiscount,
    FreeGas,
    CrossChainTrust,
    ValidatorSelection,
    DaoDispute,
    StorageRent,
    AnomalyDetection,
}

/// Every tracked subsystem, in a fixed order.
pub const ALL: [Subsystem; 10] = [
    Subsystem::TrustContext,
    Subsystem::ReputationQuery,
    Subsystem::HatValidation,
    Subsystem::GasDiscount,
    Subsystem::FreeGas,
    Subsystem::CrossChainTrust,
    Subsystem::ValidatorSelection,
    Subsystem::DaoDispute,
    Subsystem::StorageRent,
    Subsystem::AnomalyDetection,
];

impl Subsystem {
    /// Whether this subsystem stays available during
    /// [`crate::manager::DegradationManager::enter_emergency_mode`] (spec
    /// §4.9: "only `TrustContext` and `ReputationQuery` remain available").
    pub fn is_essential(self) -> bool {
        matches!(self, Subsystem::TrustContext | Subsystem::ReputationQuery)
    }
}
