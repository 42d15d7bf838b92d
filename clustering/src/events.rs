//! `ClusterUpdateEvent` (spec §3).

use serde::{Deserialize, Serialize};
use wot_types::{Address, BlockHeight, Timestamp};

/// The kind of change a [`ClusterUpdateEvent`] records.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClusterEventKind {
    /// A previously-unclustered (or differently-clustered) address joined a cluster.
    NewMember,
    /// Two clusters were unioned into one.
    ClusterMerge,
    /// Trust edges were copied onto a new cluster member.
    TrustInherited,
}

/// One recorded change to cluster membership or inherited trust (spec §3).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterUpdateEvent {
    /// What kind of change this is.
    pub kind: ClusterEventKind,
    /// The cluster id affected.
    pub cluster_id: Address,
    /// The address the event is about.
    pub affected_address: Address,
    /// For `ClusterMerge`, the cluster id that was absorbed.
    pub merged_from: Option<Address>,
    /// Block height this event was produced at.
    pub block_height: BlockHeight,
    /// Wall-clock timestamp.
    pub ts: Timestamp,
    /// For `TrustInherited`, how many edges were copied.
    pub inherited_edge_count: u32,
}
