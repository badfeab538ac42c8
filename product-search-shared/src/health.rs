//! Engine health summary.

use serde::{Deserialize, Serialize};

/// Combined engine-info and cluster-health summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterHealth {
    /// Always `"healthy"` when the check itself succeeded.
    pub status: String,
    /// Cluster name reported by the engine.
    pub cluster_name: String,
    /// Engine version number.
    pub version: String,
    /// Cluster status colour (`green`, `yellow`, `red`).
    pub cluster_status: String,
    /// Number of nodes in the cluster.
    pub node_count: u64,
    /// Percentage of active shards.
    pub active_shards_percent: f64,
}
