use serde::{Deserialize, Serialize};

use gridline_types::{EdgeId, EdgeKind, GeoPoint, NodeId, ReadingId};

/// A physical measurement point on the grid.
///
/// Ids are assigned densely and monotonically at registration and never
/// reused; deactivation keeps the record and its readings intact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub location: GeoPoint,
    pub name: Option<String>,
    pub active: bool,
    pub registered_at: u64,
    /// Bumped by the ingestion path on every new reading.
    pub last_update: u64,
}

/// A transmission link between two nodes.
///
/// Endpoints are validated at creation time only; an edge to a later
/// deactivated node remains a valid record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
    /// Rated capacity in kW.
    pub capacity: u64,
    /// Line length in kilometers.
    pub distance: f64,
    pub active: bool,
    pub registered_at: u64,
}

impl Edge {
    /// Returns `true` if the given node is either endpoint.
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }
}

/// A single energy reading, immutable once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Globally monotonic across all nodes, assigned at append time.
    pub id: ReadingId,
    pub node: NodeId,
    /// Unix seconds.
    pub timestamp: u64,
    /// Energy, scaled x1000 of real kWh.
    pub kwh_milli: u64,
    /// Location snapshot at ingestion time, canonical `lat:..,lon:..` form.
    pub location: String,
    pub quality: Option<u8>,
}
