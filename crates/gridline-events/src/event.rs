use serde::{Deserialize, Serialize};

use gridline_types::{EdgeId, GeoPoint, NodeId, ReadingId, RequestId};

/// Classification of grid events, used for subscription filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    NodeRegistered,
    NodeDeactivated,
    NodeReactivated,
    EdgeRegistered,
    RequestSent,
    DataUpdated,
    RequestFailed,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NodeRegistered => "NodeRegistered",
            Self::NodeDeactivated => "NodeDeactivated",
            Self::NodeReactivated => "NodeReactivated",
            Self::EdgeRegistered => "EdgeRegistered",
            Self::RequestSent => "RequestSent",
            Self::DataUpdated => "DataUpdated",
            Self::RequestFailed => "RequestFailed",
        };
        write!(f, "{s}")
    }
}

/// A single event on the notification stream.
///
/// The shapes mirror the read-API boundary: ids and plain values only, no
/// references into the registries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GridEvent {
    /// A new measurement point was registered.
    NodeRegistered { id: NodeId, location: GeoPoint },
    /// A node was taken out of service (its records remain).
    NodeDeactivated { id: NodeId },
    /// A previously deactivated node was brought back.
    NodeReactivated { id: NodeId },
    /// A transmission link between two existing nodes was registered.
    EdgeRegistered {
        id: EdgeId,
        from: NodeId,
        to: NodeId,
    },
    /// An oracle request was handed off to the external network.
    RequestSent { request_id: RequestId, node: NodeId },
    /// A reading was appended, either by oracle fulfillment or by
    /// replicated-batch application; the two are indistinguishable here.
    DataUpdated {
        reading: ReadingId,
        node: NodeId,
        kwh_milli: u64,
        location: String,
        timestamp: u64,
        quality: Option<u8>,
    },
    /// The oracle reported a failure for an outstanding request.
    RequestFailed {
        request_id: RequestId,
        message: String,
    },
}

impl GridEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::NodeRegistered { .. } => EventKind::NodeRegistered,
            Self::NodeDeactivated { .. } => EventKind::NodeDeactivated,
            Self::NodeReactivated { .. } => EventKind::NodeReactivated,
            Self::EdgeRegistered { .. } => EventKind::EdgeRegistered,
            Self::RequestSent { .. } => EventKind::RequestSent,
            Self::DataUpdated { .. } => EventKind::DataUpdated,
            Self::RequestFailed { .. } => EventKind::RequestFailed,
        }
    }

    /// The node this event pertains to, when it pertains to one.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::NodeRegistered { id, .. }
            | Self::NodeDeactivated { id }
            | Self::NodeReactivated { id } => Some(*id),
            Self::RequestSent { node, .. } | Self::DataUpdated { node, .. } => Some(*node),
            Self::EdgeRegistered { .. } | Self::RequestFailed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let e = GridEvent::NodeDeactivated {
            id: NodeId::new(3),
        };
        assert_eq!(e.kind(), EventKind::NodeDeactivated);

        let e = GridEvent::DataUpdated {
            reading: ReadingId::new(0),
            node: NodeId::new(0),
            kwh_milli: 2500,
            location: "lat:40.712800,lon:-74.006000".into(),
            timestamp: 1_700_000_000,
            quality: None,
        };
        assert_eq!(e.kind(), EventKind::DataUpdated);
    }

    #[test]
    fn node_accessor() {
        let e = GridEvent::RequestSent {
            request_id: RequestId::new(),
            node: NodeId::new(7),
        };
        assert_eq!(e.node(), Some(NodeId::new(7)));

        let e = GridEvent::RequestFailed {
            request_id: RequestId::new(),
            message: "upstream error".into(),
        };
        assert_eq!(e.node(), None);
    }

    #[test]
    fn kind_display() {
        assert_eq!(format!("{}", EventKind::DataUpdated), "DataUpdated");
        assert_eq!(format!("{}", EventKind::RequestFailed), "RequestFailed");
    }
}
