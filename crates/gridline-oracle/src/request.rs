use serde::{Deserialize, Serialize};

use gridline_types::{NodeId, RequestId};

/// Per-request state machine: a single transition out of `Pending`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestState {
    Pending,
    Fulfilled,
    Failed { message: String },
}

impl RequestState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// An issued oracle request, retained for audit after it turns terminal.
///
/// There is no cancellation path: once issued, a request is eventually
/// fulfilled or failed by the oracle network, or remains `Pending` forever.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub id: RequestId,
    pub node: NodeId,
    pub issued_at: u64,
    pub state: RequestState,
}

/// What to fetch: the opaque source program, secrets, and arguments handed
/// to the external oracle network unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    pub source: String,
    pub secrets: Vec<u8>,
    pub args: Vec<String>,
}

/// Counters over the adapter's request map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestStats {
    pub pending: u64,
    pub fulfilled: u64,
    pub failed: u64,
}
