use gridline_types::{EdgeId, NodeId};

/// Errors produced by ledger operations.
///
/// Every variant aborts the triggering call before any state change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("caller lacks the operator capability")]
    Unauthorized,

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("ledger lock poisoned")]
    LockPoisoned,
}
