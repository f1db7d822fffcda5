use gridline_codec::CodecError;
use gridline_ledger::LedgerError;
use gridline_types::ChainId;

pub type SyncResult<T> = Result<T, SyncError>;

/// Errors produced by the replication source and destination roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("caller lacks the operator capability")]
    Unauthorized,

    #[error("invalid sync config: {reason}")]
    InvalidConfig { reason: String },

    #[error("batch from unexpected origin {actual}, expected {expected}")]
    UnexpectedOrigin { expected: ChainId, actual: ChainId },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("replicator lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
