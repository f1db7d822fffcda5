use gridline_codec::CodecError;
use gridline_ledger::LedgerError;
use gridline_types::RequestId;

pub type OracleResult<T> = Result<T, OracleError>;

/// Errors produced by the oracle ingestion adapter.
///
/// All variants abort the triggering call with no state change. An error
/// *reported by* the oracle is not among them — that is a routine outcome
/// recorded on the request, not a failure of the call (see
/// [`FulfillOutcome`](crate::FulfillOutcome)).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("caller lacks the operator capability")]
    Unauthorized,

    #[error("request {0} unknown or already fulfilled")]
    DuplicateOrUnknownRequest(RequestId),

    #[error("oracle returned neither a response nor an error")]
    EmptyResponse,

    #[error("failed to hand off request to the oracle network: {0}")]
    Dispatch(String),

    #[error("adapter lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
