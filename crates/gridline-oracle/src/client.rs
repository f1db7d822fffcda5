use async_trait::async_trait;

use gridline_types::{NodeId, RequestId};

use crate::error::OracleResult;
use crate::request::RequestSpec;

/// A request as handed off to the external oracle network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleRequest {
    pub id: RequestId,
    pub node: NodeId,
    pub spec: RequestSpec,
}

/// Seam to the external oracle network.
///
/// Dispatch is fire-and-forget from the core's perspective: a successful
/// return means the request was handed off, not that data will arrive. The
/// network later invokes [`OracleAdapter::fulfill`](crate::OracleAdapter)
/// at an unpredictable time, possibly never.
#[async_trait]
pub trait OracleClient: Send + Sync {
    async fn dispatch(&self, request: OracleRequest) -> OracleResult<()>;
}
