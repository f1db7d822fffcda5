use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use gridline_types::ChainId;

use crate::error::SyncResult;

/// Transport cost of one cross-chain message, in the transport's native
/// base unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fee(u128);

impl Fee {
    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u128 {
        self.0
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Seam to the external cross-chain message channel.
///
/// Delivery is at-least-once with unbounded latency; messages may be
/// duplicated or reordered in flight. `send` returning `Ok` means the
/// message was accepted for transport, never that it was delivered.
#[async_trait]
pub trait ChainTransport: Send + Sync {
    /// Estimate the cost of carrying `payload_len` bytes to `dest`.
    async fn quote(&self, dest: ChainId, payload_len: usize) -> SyncResult<Fee>;

    /// Hand a payload to the transport, paying the quoted fee.
    async fn send(&self, dest: ChainId, payload: Vec<u8>, fee: Fee) -> SyncResult<()>;
}
