use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable handle for a measurement point in the grid.
///
/// Node ids are assigned densely and monotonically at registration and are
/// never reused, even after deactivation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

/// Stable handle for a transmission link between two nodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(u64);

/// Globally monotonic handle for an energy reading.
///
/// Assigned at append time across all nodes; the replication watermark is
/// expressed in terms of these ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingId(u64);

/// Identifier for a chain endpoint on the cross-chain transport.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(u32);

macro_rules! impl_handle {
    ($name:ident, $raw:ty, $prefix:literal) => {
        impl $name {
            pub const fn new(raw: $raw) -> Self {
                Self(raw)
            }

            pub const fn raw(&self) -> $raw {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<$raw> for $name {
            fn from(raw: $raw) -> Self {
                Self(raw)
            }
        }
    };
}

impl_handle!(NodeId, u64, "node:");
impl_handle!(EdgeId, u64, "edge:");
impl_handle!(ReadingId, u64, "reading:");
impl_handle!(ChainId, u32, "chain:");

impl ReadingId {
    /// The handle immediately after this one, saturating at the maximum.
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Unique identifier for an oracle request (UUID v7 for time-ordering).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(uuid::Uuid);

impl RequestId {
    /// Generate a new time-ordered request ID (UUID v7).
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self.0)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req:{}", &self.0.simple().to_string()[..8])
    }
}

/// Voltage classification of a transmission link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    HighVoltage,
    MediumVoltage,
    LowVoltage,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::HighVoltage => "high-voltage",
            Self::MediumVoltage => "medium-voltage",
            Self::LowVoltage => "low-voltage",
        };
        write!(f, "{s}")
    }
}
