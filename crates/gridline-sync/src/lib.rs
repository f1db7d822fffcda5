//! Cross-chain replication for Gridline.
//!
//! Two roles share one protocol. A [`SyncSource`] reads from its local
//! ledger and broadcasts reading batches to configured destination chains;
//! a [`SyncDestination`] applies received batches into its replica ledger.
//! The transport is at-least-once and reorderable; convergence rests on the
//! source-assigned reading ids, never on delivery order.

pub mod config;
pub mod destination;
pub mod error;
pub mod source;
pub mod transport;

pub use config::SyncConfig;
pub use destination::{ApplyReport, ReplicaStats, ReplicationState, SyncDestination};
pub use error::{SyncError, SyncResult};
pub use source::{SyncReport, SyncSource};
pub use transport::{ChainTransport, Fee};
