//! Notification stream for Gridline.
//!
//! Every observable state change in the ledger, the oracle ingestion path,
//! and the replication destination surfaces as a [`GridEvent`] on the
//! [`EventBus`]. Frontends subscribe with an [`EventFilter`] and poll-free
//! consume the stream; replicated data produces the same `DataUpdated` shape
//! as locally ingested data, so consumers cannot tell the two apart.

pub mod bus;
pub mod event;

pub use bus::{EventBus, EventFilter, EventStream};
pub use event::{EventKind, GridEvent};
