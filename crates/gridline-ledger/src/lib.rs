//! Append-only metering ledger for Gridline.
//!
//! This crate is the heart of the system. It provides:
//! - `Node`, `Edge`, and `Reading` records addressed by stable integer ids
//! - `GridLedger`, the in-memory registry with its query indices
//! - The operator capability boundary on every mutating entry point
//! - The O(1) latest-reading pointer and the time-range query surface
//! - The replica-side insertion path used by the cross-chain destination
//!
//! Records are never deleted: nodes and edges are only deactivated, readings
//! are immutable once appended.

pub mod error;
pub mod memory;
pub mod records;

pub use error::LedgerError;
pub use memory::GridLedger;
pub use records::{Edge, Node, Reading};
