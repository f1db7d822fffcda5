//! Foundation types for Gridline.
//!
//! This crate provides the identifier, geographic, and capability types used
//! throughout the Gridline system. Every other Gridline crate depends on
//! `gridline-types`.
//!
//! # Key Types
//!
//! - [`NodeId`], [`EdgeId`], [`ReadingId`] — Stable integer handles into the
//!   ledger registries; only ids cross component boundaries, never references
//! - [`ChainId`] — Identifier for a cross-chain replication endpoint
//! - [`RequestId`] — UUID v7 oracle request identifier
//! - [`EdgeKind`] — Voltage classification of a transmission link
//! - [`GeoPoint`] — Micro-degree fixed-point coordinates
//! - [`OperatorId`] — Capability token for the single-operator model

pub mod error;
pub mod geo;
pub mod ids;
pub mod operator;
pub mod temporal;

pub use error::TypeError;
pub use geo::GeoPoint;
pub use ids::{ChainId, EdgeId, EdgeKind, NodeId, ReadingId, RequestId};
pub use operator::{OperatorId, OperatorMaterial};
pub use temporal::unix_now;
