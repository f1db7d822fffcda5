//! Oracle ingestion for Gridline.
//!
//! The adapter issues data-update requests to an external oracle network and
//! matches its asynchronous fulfillment callbacks back to the originating
//! request by id. `request_data_update` and `fulfill` are two independent
//! entry points linked only by the [`RequestId`](gridline_types::RequestId);
//! no call-stack continuation crosses that boundary, and no ordering or
//! timing of fulfillments is assumed.

pub mod adapter;
pub mod client;
pub mod error;
pub mod request;

pub use adapter::{FulfillOutcome, OracleAdapter};
pub use client::{OracleClient, OracleRequest};
pub use error::{OracleError, OracleResult};
pub use request::{PendingRequest, RequestSpec, RequestState, RequestStats};
