//! Pure encode/decode for Gridline's two wire formats.
//!
//! - [`OracleReport`] — the single 256-bit packed integer the oracle network
//!   returns on fulfillment, fields extracted by shift-then-mask
//! - [`ReadingBatch`] / [`BatchCodec`] — the framed cross-chain payload that
//!   carries readings (plus minimal node identity) to replicas
//!
//! Both codecs are stateless; all failure modes are in [`CodecError`].

pub mod batch;
pub mod error;
pub mod oracle;

pub use batch::{BatchCodec, BatchReading, ReadingBatch, FORMAT_V1, MAX_BATCH_SIZE};
pub use error::CodecError;
pub use oracle::{OracleReport, ORACLE_WORD_BYTES};
