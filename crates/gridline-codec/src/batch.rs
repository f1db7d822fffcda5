use serde::{Deserialize, Serialize};

use gridline_types::{ChainId, NodeId, ReadingId};

use crate::error::CodecError;

/// Format tag for the canonical batch layout. A divergent payload layout
/// becomes a new tag; decoders never guess between layouts.
pub const FORMAT_V1: u8 = 1;

/// Upper bound on a framed batch payload.
pub const MAX_BATCH_SIZE: usize = 16 * 1024 * 1024;

/// One reading as carried on the cross-chain wire, together with the
/// minimal node identity a replica needs to render it without a prior
/// registration round trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReading {
    /// Source-assigned globally monotonic id; the replica dedup key.
    pub reading: ReadingId,
    pub node: NodeId,
    pub timestamp: u64,
    pub kwh_milli: u64,
    /// Location snapshot in the canonical `lat:..,lon:..` form.
    pub location: String,
    pub quality: Option<u8>,
}

/// An ordered sequence of readings broadcast from one source chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingBatch {
    pub source_chain: ChainId,
    pub readings: Vec<BatchReading>,
}

impl ReadingBatch {
    /// Highest reading id in the batch, if any.
    pub fn through(&self) -> Option<ReadingId> {
        self.readings.iter().map(|r| r.reading).max()
    }
}

/// Codec for framed batch payloads: `[4 bytes len][1 byte format tag][body]`.
pub struct BatchCodec;

impl BatchCodec {
    pub fn encode(batch: &ReadingBatch) -> Result<Vec<u8>, CodecError> {
        let body =
            bincode::serialize(batch).map_err(|e| CodecError::Serialization(e.to_string()))?;
        if body.len() > MAX_BATCH_SIZE {
            return Err(CodecError::BatchTooLarge {
                size: body.len(),
                max: MAX_BATCH_SIZE,
            });
        }
        let len = (body.len() + 1) as u32;
        let mut buf = Vec::with_capacity(4 + 1 + body.len());
        buf.extend_from_slice(&len.to_be_bytes());
        buf.push(FORMAT_V1);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    pub fn decode(data: &[u8]) -> Result<ReadingBatch, CodecError> {
        if data.len() < 5 {
            return Err(CodecError::Framing("too short".into()));
        }
        let len = u32::from_be_bytes(data[0..4].try_into().expect("4-byte slice")) as usize;
        if len < 1 {
            return Err(CodecError::Framing("zero-length frame".into()));
        }
        if len - 1 > MAX_BATCH_SIZE {
            return Err(CodecError::BatchTooLarge {
                size: len - 1,
                max: MAX_BATCH_SIZE,
            });
        }
        let total = 4 + len;
        if data.len() != total {
            return Err(CodecError::Framing(format!(
                "length mismatch: have {}, framed {}",
                data.len(),
                total
            )));
        }
        let tag = data[4];
        if tag != FORMAT_V1 {
            return Err(CodecError::UnknownFormat(tag));
        }
        bincode::deserialize(&data[5..total])
            .map_err(|e| CodecError::Deserialization(e.to_string()))
    }
}
