use serde::{Deserialize, Serialize};

use gridline_types::{GeoPoint, NodeId};

use crate::error::CodecError;

/// Size of the packed oracle word on the wire.
pub const ORACLE_WORD_BYTES: usize = 32;

/// Bit slot of one field inside the 256-bit word.
#[derive(Clone, Copy)]
struct Field {
    offset: u32,
    width: u32,
}

const TIMESTAMP: Field = Field { offset: 192, width: 64 };
const KWH: Field = Field { offset: 128, width: 64 };
const LAT: Field = Field { offset: 64, width: 32 };
const LON: Field = Field { offset: 32, width: 32 };
const NODE: Field = Field { offset: 0, width: 32 };

/// The decoded form of the oracle's single packed 256-bit response word.
///
/// Field layout, most-significant to least-significant, each field
/// right-aligned in its slot:
///
/// | field       | width | offset |
/// |-------------|-------|--------|
/// | `timestamp` | 64    | 192    |
/// | `kwh_milli` | 64    | 128    |
/// | `lat_micro` | 32    | 64     |
/// | `lon_micro` | 32    | 32     |
/// | `node`      | 32    | 0      |
///
/// Bits 96..128 are unused and encode as zero. Decoding a 32-byte word is
/// total: every bit pattern is a valid report, since the fields simply
/// partition the bit space.
///
/// Sign convention of the supported deployment region: latitude is always
/// non-negative; `lon_micro` is a magnitude whose sign is fixed negative and
/// re-applied when formatting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleReport {
    /// Unix seconds.
    pub timestamp: u64,
    /// Energy, scaled x1000 of real kWh.
    pub kwh_milli: u64,
    /// Latitude magnitude, micro-degrees.
    pub lat_micro: u32,
    /// Longitude magnitude, micro-degrees (sign fixed negative).
    pub lon_micro: u32,
    /// Node the reading belongs to.
    pub node: u32,
}

impl OracleReport {
    /// Build a report from ledger-side values, validating the sign
    /// convention and field widths at this boundary. Width overflow here is
    /// a caller error, not something decode ever produces.
    pub fn from_reading_fields(
        timestamp: u64,
        kwh_milli: u64,
        location: GeoPoint,
        node: NodeId,
    ) -> Result<Self, CodecError> {
        if location.lat_micro < 0 || location.lat_micro > u32::MAX as i64 {
            return Err(CodecError::FieldOverflow { field: "lat_micro" });
        }
        if location.lon_micro > 0 || -location.lon_micro > u32::MAX as i64 {
            return Err(CodecError::FieldOverflow { field: "lon_micro" });
        }
        if node.raw() > u32::MAX as u64 {
            return Err(CodecError::FieldOverflow { field: "node" });
        }
        Ok(Self {
            timestamp,
            kwh_milli,
            lat_micro: location.lat_micro as u32,
            lon_micro: (-location.lon_micro) as u32,
            node: node.raw() as u32,
        })
    }

    /// Pack into the big-endian 256-bit wire word.
    pub fn encode(&self) -> [u8; ORACLE_WORD_BYTES] {
        let mut hi = 0u128;
        let mut lo = 0u128;
        insert(&mut hi, &mut lo, TIMESTAMP, self.timestamp);
        insert(&mut hi, &mut lo, KWH, self.kwh_milli);
        insert(&mut hi, &mut lo, LAT, self.lat_micro as u64);
        insert(&mut hi, &mut lo, LON, self.lon_micro as u64);
        insert(&mut hi, &mut lo, NODE, self.node as u64);

        let mut word = [0u8; ORACLE_WORD_BYTES];
        word[..16].copy_from_slice(&hi.to_be_bytes());
        word[16..].copy_from_slice(&lo.to_be_bytes());
        word
    }

    /// Unpack from the wire. The only failure mode is a wrong byte count;
    /// extraction itself is shift-then-mask and total.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != ORACLE_WORD_BYTES {
            return Err(CodecError::WordLength {
                expected: ORACLE_WORD_BYTES,
                actual: bytes.len(),
            });
        }
        let hi = u128::from_be_bytes(bytes[..16].try_into().expect("16-byte slice"));
        let lo = u128::from_be_bytes(bytes[16..].try_into().expect("16-byte slice"));

        Ok(Self {
            timestamp: extract(hi, lo, TIMESTAMP),
            kwh_milli: extract(hi, lo, KWH),
            lat_micro: extract(hi, lo, LAT) as u32,
            lon_micro: extract(hi, lo, LON) as u32,
            node: extract(hi, lo, NODE) as u32,
        })
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::new(self.node as u64)
    }

    /// Coordinates with the regional sign convention applied.
    pub fn geo(&self) -> GeoPoint {
        GeoPoint::from_micro(self.lat_micro as i64, -(self.lon_micro as i64))
    }

    /// Display snapshot of the form `lat:<v>,lon:-<v>`, 6 fractional digits.
    pub fn location_string(&self) -> String {
        self.geo().to_string()
    }
}

/// `field = (word >> offset) & ((1 << width) - 1)` over the (hi, lo) pair.
fn extract(hi: u128, lo: u128, field: Field) -> u64 {
    let shifted = if field.offset >= 128 {
        hi >> (field.offset - 128)
    } else if field.offset == 0 {
        lo
    } else {
        (lo >> field.offset) | (hi << (128 - field.offset))
    };
    let mask = (1u128 << field.width) - 1;
    (shifted & mask) as u64
}

/// OR `value << offset` into the accumulator pair, masked to the width.
fn insert(hi: &mut u128, lo: &mut u128, field: Field, value: u64) {
    let value = value as u128 & ((1u128 << field.width) - 1);
    if field.offset >= 128 {
        *hi |= value << (field.offset - 128);
    } else {
        *lo |= value << field.offset;
        if field.offset + field.width > 128 {
            *hi |= value >> (128 - field.offset);
        }
    }
}
