use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Scale factor between degrees and the stored micro-degree fixed point.
pub const MICRO: i64 = 1_000_000;

/// Geographic coordinates as micro-degree fixed point.
///
/// Latitude and longitude are stored as signed degrees scaled by 10^6, the
/// same fixed point the oracle payload uses on the wire. The canonical
/// string form is `lat:<deg>.<6 digits>,lon:<deg>.<6 digits>` and
/// round-trips through [`GeoPoint::parse`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat_micro: i64,
    pub lon_micro: i64,
}

impl GeoPoint {
    pub const fn from_micro(lat_micro: i64, lon_micro: i64) -> Self {
        Self {
            lat_micro,
            lon_micro,
        }
    }

    /// Build from degrees, rounding to micro-degree precision.
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            lat_micro: (lat * MICRO as f64).round() as i64,
            lon_micro: (lon * MICRO as f64).round() as i64,
        }
    }

    pub fn lat_degrees(&self) -> f64 {
        self.lat_micro as f64 / MICRO as f64
    }

    pub fn lon_degrees(&self) -> f64 {
        self.lon_micro as f64 / MICRO as f64
    }

    /// Parse the canonical `lat:..,lon:..` string form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let (lat_part, lon_part) = s
            .split_once(',')
            .ok_or_else(|| TypeError::InvalidGeo(s.into()))?;
        let lat = lat_part
            .strip_prefix("lat:")
            .ok_or_else(|| TypeError::InvalidGeo(s.into()))?;
        let lon = lon_part
            .strip_prefix("lon:")
            .ok_or_else(|| TypeError::InvalidGeo(s.into()))?;
        Ok(Self {
            lat_micro: parse_micro(lat).ok_or_else(|| TypeError::InvalidGeo(s.into()))?,
            lon_micro: parse_micro(lon).ok_or_else(|| TypeError::InvalidGeo(s.into()))?,
        })
    }
}

/// Parse a signed decimal with up to six fractional digits into micro units.
fn parse_micro(s: &str) -> Option<i64> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (whole, frac) = match rest.split_once('.') {
        Some((w, f)) => (w, f),
        None => (rest, ""),
    };
    if whole.is_empty() || frac.len() > 6 {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    let frac_micro: i64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<6}");
        padded.parse().ok()?
    };
    let magnitude = whole.checked_mul(MICRO)?.checked_add(frac_micro)?;
    Some(if negative { -magnitude } else { magnitude })
}

fn fmt_micro(f: &mut fmt::Formatter<'_>, micro: i64) -> fmt::Result {
    if micro < 0 {
        write!(f, "-")?;
    }
    let magnitude = micro.unsigned_abs();
    write!(f, "{}.{:06}", magnitude / MICRO as u64, magnitude % MICRO as u64)
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat:")?;
        fmt_micro(f, self.lat_micro)?;
        write!(f, ",lon:")?;
        fmt_micro(f, self.lon_micro)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_canonical_form() {
        let p = GeoPoint::from_micro(40_712_800, -74_006_000);
        assert_eq!(p.to_string(), "lat:40.712800,lon:-74.006000");
    }

    #[test]
    fn display_pads_fractional_digits() {
        let p = GeoPoint::from_micro(1_000_001, -2);
        assert_eq!(p.to_string(), "lat:1.000001,lon:-0.000002");
    }

    #[test]
    fn parse_canonical_form() {
        let p = GeoPoint::parse("lat:40.712800,lon:-74.006000").unwrap();
        assert_eq!(p, GeoPoint::from_micro(40_712_800, -74_006_000));
    }

    #[test]
    fn parse_accepts_short_fractions() {
        let p = GeoPoint::parse("lat:40.7128,lon:-74.006").unwrap();
        assert_eq!(p, GeoPoint::from_micro(40_712_800, -74_006_000));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(GeoPoint::parse("40.7,-74.0").is_err());
        assert!(GeoPoint::parse("lat:40.7").is_err());
        assert!(GeoPoint::parse("lat:abc,lon:1.0").is_err());
        assert!(GeoPoint::parse("lat:1.0000001,lon:0").is_err());
    }

    #[test]
    fn from_degrees_rounds() {
        let p = GeoPoint::from_degrees(40.7128, -74.006);
        assert_eq!(p.lat_micro, 40_712_800);
        assert_eq!(p.lon_micro, -74_006_000);
    }

    proptest! {
        #[test]
        fn display_parse_roundtrip(
            lat in -90_000_000i64..=90_000_000,
            lon in -180_000_000i64..=180_000_000,
        ) {
            let p = GeoPoint::from_micro(lat, lon);
            let parsed = GeoPoint::parse(&p.to_string()).unwrap();
            prop_assert_eq!(p, parsed);
        }
    }
}
