use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as unix seconds.
///
/// All domain timestamps (registration, readings, sync watermarks) are plain
/// unix seconds, matching the timestamp field of the oracle payload.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
