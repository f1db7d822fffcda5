use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use gridline_types::ChainId;

use crate::error::SyncError;

/// Source-side replication configuration.
///
/// The auto-sync scheduler itself is an external collaborator: when
/// `auto_sync` is set it is expected to call
/// [`SyncSource::sync_now`](crate::SyncSource) every `interval_secs`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub interval_secs: u64,
    pub auto_sync: bool,
    pub max_readings_per_batch: u64,
    pub destinations: BTreeSet<ChainId>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
            auto_sync: false,
            max_readings_per_batch: 100,
            destinations: BTreeSet::new(),
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.max_readings_per_batch == 0 {
            return Err(SyncError::InvalidConfig {
                reason: "max_readings_per_batch must be positive".into(),
            });
        }
        if self.auto_sync && self.destinations.is_empty() {
            return Err(SyncError::InvalidConfig {
                reason: "auto-sync requires at least one destination".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        SyncConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = SyncConfig {
            max_readings_per_batch: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            SyncError::InvalidConfig { .. }
        ));
    }

    #[test]
    fn auto_sync_without_destinations_is_rejected() {
        let config = SyncConfig {
            auto_sync: true,
            ..Default::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            SyncError::InvalidConfig { .. }
        ));
    }

    #[test]
    fn auto_sync_with_destination_is_valid() {
        let config = SyncConfig {
            auto_sync: true,
            destinations: [ChainId::new(2)].into_iter().collect(),
            ..Default::default()
        };
        config.validate().unwrap();
    }
}
