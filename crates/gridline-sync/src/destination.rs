use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use gridline_codec::{BatchCodec, CodecError};
use gridline_ledger::GridLedger;
use gridline_types::{unix_now, ChainId, GeoPoint, OperatorId, ReadingId};

use crate::error::{SyncError, SyncResult};

/// Replica-side progress record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplicationState {
    /// Highest source reading id applied into the replica.
    pub last_applied: Option<ReadingId>,
    /// Unix time of the last decoded batch, applied or not.
    pub last_sync: u64,
    /// Number of batches that applied at least one new reading.
    pub total_syncs: u64,
    /// Chain the replica accepts batches from.
    pub source_chain: ChainId,
}

/// Outcome of applying one received batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: u64,
    pub stale: u64,
    /// Watermark after this batch.
    pub through: Option<ReadingId>,
}

/// Snapshot of the replica for monitoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplicaStats {
    pub nodes: u64,
    pub edges: u64,
    pub readings: u64,
    pub last_sync: u64,
    pub total_syncs: u64,
    pub stale: bool,
    pub source_chain: ChainId,
    pub last_applied: Option<ReadingId>,
}

/// Destination role of the replicator: applies batches from one source
/// chain into the local replica ledger.
///
/// Application is idempotent per reading id, so redelivered or reordered
/// batches converge to the same replica state regardless of arrival order.
pub struct SyncDestination {
    ledger: Arc<GridLedger>,
    operator: OperatorId,
    staleness_threshold_secs: u64,
    inner: RwLock<ReplicationState>,
}

impl SyncDestination {
    pub fn new(
        ledger: Arc<GridLedger>,
        operator: OperatorId,
        source_chain: ChainId,
        staleness_threshold_secs: u64,
    ) -> Self {
        Self {
            ledger,
            operator,
            staleness_threshold_secs,
            inner: RwLock::new(ReplicationState {
                last_applied: None,
                last_sync: 0,
                total_syncs: 0,
                source_chain,
            }),
        }
    }

    /// Decode and apply one received batch.
    ///
    /// Readings already present in the replica are counted as stale and
    /// skipped; unknown nodes are materialized from the reading's location
    /// snapshot. The watermark only moves forward, so overlapping batches
    /// arriving in either order leave the same state behind.
    pub fn receive(
        &self,
        origin: ChainId,
        guid: [u8; 32],
        payload: &[u8],
    ) -> SyncResult<ApplyReport> {
        let expected = self.state()?.source_chain;
        if origin != expected {
            warn!(%origin, %expected, "batch from unexpected origin dropped");
            return Err(SyncError::UnexpectedOrigin {
                expected,
                actual: origin,
            });
        }

        let batch = BatchCodec::decode(payload)?;
        if batch.source_chain != expected {
            warn!(claimed = %batch.source_chain, %expected, "batch claims wrong source chain");
            return Err(SyncError::UnexpectedOrigin {
                expected,
                actual: batch.source_chain,
            });
        }

        // Validate every location snapshot before the first apply, so a
        // malformed batch rejects whole with no partial state change.
        let mut locations = Vec::with_capacity(batch.readings.len());
        for reading in &batch.readings {
            let location = GeoPoint::parse(&reading.location)
                .map_err(|e| CodecError::Deserialization(e.to_string()))?;
            locations.push(location);
        }

        let mut report = ApplyReport::default();
        for (reading, location) in batch.readings.iter().zip(locations) {
            self.ledger.ensure_node(&self.operator, reading.node, location)?;
            if self.ledger.apply_replicated_reading(&self.operator, reading)? {
                report.applied += 1;
                report.through = report.through.max(Some(reading.reading));
            } else {
                report.stale += 1;
            }
        }

        let mut state = self.inner.write().map_err(|_| SyncError::LockPoisoned)?;
        state.last_applied = state.last_applied.max(report.through);
        state.last_sync = unix_now();
        if report.applied > 0 {
            state.total_syncs += 1;
        }
        report.through = state.last_applied;
        drop(state);

        if report.applied > 0 {
            info!(
                guid = %short_guid(&guid),
                applied = report.applied,
                stale = report.stale,
                through = ?report.through,
                "batch applied"
            );
        } else {
            debug!(guid = %short_guid(&guid), stale = report.stale, "batch fully stale");
        }
        Ok(report)
    }

    /// True while the last decoded batch is younger than the staleness
    /// threshold. A replica that never received anything is unhealthy.
    pub fn is_healthy(&self) -> SyncResult<bool> {
        let state = self.state()?;
        if state.last_sync == 0 {
            return Ok(false);
        }
        Ok(unix_now().saturating_sub(state.last_sync) < self.staleness_threshold_secs)
    }

    pub fn stats(&self) -> SyncResult<ReplicaStats> {
        let state = self.state()?;
        Ok(ReplicaStats {
            nodes: self.ledger.node_count()?,
            edges: self.ledger.edge_count()?,
            readings: self.ledger.reading_count()?,
            last_sync: state.last_sync,
            total_syncs: state.total_syncs,
            stale: !self.is_healthy()?,
            source_chain: state.source_chain,
            last_applied: state.last_applied,
        })
    }

    pub fn state(&self) -> SyncResult<ReplicationState> {
        Ok(*self.inner.read().map_err(|_| SyncError::LockPoisoned)?)
    }
}

fn short_guid(guid: &[u8; 32]) -> String {
    let mut out = String::with_capacity(16);
    for byte in &guid[..8] {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
