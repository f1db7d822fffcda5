use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use gridline_codec::{BatchCodec, BatchReading, ReadingBatch};
use gridline_ledger::{GridLedger, Reading};
use gridline_types::{ChainId, OperatorId, ReadingId};

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::transport::{ChainTransport, Fee};

/// Result of one broadcast round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub readings_sent: usize,
    pub destinations: usize,
    /// Highest reading id broadcast so far.
    pub through: Option<ReadingId>,
    pub fee_paid: Fee,
}

/// Source role of the replicator: reads from the local ledger and emits
/// batches to every configured destination chain.
///
/// The broadcast watermark tracks what this source has *dispatched*, not
/// what any destination has applied — delivery is not synchronous with
/// dispatch, and the two watermarks are independent.
pub struct SyncSource {
    ledger: Arc<GridLedger>,
    transport: Arc<dyn ChainTransport>,
    chain_id: ChainId,
    operator: OperatorId,
    config: RwLock<SyncConfig>,
    last_broadcast: RwLock<Option<ReadingId>>,
}

impl SyncSource {
    pub fn new(
        ledger: Arc<GridLedger>,
        transport: Arc<dyn ChainTransport>,
        chain_id: ChainId,
        operator: OperatorId,
        config: SyncConfig,
    ) -> SyncResult<Self> {
        config.validate()?;
        Ok(Self {
            ledger,
            transport,
            chain_id,
            operator,
            config: RwLock::new(config),
            last_broadcast: RwLock::new(None),
        })
    }

    /// Replace the replication configuration. Operator-only.
    pub fn configure(&self, caller: &OperatorId, config: SyncConfig) -> SyncResult<()> {
        if caller != &self.operator {
            return Err(SyncError::Unauthorized);
        }
        config.validate()?;
        info!(
            interval_secs = config.interval_secs,
            auto_sync = config.auto_sync,
            max_batch = config.max_readings_per_batch,
            destinations = config.destinations.len(),
            "sync config updated"
        );
        *self.config.write().map_err(|_| SyncError::LockPoisoned)? = config;
        Ok(())
    }

    pub fn config(&self) -> SyncResult<SyncConfig> {
        Ok(self
            .config
            .read()
            .map_err(|_| SyncError::LockPoisoned)?
            .clone())
    }

    pub fn last_broadcast(&self) -> SyncResult<Option<ReadingId>> {
        Ok(*self
            .last_broadcast
            .read()
            .map_err(|_| SyncError::LockPoisoned)?)
    }

    /// Estimate the transport cost of the next broadcast round. With
    /// `include_all` the estimate covers a full resync from the first
    /// reading instead of the incremental tail.
    pub async fn quote_fee(&self, include_all: bool) -> SyncResult<Fee> {
        let config = self.config()?;
        let after = if include_all {
            None
        } else {
            self.last_broadcast()?
        };
        let batch = self.collect(after, &config)?;
        let payload = BatchCodec::encode(&batch)?;

        let mut total = Fee::default();
        for dest in &config.destinations {
            total = total.saturating_add(self.transport.quote(*dest, payload.len()).await?);
        }
        Ok(total)
    }

    /// Broadcast every reading past the watermark, truncated to the
    /// configured batch size, to every destination. The watermark advances
    /// only after all destinations accepted the dispatch; a partial failure
    /// leaves it put, and the next round re-sends the same range (safe:
    /// destinations apply idempotently).
    pub async fn sync_now(&self) -> SyncResult<SyncReport> {
        let config = self.config()?;
        let after = self.last_broadcast()?;
        let batch = self.collect(after, &config)?;
        if batch.readings.is_empty() {
            debug!("sync round skipped: nothing past watermark");
            return Ok(SyncReport {
                through: after,
                ..Default::default()
            });
        }

        let payload = BatchCodec::encode(&batch)?;
        let through = batch.through();

        let mut fee_paid = Fee::default();
        for dest in &config.destinations {
            let fee = self.transport.quote(*dest, payload.len()).await?;
            self.transport.send(*dest, payload.clone(), fee).await?;
            fee_paid = fee_paid.saturating_add(fee);
        }

        *self
            .last_broadcast
            .write()
            .map_err(|_| SyncError::LockPoisoned)? = through;

        info!(
            readings = batch.readings.len(),
            destinations = config.destinations.len(),
            through = ?through,
            %fee_paid,
            "batch broadcast"
        );
        Ok(SyncReport {
            readings_sent: batch.readings.len(),
            destinations: config.destinations.len(),
            through,
            fee_paid,
        })
    }

    fn collect(
        &self,
        after: Option<ReadingId>,
        config: &SyncConfig,
    ) -> SyncResult<ReadingBatch> {
        let readings = self
            .ledger
            .readings_after(after, config.max_readings_per_batch as usize)?;
        Ok(ReadingBatch {
            source_chain: self.chain_id,
            readings: readings.into_iter().map(to_batch_reading).collect(),
        })
    }
}

fn to_batch_reading(reading: Reading) -> BatchReading {
    BatchReading {
        reading: reading.id,
        node: reading.node,
        timestamp: reading.timestamp,
        kwh_milli: reading.kwh_milli,
        location: reading.location,
        quality: reading.quality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use gridline_events::EventBus;
    use gridline_types::GeoPoint;

    /// In-memory transport capturing accepted messages.
    #[derive(Default)]
    struct LoopbackTransport {
        sent: Mutex<Vec<(ChainId, Vec<u8>, Fee)>>,
        refuse: bool,
    }

    #[async_trait]
    impl ChainTransport for LoopbackTransport {
        async fn quote(&self, _dest: ChainId, payload_len: usize) -> SyncResult<Fee> {
            // One unit per byte.
            Ok(Fee::new(payload_len as u128))
        }

        async fn send(&self, dest: ChainId, payload: Vec<u8>, fee: Fee) -> SyncResult<()> {
            if self.refuse {
                return Err(SyncError::Transport("channel congested".into()));
            }
            self.sent.lock().unwrap().push((dest, payload, fee));
            Ok(())
        }
    }

    fn destinations(ids: &[u32]) -> BTreeSet<ChainId> {
        ids.iter().map(|&i| ChainId::new(i)).collect()
    }

    fn source_with(
        readings: u64,
        config: SyncConfig,
    ) -> (OperatorId, Arc<GridLedger>, Arc<LoopbackTransport>, SyncSource) {
        let op = OperatorId::ephemeral();
        let ledger = Arc::new(GridLedger::new(op, Arc::new(EventBus::default())));
        let node = ledger
            .register_node(&op, GeoPoint::from_micro(40_712_800, -74_006_000), None)
            .unwrap();
        for i in 0..readings {
            ledger
                .append_reading(
                    &op,
                    node,
                    1_700_000_000 + i,
                    1000 + i,
                    "lat:40.712800,lon:-74.006000".into(),
                    None,
                )
                .unwrap();
        }
        let transport = Arc::new(LoopbackTransport::default());
        let source = SyncSource::new(
            Arc::clone(&ledger),
            transport.clone(),
            ChainId::new(1),
            op,
            config,
        )
        .unwrap();
        (op, ledger, transport, source)
    }

    #[tokio::test]
    async fn sync_now_broadcasts_and_advances_watermark() {
        let config = SyncConfig {
            destinations: destinations(&[2, 3]),
            ..Default::default()
        };
        let (_, _, transport, source) = source_with(3, config);

        let report = source.sync_now().await.unwrap();
        assert_eq!(report.readings_sent, 3);
        assert_eq!(report.destinations, 2);
        assert_eq!(report.through, Some(ReadingId::new(2)));
        assert_eq!(source.last_broadcast().unwrap(), Some(ReadingId::new(2)));

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        // Same payload to each destination.
        assert_eq!(sent[0].1, sent[1].1);
        let batch = BatchCodec::decode(&sent[0].1).unwrap();
        assert_eq!(batch.source_chain, ChainId::new(1));
        assert_eq!(batch.readings.len(), 3);
    }

    #[tokio::test]
    async fn second_round_sends_only_the_tail() {
        let config = SyncConfig {
            destinations: destinations(&[2]),
            ..Default::default()
        };
        let (op, ledger, transport, source) = source_with(2, config);
        source.sync_now().await.unwrap();

        ledger
            .append_reading(
                &op,
                gridline_types::NodeId::new(0),
                1_700_000_100,
                5000,
                "lat:40.712800,lon:-74.006000".into(),
                None,
            )
            .unwrap();

        let report = source.sync_now().await.unwrap();
        assert_eq!(report.readings_sent, 1);
        assert_eq!(report.through, Some(ReadingId::new(2)));

        let sent = transport.sent.lock().unwrap();
        let batch = BatchCodec::decode(&sent.last().unwrap().1).unwrap();
        assert_eq!(batch.readings.len(), 1);
        assert_eq!(batch.readings[0].reading, ReadingId::new(2));
    }

    #[tokio::test]
    async fn batch_is_truncated_to_configured_size() {
        let config = SyncConfig {
            max_readings_per_batch: 2,
            destinations: destinations(&[2]),
            ..Default::default()
        };
        let (_, _, _, source) = source_with(5, config);

        let report = source.sync_now().await.unwrap();
        assert_eq!(report.readings_sent, 2);
        assert_eq!(report.through, Some(ReadingId::new(1)));

        // The next round picks up where the truncation stopped.
        let report = source.sync_now().await.unwrap();
        assert_eq!(report.readings_sent, 2);
        assert_eq!(report.through, Some(ReadingId::new(3)));
    }

    #[tokio::test]
    async fn empty_round_is_a_clean_noop() {
        let config = SyncConfig {
            destinations: destinations(&[2]),
            ..Default::default()
        };
        let (_, _, transport, source) = source_with(0, config);

        let report = source.sync_now().await.unwrap();
        assert_eq!(report.readings_sent, 0);
        assert!(transport.sent.lock().unwrap().is_empty());
        assert_eq!(source.last_broadcast().unwrap(), None);
    }

    #[tokio::test]
    async fn refused_dispatch_leaves_watermark_put() {
        let op = OperatorId::ephemeral();
        let ledger = Arc::new(GridLedger::new(op, Arc::new(EventBus::default())));
        let node = ledger
            .register_node(&op, GeoPoint::from_micro(1, -1), None)
            .unwrap();
        ledger
            .append_reading(&op, node, 1, 1, "lat:0.000001,lon:-0.000001".into(), None)
            .unwrap();
        let transport = Arc::new(LoopbackTransport {
            refuse: true,
            ..Default::default()
        });
        let source = SyncSource::new(
            ledger,
            transport,
            ChainId::new(1),
            op,
            SyncConfig {
                destinations: destinations(&[2]),
                ..Default::default()
            },
        )
        .unwrap();

        let err = source.sync_now().await.unwrap_err();
        assert!(matches!(err, SyncError::Transport(_)));
        assert_eq!(source.last_broadcast().unwrap(), None);
    }

    #[tokio::test]
    async fn quote_fee_full_resync_covers_more_than_incremental() {
        let config = SyncConfig {
            destinations: destinations(&[2]),
            ..Default::default()
        };
        let (op, ledger, _, source) = source_with(4, config);
        source.sync_now().await.unwrap();
        ledger
            .append_reading(
                &op,
                gridline_types::NodeId::new(0),
                1_700_000_100,
                1,
                "lat:40.712800,lon:-74.006000".into(),
                None,
            )
            .unwrap();

        let incremental = source.quote_fee(false).await.unwrap();
        let full = source.quote_fee(true).await.unwrap();
        assert!(full > incremental);
    }

    #[tokio::test]
    async fn configure_is_operator_only_and_validated() {
        let (op, _, _, source) = source_with(
            0,
            SyncConfig {
                destinations: destinations(&[2]),
                ..Default::default()
            },
        );

        let intruder = OperatorId::ephemeral();
        let err = source
            .configure(&intruder, SyncConfig::default())
            .unwrap_err();
        assert_eq!(err, SyncError::Unauthorized);

        let err = source
            .configure(
                &op,
                SyncConfig {
                    max_readings_per_batch: 0,
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidConfig { .. }));

        source
            .configure(
                &op,
                SyncConfig {
                    max_readings_per_batch: 7,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(source.config().unwrap().max_readings_per_batch, 7);
    }

    #[test]
    fn invalid_initial_config_is_rejected() {
        let op = OperatorId::ephemeral();
        let ledger = Arc::new(GridLedger::new(op, Arc::new(EventBus::default())));
        let result = SyncSource::new(
            ledger,
            Arc::new(LoopbackTransport::default()),
            ChainId::new(1),
            op,
            SyncConfig {
                max_readings_per_batch: 0,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(SyncError::InvalidConfig { .. })));
    }
}
