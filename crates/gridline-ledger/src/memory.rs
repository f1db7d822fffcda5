use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use gridline_codec::BatchReading;
use gridline_events::{EventBus, GridEvent};
use gridline_types::{
    unix_now, EdgeId, EdgeKind, GeoPoint, NodeId, OperatorId, ReadingId,
};

use crate::error::LedgerError;
use crate::records::{Edge, Node, Reading};

/// In-memory ledger: the node/edge/reading registries and their indices.
///
/// Every mutating operation validates the caller's operator capability and
/// all referenced ids before touching state, then completes fully under a
/// single write-lock acquisition — no partial mutation is observable.
pub struct GridLedger {
    operator: OperatorId,
    events: Arc<EventBus>,
    inner: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Edge>,
    readings: BTreeMap<ReadingId, Reading>,
    /// O(1) latest-reading pointer per node.
    latest_by_node: HashMap<NodeId, ReadingId>,
    /// Next id on the operator registration path; stays past the max id
    /// even when the replica path creates sparse nodes.
    next_node: u64,
    next_reading: u64,
}

impl GridLedger {
    pub fn new(operator: OperatorId, events: Arc<EventBus>) -> Self {
        Self {
            operator,
            events,
            inner: RwLock::new(LedgerState::default()),
        }
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    fn authorize(&self, caller: &OperatorId) -> Result<(), LedgerError> {
        if caller == &self.operator {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized)
        }
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }

    /// Register a new measurement point. Ids are dense: the N-th
    /// registration yields id N-1.
    pub fn register_node(
        &self,
        caller: &OperatorId,
        location: GeoPoint,
        name: Option<String>,
    ) -> Result<NodeId, LedgerError> {
        self.authorize(caller)?;
        let mut state = self.write_state()?;

        let id = NodeId::new(state.next_node);
        state.next_node += 1;

        let now = unix_now();
        state.nodes.insert(
            id,
            Node {
                id,
                location,
                name,
                active: true,
                registered_at: now,
                last_update: now,
            },
        );
        drop(state);

        info!(node = %id, %location, "node registered");
        self.events.emit(GridEvent::NodeRegistered { id, location });
        Ok(id)
    }

    pub fn deactivate_node(
        &self,
        caller: &OperatorId,
        id: NodeId,
    ) -> Result<(), LedgerError> {
        self.set_node_active(caller, id, false)
    }

    pub fn reactivate_node(
        &self,
        caller: &OperatorId,
        id: NodeId,
    ) -> Result<(), LedgerError> {
        self.set_node_active(caller, id, true)
    }

    fn set_node_active(
        &self,
        caller: &OperatorId,
        id: NodeId,
        active: bool,
    ) -> Result<(), LedgerError> {
        self.authorize(caller)?;
        let mut state = self.write_state()?;
        let node = state
            .nodes
            .get_mut(&id)
            .ok_or(LedgerError::NodeNotFound(id))?;
        node.active = active;
        drop(state);

        info!(node = %id, active, "node activation changed");
        self.events.emit(if active {
            GridEvent::NodeReactivated { id }
        } else {
            GridEvent::NodeDeactivated { id }
        });
        Ok(())
    }

    /// Register a transmission link. Both endpoints must exist now; they are
    /// not re-checked if a node is later deactivated.
    pub fn register_edge(
        &self,
        caller: &OperatorId,
        from: NodeId,
        to: NodeId,
        kind: EdgeKind,
        capacity: u64,
        distance: f64,
    ) -> Result<EdgeId, LedgerError> {
        self.authorize(caller)?;
        let mut state = self.write_state()?;
        if !state.nodes.contains_key(&from) {
            return Err(LedgerError::NodeNotFound(from));
        }
        if !state.nodes.contains_key(&to) {
            return Err(LedgerError::NodeNotFound(to));
        }

        let id = EdgeId::new(state.edges.len() as u64);
        state.edges.push(Edge {
            id,
            from,
            to,
            kind,
            capacity,
            distance,
            active: true,
            registered_at: unix_now(),
        });
        drop(state);

        info!(edge = %id, %from, %to, %kind, "edge registered");
        self.events.emit(GridEvent::EdgeRegistered { id, from, to });
        Ok(id)
    }

    /// Append a locally ingested reading. The id is globally monotonic
    /// across all nodes; the node's `last_update` and latest-reading pointer
    /// are maintained in the same atomic step.
    pub fn append_reading(
        &self,
        caller: &OperatorId,
        node: NodeId,
        timestamp: u64,
        kwh_milli: u64,
        location: String,
        quality: Option<u8>,
    ) -> Result<ReadingId, LedgerError> {
        self.authorize(caller)?;
        let mut state = self.write_state()?;
        if !state.nodes.contains_key(&node) {
            return Err(LedgerError::NodeNotFound(node));
        }

        let id = ReadingId::new(state.next_reading);
        state.next_reading += 1;
        Self::insert_reading(
            &mut state,
            Reading {
                id,
                node,
                timestamp,
                kwh_milli,
                location: location.clone(),
                quality,
            },
        );
        drop(state);

        debug!(reading = %id, %node, kwh_milli, "reading appended");
        self.events.emit(GridEvent::DataUpdated {
            reading: id,
            node,
            kwh_milli,
            location,
            timestamp,
            quality,
        });
        Ok(id)
    }

    /// Replica-side insertion of a reading with its source-assigned id.
    ///
    /// Returns `false` without touching state when the id is already
    /// present — a stale replay is a no-op, not an error. The referenced
    /// node must already exist (see [`GridLedger::ensure_node`]).
    pub fn apply_replicated_reading(
        &self,
        caller: &OperatorId,
        incoming: &BatchReading,
    ) -> Result<bool, LedgerError> {
        self.authorize(caller)?;
        let mut state = self.write_state()?;
        if state.readings.contains_key(&incoming.reading) {
            debug!(reading = %incoming.reading, "stale replicated reading skipped");
            return Ok(false);
        }
        if !state.nodes.contains_key(&incoming.node) {
            return Err(LedgerError::NodeNotFound(incoming.node));
        }

        state.next_reading = state.next_reading.max(incoming.reading.raw() + 1);
        Self::insert_reading(
            &mut state,
            Reading {
                id: incoming.reading,
                node: incoming.node,
                timestamp: incoming.timestamp,
                kwh_milli: incoming.kwh_milli,
                location: incoming.location.clone(),
                quality: incoming.quality,
            },
        );
        drop(state);

        debug!(reading = %incoming.reading, node = %incoming.node, "replicated reading applied");
        self.events.emit(GridEvent::DataUpdated {
            reading: incoming.reading,
            node: incoming.node,
            kwh_milli: incoming.kwh_milli,
            location: incoming.location.clone(),
            timestamp: incoming.timestamp,
            quality: incoming.quality,
        });
        Ok(true)
    }

    /// Replica-side minimal node registration at an explicit id.
    ///
    /// Returns `false` if the node already exists. The registration counter
    /// is bumped past the given id so local registrations never collide.
    pub fn ensure_node(
        &self,
        caller: &OperatorId,
        id: NodeId,
        location: GeoPoint,
    ) -> Result<bool, LedgerError> {
        self.authorize(caller)?;
        let mut state = self.write_state()?;
        if state.nodes.contains_key(&id) {
            return Ok(false);
        }

        state.next_node = state.next_node.max(id.raw() + 1);
        let now = unix_now();
        state.nodes.insert(
            id,
            Node {
                id,
                location,
                name: None,
                active: true,
                registered_at: now,
                last_update: now,
            },
        );
        drop(state);

        info!(node = %id, %location, "replica node registered");
        self.events.emit(GridEvent::NodeRegistered { id, location });
        Ok(true)
    }

    /// Shared insertion step: registry, latest pointer, node `last_update`.
    /// Replicated batches may apply out of timestamp order, so the pointer
    /// only moves forward in time.
    fn insert_reading(state: &mut LedgerState, reading: Reading) {
        let node = reading.node;
        let newer = match state.latest_by_node.get(&node) {
            Some(current) => state
                .readings
                .get(current)
                .map_or(true, |cur| reading.timestamp >= cur.timestamp),
            None => true,
        };
        if newer {
            state.latest_by_node.insert(node, reading.id);
        }
        if let Some(record) = state.nodes.get_mut(&node) {
            record.last_update = unix_now();
        }
        state.readings.insert(reading.id, reading);
    }

    // --- read surface (unrestricted) ---

    pub fn node(&self, id: NodeId) -> Result<Node, LedgerError> {
        let state = self.read_state()?;
        state
            .nodes
            .get(&id)
            .cloned()
            .ok_or(LedgerError::NodeNotFound(id))
    }

    pub fn all_nodes(&self) -> Result<Vec<Node>, LedgerError> {
        Ok(self.read_state()?.nodes.values().cloned().collect())
    }

    pub fn all_edges(&self) -> Result<Vec<Edge>, LedgerError> {
        Ok(self.read_state()?.edges.clone())
    }

    pub fn edge(&self, id: EdgeId) -> Result<Edge, LedgerError> {
        let state = self.read_state()?;
        state
            .edges
            .get(id.raw() as usize)
            .cloned()
            .ok_or(LedgerError::EdgeNotFound(id))
    }

    /// Edges where the node is either endpoint.
    pub fn node_edges(&self, node: NodeId) -> Result<Vec<Edge>, LedgerError> {
        let state = self.read_state()?;
        if !state.nodes.contains_key(&node) {
            return Err(LedgerError::NodeNotFound(node));
        }
        Ok(state
            .edges
            .iter()
            .filter(|e| e.touches(node))
            .cloned()
            .collect())
    }

    /// O(1) lookup via the latest pointer. `Ok(None)` means the node exists
    /// but has no readings yet.
    pub fn latest_reading(&self, node: NodeId) -> Result<Option<Reading>, LedgerError> {
        let state = self.read_state()?;
        if !state.nodes.contains_key(&node) {
            return Err(LedgerError::NodeNotFound(node));
        }
        Ok(state
            .latest_by_node
            .get(&node)
            .and_then(|id| state.readings.get(id))
            .cloned())
    }

    /// Readings for the node with `timestamp` in `[from, to]`, ascending by
    /// timestamp. Replica application order need not match timestamp order,
    /// so the result is explicitly sorted (stable on id).
    pub fn readings_in_range(
        &self,
        node: NodeId,
        from: u64,
        to: u64,
    ) -> Result<Vec<Reading>, LedgerError> {
        let state = self.read_state()?;
        if !state.nodes.contains_key(&node) {
            return Err(LedgerError::NodeNotFound(node));
        }
        let mut found: Vec<Reading> = state
            .readings
            .values()
            .filter(|r| r.node == node && r.timestamp >= from && r.timestamp <= to)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.timestamp);
        Ok(found)
    }

    /// Readings with id strictly greater than `after`, in id order,
    /// truncated to `limit`. The sync source's batch collection.
    pub fn readings_after(
        &self,
        after: Option<ReadingId>,
        limit: usize,
    ) -> Result<Vec<Reading>, LedgerError> {
        let state = self.read_state()?;
        let range = match after {
            Some(id) => state.readings.range(id.next()..),
            None => state.readings.range(..),
        };
        Ok(range.take(limit).map(|(_, r)| r.clone()).collect())
    }

    pub fn contains_reading(&self, id: ReadingId) -> Result<bool, LedgerError> {
        Ok(self.read_state()?.readings.contains_key(&id))
    }

    pub fn node_count(&self) -> Result<u64, LedgerError> {
        Ok(self.read_state()?.nodes.len() as u64)
    }

    pub fn edge_count(&self) -> Result<u64, LedgerError> {
        Ok(self.read_state()?.edges.len() as u64)
    }

    pub fn reading_count(&self) -> Result<u64, LedgerError> {
        Ok(self.read_state()?.readings.len() as u64)
    }

    /// `true` if the node's latest reading is at most `max_age_secs` old.
    pub fn has_recent_data(
        &self,
        node: NodeId,
        max_age_secs: u64,
    ) -> Result<bool, LedgerError> {
        match self.latest_reading(node)? {
            Some(reading) => Ok(unix_now().saturating_sub(reading.timestamp) <= max_age_secs),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridline_events::{EventFilter, EventKind};

    fn ledger() -> (OperatorId, GridLedger) {
        let operator = OperatorId::ephemeral();
        let ledger = GridLedger::new(operator, Arc::new(EventBus::default()));
        (operator, ledger)
    }

    fn geo() -> GeoPoint {
        GeoPoint::from_micro(40_712_800, -74_006_000)
    }

    fn loc() -> String {
        geo().to_string()
    }

    #[test]
    fn node_ids_are_dense_and_active() {
        let (op, ledger) = ledger();
        for expected in 0..5u64 {
            let id = ledger.register_node(&op, geo(), None).unwrap();
            assert_eq!(id, NodeId::new(expected));
        }
        for node in ledger.all_nodes().unwrap() {
            assert!(node.active);
        }
        assert_eq!(ledger.node_count().unwrap(), 5);
    }

    #[test]
    fn unauthorized_caller_is_rejected_before_state_change() {
        let (_, ledger) = ledger();
        let intruder = OperatorId::ephemeral();
        let err = ledger.register_node(&intruder, geo(), None).unwrap_err();
        assert_eq!(err, LedgerError::Unauthorized);
        assert_eq!(ledger.node_count().unwrap(), 0);
    }

    #[test]
    fn deactivation_flips_active_and_keeps_the_record() {
        let (op, ledger) = ledger();
        let id = ledger.register_node(&op, geo(), Some("plant-a".into())).unwrap();
        ledger.deactivate_node(&op, id).unwrap();
        assert!(!ledger.node(id).unwrap().active);
        ledger.reactivate_node(&op, id).unwrap();
        assert!(ledger.node(id).unwrap().active);
    }

    #[test]
    fn activation_of_unknown_node_fails() {
        let (op, ledger) = ledger();
        let err = ledger.deactivate_node(&op, NodeId::new(9)).unwrap_err();
        assert_eq!(err, LedgerError::NodeNotFound(NodeId::new(9)));
    }

    #[test]
    fn edge_requires_existing_endpoints() {
        let (op, ledger) = ledger();
        let a = ledger.register_node(&op, geo(), None).unwrap();
        let missing = NodeId::new(5);

        let err = ledger
            .register_edge(&op, a, missing, EdgeKind::HighVoltage, 1000, 3.2)
            .unwrap_err();
        assert_eq!(err, LedgerError::NodeNotFound(missing));
        let err = ledger
            .register_edge(&op, missing, a, EdgeKind::HighVoltage, 1000, 3.2)
            .unwrap_err();
        assert_eq!(err, LedgerError::NodeNotFound(missing));
        assert_eq!(ledger.edge_count().unwrap(), 0);
    }

    #[test]
    fn node_edges_returns_either_endpoint() {
        let (op, ledger) = ledger();
        let a = ledger.register_node(&op, geo(), None).unwrap();
        let b = ledger.register_node(&op, geo(), None).unwrap();
        let c = ledger.register_node(&op, geo(), None).unwrap();

        let ab = ledger
            .register_edge(&op, a, b, EdgeKind::HighVoltage, 1000, 1.0)
            .unwrap();
        let cb = ledger
            .register_edge(&op, c, b, EdgeKind::LowVoltage, 100, 2.0)
            .unwrap();

        let edges_b: Vec<EdgeId> = ledger
            .node_edges(b)
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(edges_b, vec![ab, cb]);

        let edges_a: Vec<EdgeId> = ledger
            .node_edges(a)
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(edges_a, vec![ab]);
    }

    #[test]
    fn edge_lookup_by_id() {
        let (op, ledger) = ledger();
        let a = ledger.register_node(&op, geo(), None).unwrap();
        let b = ledger.register_node(&op, geo(), None).unwrap();
        let id = ledger
            .register_edge(&op, a, b, EdgeKind::MediumVoltage, 300, 7.5)
            .unwrap();

        let edge = ledger.edge(id).unwrap();
        assert_eq!(edge.from, a);
        assert_eq!(edge.to, b);

        let err = ledger.edge(EdgeId::new(99)).unwrap_err();
        assert_eq!(err, LedgerError::EdgeNotFound(EdgeId::new(99)));
    }

    #[test]
    fn latest_pointer_tracks_appends() {
        let (op, ledger) = ledger();
        let node = ledger.register_node(&op, geo(), None).unwrap();
        assert_eq!(ledger.latest_reading(node).unwrap(), None);

        for kwh in [1500u64, 2000, 2500] {
            ledger
                .append_reading(&op, node, unix_now(), kwh, loc(), None)
                .unwrap();
        }
        let latest = ledger.latest_reading(node).unwrap().unwrap();
        assert_eq!(latest.kwh_milli, 2500);
    }

    #[test]
    fn latest_reading_of_unknown_node_is_an_error() {
        let (_, ledger) = ledger();
        let err = ledger.latest_reading(NodeId::new(0)).unwrap_err();
        assert_eq!(err, LedgerError::NodeNotFound(NodeId::new(0)));
    }

    #[test]
    fn append_to_unknown_node_is_rejected() {
        let (op, ledger) = ledger();
        let err = ledger
            .append_reading(&op, NodeId::new(0), 0, 100, loc(), None)
            .unwrap_err();
        assert_eq!(err, LedgerError::NodeNotFound(NodeId::new(0)));
        assert_eq!(ledger.reading_count().unwrap(), 0);
    }

    #[test]
    fn time_range_query_is_inclusive_and_ascending() {
        let (op, ledger) = ledger();
        let node = ledger.register_node(&op, geo(), None).unwrap();
        let t = 1_700_000_000u64;
        for offset in [0u64, 3600, 7200] {
            ledger
                .append_reading(&op, node, t + offset, 1000 + offset, loc(), None)
                .unwrap();
        }

        let found = ledger.readings_in_range(node, t, t + 10_000).unwrap();
        assert_eq!(found.len(), 3);
        let timestamps: Vec<u64> = found.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![t, t + 3600, t + 7200]);

        let partial = ledger.readings_in_range(node, t + 1, t + 3600).unwrap();
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].timestamp, t + 3600);
    }

    #[test]
    fn time_range_filters_by_node() {
        let (op, ledger) = ledger();
        let a = ledger.register_node(&op, geo(), None).unwrap();
        let b = ledger.register_node(&op, geo(), None).unwrap();
        let t = 1_700_000_000u64;
        ledger.append_reading(&op, a, t, 1, loc(), None).unwrap();
        ledger.append_reading(&op, b, t, 2, loc(), None).unwrap();

        let found = ledger.readings_in_range(a, 0, u64::MAX).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].node, a);
    }

    #[test]
    fn readings_after_respects_watermark_and_limit() {
        let (op, ledger) = ledger();
        let node = ledger.register_node(&op, geo(), None).unwrap();
        for i in 0..5u64 {
            ledger
                .append_reading(&op, node, 1_700_000_000 + i, i, loc(), None)
                .unwrap();
        }

        let all = ledger.readings_after(None, 10).unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].id, ReadingId::new(0));

        let after_1 = ledger.readings_after(Some(ReadingId::new(1)), 2).unwrap();
        let ids: Vec<ReadingId> = after_1.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![ReadingId::new(2), ReadingId::new(3)]);

        let beyond = ledger.readings_after(Some(ReadingId::new(4)), 10).unwrap();
        assert!(beyond.is_empty());
    }

    #[test]
    fn replicated_apply_is_idempotent_per_id() {
        let (op, ledger) = ledger();
        ledger.ensure_node(&op, NodeId::new(2), geo()).unwrap();
        let incoming = BatchReading {
            reading: ReadingId::new(7),
            node: NodeId::new(2),
            timestamp: 1_700_000_000,
            kwh_milli: 2500,
            location: loc(),
            quality: Some(80),
        };

        assert!(ledger.apply_replicated_reading(&op, &incoming).unwrap());
        assert!(!ledger.apply_replicated_reading(&op, &incoming).unwrap());
        assert_eq!(ledger.reading_count().unwrap(), 1);
    }

    #[test]
    fn replicated_apply_keeps_local_ids_clear() {
        let (op, ledger) = ledger();
        let node = ledger.register_node(&op, geo(), None).unwrap();
        let incoming = BatchReading {
            reading: ReadingId::new(10),
            node,
            timestamp: 1_700_000_000,
            kwh_milli: 1,
            location: loc(),
            quality: None,
        };
        ledger.apply_replicated_reading(&op, &incoming).unwrap();

        // The next local append must not collide with the applied id.
        let local = ledger
            .append_reading(&op, node, 1_700_000_001, 2, loc(), None)
            .unwrap();
        assert_eq!(local, ReadingId::new(11));
    }

    #[test]
    fn replicated_apply_out_of_order_keeps_latest_by_timestamp() {
        let (op, ledger) = ledger();
        let node = NodeId::new(0);
        ledger.ensure_node(&op, node, geo()).unwrap();

        let newer = BatchReading {
            reading: ReadingId::new(5),
            node,
            timestamp: 2_000,
            kwh_milli: 50,
            location: loc(),
            quality: None,
        };
        let older = BatchReading {
            reading: ReadingId::new(1),
            node,
            timestamp: 1_000,
            kwh_milli: 10,
            location: loc(),
            quality: None,
        };
        ledger.apply_replicated_reading(&op, &newer).unwrap();
        ledger.apply_replicated_reading(&op, &older).unwrap();

        let latest = ledger.latest_reading(node).unwrap().unwrap();
        assert_eq!(latest.id, ReadingId::new(5));

        // Range query still returns ascending timestamps.
        let found = ledger.readings_in_range(node, 0, u64::MAX).unwrap();
        let timestamps: Vec<u64> = found.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![1_000, 2_000]);
    }

    #[test]
    fn ensure_node_is_a_noop_when_present() {
        let (op, ledger) = ledger();
        let id = ledger.register_node(&op, geo(), Some("named".into())).unwrap();
        assert!(!ledger.ensure_node(&op, id, geo()).unwrap());
        // The named record is untouched.
        assert_eq!(ledger.node(id).unwrap().name.as_deref(), Some("named"));
    }

    #[test]
    fn registration_emits_events() {
        let (op, ledger) = ledger();
        let mut stream = ledger.events().subscribe(EventFilter::default());

        let id = ledger.register_node(&op, geo(), None).unwrap();
        let event = stream.try_recv().unwrap();
        assert_eq!(event.kind(), EventKind::NodeRegistered);
        assert_eq!(event.node(), Some(id));
    }

    #[test]
    fn append_emits_data_updated_with_reading_fields() {
        let (op, ledger) = ledger();
        let node = ledger.register_node(&op, geo(), None).unwrap();
        let mut stream = ledger.events().subscribe(EventFilter {
            kinds: Some(vec![EventKind::DataUpdated]),
            ..Default::default()
        });

        let t = 1_700_000_000u64;
        let id = ledger
            .append_reading(&op, node, t, 2500, loc(), Some(95))
            .unwrap();

        match stream.try_recv().unwrap() {
            GridEvent::DataUpdated {
                reading,
                node: event_node,
                kwh_milli,
                location,
                timestamp,
                quality,
            } => {
                assert_eq!(reading, id);
                assert_eq!(event_node, node);
                assert_eq!(kwh_milli, 2500);
                assert_eq!(location, "lat:40.712800,lon:-74.006000");
                assert_eq!(timestamp, t);
                assert_eq!(quality, Some(95));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn has_recent_data_uses_latest_reading() {
        let (op, ledger) = ledger();
        let node = ledger.register_node(&op, geo(), None).unwrap();
        assert!(!ledger.has_recent_data(node, 3600).unwrap());

        ledger
            .append_reading(&op, node, unix_now(), 100, loc(), None)
            .unwrap();
        assert!(ledger.has_recent_data(node, 3600).unwrap());

        let a_day_old = unix_now() - 86_400;
        let stale_node = ledger.register_node(&op, geo(), None).unwrap();
        ledger
            .append_reading(&op, stale_node, a_day_old, 100, loc(), None)
            .unwrap();
        assert!(!ledger.has_recent_data(stale_node, 3600).unwrap());
    }
}
