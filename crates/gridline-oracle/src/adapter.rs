use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use tracing::{debug, info, warn};

use gridline_codec::OracleReport;
use gridline_events::GridEvent;
use gridline_ledger::GridLedger;
use gridline_types::{unix_now, NodeId, OperatorId, ReadingId, RequestId};

use crate::client::{OracleClient, OracleRequest};
use crate::error::{OracleError, OracleResult};
use crate::request::{PendingRequest, RequestSpec, RequestState, RequestStats};

/// Outcome of a fulfillment call that completed without aborting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FulfillOutcome {
    /// The payload decoded and the reading was appended.
    Fulfilled(ReadingId),
    /// The oracle reported a failure; recorded, no reading created.
    /// Routine, not a protocol violation.
    Failed { message: String },
}

struct AdapterState {
    requests: HashMap<RequestId, PendingRequest>,
    fulfilled: u64,
    failed: u64,
}

/// Manages outstanding oracle requests and applies fulfillments to the
/// ledger. Requests are retained after they turn terminal, for audit.
pub struct OracleAdapter {
    ledger: Arc<GridLedger>,
    client: Arc<dyn OracleClient>,
    operator: OperatorId,
    inner: RwLock<AdapterState>,
}

impl OracleAdapter {
    pub fn new(
        ledger: Arc<GridLedger>,
        client: Arc<dyn OracleClient>,
        operator: OperatorId,
    ) -> Self {
        Self {
            ledger,
            client,
            operator,
            inner: RwLock::new(AdapterState {
                requests: HashMap::new(),
                fulfilled: 0,
                failed: 0,
            }),
        }
    }

    fn write_state(&self) -> OracleResult<RwLockWriteGuard<'_, AdapterState>> {
        self.inner.write().map_err(|_| OracleError::LockPoisoned)
    }

    /// Issue a data-update request for the node and hand it off to the
    /// external oracle network. Does not block on the result; the network
    /// calls back into [`OracleAdapter::fulfill`] later, if ever.
    pub async fn request_data_update(
        &self,
        caller: &OperatorId,
        node: NodeId,
        spec: RequestSpec,
    ) -> OracleResult<RequestId> {
        if caller != &self.operator {
            return Err(OracleError::Unauthorized);
        }
        // Node existence is validated before the request leaves the core.
        self.ledger.node(node)?;

        let id = RequestId::new();
        {
            let mut state = self.write_state()?;
            state.requests.insert(
                id,
                PendingRequest {
                    id,
                    node,
                    issued_at: unix_now(),
                    state: RequestState::Pending,
                },
            );
        }

        if let Err(err) = self
            .client
            .dispatch(OracleRequest {
                id,
                node,
                spec,
            })
            .await
        {
            // Hand-off failed: the request never reached the network, so
            // drop the tracking entry and surface the failure.
            self.write_state()?.requests.remove(&id);
            return Err(err);
        }

        info!(request = %id, %node, "oracle request dispatched");
        self.ledger
            .events()
            .emit(GridEvent::RequestSent {
                request_id: id,
                node,
            });
        Ok(id)
    }

    /// The single callback entry point invoked by the oracle network,
    /// asynchronously and in no particular order relative to issuance.
    ///
    /// Exactly one fulfillment (success or failure) is permitted per
    /// request id; a second attempt is rejected, not silently ignored.
    pub fn fulfill(
        &self,
        request_id: RequestId,
        response: &[u8],
        error: &[u8],
    ) -> OracleResult<FulfillOutcome> {
        let mut state = self.write_state()?;
        let node = match state.requests.get(&request_id) {
            Some(request) if !request.state.is_terminal() => request.node,
            _ => return Err(OracleError::DuplicateOrUnknownRequest(request_id)),
        };

        if !error.is_empty() {
            // The oracle itself reporting a failure is routine: record it
            // and notify, without destabilizing the request map.
            let message = String::from_utf8_lossy(error).into_owned();
            if let Some(request) = state.requests.get_mut(&request_id) {
                request.state = RequestState::Failed {
                    message: message.clone(),
                };
            }
            state.failed += 1;
            drop(state);

            warn!(request = %request_id, %message, "oracle reported failure");
            self.ledger.events().emit(GridEvent::RequestFailed {
                request_id,
                message: message.clone(),
            });
            return Ok(FulfillOutcome::Failed { message });
        }

        if response.is_empty() {
            // Neither data nor an error is a misbehaving oracle adapter:
            // abort the call whole, leaving the request pending.
            return Err(OracleError::EmptyResponse);
        }

        let report = OracleReport::decode(response)?;
        if report.node_id() != node {
            debug!(
                request = %request_id,
                expected = %node,
                reported = %report.node_id(),
                "payload node differs from requested node"
            );
        }

        // Append first: if the ledger rejects (e.g. unknown node in the
        // payload), the whole call aborts and the request stays pending.
        let reading = self.ledger.append_reading(
            &self.operator,
            report.node_id(),
            report.timestamp,
            report.kwh_milli,
            report.location_string(),
            None,
        )?;

        if let Some(request) = state.requests.get_mut(&request_id) {
            request.state = RequestState::Fulfilled;
        }
        state.fulfilled += 1;
        drop(state);

        info!(request = %request_id, %reading, "oracle request fulfilled");
        Ok(FulfillOutcome::Fulfilled(reading))
    }

    /// Audit lookup of an issued request.
    pub fn request(&self, id: RequestId) -> OracleResult<Option<PendingRequest>> {
        let state = self.inner.read().map_err(|_| OracleError::LockPoisoned)?;
        Ok(state.requests.get(&id).cloned())
    }

    pub fn stats(&self) -> OracleResult<RequestStats> {
        let state = self.inner.read().map_err(|_| OracleError::LockPoisoned)?;
        let pending = state
            .requests
            .values()
            .filter(|r| !r.state.is_terminal())
            .count() as u64;
        Ok(RequestStats {
            pending,
            fulfilled: state.fulfilled,
            failed: state.failed,
        })
    }
}
