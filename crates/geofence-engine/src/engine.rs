//! Core transition engine

use crate::{DeviceGuard, DeviceLocks, EngineError, EngineMetrics};
use geofence_domain::time::now_millis;
use geofence_domain::{
    BoundaryEvent, ContainmentTester, DeviceState, DeviceStateStore, EventSink, GeofenceCatalog,
    GeofenceRegion, LocationReport, StoreUnavailable, TransitionKind, TransitionResult,
};
use std::sync::Arc;

/// Evaluates location reports and maintains per-device containment state
///
/// Collaborators are injected at construction; the engine holds no global
/// state. Evaluations for the same device id are serialized, evaluations for
/// different ids run concurrently.
pub struct TransitionEngine {
    catalog: Arc<dyn GeofenceCatalog>,
    states: Arc<dyn DeviceStateStore>,
    sink: Arc<dyn EventSink>,
    tester: ContainmentTester,
    locks: DeviceLocks,
    metrics: EngineMetrics,
    clock: fn() -> u64,
}

impl TransitionEngine {
    /// Create an engine over the given catalog, state store and event sink
    pub fn new(
        catalog: Arc<dyn GeofenceCatalog>,
        states: Arc<dyn DeviceStateStore>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            catalog,
            states,
            sink,
            tester: ContainmentTester::new(),
            locks: DeviceLocks::new(),
            metrics: EngineMetrics::new(),
            clock: now_millis,
        }
    }

    /// Replace the wall clock (milliseconds since Unix epoch)
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    /// Counters for this engine
    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Per-device lock registry (exposed for observability)
    pub fn locks(&self) -> &DeviceLocks {
        &self.locks
    }

    /// Evaluate one report
    ///
    /// Reads the catalog and prior state, tests containment, publishes an
    /// exit event if the device left every region, then persists the new
    /// state. The whole sequence holds the device's lock.
    ///
    /// # Cancellation
    ///
    /// Dropping the future before the state write starts releases the lock
    /// and writes nothing. Once the write has started it runs to completion
    /// in its own task, which keeps the lock until the store answers. A later
    /// evaluation of the same device therefore never overlaps it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EvaluationFailed`] if the catalog, the state
    /// store or the event sink fails. Nothing after the failing step runs.
    pub async fn evaluate(&self, report: &LocationReport) -> Result<TransitionResult, EngineError> {
        let guard = self.locks.lock(report.device_id()).await;

        match self.evaluate_locked(report, guard).await {
            Ok(result) => {
                self.metrics.record_evaluation(result.state_changed);
                Ok(result)
            }
            Err(e) => {
                self.metrics.record_failure();
                tracing::warn!("{}", e);
                Err(e)
            }
        }
    }

    async fn evaluate_locked(
        &self,
        report: &LocationReport,
        guard: DeviceGuard,
    ) -> Result<TransitionResult, EngineError> {
        let device_id = report.device_id();
        let location = report.location();

        let regions = self
            .catalog
            .list_active()
            .await
            .map_err(|e| EngineError::failed(device_id, e))?;

        let prior = self
            .states
            .get(device_id)
            .await
            .map_err(|e| EngineError::failed(device_id, e))?;

        let containing = self.tester.find_containing(location, &regions);
        let inside = containing.is_some();
        let transition = TransitionKind::between(prior.as_ref().map(|s| s.inside()), inside);
        let now = (self.clock)();

        tracing::debug!(
            "Device {} at ({}, {}): {} ({} regions checked)",
            device_id,
            location.latitude(),
            location.longitude(),
            transition.as_str(),
            regions.len()
        );

        if transition.publishes_event() {
            let vacated = prior
                .as_ref()
                .and_then(|state| state.geofence_id())
                .and_then(|id| regions.iter().find(|region| region.id() == id))
                .map(|region| region.name().to_string());

            let event = BoundaryEvent::exit(device_id, location, vacated, now);
            self.sink
                .publish(&event)
                .await
                .map_err(|e| EngineError::failed(device_id, e))?;
            self.metrics.record_exit();

            tracing::info!(
                "Device {} exited {} (event {})",
                device_id,
                event.geofence_name.as_deref().unwrap_or("<unknown geofence>"),
                event.event_id
            );
        }

        let state = DeviceState::new(device_id, location, containing.map(GeofenceRegion::id), now);
        self.persist(state, guard)
            .await
            .map_err(|e| EngineError::failed(device_id, e))?;

        Ok(TransitionResult {
            device_id: device_id.to_string(),
            inside,
            geofence_name: containing.map(|region| region.name().to_string()),
            state_changed: transition.state_changed(),
        })
    }

    /// Write `state` from a detached task that owns the device lock
    async fn persist(&self, state: DeviceState, guard: DeviceGuard) -> Result<(), StoreUnavailable> {
        let states = Arc::clone(&self.states);
        let write = tokio::spawn(async move {
            let result = states.upsert(&state).await;
            drop(guard);
            result
        });

        write
            .await
            .map_err(|e| StoreUnavailable(format!("state write task failed: {}", e)))?
    }
}
