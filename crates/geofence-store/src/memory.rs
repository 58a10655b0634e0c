//! In-memory catalog and state store
//!
//! Used by tests and local development. Supports injected failures and
//! artificial latency so the engine's error and concurrency paths can be
//! exercised without a database.

use async_trait::async_trait;
use geofence_domain::{
    CatalogUnavailable, DeviceState, DeviceStateStore, GeofenceCatalog, GeofenceId,
    GeofenceRegion, StoreUnavailable,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

#[derive(Debug, Clone)]
struct CatalogEntry {
    region: GeofenceRegion,
    active: bool,
}

/// Catalog + device state held in process memory
///
/// Regions are listed in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    regions: RwLock<Vec<CatalogEntry>>,
    states: RwLock<HashMap<String, DeviceState>>,
    latency: Option<Duration>,
    fail_catalog: AtomicBool,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given regions, in order
    pub fn with_regions(regions: impl IntoIterator<Item = GeofenceRegion>) -> Self {
        let store = Self::new();
        for region in regions {
            store.upsert_region(region);
        }
        store
    }

    /// Sleep for `latency` inside every trait call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Insert or replace a region; a replaced region keeps its position
    pub fn upsert_region(&self, region: GeofenceRegion) {
        let mut regions = self.regions.write().unwrap_or_else(|e| e.into_inner());
        match regions.iter_mut().find(|e| e.region.id() == region.id()) {
            Some(entry) => {
                entry.region = region;
                entry.active = true;
            }
            None => regions.push(CatalogEntry {
                region,
                active: true,
            }),
        }
    }

    /// Activate or deactivate a region; returns whether it existed
    pub fn set_region_active(&self, id: GeofenceId, active: bool) -> bool {
        let mut regions = self.regions.write().unwrap_or_else(|e| e.into_inner());
        match regions.iter_mut().find(|e| e.region.id() == id) {
            Some(entry) => {
                entry.active = active;
                true
            }
            None => false,
        }
    }

    /// Make `list_active` fail
    pub fn fail_catalog(&self, fail: bool) {
        self.fail_catalog.store(fail, Ordering::SeqCst);
    }

    /// Make `get` fail
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make `upsert` fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Peek at a device's state without going through the trait
    pub fn state(&self, device_id: &str) -> Option<DeviceState> {
        self.states
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(device_id)
            .cloned()
    }

    /// Number of successful `upsert` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl GeofenceCatalog for MemoryStore {
    async fn list_active(&self) -> Result<Vec<GeofenceRegion>, CatalogUnavailable> {
        self.delay().await;
        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(CatalogUnavailable("injected catalog failure".to_string()));
        }
        let regions = self.regions.read().unwrap_or_else(|e| e.into_inner());
        Ok(regions
            .iter()
            .filter(|e| e.active)
            .map(|e| e.region.clone())
            .collect())
    }
}

#[async_trait]
impl DeviceStateStore for MemoryStore {
    async fn get(&self, device_id: &str) -> Result<Option<DeviceState>, StoreUnavailable> {
        self.delay().await;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreUnavailable("injected read failure".to_string()));
        }
        Ok(self.state(device_id))
    }

    async fn upsert(&self, state: &DeviceState) -> Result<(), StoreUnavailable> {
        self.delay().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreUnavailable("injected write failure".to_string()));
        }
        self.states
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(state.device_id().to_string(), state.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
