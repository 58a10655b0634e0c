//! Geofence Storage Layer
//!
//! Implements the `GeofenceCatalog` and `DeviceStateStore` traits using SQLite.
//!
//! # Architecture
//!
//! - SQLite for the region catalog and the per-device state table
//! - One connection behind a mutex; every async trait call runs the query on
//!   the blocking pool so the runtime's worker threads never wait on disk
//! - [`MemoryStore`] offers the same traits without a database, with failure
//!   injection for exercising error paths
//!
//! # Examples
//!
//! ```no_run
//! use geofence_store::SqliteStore;
//!
//! let store = SqliteStore::open("geofence.db").unwrap();
//! // Store is now ready to serve the transition engine
//! ```

#![warn(missing_docs)]

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use geofence_domain::time::now_millis;
use geofence_domain::{
    CatalogUnavailable, DeviceState, DeviceStateStore, GeoPoint, GeofenceCatalog, GeofenceId,
    GeofenceRegion, StoreUnavailable,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Connection mutex poisoned by a panicking holder
    #[error("Connection lock poisoned")]
    Poisoned,

    /// Blocking task failed to complete
    #[error("Blocking task failed: {0}")]
    Join(String),
}

impl From<StoreError> for CatalogUnavailable {
    fn from(e: StoreError) -> Self {
        CatalogUnavailable(e.to_string())
    }
}

impl From<StoreError> for StoreUnavailable {
    fn from(e: StoreError) -> Self {
        StoreUnavailable(e.to_string())
    }
}

/// SQLite-based implementation of the catalog and device state store
///
/// # Thread Safety
///
/// The single connection is serialized behind a mutex. Cloning the store
/// shares that connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database at the given path and apply the schema
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert or replace a catalog region (administrative seeding only)
    ///
    /// The region becomes active.
    pub fn upsert_region(&self, region: &GeofenceRegion) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO geofences (id, name, center_lat, center_lon, radius_km, active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)
             ON CONFLICT(id) DO UPDATE SET
             name = excluded.name, center_lat = excluded.center_lat,
             center_lon = excluded.center_lon, radius_km = excluded.radius_km, active = 1",
            params![
                region.id().value(),
                region.name(),
                region.center().latitude(),
                region.center().longitude(),
                region.radius_km(),
                now_millis() as i64,
            ],
        )?;
        Ok(())
    }

    /// Activate or deactivate a region; returns whether it existed
    pub fn set_region_active(&self, id: GeofenceId, active: bool) -> Result<bool, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let changed = conn.execute(
            "UPDATE geofences SET active = ?2 WHERE id = ?1",
            params![id.value(), active],
        )?;
        Ok(changed > 0)
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Join(e.to_string()))?
    }

    fn read_regions(conn: &Connection) -> Result<Vec<GeofenceRegion>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT id, name, center_lat, center_lon, radius_km
             FROM geofences WHERE active = 1 ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut regions = Vec::with_capacity(rows.len());
        for (id, name, lat, lon, radius_km) in rows {
            let region = GeoPoint::new(lat, lon)
                .and_then(|center| GeofenceRegion::new(GeofenceId::new(id), name, center, radius_km));
            match region {
                Ok(region) => regions.push(region),
                Err(e) => tracing::warn!("Skipping malformed geofence {}: {}", id, e),
            }
        }
        Ok(regions)
    }

    fn read_state(conn: &Connection, device_id: &str) -> Result<Option<DeviceState>, StoreError> {
        let row = conn
            .query_row(
                "SELECT device_id, last_lat, last_lon, last_geofence_id, last_updated
                 FROM device_states WHERE device_id = ?1",
                params![device_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, Option<i64>>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((device_id, lat, lon, geofence_id, last_updated)) = row else {
            return Ok(None);
        };

        let location = GeoPoint::new(lat, lon).map_err(|e| {
            StoreError::InvalidData(format!("device {} has bad coordinates: {}", device_id, e))
        })?;

        // is_inside_fence is written for external readers; the region id is authoritative
        Ok(Some(DeviceState::new(
            device_id,
            location,
            geofence_id.map(GeofenceId::new),
            last_updated.max(0) as u64,
        )))
    }

    fn write_state(conn: &Connection, state: &DeviceState) -> Result<(), StoreError> {
        conn.execute(
            "INSERT INTO device_states
             (device_id, last_lat, last_lon, is_inside_fence, last_geofence_id, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(device_id) DO UPDATE SET
             last_lat = excluded.last_lat,
             last_lon = excluded.last_lon,
             is_inside_fence = excluded.is_inside_fence,
             last_geofence_id = excluded.last_geofence_id,
             last_updated = excluded.last_updated",
            params![
                state.device_id(),
                state.location().latitude(),
                state.location().longitude(),
                state.inside(),
                state.geofence_id().map(|id| id.value()),
                state.last_updated_ms() as i64,
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl GeofenceCatalog for SqliteStore {
    async fn list_active(&self) -> Result<Vec<GeofenceRegion>, CatalogUnavailable> {
        Ok(self.with_conn(Self::read_regions).await?)
    }
}

#[async_trait]
impl DeviceStateStore for SqliteStore {
    async fn get(&self, device_id: &str) -> Result<Option<DeviceState>, StoreUnavailable> {
        let device_id = device_id.to_string();
        Ok(self
            .with_conn(move |conn| Self::read_state(conn, &device_id))
            .await?)
    }

    async fn upsert(&self, state: &DeviceState) -> Result<(), StoreUnavailable> {
        let state = state.clone();
        Ok(self
            .with_conn(move |conn| Self::write_state(conn, &state))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: i64, name: &str, radius_km: f64) -> GeofenceRegion {
        GeofenceRegion::new(
            GeofenceId::new(id),
            name,
            GeoPoint::new(40.7831, -73.9712).unwrap(),
            radius_km,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_catalog_ordered_by_id() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_region(&region(3, "Third", 1.0)).unwrap();
        store.upsert_region(&region(1, "First", 1.0)).unwrap();
        store.upsert_region(&region(2, "Second", 1.0)).unwrap();

        let names: Vec<_> = store
            .list_active()
            .await
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_inactive_regions_hidden() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_region(&region(1, "Park", 1.0)).unwrap();
        assert!(store.set_region_active(GeofenceId::new(1), false).unwrap());
        assert!(!store.set_region_active(GeofenceId::new(99), false).unwrap());
        assert!(store.list_active().await.unwrap().is_empty());

        // Re-seeding reactivates
        store.upsert_region(&region(1, "Park", 1.0)).unwrap();
        assert_eq!(store.list_active().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_rows_skipped() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_region(&region(1, "Good", 1.0)).unwrap();
        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO geofences (id, name, center_lat, center_lon, radius_km, active, created_at)
                 VALUES (2, 'Bad', 10.0, 10.0, 0.0, 1, 0)",
                [],
            )
            .unwrap();
        }

        let regions = store.list_active().await.unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name(), "Good");
    }

    #[tokio::test]
    async fn test_state_missing_then_upserted() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get("unknown").await.unwrap().is_none());

        let p = GeoPoint::new(41.0, -74.0).unwrap();
        let state = DeviceState::new("d1", p, Some(GeofenceId::new(5)), 1234);
        store.upsert(&state).await.unwrap();
        assert_eq!(store.get("d1").await.unwrap(), Some(state));

        let moved = DeviceState::new("d1", GeoPoint::new(0.0, 0.0).unwrap(), None, 5678);
        store.upsert(&moved).await.unwrap();
        assert_eq!(store.get("d1").await.unwrap(), Some(moved));
    }
}
