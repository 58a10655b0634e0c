//! Per-device serialization
//!
//! A registry of async mutexes keyed by device id. Holders of the same id run
//! one at a time; different ids never contend beyond the brief registry
//! lookup. An entry lives only while someone holds or waits for it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Registry = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Registry of per-device locks
#[derive(Debug, Clone, Default)]
pub struct DeviceLocks {
    registry: Registry,
}

impl DeviceLocks {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `device_id`
    ///
    /// The returned guard releases the lock when dropped, including when the
    /// future holding it is cancelled.
    pub async fn lock(&self, device_id: &str) -> DeviceGuard {
        let entry = {
            let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(registry.entry(device_id.to_string()).or_default())
        };
        let entry = EntryRef {
            device_id: device_id.to_string(),
            entry,
            registry: Arc::clone(&self.registry),
        };

        let guard = Arc::clone(&entry.entry).lock_owned().await;
        DeviceGuard {
            guard: Some(guard),
            _entry: entry,
        }
    }

    /// Run `f` while holding the lock for `device_id`
    pub async fn with_lock<F, Fut, T>(&self, device_id: &str, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let _guard = self.lock(device_id).await;
        f().await
    }

    /// Number of device ids currently held or awaited
    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no device lock is held or awaited
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive access to one device id
///
/// The mutex guard is released before the registry entry is pruned.
#[derive(Debug)]
pub struct DeviceGuard {
    guard: Option<OwnedMutexGuard<()>>,
    _entry: EntryRef,
}

impl DeviceGuard {
    /// Device id this guard protects
    pub fn device_id(&self) -> &str {
        &self._entry.device_id
    }
}

impl Drop for DeviceGuard {
    fn drop(&mut self) {
        self.guard.take();
    }
}

/// Counted reference to a registry entry; removes the entry when it is the last one
#[derive(Debug)]
struct EntryRef {
    device_id: String,
    entry: Arc<AsyncMutex<()>>,
    registry: Registry,
}

impl Drop for EntryRef {
    fn drop(&mut self) {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        // Registry + this reference only: nobody else holds or waits
        if registry
            .get(&self.device_id)
            .is_some_and(|entry| Arc::strong_count(entry) == 2)
        {
            registry.remove(&self.device_id);
        }
    }
}
