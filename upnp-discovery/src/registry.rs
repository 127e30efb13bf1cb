//! Set of root devices observed so far, keyed by origin

use crate::RootDevice;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Entries {
    origins: HashSet<SocketAddr>,
    devices: Vec<Arc<RootDevice>>,
}

/// Thread-safe registry of discovered root devices with duplicate protection.
///
/// Devices are kept in discovery order. An origin is registered at most once.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    entries: RwLock<Entries>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `device` unless its origin has already been seen.
    ///
    /// The check and the insert happen under one write lock, so concurrent
    /// callers racing on the same origin get exactly one `Some`.
    pub fn register(&self, device: RootDevice) -> Option<Arc<RootDevice>> {
        let mut entries = self.entries.write();
        if !entries.origins.insert(device.origin) {
            return None;
        }

        let device = Arc::new(device);
        entries.devices.push(Arc::clone(&device));
        Some(device)
    }

    pub fn contains(&self, origin: &SocketAddr) -> bool {
        self.entries.read().origins.contains(origin)
    }

    /// All registered devices, in discovery order
    pub fn snapshot(&self) -> Vec<Arc<RootDevice>> {
        self.entries.read().devices.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
