//! Device monitor - cross-backend device registry and hotplug machinery
//!
//! The monitor owns the registry of known input devices and dispatches
//! rescans to whichever enumeration backends are compiled in. Each rescan
//! diffs the fresh snapshot against the registry; callers observe the diff
//! as added/removed hotplug events. Hotplug filters select specific devices
//! by vendor, product, index, name or GUID.

#[cfg(feature = "hid")]
pub mod hid;
#[cfg(feature = "joystick")]
pub mod joystick;
pub mod mock;
pub mod watcher;

pub use mock::{MockBackend, MockDeviceData};
pub use watcher::MonitorWatcher;

#[cfg(not(any(feature = "hid", feature = "joystick")))]
compile_error!("at least one device backend feature has to be enabled: 'hid' or 'joystick'");

use std::collections::HashMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Device-monitor operation errors.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("backend '{backend}' failed: {reason}")]
    Backend {
        backend: &'static str,
        reason: String,
    },

    #[error("failed to open device '{0}'")]
    OpenFailed(String),

    #[cfg(feature = "hid")]
    #[error(transparent)]
    Hid(#[from] hidapi::HidError),
}

/// Live device handle returned by [`DeviceData::open`].
///
/// Actual I/O on the handle is the concern of the per-device driver, not the
/// monitor.
pub trait InputDevice: Send {
    /// Name of the backend that produced this handle.
    fn backend(&self) -> &'static str;
}

/// Per-device record exposed by enumeration backends.
///
/// Records are value-like: [`clone_data`](DeviceData::clone_data) produces an
/// independent copy safe to pass across ownership boundaries, while the
/// originals stay exclusively owned by the monitor registry.
pub trait DeviceData: Send {
    /// Backend-native opaque path; unique within the backend.
    fn path(&self) -> &str;

    /// Stable numeric index within the backend.
    fn index(&self) -> u32;

    /// Human-readable device name, when the backend can report one.
    fn name(&self) -> Option<String> {
        None
    }

    fn vendor(&self) -> Option<u16> {
        None
    }

    fn product(&self) -> Option<u16> {
        None
    }

    /// SDL-style GUID string, when the backend has one.
    fn guid(&self) -> Option<String> {
        None
    }

    /// Named string property. A miss logs a warning and returns `None`.
    fn prop(&self, name: &str) -> Option<String> {
        warn!("Requested unknown property '{}' from device '{}'", name, self.path());
        None
    }

    /// Opens a live handle for I/O.
    fn open(&self) -> Result<Box<dyn InputDevice>, MonitorError>;

    /// Independent value copy of this record.
    fn clone_data(&self) -> Box<dyn DeviceData>;
}

/// Discovery state of one registry entry across rescans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Seen this scan, absent last scan.
    New,
    /// Seen in two consecutive scans.
    Known,
    /// Absent this scan after being seen; evicted at the end of the rescan.
    Removed,
}

/// Hotplug transition observed by a rescan.
pub enum HotplugEvent {
    Added(Box<dyn DeviceData>),
    Removed(Box<dyn DeviceData>),
}

impl std::fmt::Debug for HotplugEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HotplugEvent::Added(d) => write!(f, "Added({})", d.path()),
            HotplugEvent::Removed(d) => write!(f, "Removed({})", d.path()),
        }
    }
}

/// Predicate selecting a device from the registry. Exactly one criterion per
/// filter instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotplugFilter {
    Vendor(u16),
    Product(u16),
    Index(u32),
    Name(String),
    Guid(String),
}

/// One device enumeration backend.
///
/// `enumerate` returns a complete snapshot of currently connected devices;
/// the monitor does the diffing.
pub trait MonitorBackend: Send {
    fn name(&self) -> &'static str;

    fn enumerate(&mut self) -> Vec<Box<dyn DeviceData>>;
}

struct RegistryEntry {
    data: Box<dyn DeviceData>,
    state: DeviceState,
    seen: bool,
}

/// Cross-backend device registry with hotplug diffing.
///
/// One instance per process; the registry and any backend bookkeeping live
/// in the instance, created by [`new`](DeviceMonitor::new) and torn down by
/// [`close`](DeviceMonitor::close) (or drop). Rescans take `&mut self`, so a
/// rescan can never run concurrently with itself.
pub struct DeviceMonitor {
    backends: Vec<Box<dyn MonitorBackend>>,
    registry: HashMap<String, RegistryEntry>,
}

impl DeviceMonitor {
    /// Monitor with no backends attached yet.
    pub fn new() -> Self {
        info!("Device monitor initialized");
        Self {
            backends: Vec::new(),
            registry: HashMap::new(),
        }
    }

    /// Monitor with every compiled-in hardware backend attached, in fixed
    /// rescan order.
    pub fn with_default_backends() -> Result<Self, MonitorError> {
        let mut monitor = Self::new();

        #[cfg(feature = "hid")]
        monitor.add_backend(Box::new(hid::HidBackend::new()?));

        #[cfg(feature = "joystick")]
        monitor.add_backend(Box::new(joystick::JoystickBackend::new()?));

        Ok(monitor)
    }

    /// Appends a backend. Rescan order is insertion order.
    pub fn add_backend(&mut self, backend: Box<dyn MonitorBackend>) {
        info!("Attached device backend '{}'", backend.name());
        self.backends.push(backend);
    }

    /// Tears the monitor down, dropping registry and backend state.
    pub fn close(self) {
        info!("Device monitor closed ({} device(s) tracked)", self.registry.len());
    }

    /// Evaluates one filter against one device record.
    ///
    /// A filter asking for a field the device's backend cannot report (for
    /// example a vendor filter against a backend with no vendor concept)
    /// returns false rather than erroring.
    pub fn test_filter(device: &dyn DeviceData, filter: &HotplugFilter) -> bool {
        match filter {
            HotplugFilter::Vendor(vendor) => device.vendor() == Some(*vendor),
            HotplugFilter::Product(product) => device.product() == Some(*product),
            HotplugFilter::Index(idx) => device.index() == *idx,
            HotplugFilter::Name(name) => device.name().as_deref() == Some(name.as_str()),
            HotplugFilter::Guid(guid) => device.guid().as_deref() == Some(guid.as_str()),
        }
    }

    /// Runs enumeration on every backend in order and diffs the result
    /// against the registry, returning the observed hotplug transitions.
    pub fn rescan(&mut self) -> Vec<HotplugEvent> {
        let mut events = Vec::new();

        for entry in self.registry.values_mut() {
            entry.seen = false;
        }

        for backend in &mut self.backends {
            let backend_name = backend.name();
            for data in backend.enumerate() {
                let key = format!("{}:{}", backend_name, data.path());
                match self.registry.get_mut(&key) {
                    Some(entry) => {
                        if entry.state == DeviceState::New {
                            entry.state = DeviceState::Known;
                        }
                        entry.data = data;
                        entry.seen = true;
                    }
                    None => {
                        debug!("Device added: {}", key);
                        events.push(HotplugEvent::Added(data.clone_data()));
                        self.registry.insert(
                            key,
                            RegistryEntry {
                                data,
                                state: DeviceState::New,
                                seen: true,
                            },
                        );
                    }
                }
            }
        }

        self.registry.retain(|key, entry| {
            if entry.seen {
                true
            } else {
                debug!("Device removed: {}", key);
                entry.state = DeviceState::Removed;
                events.push(HotplugEvent::Removed(entry.data.clone_data()));
                false
            }
        });

        events
    }

    /// Currently tracked device records.
    pub fn devices(&self) -> impl Iterator<Item = &dyn DeviceData> {
        self.registry.values().map(|e| e.data.as_ref())
    }

    /// First tracked device matching `filter`.
    pub fn find_device(&self, filter: &HotplugFilter) -> Option<&dyn DeviceData> {
        self.devices().find(|d| Self::test_filter(*d, filter))
    }

    /// Discovery state of the device registered under `path` for `backend`.
    pub fn device_state(&self, backend: &str, path: &str) -> Option<DeviceState> {
        self.registry
            .get(&format!("{}:{}", backend, path))
            .map(|e| e.state)
    }

    pub fn device_count(&self) -> usize {
        self.registry.len()
    }
}

impl Default for DeviceMonitor {
    fn default() -> Self {
        Self::new()
    }
}
