//! Mock enumeration backend for testing.
//!
//! The backend enumerates whatever device records its shared handle holds,
//! so tests can plug and unplug devices between rescans without hardware.

use std::sync::{Arc, Mutex};

use log::info;

use super::{DeviceData, InputDevice, MonitorBackend, MonitorError};

/// Plain-value device record served by the mock backend.
#[derive(Debug, Clone, Default)]
pub struct MockDeviceData {
    pub path: String,
    pub index: u32,
    pub name: Option<String>,
    pub vendor: Option<u16>,
    pub product: Option<u16>,
    pub guid: Option<String>,
}

impl MockDeviceData {
    pub fn new(path: impl Into<String>, index: u32) -> Self {
        Self {
            path: path.into(),
            index,
            ..Self::default()
        }
    }

    pub fn with_ids(mut self, vendor: u16, product: u16) -> Self {
        self.vendor = Some(vendor);
        self.product = Some(product);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }
}

struct MockInputDevice;

impl InputDevice for MockInputDevice {
    fn backend(&self) -> &'static str {
        "mock"
    }
}

impl DeviceData for MockDeviceData {
    fn path(&self) -> &str {
        &self.path
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn vendor(&self) -> Option<u16> {
        self.vendor
    }

    fn product(&self) -> Option<u16> {
        self.product
    }

    fn guid(&self) -> Option<String> {
        self.guid.clone()
    }

    fn open(&self) -> Result<Box<dyn InputDevice>, MonitorError> {
        info!("[MOCK BACKEND] open '{}'", self.path);
        Ok(Box::new(MockInputDevice))
    }

    fn clone_data(&self) -> Box<dyn DeviceData> {
        Box::new(self.clone())
    }
}

/// Shared handle tests use to mutate the device list between rescans.
pub type MockDeviceList = Arc<Mutex<Vec<MockDeviceData>>>;

/// Enumeration backend serving an externally controlled device list.
pub struct MockBackend {
    devices: MockDeviceList,
}

impl MockBackend {
    /// Returns the backend and the handle controlling its device list.
    pub fn new() -> (Self, MockDeviceList) {
        let devices: MockDeviceList = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                devices: Arc::clone(&devices),
            },
            devices,
        )
    }
}

impl MonitorBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn enumerate(&mut self) -> Vec<Box<dyn DeviceData>> {
        self.devices
            .lock()
            .expect("mock device list poisoned")
            .iter()
            .map(|d| d.clone_data())
            .collect()
    }
}
