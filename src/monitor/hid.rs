//! HID enumeration backend.
//!
//! Wraps `hidapi` device-list enumeration behind [`MonitorBackend`]. Indices
//! are assigned per path on first sight and stay stable across rescans, so
//! index filters keep matching the same physical device.

use std::collections::HashMap;
use std::ffi::CString;

use hidapi::HidApi;
use log::{debug, warn};

use super::{DeviceData, InputDevice, MonitorBackend, MonitorError};

const BACKEND_NAME: &str = "hid";

/// Snapshot record of one enumerated HID device.
#[derive(Debug, Clone)]
pub struct HidDeviceData {
    path: CString,
    path_str: String,
    index: u32,
    vendor: u16,
    product: u16,
    product_string: Option<String>,
    serial: Option<String>,
    usage_page: u16,
    usage: u16,
    interface_number: i32,
}

/// Open HID handle. Report I/O on it belongs to the per-device driver.
pub struct HidInputDevice {
    device: hidapi::HidDevice,
}

impl HidInputDevice {
    pub fn device(&self) -> &hidapi::HidDevice {
        &self.device
    }
}

impl InputDevice for HidInputDevice {
    fn backend(&self) -> &'static str {
        BACKEND_NAME
    }
}

impl DeviceData for HidDeviceData {
    fn path(&self) -> &str {
        &self.path_str
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn name(&self) -> Option<String> {
        self.product_string.clone()
    }

    fn vendor(&self) -> Option<u16> {
        Some(self.vendor)
    }

    fn product(&self) -> Option<u16> {
        Some(self.product)
    }

    fn prop(&self, name: &str) -> Option<String> {
        match name {
            "vendor" => Some(format!("{:04x}", self.vendor)),
            "product" => Some(format!("{:04x}", self.product)),
            "serial" => self.serial.clone(),
            "product_string" => self.product_string.clone(),
            "usage_page" => Some(format!("{:04x}", self.usage_page)),
            "usage" => Some(format!("{:04x}", self.usage)),
            "interface_number" => Some(self.interface_number.to_string()),
            _ => {
                warn!("Requested unknown property '{}' from '{}'", name, self.path_str);
                None
            }
        }
    }

    fn open(&self) -> Result<Box<dyn InputDevice>, MonitorError> {
        let api = HidApi::new()?;
        let device = api.open_path(&self.path)?;
        Ok(Box::new(HidInputDevice { device }))
    }

    fn clone_data(&self) -> Box<dyn DeviceData> {
        Box::new(self.clone())
    }
}

/// `hidapi`-based enumeration backend.
pub struct HidBackend {
    api: HidApi,
    /// Stable path -> index assignment, grown on first sight.
    indices: HashMap<String, u32>,
    next_index: u32,
}

impl HidBackend {
    pub fn new() -> Result<Self, MonitorError> {
        let api = HidApi::new()?;
        Ok(Self {
            api,
            indices: HashMap::new(),
            next_index: 0,
        })
    }

    fn index_for(&mut self, path: &str) -> u32 {
        if let Some(idx) = self.indices.get(path) {
            return *idx;
        }
        let idx = self.next_index;
        self.next_index += 1;
        self.indices.insert(path.to_string(), idx);
        idx
    }
}

impl MonitorBackend for HidBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn enumerate(&mut self) -> Vec<Box<dyn DeviceData>> {
        if let Err(e) = self.api.refresh_devices() {
            warn!("HID device list refresh failed: {}", e);
            return Vec::new();
        }

        let mut out: Vec<Box<dyn DeviceData>> = Vec::new();
        let mut records = Vec::new();
        for info in self.api.device_list() {
            let path_str = info.path().to_string_lossy().to_string();
            records.push(HidDeviceData {
                path: info.path().to_owned(),
                path_str,
                index: 0,
                vendor: info.vendor_id(),
                product: info.product_id(),
                product_string: info.product_string().map(|s| s.to_string()),
                serial: info.serial_number().map(|s| s.to_string()),
                usage_page: info.usage_page(),
                usage: info.usage(),
                interface_number: info.interface_number(),
            });
        }

        for mut record in records {
            record.index = self.index_for(&record.path_str);
            out.push(Box::new(record));
        }

        debug!("HID enumeration found {} device(s)", out.len());
        out
    }
}
