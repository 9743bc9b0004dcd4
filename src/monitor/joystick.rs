//! Platform joystick API backend.
//!
//! Enumerates gamepads through `gilrs`, which fronts the native joystick
//! stack on each platform. Unlike the HID backend this one can report a
//! device name and an SDL-style GUID, while vendor/product identifiers are
//! only available where the platform exposes them.

use std::collections::HashMap;

use gilrs::Gilrs;
use log::{debug, warn};
use uuid::Uuid;

use super::{DeviceData, InputDevice, MonitorBackend, MonitorError};

const BACKEND_NAME: &str = "joystick";

/// Snapshot record of one connected gamepad.
#[derive(Debug, Clone)]
pub struct JoystickDeviceData {
    path: String,
    index: u32,
    name: String,
    guid: String,
    vendor: Option<u16>,
    product: Option<u16>,
}

/// Opened joystick handle.
///
/// Event delivery stays with the daemon's gilrs event loop; the handle only
/// carries identity.
pub struct JoystickInputDevice {
    path: String,
}

impl JoystickInputDevice {
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl InputDevice for JoystickInputDevice {
    fn backend(&self) -> &'static str {
        BACKEND_NAME
    }
}

impl DeviceData for JoystickDeviceData {
    fn path(&self) -> &str {
        &self.path
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn name(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn vendor(&self) -> Option<u16> {
        self.vendor
    }

    fn product(&self) -> Option<u16> {
        self.product
    }

    fn guid(&self) -> Option<String> {
        Some(self.guid.clone())
    }

    fn prop(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "guid" => Some(self.guid.clone()),
            _ => {
                warn!("Requested unknown property '{}' from '{}'", name, self.path);
                None
            }
        }
    }

    fn open(&self) -> Result<Box<dyn InputDevice>, MonitorError> {
        Ok(Box::new(JoystickInputDevice {
            path: self.path.clone(),
        }))
    }

    fn clone_data(&self) -> Box<dyn DeviceData> {
        Box::new(self.clone())
    }
}

/// `gilrs`-based enumeration backend.
pub struct JoystickBackend {
    gilrs: Gilrs,
    indices: HashMap<String, u32>,
    next_index: u32,
}

impl JoystickBackend {
    pub fn new() -> Result<Self, MonitorError> {
        let gilrs = Gilrs::new().map_err(|e| MonitorError::Backend {
            backend: BACKEND_NAME,
            reason: e.to_string(),
        })?;
        Ok(Self {
            gilrs,
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

impl MonitorBackend for JoystickBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn enumerate(&mut self) -> Vec<Box<dyn DeviceData>> {
        // Connect/disconnect only become visible after the event queue is
        // drained
        while self.gilrs.next_event().is_some() {}

        let mut records = Vec::new();
        for (id, gamepad) in self.gilrs.gamepads() {
            let uuid: Uuid = Uuid::from_bytes(gamepad.uuid());
            records.push((
                format!("gilrs:{}", id),
                gamepad.name().to_string(),
                uuid.simple().to_string(),
                gamepad.vendor_id(),
                gamepad.product_id(),
            ));
        }

        let mut out: Vec<Box<dyn DeviceData>> = Vec::new();
        for (path, name, guid, vendor, product) in records {
            let index = self.index_for(&path);
            out.push(Box::new(JoystickDeviceData {
                path,
                index,
                name,
                guid,
                vendor,
                product,
            }));
        }

        debug!("Joystick enumeration found {} device(s)", out.len());
        out
    }
}
