//! remapd: input-processing core of a gamepad-remapping daemon
//!
//! Two halves live here. The action side turns raw gyroscope samples into
//! emulated mouse/joystick output through a capability-flagged [`Action`]
//! dispatch model. The monitor side discovers and tracks the physical
//! devices producing those samples, unifying several hardware backends
//! behind one hotplug/enumeration interface.

pub mod action;
pub mod mapper;
pub mod math;
pub mod monitor;

// Re-export commonly used items
pub use action::{Action, ActionError, ActionRegistry, Capabilities, Deadzone, Parameter};
pub use mapper::{Axis, ControllerFlags, GyroSample, HapticData, Mapper, MockMapper};
pub use monitor::{DeviceMonitor, HotplugEvent, HotplugFilter, MonitorError, MonitorWatcher};
