//! Mapper boundary - the actuation surface actions write into
//!
//! Actions compute output from gyro samples and call back into a [`Mapper`]
//! to move emulated axes, the mouse, or fire haptic feedback. The concrete
//! mapper (virtual gamepad, uinput device, test double) lives outside this
//! crate; only the contract is defined here.

pub mod mock;

pub use mock::MockMapper;

use serde::{Deserialize, Serialize};

/// Lowest value an emulated stick axis can take.
pub const AXIS_MIN: i32 = -0x8000;

/// Highest value an emulated stick axis can take.
pub const AXIS_MAX: i32 = 0x7FFF;

/// Target axis of one rotation component.
///
/// Absolute axes name a stick or trigger on the emulated pad. The
/// `RelX`/`RelY` identifiers select mouse emulation instead; `Unset` leaves
/// the component unmapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    TriggerLeft,
    TriggerRight,
    RelX,
    RelY,
    Unset,
}

impl Axis {
    /// True for axes set through [`Mapper::set_axis`].
    pub fn is_absolute(self) -> bool {
        !self.is_relative() && self != Axis::Unset
    }

    /// True for the mouse-relative identifiers.
    pub fn is_relative(self) -> bool {
        matches!(self, Axis::RelX | Axis::RelY)
    }

    pub fn is_unset(self) -> bool {
        self == Axis::Unset
    }

    /// Inclusive output range of this axis.
    ///
    /// Triggers are unsigned bytes; everything else spans the full stick
    /// range. `Unset` has an empty (zero) range.
    pub fn range(self) -> (i32, i32) {
        match self {
            Axis::TriggerLeft | Axis::TriggerRight => (0, 0xFF),
            Axis::Unset => (0, 0),
            _ => (AXIS_MIN, AXIS_MAX),
        }
    }

    /// Clamps a computed value into this axis' output range.
    pub fn clamp(self, value: f64) -> i32 {
        let (lo, hi) = self.range();
        value.max(lo as f64).min(hi as f64) as i32
    }
}

/// One gyroscope sample as delivered by the controller driver.
///
/// `pitch`/`yaw`/`roll` carry angular rates for the relative action. `q`
/// carries either a raw quaternion or Euler-relative angles, depending on
/// [`ControllerFlags::EULER_GYRO`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GyroSample {
    pub pitch: i16,
    pub yaw: i16,
    pub roll: i16,
    pub q: [i16; 4],
}

impl GyroSample {
    /// Angular rates in fixed pitch, yaw, roll order.
    pub fn pyr(&self) -> [i16; 3] {
        [self.pitch, self.yaw, self.roll]
    }
}

/// Capability bits a mapper reports about the controller it drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerFlags(pub u32);

impl ControllerFlags {
    /// Controller supplies Euler-relative gyro data in the quaternion slots
    /// instead of a raw quaternion.
    pub const EULER_GYRO: ControllerFlags = ControllerFlags(1 << 0);

    pub fn contains(self, other: ControllerFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ControllerFlags {
    type Output = ControllerFlags;

    fn bitor(self, rhs: ControllerFlags) -> ControllerFlags {
        ControllerFlags(self.0 | rhs.0)
    }
}

/// Where on the controller a haptic effect plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticPosition {
    Left,
    Right,
    Both,
}

/// Parameters of one haptic feedback effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HapticData {
    pub position: HapticPosition,

    /// Effect strength, 0 to 0x8000.
    #[serde(default = "default_amplitude")]
    pub amplitude: u16,

    /// Effect frequency in Hz. Only meaningful for actuators that support it.
    #[serde(default = "default_frequency")]
    pub frequency: f32,

    /// Effect period in microseconds.
    #[serde(default)]
    pub period: u16,
}

fn default_amplitude() -> u16 {
    0x100
}

fn default_frequency() -> f32 {
    4.0
}

impl HapticData {
    pub fn new(position: HapticPosition) -> Self {
        Self {
            position,
            amplitude: default_amplitude(),
            frequency: default_frequency(),
            period: 0,
        }
    }
}

/// Actuation surface the daemon's output layer implements.
///
/// Every method is expected to be non-blocking and infallible from the
/// action's point of view; the control loop calls into actions, and actions
/// call back into the mapper, all on one thread.
pub trait Mapper {
    /// Sets an absolute axis. `value` is pre-clamped by the caller.
    fn set_axis(&mut self, axis: Axis, value: i32);

    /// Moves the emulated mouse by relative deltas.
    fn move_mouse(&mut self, dx: i32, dy: i32);

    /// Reports controller capability flags.
    fn get_flags(&self) -> ControllerFlags;

    /// Fires a haptic effect. Fire-and-forget.
    fn haptic_effect(&mut self, haptic: &HapticData);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_classification() {
        assert!(Axis::LeftX.is_absolute());
        assert!(Axis::TriggerRight.is_absolute());
        assert!(Axis::RelX.is_relative());
        assert!(!Axis::RelY.is_absolute());
        assert!(Axis::Unset.is_unset());
        assert!(!Axis::Unset.is_absolute());
    }

    #[test]
    fn axis_clamp_respects_range() {
        assert_eq!(Axis::LeftY.clamp(1e9), AXIS_MAX);
        assert_eq!(Axis::LeftY.clamp(-1e9), AXIS_MIN);
        assert_eq!(Axis::TriggerLeft.clamp(-5.0), 0);
        assert_eq!(Axis::TriggerLeft.clamp(300.0), 0xFF);
        assert_eq!(Axis::RightX.clamp(1234.0), 1234);
    }

    #[test]
    fn flags_contains() {
        let flags = ControllerFlags::EULER_GYRO | ControllerFlags(1 << 4);
        assert!(flags.contains(ControllerFlags::EULER_GYRO));
        assert!(!ControllerFlags::default().contains(ControllerFlags::EULER_GYRO));
    }
}
