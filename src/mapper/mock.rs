//! Mock mapper for testing.
//!
//! This mapper logs every actuation call instead of driving a real output
//! device, and records them so tests can assert on what an action produced.

use log::info;

use super::{Axis, ControllerFlags, HapticData, Mapper};

/// Mock mapper that logs and records actuation calls.
#[derive(Debug, Default)]
pub struct MockMapper {
    /// Flags reported to actions via [`Mapper::get_flags`].
    pub flags: ControllerFlags,

    /// Every `set_axis` call, in order.
    pub axis_writes: Vec<(Axis, i32)>,

    /// Every `move_mouse` call, in order.
    pub mouse_moves: Vec<(i32, i32)>,

    /// Number of haptic effects fired.
    pub haptic_fired: usize,
}

impl MockMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock mapper whose controller reports Euler-relative gyro data.
    pub fn with_flags(flags: ControllerFlags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    /// Last value written to `axis`, if any.
    pub fn last_axis(&self, axis: Axis) -> Option<i32> {
        self.axis_writes
            .iter()
            .rev()
            .find(|(a, _)| *a == axis)
            .map(|(_, v)| *v)
    }

    /// Forgets all recorded calls.
    pub fn clear(&mut self) {
        self.axis_writes.clear();
        self.mouse_moves.clear();
        self.haptic_fired = 0;
    }
}

impl Mapper for MockMapper {
    fn set_axis(&mut self, axis: Axis, value: i32) {
        info!("[MOCK MAPPER] set_axis {:?} = {}", axis, value);
        self.axis_writes.push((axis, value));
    }

    fn move_mouse(&mut self, dx: i32, dy: i32) {
        info!("[MOCK MAPPER] move_mouse dx={}, dy={}", dx, dy);
        self.mouse_moves.push((dx, dy));
    }

    fn get_flags(&self) -> ControllerFlags {
        self.flags
    }

    fn haptic_effect(&mut self, haptic: &HapticData) {
        info!("[MOCK MAPPER] haptic_effect {:?}", haptic);
        self.haptic_fired += 1;
    }
}
