//! Gyro and GyroAbs actions
//!
//! `gyro` feeds *relative* gyroscope rates into emulated axes. `gyroabs`
//! tracks absolute rotation against a latched reference orientation and sets
//! axis position (or moves the mouse) from it.

use std::sync::Arc;

use log::warn;

use crate::mapper::{Axis, GyroSample, HapticData, Mapper, AXIS_MAX, AXIS_MIN, ControllerFlags};
use crate::math::{angle_diff, quat_to_euler};

use super::params::{ParamKind, ParamSchema, ParamSpec, Parameter};
use super::{Action, ActionError, Capabilities, Deadzone};

pub const KW_GYRO: &str = "gyro";
pub const KW_GYROABS: &str = "gyroabs";

/// Radians to axis units: (2^15) / PI.
const RAD_TO_AXIS: f64 = 10430.378350470453;

/// Scale applied to relative rates. Negative, to flip device-reported
/// rotation into output-axis convention.
const RELATIVE_SCALE: f64 = -10.0;

/// Puts default mouse sensitivity into a sane range.
const MOUSE_FACTOR: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GyroMode {
    Relative,
    Absolute,
}

/// Concrete action behind both the `gyro` and `gyroabs` keywords.
pub struct GyroAction {
    mode: GyroMode,
    axes: [Axis; 3],
    sensitivity: [f64; 3],
    /// Latched reference orientation, one slot per component.
    ir: [f64; 4],
    was_out_of_range: bool,
    deadzone: Option<Arc<Deadzone>>,
    haptic: Option<HapticData>,
}

impl GyroAction {
    /// Parameter schema shared by both keywords: one required target axis,
    /// two optional ones defaulting to unset.
    pub fn schema() -> ParamSchema {
        ParamSchema::new(vec![
            ParamSpec::required(ParamKind::Axis),
            ParamSpec::optional(ParamKind::Axis, Parameter::Axis(Axis::Unset)),
            ParamSpec::optional(ParamKind::Axis, Parameter::Axis(Axis::Unset)),
        ])
    }

    /// Constructor registered for both keywords.
    pub fn construct(
        keyword: &str,
        params: Vec<Parameter>,
    ) -> Result<Box<dyn Action>, ActionError> {
        let params = Self::schema().check_and_fill(keyword, params)?;

        let mode = match keyword {
            KW_GYRO => GyroMode::Relative,
            KW_GYROABS => GyroMode::Absolute,
            other => return Err(ActionError::UnknownKeyword(other.to_string())),
        };

        let mut axes = [Axis::Unset; 3];
        for (slot, param) in axes.iter_mut().zip(params.iter()) {
            // Schema already guaranteed the type
            *slot = param.as_axis().expect("schema-checked axis parameter");
        }

        Ok(Box::new(GyroAction {
            mode,
            axes,
            sensitivity: [1.0; 3],
            ir: [0.0; 4],
            was_out_of_range: false,
            deadzone: None,
            haptic: None,
        }))
    }

    /// Relative variant: rate * sensitivity, clamped onto absolute axes.
    /// Mouse emulation happens purely through axis identifiers the mapper
    /// interprets, so relative axes are never written here.
    fn gyro_relative(&self, mapper: &mut dyn Mapper, sample: &GyroSample) {
        let pyr = sample.pyr();
        for i in 0..3 {
            let axis = self.axes[i];
            if !axis.is_absolute() {
                continue;
            }
            let v = pyr[i] as f64 * self.sensitivity[i] * RELATIVE_SCALE;
            mapper.set_axis(axis, v.max(AXIS_MIN as f64).min(AXIS_MAX as f64) as i32);
        }
    }

    /// Absolute variant: angle difference against the latched reference.
    fn gyro_absolute(&mut self, mapper: &mut dyn Mapper, sample: &GyroSample) {
        let mut pyr = if mapper.get_flags().contains(ControllerFlags::EULER_GYRO) {
            [
                sample.q[0] as f64 / RAD_TO_AXIS,
                sample.q[1] as f64 / RAD_TO_AXIS,
                sample.q[2] as f64 / RAD_TO_AXIS,
            ]
        } else {
            quat_to_euler(
                sample.q[0] as f64 / 32768.0,
                sample.q[1] as f64 / 32768.0,
                sample.q[2] as f64 / 32768.0,
                sample.q[3] as f64 / 32768.0,
            )
        };

        for i in 0..3 {
            // A zero reference latches the current angle; a nonzero one is kept
            if self.ir[i] == 0.0 {
                self.ir[i] = pyr[i];
            }
            pyr[i] = angle_diff(self.ir[i], pyr[i]) * self.sensitivity[i] * RAD_TO_AXIS * 2.0;
        }

        if self.haptic.is_some() {
            let mut out_of_range = false;
            for v in pyr.iter_mut() {
                *v = v.floor();
                if *v > AXIS_MAX as f64 {
                    *v = AXIS_MAX as f64;
                    out_of_range = true;
                } else if *v < AXIS_MIN as f64 {
                    *v = AXIS_MIN as f64;
                    out_of_range = true;
                }
            }
            if out_of_range {
                if !self.was_out_of_range {
                    if let Some(haptic) = &self.haptic {
                        mapper.haptic_effect(haptic);
                    }
                    self.was_out_of_range = true;
                }
            } else {
                self.was_out_of_range = false;
            }
        } else {
            for v in pyr.iter_mut() {
                *v = v.max(AXIS_MIN as f64).min(AXIS_MAX as f64);
            }
        }

        for i in 0..3 {
            let axis = self.axes[i];
            match axis {
                Axis::RelX => {
                    let dx = axis.clamp(pyr[i] * MOUSE_FACTOR * self.sensitivity[i]);
                    mapper.move_mouse(dx, 0);
                }
                Axis::RelY => {
                    let dy = axis.clamp(pyr[i] * MOUSE_FACTOR * self.sensitivity[i]);
                    mapper.move_mouse(0, dy);
                }
                Axis::Unset => {}
                _ => {
                    let mut val = axis.clamp(pyr[i] * self.sensitivity[i]);
                    if let Some(deadzone) = &self.deadzone {
                        val = deadzone.apply(val);
                    }
                    mapper.set_axis(axis, val);
                }
            }
        }
    }
}

impl Action for GyroAction {
    fn keyword(&self) -> &'static str {
        match self.mode {
            GyroMode::Relative => KW_GYRO,
            GyroMode::Absolute => KW_GYROABS,
        }
    }

    fn capabilities(&self) -> Capabilities {
        let caps = Capabilities::GYRO
            | Capabilities::DESCRIBE
            | Capabilities::PROPERTIES
            | Capabilities::SENSITIVITY
            | Capabilities::SENSITIVITY_Z
            | Capabilities::HAPTIC;
        match self.mode {
            GyroMode::Relative => caps,
            GyroMode::Absolute => caps | Capabilities::DEADZONE,
        }
    }

    fn gyro(&mut self, mapper: &mut dyn Mapper, sample: &GyroSample) {
        match self.mode {
            GyroMode::Relative => self.gyro_relative(mapper, sample),
            GyroMode::Absolute => self.gyro_absolute(mapper, sample),
        }
    }

    fn describe(&self) -> String {
        if self.axes[0].is_relative() {
            return "Mouse".to_string();
        }
        self.axes
            .iter()
            .map(|a| format!("{:?}", a))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn get_property(&self, name: &str) -> Option<Parameter> {
        match name {
            "sensitivity" => Some(Parameter::Tuple(
                self.sensitivity.iter().map(|s| Parameter::Float(*s)).collect(),
            )),
            "axes" => Some(Parameter::Tuple(
                self.axes.iter().map(|a| Parameter::Axis(*a)).collect(),
            )),
            "haptic" => self.haptic.map(|h| {
                Parameter::Tuple(vec![
                    Parameter::Int(h.amplitude as i64),
                    Parameter::Float(h.frequency as f64),
                    Parameter::Int(h.period as i64),
                ])
            }),
            _ => {
                warn!("Requested unknown property '{}' from '{}'", name, self.keyword());
                None
            }
        }
    }

    fn set_sensitivity(&mut self, x: f64, y: f64, z: f64) {
        self.sensitivity = [x, y, z];
    }

    fn set_haptic(&mut self, haptic: Option<HapticData>) {
        self.haptic = haptic;
    }

    fn set_deadzone(&mut self, deadzone: Arc<Deadzone>) {
        self.deadzone = Some(deadzone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::MockMapper;

    fn relative(axes: [Axis; 3]) -> Box<dyn Action> {
        GyroAction::construct(KW_GYRO, axes.iter().map(|a| Parameter::Axis(*a)).collect())
            .unwrap()
    }

    #[test]
    fn relative_scales_and_flips_sign() {
        let mut action = relative([Axis::LeftX, Axis::Unset, Axis::Unset]);
        let mut mapper = MockMapper::new();
        let sample = GyroSample {
            pitch: 100,
            ..GyroSample::default()
        };
        action.gyro(&mut mapper, &sample);
        assert_eq!(mapper.last_axis(Axis::LeftX), Some(-1000));
    }

    #[test]
    fn relative_clamps_to_axis_range() {
        let mut action = relative([Axis::LeftX, Axis::Unset, Axis::Unset]);
        let mut mapper = MockMapper::new();
        let sample = GyroSample {
            pitch: -30000,
            ..GyroSample::default()
        };
        action.gyro(&mut mapper, &sample);
        assert_eq!(mapper.last_axis(Axis::LeftX), Some(AXIS_MAX));
    }

    #[test]
    fn relative_ignores_unset_and_relative_axes() {
        let mut action = relative([Axis::Unset, Axis::RelX, Axis::Unset]);
        let mut mapper = MockMapper::new();
        let sample = GyroSample {
            pitch: 100,
            yaw: 100,
            roll: 100,
            ..GyroSample::default()
        };
        action.gyro(&mut mapper, &sample);
        assert!(mapper.axis_writes.is_empty());
        assert!(mapper.mouse_moves.is_empty());
    }

    #[test]
    fn capability_masks_differ_per_variant() {
        let rel = relative([Axis::LeftX, Axis::Unset, Axis::Unset]);
        let abs = GyroAction::construct(KW_GYROABS, vec![Parameter::Axis(Axis::LeftX)]).unwrap();
        assert!(!rel.capabilities().contains(Capabilities::DEADZONE));
        assert!(abs.capabilities().contains(Capabilities::DEADZONE));
        assert!(abs.capabilities().contains(Capabilities::SENSITIVITY_Z));
    }

    #[test]
    fn describe_mouse_when_first_axis_relative() {
        let abs =
            GyroAction::construct(KW_GYROABS, vec![Parameter::Axis(Axis::RelX)]).unwrap();
        assert_eq!(abs.describe(), "Mouse");
    }

    #[test]
    fn properties_roundtrip() {
        let mut action = relative([Axis::LeftX, Axis::LeftY, Axis::Unset]);
        action.set_sensitivity(2.0, 3.0, 4.0);
        match action.get_property("sensitivity") {
            Some(Parameter::Tuple(xyz)) => {
                assert_eq!(xyz[0].as_float(), Some(2.0));
                assert_eq!(xyz[2].as_float(), Some(4.0));
            }
            other => panic!("unexpected property value: {:?}", other),
        }
        assert!(action.get_property("axes").is_some());
        // Haptic property only exists once a descriptor is attached
        assert!(action.get_property("haptic").is_none());
        assert!(action.get_property("nonsense").is_none());
    }
}
