//! Angle and quaternion helpers shared by the gyro actions.

use std::f64::consts::{PI, TAU};

/// Shortest-path signed difference between two angles in radians.
///
/// The result is always wrapped to the ±π range, so feeding angles that
/// cross the ±π boundary never produces a jump larger than half a turn.
pub fn angle_diff(from: f64, to: f64) -> f64 {
    (to - from + PI).rem_euclid(TAU) - PI
}

/// Converts a normalized quaternion to pitch/yaw/roll Euler angles (radians).
///
/// Component order matches the gyro sample convention: index 0 is pitch,
/// 1 is yaw, 2 is roll.
pub fn quat_to_euler(q0: f64, q1: f64, q2: f64, q3: f64) -> [f64; 3] {
    let pitch = (2.0 * (q3 * q0 + q1 * q2)).atan2(1.0 - 2.0 * (q0 * q0 + q1 * q1));
    let yaw = (2.0 * (q3 * q1 - q2 * q0)).clamp(-1.0, 1.0).asin();
    let roll = (2.0 * (q3 * q2 + q0 * q1)).atan2(1.0 - 2.0 * (q1 * q1 + q2 * q2));
    [pitch, yaw, roll]
}
