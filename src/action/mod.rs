//! Action capability model
//!
//! An [`Action`] is one unit of input-to-output behavior in a mapping
//! profile. Action variants differ widely in what they support, so instead
//! of one fat mandatory interface every action advertises a
//! [`Capabilities`] bitmask and the trait gives unsupported operations
//! default bodies. Callers - modifier wrappers, profile builders - check the
//! mask before invoking an optional operation; calling an unsupported one is
//! a caller bug, not a runtime condition to recover from.

pub mod deadzone;
pub mod gyro;
pub mod params;
pub mod registry;

pub use deadzone::Deadzone;
pub use gyro::GyroAction;
pub use params::{ParamKind, ParamSchema, ParamSpec, Parameter};
pub use registry::ActionRegistry;

use std::sync::Arc;

use log::warn;
use thiserror::Error;

use crate::mapper::{GyroSample, HapticData, Mapper};

/// Construction-time action errors.
///
/// Both variants are fatal only to the construction attempt; the profile
/// loader reports them and carries on.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("invalid parameters for '{keyword}': {reason}")]
    InvalidParameters { keyword: String, reason: String },

    #[error("unknown action keyword '{0}'")]
    UnknownKeyword(String),
}

impl ActionError {
    pub(crate) fn invalid(keyword: &str, reason: impl Into<String>) -> Self {
        ActionError::InvalidParameters {
            keyword: keyword.to_string(),
            reason: reason.into(),
        }
    }
}

/// Set of optional operations an action implements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities(pub u32);

impl Capabilities {
    /// Evaluates gyroscope samples.
    pub const GYRO: Capabilities = Capabilities(1 << 0);

    /// Produces a human-readable description.
    pub const DESCRIBE: Capabilities = Capabilities(1 << 1);

    /// Answers `get_property` lookups.
    pub const PROPERTIES: Capabilities = Capabilities(1 << 2);

    /// Accepts a sensitivity vector.
    pub const SENSITIVITY: Capabilities = Capabilities(1 << 3);

    /// Sensitivity third component is meaningful.
    pub const SENSITIVITY_Z: Capabilities = Capabilities(1 << 4);

    /// Accepts a shared deadzone modifier.
    pub const DEADZONE: Capabilities = Capabilities(1 << 5);

    /// Accepts a haptic feedback descriptor.
    pub const HAPTIC: Capabilities = Capabilities(1 << 6);

    pub fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        Capabilities(self.0 | rhs.0)
    }
}

/// One capability-flagged unit of mapping behavior.
///
/// Optional operations default to no-ops (or a logged warning for property
/// lookups); concrete actions override exactly the ones their capability
/// mask advertises. Teardown is `Drop`: dropping an action releases its
/// shared references (deadzone and the like) exactly once.
pub trait Action {
    /// Keyword this action was constructed under, e.g. `"gyroabs"`.
    fn keyword(&self) -> &'static str;

    /// Which optional operations this action supports.
    fn capabilities(&self) -> Capabilities;

    /// Evaluates one gyroscope sample, writing output into the mapper.
    ///
    /// Supported when [`Capabilities::GYRO`] is set.
    fn gyro(&mut self, _mapper: &mut dyn Mapper, _sample: &GyroSample) {}

    /// Human-readable description for UI purposes.
    fn describe(&self) -> String {
        self.keyword().to_string()
    }

    /// Looks up a named property.
    ///
    /// A miss is non-fatal: it logs a warning and returns `None`.
    fn get_property(&self, name: &str) -> Option<Parameter> {
        warn!("Requested unknown property '{}' from '{}'", name, self.keyword());
        None
    }

    /// Sets per-component sensitivity.
    fn set_sensitivity(&mut self, _x: f64, _y: f64, _z: f64) {}

    /// Attaches or clears the haptic feedback descriptor.
    fn set_haptic(&mut self, _haptic: Option<HapticData>) {}

    /// Attaches a shared deadzone modifier.
    ///
    /// Supported when [`Capabilities::DEADZONE`] is set.
    fn set_deadzone(&mut self, _deadzone: Arc<Deadzone>) {}
}

impl std::fmt::Debug for dyn Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("keyword", &self.keyword())
            .finish()
    }
}
