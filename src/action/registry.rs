//! Keyword-indexed action constructor registry.
//!
//! The profile builder looks actions up by keyword and hands the constructor
//! a positional parameter list; the constructor validates it against its
//! schema and returns the boxed action or a typed error. Constructors are
//! registered once at startup.

use std::collections::HashMap;

use log::debug;

use super::gyro::{GyroAction, KW_GYRO, KW_GYROABS};
use super::{Action, ActionError, Parameter};

/// Factory signature every registered keyword maps to.
pub type Constructor = fn(&str, Vec<Parameter>) -> Result<Box<dyn Action>, ActionError>;

/// Registry of action constructors, keyed by keyword.
#[derive(Default)]
pub struct ActionRegistry {
    constructors: HashMap<&'static str, Constructor>,
}

impl ActionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in action keyword registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(KW_GYRO, GyroAction::construct);
        registry.register(KW_GYROABS, GyroAction::construct);
        registry
    }

    /// Registers a constructor for `keyword`, replacing any previous one.
    pub fn register(&mut self, keyword: &'static str, constructor: Constructor) {
        debug!("Registered action keyword '{}'", keyword);
        self.constructors.insert(keyword, constructor);
    }

    /// Builds an action from a keyword and parameter list.
    pub fn construct(
        &self,
        keyword: &str,
        params: Vec<Parameter>,
    ) -> Result<Box<dyn Action>, ActionError> {
        match self.constructors.get(keyword) {
            Some(constructor) => constructor(keyword, params),
            None => Err(ActionError::UnknownKeyword(keyword.to_string())),
        }
    }

    pub fn is_registered(&self, keyword: &str) -> bool {
        self.constructors.contains_key(keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::Axis;

    #[test]
    fn defaults_cover_gyro_keywords() {
        let registry = ActionRegistry::with_defaults();
        assert!(registry.is_registered("gyro"));
        assert!(registry.is_registered("gyroabs"));
        assert!(!registry.is_registered("button"));
    }

    #[test]
    fn constructs_by_keyword() {
        let registry = ActionRegistry::with_defaults();
        let action = registry
            .construct("gyro", vec![Parameter::Axis(Axis::LeftX)])
            .unwrap();
        assert_eq!(action.keyword(), "gyro");
    }

    #[test]
    fn unknown_keyword_is_typed_error() {
        let registry = ActionRegistry::with_defaults();
        let err = registry.construct("warp", vec![]).unwrap_err();
        assert!(matches!(err, ActionError::UnknownKeyword(_)));
    }

    #[test]
    fn invalid_parameters_are_typed_error() {
        let registry = ActionRegistry::with_defaults();
        let err = registry.construct("gyroabs", vec![]).unwrap_err();
        assert!(matches!(err, ActionError::InvalidParameters { .. }));
    }
}
