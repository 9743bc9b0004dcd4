//! Small-value parameter plumbing shared by action constructors and
//! `get_property` lookups.
//!
//! The configuration parser (outside this crate) turns mapping text into a
//! positional parameter list; [`ParamSchema`] validates that list against a
//! per-action declaration and fills defaults before the constructor runs.

use crate::mapper::Axis;

use super::ActionError;

/// One positional parameter or property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Int(i64),
    Float(f64),
    Axis(Axis),
    Tuple(Vec<Parameter>),
}

impl Parameter {
    pub fn as_axis(&self) -> Option<Axis> {
        match self {
            Parameter::Axis(a) => Some(*a),
            _ => None,
        }
    }

    /// Float value; integers coerce.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Parameter::Float(v) => Some(*v),
            Parameter::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Parameter::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn kind(&self) -> ParamKind {
        match self {
            Parameter::Int(_) => ParamKind::Int,
            Parameter::Float(_) => ParamKind::Float,
            Parameter::Axis(_) => ParamKind::Axis,
            Parameter::Tuple(_) => ParamKind::Tuple,
        }
    }
}

/// Accepted type of one schema position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Float,
    Axis,
    Tuple,
}

impl ParamKind {
    fn accepts(self, p: &Parameter) -> bool {
        // Int is acceptable wherever a Float is declared
        p.kind() == self || (self == ParamKind::Float && p.kind() == ParamKind::Int)
    }
}

/// Declaration of one positional parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub kind: ParamKind,

    /// `None` makes the position required; `Some` supplies the default used
    /// when the caller omits it.
    pub default: Option<Parameter>,
}

impl ParamSpec {
    pub fn required(kind: ParamKind) -> Self {
        Self {
            kind,
            default: None,
        }
    }

    pub fn optional(kind: ParamKind, default: Parameter) -> Self {
        Self {
            kind,
            default: Some(default),
        }
    }
}

/// Positional parameter schema for one action keyword.
///
/// Required positions must come first; every optional position carries a
/// default so [`check_and_fill`](ParamSchema::check_and_fill) always returns
/// a full-length list on success.
#[derive(Debug, Clone)]
pub struct ParamSchema {
    specs: Vec<ParamSpec>,
}

impl ParamSchema {
    pub fn new(specs: Vec<ParamSpec>) -> Self {
        Self { specs }
    }

    /// Validates arity and types, then appends defaults for trailing omitted
    /// positions. Returns the filled list.
    pub fn check_and_fill(
        &self,
        keyword: &str,
        params: Vec<Parameter>,
    ) -> Result<Vec<Parameter>, ActionError> {
        let required = self.specs.iter().filter(|s| s.default.is_none()).count();

        if params.len() < required {
            return Err(ActionError::invalid(
                keyword,
                format!(
                    "expected at least {} parameter(s), got {}",
                    required,
                    params.len()
                ),
            ));
        }
        if params.len() > self.specs.len() {
            return Err(ActionError::invalid(
                keyword,
                format!(
                    "expected at most {} parameter(s), got {}",
                    self.specs.len(),
                    params.len()
                ),
            ));
        }

        for (i, (spec, param)) in self.specs.iter().zip(params.iter()).enumerate() {
            if !spec.kind.accepts(param) {
                return Err(ActionError::invalid(
                    keyword,
                    format!(
                        "parameter {} should be {:?}, got {:?}",
                        i + 1,
                        spec.kind,
                        param
                    ),
                ));
            }
        }

        let mut filled = params;
        for spec in &self.specs[filled.len()..] {
            // Only optional positions can be reached here
            filled.push(spec.default.clone().expect("optional spec has a default"));
        }

        Ok(filled)
    }
}
