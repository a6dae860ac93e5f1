//! Parameter values
//!
//!     Recognizers store what they extract from a token's text as typed parameter values.
//!     Builders read them back with the accessor matching the shape they expect; asking for
//!     the wrong shape is a [ParamError::TypeMismatch], not a panic.

use super::error::ParamError;
use crate::tac::identity::ParamName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed parameter value stored on a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl ParamValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Text(_) => "text",
            ParamValue::Bool(_) => "bool",
        }
    }

    pub fn as_int(&self, name: ParamName) -> Result<i64, ParamError> {
        match self {
            ParamValue::Int(value) => Ok(*value),
            other => Err(ParamError::type_mismatch(name, "int", other)),
        }
    }

    /// Integers widen to floats; everything else is a mismatch.
    pub fn as_float(&self, name: ParamName) -> Result<f64, ParamError> {
        match self {
            ParamValue::Float(value) => Ok(*value),
            ParamValue::Int(value) => Ok(*value as f64),
            other => Err(ParamError::type_mismatch(name, "float", other)),
        }
    }

    pub fn as_text(&self, name: ParamName) -> Result<&str, ParamError> {
        match self {
            ParamValue::Text(value) => Ok(value),
            other => Err(ParamError::type_mismatch(name, "text", other)),
        }
    }

    pub fn as_bool(&self, name: ParamName) -> Result<bool, ParamError> {
        match self {
            ParamValue::Bool(value) => Ok(*value),
            other => Err(ParamError::type_mismatch(name, "bool", other)),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(value) => write!(f, "{}", value),
            ParamValue::Float(value) => write!(f, "{}", value),
            ParamValue::Text(value) => write!(f, "{}", value),
            ParamValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        assert_eq!(ParamValue::Int(12).as_int(ParamName::Day1), Ok(12));
        assert_eq!(ParamValue::Int(12).as_float(ParamName::Day1), Ok(12.0));
        assert_eq!(ParamValue::from("FT").as_text(ParamName::Type), Ok("FT"));
        assert_eq!(ParamValue::Bool(true).as_bool(ParamName::Value), Ok(true));
    }

    #[test]
    fn test_mismatch_is_typed_error() {
        let err = ParamValue::from("VRB").as_int(ParamName::Direction).unwrap_err();
        assert_eq!(
            err,
            ParamError::TypeMismatch {
                name: ParamName::Direction,
                expected: "int",
                found: "text",
            }
        );
        assert_eq!(
            err.to_string(),
            "parameter DIRECTION holds a text value, expected int"
        );
    }
}
