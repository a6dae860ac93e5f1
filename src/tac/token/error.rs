//! Errors raised while identifying tokens and reading their parameters

use super::value::ParamValue;
use crate::tac::identity::{ParamName, TokenIdentity};
use thiserror::Error;

/// Failures of the controlled mutation window of a token.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("cannot store {param}: token has no identity yet")]
    NotIdentified { param: ParamName },
    #[error("identity {identity} does not declare parameter {param}")]
    UndeclaredParameter {
        identity: TokenIdentity,
        param: ParamName,
    },
    #[error("certainty {0} is outside (0.0, 1.0]")]
    InvalidCertainty(f64),
}

/// Failures reading a parameter back in an expected shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("parameter {0} is missing")]
    Missing(ParamName),
    #[error("parameter {name} holds a {found} value, expected {expected}")]
    TypeMismatch {
        name: ParamName,
        expected: &'static str,
        found: &'static str,
    },
}

impl ParamError {
    pub(crate) fn type_mismatch(
        name: ParamName,
        expected: &'static str,
        found: &ParamValue,
    ) -> Self {
        ParamError::TypeMismatch {
            name,
            expected,
            found: found.kind(),
        }
    }
}
