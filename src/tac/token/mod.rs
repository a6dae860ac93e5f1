//! Core token types shared across the lexer, the reconstructors and tooling.

pub mod core;
pub mod error;
pub mod value;

pub use self::core::{Status, Token};
pub use error::{ParamError, TokenError};
pub use value::ParamValue;
