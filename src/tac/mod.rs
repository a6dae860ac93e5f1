//! Main module for tac library functionality

pub mod bulletin;
pub mod formats;
pub mod hints;
pub mod identity;
pub mod issues;
pub mod lexing;
pub mod model;
pub mod reconstruct;
pub mod sequence;
pub mod testing;
pub mod token;

pub use hints::{ConversionHints, ValidityTimeFormat};
pub use identity::TokenIdentity;
pub use issues::{ConversionIssue, ConversionResult, ConversionStatus};
pub use lexing::Lexer;
pub use model::MessageType;
pub use sequence::{SequenceBuilder, TokenSequence};
pub use token::Token;
