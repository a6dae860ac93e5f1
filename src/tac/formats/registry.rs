//! Format registry for token sequence output
//!
//! Each output format implements [Formatter] and is registered by name with a
//! [FormatRegistry]. The CLI picks the format from its `--format` flag.

use crate::tac::sequence::TokenSequence;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("format '{0}' not found")]
    FormatNotFound(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Serializes a token sequence to a string.
pub trait Formatter: Send + Sync {
    /// The name the format is registered under (e.g. "json")
    fn name(&self) -> &str;

    fn serialize(&self, sequence: &TokenSequence) -> Result<String, FormatError>;

    fn description(&self) -> &str {
        ""
    }
}

pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter, replacing any with the same name.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn serialize(&self, sequence: &TokenSequence, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(sequence)
    }

    /// All format names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// A registry with the built-in formats.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::SimpleFormatter);
        registry.register(super::JsonFormatter);
        registry.register(super::YamlFormatter);
        registry.register(super::TacFormatter);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tac::lexing::lex;

    struct CountFormatter;

    impl Formatter for CountFormatter {
        fn name(&self) -> &str {
            "count"
        }

        fn serialize(&self, sequence: &TokenSequence) -> Result<String, FormatError> {
            Ok(sequence.len().to_string())
        }
    }

    #[test]
    fn test_register_and_serialize() {
        let mut registry = FormatRegistry::new();
        registry.register(CountFormatter);
        assert!(registry.has("count"));
        assert_eq!(registry.serialize(&lex("TAF EFHK="), "count").unwrap(), "4");
    }

    #[test]
    fn test_unknown_format() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(
            registry.serialize(&lex("TAF="), "xml"),
            Err(FormatError::FormatNotFound("xml".to_string()))
        );
    }

    #[test]
    fn test_default_formats() {
        assert_eq!(
            FormatRegistry::default().list_formats(),
            vec!["json", "simple", "tac", "yaml"]
        );
    }
}
