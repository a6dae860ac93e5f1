//! Shared configuration loader for the tac toolchain.
//!
//! `defaults/tac.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`TacConfig`].
//! [`TacConfig::conversion_hints`] turns the result into the hints the lexer and
//! the reconstructors take.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use tac_parser::tac::{ConversionHints, MessageType, ValidityTimeFormat};

const DEFAULT_TOML: &str = include_str!("../defaults/tac.default.toml");

/// Top-level configuration consumed by tac applications.
#[derive(Debug, Clone, Deserialize)]
pub struct TacConfig {
    #[serde(default)]
    pub lexing: LexingConfig,
    pub reconstruction: ReconstructionConfig,
    pub bulletin: BulletinConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexingConfig {
    /// Message family name as accepted by `MessageType::from_str` ("TAF", "SWX", ...)
    #[serde(default)]
    pub message_type: Option<String>,
}

/// Mirrors the reconstruction knobs of [`ConversionHints`].
#[derive(Debug, Clone, Deserialize)]
pub struct ReconstructionConfig {
    pub whitespace_passthrough: bool,
    pub validity_time_format: ValidityTimeFormat,
    pub advisory_label_width: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulletinConfig {
    pub row_length: usize,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
}

impl TacConfig {
    /// The configured message family, if one is forced.
    pub fn message_type(&self) -> Result<Option<MessageType>, ConfigError> {
        self.lexing
            .message_type
            .as_deref()
            .map(|name| {
                name.parse::<MessageType>()
                    .map_err(|err| ConfigError::Message(format!("lexing.message_type: {}", err)))
            })
            .transpose()
    }

    pub fn conversion_hints(&self) -> Result<ConversionHints, ConfigError> {
        let mut hints = ConversionHints::default()
            .with_whitespace_passthrough(self.reconstruction.whitespace_passthrough)
            .with_validity_time_format(self.reconstruction.validity_time_format)
            .with_advisory_label_width(self.reconstruction.advisory_label_width);
        if let Some(message_type) = self.message_type()? {
            hints = hints.with_message_type(message_type);
        }
        if let Some(heading) = &self.bulletin.heading {
            hints = hints.with_bulletin_heading(heading.as_str());
        }
        if let Some(id) = &self.bulletin.id {
            hints = hints.with_bulletin_id(id.as_str());
        }
        Ok(hints)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TacConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TacConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(!config.reconstruction.whitespace_passthrough);
        assert_eq!(
            config.reconstruction.validity_time_format,
            ValidityTimeFormat::Long
        );
        assert_eq!(config.bulletin.row_length, 60);
        assert_eq!(config.output.format, "simple");
        assert!(config.lexing.message_type.is_none());
    }

    #[test]
    fn default_hints_match_library_defaults() {
        let hints = load_defaults()
            .expect("defaults to deserialize")
            .conversion_hints()
            .expect("hints to convert");
        assert_eq!(hints, ConversionHints::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("reconstruction.validity_time_format", "short")
            .expect("override to apply")
            .set_override("lexing.message_type", "swx")
            .expect("override to apply")
            .build()
            .expect("config to build");
        let hints = config.conversion_hints().expect("hints to convert");
        assert_eq!(hints.validity_time_format, ValidityTimeFormat::Short);
        assert_eq!(
            hints.contained_message_type,
            Some(MessageType::SpaceWeatherAdvisory)
        );
    }

    #[test]
    fn bulletin_keys_reach_hints() {
        let hints = Loader::new()
            .set_override("bulletin.heading", "FTFI33 EFPP 020500")
            .expect("override to apply")
            .set_override("bulletin.id", "FTFI33EFPP020500")
            .expect("override to apply")
            .build()
            .expect("config to build")
            .conversion_hints()
            .expect("hints to convert");
        assert_eq!(hints.bulletin_heading.as_deref(), Some("FTFI33 EFPP 020500"));
        assert_eq!(hints.bulletin_id.as_deref(), Some("FTFI33EFPP020500"));
    }

    #[test]
    fn rejects_unknown_message_type() {
        let config = Loader::new()
            .set_override("lexing.message_type", "PIREP")
            .expect("override to apply")
            .build()
            .expect("config to build");
        let err = config.conversion_hints().unwrap_err();
        assert!(err.to_string().contains("PIREP"));
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("does/not/exist.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn optional_file_may_be_absent() {
        let config = Loader::new()
            .with_optional_file("does/not/exist.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.reconstruction.advisory_label_width, 20);
    }
}
