//! Conversion hints
//!
//!     The configuration surface shared by the lexer and the reconstructors. Every field has a
//!     default, so `ConversionHints::default()` is a valid starting point; the `tac-config`
//!     crate builds these from layered TOML files.

use crate::tac::model::MessageType;
use serde::{Deserialize, Serialize};

/// Width of the label column in advisory layouts ("DTG:" padded to this width).
pub const DEFAULT_ADVISORY_LABEL_WIDTH: usize = 20;

/// How validity periods are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidityTimeFormat {
    /// `DDHH/DDHH`
    #[default]
    Long,
    /// `DDHHHH`
    Short,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionHints {
    /// Forces the message family instead of sniffing it from the text.
    pub contained_message_type: Option<MessageType>,
    /// Keep the whitespace of a source message when reconstructing it.
    pub whitespace_passthrough: bool,
    pub validity_time_format: ValidityTimeFormat,
    pub advisory_label_width: usize,
    /// Heading of the bulletin the text came from, e.g. `FTFI33 EFPP 020500`.
    pub bulletin_heading: Option<String>,
    /// Bulletin identifier recorded on the messages it contains.
    pub bulletin_id: Option<String>,
}

impl Default for ConversionHints {
    fn default() -> Self {
        Self {
            contained_message_type: None,
            whitespace_passthrough: false,
            validity_time_format: ValidityTimeFormat::Long,
            advisory_label_width: DEFAULT_ADVISORY_LABEL_WIDTH,
            bulletin_heading: None,
            bulletin_id: None,
        }
    }
}

impl ConversionHints {
    pub fn with_message_type(mut self, message_type: MessageType) -> Self {
        self.contained_message_type = Some(message_type);
        self
    }

    pub fn with_whitespace_passthrough(mut self, passthrough: bool) -> Self {
        self.whitespace_passthrough = passthrough;
        self
    }

    pub fn with_validity_time_format(mut self, format: ValidityTimeFormat) -> Self {
        self.validity_time_format = format;
        self
    }

    pub fn with_advisory_label_width(mut self, width: usize) -> Self {
        self.advisory_label_width = width;
        self
    }

    pub fn with_bulletin_heading(mut self, heading: impl Into<String>) -> Self {
        self.bulletin_heading = Some(heading.into());
        self
    }

    pub fn with_bulletin_id(mut self, id: impl Into<String>) -> Self {
        self.bulletin_id = Some(id.into());
        self
    }
}
