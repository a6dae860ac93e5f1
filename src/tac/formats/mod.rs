//! Output formats for token sequences
//!
//! - token listings for inspection (simple, json, yaml)
//! - the rendered text itself (tac)

pub mod listing;
pub mod registry;

pub use listing::{to_simple_listing, JsonFormatter, SimpleFormatter, TacFormatter, YamlFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
