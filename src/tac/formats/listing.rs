//! Token listings
//!
//! `simple` prints one token per row: identity, quoted text, and the status and message
//! when the token is not OK. Whitespace and ignored tokens are left out. `json` and `yaml`
//! dump every token with serde. `tac` renders the text back.

use super::registry::{FormatError, Formatter};
use crate::tac::sequence::TokenSequence;
use crate::tac::token::{Status, Token};

fn simple_row(token: &Token) -> String {
    let mut row = format!(
        "{:<32} {:?}",
        token.identity_name().unwrap_or("?"),
        token.text()
    );
    if token.status() != Status::Ok {
        row.push_str(&format!(" {}", token.status()));
        if let Some(message) = token.message() {
            row.push_str(&format!(": {}", message));
        }
    }
    row
}

/// One token per row.
pub fn to_simple_listing(sequence: &TokenSequence) -> String {
    sequence
        .iter()
        .filter(|token| !token.is_whitespace() && !token.is_ignored())
        .map(simple_row)
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct SimpleFormatter;

impl Formatter for SimpleFormatter {
    fn name(&self) -> &str {
        "simple"
    }

    fn serialize(&self, sequence: &TokenSequence) -> Result<String, FormatError> {
        Ok(to_simple_listing(sequence))
    }

    fn description(&self) -> &str {
        "One token per row"
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, sequence: &TokenSequence) -> Result<String, FormatError> {
        serde_json::to_string_pretty(sequence)
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "Every token as JSON"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, sequence: &TokenSequence) -> Result<String, FormatError> {
        serde_yaml::to_string(sequence)
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "Every token as YAML"
    }
}

pub struct TacFormatter;

impl Formatter for TacFormatter {
    fn name(&self) -> &str {
        "tac"
    }

    fn serialize(&self, sequence: &TokenSequence) -> Result<String, FormatError> {
        Ok(sequence.render())
    }

    fn description(&self) -> &str {
        "The rendered text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tac::lexing::lex;

    #[test]
    fn test_simple_listing() {
        let listing = to_simple_listing(&lex("METAR EFHK 011750Z !!"));
        insta::assert_snapshot!(listing, @r###"
        METAR_START                      "METAR"
        AERODROME_DESIGNATOR             "EFHK"
        ISSUE_TIME                       "011750Z"
        ?                                "!!" UNRECOGNIZED
        END_TOKEN                        "" SYNTAX_ERROR: message is not terminated with '='
        "###);
    }

    #[test]
    fn test_json_lists_every_token() {
        let json = JsonFormatter.serialize(&lex("TAF EFHK=")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(4));
        assert_eq!(value[0]["identity"], "TAF_START");
    }

    #[test]
    fn test_tac_renders_source() {
        let text = "TAF  EFHK\n=";
        assert_eq!(TacFormatter.serialize(&lex(text)).unwrap(), text);
    }
}
