//! The token
//!
//!     A token is one unit of TAC text: a word, a run of whitespace, the end marker, or a
//!     multi-word group a recognizer merged ("EHAA SIGMET", "CNL AIRMET M01 271130/271530").
//!
//! Identification
//!
//!     A token starts unrecognized (certainty 0.0, no identity). Recognizers identify it with
//!     a certainty in (0.0, 1.0]. Once identified, a later recognizer may re-identify the
//!     token only if both the existing and the incoming certainty are below 1.0: a 1.0
//!     identification is final. Note this is not "higher certainty wins": a provisional 0.5
//!     identification cannot be upgraded to a final one either, only replaced by another
//!     provisional one.
//!
//!     Parameters can only be stored once the token has an identity, and only in slots the
//!     identity declares. Re-identification drops parameters the new identity does not
//!     declare.
//!
//! Synthetic and Ignored Tokens
//!
//!     Synthetic tokens are inserted by the lexer to repair missing mandatory structure; they
//!     have empty text so rendering a lexed sequence still reproduces the input. Ignored
//!     tokens are skipped by the default (filtered) navigation of a sequence.

use super::error::{ParamError, TokenError};
use super::value::ParamValue;
use crate::tac::identity::{ParamName, TokenIdentity, WHITE_SPACE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

/// Recognition status of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Unrecognized,
    Ok,
    Warning,
    SyntaxError,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Unrecognized => "UNRECOGNIZED",
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::SyntaxError => "SYNTAX_ERROR",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    span: Option<Range<usize>>,
    identity: Option<TokenIdentity>,
    status: Status,
    certainty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    params: BTreeMap<ParamName, ParamValue>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    synthetic: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    ignored: bool,
}

impl Token {
    /// An unrecognized token holding `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            span: None,
            identity: None,
            status: Status::Unrecognized,
            certainty: 0.0,
            message: None,
            params: BTreeMap::new(),
            synthetic: false,
            ignored: false,
        }
    }

    /// A token fully identified with `identity`, as produced by reconstruction.
    pub fn identified(text: impl Into<String>, identity: TokenIdentity) -> Self {
        let mut token = Self::new(text);
        token.identity = Some(identity);
        token.status = Status::Ok;
        token.certainty = 1.0;
        token
    }

    pub fn whitespace(text: impl Into<String>) -> Self {
        Self::identified(text, WHITE_SPACE)
    }

    /// A token inserted to repair missing structure. It has no source text.
    pub fn synthetic(identity: TokenIdentity, status: Status, message: impl Into<String>) -> Self {
        let mut token = Self::identified(String::new(), identity);
        token.status = status;
        token.message = Some(message.into());
        token.synthetic = true;
        token
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = Some(span);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> Option<&Range<usize>> {
        self.span.as_ref()
    }

    pub fn identity(&self) -> Option<&TokenIdentity> {
        self.identity.as_ref()
    }

    pub fn identity_name(&self) -> Option<&str> {
        self.identity.as_ref().map(TokenIdentity::name)
    }

    pub fn has_identity(&self, identity: &TokenIdentity) -> bool {
        self.identity.as_ref() == Some(identity)
    }

    pub fn has_any_identity(&self, identities: &[TokenIdentity]) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|identity| identity.is_any_of(identities))
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn certainty(&self) -> f64 {
        self.certainty
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_recognized(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_whitespace(&self) -> bool {
        self.identity
            .as_ref()
            .is_some_and(TokenIdentity::is_whitespace)
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    pub fn set_ignored(&mut self, ignored: bool) {
        self.ignored = ignored;
    }

    /// True when a new identification would be accepted.
    pub fn accepts_identification(&self, certainty: f64) -> bool {
        match self.identity {
            None => true,
            Some(_) => self.certainty < 1.0 && certainty < 1.0,
        }
    }

    /// Identify (or re-identify) this token.
    ///
    /// Returns `Ok(false)` when the override rule refuses the new identification; the
    /// token is then left untouched.
    pub fn identify(
        &mut self,
        identity: TokenIdentity,
        status: Status,
        message: Option<String>,
        certainty: f64,
    ) -> Result<bool, TokenError> {
        if !(certainty > 0.0 && certainty <= 1.0) {
            return Err(TokenError::InvalidCertainty(certainty));
        }
        if !self.accepts_identification(certainty) {
            return Ok(false);
        }
        self.params.retain(|name, _| identity.can_store(*name));
        self.identity = Some(identity);
        self.status = status;
        self.message = message;
        self.certainty = certainty;
        Ok(true)
    }

    /// Store a parameter in a slot declared by the current identity.
    pub fn set_param(
        &mut self,
        name: ParamName,
        value: impl Into<ParamValue>,
    ) -> Result<(), TokenError> {
        let identity = self
            .identity
            .as_ref()
            .ok_or(TokenError::NotIdentified { param: name })?;
        if !identity.can_store(name) {
            return Err(TokenError::UndeclaredParameter {
                identity: identity.clone(),
                param: name,
            });
        }
        self.params.insert(name, value.into());
        Ok(())
    }

    pub fn param(&self, name: ParamName) -> Option<&ParamValue> {
        self.params.get(&name)
    }

    pub fn params(&self) -> impl Iterator<Item = (ParamName, &ParamValue)> {
        self.params.iter().map(|(name, value)| (*name, value))
    }

    pub fn int_param(&self, name: ParamName) -> Result<Option<i64>, ParamError> {
        self.param(name).map(|value| value.as_int(name)).transpose()
    }

    pub fn float_param(&self, name: ParamName) -> Result<Option<f64>, ParamError> {
        self.param(name).map(|value| value.as_float(name)).transpose()
    }

    pub fn text_param(&self, name: ParamName) -> Result<Option<&str>, ParamError> {
        self.param(name).map(|value| value.as_text(name)).transpose()
    }

    pub fn require_int(&self, name: ParamName) -> Result<i64, ParamError> {
        self.int_param(name)?.ok_or(ParamError::Missing(name))
    }

    pub fn require_float(&self, name: ParamName) -> Result<f64, ParamError> {
        self.float_param(name)?.ok_or(ParamError::Missing(name))
    }

    pub fn require_text(&self, name: ParamName) -> Result<&str, ParamError> {
        self.text_param(name)?.ok_or(ParamError::Missing(name))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identity {
            Some(identity) => write!(f, "{}({:?})", identity, self.text),
            None => write!(f, "?({:?})", self.text),
        }
    }
}
