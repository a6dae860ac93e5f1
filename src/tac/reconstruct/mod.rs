//! Reconstruction
//!
//!     Reconstruction turns a structured message back into canonical TAC. Each token identity
//!     has a [Reconstructor] strategy that appends the tokens for that field, or nothing when
//!     the message lacks it. Strategies are looked up by identity in a
//!     [ReconstructorRegistry], which also owns the services they need (the FIR lookup).
//!
//!     A per message type [Layout] orders the identities and the separators between them;
//!     the [LayoutSerializer] walks it. See [layout] for the driving protocol.
//!
//! Errors
//!
//!     Zero appended tokens means "absent" and is not an error. A strategy returns a
//!     [SerializationError] only when a value exists but cannot be written (a latitude of
//!     95 degrees, a validity period without hours). The error aborts the message: the
//!     serializer reports a failed [ConversionResult](crate::tac::issues::ConversionResult)
//!     with the error as its issue.

pub mod cardinality;
pub mod context;
pub mod layout;
pub mod strategies;

pub use cardinality::{check_exactly_one, check_zero_or_one};
pub use context::ReconstructorContext;
pub use layout::{Layout, LayoutEntry, LayoutSerializer, Separator};

use crate::tac::identity::TokenIdentity;
use crate::tac::model::FirLookup;
use crate::tac::sequence::SequenceBuilder;
use crate::tac::token::TokenError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerializationError {
    #[error("no reconstructor registered for {0}")]
    NoReconstructor(TokenIdentity),

    #[error("{identity}: missing {what}")]
    MissingValue {
        identity: TokenIdentity,
        what: &'static str,
    },

    #[error("{identity}: {message}")]
    InvalidValue {
        identity: TokenIdentity,
        message: String,
    },

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl SerializationError {
    pub fn missing(identity: &TokenIdentity, what: &'static str) -> Self {
        SerializationError::MissingValue {
            identity: identity.clone(),
            what,
        }
    }

    pub fn invalid(identity: &TokenIdentity, message: impl Into<String>) -> Self {
        SerializationError::InvalidValue {
            identity: identity.clone(),
            message: message.into(),
        }
    }
}

/// Appends the tokens of one identity to a sequence under construction.
///
/// Returns how many tokens were appended; 0 means the message has no such field. The
/// message being written is available through [ReconstructorContext::message].
pub trait Reconstructor: Send + Sync {
    fn try_append(
        &self,
        builder: &mut SequenceBuilder,
        identity: &TokenIdentity,
        context: &ReconstructorContext<'_>,
    ) -> Result<usize, SerializationError>;
}

impl<F> Reconstructor for F
where
    F: Fn(
            &mut SequenceBuilder,
            &TokenIdentity,
            &ReconstructorContext<'_>,
        ) -> Result<usize, SerializationError>
        + Send
        + Sync,
{
    fn try_append(
        &self,
        builder: &mut SequenceBuilder,
        identity: &TokenIdentity,
        context: &ReconstructorContext<'_>,
    ) -> Result<usize, SerializationError> {
        self(builder, identity, context)
    }
}

/// Reconstruction strategies keyed by identity.
#[derive(Clone, Default)]
pub struct ReconstructorRegistry {
    strategies: HashMap<TokenIdentity, Arc<dyn Reconstructor>>,
    fir_lookup: Option<Arc<dyn FirLookup>>,
}

impl ReconstructorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in strategy.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        strategies::register_builtins(&mut registry);
        registry
    }

    /// Install the FIR lookup used to resolve FIR names.
    pub fn with_fir_lookup(mut self, lookup: Arc<dyn FirLookup>) -> Self {
        self.fir_lookup = Some(lookup.clone());
        strategies::register_fir_lookup(&mut self, lookup);
        self
    }

    pub fn fir_lookup(&self) -> Option<&Arc<dyn FirLookup>> {
        self.fir_lookup.as_ref()
    }

    /// Register `strategy` for `identity`, replacing any earlier one.
    pub fn register(&mut self, identity: TokenIdentity, strategy: impl Reconstructor + 'static) {
        self.strategies.insert(identity, Arc::new(strategy));
    }

    pub fn contains(&self, identity: &TokenIdentity) -> bool {
        self.strategies.contains_key(identity)
    }

    pub fn get(&self, identity: &TokenIdentity) -> Option<&dyn Reconstructor> {
        self.strategies.get(identity).map(|strategy| strategy.as_ref())
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn try_append(
        &self,
        builder: &mut SequenceBuilder,
        identity: &TokenIdentity,
        context: &ReconstructorContext<'_>,
    ) -> Result<usize, SerializationError> {
        let strategy = self
            .get(identity)
            .ok_or_else(|| SerializationError::NoReconstructor(identity.clone()))?;
        strategy.try_append(builder, identity, context)
    }
}

impl fmt::Debug for ReconstructorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.strategies.keys().map(TokenIdentity::name).collect();
        names.sort_unstable();
        f.debug_struct("ReconstructorRegistry")
            .field("strategies", &names)
            .field("fir_lookup", &self.fir_lookup.is_some())
            .finish()
    }
}
