//! Built-in reconstruction strategies
//!
//! Strategies are plain functions with the [Reconstructor](super::Reconstructor) signature,
//! grouped by the part of the message they write. The FIR name and area strategies also hold
//! the FIR lookup injected through [ReconstructorRegistry::with_fir_lookup].

mod advisory;
mod common;
mod sigmet;
mod time;

use super::context::ANALYSIS_INDEX;
use super::{ReconstructorContext, ReconstructorRegistry, SerializationError};
use crate::tac::identity::*;
use crate::tac::model::{Analysis, FirLookup};
use crate::tac::sequence::SequenceBuilder;
use crate::tac::token::{ParamValue, Token};
use std::sync::Arc;

pub(crate) fn register_builtins(registry: &mut ReconstructorRegistry) {
    common::register(registry);
    time::register(registry);
    sigmet::register(registry);
    advisory::register(registry);
}

pub(crate) fn register_fir_lookup(
    registry: &mut ReconstructorRegistry,
    lookup: Arc<dyn FirLookup>,
) {
    registry.register(FIR_NAME, sigmet::FirNameReconstructor::new(Some(lookup.clone())));
    sigmet::register_areas(registry, Some(lookup));
}

/// A token of `identity` carrying `params`.
pub(crate) fn token_with(
    text: impl Into<String>,
    identity: &TokenIdentity,
    params: impl IntoIterator<Item = (ParamName, ParamValue)>,
) -> Result<Token, SerializationError> {
    let mut token = Token::identified(text, identity.clone());
    for (name, value) in params {
        token.set_param(name, value)?;
    }
    Ok(token)
}

/// Append a single parameterless token.
pub(crate) fn append_word(
    builder: &mut SequenceBuilder,
    text: impl Into<String>,
    identity: &TokenIdentity,
) -> usize {
    builder.append(Token::identified(text, identity.clone()));
    1
}

/// True when the last non-whitespace token written has `identity`.
pub(crate) fn follows(builder: &SequenceBuilder, identity: &TokenIdentity) -> bool {
    builder
        .tokens()
        .iter()
        .rev()
        .find(|token| !token.is_whitespace())
        .is_some_and(|token| token.has_identity(identity))
}

/// The analysis selected by the enclosing repeat, if any.
pub(crate) fn current_analysis<'a>(context: &ReconstructorContext<'a>) -> Option<&'a Analysis> {
    let index = context.parameter(ANALYSIS_INDEX)?;
    context.message().analysis(index)
}
