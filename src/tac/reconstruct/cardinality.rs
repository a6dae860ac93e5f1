//! Cardinality validators
//!
//! Both checks scan the sequence once and report one issue per violated identity, in the
//! order the identities were given. An identity listed twice is checked once.

use crate::tac::identity::TokenIdentity;
use crate::tac::issues::ConversionIssue;
use crate::tac::sequence::TokenSequence;

/// Each distinct identity of `identities` with its number of occurrences in `sequence`.
fn occurrences<'a>(
    sequence: &TokenSequence,
    identities: &'a [TokenIdentity],
) -> Vec<(&'a TokenIdentity, usize)> {
    let mut counts: Vec<(&TokenIdentity, usize)> = Vec::with_capacity(identities.len());
    for identity in identities {
        if !counts.iter().any(|(seen, _)| *seen == identity) {
            counts.push((identity, 0));
        }
    }
    for token in sequence.iter().filter(|token| !token.is_ignored()) {
        let Some(identity) = token.identity() else {
            continue;
        };
        if let Some((_, count)) = counts.iter_mut().find(|(wanted, _)| *wanted == identity) {
            *count += 1;
        }
    }
    counts
}

/// One issue for every identity occurring more than once.
pub fn check_zero_or_one(
    sequence: &TokenSequence,
    identities: &[TokenIdentity],
) -> Vec<ConversionIssue> {
    occurrences(sequence, identities)
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(identity, count)| {
            ConversionIssue::syntax(format!(
                "{identity} may occur at most once, found {count}"
            ))
        })
        .collect()
}

/// One issue for every identity that is missing or occurs more than once.
pub fn check_exactly_one(
    sequence: &TokenSequence,
    identities: &[TokenIdentity],
) -> Vec<ConversionIssue> {
    occurrences(sequence, identities)
        .into_iter()
        .filter_map(|(identity, count)| match count {
            0 => Some(ConversionIssue::missing_data(format!("{identity} is missing"))),
            1 => None,
            _ => Some(ConversionIssue::syntax(format!(
                "{identity} must occur exactly once, found {count}"
            ))),
        })
        .collect()
}
