//! Token sequences
//!
//!     A [TokenSequence] is an immutable, ordered arena of tokens. Tokens are addressed by
//!     index and navigated through [TokenRef] handles in two modes:
//!
//!         - raw: every token, one step at a time;
//!         - filtered (the default): skips whitespace and ignored tokens.
//!
//!     Both adjacency views are computed once when the sequence is built, so every step is
//!     O(1) and no token holds a pointer to its neighbours.
//!
//!     Sequences are produced by the lexer or by a [SequenceBuilder]; operations such as
//!     [TokenSequence::split_by] and [TokenSequence::trim_whitespace] return new sequences
//!     and never reorder tokens.

pub mod builder;

pub use builder::SequenceBuilder;

use crate::tac::identity::TokenIdentity;
use crate::tac::token::{Status, Token};
use serde::{Serialize, Serializer};
use std::ops::Deref;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenSequence {
    tokens: Vec<Token>,
    next_filtered: Vec<Option<usize>>,
    previous_filtered: Vec<Option<usize>>,
}

fn is_filtered_in(token: &Token) -> bool {
    !token.is_ignored() && !token.is_whitespace()
}

impl TokenSequence {
    pub(crate) fn from_tokens(tokens: Vec<Token>) -> Self {
        let len = tokens.len();
        let mut next_filtered = vec![None; len];
        let mut previous_filtered = vec![None; len];

        let mut upcoming = None;
        for index in (0..len).rev() {
            next_filtered[index] = upcoming;
            if is_filtered_in(&tokens[index]) {
                upcoming = Some(index);
            }
        }

        let mut preceding = None;
        for index in 0..len {
            previous_filtered[index] = preceding;
            if is_filtered_in(&tokens[index]) {
                preceding = Some(index);
            }
        }

        Self {
            tokens,
            next_filtered,
            previous_filtered,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<TokenRef<'_>> {
        (index < self.tokens.len()).then_some(TokenRef { seq: self, index })
    }

    /// The first token, whatever its kind.
    pub fn first(&self) -> Option<TokenRef<'_>> {
        self.get(0)
    }

    pub fn last(&self) -> Option<TokenRef<'_>> {
        self.tokens.len().checked_sub(1).and_then(|index| self.get(index))
    }

    /// The first token visible to filtered navigation.
    pub fn first_filtered(&self) -> Option<TokenRef<'_>> {
        let first = self.first()?;
        if is_filtered_in(first.token()) {
            Some(first)
        } else {
            first.next()
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn refs(&self) -> impl Iterator<Item = TokenRef<'_>> {
        (0..self.tokens.len()).map(move |index| TokenRef { seq: self, index })
    }

    /// Tokens in order, optionally leaving out the ones flagged as ignored.
    pub fn tokens(&self, include_ignored: bool) -> Vec<&Token> {
        self.tokens
            .iter()
            .filter(|token| include_ignored || !token.is_ignored())
            .collect()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Concatenate the text of every token.
    ///
    /// For lexer output this is the exact input text; synthetic tokens contribute nothing.
    pub fn render(&self) -> String {
        self.tokens.iter().map(Token::text).collect()
    }

    /// Cut the sequence at every token whose identity is in `identities`.
    ///
    /// With `separator_starts_new_segment` the matching token opens the next segment,
    /// otherwise it closes the current one. Empty segments are dropped; without any match
    /// the whole sequence comes back as a single segment.
    pub fn split_by(
        &self,
        identities: &[TokenIdentity],
        separator_starts_new_segment: bool,
    ) -> Vec<TokenSequence> {
        let mut segments = Vec::new();
        let mut current: Vec<Token> = Vec::new();

        for token in &self.tokens {
            let is_separator = token.has_any_identity(identities);
            if is_separator && separator_starts_new_segment {
                if !current.is_empty() {
                    segments.push(TokenSequence::from_tokens(std::mem::take(&mut current)));
                }
                current.push(token.clone());
            } else if is_separator {
                current.push(token.clone());
                segments.push(TokenSequence::from_tokens(std::mem::take(&mut current)));
            } else {
                current.push(token.clone());
            }
        }
        if !current.is_empty() {
            segments.push(TokenSequence::from_tokens(current));
        }
        segments
    }

    /// Drop leading and trailing whitespace tokens.
    pub fn trim_whitespace(&self) -> TokenSequence {
        let start = self
            .tokens
            .iter()
            .position(|token| !token.is_whitespace())
            .unwrap_or(self.tokens.len());
        let end = self
            .tokens
            .iter()
            .rposition(|token| !token.is_whitespace())
            .map_or(start, |index| index + 1);
        TokenSequence::from_tokens(self.tokens[start..end].to_vec())
    }

    /// Identity names of the non-whitespace tokens, `?` for unrecognized ones.
    pub fn identities(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|token| !token.is_whitespace())
            .map(|token| token.identity_name().unwrap_or("?"))
            .collect()
    }

    /// Tokens the caller should report: anything not recognized cleanly.
    pub fn diagnostics(&self) -> Vec<&Token> {
        self.tokens
            .iter()
            .filter(|token| token.status() != Status::Ok)
            .collect()
    }

    pub fn count(&self, identity: &TokenIdentity) -> usize {
        self.tokens
            .iter()
            .filter(|token| token.has_identity(identity))
            .count()
    }

    pub fn find_first(&self, identity: &TokenIdentity) -> Option<TokenRef<'_>> {
        self.refs().find(|token| token.has_identity(identity))
    }
}

impl Serialize for TokenSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tokens.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// A handle on one token of a sequence, used for navigation.
#[derive(Debug, Clone, Copy)]
pub struct TokenRef<'a> {
    seq: &'a TokenSequence,
    index: usize,
}

impl<'a> TokenRef<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn token(&self) -> &'a Token {
        &self.seq.tokens[self.index]
    }

    pub fn sequence(&self) -> &'a TokenSequence {
        self.seq
    }

    /// Next token, skipping whitespace and ignored tokens.
    pub fn next(&self) -> Option<TokenRef<'a>> {
        self.seq.next_filtered[self.index].and_then(|index| self.seq.get(index))
    }

    /// Previous token, skipping whitespace and ignored tokens.
    pub fn previous(&self) -> Option<TokenRef<'a>> {
        self.seq.previous_filtered[self.index].and_then(|index| self.seq.get(index))
    }

    pub fn next_raw(&self) -> Option<TokenRef<'a>> {
        self.seq.get(self.index + 1)
    }

    pub fn previous_raw(&self) -> Option<TokenRef<'a>> {
        self.index.checked_sub(1).and_then(|index| self.seq.get(index))
    }

    /// Forward search (filtered, excluding this token) for the first token of `identity`.
    ///
    /// Exactly one of the callbacks runs.
    pub fn find_next<R>(
        &self,
        identity: &TokenIdentity,
        on_match: impl FnOnce(TokenRef<'a>) -> R,
        on_absent: impl FnOnce() -> R,
    ) -> R {
        match self.find_next_of(std::slice::from_ref(identity)) {
            Some(found) => on_match(found),
            None => on_absent(),
        }
    }

    pub fn find_next_of(&self, identities: &[TokenIdentity]) -> Option<TokenRef<'a>> {
        let mut cursor = self.next();
        while let Some(current) = cursor {
            if current.has_any_identity(identities) {
                return Some(current);
            }
            cursor = current.next();
        }
        None
    }
}

impl<'a> Deref for TokenRef<'a> {
    type Target = Token;

    fn deref(&self) -> &Token {
        self.token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tac::identity::{
        END_TOKEN, FORECAST_CHANGE_INDICATOR, ISSUE_TIME, TAF_START, VALID_TIME,
    };
    use crate::tac::token::Status;

    fn word(text: &str, identity: TokenIdentity) -> Token {
        Token::identified(text, identity)
    }

    fn taf_sequence() -> TokenSequence {
        let mut builder = SequenceBuilder::new();
        builder
            .append(Token::whitespace("\n"))
            .append(word("TAF", TAF_START))
            .append(Token::whitespace(" "))
            .append(word("011733Z", ISSUE_TIME))
            .append(Token::whitespace(" "))
            .append(word("BECMG", FORECAST_CHANGE_INDICATOR))
            .append(Token::whitespace(" "))
            .append(word("0118/0218", VALID_TIME))
            .append(word("=", END_TOKEN))
            .append(Token::whitespace("\n"));
        builder.build()
    }

    #[test]
    fn test_render_concatenates_text() {
        assert_eq!(taf_sequence().render(), "\nTAF 011733Z BECMG 0118/0218=\n");
    }

    #[test]
    fn test_filtered_and_raw_navigation() {
        let seq = taf_sequence();
        let first = seq.first_filtered().unwrap();
        assert!(first.has_identity(&TAF_START));
        assert_eq!(first.index(), 1);

        let next = first.next().unwrap();
        assert!(next.has_identity(&ISSUE_TIME));
        assert!(first.next_raw().unwrap().is_whitespace());
        assert_eq!(next.previous().unwrap().index(), first.index());
        assert!(next.previous_raw().unwrap().is_whitespace());

        let end = seq.find_first(&END_TOKEN).unwrap();
        assert!(end.next().is_none());
        assert!(end.next_raw().unwrap().is_whitespace());
        assert!(seq.first().unwrap().previous_raw().is_none());
    }

    #[test]
    fn test_ignored_tokens_are_skipped_by_filtered_navigation() {
        let mut hidden = word("EXTRA", ISSUE_TIME);
        hidden.set_ignored(true);
        let seq = SequenceBuilder::from_tokens(vec![
            word("TAF", TAF_START),
            hidden,
            word("0118/0218", VALID_TIME),
        ])
        .build();

        let first = seq.first().unwrap();
        assert_eq!(first.next().unwrap().index(), 2);
        assert_eq!(first.next_raw().unwrap().index(), 1);
        assert_eq!(seq.tokens(false).len(), 2);
        assert_eq!(seq.tokens(true).len(), 3);
    }

    #[test]
    fn test_find_next_calls_exactly_one_callback() {
        let seq = taf_sequence();
        let start = seq.first_filtered().unwrap();
        let found = start.find_next(&VALID_TIME, |t| Some(t.text().to_string()), || None);
        assert_eq!(found.as_deref(), Some("0118/0218"));

        let absent = start.find_next(&TAF_START, |_| "match", || "absent");
        assert_eq!(absent, "absent");
    }

    #[test]
    fn test_split_separator_starts_new_segment() {
        let seq = taf_sequence();
        let segments = seq.split_by(&[FORECAST_CHANGE_INDICATOR], true);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].render(), "\nTAF 011733Z ");
        assert_eq!(segments[1].render(), "BECMG 0118/0218=\n");
    }

    #[test]
    fn test_split_separator_closes_segment() {
        let seq = taf_sequence();
        let segments = seq.split_by(&[FORECAST_CHANGE_INDICATOR], false);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].render(), "\nTAF 011733Z BECMG");
        assert_eq!(segments[1].render(), " 0118/0218=\n");
    }

    #[test]
    fn test_split_drops_empty_segments() {
        let seq = taf_sequence();
        // The end token is followed only by whitespace, the leading one opens the sequence
        let closing = seq.split_by(&[END_TOKEN], false);
        assert_eq!(closing.len(), 2);
        assert_eq!(closing[1].render(), "\n");

        let only = SequenceBuilder::from_tokens(vec![word("=", END_TOKEN)]).build();
        assert_eq!(only.split_by(&[END_TOKEN], true).len(), 1);
        assert_eq!(only.split_by(&[END_TOKEN], false).len(), 1);
    }

    #[test]
    fn test_split_without_match_returns_whole_sequence() {
        let seq = taf_sequence();
        let segments = seq.split_by(&[TokenIdentity::ad_hoc("NOPE")], true);
        assert_eq!(segments, vec![seq.clone()]);
    }

    #[test]
    fn test_trim_whitespace() {
        let trimmed = taf_sequence().trim_whitespace();
        assert_eq!(trimmed.render(), "TAF 011733Z BECMG 0118/0218=");

        let blank = SequenceBuilder::from_tokens(vec![Token::whitespace("  ")]).build();
        assert!(blank.trim_whitespace().is_empty());
    }

    #[test]
    fn test_identities_and_diagnostics() {
        let mut builder = SequenceBuilder::new();
        builder
            .append(word("TAF", TAF_START))
            .append(Token::whitespace(" "))
            .append(Token::new("XYZZY"));
        let seq = builder.build();
        assert_eq!(seq.identities(), vec!["TAF_START", "?"]);
        let diagnostics = seq.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].status(), Status::Unrecognized);
    }
}
