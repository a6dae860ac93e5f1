//! Base tokenization
//!
//! This module provides the raw tokenization using the logos lexer library. Source text
//! becomes a stream of whitespace runs, end markers and words; nothing here knows about
//! message types. Recognizers operate on the stream produced by this function.

use logos::Logos;
use std::ops::Range;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken {
    #[regex(r"\s+")]
    Whitespace,

    #[token("=")]
    EndMarker,

    #[regex(r"[^\s=]+")]
    Word,
}

/// Tokenize text into raw tokens with their byte spans.
///
/// The spans cover the input without gaps. Input logos cannot classify is kept as a word
/// so no text is ever dropped.
pub fn tokenize(source: &str) -> Vec<(RawToken, Range<usize>)> {
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let kind = result.unwrap_or(RawToken::Word);
        tokens.push((kind, lexer.span()));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizes() {
        let tokens = tokenize("TAF EFHK=");
        assert_eq!(
            tokens,
            vec![
                (RawToken::Word, 0..3),
                (RawToken::Whitespace, 3..4),
                (RawToken::Word, 4..8),
                (RawToken::EndMarker, 8..9),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize(""), vec![]);
    }

    #[test]
    fn test_whitespace_runs_are_single_tokens() {
        let tokens = tokenize("EHDB-\r\n  EHAA");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], (RawToken::Whitespace, 5..9));
    }

    #[test]
    fn test_spans_cover_input() {
        let source = "  METAR EFHK 011750Z==\n\t";
        let tokens = tokenize(source);
        let mut position = 0;
        for (_, span) in &tokens {
            assert_eq!(span.start, position);
            position = span.end;
        }
        assert_eq!(position, source.len());
    }
}
