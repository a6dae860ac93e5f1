//! Lexer
//!
//!     This module orchestrates lexing of TAC text into a [TokenSequence]. The pipeline is
//!     a short series of passes over a flat token vector, each pass receiving the tokens of
//!     the previous one:
//!
//!         1. Base tokenization using logos. See [base_tokenization]. Whitespace runs, `=`
//!            end markers and words become tokens carrying their byte spans. Whitespace
//!            tokens are identified as WHITE_SPACE and `=` as END_TOKEN right away.
//!
//!         2. Family selection. The `contained_message_type` hint, or else a sniff of the
//!            text (see [sniffing]), decides which recognizer chain runs. Unknown text is
//!            lexed with the GENERIC chain, which only knows the bulletin heading.
//!
//!         3. Recognition. See [recognizers]. Words are identified, multi-word groups are
//!            merged and labels are split.
//!
//!         4. Post-processing. Leading whitespace and the whitespace after the first end
//!            token are flagged ignored. When a known family's text has no end token, a
//!            synthetic END_TOKEN with status SYNTAX_ERROR is appended.
//!
//! Source Text Preservation
//!
//!     Lexing never drops, reorders or rewrites text: merged tokens cover exactly the text
//!     of the tokens they replace, and synthetic tokens have empty text. Rendering the
//!     result therefore reproduces the input, byte for byte, for any input. The whitespace
//!     passthrough hint has no effect here; it only tells reconstruction to reuse the
//!     whitespace recorded in these tokens.

pub mod base_tokenization;
pub mod recognizers;
pub mod sniffing;

pub use base_tokenization::{tokenize, RawToken};
pub use recognizers::RecognizerChain;
pub use sniffing::sniff_message_type;

use crate::tac::hints::ConversionHints;
use crate::tac::identity::END_TOKEN;
use crate::tac::model::MessageType;
use crate::tac::sequence::{SequenceBuilder, TokenSequence};
use crate::tac::token::{Status, Token};
use tracing::debug;

/// Lexes TAC text into token sequences.
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    hints: ConversionHints,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A lexer applying `hints` to every call of [Lexer::lex].
    pub fn with_hints(hints: ConversionHints) -> Self {
        Self { hints }
    }

    pub fn hints(&self) -> &ConversionHints {
        &self.hints
    }

    pub fn lex(&self, text: &str) -> TokenSequence {
        self.lex_with_hints(text, &self.hints)
    }

    pub fn lex_with_hints(&self, text: &str, hints: &ConversionHints) -> TokenSequence {
        let tokens = base_tokens(text);
        let family = sniff_message_type(text, hints);
        let chain = RecognizerChain::for_family(family.unwrap_or(MessageType::Generic));
        debug!(
            family = %chain.family(),
            sniffed = family.is_some(),
            tokens = tokens.len(),
            "lexing"
        );

        let mut tokens = chain.run(text, tokens);
        flag_ignored_whitespace(&mut tokens);
        if family.is_some_and(|family| family != MessageType::Generic)
            && !tokens.iter().any(|token| token.has_identity(&END_TOKEN))
        {
            debug!("no end token, appending a synthetic one");
            tokens.push(Token::synthetic(
                END_TOKEN,
                Status::SyntaxError,
                "message is not terminated with '='",
            ));
        }

        let sequence = SequenceBuilder::from_tokens(tokens).build();
        debug!(
            tokens = sequence.len(),
            unrecognized = sequence.diagnostics().len(),
            "lexed"
        );
        sequence
    }

    pub fn sniff_message_type(&self, text: &str, hints: &ConversionHints) -> Option<MessageType> {
        sniff_message_type(text, hints)
    }
}

fn base_tokens(text: &str) -> Vec<Token> {
    tokenize(text)
        .into_iter()
        .map(|(kind, span)| {
            let slice = &text[span.clone()];
            let token = match kind {
                RawToken::Whitespace => Token::whitespace(slice),
                RawToken::EndMarker => Token::identified(slice, END_TOKEN),
                RawToken::Word => Token::new(slice),
            };
            token.with_span(span)
        })
        .collect()
}

fn flag_ignored_whitespace(tokens: &mut [Token]) {
    for token in tokens.iter_mut() {
        if !token.is_whitespace() {
            break;
        }
        token.set_ignored(true);
    }
    if let Some(end) = tokens.iter().position(|token| token.has_identity(&END_TOKEN)) {
        for token in tokens[end + 1..].iter_mut().filter(|token| token.is_whitespace()) {
            token.set_ignored(true);
        }
    }
}

/// Lex `text` with default hints.
pub fn lex(text: &str) -> TokenSequence {
    Lexer::new().lex(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tac::identity::WHITE_SPACE;

    #[test]
    fn test_render_reproduces_input() {
        for text in ["", "   ", "TAF EFHK", "\n METAR  EFHK 011750Z=\r\n", "==", "ÄÖ ü="] {
            assert_eq!(lex(text).render(), text);
        }
    }

    #[test]
    fn test_missing_end_token_is_repaired() {
        let sequence = lex("METAR EFHK 011750Z");
        let last = sequence.last().unwrap();
        assert!(last.is_synthetic());
        assert!(last.has_identity(&END_TOKEN));
        assert_eq!(last.status(), Status::SyntaxError);
        assert_eq!(sequence.render(), "METAR EFHK 011750Z");
    }

    #[test]
    fn test_unknown_text_gets_no_synthetic_end() {
        let sequence = lex("HELLO WORLD");
        assert!(sequence.iter().all(|token| !token.is_synthetic()));
        assert_eq!(sequence.identities(), vec!["?", "?"]);
    }

    #[test]
    fn test_leading_and_trailing_whitespace_is_ignored() {
        let sequence = lex("\n\nMETAR EFHK 011750Z= \n");
        let tokens = sequence.tokens(true);
        assert!(tokens[0].is_ignored());
        assert!(tokens[0].has_identity(&WHITE_SPACE));
        assert!(!tokens[2].is_ignored());
        assert!(sequence.last().unwrap().is_ignored());
        assert_eq!(sequence.tokens(false).len(), sequence.len() - 2);
    }

    #[test]
    fn test_hints_override_sniffing() {
        let hints = ConversionHints::default().with_message_type(MessageType::Taf);
        let sequence = Lexer::new().lex_with_hints("EFHK 011733Z=", &hints);
        // Without TAF_START the aerodrome designator has nothing to follow
        assert_eq!(sequence.identities(), vec!["?", "?", "END_TOKEN"]);
    }

    #[test]
    fn test_lexing_is_deterministic() {
        let text = "TAF EFHK 011733Z 0118/0218 VRB02KT 4000 -SN BKN003=";
        assert_eq!(lex(text), lex(text));
    }
}
