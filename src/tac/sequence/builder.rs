//! Sequence builder
//!
//! The mutable counterpart of [TokenSequence]. The lexer and the reconstructors accumulate
//! tokens here and call [SequenceBuilder::build] once; the resulting sequence has no
//! mutation methods.

use super::TokenSequence;
use crate::tac::token::Token;

#[derive(Debug, Clone, Default)]
pub struct SequenceBuilder {
    tokens: Vec<Token>,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn append(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn append_all(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append copies of every token of `sequence`.
    pub fn append_sequence(&mut self, sequence: &TokenSequence) -> &mut Self {
        self.tokens.extend(sequence.iter().cloned());
        self
    }

    pub fn remove_last(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Token> {
        self.tokens.last_mut()
    }

    /// Remove trailing whitespace tokens, returning how many were removed.
    pub fn trim_trailing_whitespace(&mut self) -> usize {
        let mut removed = 0;
        while self.tokens.last().is_some_and(Token::is_whitespace) {
            self.tokens.pop();
            removed += 1;
        }
        removed
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Length in characters of the text after the last line break.
    pub fn current_line_width(&self) -> usize {
        let mut width = 0;
        for token in self.tokens.iter().rev() {
            match token.text().rfind('\n') {
                Some(newline) => return width + token.text()[newline + 1..].chars().count(),
                None => width += token.text().chars().count(),
            }
        }
        width
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn build(self) -> TokenSequence {
        TokenSequence::from_tokens(self.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tac::identity::END_TOKEN;

    #[test]
    fn test_append_and_remove_last() {
        let mut builder = SequenceBuilder::new();
        builder.append(Token::new("TAF")).append(Token::whitespace(" "));
        assert_eq!(builder.len(), 2);
        assert!(builder.last().unwrap().is_whitespace());

        let removed = builder.remove_last().unwrap();
        assert_eq!(removed.text(), " ");
        assert_eq!(builder.last().unwrap().text(), "TAF");
    }

    #[test]
    fn test_current_line_width() {
        let mut builder = SequenceBuilder::new();
        assert_eq!(builder.current_line_width(), 0);
        builder
            .append(Token::new("SWX ADVISORY"))
            .append(Token::whitespace("\n"))
            .append(Token::new("DTG:"))
            .append(Token::whitespace("  "));
        assert_eq!(builder.current_line_width(), 6);
    }

    #[test]
    fn test_trim_trailing_whitespace() {
        let mut builder = SequenceBuilder::from_tokens(vec![
            Token::identified("=", END_TOKEN),
            Token::whitespace(" "),
            Token::whitespace("\n"),
        ]);
        assert_eq!(builder.trim_trailing_whitespace(), 2);
        assert_eq!(builder.trim_trailing_whitespace(), 0);
        assert_eq!(builder.build().render(), "=");
    }
}
