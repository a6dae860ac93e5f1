//! Bulletins
//!
//!     A bulletin is a heading row (`FTFI33 EFPP 020500`) followed by one or more messages.
//!     Each contained message is wrapped into bulletin rows on its own, see [wrapping].

pub mod wrapping;

pub use wrapping::{wrap_message, wrap_to_width, MAX_ROW_LENGTH};

use crate::tac::sequence::TokenSequence;

#[derive(Debug, Clone, PartialEq)]
pub struct Bulletin {
    heading: String,
    messages: Vec<TokenSequence>,
    row_length: usize,
}

impl Bulletin {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            messages: Vec::new(),
            row_length: MAX_ROW_LENGTH,
        }
    }

    /// Wrap messages to `row_length` characters instead of [MAX_ROW_LENGTH].
    pub fn with_row_length(mut self, row_length: usize) -> Self {
        self.row_length = row_length;
        self
    }

    pub fn with_message(mut self, message: TokenSequence) -> Self {
        self.messages.push(message);
        self
    }

    pub fn add_message(&mut self, message: TokenSequence) {
        self.messages.push(message);
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn messages(&self) -> &[TokenSequence] {
        &self.messages
    }

    /// The heading row, then every message wrapped and starting on a row of its own.
    pub fn render(&self) -> String {
        let mut rows = vec![self.heading.trim().to_string()];
        rows.extend(
            self.messages
                .iter()
                .map(|message| wrap_to_width(message, self.row_length).render()),
        );
        rows.join("\n")
    }
}
