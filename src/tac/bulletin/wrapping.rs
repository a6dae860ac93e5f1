//! Row wrapping for bulletins
//!
//!     Bulletin rows stay below [MAX_ROW_LENGTH] characters. The words of a message are
//!     packed greedily, one space apart; a word that would reach the limit starts a new row
//!     indented with a single tab. The source whitespace is discarded, and the end token is
//!     attached to the last word without a space.

use crate::tac::sequence::{SequenceBuilder, TokenSequence};
use crate::tac::token::Token;

/// Maximum bulletin row width in characters.
pub const MAX_ROW_LENGTH: usize = 60;

/// Wrap `sequence` into rows shorter than [MAX_ROW_LENGTH] characters.
pub fn wrap_message(sequence: &TokenSequence) -> TokenSequence {
    wrap_to_width(sequence, MAX_ROW_LENGTH)
}

/// Wrap `sequence` into rows shorter than `width` characters.
///
/// A token that would bring the row, including the space in front of it, to `width`
/// characters or more moves to the next row.
pub fn wrap_to_width(sequence: &TokenSequence, width: usize) -> TokenSequence {
    let mut builder = SequenceBuilder::new();
    let mut chars_on_row = 0;
    let mut end = None;

    for token in sequence.iter() {
        if token.is_whitespace() {
            continue;
        }
        if token.identity().is_some_and(|identity| identity.is_end()) {
            end.get_or_insert_with(|| token.clone());
            continue;
        }
        let length = token.text().chars().count();
        if length == 0 {
            continue;
        }

        if chars_on_row > 0 && chars_on_row + 1 + length >= width {
            builder.trim_trailing_whitespace();
            builder.append(Token::whitespace("\n"));
            builder.append(Token::whitespace("\t"));
            chars_on_row = 0;
        } else if chars_on_row > 0 {
            builder.append(Token::whitespace(" "));
            chars_on_row += 1;
        }
        builder.append(token.clone());
        chars_on_row += length;
    }

    if let Some(end) = end {
        builder.trim_trailing_whitespace();
        builder.append(end);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tac::lexing::lex;

    fn words(lengths: &[usize]) -> String {
        lengths
            .iter()
            .enumerate()
            .map(|(index, length)| {
                let letter = char::from(b'A' + (index % 26) as u8);
                letter.to_string().repeat(*length)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_short_message_stays_on_one_row() {
        let wrapped = wrap_message(&lex("TAF   EFHK\n011733Z  0118/0218 CAVOK ="));
        assert_eq!(wrapped.render(), "TAF EFHK 011733Z 0118/0218 CAVOK=");
    }

    #[test]
    fn test_row_reaching_exactly_the_limit_breaks() {
        // 49 + space + 10 would make a 60 character row
        let text = words(&[49, 10]);
        let rendered = wrap_message(&lex(&text)).render();
        assert_eq!(rendered, format!("{}\n\t{}", "A".repeat(49), "B".repeat(10)));
    }

    #[test]
    fn test_row_one_short_of_the_limit_stays() {
        let text = words(&[48, 10]);
        let rendered = wrap_message(&lex(&text)).render();
        assert!(!rendered.contains('\n'));
        assert_eq!(rendered.len(), MAX_ROW_LENGTH - 1);
    }

    #[test]
    fn test_longer_token_moves_to_next_row() {
        let text = words(&[49, 11]);
        let rendered = wrap_message(&lex(&text)).render();
        let rows: Vec<&str> = rendered.split('\n').collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], format!("\t{}", "B".repeat(11)));
    }

    #[test]
    fn test_end_token_is_attached_without_space() {
        let text = format!("{} =", words(&[30, 30]));
        let rendered = wrap_message(&lex(&text)).render();
        assert_eq!(rendered, format!("{}\n\t{}=", "A".repeat(30), "B".repeat(30)));
    }
}
