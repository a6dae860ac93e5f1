//! Recognizer chains
//!
//!     A recognizer is a data record: the identity it assigns, an anchored regular expression,
//!     a priority, a certainty, the message families it belongs to, an optional anchor
//!     ("must follow one of these identities") and an action. The tables live in the family
//!     modules below; one generic driver ([RecognizerChain::run]) applies them.
//!
//! The Driver Loop
//!
//!     For each unclassified word, left to right:
//!
//!         1. The regexes are tried in descending priority against the text starting at the
//!            word. A match only counts when it ends exactly where some word of the current
//!            unclassified run ends. Multi-word matches merge the covered tokens, including
//!            the whitespace between them, into a single token.
//!         2. The first valid match identifies the token.
//!         3. The recognizers after it may still re-identify the token when they match its
//!            exact text, subject to the token's override rule.
//!         4. A word nothing matches stays unrecognized.
//!
//!     Label recognizers ([Action::SplitLabel]) may end inside a word: `DTG:20161108/0100Z`
//!     becomes the label `DTG:` followed by an unclassified remainder, which the loop visits
//!     next.
//!
//! Anchors
//!
//!     [Anchor::After] looks at the previous token through raw navigation. Plain whitespace is
//!     stepped over; a synthetic or ignored token breaks adjacency. [Anchor::MessageStart]
//!     accepts the first token of the text, a token following a bulletin heading or a token
//!     following an end marker.

pub mod advisory;
pub mod common;
pub mod metar;
pub mod sigmet;
pub mod taf;

use crate::tac::identity::{ParamName, Tag, TokenIdentity};
use crate::tac::model::MessageType;
use crate::tac::token::{ParamValue, Status, Token};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::ops::Range;
use tracing::{trace, warn};

/// Parameters, status and message extracted from a match.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub params: Vec<(ParamName, ParamValue)>,
    pub status: Status,
    pub message: Option<String>,
}

impl Extraction {
    pub fn ok() -> Self {
        Self {
            params: Vec::new(),
            status: Status::Ok,
            message: None,
        }
    }

    pub fn param(mut self, name: ParamName, value: impl Into<ParamValue>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    pub fn param_opt<V: Into<ParamValue>>(self, name: ParamName, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    /// Flag the token as syntactically wrong, keeping the first message recorded.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if self.status != Status::SyntaxError {
            self.status = Status::SyntaxError;
            self.message = Some(message.into());
        }
        self
    }

    pub fn warning(mut self, message: impl Into<String>) -> Self {
        if self.status == Status::Ok {
            self.status = Status::Warning;
            self.message = Some(message.into());
        }
        self
    }
}

pub type Extractor = fn(&Captures) -> Extraction;

pub fn no_params(_: &Captures) -> Extraction {
    Extraction::ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Identify,
    /// Cut a label prefix off a longer word; the rest stays unclassified.
    SplitLabel,
}

#[derive(Debug, Clone)]
pub enum Anchor {
    Anywhere,
    MessageStart,
    After(Vec<TokenIdentity>),
}

pub struct Recognizer {
    name: &'static str,
    identity: TokenIdentity,
    pattern: Regex,
    priority: i32,
    certainty: f64,
    families: &'static [MessageType],
    anchor: Anchor,
    action: Action,
    extractor: Extractor,
}

impl Recognizer {
    /// A recognizer with priority 0, certainty 1.0, no anchor and no parameters.
    ///
    /// Patterns are anchored at the start of the examined text.
    pub fn new(
        name: &'static str,
        identity: TokenIdentity,
        families: &'static [MessageType],
        pattern: &str,
    ) -> Self {
        let anchored = format!("^(?:{})", pattern);
        Self {
            name,
            identity,
            pattern: Regex::new(&anchored).expect("recognizer patterns are valid"),
            priority: 0,
            certainty: 1.0,
            families,
            anchor: Anchor::Anywhere,
            action: Action::Identify,
            extractor: no_params,
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn certainty(mut self, certainty: f64) -> Self {
        self.certainty = certainty;
        self
    }

    pub fn after(mut self, identities: &[TokenIdentity]) -> Self {
        self.anchor = Anchor::After(identities.to_vec());
        self
    }

    pub fn at_message_start(mut self) -> Self {
        self.anchor = Anchor::MessageStart;
        self
    }

    pub fn extract(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn split_label(mut self) -> Self {
        self.action = Action::SplitLabel;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn identity(&self) -> &TokenIdentity {
        &self.identity
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn belongs_to(&self, family: MessageType) -> bool {
        self.families.contains(&family)
    }

    fn extraction(&self, captures: &Captures) -> Extraction {
        (self.extractor)(captures)
    }
}

/// Every recognizer, highest priority first. Ties keep table order.
static ALL: Lazy<Vec<Recognizer>> = Lazy::new(|| {
    let mut all = Vec::new();
    all.extend(common::recognizers());
    all.extend(metar::recognizers());
    all.extend(taf::recognizers());
    all.extend(sigmet::recognizers());
    all.extend(advisory::recognizers());
    all.sort_by_key(|recognizer| std::cmp::Reverse(recognizer.priority));
    all
});

static CHAINS: Lazy<HashMap<MessageType, Vec<&'static Recognizer>>> = Lazy::new(|| {
    MessageType::ALL
        .into_iter()
        .map(|family| {
            let chain = ALL
                .iter()
                .filter(|recognizer| recognizer.belongs_to(family))
                .collect();
            (family, chain)
        })
        .collect()
});

/// All recognizers of every family, highest priority first.
pub fn all_recognizers() -> &'static [Recognizer] {
    &ALL
}

/// The ordered recognizers of one message family.
pub struct RecognizerChain {
    family: MessageType,
    recognizers: &'static [&'static Recognizer],
}

impl RecognizerChain {
    pub fn for_family(family: MessageType) -> Self {
        let recognizers = CHAINS.get(&family).map(Vec::as_slice).unwrap_or(&[]);
        Self {
            family,
            recognizers,
        }
    }

    pub fn family(&self) -> MessageType {
        self.family
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    /// Classify the unrecognized words of `tokens`, which must carry spans into `source`.
    pub fn run(&self, source: &str, mut tokens: Vec<Token>) -> Vec<Token> {
        let mut index = 0;
        while index < tokens.len() {
            if !tokens[index].is_recognized() {
                self.classify(source, &mut tokens, index);
            }
            index += 1;
        }
        tokens
    }

    fn classify(&self, source: &str, tokens: &mut Vec<Token>, index: usize) {
        let run = unclassified_run(tokens, index);
        let Some(last) = run.last() else {
            return;
        };
        let start = span_of(&tokens[index]).start;
        let text = &source[start..last.end];

        for (position, recognizer) in self.recognizers.iter().enumerate() {
            if !anchor_holds(&recognizer.anchor, tokens, index) {
                continue;
            }
            let Some(captures) = recognizer.pattern.captures(text) else {
                continue;
            };
            let Some(matched) = captures.get(0) else {
                continue;
            };
            if matched.is_empty() {
                continue;
            }
            let end = start + matched.end();

            let merged = match (run.iter().find(|word| word.end == end), recognizer.action) {
                (Some(word), _) => merge(source, tokens, index, word.index),
                (None, Action::SplitLabel) => {
                    match run.iter().find(|word| word.start < end && end < word.end) {
                        Some(word) => split_label(source, tokens, index, word.index, end),
                        None => continue,
                    }
                }
                (None, Action::Identify) => continue,
            };
            if !merged {
                continue;
            }

            trace!(
                recognizer = recognizer.name,
                text = tokens[index].text(),
                "recognized"
            );
            apply(recognizer, &recognizer.extraction(&captures), &mut tokens[index]);
            self.reclassify(tokens, index, position + 1);
            return;
        }
    }

    /// Offer the token to the recognizers after `from` that match its exact text.
    fn reclassify(&self, tokens: &mut [Token], index: usize, from: usize) {
        for recognizer in &self.recognizers[from..] {
            if !anchor_holds(&recognizer.anchor, tokens, index) {
                continue;
            }
            let text = tokens[index].text().to_string();
            let Some(captures) = recognizer.pattern.captures(&text) else {
                continue;
            };
            if captures.get(0).map(|m| m.end()) != Some(text.len()) {
                continue;
            }
            if tokens[index].accepts_identification(recognizer.certainty) {
                trace!(recognizer = recognizer.name, text = %text, "re-identified");
                apply(recognizer, &recognizer.extraction(&captures), &mut tokens[index]);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RunWord {
    index: usize,
    start: usize,
    end: usize,
}

fn span_of(token: &Token) -> Range<usize> {
    token.span().cloned().unwrap_or(0..0)
}

/// Longest word count a single pattern can span. The longest in the tables is a four-part
/// space weather effect (`HF COM MOD AND SATCOM MOD AND GNSS MOD AND RADIATION MOD`).
const MAX_RUN_WORDS: usize = 16;

/// The words of the unclassified run starting at `index`, up to the next recognized word and
/// at most [MAX_RUN_WORDS] long.
fn unclassified_run(tokens: &[Token], index: usize) -> Vec<RunWord> {
    let mut run = Vec::with_capacity(MAX_RUN_WORDS);
    for (offset, token) in tokens[index..].iter().enumerate() {
        if token.is_whitespace() {
            continue;
        }
        if token.is_recognized() || run.len() == MAX_RUN_WORDS {
            break;
        }
        let span = span_of(token);
        run.push(RunWord {
            index: index + offset,
            start: span.start,
            end: span.end,
        });
    }
    run
}

/// Replace tokens `first..=last` with one unrecognized token covering their text.
fn merge(source: &str, tokens: &mut Vec<Token>, first: usize, last: usize) -> bool {
    if first == last {
        return true;
    }
    let span = span_of(&tokens[first]).start..span_of(&tokens[last]).end;
    let merged = Token::new(&source[span.clone()]).with_span(span);
    tokens.splice(first..=last, [merged]);
    true
}

/// Merge `first..word` plus the head of `word` up to `cut`, keeping the tail as a new word.
fn split_label(
    source: &str,
    tokens: &mut Vec<Token>,
    first: usize,
    word: usize,
    cut: usize,
) -> bool {
    let word_span = span_of(&tokens[word]);
    if !source.is_char_boundary(cut) {
        return false;
    }
    let label_span = span_of(&tokens[first]).start..cut;
    let label = Token::new(&source[label_span.clone()]).with_span(label_span);
    let rest = Token::new(&source[cut..word_span.end]).with_span(cut..word_span.end);
    tokens.splice(first..=word, [label, rest]);
    true
}

fn apply(recognizer: &Recognizer, extraction: &Extraction, token: &mut Token) {
    let identified = token.identify(
        recognizer.identity.clone(),
        extraction.status,
        extraction.message.clone(),
        recognizer.certainty,
    );
    match identified {
        Ok(true) => {
            for (name, value) in &extraction.params {
                if let Err(error) = token.set_param(*name, value.clone()) {
                    warn!(recognizer = recognizer.name, %error, "parameter not stored");
                }
            }
        }
        Ok(false) => {}
        Err(error) => warn!(recognizer = recognizer.name, %error, "identification rejected"),
    }
}

/// The previous non-whitespace token, or `None` when adjacency is broken or absent.
fn previous_word(tokens: &[Token], index: usize) -> Option<&Token> {
    for token in tokens[..index].iter().rev() {
        if token.is_synthetic() || token.is_ignored() {
            return None;
        }
        if !token.is_whitespace() {
            return Some(token);
        }
    }
    None
}

fn anchor_holds(anchor: &Anchor, tokens: &[Token], index: usize) -> bool {
    match anchor {
        Anchor::Anywhere => true,
        Anchor::After(identities) => {
            previous_word(tokens, index).is_some_and(|token| token.has_any_identity(identities))
        }
        Anchor::MessageStart => {
            let has_predecessor = tokens[..index].iter().any(|token| !token.is_whitespace());
            match previous_word(tokens, index) {
                None => !has_predecessor,
                Some(token) => token.identity().is_some_and(|identity| {
                    identity.is_end() || identity.has_tag(Tag::BulletinHeading)
                }),
            }
        }
    }
}

/// Integer value of a named capture group.
pub(crate) fn int(captures: &Captures, group: &str) -> Option<i64> {
    captures.name(group).and_then(|m| m.as_str().parse().ok())
}

pub(crate) fn text(captures: &Captures, group: &str) -> Option<String> {
    captures.name(group).map(|m| m.as_str().to_string())
}

/// Store day, hour and minute groups, flagging values outside the calendar.
pub(crate) fn day_hour_minute(
    mut extraction: Extraction,
    captures: &Captures,
    slots: [(&str, ParamName); 3],
) -> Extraction {
    let limits = [("day", 1, 31), ("hour", 0, 24), ("minute", 0, 59)];
    for ((group, slot), (what, low, high)) in slots.into_iter().zip(limits) {
        if let Some(value) = int(captures, group) {
            if value < low || value > high {
                extraction = extraction.error(format!("invalid {} {:02}", what, value));
            }
            extraction = extraction.param(slot, value);
        }
    }
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tac::identity::{
        AERODROME_DESIGNATOR, END_TOKEN, FIR_DESIGNATOR, MWO_DESIGNATOR, REMARK,
        SIGMET_FIR_NAME_WORD, SWX_EFFECT, WHITE_SPACE,
    };

    fn words(source: &str) -> Vec<Token> {
        crate::tac::lexing::base_tokenization::tokenize(source)
            .into_iter()
            .map(|(kind, span)| {
                let text = &source[span.clone()];
                match kind {
                    crate::tac::lexing::base_tokenization::RawToken::Whitespace => {
                        Token::whitespace(text).with_span(span)
                    }
                    crate::tac::lexing::base_tokenization::RawToken::EndMarker => {
                        Token::identified(text, END_TOKEN).with_span(span)
                    }
                    crate::tac::lexing::base_tokenization::RawToken::Word => {
                        Token::new(text).with_span(span)
                    }
                }
            })
            .collect()
    }

    #[test]
    fn test_priority_order_is_descending() {
        let priorities: Vec<i32> = all_recognizers().iter().map(|r| r.priority).collect();
        assert!(priorities.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn test_every_family_has_a_chain() {
        for family in MessageType::ALL {
            assert!(!RecognizerChain::for_family(family).is_empty(), "{}", family);
        }
    }

    #[test]
    fn test_multi_word_match_merges_tokens() {
        let source = "EHAA SIGMET M03=";
        let tokens = RecognizerChain::for_family(MessageType::Sigmet).run(source, words(source));
        assert_eq!(tokens[0].text(), "EHAA SIGMET");
        assert_eq!(tokens[0].span(), Some(&(0..11)));
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_match_must_end_at_word_end() {
        // The aerodrome pattern would match "EFHKX" partially; it must not split the word
        let source = "TAF EFHKX 011733Z=";
        let tokens = RecognizerChain::for_family(MessageType::Taf).run(source, words(source));
        assert_eq!(tokens[2].text(), "EFHKX");
        assert!(!tokens[2].is_recognized());
    }

    #[test]
    fn test_label_split() {
        let source = "DTG:20161108/0100Z";
        let tokens = RecognizerChain::for_family(MessageType::SpaceWeatherAdvisory)
            .run(source, words(source));
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].identity_name(), Some("DTG_ISSUE_TIME_LABEL"));
        assert_eq!(tokens[1].text(), "20161108/0100Z");
        assert_eq!(tokens[1].identity_name(), Some("ADVISORY_ISSUE_TIME"));
    }

    #[test]
    fn test_synthetic_token_breaks_adjacency() {
        let mut tokens = vec![
            Token::identified("EHDB-", MWO_DESIGNATOR),
            Token::synthetic(WHITE_SPACE, Status::Ok, "inserted"),
            Token::whitespace(" "),
            Token::new("EHAA"),
        ];
        let anchor = Anchor::After(vec![MWO_DESIGNATOR]);
        assert!(!anchor_holds(&anchor, &tokens, 3));

        tokens.remove(1);
        assert!(anchor_holds(&anchor, &tokens, 2));
        assert!(!anchor_holds(&Anchor::After(vec![FIR_DESIGNATOR]), &tokens, 2));
    }

    #[test]
    fn test_message_start_anchor() {
        let tokens = vec![
            Token::whitespace("\n"),
            Token::new("METAR"),
            Token::whitespace(" "),
            Token::new("EFHK"),
        ];
        assert!(anchor_holds(&Anchor::MessageStart, &tokens, 1));
        assert!(!anchor_holds(&Anchor::MessageStart, &tokens, 3));
    }

    /// A chain over hand-written recognizers, in the given order.
    fn chain_of(recognizers: Vec<Recognizer>) -> RecognizerChain {
        let recognizers: Vec<&'static Recognizer> = recognizers
            .into_iter()
            .map(|recognizer| &*Box::leak(Box::new(recognizer)))
            .collect();
        RecognizerChain {
            family: MessageType::Generic,
            recognizers: Box::leak(recognizers.into_boxed_slice()),
        }
    }

    fn value(captures: &Captures) -> Extraction {
        Extraction::ok().param(ParamName::Value, &captures[0])
    }

    #[test]
    fn test_tentative_token_is_reidentified_by_later_recognizer() {
        let chain = chain_of(vec![
            Recognizer::new("name word", SIGMET_FIR_NAME_WORD, &[], r"[A-Z]+")
                .certainty(0.8)
                .extract(value),
            Recognizer::new("remark", REMARK, &[], "ICING").certainty(0.5),
        ]);
        let source = "ICING OTHER";
        let tokens = chain.run(source, words(source));

        assert_eq!(tokens[0].identity_name(), Some("REMARK"));
        assert_eq!(tokens[0].certainty(), 0.5);
        // Parameters declared by the new identity are kept
        assert_eq!(tokens[0].param(ParamName::Value), Some(&"ICING".into()));
        // Only exact matches re-identify
        assert_eq!(tokens[2].identity_name(), Some("SIGMET_FIR_NAME_WORD"));
    }

    #[test]
    fn test_certain_token_is_not_reidentified() {
        let chain = chain_of(vec![
            Recognizer::new("aerodrome", AERODROME_DESIGNATOR, &[], r"[A-Z]{4}").extract(value),
            Recognizer::new("remark", REMARK, &[], r"\S+")
                .certainty(0.5)
                .extract(value),
            Recognizer::new("name word", SIGMET_FIR_NAME_WORD, &[], "EFHK"),
        ]);
        let source = "EFHK";
        let tokens = chain.run(source, words(source));

        assert_eq!(tokens[0].identity_name(), Some("AERODROME_DESIGNATOR"));
        assert_eq!(tokens[0].certainty(), 1.0);
        assert_eq!(tokens[0].param(ParamName::Value), Some(&"EFHK".into()));
    }

    #[test]
    fn test_tentative_token_refuses_certain_reidentification() {
        let chain = chain_of(vec![
            Recognizer::new("remark", REMARK, &[], r"\S+")
                .certainty(0.5)
                .extract(value),
            Recognizer::new("aerodrome", AERODROME_DESIGNATOR, &[], r"[A-Z]{4}"),
        ]);
        let source = "EFHK";
        let tokens = chain.run(source, words(source));

        assert_eq!(tokens[0].identity_name(), Some("REMARK"));
        assert_eq!(tokens[0].param(ParamName::Value), Some(&"EFHK".into()));
    }

    #[test]
    fn test_unclassified_run_is_bounded() {
        let source = "XQZ1 ".repeat(100);
        let tokens = words(&source);
        assert_eq!(unclassified_run(&tokens, 0).len(), MAX_RUN_WORDS);
        assert_eq!(unclassified_run(&tokens, 190).len(), 5);
    }

    #[test]
    fn test_longest_effect_fits_in_a_run() {
        let source = "SWX EFFECT: HF COM MOD AND SATCOM MOD AND GNSS MOD AND RADIATION MOD=";
        let tokens = RecognizerChain::for_family(MessageType::SpaceWeatherAdvisory)
            .run(source, words(source));
        let effect = tokens
            .iter()
            .find(|token| token.has_identity(&SWX_EFFECT))
            .expect("effect recognized");
        assert_eq!(
            effect.text(),
            "HF COM MOD AND SATCOM MOD AND GNSS MOD AND RADIATION MOD"
        );
    }

    #[test]
    fn test_extraction_keeps_first_error() {
        let extraction = Extraction::ok()
            .warning("odd")
            .error("invalid day 35")
            .error("invalid hour 25");
        assert_eq!(extraction.status, Status::SyntaxError);
        assert_eq!(extraction.message.as_deref(), Some("invalid day 35"));
    }
}
