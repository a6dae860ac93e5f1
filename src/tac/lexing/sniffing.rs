//! Message type sniffing
//!
//!     Decides which family's recognizer chain to run without running any of them. Only the
//!     start markers and the bulletin heading data designators are tried, near the front of
//!     the text:
//!
//!         1. the `contained_message_type` hint wins outright;
//!         2. a start marker among the first words decides the family;
//!         3. a bulletin heading (in the text or in the `bulletin_heading` hint) decides by
//!            its `TT` data type designators, GENERIC when those are not a known family;
//!         4. otherwise the type is unknown.

use super::base_tokenization::{tokenize, RawToken};
use super::recognizers::common::{family_for_data_type, DATA_DESIGNATORS_PATTERN};
use super::recognizers::all_recognizers;
use crate::tac::hints::ConversionHints;
use crate::tac::identity::{
    AIRMET_START, METAR_START, SIGMET_START, SPACE_WEATHER_ADVISORY_START, SPECI_START,
    TAF_START, VOLCANIC_ASH_ADVISORY_START,
};
use crate::tac::identity::{Tag, TokenIdentity};
use crate::tac::model::MessageType;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// How many words from the front of the text are examined for a start marker.
pub const SNIFF_WINDOW: usize = 8;

static DATA_DESIGNATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{}\b", DATA_DESIGNATORS_PATTERN))
        .expect("data designator pattern is valid")
});

/// The family a message start identity opens.
pub fn family_of_start(identity: &TokenIdentity) -> Option<MessageType> {
    if identity == &METAR_START || identity == &SPECI_START {
        Some(MessageType::Metar)
    } else if identity == &TAF_START {
        Some(MessageType::Taf)
    } else if identity == &SIGMET_START {
        Some(MessageType::Sigmet)
    } else if identity == &AIRMET_START {
        Some(MessageType::Airmet)
    } else if identity == &SPACE_WEATHER_ADVISORY_START {
        Some(MessageType::SpaceWeatherAdvisory)
    } else if identity == &VOLCANIC_ASH_ADVISORY_START {
        Some(MessageType::VolcanicAshAdvisory)
    } else {
        None
    }
}

/// The family of the start marker beginning at the front of `text`, if any.
///
/// The marker must end at a word boundary.
fn start_marker_at(text: &str) -> Option<MessageType> {
    all_recognizers()
        .iter()
        .filter(|recognizer| recognizer.identity().has_tag(Tag::MessageStart))
        .find_map(|recognizer| {
            let matched = recognizer.pattern().find(text)?;
            let rest = &text[matched.end()..];
            let at_boundary = rest
                .chars()
                .next()
                .map_or(true, |next| next.is_whitespace() || next == '=');
            if at_boundary {
                family_of_start(recognizer.identity())
            } else {
                None
            }
        })
}

fn heading_family(heading: &str) -> Option<MessageType> {
    let captures = DATA_DESIGNATORS.captures(heading.trim_start())?;
    let tt = captures.name("tt")?.as_str();
    Some(family_for_data_type(tt).unwrap_or(MessageType::Generic))
}

pub fn sniff_message_type(text: &str, hints: &ConversionHints) -> Option<MessageType> {
    if let Some(forced) = hints.contained_message_type {
        return Some(forced);
    }

    let words: Vec<usize> = tokenize(text)
        .into_iter()
        .filter(|(kind, _)| *kind == RawToken::Word)
        .map(|(_, span)| span.start)
        .take(SNIFF_WINDOW)
        .collect();

    if let Some(family) = words
        .iter()
        .find_map(|&start| start_marker_at(&text[start..]))
    {
        debug!(%family, "message type from start marker");
        return Some(family);
    }

    let heading = words
        .first()
        .and_then(|&start| heading_family(&text[start..]))
        .or_else(|| hints.bulletin_heading.as_deref().and_then(heading_family));
    if let Some(family) = heading {
        debug!(%family, "message type from bulletin heading");
    }
    heading
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("METAR EFHK 011750Z 24005KT CAVOK=", Some(MessageType::Metar))]
    #[case("SPECI EFHK 011750Z 24005KT=", Some(MessageType::Metar))]
    #[case("TAF EFHK 011733Z 0118/0218 CAVOK=", Some(MessageType::Taf))]
    #[case("EHAA SIGMET M03 VALID 271330/271530 EHDB-", Some(MessageType::Sigmet))]
    #[case("EFIN AIRMET 1 VALID 101200/101600 EFHK-", Some(MessageType::Airmet))]
    #[case("SWX ADVISORY\nDTG: 20161108/0100Z", Some(MessageType::SpaceWeatherAdvisory))]
    #[case("VA ADVISORY\nDTG: 20080923/0130Z", Some(MessageType::VolcanicAshAdvisory))]
    #[case("FTFI33 EFPP 020500\nTAF EFHK 020532Z 0206/0306 CAVOK=", Some(MessageType::Taf))]
    #[case("FTFI33 EFPP 020500\nEFHK 020532Z 0206/0306 CAVOK=", Some(MessageType::Taf))]
    #[case("UKFI33 EFPP 020500\nSOMETHING ELSE=", Some(MessageType::Generic))]
    #[case("HELLO WORLD", None)]
    #[case("", None)]
    fn test_sniff(#[case] text: &str, #[case] expected: Option<MessageType>) {
        assert_eq!(
            sniff_message_type(text, &ConversionHints::default()),
            expected
        );
    }

    #[test]
    fn test_contained_message_type_hint_wins() {
        let hints = ConversionHints::default().with_message_type(MessageType::Airmet);
        assert_eq!(
            sniff_message_type("TAF EFHK=", &hints),
            Some(MessageType::Airmet)
        );
    }

    #[test]
    fn test_bulletin_heading_hint() {
        let hints = ConversionHints::default().with_bulletin_heading("WSFI31 EFKL 271300");
        assert_eq!(
            sniff_message_type("EFIN 271300Z=", &hints),
            Some(MessageType::Sigmet)
        );
    }

    #[test]
    fn test_marker_must_end_at_word_boundary() {
        assert_eq!(
            sniff_message_type("TAFFY EFHK=", &ConversionHints::default()),
            None
        );
    }
}
