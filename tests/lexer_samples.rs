//! Integration tests for the lexer using the sample library
//!
//! Every sample must render back to its source, and the identity listings of the
//! reference messages are pinned with snapshots.

use rstest::rstest;
use tac_parser::tac::formats::to_simple_listing;
use tac_parser::tac::identity::*;
use tac_parser::tac::lexing::sniff_message_type;
use tac_parser::tac::reconstruct::{check_exactly_one, check_zero_or_one};
use tac_parser::tac::testing::{SampleFamily, TacSamples};
use tac_parser::tac::{ConversionHints, MessageType, TokenSequence};

/// Identities of the tokens that are not whitespace
fn listed(sequence: &TokenSequence) -> Vec<&str> {
    sequence
        .iter()
        .filter(|token| !token.is_whitespace())
        .map(|token| token.identity_name().unwrap_or("?"))
        .collect()
}

#[test]
fn test_every_sample_renders_back_to_its_source() {
    for family in SampleFamily::ALL {
        for number in TacSamples::numbers(family).unwrap() {
            let sample = TacSamples::load(family, number);
            let source = sample.source();
            assert_eq!(
                sample.lex().render(),
                source,
                "{:?} #{} does not render back",
                family,
                number
            );
        }
    }
}

#[rstest]
#[case(SampleFamily::Metar, 1, MessageType::Metar)]
#[case(SampleFamily::Metar, 3, MessageType::Metar)]
#[case(SampleFamily::Taf, 1, MessageType::Taf)]
#[case(SampleFamily::Sigmet, 1, MessageType::Sigmet)]
#[case(SampleFamily::SpaceWeather, 1, MessageType::SpaceWeatherAdvisory)]
fn test_sniffed_message_type(
    #[case] family: SampleFamily,
    #[case] number: usize,
    #[case] expected: MessageType,
) {
    let source = TacSamples::load(family, number).source();
    assert_eq!(
        sniff_message_type(&source, &ConversionHints::default()),
        Some(expected)
    );
}

#[test]
fn test_taf_with_change_groups() {
    let source = TacSamples::taf(1).source();
    let sequence = TacSamples::taf(1).lex();

    assert_eq!(sequence.len(), 58);
    assert_eq!(sequence.render(), source);
    assert_eq!(
        &listed(&sequence)[..4],
        &["TAF_START", "AERODROME_DESIGNATOR", "ISSUE_TIME", "VALID_TIME"]
    );
    assert!(sequence.last().unwrap().has_identity(&END_TOKEN));
    assert!(sequence.iter().all(|token| !token.is_synthetic()));
}

#[test]
fn test_sigmet_cancelling_an_airmet() {
    let sequence = TacSamples::sigmet(1).lex();

    insta::assert_snapshot!(listed(&sequence).join("\n"), @r###"
    SIGMET_START
    SEQUENCE_DESCRIPTOR
    VALID_TIME
    MWO_DESIGNATOR
    FIR_DESIGNATOR
    SIGMET_FIR_NAME_WORD
    FIR_NAME
    AIRMET_CANCEL
    END_TOKEN
    "###);

    // Whitespace between every pair, except before the end token
    let tokens: Vec<_> = sequence.iter().collect();
    for pair in tokens.windows(2) {
        let end_follows = pair[1].has_identity(&END_TOKEN);
        assert_eq!(
            pair[0].is_whitespace() || pair[1].is_whitespace(),
            !end_follows,
            "{:?} followed by {:?}",
            pair[0].text(),
            pair[1].text()
        );
    }
    assert!(tokens.iter().any(|token| token.text() == "\r\n"));
}

#[test]
fn test_metar_listing() {
    let listing = to_simple_listing(&TacSamples::metar(2).lex());
    insta::assert_snapshot!(listing, @r###"
    METAR_START                      "METAR"
    AERODROME_DESIGNATOR             "EFHK"
    ISSUE_TIME                       "011750Z"
    NIL                              "NIL"
    END_TOKEN                        "="
    "###);
}

#[rstest]
#[case(1, 0)]
#[case(2, 1)]
fn test_metar_cardinality(#[case] number: usize, #[case] nils: usize) {
    let sequence = TacSamples::metar(number).lex();
    assert!(check_exactly_one(
        &sequence,
        &[METAR_START, AERODROME_DESIGNATOR, ISSUE_TIME, END_TOKEN]
    )
    .is_empty());
    assert!(check_zero_or_one(&sequence, &[NIL, CORRECTION]).is_empty());
    assert_eq!(sequence.count(&NIL), nils);
}

#[test]
fn test_taf_cardinality() {
    let sequence = TacSamples::taf(1).lex();
    assert!(check_exactly_one(&sequence, &[TAF_START, ISSUE_TIME, VALID_TIME]).is_empty());

    let issues = check_exactly_one(&sequence, &[NIL]);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "NIL is missing");
}

#[test]
fn test_messages_split_into_change_groups() {
    let sequence = TacSamples::taf(1).lex();
    let groups = sequence.split_by(&[FORECAST_CHANGE_INDICATOR], true);

    // The base forecast plus one group per change indicator (PROB40 TEMPO is two)
    assert_eq!(groups.len(), 7);
    let rendered: String = groups.iter().map(TokenSequence::render).collect();
    assert_eq!(rendered, TacSamples::taf(1).source());
}
