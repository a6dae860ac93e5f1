//! Recognizers shared by every family: the WMO bulletin heading.
//!
//!     FTFI33 EFPP 020500 AAA
//!     ^^^^^^ ^^^^ ^^^^^^ ^^^
//!     TTAAii CCCC YYGGgg BBB

use super::{day_hour_minute, text, Extraction, Recognizer};
use crate::tac::identity::{
    ParamName, BULLETIN_HEADING_BBB_INDICATOR, BULLETIN_HEADING_DATA_DESIGNATORS,
    BULLETIN_HEADING_ISSUE_TIME, BULLETIN_HEADING_LOCATION_INDICATOR,
};
use crate::tac::model::MessageType;
use regex::Captures;

pub(crate) const ALL_FAMILIES: &[MessageType] = &MessageType::ALL;

pub const DATA_DESIGNATORS_PATTERN: &str = r"(?P<tt>[A-Z]{2})(?P<aa>[A-Z]{2})(?P<ii>[0-9]{2})";

fn data_designators(captures: &Captures) -> Extraction {
    let number = super::int(captures, "ii");
    Extraction::ok()
        .param_opt(ParamName::Type, text(captures, "tt"))
        .param_opt(ParamName::Country, text(captures, "aa"))
        .param_opt(ParamName::BulletinNumber, number)
}

fn location(captures: &Captures) -> Extraction {
    Extraction::ok().param_opt(ParamName::LocationIndicator, text(captures, "cccc"))
}

fn issue_time(captures: &Captures) -> Extraction {
    day_hour_minute(
        Extraction::ok(),
        captures,
        [
            ("day", ParamName::Day1),
            ("hour", ParamName::Hour1),
            ("minute", ParamName::Minute1),
        ],
    )
}

fn bbb(captures: &Captures) -> Extraction {
    Extraction::ok().param_opt(ParamName::Value, text(captures, "bbb"))
}

/// The family announced by the `TT` data type designators, when it is one the lexer knows.
pub fn family_for_data_type(tt: &str) -> Option<MessageType> {
    match tt {
        "SA" | "SP" => Some(MessageType::Metar),
        "FT" | "FC" => Some(MessageType::Taf),
        "WS" | "WC" | "WV" => Some(MessageType::Sigmet),
        "WA" => Some(MessageType::Airmet),
        "FN" => Some(MessageType::SpaceWeatherAdvisory),
        "FV" => Some(MessageType::VolcanicAshAdvisory),
        _ => None,
    }
}

pub fn recognizers() -> Vec<Recognizer> {
    vec![
        Recognizer::new(
            "bulletin data designators",
            BULLETIN_HEADING_DATA_DESIGNATORS,
            ALL_FAMILIES,
            DATA_DESIGNATORS_PATTERN,
        )
        .priority(110)
        .at_message_start()
        .extract(data_designators),
        Recognizer::new(
            "bulletin location indicator",
            BULLETIN_HEADING_LOCATION_INDICATOR,
            ALL_FAMILIES,
            r"(?P<cccc>[A-Z]{4})",
        )
        .priority(110)
        .after(&[BULLETIN_HEADING_DATA_DESIGNATORS])
        .extract(location),
        Recognizer::new(
            "bulletin issue time",
            BULLETIN_HEADING_ISSUE_TIME,
            ALL_FAMILIES,
            r"(?P<day>[0-9]{2})(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})",
        )
        .priority(110)
        .after(&[BULLETIN_HEADING_LOCATION_INDICATOR])
        .extract(issue_time),
        Recognizer::new(
            "bulletin BBB indicator",
            BULLETIN_HEADING_BBB_INDICATOR,
            ALL_FAMILIES,
            r"(?P<bbb>(?:RR|CC|AA)[A-Z])",
        )
        .priority(110)
        .after(&[BULLETIN_HEADING_ISSUE_TIME])
        .extract(bbb),
    ]
}
