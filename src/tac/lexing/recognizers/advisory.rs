//! Advisory recognizers (space weather and volcanic ash)
//!
//! Advisories are laid out as `LABEL: value` rows. Labels are recognized with
//! [Recognizer::split_label] so a value written without the separating spaces is still
//! found: `DTG:20161108/0100Z` yields the label and the issue time.

use super::{day_hour_minute, int, text, Extraction, Recognizer};
use crate::tac::identity::*;
use crate::tac::model::MessageType;
use regex::Captures;

const ADVISORIES: &[MessageType] = &[
    MessageType::SpaceWeatherAdvisory,
    MessageType::VolcanicAshAdvisory,
];
const SWX: &[MessageType] = &[MessageType::SpaceWeatherAdvisory];
const VAA: &[MessageType] = &[MessageType::VolcanicAshAdvisory];

const EFFECT: &str = r"HF\s+COM|SATCOM|GNSS|RADIATION";

const DATE_TIME: &str = r"(?P<year>[0-9]{4})(?P<month>[0-9]{2})(?P<day>[0-9]{2})/(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})Z";

fn full_date_time(extraction: Extraction, captures: &Captures) -> Extraction {
    let mut extraction = extraction
        .param_opt(ParamName::Year, int(captures, "year"))
        .param_opt(ParamName::Month, int(captures, "month"));
    if int(captures, "month").is_some_and(|month| !(1..=12).contains(&month)) {
        extraction = extraction.error("invalid month");
    }
    day_hour_minute(
        extraction,
        captures,
        [
            ("day", ParamName::Day1),
            ("hour", ParamName::Hour1),
            ("minute", ParamName::Minute1),
        ],
    )
}

fn issue_time(captures: &Captures) -> Extraction {
    full_date_time(Extraction::ok(), captures)
}

fn advisory_number(captures: &Captures) -> Extraction {
    Extraction::ok()
        .param_opt(ParamName::Year, int(captures, "year"))
        .param_opt(ParamName::SequenceNumber, int(captures, "serial"))
}

fn value(captures: &Captures) -> Extraction {
    Extraction::ok().param_opt(ParamName::Value, captures.get(0).map(|m| m.as_str()))
}

fn kind(captures: &Captures) -> Extraction {
    Extraction::ok().param_opt(ParamName::Type, text(captures, "kind"))
}

fn effect(captures: &Captures) -> Extraction {
    let kind = text(captures, "kind").map(|kind| kind.split_whitespace().collect::<Vec<_>>().join(" "));
    Extraction::ok()
        .param_opt(ParamName::Type, kind)
        .param_opt(ParamName::Intensity, text(captures, "intensity"))
}

fn phenomena_label(captures: &Captures) -> Extraction {
    Extraction::ok()
        .param_opt(ParamName::Type, text(captures, "kind"))
        .param_opt(ParamName::HourOffset, int(captures, "offset"))
}

fn phenomena_time(captures: &Captures) -> Extraction {
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

fn next_advisory(captures: &Captures) -> Extraction {
    if captures.name("none").is_some() {
        return Extraction::ok().param(ParamName::Type, "NO_FURTHER_ADVISORIES");
    }
    let kind = if captures.name("by").is_some() { "BY" } else { "AT" };
    full_date_time(Extraction::ok().param(ParamName::Type, kind), captures)
}

pub fn recognizers() -> Vec<Recognizer> {
    vec![
        Recognizer::new(
            "space weather advisory start",
            SPACE_WEATHER_ADVISORY_START,
            SWX,
            r"SWX\s+ADVISORY",
        )
        .priority(100)
        .at_message_start(),
        Recognizer::new(
            "volcanic ash advisory start",
            VOLCANIC_ASH_ADVISORY_START,
            VAA,
            r"VA\s+ADVISORY",
        )
        .priority(100)
        .at_message_start(),
        Recognizer::new("DTG label", DTG_ISSUE_TIME_LABEL, ADVISORIES, "DTG:")
            .priority(95)
            .split_label(),
        Recognizer::new("issue time", ADVISORY_ISSUE_TIME, ADVISORIES, DATE_TIME)
            .priority(90)
            .after(&[DTG_ISSUE_TIME_LABEL])
            .extract(issue_time),
        Recognizer::new("SWXC label", SWX_CENTRE_LABEL, SWX, "SWXC:")
            .priority(95)
            .split_label(),
        Recognizer::new("SWX centre", SWX_CENTRE, SWX, r"[A-Z]+")
            .priority(90)
            .after(&[SWX_CENTRE_LABEL])
            .extract(value),
        Recognizer::new(
            "advisory number label",
            ADVISORY_NUMBER_LABEL,
            ADVISORIES,
            r"ADVISORY\s+NR:",
        )
        .priority(95)
        .split_label(),
        Recognizer::new(
            "replaced advisory label",
            REPLACE_ADVISORY_NUMBER_LABEL,
            ADVISORIES,
            r"NR\s+RPLC\s*:",
        )
        .priority(95)
        .split_label(),
        Recognizer::new(
            "advisory number",
            ADVISORY_NUMBER,
            ADVISORIES,
            r"(?P<year>[0-9]{4})/(?P<serial>[0-9]{1,4})",
        )
        .priority(90)
        .after(&[ADVISORY_NUMBER_LABEL, REPLACE_ADVISORY_NUMBER_LABEL])
        .extract(advisory_number),
        Recognizer::new("status label", ADVISORY_STATUS_LABEL, ADVISORIES, "STATUS:")
            .priority(95)
            .split_label(),
        Recognizer::new(
            "status",
            ADVISORY_STATUS,
            ADVISORIES,
            r"(?P<kind>TEST|EXER)",
        )
        .priority(90)
        .after(&[ADVISORY_STATUS_LABEL])
        .extract(kind),
        Recognizer::new(
            "effect label",
            SWX_EFFECT_LABEL,
            SWX,
            r"SWX\s+EFFECT:",
        )
        .priority(95)
        .split_label(),
        Recognizer::new(
            "effect",
            SWX_EFFECT,
            SWX,
            &format!(
                r"(?P<kind>{e})\s+(?P<intensity>MOD|SEV)(?:\s+AND\s+(?:{e})\s+(?:MOD|SEV))*",
                e = EFFECT
            ),
        )
        .priority(90)
        .after(&[SWX_EFFECT_LABEL])
        .extract(effect),
        Recognizer::new(
            "phenomena label",
            ADVISORY_PHENOMENA_LABEL,
            ADVISORIES,
            r"(?P<kind>OBS|FCST)\s+(?:SWX|VA\s+CLD)(?:\s+\+\s*(?P<offset>[0-9]{1,2})\s*HR)?:",
        )
        .priority(95)
        .split_label()
        .extract(phenomena_label),
        Recognizer::new(
            "phenomena time",
            ADVISORY_PHENOMENA_TIME_GROUP,
            ADVISORIES,
            r"(?P<day>[0-9]{2})/(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})Z",
        )
        .priority(90)
        .after(&[ADVISORY_PHENOMENA_LABEL])
        .extract(phenomena_time),
        Recognizer::new(
            "not expected",
            SWX_NOT_EXPECTED,
            ADVISORIES,
            r"NO\s+(?:SWX|VA)\s+EXP",
        )
        .priority(85),
        Recognizer::new("not available", SWX_NOT_AVAILABLE, ADVISORIES, r"NOT\s+AVBL")
            .priority(85),
        Recognizer::new("remarks label", REMARKS_START, ADVISORIES, "RMK:")
            .priority(95)
            .split_label(),
        Recognizer::new("remark", REMARK, ADVISORIES, r"\S+")
            .priority(94)
            .certainty(0.5)
            .after(&[REMARKS_START, REMARK])
            .extract(value),
        Recognizer::new(
            "next advisory label",
            NEXT_ADVISORY_LABEL,
            ADVISORIES,
            r"NXT\s+ADVISORY:",
        )
        .priority(95)
        .split_label(),
        Recognizer::new(
            "next advisory",
            NEXT_ADVISORY,
            ADVISORIES,
            &format!(
                r"(?P<none>NO\s+FURTHER\s+ADVISORIES)|(?P<by>WILL\s+BE\s+ISSUED\s+BY\s+)?{}",
                DATE_TIME
            ),
        )
        .priority(90)
        .after(&[NEXT_ADVISORY_LABEL])
        .extract(next_advisory),
    ]
}
