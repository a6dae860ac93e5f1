//! TAF-only recognizers: the start marker, validity periods, change groups and
//! forecast temperatures.

use super::{day_hour_minute, int, text, Extraction, Recognizer};
use crate::tac::identity::*;
use crate::tac::model::MessageType;
use regex::Captures;

const TAF: &[MessageType] = &[MessageType::Taf];

const PERIOD: &str = r"(?P<day1>[0-9]{2})(?P<hour1>[0-9]{2})/(?P<day2>[0-9]{2})(?P<hour2>[0-9]{2})";

/// `DDHH/DDHH`, or the older `DDHHHH` when the group has no slash.
fn period(captures: &Captures) -> Extraction {
    let extraction = day_hour_minute(
        Extraction::ok(),
        captures,
        [
            ("day1", ParamName::Day1),
            ("hour1", ParamName::Hour1),
            ("minute1", ParamName::Minute1),
        ],
    );
    let extraction = day_hour_minute(
        extraction,
        captures,
        [
            ("day2", ParamName::Day2),
            ("hour2", ParamName::Hour2),
            ("minute2", ParamName::Minute2),
        ],
    );
    // The short form DDHHHH has one day for both ends
    match int(captures, "short_day") {
        Some(day) => {
            let mut extraction = extraction
                .param(ParamName::Day1, day)
                .param(ParamName::Day2, day);
            for (group, slot) in [
                ("short_hour1", ParamName::Hour1),
                ("short_hour2", ParamName::Hour2),
            ] {
                if let Some(hour) = int(captures, group) {
                    if hour > 24 {
                        extraction = extraction.error(format!("invalid hour {:02}", hour));
                    }
                    extraction = extraction.param(slot, hour);
                }
            }
            extraction
        }
        None => extraction,
    }
}

fn change_indicator(captures: &Captures) -> Extraction {
    let extraction = Extraction::ok()
        .param_opt(ParamName::Type, text(captures, "kind"))
        .param_opt(ParamName::Value, int(captures, "probability"));
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

fn temperature(captures: &Captures) -> Extraction {
    let value = text(captures, "value").and_then(|raw| match raw.strip_prefix('M') {
        Some(below_zero) => below_zero.parse::<i64>().ok().map(|v| -v),
        None => raw.parse::<i64>().ok(),
    });
    Extraction::ok()
        .param_opt(ParamName::Value, value)
        .param_opt(ParamName::Day1, int(captures, "day"))
        .param_opt(ParamName::Hour1, int(captures, "hour"))
}

pub fn recognizers() -> Vec<Recognizer> {
    let short_period =
        r"(?P<short_day>[0-9]{2})(?P<short_hour1>[0-9]{2})(?P<short_hour2>[0-9]{2})";
    vec![
        Recognizer::new("TAF start", TAF_START, TAF, "TAF")
            .priority(100)
            .at_message_start(),
        Recognizer::new("amendment", AMENDMENT, TAF, "AMD")
            .priority(90)
            .after(&[TAF_START]),
        Recognizer::new(
            "valid time",
            VALID_TIME,
            TAF,
            &format!("{}|{}", PERIOD, short_period),
        )
        .priority(90)
        .after(&[ISSUE_TIME, AERODROME_DESIGNATOR])
        .extract(period),
        Recognizer::new("cancellation", CANCELLATION, TAF, "CNL")
            .priority(90)
            .after(&[VALID_TIME]),
        Recognizer::new(
            "forecast change",
            FORECAST_CHANGE_INDICATOR,
            TAF,
            r"(?P<kind>BECMG|TEMPO)|(?P<fm>FM)(?P<day>[0-9]{2})(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})|(?P<prob>PROB)(?P<probability>30|40)",
        )
        .priority(60)
        .extract(|captures| {
            let extraction = change_indicator(captures);
            match (captures.name("fm"), captures.name("prob")) {
                (Some(_), _) => extraction.param(ParamName::Type, "FM"),
                (_, Some(_)) => extraction.param(ParamName::Type, "PROB"),
                _ => extraction,
            }
        }),
        Recognizer::new(
            "change forecast period",
            CHANGE_FORECAST_TIME_GROUP,
            TAF,
            PERIOD,
        )
        .priority(60)
        .after(&[FORECAST_CHANGE_INDICATOR])
        .extract(period),
        Recognizer::new(
            "forecast temperature",
            MAX_TEMPERATURE,
            TAF,
            r"TX(?P<value>M?[0-9]{2})/(?P<day>[0-9]{2})(?P<hour>[0-9]{2})Z",
        )
        .priority(50)
        .extract(temperature),
        Recognizer::new(
            "forecast temperature",
            MIN_TEMPERATURE,
            TAF,
            r"TN(?P<value>M?[0-9]{2})/(?P<day>[0-9]{2})(?P<hour>[0-9]{2})Z",
        )
        .priority(50)
        .extract(temperature),
    ]
}
