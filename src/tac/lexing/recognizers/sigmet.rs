//! SIGMET and AIRMET recognizers
//!
//!     EHAA SIGMET M03 VALID 271330/271530 EHDB-
//!     EHAA AMSTERDAM FIR SEV TURB OBS WI N5200 E00400 - N5300 E00500 - ... FL250/350 MOV E 20KT NC=
//!
//! Several groups span more than one word (the start marker, the validity, cancellations,
//! phenomena, coordinate pairs); the driver merges them into single tokens.

use super::{day_hour_minute, int, text, Extraction, Recognizer};
use crate::tac::identity::*;
use crate::tac::model::MessageType;
use regex::Captures;

pub(crate) const WARNINGS: &[MessageType] = &[MessageType::Sigmet, MessageType::Airmet];
const SIGMET: &[MessageType] = &[MessageType::Sigmet];
const AIRMET: &[MessageType] = &[MessageType::Airmet];
const AREAS: &[MessageType] = &[
    MessageType::Sigmet,
    MessageType::Airmet,
    MessageType::SpaceWeatherAdvisory,
    MessageType::VolcanicAshAdvisory,
];

const SEQUENCE: &str = r"(?P<seq>[A-Z]{0,2}[0-9]{1,3})";
const PERIOD: &str = r"(?P<day1>[0-9]{2})(?P<hour1>[0-9]{2})(?P<minute1>[0-9]{2})/(?P<day2>[0-9]{2})(?P<hour2>[0-9]{2})(?P<minute2>[0-9]{2})";
const FIR_TYPES: &str = "FIR/UIR|FIR|UIR|CTA";

const SIGMET_PHENOMENA: &str = concat!(
    r"(?:OBSC|EMBD|FRQ|SQL) TSGR|(?:OBSC|EMBD|FRQ|SQL) TS|SEV ICE \(FZRA\)|SEV ICE|SEV TURB",
    r"|SEV MTW|HVY DS|HVY SS|RDOACT CLD|VA ERUPTION|VA CLD|TC [A-Z]+"
);
const AIRMET_PHENOMENA: &str = concat!(
    r"SFC WSPD [0-9]{2,3}(?:KT|MPS)|SFC VIS [0-9]{4} \([A-Z]+\)|(?:ISOL|OCNL) TSGR|(?:ISOL|OCNL) TS",
    r"|(?:ISOL|OCNL|FRQ) CB|(?:ISOL|OCNL|FRQ) TCU|MT OBSC|BKN CLD|OVC CLD|MOD ICE|MOD TURB|MOD MTW"
);

fn location(captures: &Captures) -> Extraction {
    Extraction::ok().param_opt(ParamName::LocationIndicator, text(captures, "loc"))
}

fn sequence(captures: &Captures) -> Extraction {
    Extraction::ok().param_opt(ParamName::SequenceNumber, text(captures, "seq"))
}

fn period(extraction: Extraction, captures: &Captures) -> Extraction {
    let extraction = day_hour_minute(
        extraction,
        captures,
        [
            ("day1", ParamName::Day1),
            ("hour1", ParamName::Hour1),
            ("minute1", ParamName::Minute1),
        ],
    );
    day_hour_minute(
        extraction,
        captures,
        [
            ("day2", ParamName::Day2),
            ("hour2", ParamName::Hour2),
            ("minute2", ParamName::Minute2),
        ],
    )
}

fn valid_time(captures: &Captures) -> Extraction {
    period(Extraction::ok(), captures)
}

fn cancellation(captures: &Captures) -> Extraction {
    period(sequence(captures), captures)
}

fn fir_name(captures: &Captures) -> Extraction {
    Extraction::ok().param_opt(ParamName::Type, text(captures, "kind"))
}

fn word(captures: &Captures) -> Extraction {
    Extraction::ok().param_opt(ParamName::Value, captures.get(0).map(|m| m.as_str()))
}

fn kind(captures: &Captures) -> Extraction {
    Extraction::ok().param_opt(ParamName::Type, text(captures, "kind"))
}

fn observed_or_forecast(captures: &Captures) -> Extraction {
    Extraction::ok()
        .param_opt(ParamName::Type, text(captures, "kind"))
        .param_opt(ParamName::Hour1, int(captures, "hour"))
        .param_opt(ParamName::Minute1, int(captures, "minute"))
}

/// `N6030` is 60°30'N, `W02515` is 25°15'W.
fn degrees(hemisphere: &str, degrees: i64, minutes: Option<i64>) -> f64 {
    let value = degrees as f64 + minutes.unwrap_or(0) as f64 / 60.0;
    match hemisphere {
        "S" | "W" => -value,
        _ => value,
    }
}

pub(crate) fn coordinate_pair(captures: &Captures) -> Extraction {
    let (Some(lat_hemisphere), Some(lat), Some(lon_hemisphere), Some(lon)) = (
        text(captures, "lat_h"),
        int(captures, "lat_d"),
        text(captures, "lon_h"),
        int(captures, "lon_d"),
    ) else {
        return Extraction::ok();
    };
    let lat_minutes = int(captures, "lat_m");
    let lon_minutes = int(captures, "lon_m");
    let latitude = degrees(&lat_hemisphere, lat, lat_minutes);
    let longitude = degrees(&lon_hemisphere, lon, lon_minutes);

    let mut extraction = Extraction::ok();
    if latitude.abs() > 90.0 || lat_minutes.is_some_and(|m| m > 59) {
        extraction = extraction.error(format!("latitude out of range in {}", &captures[0]));
    }
    if longitude.abs() > 180.0 || lon_minutes.is_some_and(|m| m > 59) {
        extraction = extraction.error(format!("longitude out of range in {}", &captures[0]));
    }
    extraction
        .param(ParamName::Latitude, latitude)
        .param(ParamName::Longitude, longitude)
}

pub(crate) const COORDINATE_PAIR: &str = r"(?P<lat_h>[NS])(?P<lat_d>[0-9]{2})(?P<lat_m>[0-9]{2})?\s+(?P<lon_h>[EW])(?P<lon_d>[0-9]{3})(?P<lon_m>[0-9]{2})?";

fn level(captures: &Captures) -> Extraction {
    let unit = match text(captures, "unit").as_deref() {
        Some("FT") => "ft",
        Some("M") => "m",
        _ => "FL",
    };
    Extraction::ok()
        .param_opt(ParamName::Type, text(captures, "kind"))
        .param_opt(
            ParamName::MinValue,
            int(captures, "low").or_else(|| int(captures, "low_ft")),
        )
        .param_opt(
            ParamName::MaxValue,
            int(captures, "high")
                .or_else(|| int(captures, "top"))
                .or_else(|| int(captures, "high_ft")),
        )
        .param(ParamName::Unit, unit)
}

fn movement(captures: &Captures) -> Extraction {
    Extraction::ok()
        .param_opt(ParamName::Direction, text(captures, "dir"))
        .param_opt(ParamName::MeanValue, int(captures, "speed"))
        .param_opt(ParamName::Unit, text(captures, "unit"))
}

fn forecast_at(captures: &Captures) -> Extraction {
    Extraction::ok()
        .param_opt(ParamName::Hour1, int(captures, "hour"))
        .param_opt(ParamName::Minute1, int(captures, "minute"))
}

pub fn recognizers() -> Vec<Recognizer> {
    vec![
        Recognizer::new(
            "SIGMET start",
            SIGMET_START,
            SIGMET,
            r"(?P<loc>[A-Z]{4})\s+SIGMET",
        )
        .priority(100)
        .at_message_start()
        .extract(location),
        Recognizer::new(
            "AIRMET start",
            AIRMET_START,
            AIRMET,
            r"(?P<loc>[A-Z]{4})\s+AIRMET",
        )
        .priority(100)
        .at_message_start()
        .extract(location),
        Recognizer::new("sequence", SEQUENCE_DESCRIPTOR, WARNINGS, SEQUENCE)
            .priority(90)
            .after(&[SIGMET_START, AIRMET_START])
            .extract(sequence),
        Recognizer::new(
            "validity",
            VALID_TIME,
            WARNINGS,
            &format!(r"VALID\s+{}", PERIOD),
        )
        .priority(90)
        .after(&[SEQUENCE_DESCRIPTOR])
        .extract(valid_time),
        Recognizer::new("MWO", MWO_DESIGNATOR, WARNINGS, r"(?P<loc>[A-Z]{4})-")
            .priority(90)
            .after(&[VALID_TIME])
            .extract(location),
        Recognizer::new("FIR", FIR_DESIGNATOR, WARNINGS, r"(?P<loc>[A-Z]{4})")
            .priority(90)
            .after(&[MWO_DESIGNATOR])
            .extract(location),
        Recognizer::new(
            "cancelled SIGMET",
            SIGMET_CANCEL,
            SIGMET,
            &format!(r"CNL\s+SIGMET\s+{}\s+{}", SEQUENCE, PERIOD),
        )
        .priority(85)
        .after(&[FIR_NAME, SIGMET_USAGE])
        .extract(cancellation),
        Recognizer::new(
            "cancelled AIRMET",
            AIRMET_CANCEL,
            WARNINGS,
            &format!(r"CNL\s+AIRMET\s+{}\s+{}", SEQUENCE, PERIOD),
        )
        .priority(85)
        .after(&[FIR_NAME, SIGMET_USAGE])
        .extract(cancellation),
        Recognizer::new(
            "FIR type",
            FIR_NAME,
            WARNINGS,
            &format!("(?P<kind>{})", FIR_TYPES),
        )
        .priority(80)
        .after(&[SIGMET_FIR_NAME_WORD])
        .extract(fir_name),
        Recognizer::new("FIR name", SIGMET_FIR_NAME_WORD, WARNINGS, r"[A-Z][A-Z\-/]*")
            .priority(75)
            .certainty(0.8)
            .after(&[FIR_DESIGNATOR, SIGMET_FIR_NAME_WORD])
            .extract(word),
        Recognizer::new("usage", SIGMET_USAGE, WARNINGS, r"(?P<kind>TEST|EXER)")
            .priority(80)
            .after(&[FIR_NAME])
            .extract(kind),
        Recognizer::new(
            "SIGMET phenomenon",
            PHENOMENON_SIGMET,
            SIGMET,
            SIGMET_PHENOMENA,
        )
        .priority(70)
        .after(&[FIR_NAME, SIGMET_USAGE])
        .extract(word),
        Recognizer::new(
            "AIRMET phenomenon",
            PHENOMENON_SIGMET,
            AIRMET,
            AIRMET_PHENOMENA,
        )
        .priority(70)
        .after(&[FIR_NAME, SIGMET_USAGE])
        .extract(word),
        Recognizer::new(
            "observed or forecast",
            OBS_OR_FORECAST,
            WARNINGS,
            r"(?P<kind>OBS|FCST)(?:\s+AT\s+(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})Z)?",
        )
        .priority(70)
        .after(&[PHENOMENON_SIGMET])
        .extract(observed_or_forecast),
        Recognizer::new("within", SIGMET_WITHIN, WARNINGS, "WI").priority(70),
        Recognizer::new("coordinate pair", POLYGON_COORDINATE_PAIR, AREAS, COORDINATE_PAIR)
            .priority(70)
            .extract(coordinate_pair),
        Recognizer::new("coordinate separator", POLYGON_COORDINATE_PAIR_SEPARATOR, AREAS, "-")
            .priority(70)
            .after(&[POLYGON_COORDINATE_PAIR]),
        Recognizer::new(
            "entire area",
            SIGMET_ENTIRE_AREA,
            WARNINGS,
            &format!(r"ENTIRE\s+(?P<kind>{})", FIR_TYPES),
        )
        .priority(70)
        .extract(kind),
        Recognizer::new(
            "level",
            SIGMET_LEVEL,
            WARNINGS,
            concat!(
                r"(?P<kind>SFC)/FL(?P<high>[0-9]{3})",
                r"|FL(?P<low>[0-9]{3})/(?P<top>[0-9]{3})",
                r"|(?P<kind_top>TOP(?:\s+ABV)?)\s+FL(?P<top_only>[0-9]{3})",
                r"|(?P<low_ft>[0-9]{4})/(?P<high_ft>[0-9]{4,5})(?P<unit>FT|M)",
            ),
        )
        .priority(60)
        .extract(|captures| {
            let extraction = level(captures);
            match (text(captures, "kind_top"), int(captures, "top_only")) {
                (Some(kind), Some(top)) => extraction
                    .param(ParamName::Type, kind)
                    .param(ParamName::MaxValue, top),
                _ => extraction,
            }
        }),
        Recognizer::new(
            "movement",
            SIGMET_MOVING,
            WARNINGS,
            r"MOV\s+(?P<dir>NNE|NE|ENE|ESE|SE|SSE|SSW|SW|WSW|WNW|NW|NNW|N|E|S|W)(?:\s+(?P<speed>[0-9]{2,3})(?P<unit>KT|KMH))?|(?P<dir_stationary>STNR)",
        )
        .priority(60)
        .extract(|captures| match text(captures, "dir_stationary") {
            Some(stationary) => movement(captures).param(ParamName::Direction, stationary),
            None => movement(captures),
        }),
        Recognizer::new(
            "intensity change",
            SIGMET_INTENSITY,
            WARNINGS,
            r"(?P<kind>INTSF|WKN|NC)",
        )
        .priority(60)
        .extract(kind),
        Recognizer::new(
            "forecast position time",
            SIGMET_FCST_AT,
            WARNINGS,
            r"FCST\s+AT\s+(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})Z",
        )
        .priority(60)
        .after(&[SIGMET_INTENSITY, SIGMET_MOVING])
        .extract(forecast_at),
    ]
}
