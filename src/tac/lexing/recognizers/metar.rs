//! Aerodrome report recognizers
//!
//! Most groups (wind, visibility, weather, cloud) are shared by METAR and TAF and are
//! registered for both families here; the TAF-only groups live in the taf module.

use super::{day_hour_minute, int, text, Extraction, Recognizer};
use crate::tac::identity::*;
use crate::tac::model::MessageType;
use regex::Captures;

pub(crate) const METAR: &[MessageType] = &[MessageType::Metar];
pub(crate) const AERODROME: &[MessageType] = &[MessageType::Metar, MessageType::Taf];

pub(crate) const DESCRIPTORS: &str = "MI|BC|PR|DR|BL|SH|TS|FZ";
pub(crate) const PHENOMENA: &str =
    "DZ|RA|SN|SG|PL|GR|GS|UP|IC|BR|FG|FU|VA|DU|SA|HZ|PO|SQ|FC|SS|DS";

fn weather_code() -> String {
    format!(
        "(?:{d})(?:{p})*|(?:{p})+",
        d = DESCRIPTORS,
        p = PHENOMENA
    )
}

fn aerodrome(captures: &Captures) -> Extraction {
    let designator = text(captures, "icao");
    let country = designator.as_ref().map(|icao| icao[..2].to_string());
    Extraction::ok()
        .param_opt(ParamName::Value, designator)
        .param_opt(ParamName::Country, country)
}

pub(crate) fn issue_time(captures: &Captures) -> Extraction {
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

fn surface_wind(captures: &Captures) -> Extraction {
    let mut extraction = Extraction::ok();
    match text(captures, "dir").as_deref() {
        Some("VRB") => extraction = extraction.param(ParamName::Direction, "VRB"),
        Some(degrees) => {
            let degrees: i64 = degrees.parse().unwrap_or(-1);
            if !(0..=360).contains(&degrees) {
                extraction = extraction.error(format!("invalid wind direction {}", degrees));
            }
            extraction = extraction.param(ParamName::Direction, degrees);
        }
        None => {}
    }
    extraction
        .param_opt(ParamName::MeanValue, int(captures, "speed"))
        .param_opt(ParamName::MaxValue, int(captures, "gust"))
        .param_opt(ParamName::Unit, text(captures, "unit"))
}

fn variable_wind(captures: &Captures) -> Extraction {
    Extraction::ok()
        .param_opt(ParamName::MinValue, int(captures, "from"))
        .param_opt(ParamName::MaxValue, int(captures, "to"))
}

fn visibility(captures: &Captures) -> Extraction {
    let unit = if captures.name("sm").is_some() { "SM" } else { "m" };
    let operator = match text(captures, "op").as_deref() {
        Some("P") => Some("ABOVE"),
        Some("M") => Some("BELOW"),
        _ => None,
    };
    Extraction::ok()
        .param_opt(ParamName::MeanValue, int(captures, "value"))
        .param(ParamName::Unit, unit)
        .param_opt(ParamName::RelationalOperator, operator)
        .param_opt(ParamName::Direction, text(captures, "dir"))
}

fn runway_visual_range(captures: &Captures) -> Extraction {
    let operator = match text(captures, "op").as_deref() {
        Some("P") => Some("ABOVE"),
        Some("M") => Some("BELOW"),
        _ => None,
    };
    let unit = if captures.name("ft").is_some() { "ft" } else { "m" };
    Extraction::ok()
        .param_opt(ParamName::Value, text(captures, "runway"))
        .param_opt(ParamName::MeanValue, int(captures, "range"))
        .param_opt(ParamName::RelationalOperator, operator)
        .param(ParamName::Unit, unit)
}

pub(crate) fn weather(captures: &Captures) -> Extraction {
    let intensity = match text(captures, "intensity").as_deref() {
        Some("+") => Some("HEAVY"),
        Some("-") => Some("LIGHT"),
        Some("VC") => Some("VICINITY"),
        _ => None,
    };
    Extraction::ok()
        .param_opt(ParamName::Value, text(captures, "code"))
        .param_opt(ParamName::Intensity, intensity)
}

pub(crate) fn cloud(captures: &Captures) -> Extraction {
    let height = match text(captures, "height").as_deref() {
        Some("///") | None => None,
        Some(height) => height.parse::<i64>().ok(),
    };
    Extraction::ok()
        .param_opt(ParamName::Cover, text(captures, "cover"))
        .param_opt(ParamName::Value, height)
        .param_opt(ParamName::Type, text(captures, "type"))
}

fn temperatures(captures: &Captures) -> Extraction {
    let signed = |group: &str| {
        text(captures, group).and_then(|raw| match raw.strip_prefix('M') {
            Some(below_zero) => below_zero.parse::<i64>().ok().map(|v| -v),
            None => raw.parse::<i64>().ok(),
        })
    };
    Extraction::ok()
        .param_opt(ParamName::Value, signed("air"))
        .param_opt(ParamName::Dewpoint, signed("dew"))
        .param(ParamName::Unit, "degC")
}

fn pressure(captures: &Captures) -> Extraction {
    let unit = match text(captures, "kind").as_deref() {
        Some("A") => "inHg",
        _ => "hPa",
    };
    Extraction::ok()
        .param_opt(ParamName::Value, int(captures, "value"))
        .param(ParamName::Unit, unit)
}

fn trend_change(captures: &Captures) -> Extraction {
    Extraction::ok().param_opt(ParamName::Type, text(captures, "kind"))
}

fn trend_time(captures: &Captures) -> Extraction {
    Extraction::ok()
        .param_opt(ParamName::Type, text(captures, "kind"))
        .param_opt(ParamName::Hour1, int(captures, "hour"))
        .param_opt(ParamName::Minute1, int(captures, "minute"))
}

fn remark(captures: &Captures) -> Extraction {
    Extraction::ok().param_opt(ParamName::Value, captures.get(0).map(|m| m.as_str()))
}

pub fn recognizers() -> Vec<Recognizer> {
    let weather_code = weather_code();
    vec![
        Recognizer::new("METAR start", METAR_START, METAR, "METAR")
            .priority(100)
            .at_message_start(),
        Recognizer::new("SPECI start", SPECI_START, METAR, "SPECI")
            .priority(100)
            .at_message_start(),
        Recognizer::new("correction", CORRECTION, AERODROME, "COR")
            .priority(90)
            .after(&[METAR_START, SPECI_START, TAF_START, AMENDMENT]),
        Recognizer::new(
            "aerodrome designator",
            AERODROME_DESIGNATOR,
            AERODROME,
            r"(?P<icao>[A-Z][A-Z0-9]{3})",
        )
        .priority(90)
        .after(&[METAR_START, SPECI_START, TAF_START, CORRECTION, AMENDMENT])
        .extract(aerodrome),
        Recognizer::new(
            "issue time",
            ISSUE_TIME,
            AERODROME,
            r"(?P<day>[0-9]{2})(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})Z",
        )
        .priority(90)
        .after(&[AERODROME_DESIGNATOR])
        .extract(issue_time),
        Recognizer::new("nil report", NIL, AERODROME, "NIL")
            .priority(90)
            .after(&[AERODROME_DESIGNATOR, ISSUE_TIME, VALID_TIME]),
        Recognizer::new("automated", AUTOMATED, METAR, "AUTO")
            .priority(90)
            .after(&[ISSUE_TIME]),
        Recognizer::new(
            "surface wind",
            SURFACE_WIND,
            AERODROME,
            r"(?P<dir>VRB|[0-9]{3})(?P<speed>[0-9]{2,3})(?:G(?P<gust>[0-9]{2,3}))?(?P<unit>KT|MPS)",
        )
        .priority(50)
        .extract(surface_wind),
        Recognizer::new(
            "variable wind direction",
            VARIABLE_WIND_DIRECTION,
            AERODROME,
            r"(?P<from>[0-9]{3})V(?P<to>[0-9]{3})",
        )
        .priority(50)
        .after(&[SURFACE_WIND])
        .extract(variable_wind),
        Recognizer::new("CAVOK", CAVOK, AERODROME, "CAVOK").priority(50),
        Recognizer::new(
            "horizontal visibility",
            HORIZONTAL_VISIBILITY,
            AERODROME,
            r"(?P<value>[0-9]{4})(?P<dir>NDV|NE|NW|SE|SW|N|E|S|W)?|(?P<op>[PM])?(?P<value_sm>[0-9]{1,2})(?P<sm>SM)",
        )
        .priority(40)
        .extract(|captures| {
            let extraction = visibility(captures);
            match int(captures, "value_sm") {
                Some(miles) => extraction.param(ParamName::MeanValue, miles),
                None => extraction,
            }
        }),
        Recognizer::new(
            "runway visual range",
            RUNWAY_VISUAL_RANGE,
            METAR,
            r"R(?P<runway>[0-9]{2}[LCR]?)/(?P<op>[PM])?(?P<range>[0-9]{4})(?:V[PM]?[0-9]{4})?(?P<ft>FT)?(?:/?[UDN])?",
        )
        .priority(50)
        .extract(runway_visual_range),
        Recognizer::new(
            "recent weather",
            RECENT_WEATHER,
            METAR,
            &format!("RE(?P<code>{})", weather_code),
        )
        .priority(50)
        .extract(weather),
        Recognizer::new(
            "weather",
            WEATHER,
            AERODROME,
            &format!("(?P<intensity>[+-]|VC)?(?P<code>{})", weather_code),
        )
        .priority(45)
        .extract(weather),
        Recognizer::new(
            "cloud",
            CLOUD,
            AERODROME,
            r"(?P<cover>FEW|SCT|BKN|OVC|VV)(?P<height>[0-9]{3}|///)(?P<type>CB|TCU)?|(?P<cover_only>NSC|NCD|SKC|CLR)",
        )
        .priority(50)
        .extract(|captures| {
            let extraction = cloud(captures);
            match text(captures, "cover_only") {
                Some(cover) => extraction.param(ParamName::Cover, cover),
                None => extraction,
            }
        }),
        Recognizer::new(
            "air and dewpoint temperature",
            AIR_DEWPOINT_TEMPERATURE,
            METAR,
            r"(?P<air>M?[0-9]{2})/(?P<dew>M?[0-9]{2})?",
        )
        .priority(50)
        .extract(temperatures),
        Recognizer::new(
            "QNH",
            AIR_PRESSURE_QNH,
            METAR,
            r"(?P<kind>[QA])(?P<value>[0-9]{4})",
        )
        .priority(50)
        .extract(pressure),
        Recognizer::new("no significant weather", NO_SIGNIFICANT_WEATHER, AERODROME, "NSW")
            .priority(50),
        Recognizer::new(
            "trend change",
            TREND_CHANGE_INDICATOR,
            METAR,
            r"(?P<kind>BECMG|TEMPO|NOSIG)",
        )
        .priority(60)
        .extract(trend_change),
        Recognizer::new(
            "trend time",
            TREND_TIME_GROUP,
            METAR,
            r"(?P<kind>FM|TL|AT)(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})",
        )
        .priority(60)
        .after(&[TREND_CHANGE_INDICATOR, TREND_TIME_GROUP])
        .extract(trend_time),
        Recognizer::new("remarks", REMARKS_START, AERODROME, "RMK").priority(60),
        Recognizer::new("remark", REMARK, AERODROME, r"\S+")
            .priority(95)
            .certainty(0.5)
            .after(&[REMARKS_START, REMARK])
            .extract(remark),
    ]
}
