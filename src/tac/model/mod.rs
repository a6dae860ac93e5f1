//! Structured messages
//!
//!     The reconstructors read structured weather messages through the [WeatherMessage]
//!     trait. The trait is read-only and every accessor except [WeatherMessage::message_type]
//!     defaults to "absent", so a message type implements only what it carries.
//!
//!     The value types here (times, positions, analyses) are plain data. Decoding TAC into
//!     these types is the job of the message builders, which sit outside this crate.

pub mod geometry;
pub mod time;

pub use geometry::{AnalysisArea, FirLookup, GeoPosition, Geometry, StaticFirLookup};
pub use time::{PartialDateTime, ValidityPeriod};

use crate::tac::sequence::TokenSequence;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Message families the lexer knows how to recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Metar,
    Taf,
    Sigmet,
    Airmet,
    SpaceWeatherAdvisory,
    VolcanicAshAdvisory,
    Generic,
}

impl MessageType {
    pub const ALL: [MessageType; 7] = [
        MessageType::Metar,
        MessageType::Taf,
        MessageType::Sigmet,
        MessageType::Airmet,
        MessageType::SpaceWeatherAdvisory,
        MessageType::VolcanicAshAdvisory,
        MessageType::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Metar => "METAR",
            MessageType::Taf => "TAF",
            MessageType::Sigmet => "SIGMET",
            MessageType::Airmet => "AIRMET",
            MessageType::SpaceWeatherAdvisory => "SPACE_WEATHER_ADVISORY",
            MessageType::VolcanicAshAdvisory => "VOLCANIC_ASH_ADVISORY",
            MessageType::Generic => "GENERIC",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown message type '{0}'")]
pub struct UnknownMessageType(pub String);

impl FromStr for MessageType {
    type Err = UnknownMessageType;

    /// Accepts the canonical names and the short forms `SWX` and `VAA`, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase().replace('-', "_");
        match upper.as_str() {
            "SWX" => return Ok(MessageType::SpaceWeatherAdvisory),
            "VAA" => return Ok(MessageType::VolcanicAshAdvisory),
            "SPECI" => return Ok(MessageType::Metar),
            _ => {}
        }
        MessageType::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == upper)
            .ok_or_else(|| UnknownMessageType(s.to_string()))
    }
}

/// The role a location indicator plays in a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationRole {
    Aerodrome,
    FlightInformationRegion,
    MeteorologicalWatchOffice,
    IssuingCentre,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationIndicator {
    pub designator: String,
    pub name: Option<String>,
}

impl LocationIndicator {
    pub fn new(designator: impl Into<String>) -> Self {
        Self {
            designator: designator.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStatus {
    #[default]
    Normal,
    Amendment,
    Correction,
}

/// `TEST` and `EXER` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Test,
    Exercise,
}

/// The earlier report a cancellation refers to (`CNL SIGMET M01 271130/271530`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelledReport {
    pub message_type: MessageType,
    pub sequence_number: String,
    pub valid_time: ValidityPeriod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Observation,
    Forecast,
}

/// One observed or forecast occurrence of a phenomenon.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub kind: AnalysisKind,
    pub time: Option<PartialDateTime>,
    /// Forecast offset in hours (advisories: `FCST SWX +6 HR:`)
    pub hour_offset: Option<u32>,
    pub area: Option<AnalysisArea>,
}

impl Analysis {
    pub fn new(kind: AnalysisKind) -> Self {
        Self {
            kind,
            time: None,
            hour_offset: None,
            area: None,
        }
    }

    pub fn at(mut self, time: PartialDateTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_hour_offset(mut self, hours: u32) -> Self {
        self.hour_offset = Some(hours);
        self
    }

    pub fn with_area(mut self, area: AnalysisArea) -> Self {
        self.area = Some(area);
        self
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.area {
            Some(AnalysisArea::Within(geometry)) => Some(geometry),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAdvisory {
    At(PartialDateTime),
    NoFurtherAdvisories,
}

/// Header fields of an advisory (space weather, volcanic ash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryInfo {
    pub centre: String,
    pub year: u16,
    pub serial_number: u32,
    pub replaces: Option<(u16, u32)>,
    pub effect: Option<String>,
    pub next_advisory: Option<NextAdvisory>,
}

/// Read-only view of a structured weather message.
pub trait WeatherMessage {
    fn message_type(&self) -> MessageType;

    fn report_status(&self) -> ReportStatus {
        ReportStatus::Normal
    }

    fn is_nil(&self) -> bool {
        false
    }

    fn is_cancelled(&self) -> bool {
        false
    }

    fn issue_time(&self) -> Option<PartialDateTime> {
        None
    }

    fn valid_time(&self) -> Option<ValidityPeriod> {
        None
    }

    fn location(&self, _role: LocationRole) -> Option<&LocationIndicator> {
        None
    }

    fn sequence_number(&self) -> Option<&str> {
        None
    }

    fn cancelled_report(&self) -> Option<&CancelledReport> {
        None
    }

    fn usage(&self) -> Option<Usage> {
        None
    }

    fn phenomenon(&self) -> Option<&str> {
        None
    }

    fn analyses(&self) -> &[Analysis] {
        &[]
    }

    fn analysis_count(&self) -> usize {
        self.analyses().len()
    }

    fn analysis(&self, index: usize) -> Option<&Analysis> {
        self.analyses().get(index)
    }

    fn advisory(&self) -> Option<&AdvisoryInfo> {
        None
    }

    /// The lexed source text, when the message was decoded from TAC.
    fn source_sequence(&self) -> Option<&TokenSequence> {
        None
    }
}
