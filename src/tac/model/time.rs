//! Partial date-times as they appear in TAC groups
//!
//! TAC rarely writes a full timestamp: `011733Z` has only day, hour and minute, `0118/0218`
//! only days and hours. Each component is therefore optional.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartialDateTime {
    pub year: Option<u16>,
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
}

impl PartialDateTime {
    pub fn day_hour(day: u8, hour: u8) -> Self {
        Self {
            day: Some(day),
            hour: Some(hour),
            ..Self::default()
        }
    }

    pub fn day_hour_minute(day: u8, hour: u8, minute: u8) -> Self {
        Self {
            day: Some(day),
            hour: Some(hour),
            minute: Some(minute),
            ..Self::default()
        }
    }

    pub fn full(year: u16, month: u8, day: u8, hour: u8, minute: u8) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            day: Some(day),
            hour: Some(hour),
            minute: Some(minute),
        }
    }
}

/// A validity period between two partial date-times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityPeriod {
    pub start: PartialDateTime,
    pub end: PartialDateTime,
}

impl ValidityPeriod {
    pub fn new(start: PartialDateTime, end: PartialDateTime) -> Self {
        Self { start, end }
    }
}
