//! Issue times, validity periods and cancelled report references.

use super::token_with;
use crate::tac::hints::ValidityTimeFormat;
use crate::tac::identity::*;
use crate::tac::model::{MessageType, PartialDateTime, ValidityPeriod};
use crate::tac::reconstruct::{ReconstructorContext, ReconstructorRegistry, SerializationError};
use crate::tac::sequence::SequenceBuilder;
use crate::tac::token::ParamValue;
use std::ops::RangeInclusive;

type Outcome = Result<usize, SerializationError>;

pub(super) fn register(registry: &mut ReconstructorRegistry) {
    registry.register(ISSUE_TIME, issue_time);
    registry.register(VALID_TIME, valid_time);
    registry.register(SIGMET_CANCEL, cancelled_report);
    registry.register(AIRMET_CANCEL, cancelled_report);
}

/// `value` of a time component, failing when it is absent or outside `range`.
pub(super) fn component(
    identity: &TokenIdentity,
    what: &'static str,
    value: Option<u8>,
    range: RangeInclusive<u8>,
) -> Result<u8, SerializationError> {
    let value = value.ok_or_else(|| SerializationError::missing(identity, what))?;
    if !range.contains(&value) {
        return Err(SerializationError::invalid(
            identity,
            format!(
                "{} {} is outside [{}, {}]",
                what,
                value,
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(value)
}

/// Day, hour and minute of `time`, failing on the first missing or out-of-range component.
pub(super) fn day_hour_minute(
    identity: &TokenIdentity,
    time: &PartialDateTime,
) -> Result<(u8, u8, u8), SerializationError> {
    let (day, hour) = day_hour(identity, time)?;
    let minute = component(identity, "minute", time.minute, 0..=59)?;
    Ok((day, hour, minute))
}

// Hour 24 closes TAF periods (`0118/0124`).
fn day_hour(
    identity: &TokenIdentity,
    time: &PartialDateTime,
) -> Result<(u8, u8), SerializationError> {
    Ok((
        component(identity, "day", time.day, 1..=31)?,
        component(identity, "hour", time.hour, 0..=24)?,
    ))
}

fn time_params(
    day: u8,
    hour: u8,
    minute: Option<u8>,
    second: bool,
) -> Vec<(ParamName, ParamValue)> {
    let (d, h, m) = if second {
        (ParamName::Day2, ParamName::Hour2, ParamName::Minute2)
    } else {
        (ParamName::Day1, ParamName::Hour1, ParamName::Minute1)
    };
    let mut params = vec![(d, i64::from(day).into()), (h, i64::from(hour).into())];
    if let Some(minute) = minute {
        params.push((m, i64::from(minute).into()));
    }
    params
}

/// `DDHHMMZ`
fn issue_time(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(time) = context.message().issue_time() else {
        return Ok(0);
    };
    let (day, hour, minute) = day_hour_minute(identity, &time)?;
    builder.append(token_with(
        format!("{:02}{:02}{:02}Z", day, hour, minute),
        identity,
        time_params(day, hour, Some(minute), false),
    )?);
    Ok(1)
}

/// `DDHHMM/DDHHMM` with every component present.
fn warning_period(
    identity: &TokenIdentity,
    period: &ValidityPeriod,
) -> Result<(String, Vec<(ParamName, ParamValue)>), SerializationError> {
    let (day1, hour1, minute1) = day_hour_minute(identity, &period.start)?;
    let (day2, hour2, minute2) = day_hour_minute(identity, &period.end)?;
    let mut params = time_params(day1, hour1, Some(minute1), false);
    params.extend(time_params(day2, hour2, Some(minute2), true));
    Ok((
        format!(
            "{:02}{:02}{:02}/{:02}{:02}{:02}",
            day1, hour1, minute1, day2, hour2, minute2
        ),
        params,
    ))
}

/// TAF periods are `DDHH/DDHH`, or `DDHHHH` when short periods are preferred and the period
/// stays within one day. Warnings are `VALID DDHHMM/DDHHMM`.
fn valid_time(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let message = context.message();
    let Some(period) = message.valid_time() else {
        return Ok(0);
    };

    let (text, params) = match message.message_type() {
        MessageType::Sigmet | MessageType::Airmet => {
            let (text, params) = warning_period(identity, &period)?;
            (format!("VALID {}", text), params)
        }
        _ => {
            let (day1, hour1) = day_hour(identity, &period.start)?;
            let (day2, hour2) = day_hour(identity, &period.end)?;
            let mut params = time_params(day1, hour1, None, false);
            params.extend(time_params(day2, hour2, None, true));
            let text = match context.hints().validity_time_format {
                ValidityTimeFormat::Short if day1 == day2 => {
                    format!("{:02}{:02}{:02}", day1, hour1, hour2)
                }
                _ => format!("{:02}{:02}/{:02}{:02}", day1, hour1, day2, hour2),
            };
            (text, params)
        }
    };
    builder.append(token_with(text, identity, params)?);
    Ok(1)
}

/// `CNL SIGMET M01 271130/271530`. Registered for both cancel identities; each writes only
/// a reference to its own report type.
fn cancelled_report(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(cancelled) = context.message().cancelled_report() else {
        return Ok(0);
    };
    let keyword = match cancelled.message_type {
        MessageType::Sigmet if identity == &SIGMET_CANCEL => "SIGMET",
        MessageType::Airmet if identity == &AIRMET_CANCEL => "AIRMET",
        _ => return Ok(0),
    };
    let (period, mut params) = warning_period(identity, &cancelled.valid_time)?;
    params.push((
        ParamName::SequenceNumber,
        cancelled.sequence_number.as_str().into(),
    ));
    builder.append(token_with(
        format!("CNL {} {} {}", keyword, cancelled.sequence_number, period),
        identity,
        params,
    )?);
    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::TestMessage;
    use super::*;
    use crate::tac::hints::ConversionHints;
    use crate::tac::model::CancelledReport;
    use rstest::rstest;

    fn render(
        identity: TokenIdentity,
        message: &TestMessage,
        hints: &ConversionHints,
    ) -> Outcome {
        let context = ReconstructorContext::new(message, hints);
        let mut builder = SequenceBuilder::new();
        let mut registry = ReconstructorRegistry::new();
        register(&mut registry);
        registry.try_append(&mut builder, &identity, &context)
    }

    fn rendered(identity: TokenIdentity, message: &TestMessage, hints: &ConversionHints) -> String {
        let context = ReconstructorContext::new(message, hints);
        let mut builder = SequenceBuilder::new();
        let mut registry = ReconstructorRegistry::new();
        register(&mut registry);
        registry.try_append(&mut builder, &identity, &context).unwrap();
        builder.build().render()
    }

    fn period(start: PartialDateTime, end: PartialDateTime) -> ValidityPeriod {
        ValidityPeriod::new(start, end)
    }

    #[rstest]
    #[case(ValidityTimeFormat::Long, (1, 18), (2, 18), "0118/0218")]
    #[case(ValidityTimeFormat::Short, (1, 6), (1, 15), "010615")]
    #[case(ValidityTimeFormat::Short, (1, 18), (2, 18), "0118/0218")]
    fn test_taf_validity(
        #[case] format: ValidityTimeFormat,
        #[case] start: (u8, u8),
        #[case] end: (u8, u8),
        #[case] expected: &str,
    ) {
        let mut message = TestMessage::new(MessageType::Taf);
        message.valid_time = Some(period(
            PartialDateTime::day_hour(start.0, start.1),
            PartialDateTime::day_hour(end.0, end.1),
        ));
        let hints = ConversionHints::default().with_validity_time_format(format);
        assert_eq!(rendered(VALID_TIME, &message, &hints), expected);
    }

    #[test]
    fn test_warning_validity() {
        let mut message = TestMessage::new(MessageType::Sigmet);
        message.valid_time = Some(period(
            PartialDateTime::day_hour_minute(27, 13, 30),
            PartialDateTime::day_hour_minute(27, 15, 30),
        ));
        assert_eq!(
            rendered(VALID_TIME, &message, &ConversionHints::default()),
            "VALID 271330/271530"
        );
    }

    #[test]
    fn test_incomplete_issue_time_fails() {
        let mut message = TestMessage::new(MessageType::Metar);
        message.issue_time = Some(PartialDateTime::day_hour(1, 17));
        assert_eq!(
            render(ISSUE_TIME, &message, &ConversionHints::default()),
            Err(SerializationError::missing(&ISSUE_TIME, "minute"))
        );
    }

    #[rstest]
    #[case(PartialDateTime::day_hour_minute(1, 100, 75), "hour 100 is outside [0, 24]")]
    #[case(PartialDateTime::day_hour_minute(1, 17, 75), "minute 75 is outside [0, 59]")]
    #[case(PartialDateTime::day_hour_minute(0, 17, 50), "day 0 is outside [1, 31]")]
    #[case(PartialDateTime::day_hour_minute(32, 17, 50), "day 32 is outside [1, 31]")]
    fn test_out_of_range_issue_time_fails(#[case] time: PartialDateTime, #[case] expected: &str) {
        let mut message = TestMessage::new(MessageType::Metar);
        message.issue_time = Some(time);
        assert_eq!(
            render(ISSUE_TIME, &message, &ConversionHints::default()),
            Err(SerializationError::invalid(&ISSUE_TIME, expected))
        );
    }

    #[test]
    fn test_out_of_range_validity_fails() {
        let mut message = TestMessage::new(MessageType::Taf);
        message.valid_time = Some(period(
            PartialDateTime::day_hour(1, 18),
            PartialDateTime::day_hour(2, 25),
        ));
        assert_eq!(
            render(VALID_TIME, &message, &ConversionHints::default()),
            Err(SerializationError::invalid(&VALID_TIME, "hour 25 is outside [0, 24]"))
        );

        let mut warning = TestMessage::new(MessageType::Sigmet);
        warning.valid_time = Some(period(
            PartialDateTime::day_hour_minute(27, 13, 60),
            PartialDateTime::day_hour_minute(27, 15, 30),
        ));
        assert!(matches!(
            render(VALID_TIME, &warning, &ConversionHints::default()),
            Err(SerializationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_period_ending_at_hour_24() {
        let mut message = TestMessage::new(MessageType::Taf);
        message.valid_time = Some(period(
            PartialDateTime::day_hour(1, 18),
            PartialDateTime::day_hour(1, 24),
        ));
        assert_eq!(
            rendered(VALID_TIME, &message, &ConversionHints::default()),
            "0118/0124"
        );
    }

    #[test]
    fn test_cancel_writes_only_its_own_report_type() {
        let mut message = TestMessage::new(MessageType::Sigmet);
        message.cancelled_report = Some(CancelledReport {
            message_type: MessageType::Airmet,
            sequence_number: "M01".to_string(),
            valid_time: period(
                PartialDateTime::day_hour_minute(27, 11, 30),
                PartialDateTime::day_hour_minute(27, 15, 30),
            ),
        });
        let hints = ConversionHints::default();
        assert_eq!(render(SIGMET_CANCEL, &message, &hints), Ok(0));
        assert_eq!(
            rendered(AIRMET_CANCEL, &message, &hints),
            "CNL AIRMET M01 271130/271530"
        );
    }
}
