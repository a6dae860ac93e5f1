//! Advisory rows.
//!
//! Every row is a label followed by a value in the label column. A label is written when
//! the message has the value; a value is written only right after its own label, so a
//! missing label silently drops the whole row.

use super::time::{component, day_hour_minute};
use super::{append_word, current_analysis, follows, token_with};
use crate::tac::identity::*;
use crate::tac::model::{
    AnalysisArea, AnalysisKind, MessageType, NextAdvisory, PartialDateTime, Usage,
};
use crate::tac::reconstruct::{ReconstructorContext, ReconstructorRegistry, SerializationError};
use crate::tac::sequence::SequenceBuilder;
use crate::tac::token::ParamValue;

type Outcome = Result<usize, SerializationError>;

pub(super) fn register(registry: &mut ReconstructorRegistry) {
    registry.register(DTG_ISSUE_TIME_LABEL, issue_time_label);
    registry.register(ADVISORY_ISSUE_TIME, issue_time);
    registry.register(ADVISORY_STATUS_LABEL, status_label);
    registry.register(ADVISORY_STATUS, status);
    registry.register(SWX_CENTRE_LABEL, centre_label);
    registry.register(SWX_CENTRE, centre);
    registry.register(ADVISORY_NUMBER_LABEL, number_label);
    registry.register(REPLACE_ADVISORY_NUMBER_LABEL, replaced_number_label);
    registry.register(ADVISORY_NUMBER, number);
    registry.register(SWX_EFFECT_LABEL, effect_label);
    registry.register(SWX_EFFECT, effect);
    registry.register(ADVISORY_PHENOMENA_LABEL, phenomena_label);
    registry.register(ADVISORY_PHENOMENA_TIME_GROUP, phenomena_time);
    registry.register(SWX_NOT_EXPECTED, not_expected);
    registry.register(SWX_NOT_AVAILABLE, not_available);
    registry.register(NEXT_ADVISORY_LABEL, next_advisory_label);
    registry.register(NEXT_ADVISORY, next_advisory);
}

fn label_if(
    present: bool,
    builder: &mut SequenceBuilder,
    text: &str,
    identity: &TokenIdentity,
) -> Outcome {
    Ok(if present {
        append_word(builder, text, identity)
    } else {
        0
    })
}

/// `YYYYMMDD/HHMMZ`
fn date_time(
    identity: &TokenIdentity,
    time: &PartialDateTime,
) -> Result<(String, Vec<(ParamName, ParamValue)>), SerializationError> {
    let year = time
        .year
        .ok_or_else(|| SerializationError::missing(identity, "year"))?;
    if year > 9999 {
        return Err(SerializationError::invalid(
            identity,
            format!("year {} has more than four digits", year),
        ));
    }
    let month = component(identity, "month", time.month, 1..=12)?;
    let (day, hour, minute) = day_hour_minute(identity, time)?;
    Ok((
        format!(
            "{:04}{:02}{:02}/{:02}{:02}Z",
            year, month, day, hour, minute
        ),
        vec![
            (ParamName::Year, i64::from(year).into()),
            (ParamName::Month, i64::from(month).into()),
            (ParamName::Day1, i64::from(day).into()),
            (ParamName::Hour1, i64::from(hour).into()),
            (ParamName::Minute1, i64::from(minute).into()),
        ],
    ))
}

fn issue_time_label(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    label_if(context.message().issue_time().is_some(), builder, "DTG:", identity)
}

fn issue_time(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(time) = context.message().issue_time() else {
        return Ok(0);
    };
    if !follows(builder, &DTG_ISSUE_TIME_LABEL) {
        return Ok(0);
    }
    let (text, params) = date_time(identity, &time)?;
    builder.append(token_with(text, identity, params)?);
    Ok(1)
}

fn status_label(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    label_if(context.message().usage().is_some(), builder, "STATUS:", identity)
}

fn status(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    if !follows(builder, &ADVISORY_STATUS_LABEL) {
        return Ok(0);
    }
    let text = match context.message().usage() {
        Some(Usage::Test) => "TEST",
        Some(Usage::Exercise) => "EXER",
        None => return Ok(0),
    };
    builder.append(token_with(text, identity, [(ParamName::Type, text.into())])?);
    Ok(1)
}

fn centre_label(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    label_if(context.message().advisory().is_some(), builder, "SWXC:", identity)
}

fn centre(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(advisory) = context.message().advisory() else {
        return Ok(0);
    };
    if !follows(builder, &SWX_CENTRE_LABEL) {
        return Ok(0);
    }
    if advisory.centre.is_empty() {
        return Err(SerializationError::missing(identity, "issuing centre"));
    }
    builder.append(token_with(
        advisory.centre.as_str(),
        identity,
        [(ParamName::Value, advisory.centre.as_str().into())],
    )?);
    Ok(1)
}

fn number_label(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    label_if(
        context.message().advisory().is_some(),
        builder,
        "ADVISORY NR:",
        identity,
    )
}

fn replaced_number_label(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let replaces = context
        .message()
        .advisory()
        .is_some_and(|advisory| advisory.replaces.is_some());
    label_if(replaces, builder, "NR RPLC:", identity)
}

/// `2016/1`, either the advisory's own number or the one it replaces.
fn number(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(advisory) = context.message().advisory() else {
        return Ok(0);
    };
    let (year, serial) = if follows(builder, &ADVISORY_NUMBER_LABEL) {
        (advisory.year, advisory.serial_number)
    } else if follows(builder, &REPLACE_ADVISORY_NUMBER_LABEL) {
        match advisory.replaces {
            Some(replaced) => replaced,
            None => return Ok(0),
        }
    } else {
        return Ok(0);
    };
    builder.append(token_with(
        format!("{}/{}", year, serial),
        identity,
        [
            (ParamName::Year, i64::from(year).into()),
            (ParamName::SequenceNumber, i64::from(serial).into()),
        ],
    )?);
    Ok(1)
}

fn effect_label(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let present = context
        .message()
        .advisory()
        .is_some_and(|advisory| advisory.effect.is_some());
    label_if(present, builder, "SWX EFFECT:", identity)
}

/// `HF COM MOD`. The first intensity word splits the effect type from its intensity.
fn effect(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(effect) = context
        .message()
        .advisory()
        .and_then(|advisory| advisory.effect.as_deref())
    else {
        return Ok(0);
    };
    if !follows(builder, &SWX_EFFECT_LABEL) {
        return Ok(0);
    }
    let words: Vec<&str> = effect.split_whitespace().collect();
    let Some(intensity) = words.iter().position(|word| matches!(*word, "MOD" | "SEV")) else {
        return Err(SerializationError::invalid(
            identity,
            format!("effect '{}' has no intensity", effect),
        ));
    };
    builder.append(token_with(
        words.join(" "),
        identity,
        [
            (ParamName::Type, words[..intensity].join(" ").into()),
            (ParamName::Intensity, words[intensity].into()),
        ],
    )?);
    Ok(1)
}

/// `OBS SWX:` or `FCST SWX +6 HR:`
fn phenomena_label(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(analysis) = current_analysis(context) else {
        return Ok(0);
    };
    let subject = match context.message().message_type() {
        MessageType::VolcanicAshAdvisory => "VA CLD",
        _ => "SWX",
    };
    let token = match analysis.kind {
        AnalysisKind::Observation => token_with(
            format!("OBS {}:", subject),
            identity,
            [(ParamName::Type, "OBS".into())],
        )?,
        AnalysisKind::Forecast => {
            let offset = analysis
                .hour_offset
                .ok_or_else(|| SerializationError::missing(identity, "forecast hour offset"))?;
            token_with(
                format!("FCST {} +{} HR:", subject, offset),
                identity,
                [
                    (ParamName::Type, "FCST".into()),
                    (ParamName::HourOffset, i64::from(offset).into()),
                ],
            )?
        }
    };
    builder.append(token);
    Ok(1)
}

/// `DD/HHMMZ`
fn phenomena_time(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(analysis) = current_analysis(context) else {
        return Ok(0);
    };
    if !follows(builder, &ADVISORY_PHENOMENA_LABEL) {
        return Ok(0);
    }
    let time = analysis
        .time
        .ok_or_else(|| SerializationError::missing(identity, "analysis time"))?;
    let (day, hour, minute) = day_hour_minute(identity, &time)?;
    builder.append(token_with(
        format!("{:02}/{:02}{:02}Z", day, hour, minute),
        identity,
        [
            (ParamName::Day1, i64::from(day).into()),
            (ParamName::Hour1, i64::from(hour).into()),
            (ParamName::Minute1, i64::from(minute).into()),
        ],
    )?);
    Ok(1)
}

fn not_expected(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let area = current_analysis(context).and_then(|analysis| analysis.area.as_ref());
    label_if(
        matches!(area, Some(AnalysisArea::NotExpected)),
        builder,
        "NO SWX EXP",
        identity,
    )
}

fn not_available(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let area = current_analysis(context).and_then(|analysis| analysis.area.as_ref());
    label_if(
        matches!(area, Some(AnalysisArea::NotAvailable)),
        builder,
        "NOT AVBL",
        identity,
    )
}

fn next_advisory_label(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let present = context
        .message()
        .advisory()
        .is_some_and(|advisory| advisory.next_advisory.is_some());
    label_if(present, builder, "NXT ADVISORY:", identity)
}

fn next_advisory(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(next) = context
        .message()
        .advisory()
        .and_then(|advisory| advisory.next_advisory.as_ref())
    else {
        return Ok(0);
    };
    if !follows(builder, &NEXT_ADVISORY_LABEL) {
        return Ok(0);
    }
    let token = match next {
        NextAdvisory::NoFurtherAdvisories => token_with(
            "NO FURTHER ADVISORIES",
            identity,
            [(ParamName::Type, "NO_FURTHER_ADVISORIES".into())],
        )?,
        NextAdvisory::At(time) => {
            let (text, mut params) = date_time(identity, time)?;
            params.push((ParamName::Type, "AT".into()));
            token_with(text, identity, params)?
        }
    };
    builder.append(token);
    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::TestMessage;
    use super::*;
    use crate::tac::hints::ConversionHints;
    use crate::tac::model::{AdvisoryInfo, Analysis};
    use crate::tac::reconstruct::context::ANALYSIS_INDEX;

    fn advisory() -> AdvisoryInfo {
        AdvisoryInfo {
            centre: "PECASUS".to_string(),
            year: 2016,
            serial_number: 2,
            replaces: Some((2016, 1)),
            effect: Some("HF COM MOD".to_string()),
            next_advisory: Some(NextAdvisory::NoFurtherAdvisories),
        }
    }

    /// Runs the label then the value strategy, as a layout row would.
    fn row(label: TokenIdentity, value: TokenIdentity, message: &TestMessage) -> String {
        let hints = ConversionHints::default();
        let context = ReconstructorContext::new(message, &hints).with_parameter(ANALYSIS_INDEX, 0);
        let registry = ReconstructorRegistry::with_builtins();
        let mut builder = SequenceBuilder::new();
        registry.try_append(&mut builder, &label, &context).unwrap();
        registry.try_append(&mut builder, &value, &context).unwrap();
        builder
            .tokens()
            .iter()
            .map(|token| token.text())
            .collect::<Vec<_>>()
            .join("|")
    }

    #[test]
    fn test_number_rows() {
        let mut message = TestMessage::new(MessageType::SpaceWeatherAdvisory);
        message.advisory = Some(advisory());
        assert_eq!(
            row(ADVISORY_NUMBER_LABEL, ADVISORY_NUMBER, &message),
            "ADVISORY NR:|2016/2"
        );
        assert_eq!(
            row(REPLACE_ADVISORY_NUMBER_LABEL, ADVISORY_NUMBER, &message),
            "NR RPLC:|2016/1"
        );
    }

    #[test]
    fn test_value_without_its_label_is_dropped() {
        let mut message = TestMessage::new(MessageType::SpaceWeatherAdvisory);
        message.advisory = Some(AdvisoryInfo {
            replaces: None,
            ..advisory()
        });
        assert_eq!(row(REPLACE_ADVISORY_NUMBER_LABEL, ADVISORY_NUMBER, &message), "");
        assert_eq!(row(SWX_CENTRE_LABEL, SWX_EFFECT, &message), "SWXC:");
    }

    #[test]
    fn test_phenomena_rows() {
        let mut message = TestMessage::new(MessageType::SpaceWeatherAdvisory);
        message.analyses = vec![Analysis::new(AnalysisKind::Forecast)
            .with_hour_offset(6)
            .at(PartialDateTime::day_hour_minute(8, 7, 0))
            .with_area(AnalysisArea::NotAvailable)];
        assert_eq!(
            row(ADVISORY_PHENOMENA_LABEL, ADVISORY_PHENOMENA_TIME_GROUP, &message),
            "FCST SWX +6 HR:|08/0700Z"
        );
        assert_eq!(
            row(SWX_NOT_AVAILABLE, SWX_NOT_EXPECTED, &message),
            "NOT AVBL"
        );
    }

    #[test]
    fn test_effect_and_next_advisory() {
        let mut message = TestMessage::new(MessageType::SpaceWeatherAdvisory);
        message.advisory = Some(advisory());
        assert_eq!(
            row(SWX_EFFECT_LABEL, SWX_EFFECT, &message),
            "SWX EFFECT:|HF COM MOD"
        );
        assert_eq!(
            row(NEXT_ADVISORY_LABEL, NEXT_ADVISORY, &message),
            "NXT ADVISORY:|NO FURTHER ADVISORIES"
        );

        message.advisory = Some(AdvisoryInfo {
            next_advisory: Some(NextAdvisory::At(PartialDateTime::full(2016, 11, 8, 7, 0))),
            ..advisory()
        });
        assert_eq!(
            row(NEXT_ADVISORY_LABEL, NEXT_ADVISORY, &message),
            "NXT ADVISORY:|20161108/0700Z"
        );
    }

    /// Runs the label strategy, then returns the outcome of the value strategy.
    fn value_after_label(
        label: TokenIdentity,
        value: TokenIdentity,
        message: &TestMessage,
    ) -> Outcome {
        let hints = ConversionHints::default();
        let context = ReconstructorContext::new(message, &hints).with_parameter(ANALYSIS_INDEX, 0);
        let registry = ReconstructorRegistry::with_builtins();
        let mut builder = SequenceBuilder::new();
        registry.try_append(&mut builder, &label, &context)?;
        registry.try_append(&mut builder, &value, &context)
    }

    #[test]
    fn test_out_of_range_advisory_times_fail() {
        let mut message = TestMessage::new(MessageType::SpaceWeatherAdvisory);
        message.advisory = Some(AdvisoryInfo {
            next_advisory: Some(NextAdvisory::At(PartialDateTime::full(2016, 13, 8, 7, 0))),
            ..advisory()
        });
        assert_eq!(
            value_after_label(NEXT_ADVISORY_LABEL, NEXT_ADVISORY, &message),
            Err(SerializationError::invalid(
                &NEXT_ADVISORY,
                "month 13 is outside [1, 12]"
            ))
        );

        let mut message = TestMessage::new(MessageType::SpaceWeatherAdvisory);
        message.analyses = vec![Analysis::new(AnalysisKind::Forecast)
            .with_hour_offset(6)
            .at(PartialDateTime::day_hour_minute(8, 7, 61))
            .with_area(AnalysisArea::NotAvailable)];
        assert_eq!(
            value_after_label(
                ADVISORY_PHENOMENA_LABEL,
                ADVISORY_PHENOMENA_TIME_GROUP,
                &message
            ),
            Err(SerializationError::invalid(
                &ADVISORY_PHENOMENA_TIME_GROUP,
                "minute 61 is outside [0, 59]"
            ))
        );
    }
}
