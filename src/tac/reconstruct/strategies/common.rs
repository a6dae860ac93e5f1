//! Start markers, status words, locations and the end token.

use super::{append_word, token_with};
use crate::tac::identity::*;
use crate::tac::model::{LocationRole, ReportStatus, Usage};
use crate::tac::reconstruct::{ReconstructorContext, ReconstructorRegistry, SerializationError};
use crate::tac::sequence::SequenceBuilder;

type Outcome = Result<usize, SerializationError>;

pub(super) fn register(registry: &mut ReconstructorRegistry) {
    registry.register(METAR_START, metar_start);
    registry.register(SPECI_START, speci_start);
    registry.register(TAF_START, taf_start);
    registry.register(SIGMET_START, warning_start);
    registry.register(AIRMET_START, warning_start);
    registry.register(SPACE_WEATHER_ADVISORY_START, space_weather_start);
    registry.register(VOLCANIC_ASH_ADVISORY_START, volcanic_ash_start);
    registry.register(CORRECTION, correction);
    registry.register(AMENDMENT, amendment);
    registry.register(NIL, nil);
    registry.register(CANCELLATION, cancellation);
    registry.register(AERODROME_DESIGNATOR, aerodrome);
    registry.register(SEQUENCE_DESCRIPTOR, sequence_descriptor);
    registry.register(MWO_DESIGNATOR, mwo);
    registry.register(FIR_DESIGNATOR, fir_designator);
    registry.register(SIGMET_USAGE, usage);
    registry.register(PHENOMENON_SIGMET, phenomenon);
    registry.register(END_TOKEN, end);
}

fn metar_start(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    _: &ReconstructorContext<'_>,
) -> Outcome {
    Ok(append_word(builder, "METAR", identity))
}

fn speci_start(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    _: &ReconstructorContext<'_>,
) -> Outcome {
    Ok(append_word(builder, "SPECI", identity))
}

fn taf_start(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    _: &ReconstructorContext<'_>,
) -> Outcome {
    Ok(append_word(builder, "TAF", identity))
}

fn space_weather_start(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    _: &ReconstructorContext<'_>,
) -> Outcome {
    Ok(append_word(builder, "SWX ADVISORY", identity))
}

fn volcanic_ash_start(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    _: &ReconstructorContext<'_>,
) -> Outcome {
    Ok(append_word(builder, "VA ADVISORY", identity))
}

/// `EHAA SIGMET`, `EFIN AIRMET`. The location is the FIR's, or else the watch office's.
fn warning_start(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let message = context.message();
    let location = message
        .location(LocationRole::FlightInformationRegion)
        .or_else(|| message.location(LocationRole::MeteorologicalWatchOffice))
        .ok_or_else(|| SerializationError::missing(identity, "location indicator"))?;
    let keyword = if identity == &AIRMET_START {
        "AIRMET"
    } else {
        "SIGMET"
    };
    builder.append(token_with(
        format!("{} {}", location.designator, keyword),
        identity,
        [(ParamName::LocationIndicator, location.designator.as_str().into())],
    )?);
    Ok(1)
}

fn correction(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    if context.message().report_status() == ReportStatus::Correction {
        return Ok(append_word(builder, "COR", identity));
    }
    Ok(0)
}

fn amendment(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    if context.message().report_status() == ReportStatus::Amendment {
        return Ok(append_word(builder, "AMD", identity));
    }
    Ok(0)
}

fn nil(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    if context.message().is_nil() {
        return Ok(append_word(builder, "NIL", identity));
    }
    Ok(0)
}

/// A bare `CNL`. Warnings name the cancelled report instead, see the cancel strategies.
fn cancellation(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let message = context.message();
    if message.is_cancelled() && message.cancelled_report().is_none() {
        return Ok(append_word(builder, "CNL", identity));
    }
    Ok(0)
}

fn aerodrome(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(aerodrome) = context.message().location(LocationRole::Aerodrome) else {
        return Ok(0);
    };
    let designator = aerodrome.designator.as_str();
    let country: String = designator.chars().take(2).collect();
    builder.append(token_with(
        designator,
        identity,
        [
            (ParamName::Value, designator.into()),
            (ParamName::Country, country.into()),
        ],
    )?);
    Ok(1)
}

fn sequence_descriptor(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(number) = context.message().sequence_number() else {
        return Ok(0);
    };
    builder.append(token_with(
        number,
        identity,
        [(ParamName::SequenceNumber, number.into())],
    )?);
    Ok(1)
}

fn mwo(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(office) = context
        .message()
        .location(LocationRole::MeteorologicalWatchOffice)
    else {
        return Ok(0);
    };
    builder.append(token_with(
        format!("{}-", office.designator),
        identity,
        [(ParamName::LocationIndicator, office.designator.as_str().into())],
    )?);
    Ok(1)
}

fn fir_designator(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(fir) = context
        .message()
        .location(LocationRole::FlightInformationRegion)
    else {
        return Ok(0);
    };
    builder.append(token_with(
        fir.designator.as_str(),
        identity,
        [(ParamName::LocationIndicator, fir.designator.as_str().into())],
    )?);
    Ok(1)
}

fn usage(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let text = match context.message().usage() {
        Some(Usage::Test) => "TEST",
        Some(Usage::Exercise) => "EXER",
        None => return Ok(0),
    };
    builder.append(token_with(text, identity, [(ParamName::Type, text.into())])?);
    Ok(1)
}

fn phenomenon(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(phenomenon) = context.message().phenomenon() else {
        return Ok(0);
    };
    builder.append(token_with(
        phenomenon,
        identity,
        [(ParamName::Value, phenomenon.into())],
    )?);
    Ok(1)
}

fn end(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    _: &ReconstructorContext<'_>,
) -> Outcome {
    Ok(append_word(builder, "=", identity))
}
