//! FIR names, analyses and polygon areas.

use super::{append_word, current_analysis, token_with};
use crate::tac::identity::*;
use crate::tac::model::{
    AnalysisArea, AnalysisKind, FirLookup, GeoPosition, Geometry, LocationRole, MessageType,
};
use crate::tac::reconstruct::{
    Reconstructor, ReconstructorContext, ReconstructorRegistry, SerializationError,
};
use crate::tac::sequence::SequenceBuilder;
use crate::tac::token::{ParamValue, Token};
use std::sync::Arc;

type Outcome = Result<usize, SerializationError>;

/// Region type words that may end a FIR name.
const FIR_TYPES: &[&str] = &["FIR", "UIR", "CTA", "FIR/UIR"];

pub(super) fn register(registry: &mut ReconstructorRegistry) {
    registry.register(FIR_NAME, FirNameReconstructor::new(None));
    registry.register(OBS_OR_FORECAST, obs_or_forecast);
    register_areas(registry, None);
}

/// Register the area strategies, comparing polygons against the FIR outlines of `lookup`.
pub(super) fn register_areas(
    registry: &mut ReconstructorRegistry,
    lookup: Option<Arc<dyn FirLookup>>,
) {
    registry.register(SIGMET_WITHIN, AreaReconstructor::new(within, lookup.clone()));
    registry.register(POLYGON_COORDINATE_PAIR, AreaReconstructor::new(polygon, lookup.clone()));
    registry.register(SIGMET_ENTIRE_AREA, AreaReconstructor::new(entire_area, lookup));
}

type AreaStrategy = fn(
    &mut SequenceBuilder,
    &TokenIdentity,
    &ReconstructorContext<'_>,
    bool,
) -> Result<usize, SerializationError>;

/// Runs an area strategy, telling it whether the analysed polygon is the outline of the
/// message's FIR. Such a polygon is written as `ENTIRE FIR`.
struct AreaReconstructor {
    strategy: AreaStrategy,
    lookup: Option<Arc<dyn FirLookup>>,
}

impl AreaReconstructor {
    fn new(strategy: AreaStrategy, lookup: Option<Arc<dyn FirLookup>>) -> Self {
        Self { strategy, lookup }
    }

    fn covers_entire_fir(&self, context: &ReconstructorContext<'_>) -> bool {
        let Some(lookup) = self.lookup.as_deref() else {
            return false;
        };
        let Some(geometry) = current_analysis(context).and_then(|analysis| analysis.geometry())
        else {
            return false;
        };
        let Some(fir) = context
            .message()
            .location(LocationRole::FlightInformationRegion)
        else {
            return false;
        };
        lookup
            .name_for(&fir.designator)
            .or_else(|| fir.name.clone())
            .and_then(|name| lookup.geometry_for(&name, true))
            .is_some_and(|outline| &outline == geometry)
    }
}

impl Reconstructor for AreaReconstructor {
    fn try_append(
        &self,
        builder: &mut SequenceBuilder,
        identity: &TokenIdentity,
        context: &ReconstructorContext<'_>,
    ) -> Outcome {
        (self.strategy)(builder, identity, context, self.covers_entire_fir(context))
    }
}

/// Writes `AMSTERDAM FIR` as name words followed by the FIR_NAME token.
///
/// The name comes from the FIR location indicator, or else from the FIR lookup.
pub(crate) struct FirNameReconstructor {
    lookup: Option<Arc<dyn FirLookup>>,
}

impl FirNameReconstructor {
    pub(crate) fn new(lookup: Option<Arc<dyn FirLookup>>) -> Self {
        Self { lookup }
    }
}

impl Reconstructor for FirNameReconstructor {
    fn try_append(
        &self,
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
        let name = fir
            .name
            .clone()
            .or_else(|| {
                self.lookup
                    .as_ref()
                    .and_then(|lookup| lookup.name_for(&fir.designator))
            })
            .ok_or_else(|| SerializationError::missing(identity, "FIR name"))?;

        let mut words: Vec<&str> = name.split_whitespace().collect();
        let kind = match words.last().copied() {
            Some(last) if FIR_TYPES.contains(&last) => {
                words.pop();
                last
            }
            _ => "FIR",
        };
        if words.is_empty() {
            return Err(SerializationError::missing(identity, "FIR name"));
        }

        for word in &words {
            builder.append(token_with(
                *word,
                &SIGMET_FIR_NAME_WORD,
                [(ParamName::Value, (*word).into())],
            )?);
            builder.append(Token::whitespace(" "));
        }
        builder.append(token_with(
            kind,
            identity,
            [
                (ParamName::Value, words.join(" ").into()),
                (ParamName::Type, kind.into()),
            ],
        )?);
        Ok(words.len() * 2 + 1)
    }
}

/// `OBS`, `FCST`, with ` AT HHMMZ` when the analysis has a time.
fn obs_or_forecast(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
) -> Outcome {
    let Some(analysis) = current_analysis(context) else {
        return Ok(0);
    };
    let kind = match analysis.kind {
        AnalysisKind::Observation => "OBS",
        AnalysisKind::Forecast => "FCST",
    };
    let mut params: Vec<(ParamName, ParamValue)> = vec![(ParamName::Type, kind.into())];
    let text = match analysis.time.and_then(|time| time.hour.zip(time.minute)) {
        Some((hour, minute)) => {
            params.push((ParamName::Hour1, i64::from(hour).into()));
            params.push((ParamName::Minute1, i64::from(minute).into()));
            format!("{} AT {:02}{:02}Z", kind, hour, minute)
        }
        None => kind.to_string(),
    };
    builder.append(token_with(text, identity, params)?);
    Ok(1)
}

fn within(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
    entire_fir: bool,
) -> Outcome {
    match current_analysis(context).and_then(|analysis| analysis.geometry()) {
        Some(_) if !entire_fir => Ok(append_word(builder, "WI", identity)),
        _ => Ok(0),
    }
}

fn entire_area(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
    entire_fir: bool,
) -> Outcome {
    let area = current_analysis(context).and_then(|analysis| analysis.area.as_ref());
    if !entire_fir && !matches!(area, Some(AnalysisArea::EntireFir)) {
        return Ok(0);
    }
    builder.append(token_with(
        "ENTIRE FIR",
        identity,
        [(ParamName::Type, "FIR".into())],
    )?);
    Ok(1)
}

fn degrees_and_minutes(value: f64) -> (u32, u32) {
    let total = (value.abs() * 60.0).round() as u32;
    (total / 60, total % 60)
}

/// `N5200 E00520`, or `N52 E005` in compact form when both minutes are zero.
pub(crate) fn format_position(
    position: &GeoPosition,
    compact: bool,
) -> Result<String, SerializationError> {
    if !(-90.0..=90.0).contains(&position.latitude) {
        return Err(SerializationError::LatitudeOutOfRange(position.latitude));
    }
    if !(-180.0..=180.0).contains(&position.longitude) {
        return Err(SerializationError::LongitudeOutOfRange(position.longitude));
    }
    let north_south = if position.latitude < 0.0 { 'S' } else { 'N' };
    let east_west = if position.longitude < 0.0 { 'W' } else { 'E' };
    let (lat_degrees, lat_minutes) = degrees_and_minutes(position.latitude);
    let (lon_degrees, lon_minutes) = degrees_and_minutes(position.longitude);

    if compact && lat_minutes == 0 && lon_minutes == 0 {
        Ok(format!(
            "{}{:02} {}{:03}",
            north_south, lat_degrees, east_west, lon_degrees
        ))
    } else {
        Ok(format!(
            "{}{:02}{:02} {}{:03}{:02}",
            north_south, lat_degrees, lat_minutes, east_west, lon_degrees, lon_minutes
        ))
    }
}

/// Polygon corners joined by ` - `. Advisories use the compact position form.
fn polygon(
    builder: &mut SequenceBuilder,
    identity: &TokenIdentity,
    context: &ReconstructorContext<'_>,
    entire_fir: bool,
) -> Outcome {
    if entire_fir {
        return Ok(0);
    }
    let Some(Geometry::Polygon(positions)) =
        current_analysis(context).and_then(|analysis| analysis.geometry())
    else {
        return Ok(0);
    };
    let compact = matches!(
        context.message().message_type(),
        MessageType::SpaceWeatherAdvisory | MessageType::VolcanicAshAdvisory
    );

    let mut appended = 0;
    for (index, position) in positions.iter().enumerate() {
        let text = format_position(position, compact)?;
        if index > 0 {
            builder.append(Token::whitespace(" "));
            builder.append(Token::identified("-", POLYGON_COORDINATE_PAIR_SEPARATOR));
            builder.append(Token::whitespace(" "));
            appended += 3;
        }
        builder.append(token_with(
            text,
            identity,
            [
                (ParamName::Latitude, position.latitude.into()),
                (ParamName::Longitude, position.longitude.into()),
            ],
        )?);
        appended += 1;
    }
    Ok(appended)
}
