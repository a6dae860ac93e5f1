//! Layouts and the layout serializer
//!
//!     A [Layout] is the token schema of one message type: an ordered table of identities,
//!     each with the [Separator] written before it. The [LayoutSerializer] walks the table
//!     and drives the registry:
//!
//!         1. the separator is appended speculatively (never before the first token),
//!         2. the strategy for the identity runs,
//!         3. when the strategy appended nothing, the separator is removed again.
//!
//!     A [LayoutEntry::Repeat] re-runs its child entries once per index up to a count taken
//!     from the message, handing the index to the strategies through a derived context.
//!
//! Whitespace Passthrough
//!
//!     With the `whitespace_passthrough` hint set and a message that carries its source
//!     sequence, the separator is taken from the source instead: the whitespace that
//!     followed the same occurrence of the previously written identity. When the source
//!     has no whitespace there, the canonical separator is used.

use super::context::ReconstructorContext;
use super::{ReconstructorRegistry, SerializationError};
use crate::tac::hints::ConversionHints;
use crate::tac::identity::*;
use crate::tac::issues::{ConversionIssue, ConversionResult};
use crate::tac::model::{MessageType, WeatherMessage};
use crate::tac::sequence::{SequenceBuilder, TokenSequence};
use crate::tac::token::Token;
use tracing::{debug, trace, warn};

/// Whitespace written before a layout entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    None,
    Space,
    Newline,
    /// Pad the current row with spaces to the advisory label column (at least one space).
    Column,
}

impl Separator {
    fn text(&self, builder: &SequenceBuilder, hints: &ConversionHints) -> Option<String> {
        match self {
            Separator::None => None,
            Separator::Space => Some(" ".to_string()),
            Separator::Newline => Some("\n".to_string()),
            Separator::Column => {
                let width = hints
                    .advisory_label_width
                    .saturating_sub(builder.current_line_width())
                    .max(1);
                Some(" ".repeat(width))
            }
        }
    }
}

/// Number of repetitions of a [LayoutEntry::Repeat] for a message.
pub type RepeatCount = fn(&dyn WeatherMessage) -> usize;

#[derive(Debug, Clone)]
pub enum LayoutEntry {
    Token {
        identity: TokenIdentity,
        separator: Separator,
    },
    Repeat {
        parameter: &'static str,
        count: RepeatCount,
        entries: Vec<LayoutEntry>,
    },
}

impl LayoutEntry {
    pub fn token(separator: Separator, identity: TokenIdentity) -> Self {
        LayoutEntry::Token {
            identity,
            separator,
        }
    }

    pub fn repeat(parameter: &'static str, count: RepeatCount, entries: Vec<LayoutEntry>) -> Self {
        LayoutEntry::Repeat {
            parameter,
            count,
            entries,
        }
    }
}

fn analysis_count(message: &dyn WeatherMessage) -> usize {
    message.analysis_count()
}

#[derive(Debug, Clone)]
pub struct Layout {
    message_type: MessageType,
    entries: Vec<LayoutEntry>,
}

impl Layout {
    pub fn new(message_type: MessageType, entries: Vec<LayoutEntry>) -> Self {
        Self {
            message_type,
            entries,
        }
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// The built-in layout for `message_type`, if there is one.
    pub fn for_message_type(message_type: MessageType) -> Option<Layout> {
        use Separator::*;
        let t = LayoutEntry::token;

        let entries = match message_type {
            MessageType::Metar => vec![
                t(None, METAR_START),
                t(Space, CORRECTION),
                t(Space, AERODROME_DESIGNATOR),
                t(Space, ISSUE_TIME),
                t(Space, NIL),
                t(None, END_TOKEN),
            ],
            MessageType::Taf => vec![
                t(None, TAF_START),
                t(Space, AMENDMENT),
                t(Space, CORRECTION),
                t(Space, AERODROME_DESIGNATOR),
                t(Space, ISSUE_TIME),
                t(Space, NIL),
                t(Space, VALID_TIME),
                t(Space, CANCELLATION),
                t(None, END_TOKEN),
            ],
            MessageType::Sigmet | MessageType::Airmet => {
                let start = if message_type == MessageType::Sigmet {
                    SIGMET_START
                } else {
                    AIRMET_START
                };
                vec![
                    t(None, start),
                    t(Space, SEQUENCE_DESCRIPTOR),
                    t(Space, VALID_TIME),
                    t(Space, MWO_DESIGNATOR),
                    t(Newline, FIR_DESIGNATOR),
                    t(Space, FIR_NAME),
                    t(Space, SIGMET_USAGE),
                    t(Space, SIGMET_CANCEL),
                    t(Space, AIRMET_CANCEL),
                    t(Space, PHENOMENON_SIGMET),
                    LayoutEntry::repeat(
                        super::context::ANALYSIS_INDEX,
                        analysis_count,
                        vec![
                            t(Space, OBS_OR_FORECAST),
                            t(Space, SIGMET_WITHIN),
                            t(Space, POLYGON_COORDINATE_PAIR),
                            t(Space, SIGMET_ENTIRE_AREA),
                        ],
                    ),
                    t(None, END_TOKEN),
                ]
            }
            MessageType::SpaceWeatherAdvisory => vec![
                t(None, SPACE_WEATHER_ADVISORY_START),
                t(Newline, DTG_ISSUE_TIME_LABEL),
                t(Column, ADVISORY_ISSUE_TIME),
                t(Newline, ADVISORY_STATUS_LABEL),
                t(Column, ADVISORY_STATUS),
                t(Newline, SWX_CENTRE_LABEL),
                t(Column, SWX_CENTRE),
                t(Newline, ADVISORY_NUMBER_LABEL),
                t(Column, ADVISORY_NUMBER),
                t(Newline, REPLACE_ADVISORY_NUMBER_LABEL),
                t(Column, ADVISORY_NUMBER),
                t(Newline, SWX_EFFECT_LABEL),
                t(Column, SWX_EFFECT),
                LayoutEntry::repeat(
                    super::context::ANALYSIS_INDEX,
                    analysis_count,
                    vec![
                        t(Newline, ADVISORY_PHENOMENA_LABEL),
                        t(Column, ADVISORY_PHENOMENA_TIME_GROUP),
                        t(Space, SWX_NOT_EXPECTED),
                        t(Space, SWX_NOT_AVAILABLE),
                        t(Space, POLYGON_COORDINATE_PAIR),
                    ],
                ),
                t(Newline, NEXT_ADVISORY_LABEL),
                t(Column, NEXT_ADVISORY),
                t(None, END_TOKEN),
            ],
            MessageType::VolcanicAshAdvisory | MessageType::Generic => return Option::None,
        };
        Some(Layout::new(message_type, entries))
    }
}

/// Serializes messages by walking their [Layout] against a [ReconstructorRegistry].
#[derive(Debug, Clone)]
pub struct LayoutSerializer {
    registry: ReconstructorRegistry,
}

impl Default for LayoutSerializer {
    fn default() -> Self {
        Self::new(ReconstructorRegistry::with_builtins())
    }
}

impl LayoutSerializer {
    pub fn new(registry: ReconstructorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ReconstructorRegistry {
        &self.registry
    }

    /// Serialize `message` with the built-in layout of its message type.
    pub fn serialize(
        &self,
        message: &dyn WeatherMessage,
        hints: &ConversionHints,
    ) -> ConversionResult<TokenSequence> {
        match Layout::for_message_type(message.message_type()) {
            Some(layout) => self.serialize_with(&layout, message, hints),
            None => ConversionResult::failed(ConversionIssue::serialization(format!(
                "no layout for message type {}",
                message.message_type()
            )))
            .with_bulletin_id(hints.bulletin_id.clone()),
        }
    }

    pub fn serialize_with(
        &self,
        layout: &Layout,
        message: &dyn WeatherMessage,
        hints: &ConversionHints,
    ) -> ConversionResult<TokenSequence> {
        let context = ReconstructorContext::new(message, hints);
        let mut builder = SequenceBuilder::new();
        let result = match self.append_entries(&mut builder, layout.entries(), &context) {
            Ok(()) => {
                let sequence = builder.build();
                debug!(
                    message_type = %layout.message_type(),
                    tokens = sequence.len(),
                    "serialized"
                );
                ConversionResult::success(sequence)
            }
            Err(error) => {
                warn!(message_type = %layout.message_type(), %error, "serialization failed");
                ConversionResult::failed(ConversionIssue::serialization(error.to_string()))
            }
        };
        result.with_bulletin_id(hints.bulletin_id.clone())
    }

    fn append_entries(
        &self,
        builder: &mut SequenceBuilder,
        entries: &[LayoutEntry],
        context: &ReconstructorContext<'_>,
    ) -> Result<(), SerializationError> {
        for entry in entries {
            match entry {
                LayoutEntry::Token {
                    identity,
                    separator,
                } => self.append_token(builder, identity, *separator, context)?,
                LayoutEntry::Repeat {
                    parameter,
                    count,
                    entries,
                } => {
                    for index in 0..count(context.message()) {
                        let derived = context.with_parameter(parameter, index);
                        self.append_entries(builder, entries, &derived)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn append_token(
        &self,
        builder: &mut SequenceBuilder,
        identity: &TokenIdentity,
        separator: Separator,
        context: &ReconstructorContext<'_>,
    ) -> Result<(), SerializationError> {
        let before = builder.len();
        if !builder.is_empty() {
            let text = passthrough_whitespace(builder, context)
                .or_else(|| separator.text(builder, context.hints()));
            if let Some(text) = text {
                builder.append(Token::whitespace(text));
            }
        }

        let appended = self.registry.try_append(builder, identity, context)?;
        if appended == 0 {
            while builder.len() > before {
                builder.remove_last();
            }
        }
        trace!(identity = %identity, appended, "layout entry");
        Ok(())
    }
}

/// The whitespace that followed the last written identity in the source sequence.
fn passthrough_whitespace(
    builder: &SequenceBuilder,
    context: &ReconstructorContext<'_>,
) -> Option<String> {
    if !context.hints().whitespace_passthrough {
        return None;
    }
    let source = context.message().source_sequence()?;
    let tokens = builder.tokens();
    let last = tokens.iter().rev().find(|token| !token.is_whitespace())?;
    let identity = last.identity()?;
    let occurrence = tokens
        .iter()
        .filter(|token| token.has_identity(identity))
        .count()
        .checked_sub(1)?;

    let following = source
        .refs()
        .filter(|token| token.has_identity(identity))
        .nth(occurrence)?
        .next_raw()?;
    if following.is_whitespace() && !following.is_ignored() {
        Some(following.text().to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tac::model::{LocationIndicator, LocationRole, PartialDateTime};

    struct Metar {
        aerodrome: LocationIndicator,
        issue_time: Option<PartialDateTime>,
        nil: bool,
        source: Option<TokenSequence>,
    }

    impl Metar {
        fn new() -> Self {
            Self {
                aerodrome: LocationIndicator::new("EFHK"),
                issue_time: Some(PartialDateTime::day_hour_minute(1, 17, 50)),
                nil: false,
                source: None,
            }
        }
    }

    impl WeatherMessage for Metar {
        fn message_type(&self) -> MessageType {
            MessageType::Metar
        }

        fn is_nil(&self) -> bool {
            self.nil
        }

        fn issue_time(&self) -> Option<PartialDateTime> {
            self.issue_time
        }

        fn location(&self, role: LocationRole) -> Option<&LocationIndicator> {
            (role == LocationRole::Aerodrome).then_some(&self.aerodrome)
        }

        fn source_sequence(&self) -> Option<&TokenSequence> {
            self.source.as_ref()
        }
    }

    fn render(message: &dyn WeatherMessage, hints: &ConversionHints) -> String {
        LayoutSerializer::default()
            .serialize(message, hints)
            .into_output()
            .map(|sequence| sequence.render())
            .unwrap_or_default()
    }

    #[test]
    fn test_absent_fields_drop_their_separators() {
        let text = render(&Metar::new(), &ConversionHints::default());
        assert_eq!(text, "METAR EFHK 011750Z=");
    }

    #[test]
    fn test_present_optional_field() {
        let message = Metar {
            nil: true,
            ..Metar::new()
        };
        assert_eq!(
            render(&message, &ConversionHints::default()),
            "METAR EFHK 011750Z NIL="
        );
    }

    #[test]
    fn test_missing_required_value_fails() {
        let message = Metar {
            issue_time: Some(PartialDateTime::day_hour(1, 17)),
            ..Metar::new()
        };
        let result = LayoutSerializer::default().serialize(&message, &ConversionHints::default());
        assert!(result.output().is_none());
        assert_eq!(result.issues().len(), 1);
        assert!(result.issues()[0].message.contains("ISSUE_TIME"));
    }

    #[test]
    fn test_result_carries_bulletin_id() {
        let hints = ConversionHints::default().with_bulletin_id("SAFI31EFKL011800");
        let result = LayoutSerializer::default().serialize(&Metar::new(), &hints);
        assert_eq!(result.bulletin_id(), Some("SAFI31EFKL011800"));

        let failing = Metar {
            issue_time: Some(PartialDateTime::day_hour(1, 17)),
            ..Metar::new()
        };
        let result = LayoutSerializer::default().serialize(&failing, &hints);
        assert!(result.output().is_none());
        assert_eq!(result.bulletin_id(), Some("SAFI31EFKL011800"));

        let hints = ConversionHints::default();
        let result = LayoutSerializer::default().serialize(&Metar::new(), &hints);
        assert_eq!(result.bulletin_id(), None);
    }

    #[test]
    fn test_whitespace_passthrough() {
        let source = crate::tac::lexing::lex("METAR   EFHK\n011750Z=");
        let message = Metar {
            source: Some(source),
            ..Metar::new()
        };

        let canonical = render(&message, &ConversionHints::default());
        assert_eq!(canonical, "METAR EFHK 011750Z=");

        let hints = ConversionHints::default().with_whitespace_passthrough(true);
        assert_eq!(render(&message, &hints), "METAR   EFHK\n011750Z=");
    }

    #[test]
    fn test_column_separator_pads_to_label_width() {
        let hints = ConversionHints::default().with_advisory_label_width(10);
        let mut builder = SequenceBuilder::new();
        builder.append(Token::identified("DTG:", DTG_ISSUE_TIME_LABEL));
        assert_eq!(
            Separator::Column.text(&builder, &hints).as_deref(),
            Some("      ")
        );

        builder.append(Token::identified("A-VERY-LONG-LABEL:", DTG_ISSUE_TIME_LABEL));
        assert_eq!(Separator::Column.text(&builder, &hints).as_deref(), Some(" "));
    }

    #[test]
    fn test_generic_messages_have_no_layout() {
        assert!(Layout::for_message_type(MessageType::Generic).is_none());
        assert!(Layout::for_message_type(MessageType::VolcanicAshAdvisory).is_none());
        for message_type in [
            MessageType::Metar,
            MessageType::Taf,
            MessageType::Sigmet,
            MessageType::Airmet,
            MessageType::SpaceWeatherAdvisory,
        ] {
            let layout = Layout::for_message_type(message_type).unwrap();
            assert_eq!(layout.message_type(), message_type);
        }
    }
}
