//! Token Identity Catalog
//!
//!     A token identity names the kind of a token ("issue time", "valid time", ...). Each
//!     identity declares the parameter slots a token of that kind may hold and a small set of
//!     structural tags. The catalog below holds the built-in identities as constants.
//!
//!     Membership is open: callers may construct ad hoc identities for edge cases with
//!     [TokenIdentity::ad_hoc] or [TokenIdentity::new]. Equality and hashing only look at the
//!     name, so sets of identities ("one of these five") work whether a value came from the
//!     catalog or was built on the spot.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Names of the typed parameter slots a token can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamName {
    Value,
    Unit,
    Year,
    Month,
    Day1,
    Day2,
    Hour1,
    Hour2,
    Minute1,
    Minute2,
    Direction,
    MeanValue,
    MaxValue,
    MinValue,
    Dewpoint,
    RelationalOperator,
    Type,
    Cover,
    SequenceNumber,
    LocationIndicator,
    Country,
    BulletinNumber,
    Latitude,
    Longitude,
    HourOffset,
    Intensity,
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamName::Value => "VALUE",
            ParamName::Unit => "UNIT",
            ParamName::Year => "YEAR",
            ParamName::Month => "MONTH",
            ParamName::Day1 => "DAY1",
            ParamName::Day2 => "DAY2",
            ParamName::Hour1 => "HOUR1",
            ParamName::Hour2 => "HOUR2",
            ParamName::Minute1 => "MINUTE1",
            ParamName::Minute2 => "MINUTE2",
            ParamName::Direction => "DIRECTION",
            ParamName::MeanValue => "MEAN_VALUE",
            ParamName::MaxValue => "MAX_VALUE",
            ParamName::MinValue => "MIN_VALUE",
            ParamName::Dewpoint => "DEWPOINT",
            ParamName::RelationalOperator => "RELATIONAL_OPERATOR",
            ParamName::Type => "TYPE",
            ParamName::Cover => "COVER",
            ParamName::SequenceNumber => "SEQUENCE_NUMBER",
            ParamName::LocationIndicator => "LOCATION_INDICATOR",
            ParamName::Country => "COUNTRY",
            ParamName::BulletinNumber => "BULLETIN_NUMBER",
            ParamName::Latitude => "LATITUDE",
            ParamName::Longitude => "LONGITUDE",
            ParamName::HourOffset => "HOUR_OFFSET",
            ParamName::Intensity => "INTENSITY",
        };
        write!(f, "{}", name)
    }
}

/// Structural tags attached to identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tag {
    /// A fixed label preceding a value token (advisory layouts)
    Label,
    Whitespace,
    End,
    MessageStart,
    BulletinHeading,
    Time,
    Location,
    Trend,
}

/// The named kind of a token.
#[derive(Debug, Clone)]
pub struct TokenIdentity {
    name: Cow<'static, str>,
    params: Cow<'static, [ParamName]>,
    tags: Cow<'static, [Tag]>,
}

impl TokenIdentity {
    /// Declare a built-in identity. Used for the catalog constants.
    pub const fn builtin(
        name: &'static str,
        params: &'static [ParamName],
        tags: &'static [Tag],
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            params: Cow::Borrowed(params),
            tags: Cow::Borrowed(tags),
        }
    }

    /// Construct an identity at runtime with its own parameter slots and tags.
    pub fn new(name: impl Into<String>, params: Vec<ParamName>, tags: Vec<Tag>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            params: Cow::Owned(params),
            tags: Cow::Owned(tags),
        }
    }

    /// An identity without parameter slots or tags.
    pub fn ad_hoc(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new(), Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn can_store(&self, param: ParamName) -> bool {
        self.params.contains(&param)
    }

    pub fn declared_params(&self) -> BTreeSet<ParamName> {
        self.params.iter().copied().collect()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_label(&self) -> bool {
        self.has_tag(Tag::Label)
    }

    pub fn is_whitespace(&self) -> bool {
        self.has_tag(Tag::Whitespace)
    }

    pub fn is_end(&self) -> bool {
        self.has_tag(Tag::End)
    }

    /// True when this identity is one of `identities` (compared by name).
    pub fn is_any_of(&self, identities: &[TokenIdentity]) -> bool {
        identities.iter().any(|candidate| candidate == self)
    }
}

impl PartialEq for TokenIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TokenIdentity {}

impl Hash for TokenIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for TokenIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Serialize for TokenIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

macro_rules! catalog {
    ($( $(#[$doc:meta])* $ident:ident => [$($param:ident),*] [$($tag:ident),*]; )*) => {
        $(
            $(#[$doc])*
            pub const $ident: TokenIdentity = TokenIdentity::builtin(
                stringify!($ident),
                &[$(ParamName::$param),*],
                &[$(Tag::$tag),*],
            );
        )*

        /// Every built-in identity, in declaration order.
        pub static BUILTINS: &[TokenIdentity] = &[$($ident),*];
    };
}

catalog! {
    WHITE_SPACE => [Type] [Whitespace];
    /// The `=` terminating a message
    END_TOKEN => [] [End];

    // Bulletin heading
    BULLETIN_HEADING_DATA_DESIGNATORS => [Type, Country, BulletinNumber] [BulletinHeading];
    BULLETIN_HEADING_LOCATION_INDICATOR => [LocationIndicator] [BulletinHeading, Location];
    BULLETIN_HEADING_ISSUE_TIME => [Day1, Hour1, Minute1] [BulletinHeading, Time];
    BULLETIN_HEADING_BBB_INDICATOR => [Value] [BulletinHeading];

    // Message starts
    METAR_START => [] [MessageStart];
    SPECI_START => [] [MessageStart];
    TAF_START => [] [MessageStart];
    /// `EHAA SIGMET`: the location indicator is part of the start token
    SIGMET_START => [LocationIndicator] [MessageStart, Location];
    AIRMET_START => [LocationIndicator] [MessageStart, Location];
    SPACE_WEATHER_ADVISORY_START => [] [MessageStart];
    VOLCANIC_ASH_ADVISORY_START => [] [MessageStart];

    // Report status
    CORRECTION => [] [];
    AMENDMENT => [] [];
    CANCELLATION => [] [];
    NIL => [] [];
    AUTOMATED => [] [];

    // Aerodrome reports and forecasts
    AERODROME_DESIGNATOR => [Value, Country] [Location];
    ISSUE_TIME => [Day1, Hour1, Minute1] [Time];
    VALID_TIME => [Day1, Day2, Hour1, Hour2, Minute1, Minute2] [Time];
    SURFACE_WIND => [Direction, MeanValue, MaxValue, Unit] [];
    VARIABLE_WIND_DIRECTION => [MinValue, MaxValue] [];
    HORIZONTAL_VISIBILITY => [MeanValue, Unit, RelationalOperator, Direction] [];
    CAVOK => [] [];
    RUNWAY_VISUAL_RANGE => [Value, MeanValue, RelationalOperator, Unit] [];
    WEATHER => [Value, Intensity] [];
    RECENT_WEATHER => [Value] [];
    CLOUD => [Cover, Value, Type] [];
    AIR_DEWPOINT_TEMPERATURE => [Value, Dewpoint, Unit] [];
    AIR_PRESSURE_QNH => [Value, Unit] [];
    NO_SIGNIFICANT_WEATHER => [] [];
    TREND_CHANGE_INDICATOR => [Type] [Trend];
    TREND_TIME_GROUP => [Type, Hour1, Minute1] [Trend, Time];
    FORECAST_CHANGE_INDICATOR => [Type, Value, Day1, Hour1, Minute1] [Trend];
    CHANGE_FORECAST_TIME_GROUP => [Day1, Day2, Hour1, Hour2] [Time];
    MIN_TEMPERATURE => [Value, Day1, Hour1] [];
    MAX_TEMPERATURE => [Value, Day1, Hour1] [];
    REMARKS_START => [] [Label];
    REMARK => [Value] [];

    // SIGMET and AIRMET
    SEQUENCE_DESCRIPTOR => [SequenceNumber] [];
    MWO_DESIGNATOR => [LocationIndicator] [Location];
    FIR_DESIGNATOR => [LocationIndicator] [Location];
    SIGMET_FIR_NAME_WORD => [Value] [];
    FIR_NAME => [Value, Type] [];
    SIGMET_CANCEL => [SequenceNumber, Day1, Day2, Hour1, Hour2, Minute1, Minute2] [];
    AIRMET_CANCEL => [SequenceNumber, Day1, Day2, Hour1, Hour2, Minute1, Minute2] [];
    SIGMET_USAGE => [Type] [];
    PHENOMENON_SIGMET => [Value] [];
    OBS_OR_FORECAST => [Type, Hour1, Minute1] [];
    SIGMET_WITHIN => [] [];
    POLYGON_COORDINATE_PAIR => [Latitude, Longitude] [];
    POLYGON_COORDINATE_PAIR_SEPARATOR => [] [];
    SIGMET_ENTIRE_AREA => [Type] [];
    SIGMET_LEVEL => [Type, MinValue, MaxValue, Unit] [];
    SIGMET_MOVING => [Direction, MeanValue, Unit] [];
    SIGMET_INTENSITY => [Type] [];
    SIGMET_FCST_AT => [Hour1, Minute1] [Time];

    // Advisories
    DTG_ISSUE_TIME_LABEL => [] [Label];
    ADVISORY_ISSUE_TIME => [Year, Month, Day1, Hour1, Minute1] [Time];
    SWX_CENTRE_LABEL => [] [Label];
    SWX_CENTRE => [Value] [];
    ADVISORY_NUMBER_LABEL => [] [Label];
    ADVISORY_NUMBER => [Year, SequenceNumber] [];
    REPLACE_ADVISORY_NUMBER_LABEL => [] [Label];
    ADVISORY_STATUS_LABEL => [] [Label];
    ADVISORY_STATUS => [Type] [];
    SWX_EFFECT_LABEL => [] [Label];
    SWX_EFFECT => [Type, Intensity] [];
    ADVISORY_PHENOMENA_LABEL => [Type, HourOffset] [Label];
    ADVISORY_PHENOMENA_TIME_GROUP => [Day1, Hour1, Minute1] [Time];
    SWX_NOT_EXPECTED => [] [];
    SWX_NOT_AVAILABLE => [] [];
    NEXT_ADVISORY_LABEL => [] [Label];
    NEXT_ADVISORY => [Type, Year, Month, Day1, Hour1, Minute1] [Time];
}

static BY_NAME: Lazy<HashMap<&'static str, &'static TokenIdentity>> = Lazy::new(|| {
    BUILTINS
        .iter()
        .map(|identity| {
            let name: &'static str = match &identity.name {
                Cow::Borrowed(name) => *name,
                Cow::Owned(_) => unreachable!("built-in identities have static names"),
            };
            (name, identity)
        })
        .collect()
});

/// Look up a built-in identity by name.
pub fn lookup(name: &str) -> Option<&'static TokenIdentity> {
    BY_NAME.get(name).copied()
}

/// Resolve a name to its built-in identity, or an ad hoc one when the catalog has no entry.
pub fn identity(name: &str) -> TokenIdentity {
    lookup(name)
        .cloned()
        .unwrap_or_else(|| TokenIdentity::ad_hoc(name))
}

pub fn can_store(identity: &TokenIdentity, param: ParamName) -> bool {
    identity.can_store(param)
}

pub fn declared_params(identity: &TokenIdentity) -> BTreeSet<ParamName> {
    identity.declared_params()
}
