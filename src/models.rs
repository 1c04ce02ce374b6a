use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use std::collections::BTreeMap;

/// Provider-shaped key/value record. Keys are kept ordered so repeated runs
/// against the same data produce the same document.
pub type RawRecord = BTreeMap<String, ProviderValue>;

const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp {
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
    Date(NaiveDate),
}

impl Timestamp {
    pub fn to_iso8601(&self) -> String {
        match self {
            Timestamp::Naive(value) => value.format(NAIVE_DATETIME_FORMAT).to_string(),
            Timestamp::Zoned(value) => value.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Timestamp::Date(value) => value.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn from_unix_seconds(seconds: i64) -> Option<Self> {
        DateTime::from_timestamp(seconds, 0).map(|value| Timestamp::Zoned(value.fixed_offset()))
    }
}

/// A single value from a raw provider response.
///
/// `Opaque` marks a value the provider handed over without any known textual
/// form; the encoder refuses it rather than guessing.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Timestamp(Timestamp),
    Sequence(Vec<ProviderValue>),
    Mapping(RawRecord),
    Opaque { type_name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    Text,
    Timestamp,
    Sequence,
    Mapping,
    Opaque,
}

impl ProviderValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ProviderValue::Null => ValueKind::Null,
            ProviderValue::Bool(_) => ValueKind::Bool,
            ProviderValue::Integer(_) => ValueKind::Integer,
            ProviderValue::Float(_) => ValueKind::Float,
            ProviderValue::Text(_) => ValueKind::Text,
            ProviderValue::Timestamp(_) => ValueKind::Timestamp,
            ProviderValue::Sequence(_) => ValueKind::Sequence,
            ProviderValue::Mapping(_) => ValueKind::Mapping,
            ProviderValue::Opaque { .. } => ValueKind::Opaque,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            ProviderValue::Null => "null",
            ProviderValue::Bool(_) => "bool",
            ProviderValue::Integer(_) => "integer",
            ProviderValue::Float(_) => "float",
            ProviderValue::Text(_) => "text",
            ProviderValue::Timestamp(_) => "timestamp",
            ProviderValue::Sequence(_) => "sequence",
            ProviderValue::Mapping(_) => "mapping",
            ProviderValue::Opaque { type_name } => type_name,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ProviderValue::Null)
    }
}

impl From<&str> for ProviderValue {
    fn from(value: &str) -> Self {
        ProviderValue::Text(value.to_string())
    }
}

impl From<String> for ProviderValue {
    fn from(value: String) -> Self {
        ProviderValue::Text(value)
    }
}

impl From<bool> for ProviderValue {
    fn from(value: bool) -> Self {
        ProviderValue::Bool(value)
    }
}

impl From<i64> for ProviderValue {
    fn from(value: i64) -> Self {
        ProviderValue::Integer(value)
    }
}

impl From<f64> for ProviderValue {
    fn from(value: f64) -> Self {
        ProviderValue::Float(value)
    }
}

impl From<Timestamp> for ProviderValue {
    fn from(value: Timestamp) -> Self {
        ProviderValue::Timestamp(value)
    }
}

impl From<RawRecord> for ProviderValue {
    fn from(value: RawRecord) -> Self {
        ProviderValue::Mapping(value)
    }
}

impl<T: Into<ProviderValue>> From<Option<T>> for ProviderValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ProviderValue::Null, Into::into)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RealInstalls {
    Count(i64),
    Label(String),
}

impl From<RealInstalls> for ProviderValue {
    fn from(value: RealInstalls) -> Self {
        match value {
            RealInstalls::Count(count) => ProviderValue::Integer(count),
            RealInstalls::Label(label) => ProviderValue::Text(label),
        }
    }
}

/// A metadata field as sourced from the provider: the expected shape, or
/// whatever the provider sent instead, kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    Typed(T),
    Other(ProviderValue),
}

impl<T> Sourced<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            Sourced::Typed(value) => Some(value),
            Sourced::Other(_) => None,
        }
    }
}

impl<T: Into<ProviderValue>> From<Sourced<T>> for ProviderValue {
    fn from(value: Sourced<T>) -> Self {
        match value {
            Sourced::Typed(typed) => typed.into(),
            Sourced::Other(raw) => raw,
        }
    }
}

pub const APP_DETAIL_KEYS: [&str; 8] = [
    "title",
    "description",
    "version",
    "score",
    "realInstalls",
    "installs",
    "released",
    "lastUpdatedOn",
];

/// The subset of provider metadata kept in a snapshot. Every field is
/// optional; a field the provider omitted stays `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppDetails {
    pub title: Option<Sourced<String>>,
    pub description: Option<Sourced<String>>,
    pub version: Option<Sourced<String>>,
    pub score: Option<Sourced<f64>>,
    pub real_installs: Option<Sourced<RealInstalls>>,
    pub installs: Option<Sourced<String>>,
    pub released: Option<Sourced<String>>,
    pub last_updated_on: Option<Sourced<Timestamp>>,
}

impl AppDetails {
    /// Always yields all eight keys, absent fields as `Null`.
    pub fn to_record(&self) -> RawRecord {
        let values: [ProviderValue; 8] = [
            self.title.clone().into(),
            self.description.clone().into(),
            self.version.clone().into(),
            self.score.clone().into(),
            self.real_installs.clone().into(),
            self.installs.clone().into(),
            self.released.clone().into(),
            self.last_updated_on.clone().into(),
        ];
        APP_DETAIL_KEYS
            .iter()
            .map(|key| key.to_string())
            .zip(values)
            .collect()
    }
}

/// A review exactly as the provider returned it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewEntry(pub RawRecord);

impl ReviewEntry {
    pub fn new(fields: RawRecord) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &RawRecord {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSort {
    Newest,
}

impl ReviewSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewSort::Newest => "newest",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub app_details: AppDetails,
    pub reviews: Vec<ReviewEntry>,
    pub generated_at: Timestamp,
}

impl Snapshot {
    pub fn to_value(&self) -> ProviderValue {
        let mut document = RawRecord::new();
        document.insert(
            "app_details".to_string(),
            ProviderValue::Mapping(self.app_details.to_record()),
        );
        document.insert(
            "reviews".to_string(),
            ProviderValue::Sequence(
                self.reviews
                    .iter()
                    .map(|review| ProviderValue::Mapping(review.fields().clone()))
                    .collect(),
            ),
        );
        document.insert(
            "generated_at".to_string(),
            ProviderValue::Timestamp(self.generated_at.clone()),
        );
        ProviderValue::Mapping(document)
    }
}
