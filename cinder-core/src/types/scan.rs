use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::RootError;

/// Hint keys written by the built-in parsers.
pub mod hint_keys {
    pub const YEAR: &str = "year";
    pub const SEASON: &str = "season";
    pub const EPISODE: &str = "episode";
    pub const END_EPISODE: &str = "end_episode";
    pub const SERIES_YEAR: &str = "series_year";
    pub const EPISODE_TITLE: &str = "episode_title";
    pub const AIR_YEAR: &str = "air_year";
    pub const AIR_MONTH: &str = "air_month";
    pub const AIR_DAY: &str = "air_day";
    pub const IS_DAILY: &str = "is_daily";
}

/// A single scalar extracted from a filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HintValue {
    Int(i64),
    Flag(bool),
    Text(String),
}

impl From<i64> for HintValue {
    fn from(value: i64) -> Self {
        HintValue::Int(value)
    }
}

impl From<i32> for HintValue {
    fn from(value: i32) -> Self {
        HintValue::Int(value.into())
    }
}

impl From<u32> for HintValue {
    fn from(value: u32) -> Self {
        HintValue::Int(value.into())
    }
}

impl From<bool> for HintValue {
    fn from(value: bool) -> Self {
        HintValue::Flag(value)
    }
}

impl From<String> for HintValue {
    fn from(value: String) -> Self {
        HintValue::Text(value)
    }
}

impl From<&str> for HintValue {
    fn from(value: &str) -> Self {
        HintValue::Text(value.to_string())
    }
}

impl fmt::Display for HintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintValue::Int(value) => write!(f, "{value}"),
            HintValue::Flag(value) => write!(f, "{value}"),
            HintValue::Text(value) => f.write_str(value),
        }
    }
}

/// Open key/value bag of parser specific data.
///
/// Each parser defines its own keys (see [`hint_keys`]). Readers treat a
/// missing key, or a key holding an unexpected kind of value, as "not
/// applicable" rather than as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hints(BTreeMap<String, HintValue>);

impl Hints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<HintValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert only when the key is not present yet. Returns whether the value was stored.
    pub fn insert_if_absent(
        &mut self,
        key: impl Into<String>,
        value: impl Into<HintValue>,
    ) -> bool {
        let key = key.into();
        if self.0.contains_key(&key) {
            return false;
        }
        self.0.insert(key, value.into());
        true
    }

    pub fn get(&self, key: &str) -> Option<&HintValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(HintValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(HintValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(HintValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HintValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for Hints
where
    K: Into<String>,
    V: Into<HintValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// One file discovered during a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub file_path: PathBuf,
    pub file_name: String,
    pub file_size: u64,
    pub parsed_title: String,
    #[serde(default)]
    pub hints: Hints,
    pub is_media: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanResult {
    /// True when the parser isolated a usable title.
    pub fn has_title(&self) -> bool {
        !self.parsed_title.trim().is_empty()
    }

    pub fn year(&self) -> Option<i32> {
        self.int_hint(hint_keys::YEAR)
            .or_else(|| self.int_hint(hint_keys::SERIES_YEAR))
    }

    pub fn season(&self) -> Option<u32> {
        self.hints
            .int(hint_keys::SEASON)
            .and_then(|value| u32::try_from(value).ok())
    }

    pub fn episode(&self) -> Option<u32> {
        self.hints
            .int(hint_keys::EPISODE)
            .and_then(|value| u32::try_from(value).ok())
    }

    fn int_hint(&self, key: &str) -> Option<i32> {
        self.hints
            .int(key)
            .and_then(|value| i32::try_from(value).ok())
    }
}

/// Aggregate counters for one scan run.
///
/// `total_files` is split into `media_files` and `skipped_files`; media files
/// are further split into `parsed_files` (non-empty title) and `failed_parses`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub total_files: usize,
    pub media_files: usize,
    pub skipped_files: usize,
    pub parsed_files: usize,
    pub failed_parses: usize,
}

/// Everything produced by a scan: results, counters and per-root failures.
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    pub results: Vec<ScanResult>,
    pub stats: ScanStats,
    #[serde(serialize_with = "serialize_root_errors")]
    pub errors: Vec<RootError>,
}

impl ScanReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn serialize_root_errors<S>(errors: &[RootError], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(errors.iter().map(|err| err.to_string()))
}
