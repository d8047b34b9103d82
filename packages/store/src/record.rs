//! # Version Records
//!
//! One row of the `page_versions` table plus the small value types that
//! travel with it (content maps, version numbers, release kinds).

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selector → HTML fragment map, in insertion (document) order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Content(IndexMap<String, String>);

impl Content {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, selector: impl Into<String>, html: impl Into<String>) {
        self.0.insert(selector.into(), html.into());
    }

    pub fn get(&self, selector: &str) -> Option<&str> {
        self.0.get(selector).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Layer `newer` on top of `self`; entries in `newer` win and move to
    /// the end, so applying in iteration order replays writes in time order
    pub fn overlay(&mut self, newer: &Content) {
        for (selector, html) in newer.iter() {
            self.0.shift_remove(selector);
            self.insert(selector, html);
        }
    }
}

impl FromIterator<(String, String)> for Content {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Raw `content` column; the fallback variant keeps decoding infallible
#[derive(Deserialize)]
#[serde(untagged)]
enum RawContent {
    Map(IndexMap<String, serde_json::Value>),
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for Content {
    /// Accepts a JSON object, a string holding a JSON object, or null.
    /// Non-string fragment values are kept as their JSON text. Anything
    /// else reads as empty so one bad row never hides a page's history.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Content::from_raw(RawContent::deserialize(deserializer)?))
    }
}

impl Content {
    fn from_raw(raw: RawContent) -> Self {
        use serde_json::Value;

        let map = match raw {
            RawContent::Map(map) => map,
            RawContent::Other(Value::Null) => return Content::new(),
            RawContent::Other(Value::String(text)) if text.trim().is_empty() => return Content::new(),
            RawContent::Other(Value::String(text)) => match serde_json::from_str::<RawContent>(&text) {
                Ok(RawContent::Map(map)) => map,
                Ok(RawContent::Other(Value::Null)) => return Content::new(),
                Ok(RawContent::Other(other)) => {
                    tracing::warn!("content string holds {} instead of an object, reading as empty", kind_of(&other));
                    return Content::new();
                }
                Err(e) => {
                    tracing::warn!("content string is not JSON, reading as empty: {}", e);
                    return Content::new();
                }
            },
            RawContent::Other(other) => {
                tracing::warn!("content is {} instead of an object, reading as empty", kind_of(&other));
                return Content::new();
            }
        };

        map.into_iter()
            .map(|(selector, value)| {
                let html = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (selector, html)
            })
            .collect()
    }
}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Display label `v{major}.{minor}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VersionNumber {
    pub major: u32,
    pub minor: u32,
}

impl VersionNumber {
    pub const INITIAL: VersionNumber = VersionNumber { major: 1, minor: 0 };

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Number a release of `kind` would get on top of `self`
    pub fn bump(self, kind: ReleaseKind) -> Self {
        match kind {
            ReleaseKind::Minor => Self::new(self.major, self.minor.saturating_add(1)),
            ReleaseKind::Major => Self::new(self.major.saturating_add(1), 0),
        }
    }
}

impl Default for VersionNumber {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

/// Which component a save bumps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    #[default]
    Minor,
    Major,
}

impl FromStr for ReleaseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            other => Err(format!("unknown release kind '{}', expected minor or major", other)),
        }
    }
}

/// Persisted version row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: i64,
    pub page: String,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub version_major: Option<u32>,
    #[serde(default)]
    pub version_minor: Option<u32>,
    #[serde(default)]
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl VersionRecord {
    /// Version label, treating missing/zero major as 1 and missing minor as 0
    pub fn version(&self) -> VersionNumber {
        VersionNumber::new(
            self.version_major.filter(|major| *major > 0).unwrap_or(1),
            self.version_minor.unwrap_or(0),
        )
    }

    pub fn author(&self) -> &str {
        self.updated_by
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown")
    }
}

/// Insert payload; the store assigns `id` and `updated_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVersion {
    pub page: String,
    pub content: Content,
    pub version_major: u32,
    pub version_minor: u32,
    pub updated_by: String,
}

impl NewVersion {
    pub fn new(page: impl Into<String>, content: Content, version: VersionNumber, updated_by: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            content,
            version_major: version.major,
            version_minor: version.minor,
            updated_by: updated_by.into(),
        }
    }

    pub fn version(&self) -> VersionNumber {
        VersionNumber::new(self.version_major, self.version_minor)
    }
}

/// Newest first by `updated_at`, ties broken by higher id
pub fn sort_newest_first(records: &mut [VersionRecord]) {
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
}
