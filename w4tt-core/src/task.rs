//! Input records: pending tasks and externally declared busy slots.
//!
//! Both arrive as JSON from task/calendar exports. Unknown fields are ignored
//! and missing or `null` fields fall back to the documented defaults, so the
//! engine only ever sees fully populated values.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled";

/// Lowest urgency; lower values are more urgent.
pub const DEFAULT_PRIORITY: i64 = 5;

/// A pending task. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default = "default_title", deserialize_with = "title_or_default")]
    pub title: String,

    #[serde(default = "default_priority", deserialize_with = "priority_or_default")]
    pub priority: i64,

    /// 0-100.
    #[serde(default, deserialize_with = "count_or_zero")]
    pub percent_complete: i64,

    #[serde(default, deserialize_with = "count_or_zero")]
    pub checklist_item_count: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub has_description: bool,

    /// Non-string values decode to `None` and contribute nothing to the score.
    #[serde(default, deserialize_with = "lenient_string")]
    pub due_date_time: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub created_date_time: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority: DEFAULT_PRIORITY,
            percent_complete: 0,
            checklist_item_count: 0,
            has_description: false,
            due_date_time: None,
            created_date_time: None,
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_percent_complete(mut self, percent: i64) -> Self {
        self.percent_complete = percent;
        self
    }

    pub fn with_checklist(mut self, items: i64) -> Self {
        self.checklist_item_count = items;
        self
    }

    pub fn with_description(mut self) -> Self {
        self.has_description = true;
        self
    }

    pub fn with_due(mut self, due: impl Into<String>) -> Self {
        self.due_date_time = Some(due.into());
        self
    }

    pub fn with_created(mut self, created: impl Into<String>) -> Self {
        self.created_date_time = Some(created.into());
        self
    }

    pub fn is_complete(&self) -> bool {
        self.percent_complete >= 100
    }
}

/// A busy period as supplied by the caller, timestamps in UTC.
///
/// Values that are absent or not strings decode to `None`; such slots are
/// dropped during ingestion instead of failing the whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusySlot {
    #[serde(default, deserialize_with = "lenient_string")]
    pub start: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end: Option<String>,
}

impl BusySlot {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn title_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_else(default_title))
}

/// Any JSON number; fractions are truncated toward zero.
#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Float(f64),
}

impl From<Number> for i64 {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(v) => v,
            Number::Float(v) => v as i64,
        }
    }
}

fn priority_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(Option::<Number>::deserialize(d)?.map_or(DEFAULT_PRIORITY, i64::from))
}

fn count_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(Option::<Number>::deserialize(d)?.map_or(0, i64::from))
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Lenient>::deserialize(d)? {
        Some(Lenient::Text(s)) => Some(s),
        Some(Lenient::Other(_)) | None => None,
    })
}
