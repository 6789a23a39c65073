use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TaskError;

pub const ALLOWED_STATUSES: &str = "TODO, ONGOING, DONE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Todo,
    Ongoing,
    Done,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::Ongoing => "ONGOING",
            Self::Done => "DONE",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Todo => ".",
            Self::Ongoing => "*",
            Self::Done => "x",
        }
    }

    /// The status that follows this one when cycling in the browser.
    pub fn next(self) -> Self {
        match self {
            Self::Todo => Self::Ongoing,
            Self::Ongoing => Self::Done,
            Self::Done => Self::Todo,
        }
    }
}

impl FromStr for Status {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(Self::Todo),
            "ONGOING" => Ok(Self::Ongoing),
            "DONE" => Ok(Self::Done),
            _ => Err(TaskError::validation(format!(
                "Invalid status. Allowed values: {ALLOWED_STATUSES}"
            ))),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Task identifier as typed by a user. Parsing is lenient about surrounding
/// whitespace and a leading sign, and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl FromStr for TaskId {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(TaskId)
            .map_err(|_| TaskError::validation("Invalid ID format"))
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        TaskId(id)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Local>,
}

/// Parse a stored timestamp. RFC 3339 is what we write; a timestamp without
/// an offset (`2025-01-01T10:00:00.123456`) is read as local time.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local.from_local_datetime(&naive).earliest()
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw:?}")))
}

impl Task {
    pub fn icon(&self) -> &'static str {
        self.status.icon()
    }

    /// Case-insensitive substring match against title or description.
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}
