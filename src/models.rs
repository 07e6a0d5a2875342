use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExerciseDuration {
    Number(serde_json::Number),
    Text(String),
}

impl ExerciseDuration {
    /// Numbers stay numbers in the JSON file, anything else is kept verbatim.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<serde_json::Number>() {
            Ok(number) => Self::Number(number),
            Err(_) => Self::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for ExerciseDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub date: NaiveDate,
    pub activity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<ExerciseDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strava_activity_id: Option<String>,
    /// Fields written by other tools, carried through rewrites untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ExerciseRecord {
    pub fn new(date: NaiveDate, activity: impl Into<String>) -> Self {
        Self {
            date,
            activity: activity.into(),
            duration: None,
            notes: None,
            strava_activity_id: None,
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLog {
    #[serde(default)]
    pub exercises: Vec<ExerciseRecord>,
}

impl ExerciseLog {
    #[cfg(test)]
    pub(crate) fn from_dates(dates: &[NaiveDate]) -> Self {
        Self {
            exercises: dates
                .iter()
                .map(|date| ExerciseRecord::new(*date, "Jogging"))
                .collect(),
        }
    }

    /// Records sorted newest first, ties kept in file order.
    pub fn recent(&self, limit: usize) -> Vec<&ExerciseRecord> {
        let mut records: Vec<&ExerciseRecord> = self.exercises.iter().collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records.truncate(limit);
        records
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LastUpdated {
    #[default]
    Never,
    On(NaiveDate),
}

const NEVER: &str = "Never";

impl fmt::Display for LastUpdated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str(NEVER),
            Self::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for LastUpdated {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LastUpdated {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == NEVER {
            return Ok(Self::Never);
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Self::On)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    pub total_days: u32,
    pub last_updated: LastUpdated,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Visualizations {
    pub heatmap: String,
    pub monthly_summary: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Milestone {
    pub days: u32,
    pub label: &'static str,
}

pub const MILESTONES: [Milestone; 4] = [
    Milestone { days: 7, label: "7 days 🌱" },
    Milestone { days: 30, label: "30 days 🌿" },
    Milestone { days: 100, label: "100 days 🌳" },
    Milestone { days: 365, label: "365 days 🏆" },
];
