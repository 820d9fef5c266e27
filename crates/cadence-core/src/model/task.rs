use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Recurrence interval classification of a task.
///
/// `Other` marks a non-recurring task: a single occurrence at the anchor
/// date and no step function. Unrecognized values loaded from the store or
/// an import file also land here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Periodicity {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Semiannually,
    Annually,
    Other,
}

impl Periodicity {
    pub const ALL: [Self; 7] = [
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Quarterly,
        Self::Semiannually,
        Self::Annually,
        Self::Other,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Semiannually => "semiannually",
            Self::Annually => "annually",
            Self::Other => "other",
        }
    }

    /// Parse with the fallback the store and import paths require:
    /// anything unrecognized is treated as `Other`.
    #[must_use]
    pub fn parse_lossy(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|_| {
            tracing::debug!(value = s, "unrecognized periodicity, treating as other");
            Self::Other
        })
    }

    /// Returns `true` if the periodicity has a step function (recurs).
    #[must_use]
    pub const fn recurs(self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl FromStr for Periodicity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "semiannually" => Ok(Self::Semiannually),
            "annually" => Ok(Self::Annually),
            "other" => Ok(Self::Other),
            _ => Err(ParseEnumError {
                expected: "periodicity",
                got: s.to_string(),
            }),
        }
    }
}

impl Serialize for Periodicity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Lossy on purpose: stored state with an unknown periodicity must load as
// `other`, not fail the whole store.
impl<'de> Deserialize<'de> for Periodicity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lossy(&raw))
    }
}

/// One recurring policy task.
///
/// `initial_due_date` is the anchor every later occurrence derives from and
/// never changes after creation. `current_due_date` is the next pending
/// occurrence; it advances on completion and clears when a non-recurring
/// task is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub policy: String,
    pub description: String,
    pub periodicity: Periodicity,
    pub initial_due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_due_date: Option<NaiveDate>,
}

impl Task {
    /// Create a task with the current due date at the anchor.
    #[must_use]
    pub fn new(
        policy: impl Into<String>,
        description: impl Into<String>,
        periodicity: Periodicity,
        initial_due_date: NaiveDate,
    ) -> Self {
        Self {
            policy: policy.into(),
            description: description.into(),
            periodicity,
            initial_due_date,
            current_due_date: Some(initial_due_date),
        }
    }
}

/// A task record in the seed-dataset shape: `task` is the description and
/// `due_date` doubles as the anchor.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRecord {
    pub policy: String,
    pub task: String,
    pub periodicity: Periodicity,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub completed_by: String,
    #[serde(default)]
    pub verified_by: String,
}

impl From<&ImportRecord> for Task {
    fn from(record: &ImportRecord) -> Self {
        Self::new(
            record.policy.clone(),
            record.task.clone(),
            record.periodicity,
            record.due_date,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{ImportRecord, Periodicity, Task};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn periodicity_json_roundtrips() {
        for p in Periodicity::ALL {
            let json = serde_json::to_string(&p).expect("serialize");
            let back: Periodicity = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, p);
        }
    }

    #[test]
    fn unknown_periodicity_deserializes_as_other() {
        let p: Periodicity = serde_json::from_str("\"fortnightly\"").expect("lossy deserialize");
        assert_eq!(p, Periodicity::Other);
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        assert!(Periodicity::from_str("fortnightly").is_err());
        assert_eq!(
            Periodicity::from_str(" Quarterly ").expect("case/space insensitive"),
            Periodicity::Quarterly
        );
    }

    #[test]
    fn import_record_maps_to_task() {
        let json = r#"{
            "policy": "Access Control Policy",
            "task": "Quarterly review of all privileged accounts",
            "periodicity": "quarterly",
            "due_date": "2026-02-05",
            "completed_by": "",
            "verified_by": ""
        }"#;
        let record: ImportRecord = serde_json::from_str(json).expect("parse record");
        let task = Task::from(&record);
        assert_eq!(task.policy, "Access Control Policy");
        assert_eq!(task.periodicity, Periodicity::Quarterly);
        assert_eq!(task.initial_due_date, date(2026, 2, 5));
        assert_eq!(task.current_due_date, Some(date(2026, 2, 5)));
    }

    #[test]
    fn task_json_omits_cleared_due_date() {
        let mut task = Task::new("P", "t", Periodicity::Other, date(2025, 11, 5));
        task.current_due_date = None;
        let json = serde_json::to_string(&task).expect("serialize");
        assert!(!json.contains("current_due_date"));
        let back: Task = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.current_due_date, None);
    }
}
