use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One finished occurrence. Records are append-only: nothing in the system
/// edits or removes an entry once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub task_index: usize,
    pub policy: String,
    pub description: String,
    /// Due date of the occurrence that was completed (not the day the work
    /// happened — that is `completed_on`).
    pub due_date: NaiveDate,
    #[serde(default)]
    pub completed_by: String,
    #[serde(default)]
    pub verified_by: String,
    pub completed_on: NaiveDate,
}

impl CompletionRecord {
    /// Returns `true` if this record closes the given occurrence.
    #[must_use]
    pub fn matches(&self, task_index: usize, due_date: NaiveDate) -> bool {
        self.task_index == task_index && self.due_date == due_date
    }
}

/// Per-task completed-by / verified-by names, kept in a side map keyed by
/// task index. Both fields are free text and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusNames {
    #[serde(default)]
    pub completed_by: String,
    #[serde(default)]
    pub verified_by: String,
}

impl StatusNames {
    /// Returns `true` if neither name is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed_by.is_empty() && self.verified_by.is_empty()
    }
}
