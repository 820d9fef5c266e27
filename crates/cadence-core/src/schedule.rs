//! The in-memory schedule: ordered task list, append-only completion log,
//! and the per-task status-names map. All reads and mutations go through
//! this one owned value; nothing here touches storage.

use crate::error::{CadenceError, ErrorCode};
use crate::model::{CompletionRecord, ImportRecord, StatusNames, Task};
use crate::recur::{is_scheduled, next_due, task_occurrences_in_range};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Presentation status of a single occurrence relative to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OccurrenceStatus {
    Completed,
    Overdue,
    DueToday,
    Pending,
}

impl OccurrenceStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::DueToday => "due-today",
            Self::Pending => "pending",
        }
    }

    /// Single-character cell marker used by calendar rendering.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Completed => 'x',
            Self::Overdue => '!',
            Self::DueToday => '*',
            Self::Pending => ' ',
        }
    }
}

impl fmt::Display for OccurrenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled instance of a task inside some window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub task_index: usize,
    pub date: NaiveDate,
    pub status: OccurrenceStatus,
}

/// The whole application state, loaded from and persisted to the store as a
/// unit. Tasks are identified by their position in `tasks`; the completion
/// log and status map key off that index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub tasks: Vec<Task>,
    pub completions: Vec<CompletionRecord>,
    pub status: BTreeMap<usize, StatusNames>,
}

impl Schedule {
    /// Look up a task by index.
    pub fn task(&self, index: usize) -> Result<&Task, CadenceError> {
        self.tasks.get(index).ok_or_else(|| {
            CadenceError::with_message(
                ErrorCode::TaskNotFound,
                format!("no task at index {index}"),
            )
        })
    }

    /// Returns `true` if a completion record closes the given occurrence.
    #[must_use]
    pub fn is_completed(&self, task_index: usize, date: NaiveDate) -> bool {
        self.completions
            .iter()
            .any(|record| record.matches(task_index, date))
    }

    /// Classify one occurrence for display. Completion wins over everything;
    /// otherwise the date is compared against `today`.
    #[must_use]
    pub fn classify(&self, task_index: usize, date: NaiveDate, today: NaiveDate) -> OccurrenceStatus {
        if self.is_completed(task_index, date) {
            OccurrenceStatus::Completed
        } else if date < today {
            OccurrenceStatus::Overdue
        } else if date == today {
            OccurrenceStatus::DueToday
        } else {
            OccurrenceStatus::Pending
        }
    }

    /// Enumerate classified occurrences of every task inside `[start, end]`,
    /// ordered by date then task index. Recomputed in full per render.
    #[must_use]
    pub fn occurrences_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Vec<Occurrence> {
        let mut occurrences: Vec<Occurrence> = self
            .tasks
            .iter()
            .enumerate()
            .flat_map(|(task_index, task)| {
                task_occurrences_in_range(task, start, end)
                    .into_iter()
                    .map(move |date| (task_index, date))
            })
            .map(|(task_index, date)| Occurrence {
                task_index,
                date,
                status: self.classify(task_index, date, today),
            })
            .collect();
        occurrences.sort_by_key(|occ| (occ.date, occ.task_index));
        occurrences
    }

    /// Update the completed-by / verified-by names for a task. A `None`
    /// leaves the existing value in place; empty strings clear it.
    pub fn set_status_names(
        &mut self,
        index: usize,
        completed_by: Option<String>,
        verified_by: Option<String>,
    ) -> Result<&StatusNames, CadenceError> {
        self.task(index)?;
        let entry = self.status.entry(index).or_default();
        if let Some(name) = completed_by {
            entry.completed_by = name;
        }
        if let Some(name) = verified_by {
            entry.verified_by = name;
        }
        Ok(&self.status[&index])
    }

    /// Complete one occurrence of a task.
    ///
    /// Appends a completion record capturing the task's current status names
    /// and `today`, then advances `current_due_date` by one period — or
    /// clears it when the periodicity has no step (`other`), after which the
    /// task stops appearing in pending scans.
    ///
    /// `due` defaults to the task's `current_due_date`; an explicit date
    /// must lie on the recurrence lattice. Duplicate completions of the same
    /// occurrence are rejected unless `allow_duplicates` is set.
    pub fn complete_occurrence(
        &mut self,
        index: usize,
        due: Option<NaiveDate>,
        today: NaiveDate,
        allow_duplicates: bool,
    ) -> Result<CompletionRecord, CadenceError> {
        let task = self.task(index)?;
        let due = match due {
            Some(date) => {
                if !is_scheduled(task.initial_due_date, task.periodicity, date) {
                    return Err(CadenceError::with_message(
                        ErrorCode::OccurrenceNotScheduled,
                        format!(
                            "{date} is not an occurrence of task {index} ({} from {})",
                            task.periodicity, task.initial_due_date
                        ),
                    ));
                }
                date
            }
            None => task.current_due_date.ok_or_else(|| {
                CadenceError::with_message(
                    ErrorCode::TaskExhausted,
                    format!("task {index} has no pending due date"),
                )
            })?,
        };

        if !allow_duplicates && self.is_completed(index, due) {
            return Err(CadenceError::with_message(
                ErrorCode::DuplicateCompletion,
                format!("task {index} already has a completion for {due}"),
            ));
        }

        let names = self.status.get(&index).cloned().unwrap_or_default();
        let record = CompletionRecord {
            task_index: index,
            policy: task.policy.clone(),
            description: task.description.clone(),
            due_date: due,
            completed_by: names.completed_by,
            verified_by: names.verified_by,
            completed_on: today,
        };
        self.completions.push(record.clone());

        let task = &mut self.tasks[index];
        task.current_due_date = task
            .current_due_date
            .and_then(|date| next_due(date, task.periodicity));

        Ok(record)
    }

    /// Append imported task records; non-empty names seed the status map.
    /// Returns the number of tasks added.
    pub fn import_records(&mut self, records: &[ImportRecord]) -> usize {
        for record in records {
            let index = self.tasks.len();
            self.tasks.push(Task::from(record));
            if !record.completed_by.is_empty() || !record.verified_by.is_empty() {
                self.status.insert(
                    index,
                    StatusNames {
                        completed_by: record.completed_by.clone(),
                        verified_by: record.verified_by.clone(),
                    },
                );
            }
        }
        records.len()
    }

    /// Repair state loaded from storage so the due-date invariant holds:
    /// `current_due_date`, when present, is derivable from the anchor and
    /// never precedes it. Underivable dates are realigned forward onto the
    /// recurrence lattice; stale status entries past the task list drop.
    pub fn normalize_loaded(&mut self) {
        for (index, task) in self.tasks.iter_mut().enumerate() {
            let Some(current) = task.current_due_date else {
                continue;
            };
            if is_scheduled(task.initial_due_date, task.periodicity, current) {
                continue;
            }
            let realigned = realign(task.initial_due_date, task.periodicity, current);
            tracing::warn!(
                task = index,
                stored = %current,
                realigned = ?realigned,
                "current due date not derivable from anchor, realigning"
            );
            task.current_due_date = realigned;
        }
        let task_count = self.tasks.len();
        self.status.retain(|&index, _| index < task_count);
    }
}

/// First lattice date at or after `target`; the anchor itself for
/// non-recurring tasks.
fn realign(
    anchor: NaiveDate,
    periodicity: crate::model::Periodicity,
    target: NaiveDate,
) -> Option<NaiveDate> {
    if !periodicity.recurs() {
        return Some(anchor);
    }
    let mut cursor = anchor;
    while cursor < target {
        cursor = next_due(cursor, periodicity)?;
    }
    Some(cursor)
}

/// Group occurrences per day for calendar cell rendering.
#[must_use]
pub fn bucket_by_day(occurrences: Vec<Occurrence>) -> BTreeMap<NaiveDate, Vec<Occurrence>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Occurrence>> = BTreeMap::new();
    for occurrence in occurrences {
        buckets.entry(occurrence.date).or_default().push(occurrence);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::{OccurrenceStatus, Schedule, bucket_by_day};
    use crate::error::ErrorCode;
    use crate::model::{Periodicity, Task};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn weekly_schedule() -> Schedule {
        let mut schedule = Schedule::default();
        schedule.tasks.push(Task::new(
            "Email Usage Policy",
            "Security team will review logs weekly",
            Periodicity::Weekly,
            date(2025, 11, 12),
        ));
        schedule
    }

    #[test]
    fn classification_orders_completed_overdue_today_pending() {
        let mut schedule = weekly_schedule();
        let today = date(2025, 11, 19);
        assert_eq!(
            schedule.classify(0, date(2025, 11, 12), today),
            OccurrenceStatus::Overdue
        );
        assert_eq!(
            schedule.classify(0, date(2025, 11, 19), today),
            OccurrenceStatus::DueToday
        );
        assert_eq!(
            schedule.classify(0, date(2025, 11, 26), today),
            OccurrenceStatus::Pending
        );

        schedule
            .complete_occurrence(0, Some(date(2025, 11, 12)), today, false)
            .expect("complete");
        assert_eq!(
            schedule.classify(0, date(2025, 11, 12), today),
            OccurrenceStatus::Completed
        );
    }

    #[test]
    fn completing_advances_current_due_date_one_period() {
        let mut schedule = weekly_schedule();
        let record = schedule
            .complete_occurrence(0, None, date(2025, 11, 12), false)
            .expect("complete");
        assert_eq!(record.due_date, date(2025, 11, 12));
        assert_eq!(schedule.tasks[0].current_due_date, Some(date(2025, 11, 19)));
        assert_eq!(schedule.completions.len(), 1);
    }

    #[test]
    fn completion_captures_status_names_and_today() {
        let mut schedule = weekly_schedule();
        schedule
            .set_status_names(0, Some("jan".into()), Some("ada".into()))
            .expect("set names");
        let record = schedule
            .complete_occurrence(0, None, date(2025, 11, 13), false)
            .expect("complete");
        assert_eq!(record.completed_by, "jan");
        assert_eq!(record.verified_by, "ada");
        assert_eq!(record.completed_on, date(2025, 11, 13));
    }

    #[test]
    fn duplicate_completion_is_rejected_unless_allowed() {
        let mut schedule = weekly_schedule();
        let today = date(2025, 11, 12);
        schedule
            .complete_occurrence(0, None, today, false)
            .expect("first completion");

        let err = schedule
            .complete_occurrence(0, Some(date(2025, 11, 12)), today, false)
            .expect_err("duplicate must be rejected");
        assert_eq!(err.code, ErrorCode::DuplicateCompletion);
        assert_eq!(schedule.completions.len(), 1);

        schedule
            .complete_occurrence(0, Some(date(2025, 11, 12)), today, true)
            .expect("permissive mode appends");
        assert_eq!(schedule.completions.len(), 2);
    }

    #[test]
    fn completing_other_task_clears_due_date() {
        let mut schedule = Schedule::default();
        schedule.tasks.push(Task::new(
            "Incident Response Policy",
            "One-off tabletop exercise",
            Periodicity::Other,
            date(2025, 11, 5),
        ));
        schedule
            .complete_occurrence(0, None, date(2025, 11, 5), false)
            .expect("complete");
        assert_eq!(schedule.tasks[0].current_due_date, None);

        let err = schedule
            .complete_occurrence(0, None, date(2025, 11, 6), false)
            .expect_err("exhausted task has nothing pending");
        assert_eq!(err.code, ErrorCode::TaskExhausted);
    }

    #[test]
    fn off_lattice_date_is_rejected() {
        let mut schedule = weekly_schedule();
        let err = schedule
            .complete_occurrence(0, Some(date(2025, 11, 13)), date(2025, 11, 13), false)
            .expect_err("Nov 13 is not on a weekly lattice from Nov 12");
        assert_eq!(err.code, ErrorCode::OccurrenceNotScheduled);
        assert!(schedule.completions.is_empty());
    }

    #[test]
    fn normalize_realigns_underivable_due_dates() {
        let mut schedule = weekly_schedule();
        // Hand-corrupt the stored state: off-lattice and before the anchor.
        schedule.tasks[0].current_due_date = Some(date(2025, 11, 14));
        schedule.normalize_loaded();
        assert_eq!(schedule.tasks[0].current_due_date, Some(date(2025, 11, 19)));

        schedule.tasks[0].current_due_date = Some(date(2025, 10, 1));
        schedule.normalize_loaded();
        assert_eq!(schedule.tasks[0].current_due_date, Some(date(2025, 11, 12)));
    }

    #[test]
    fn normalize_drops_stale_status_entries() {
        let mut schedule = weekly_schedule();
        schedule
            .status
            .insert(7, crate::model::StatusNames::default());
        schedule.normalize_loaded();
        assert!(!schedule.status.contains_key(&7));
    }

    #[test]
    fn range_scan_merges_tasks_in_date_order() {
        let mut schedule = weekly_schedule();
        schedule.tasks.push(Task::new(
            "Record Retention Policy",
            "Daily backup check",
            Periodicity::Daily,
            date(2025, 11, 13),
        ));
        let today = date(2025, 11, 12);
        let occurrences =
            schedule.occurrences_in_range(date(2025, 11, 12), date(2025, 11, 14), today);
        let got: Vec<(usize, NaiveDate)> = occurrences
            .iter()
            .map(|occ| (occ.task_index, occ.date))
            .collect();
        assert_eq!(
            got,
            vec![
                (0, date(2025, 11, 12)),
                (1, date(2025, 11, 13)),
                (1, date(2025, 11, 14)),
            ]
        );

        let buckets = bucket_by_day(occurrences);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[&date(2025, 11, 12)].len(), 1);
    }
}
