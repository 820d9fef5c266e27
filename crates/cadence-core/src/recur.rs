//! Recurrence engine: the periodicity step function and occurrence
//! enumeration over a closed date range.

use crate::model::{Periodicity, Task};
use chrono::{Days, Months, NaiveDate};

/// Step a due date forward by one period.
///
/// Month-based steps (`monthly`, `quarterly`, `semiannually`, `annually`)
/// clamp the day-of-month to the last valid day of the target month, so an
/// anchor on Jan 31 steps to Feb 28 (or 29), never overflows into March.
///
/// Returns `None` for `other` — a non-recurring task has no next occurrence.
#[must_use]
pub fn next_due(date: NaiveDate, periodicity: Periodicity) -> Option<NaiveDate> {
    match periodicity {
        Periodicity::Daily => date.checked_add_days(Days::new(1)),
        Periodicity::Weekly => date.checked_add_days(Days::new(7)),
        Periodicity::Monthly => date.checked_add_months(Months::new(1)),
        Periodicity::Quarterly => date.checked_add_months(Months::new(3)),
        Periodicity::Semiannually => date.checked_add_months(Months::new(6)),
        Periodicity::Annually => date.checked_add_months(Months::new(12)),
        Periodicity::Other => None,
    }
}

/// Enumerate every occurrence of a recurrence anchored at `anchor` that
/// falls inside the closed interval `[start, end]`.
///
/// The walk catches up from the anchor to `start` without materializing the
/// dates it skips, then collects until a date passes `end`. The anchor
/// itself is eligible when `start` precedes it. Non-recurring periodicities
/// yield the anchor alone, if in range.
///
/// The result is a plain ordered list — callers re-run this per view window
/// (month, week, day) with no side effects.
#[must_use]
pub fn occurrences_in_range(
    anchor: NaiveDate,
    periodicity: Periodicity,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }

    if !periodicity.recurs() {
        return if anchor >= start && anchor <= end {
            vec![anchor]
        } else {
            Vec::new()
        };
    }

    // Catch up to the window. `next_due` only returns None here at the far
    // end of the representable date range, where no occurrence can follow.
    let mut cursor = anchor;
    while cursor < start {
        match next_due(cursor, periodicity) {
            Some(next) => cursor = next,
            None => return Vec::new(),
        }
    }

    let mut occurrences = Vec::new();
    while cursor <= end {
        occurrences.push(cursor);
        match next_due(cursor, periodicity) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    occurrences
}

/// Occurrence enumeration for a task, anchored at its `initial_due_date`.
#[must_use]
pub fn task_occurrences_in_range(task: &Task, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    occurrences_in_range(task.initial_due_date, task.periodicity, start, end)
}

/// Returns `true` if `date` lies on the recurrence lattice anchored at
/// `anchor` — i.e. is the anchor or reachable from it by the step function.
#[must_use]
pub fn is_scheduled(anchor: NaiveDate, periodicity: Periodicity, date: NaiveDate) -> bool {
    if date < anchor {
        return false;
    }
    if !periodicity.recurs() {
        return date == anchor;
    }
    let mut cursor = anchor;
    while cursor < date {
        match next_due(cursor, periodicity) {
            Some(next) => cursor = next,
            None => return false,
        }
    }
    cursor == date
}
