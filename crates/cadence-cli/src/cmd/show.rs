//! `cad show` — full detail for one task plus its upcoming occurrences.

use crate::output::{OutputMode, pretty_kv, pretty_section, render};
use anyhow::Result;
use cadence_core::model::{Periodicity, Task};
use cadence_core::recur::next_due;
use cadence_core::storage::Store;
use chrono::{Local, NaiveDate};
use clap::Args;
use serde::Serialize;
use std::path::Path;

/// How many future occurrences the detail view previews.
const UPCOMING_COUNT: usize = 5;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Task index (as shown by `cad list`).
    pub index: usize,
}

#[derive(Debug, Serialize)]
struct TaskDetail {
    index: usize,
    policy: String,
    description: String,
    periodicity: Periodicity,
    initial_due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_due_date: Option<NaiveDate>,
    completed_by: String,
    verified_by: String,
    completion_count: usize,
    upcoming: Vec<NaiveDate>,
}

/// The next `count` lattice dates at or after `from`.
fn upcoming_occurrences(task: &Task, from: NaiveDate, count: usize) -> Vec<NaiveDate> {
    if !task.periodicity.recurs() {
        return if task.initial_due_date >= from {
            vec![task.initial_due_date]
        } else {
            Vec::new()
        };
    }
    let mut cursor = task.initial_due_date;
    while cursor < from {
        match next_due(cursor, task.periodicity) {
            Some(next) => cursor = next,
            None => return Vec::new(),
        }
    }
    let mut dates = Vec::with_capacity(count);
    while dates.len() < count {
        dates.push(cursor);
        match next_due(cursor, task.periodicity) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    dates
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let store = Store::open(project_root)?;
    let schedule = store.load();
    let task = schedule.task(args.index)?;
    let names = schedule.status.get(&args.index).cloned().unwrap_or_default();
    let today = Local::now().date_naive();

    let detail = TaskDetail {
        index: args.index,
        policy: task.policy.clone(),
        description: task.description.clone(),
        periodicity: task.periodicity,
        initial_due_date: task.initial_due_date,
        current_due_date: task.current_due_date,
        completed_by: names.completed_by,
        verified_by: names.verified_by,
        completion_count: schedule
            .completions
            .iter()
            .filter(|record| record.task_index == args.index)
            .count(),
        upcoming: upcoming_occurrences(task, today, UPCOMING_COUNT),
    };

    render(output, &detail, |detail, w| {
        pretty_section(w, &format!("Task {}", detail.index))?;
        pretty_kv(w, "Policy", &detail.policy)?;
        pretty_kv(w, "Task", &detail.description)?;
        pretty_kv(w, "Periodicity", detail.periodicity.to_string())?;
        pretty_kv(w, "Anchor", detail.initial_due_date.to_string())?;
        pretty_kv(
            w,
            "Due",
            detail
                .current_due_date
                .map_or_else(|| "-".to_string(), |d| d.to_string()),
        )?;
        pretty_kv(w, "Completed by", &detail.completed_by)?;
        pretty_kv(w, "Verified by", &detail.verified_by)?;
        pretty_kv(w, "Completions", detail.completion_count.to_string())?;
        if !detail.upcoming.is_empty() {
            let dates: Vec<String> = detail.upcoming.iter().map(ToString::to_string).collect();
            pretty_kv(w, "Upcoming", dates.join(", "))?;
        }
        Ok(())
    })
}
