//! `cad complete` — record a completion and advance the task's due date.

use crate::output::{OutputMode, render};
use anyhow::Result;
use cadence_core::config::load_project_config;
use cadence_core::model::CompletionRecord;
use cadence_core::storage::Store;
use chrono::{Local, NaiveDate};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Task index (as shown by `cad list`).
    pub index: usize,

    /// Occurrence due date to complete (default: the task's current due date).
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Record this name as completed-by before completing.
    #[arg(long = "by")]
    pub completed_by: Option<String>,

    /// Record this name as verified-by before completing.
    #[arg(long)]
    pub verified_by: Option<String>,
}

#[derive(Debug, Serialize)]
struct CompleteReport {
    record: CompletionRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_due: Option<NaiveDate>,
}

pub fn run_complete(
    args: &CompleteArgs,
    output: OutputMode,
    quiet: bool,
    project_root: &Path,
) -> Result<()> {
    let store = Store::open(project_root)?;
    let config = load_project_config(project_root)?;
    let mut schedule = store.load();

    // Name flags behave like edits to the table's input boxes: they update
    // the status map first so the record captures them.
    if args.completed_by.is_some() || args.verified_by.is_some() {
        schedule.set_status_names(
            args.index,
            args.completed_by.clone(),
            args.verified_by.clone(),
        )?;
    }

    let today = Local::now().date_naive();
    let record = schedule.complete_occurrence(
        args.index,
        args.date,
        today,
        config.completions.allow_duplicates,
    )?;
    let next_due = schedule.tasks[args.index].current_due_date;
    store.persist(&schedule);

    tracing::info!(
        task = args.index,
        due = %record.due_date,
        next = ?next_due,
        "occurrence completed"
    );

    let report = CompleteReport { record, next_due };
    if quiet && !output.is_json() {
        return Ok(());
    }
    render(output, &report, |report, w| {
        writeln!(
            w,
            "Completed task {} for {}",
            report.record.task_index, report.record.due_date
        )?;
        match report.next_due {
            Some(next) => writeln!(w, "Next due {next}"),
            None => writeln!(w, "No further occurrences"),
        }
    })
}
