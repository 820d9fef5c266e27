//! `cad list` — the task table with filtering.

use crate::output::{OutputMode, render, truncate_display};
use anyhow::Result;
use cadence_core::error::{CadenceError, ErrorCode};
use cadence_core::model::Periodicity;
use cadence_core::storage::Store;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Column budget for the description cell.
const DESCRIPTION_WIDTH: usize = 60;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by policy label (case-insensitive substring).
    #[arg(short, long)]
    pub policy: Option<String>,

    /// Filter by periodicity: daily, weekly, monthly, quarterly,
    /// semiannually, annually, other.
    #[arg(short = 'P', long)]
    pub periodicity: Option<String>,

    /// Maximum tasks to show.
    #[arg(short = 'n', long, default_value = "50")]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
struct TaskRow {
    index: usize,
    policy: String,
    description: String,
    periodicity: Periodicity,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    completed_by: String,
    verified_by: String,
}

pub fn run_list(args: &ListArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let store = Store::open(project_root)?;
    let schedule = store.load();

    let periodicity = args
        .periodicity
        .as_deref()
        .map(|raw| {
            raw.parse::<Periodicity>().map_err(|err| {
                CadenceError::with_message(ErrorCode::InvalidPeriodicity, err.to_string())
            })
        })
        .transpose()?;
    let policy_needle = args.policy.as_deref().map(str::to_ascii_lowercase);

    let rows: Vec<TaskRow> = schedule
        .tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| {
            policy_needle
                .as_deref()
                .is_none_or(|needle| task.policy.to_ascii_lowercase().contains(needle))
        })
        .filter(|(_, task)| periodicity.is_none_or(|p| task.periodicity == p))
        .take(args.limit)
        .map(|(index, task)| {
            let names = schedule.status.get(&index).cloned().unwrap_or_default();
            TaskRow {
                index,
                policy: task.policy.clone(),
                description: task.description.clone(),
                periodicity: task.periodicity,
                due_date: task.current_due_date,
                completed_by: names.completed_by,
                verified_by: names.verified_by,
            }
        })
        .collect();

    render(output, &rows, |rows, w| {
        if rows.is_empty() {
            writeln!(w, "No tasks found")?;
            return Ok(());
        }
        writeln!(
            w,
            "{:>4}  {:<28}  {:<13}  {:<10}  {}",
            "#", "POLICY", "PERIODICITY", "DUE", "TASK"
        )?;
        for row in rows {
            writeln!(
                w,
                "{:>4}  {:<28}  {:<13}  {:<10}  {}",
                row.index,
                truncate_display(&row.policy, 28),
                row.periodicity.to_string(),
                row.due_date.map_or_else(|| "-".to_string(), |d| d.to_string()),
                truncate_display(&row.description, DESCRIPTION_WIDTH),
            )?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ListArgs,
        }
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.policy.is_none());
        assert!(w.args.periodicity.is_none());
        assert_eq!(w.args.limit, 50);
    }
}
