//! `cad calendar` — scheduled occurrences for a month, week, or day window.

use crate::output::{OutputMode, pretty_rule, render, truncate_display};
use anyhow::Result;
use cadence_core::calendar::{CalendarView, CalendarWindow, DAY_NAMES, month_grid};
use cadence_core::config::load_project_config;
use cadence_core::schedule::{OccurrenceStatus, bucket_by_day};
use cadence_core::storage::Store;
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Display cap for one occurrence line.
const ITEM_WIDTH: usize = 60;

#[derive(Args, Debug)]
pub struct CalendarArgs {
    /// Window to render: month, week, or day (default from config).
    #[arg(short, long)]
    pub view: Option<String>,

    /// Focus date (YYYY-MM-DD, default today).
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Step the window forward/backward this many months, weeks, or days.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub offset: i32,
}

#[derive(Debug, Serialize)]
struct CalendarItem {
    task_index: usize,
    status: OccurrenceStatus,
    policy: String,
    description: String,
}

#[derive(Debug, Serialize)]
struct CalendarDay {
    date: NaiveDate,
    items: Vec<CalendarItem>,
}

#[derive(Debug, Serialize)]
struct CalendarReport {
    view: CalendarView,
    label: String,
    start: NaiveDate,
    end: NaiveDate,
    days: Vec<CalendarDay>,
}

pub fn run_calendar(args: &CalendarArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let store = Store::open(project_root)?;
    let config = load_project_config(project_root)?;
    let schedule = store.load();

    let view = match args.view.as_deref() {
        Some(raw) => raw.parse::<CalendarView>()?,
        None => config.calendar.default_view,
    };
    let today = Local::now().date_naive();
    let focus = args.date.unwrap_or(today);
    let window = CalendarWindow::new(view, focus).step(args.offset);
    let (start, end) = window.range();

    let buckets = bucket_by_day(schedule.occurrences_in_range(start, end, today));
    let days: Vec<CalendarDay> = buckets
        .into_iter()
        .map(|(date, occurrences)| CalendarDay {
            date,
            items: occurrences
                .into_iter()
                .map(|occ| {
                    let task = &schedule.tasks[occ.task_index];
                    CalendarItem {
                        task_index: occ.task_index,
                        status: occ.status,
                        policy: task.policy.clone(),
                        description: task.description.clone(),
                    }
                })
                .collect(),
        })
        .collect();

    let report = CalendarReport {
        view,
        label: window.label(),
        start,
        end,
        days,
    };

    render(output, &report, |report, w| {
        writeln!(w, "{}", report.label)?;
        pretty_rule(w)?;
        match report.view {
            CalendarView::Month => write_month(w, report),
            CalendarView::Week => write_week(w, report),
            CalendarView::Day => write_items(w, report.days.first()),
        }
    })
}

fn day_map(report: &CalendarReport) -> BTreeMap<NaiveDate, &CalendarDay> {
    report.days.iter().map(|day| (day.date, day)).collect()
}

/// One occurrence line: status marker, task index, "policy: description".
fn write_item(w: &mut dyn Write, item: &CalendarItem) -> std::io::Result<()> {
    let text = format!("{}: {}", item.policy, item.description);
    writeln!(
        w,
        "  [{}] {:>3}  {}",
        item.status.marker(),
        item.task_index,
        truncate_display(&text, ITEM_WIDTH)
    )
}

fn write_items(w: &mut dyn Write, day: Option<&CalendarDay>) -> std::io::Result<()> {
    match day {
        Some(day) if !day.items.is_empty() => {
            for item in &day.items {
                write_item(w, item)?;
            }
            Ok(())
        }
        _ => writeln!(w, "No tasks scheduled for this day."),
    }
}

/// The month grid: weekday header, day-number rows with a `.` mark on days
/// that have occurrences, then the occurrence listing per day.
fn write_month(w: &mut dyn Write, report: &CalendarReport) -> std::io::Result<()> {
    let by_day = day_map(report);
    for name in DAY_NAMES {
        write!(w, " {name:>4}")?;
    }
    writeln!(w)?;
    for row in month_grid(report.start) {
        for cell in row {
            match cell {
                Some(date) => {
                    let mark = if by_day.contains_key(&date) { '.' } else { ' ' };
                    write!(w, " {:>3}{mark}", date.day())?;
                }
                None => write!(w, "     ")?,
            }
        }
        writeln!(w)?;
    }
    for day in &report.days {
        writeln!(w)?;
        writeln!(w, "{}", day.date)?;
        for item in &day.items {
            write_item(w, item)?;
        }
    }
    Ok(())
}

/// The week strip: one "Sun 11/2"-style heading per day, each followed by
/// its occurrences.
fn write_week(w: &mut dyn Write, report: &CalendarReport) -> std::io::Result<()> {
    let by_day = day_map(report);
    let mut date = report.start;
    for name in DAY_NAMES {
        writeln!(w, "{name} {}/{}", date.month(), date.day())?;
        write_items(w, by_day.get(&date).copied())?;
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    Ok(())
}
