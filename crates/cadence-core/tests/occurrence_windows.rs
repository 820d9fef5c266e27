//! Window-driven occurrence enumeration: calendar views feeding the
//! recurrence scan, including the catch-up and clamping edge cases.

use cadence_core::calendar::{CalendarView, CalendarWindow};
use cadence_core::model::{Periodicity, Task};
use cadence_core::recur::next_due;
use cadence_core::schedule::{OccurrenceStatus, Schedule, bucket_by_day};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

fn schedule_with(tasks: Vec<Task>) -> Schedule {
    let mut schedule = Schedule::default();
    schedule.tasks = tasks;
    schedule
}

#[test]
fn daily_task_in_a_single_day_window() {
    let schedule = schedule_with(vec![Task::new(
        "Access Control Policy",
        "Standard users use daily-work accounts",
        Periodicity::Daily,
        date(2025, 11, 6),
    )]);
    let window = CalendarWindow::new(CalendarView::Day, date(2025, 11, 6));
    let (start, end) = window.range();
    let occurrences = schedule.occurrences_in_range(start, end, date(2025, 11, 6));
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].date, date(2025, 11, 6));
    assert_eq!(occurrences[0].status, OccurrenceStatus::DueToday);
}

#[test]
fn other_task_appears_only_in_its_anchor_month() {
    let schedule = schedule_with(vec![Task::new(
        "Incident Response Policy",
        "One-off tabletop exercise",
        Periodicity::Other,
        date(2025, 11, 5),
    )]);

    let november = CalendarWindow::new(CalendarView::Month, date(2025, 11, 1));
    let (start, end) = november.range();
    let occurrences = schedule.occurrences_in_range(start, end, date(2025, 11, 1));
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].date, date(2025, 11, 5));

    let december = november.step(1);
    let (start, end) = december.range();
    assert!(
        schedule
            .occurrences_in_range(start, end, date(2025, 11, 1))
            .is_empty()
    );
}

#[test]
fn monthly_step_from_jan_31_hits_end_of_february() {
    let next = next_due(date(2026, 1, 31), Periodicity::Monthly).expect("monthly step");
    assert_eq!(next, date(2026, 2, 28));

    // And the February month window surfaces that clamped occurrence.
    let schedule = schedule_with(vec![Task::new(
        "Licensing Compliance Policy",
        "Month-end reconciliation",
        Periodicity::Monthly,
        date(2026, 1, 31),
    )]);
    let feb = CalendarWindow::new(CalendarView::Month, date(2026, 2, 1));
    let (start, end) = feb.range();
    let occurrences = schedule.occurrences_in_range(start, end, date(2026, 1, 1));
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].date, date(2026, 2, 28));
}

#[test]
fn week_window_buckets_multiple_tasks_per_day() {
    let schedule = schedule_with(vec![
        Task::new(
            "Email Usage Policy",
            "Review logs weekly",
            Periodicity::Weekly,
            date(2025, 11, 12),
        ),
        Task::new(
            "Desktop Computer Security Policy",
            "Run daily correlation rules",
            Periodicity::Daily,
            date(2025, 11, 6),
        ),
    ]);

    // Week of Sun Nov 9 .. Sat Nov 15.
    let window = CalendarWindow::new(CalendarView::Week, date(2025, 11, 12));
    let (start, end) = window.range();
    assert_eq!((start, end), (date(2025, 11, 9), date(2025, 11, 15)));

    let occurrences = schedule.occurrences_in_range(start, end, date(2025, 11, 12));
    let buckets = bucket_by_day(occurrences);
    // Daily task fills all seven days; the weekly one joins it on Wednesday.
    assert_eq!(buckets.len(), 7);
    assert_eq!(buckets[&date(2025, 11, 12)].len(), 2);
    assert_eq!(buckets[&date(2025, 11, 13)].len(), 1);
}

#[test]
fn anchor_far_after_window_start_is_still_included() {
    let schedule = schedule_with(vec![Task::new(
        "Awareness & Training Policy",
        "Annual refresher",
        Periodicity::Annually,
        date(2026, 11, 5),
    )]);
    let occurrences =
        schedule.occurrences_in_range(date(2020, 1, 1), date(2026, 12, 31), date(2025, 1, 1));
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].date, date(2026, 11, 5));
}
