//! Calendar windows: the month / week / day views, their date ranges,
//! prev/next stepping, and the month grid layout.

use crate::model::task::ParseEnumError;
use chrono::{Datelike, Days, Months, NaiveDate};
use std::{fmt, str::FromStr};

/// Which calendar window is being rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

impl CalendarView {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
        }
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarView {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(Self::Month),
            "week" => Ok(Self::Week),
            "day" => Ok(Self::Day),
            _ => Err(ParseEnumError {
                expected: "view",
                got: s.to_string(),
            }),
        }
    }
}

/// Weekday header labels, Sunday-first. Weeks start on Sunday throughout.
pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A view plus the date it is focused on. Resolves to a closed date range
/// and steps forward/backward by whole windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    pub view: CalendarView,
    pub focus: NaiveDate,
}

impl CalendarWindow {
    #[must_use]
    pub const fn new(view: CalendarView, focus: NaiveDate) -> Self {
        Self { view, focus }
    }

    /// The closed `[start, end]` range this window covers.
    #[must_use]
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        match self.view {
            CalendarView::Month => {
                let first = first_of_month(self.focus);
                let last = last_of_month(self.focus);
                (first, last)
            }
            CalendarView::Week => {
                let start = week_start(self.focus);
                let end = start + Days::new(6);
                (start, end)
            }
            CalendarView::Day => (self.focus, self.focus),
        }
    }

    /// Step the focus by `delta` windows: months for the month view, weeks
    /// for the week view, days for the day view. Month steps clamp the
    /// day-of-month like the recurrence engine does.
    #[must_use]
    pub fn step(&self, delta: i32) -> Self {
        let focus = match self.view {
            CalendarView::Month => shift_months(self.focus, delta),
            CalendarView::Week => shift_days(self.focus, i64::from(delta) * 7),
            CalendarView::Day => shift_days(self.focus, i64::from(delta)),
        };
        Self {
            view: self.view,
            focus,
        }
    }

    /// Heading for the window: "November 2025", "Week of November 2, 2025 -
    /// November 8, 2025", or "November 6, 2025".
    #[must_use]
    pub fn label(&self) -> String {
        match self.view {
            CalendarView::Month => self.focus.format("%B %Y").to_string(),
            CalendarView::Week => {
                let (start, end) = self.range();
                format!(
                    "Week of {} - {}",
                    start.format("%B %-d, %Y"),
                    end.format("%B %-d, %Y")
                )
            }
            CalendarView::Day => self.focus.format("%B %-d, %Y").to_string(),
        }
    }
}

/// First day of the focus date's calendar month.
#[must_use]
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the focus date's calendar month.
#[must_use]
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// The Sunday on or before `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Lay out the focus month as grid rows of seven cells, Sunday-first.
/// Cells outside the month are `None`; months spanning six weeks produce
/// six rows, shorter months fewer.
#[must_use]
pub fn month_grid(focus: NaiveDate) -> Vec<[Option<NaiveDate>; 7]> {
    let first = first_of_month(focus);
    let last = last_of_month(focus);
    let lead = first.weekday().num_days_from_sunday() as usize;

    let mut rows = Vec::new();
    let mut row = [None; 7];
    let mut col = lead;
    let mut day = first;
    loop {
        row[col] = Some(day);
        col += 1;
        if col == 7 {
            rows.push(row);
            row = [None; 7];
            col = 0;
        }
        if day == last {
            break;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    if col != 0 {
        rows.push(row);
    }
    rows
}

fn shift_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}

fn shift_days(date: NaiveDate, delta: i64) -> NaiveDate {
    let days = Days::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    };
    shifted.unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::{CalendarView, CalendarWindow, month_grid, week_start};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn month_range_covers_whole_month() {
        let window = CalendarWindow::new(CalendarView::Month, date(2025, 11, 14));
        assert_eq!(window.range(), (date(2025, 11, 1), date(2025, 11, 30)));
    }

    #[test]
    fn week_range_is_sunday_through_saturday() {
        // 2025-11-06 is a Thursday; its week runs Sun Nov 2 .. Sat Nov 8.
        let window = CalendarWindow::new(CalendarView::Week, date(2025, 11, 6));
        assert_eq!(window.range(), (date(2025, 11, 2), date(2025, 11, 8)));
        assert_eq!(week_start(date(2025, 11, 2)), date(2025, 11, 2));
    }

    #[test]
    fn stepping_moves_whole_windows() {
        let month = CalendarWindow::new(CalendarView::Month, date(2025, 11, 14));
        assert_eq!(month.step(1).focus, date(2025, 12, 14));
        assert_eq!(month.step(-1).focus, date(2025, 10, 14));

        let week = CalendarWindow::new(CalendarView::Week, date(2025, 11, 6));
        assert_eq!(week.step(2).focus, date(2025, 11, 20));

        let day = CalendarWindow::new(CalendarView::Day, date(2025, 11, 6));
        assert_eq!(day.step(-1).focus, date(2025, 11, 5));
    }

    #[test]
    fn month_step_clamps_short_target_month() {
        let window = CalendarWindow::new(CalendarView::Month, date(2026, 1, 31));
        assert_eq!(window.step(1).focus, date(2026, 2, 28));
    }

    #[test]
    fn grid_rows_start_on_the_right_weekday() {
        // November 2025 begins on a Saturday: first row has six blanks.
        let rows = month_grid(date(2025, 11, 14));
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0][..6], [None; 6]);
        assert_eq!(rows[0][6], Some(date(2025, 11, 1)));
        assert_eq!(rows[5][0], Some(date(2025, 11, 30)));

        // February 2026 starts on a Sunday and fits exactly four rows.
        let feb = month_grid(date(2026, 2, 10));
        assert_eq!(feb.len(), 4);
        assert_eq!(feb[0][0], Some(date(2026, 2, 1)));
        assert_eq!(feb[3][6], Some(date(2026, 2, 28)));
    }

    #[test]
    fn labels_match_rendered_headings() {
        assert_eq!(
            CalendarWindow::new(CalendarView::Month, date(2025, 11, 14)).label(),
            "November 2025"
        );
        assert_eq!(
            CalendarWindow::new(CalendarView::Week, date(2025, 11, 6)).label(),
            "Week of November 2, 2025 - November 8, 2025"
        );
        assert_eq!(
            CalendarWindow::new(CalendarView::Day, date(2025, 11, 6)).label(),
            "November 6, 2025"
        );
    }
}
