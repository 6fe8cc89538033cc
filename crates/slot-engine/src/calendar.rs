//! Month grid generation for the date picker.
//!
//! A grid is the sequence of cells a calendar widget renders: leading blanks
//! so day 1 lands under its weekday column (weeks start on Sunday), then one
//! cell per day flagged past/selected. Grids are derived values — recomputed
//! from their inputs on every call, never persisted, and navigation is a pure
//! cursor moving one month per step with no bound in either direction.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A (year, month) position in the date picker.
///
/// Internally pinned to the first day of the month, which keeps every derived
/// date valid by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCursor {
    first: NaiveDate,
}

impl MonthCursor {
    /// Cursor for a 1-based `month` of `year`; `None` for month 0 or 13+.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// Cursor for the month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// Move forward exactly one month. Saturates at chrono's date range.
    pub fn next_month(self) -> Self {
        Self {
            first: self
                .first
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// Move back exactly one month. Saturates at chrono's date range.
    pub fn prev_month(self) -> Self {
        Self {
            first: self
                .first
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// Number of days in this month (day 0 of the next month is this month's
    /// last day).
    pub fn days_in_month(&self) -> u32 {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next_first| next_first.pred_opt())
            .map(|last| last.day())
            .unwrap_or(31)
    }

    /// Leading blank cells before day 1, i.e. its weekday index (Sunday = 0).
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }
}

/// One renderable day in a month grid. Transient — rebuilt on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day_of_month: u32,
    /// Strictly before `today` by calendar-date comparison, so today itself
    /// is never past regardless of the current time of day.
    pub is_past: bool,
    pub is_selected: bool,
}

/// A cell in the grid: leading padding or an actual day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarCell {
    Blank,
    Day(CalendarDay),
}

/// Build the grid for one month.
///
/// Yields `leading_blanks` padding cells followed by one [`CalendarCell::Day`]
/// per day 1..=N. The iterator is lazy and `Clone` — cloning restarts an
/// independent pass over the same inputs.
pub fn month_grid(
    cursor: MonthCursor,
    selected: Option<NaiveDate>,
    today: NaiveDate,
) -> MonthGrid {
    MonthGrid {
        selected,
        today,
        blanks_left: cursor.leading_blanks(),
        days_left: cursor.days_in_month(),
        current: cursor.first,
    }
}

/// Lazy month-grid iterator; see [`month_grid`].
#[derive(Debug, Clone)]
pub struct MonthGrid {
    selected: Option<NaiveDate>,
    today: NaiveDate,
    blanks_left: u32,
    days_left: u32,
    current: NaiveDate,
}

impl Iterator for MonthGrid {
    type Item = CalendarCell;

    fn next(&mut self) -> Option<CalendarCell> {
        if self.blanks_left > 0 {
            self.blanks_left -= 1;
            return Some(CalendarCell::Blank);
        }
        if self.days_left == 0 {
            return None;
        }
        self.days_left -= 1;

        let cell = CalendarCell::Day(CalendarDay {
            date: self.current,
            day_of_month: self.current.day(),
            is_past: self.current < self.today,
            is_selected: self.selected == Some(self.current),
        });
        if let Some(next) = self.current.succ_opt() {
            self.current = next;
        }
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.blanks_left + self.days_left) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthGrid {}
