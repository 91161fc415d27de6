// Temporal helpers - calendar dates, inclusive date windows, month slider
//
// All comparisons happen on calendar dates. Time-of-day never
// participates in filtering.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{Error, Result};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ============================================================================
// DATE PARSING
// ============================================================================

/// Parse an ISO-8601 date or datetime into a calendar date.
///
/// Accepts `2024-01-31`, `2024-01-31T09:15:00`, `2024-01-31 09:15:00`
/// and RFC 3339 timestamps with an offset. The date is taken as written,
/// never shifted to UTC.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

// ============================================================================
// DATE RANGE
// ============================================================================

/// Inclusive `[start, end]` window over calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// Parse both bounds with `parse_calendar_date`
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start_date = parse_calendar_date(start)
            .ok_or_else(|| Error::InvalidData(format!("Invalid start date: {}", start)))?;
        let end_date = parse_calendar_date(end)
            .ok_or_else(|| Error::InvalidData(format!("Invalid end date: {}", end)))?;
        DateRange::new(start_date, end_date)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

// ============================================================================
// MONTH WINDOW
// ============================================================================

/// MonthWindow - a slider over the twelve months of one year
///
/// Indices are 0-based (0 = January). The window slides as a unit and
/// stops at either end of the year instead of shrinking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    start: u32,
    end: u32,
}

impl Default for MonthWindow {
    /// January through March
    fn default() -> Self {
        MonthWindow { start: 0, end: 2 }
    }
}

impl MonthWindow {
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if end > 11 || start > end {
            return Err(Error::InvalidData(format!(
                "Invalid month window: {}..{}",
                start, end
            )));
        }
        Ok(MonthWindow { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn contains_month(&self, index: u32) -> bool {
        index >= self.start && index <= self.end
    }

    pub fn shift_left(&mut self) {
        if self.start > 0 {
            self.start -= 1;
            self.end -= 1;
        }
    }

    pub fn shift_right(&mut self) {
        if self.end < 11 {
            self.start += 1;
            self.end += 1;
        }
    }

    /// Extend the window by one month at the end
    pub fn grow(&mut self) {
        if self.end < 11 {
            self.end += 1;
        }
    }

    /// Drop the last month; a window never gets narrower than one month
    pub fn shrink(&mut self) {
        if self.end > self.start {
            self.end -= 1;
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            MONTH_NAMES[self.start as usize], MONTH_NAMES[self.end as usize]
        )
    }

    /// First day of the start month through the last day of the end month
    pub fn to_range(&self, year: i32) -> Result<DateRange> {
        let start = NaiveDate::from_ymd_opt(year, self.start + 1, 1)
            .ok_or_else(|| Error::InvalidData(format!("Year out of range: {}", year)))?;
        let end = last_day_of_month(year, self.end + 1)
            .ok_or_else(|| Error::InvalidData(format!("Year out of range: {}", year)))?;
        DateRange::new(start, end)
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = first_of_next - Duration::days(1);
    debug_assert_eq!(last.month(), month);
    Some(last)
}
