use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::table::utils::{clean_str, display_name, is_date_column, parse_share};
use crate::table::Record;

/// A calendar month, stored as the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth(NaiveDate);

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Fast parse of `"YYYY-MM"` (quotes and whitespace tolerated).
    pub fn parse(s: &str) -> Option<Self> {
        let (year, month) = clean_str(s).split_once('-')?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return None;
        }
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl Serialize for CalendarMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Year component of a raw date cell: everything before the first `-`.
///
/// Missing or blank dates yield `None`.
pub fn year_of(date_cell: &str) -> Option<&str> {
    let cleaned = clean_str(date_cell);
    let year = cleaned.split('-').next()?.trim();
    if year.is_empty() {
        None
    } else {
        Some(year)
    }
}

/// Typed view over a `Record`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub date: CalendarMonth,
    /// Platform display name → parsed share; `None` marks a missing or
    /// unparsable cell.
    pub values: Vec<(String, Option<f64>)>,
}

impl DatasetRow {
    /// Returns `None` when the record has no parseable date.
    pub fn from_record(record: &Record) -> Option<Self> {
        let date = CalendarMonth::parse(record.date()?)?;
        let values = record
            .cells()
            .filter(|(column, _)| !is_date_column(column))
            .map(|(column, cell)| (display_name(column).to_string(), cell.and_then(parse_share)))
            .collect();
        Some(Self { date, values })
    }

    pub fn value(&self, platform: &str) -> Option<f64> {
        let wanted = display_name(platform);
        self.values
            .iter()
            .find(|(name, _)| name == wanted)
            .and_then(|(_, v)| *v)
    }
}
