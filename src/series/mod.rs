// src/series/mod.rs
pub mod chart;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{DashboardError, Result};
use crate::table::utils::clean_str;
use crate::table::{CalendarMonth, DatasetRow, Record};

pub use chart::{LineChartView, LinearScale};

/// Cell text meaning "platform had no share this month".
pub const ZERO_SENTINEL: &str = "0";

/// (year, month) of the known bad first data point; never plotted.
pub const ANOMALY_MONTH: (i32, u32) = (2009, 3);

/// One month's share of a single platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub date: CalendarMonth,
    pub value: f64,
}

fn is_anomaly(date: &CalendarMonth) -> bool {
    (date.year(), date.month()) == ANOMALY_MONTH
}

/// Chronological share series of `platform` over `rows`.
///
/// `platform` may be bare or quoted. Rows holding the `"0"` sentinel and the
/// anomaly month are skipped, as are rows whose date or value does not
/// parse. An empty result is not an error; an unknown platform is.
#[instrument(level = "debug", skip(rows), fields(rows = rows.len()))]
pub fn series(rows: &[Record], platform: &str) -> Result<Vec<TimeSeriesPoint>> {
    if clean_str(platform).is_empty() || !rows.iter().any(|r| r.column_for(platform).is_some()) {
        return Err(DashboardError::UnknownPlatform(platform.to_string()));
    }

    let mut points = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let cell = match row.column_for(platform).and_then(|c| row.get(c)) {
            Some(cell) => cell,
            None => {
                debug!(row = idx, "no cell for platform");
                continue;
            }
        };
        if clean_str(cell) == ZERO_SENTINEL {
            continue;
        }
        let Some(typed) = DatasetRow::from_record(row) else {
            debug!(row = idx, date = ?row.date(), "unparsable date");
            continue;
        };
        if is_anomaly(&typed.date) {
            continue;
        }
        match typed.value(platform) {
            Some(value) => points.push(TimeSeriesPoint {
                date: typed.date,
                value,
            }),
            None => debug!(row = idx, cell, "unparsable share"),
        }
    }

    points.sort_by_key(|p| p.date);
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CsvTable;

    fn rows(text: &str) -> Vec<Record> {
        CsvTable::parse(text).unwrap().into_records()
    }

    const DATA: &str = "\"Date\",\"Facebook\",\"Pinterest\"\n\
2009-04,30.1,0\n\
2009-03,99.9,1\n\
2009-01,25.0,0\n\
2009-02,0,2\n\
2009-05,31.5,3\n";

    #[test]
    fn drops_sentinels_and_sorts() {
        let points = series(&rows(DATA), "Facebook").unwrap();
        let dates: Vec<_> = points.iter().map(|p| p.date.to_string()).collect();
        assert_eq!(dates, vec!["2009-01", "2009-04", "2009-05"]);
        assert_eq!(points[0].value, 25.0);
        assert!(points.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn quoted_platform_name_works() {
        let points = series(&rows(DATA), "\"Pinterest\"").unwrap();
        let values: Vec<_> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2.0, 3.0]);
    }

    #[test]
    fn unknown_or_blank_platform_fails() {
        let rows = rows(DATA);
        assert!(matches!(
            series(&rows, "MySpace"),
            Err(DashboardError::UnknownPlatform(p)) if p == "MySpace"
        ));
        assert!(matches!(series(&rows, ""), Err(DashboardError::UnknownPlatform(_))));
        assert!(matches!(series(&[], "Facebook"), Err(DashboardError::UnknownPlatform(_))));
    }

    #[test]
    fn all_filtered_is_empty_not_error() {
        let rows = rows("\"Date\",\"A\"\n2010-01,0\n2009-03,4\n");
        assert!(series(&rows, "A").unwrap().is_empty());
    }

    #[test]
    fn bad_rows_are_skipped() {
        let rows = rows("\"Date\",\"A\",\"B\"\n2010-01,abc,1\nnot-a-date,3,1\n2010-02\n2010-03,4,1\n");
        let points = series(&rows, "A").unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date.to_string(), "2010-03");
    }
}
