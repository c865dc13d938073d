use serde::Serialize;
use tracing::{instrument, warn};

use crate::error::{DashboardError, Result};
use crate::table::utils::{display_name, is_date_column, parse_share};
use crate::table::Record;

/// Mean share of one platform over a set of months.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformAverage {
    pub platform: String,
    pub mean_share_percent: f64,
}

/// Platform averages in header column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Averages(Vec<PlatformAverage>);

impl Averages {
    pub fn get(&self, platform: &str) -> Option<f64> {
        let wanted = display_name(platform);
        self.0
            .iter()
            .find(|a| a.platform == wanted)
            .map(|a| a.mean_share_percent)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlatformAverage> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Averages {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(platform, mean_share_percent)| PlatformAverage {
                    platform: platform.into(),
                    mean_share_percent,
                })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Averages {
    type Item = &'a PlatformAverage;
    type IntoIter = std::slice::Iter<'a, PlatformAverage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Arithmetic mean of every non-date column over `rows`.
///
/// The denominator is always `rows.len()`: a missing or unparsable cell is
/// counted as a 0% month, never skipped and never NaN. Columns come from the
/// first row's header.
#[instrument(level = "debug", skip(rows), fields(rows = rows.len()))]
pub fn averages(rows: &[Record]) -> Result<Averages> {
    let first = rows.first().ok_or(DashboardError::EmptyDataset)?;
    let columns: Vec<&str> = first
        .headers()
        .iter()
        .map(String::as_str)
        .filter(|c| !is_date_column(c))
        .collect();

    let mut sums = vec![0.0_f64; columns.len()];
    for (idx, row) in rows.iter().enumerate() {
        for (column, sum) in columns.iter().zip(sums.iter_mut()) {
            let cell = row.get(column);
            match cell.and_then(parse_share) {
                Some(v) => *sum += v,
                None => warn!(
                    row = idx,
                    column = display_name(column),
                    cell = ?cell,
                    "unparsable share, counted as 0"
                ),
            }
        }
    }

    let count = rows.len() as f64;
    Ok(columns
        .iter()
        .zip(sums)
        .map(|(column, sum)| (display_name(column), sum / count))
        .collect())
}
