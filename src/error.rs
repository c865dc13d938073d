use thiserror::Error;

/// Failures the dashboard pipeline reports to its caller.
///
/// None of these are fatal to the dashboard: the controller maps
/// `EmptyDataset` to "no treemap" and `UnknownPlatform` to "no line chart".
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Averaging was asked for over zero rows.
    #[error("cannot average an empty dataset")]
    EmptyDataset,

    /// The requested platform is blank or not a column of any row.
    #[error("unknown platform: {0:?}")]
    UnknownPlatform(String),

    /// The input had no header line.
    #[error("csv input has no header line")]
    MissingHeader,

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
