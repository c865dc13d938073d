pub mod average;
pub mod years;

pub use average::{averages, Averages, PlatformAverage};
pub use years::{filter_by_year, years};
