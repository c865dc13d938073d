pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod interaction;
pub mod render;
pub mod series;
pub mod table;
pub mod treemap;

pub use dashboard::{Dashboard, DashboardView, Viewport};
pub use error::DashboardError;
