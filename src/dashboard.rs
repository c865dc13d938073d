use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::{self, Averages};
use crate::error::{DashboardError, Result};
use crate::interaction::{Hover, InteractionController, Point, Selection, Tooltip};
use crate::series::{self, LineChartView};
use crate::table::{CsvTable, Record};
use crate::treemap::{self, TreemapView};

pub const DEFAULT_WIDTH: f64 = 960.0;
pub const HEIGHT_RATIO: f64 = 0.4;
pub const MAX_CHART_HEIGHT: f64 = 400.0;

/// Pointer distance within which a line-chart dot counts as hovered.
pub const POINT_HIT_RADIUS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
}

impl Viewport {
    pub fn new(width: f64) -> Self {
        Self { width }
    }

    /// Both charts share this height: 40% of the width, capped.
    pub fn chart_height(&self) -> f64 {
        (self.width * HEIGHT_RATIO).min(MAX_CHART_HEIGHT)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH)
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub years: Vec<String>,
    pub selection: Selection,
    pub viewport: Viewport,
    pub averages: Option<Averages>,
    pub treemap: Option<TreemapView>,
    pub line_chart: Option<LineChartView>,
    pub tooltip: Option<Tooltip>,
}

impl DashboardView {
    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.treemap.is_none() && self.line_chart.is_none()
    }
}

/// Owns the dataset and all user state; every change goes through one of
/// the event methods and the view is recomputed from scratch on demand.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    rows: Vec<Record>,
    years: Vec<String>,
    filtered: Vec<Record>,
    selection: Selection,
    viewport: Viewport,
    interaction: InteractionController,
}

impl Dashboard {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Parse `text` and load it. On a parse failure the dashboard is left
    /// empty and the error is returned for the caller to report.
    pub fn load(&mut self, text: &str) -> Result<()> {
        match CsvTable::parse(text) {
            Ok(table) => {
                self.load_records(table.into_records());
                Ok(())
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    /// Replace the dataset and auto-select the first year, as the year
    /// selector does on mount.
    pub fn load_records(&mut self, rows: Vec<Record>) {
        self.years = aggregate::years(&rows);
        self.rows = rows;
        self.selection = Selection::default();
        self.filtered.clear();
        self.interaction.leave();
        info!(rows = self.rows.len(), years = self.years.len(), "dataset loaded");

        if let Some(first) = self.years.first().cloned() {
            self.select_year(&first);
        }
    }

    /// Drop all data: the empty, chart-less state.
    pub fn clear(&mut self) {
        let viewport = self.viewport;
        *self = Self::new(viewport);
    }

    pub fn select_year(&mut self, year: &str) {
        self.filtered = aggregate::filter_by_year(&self.rows, year);
        self.selection.year = Some(year.to_string());
        self.selection.platform = None;
        self.interaction.leave();
        info!(year, rows = self.filtered.len(), "year selected");
    }

    pub fn select_platform(&mut self, platform: &str) {
        treemap::select(&mut self.selection, platform);
        info!(platform, "platform selected");
    }

    /// Re-layout only; the record set is untouched.
    pub fn resize(&mut self, width: f64) {
        self.viewport = Viewport::new(width);
        self.interaction.leave();
    }

    /// Pointer moved over the treemap.
    pub fn treemap_pointer(&mut self, pointer: Point) {
        let hit = self
            .treemap_view()
            .and_then(|view| view.leaf_at(pointer.x, pointer.y).cloned());
        match hit {
            Some(leaf) if self.is_hovering_leaf(&leaf.name) => self.interaction.pointer_move(pointer),
            Some(leaf) => self.interaction.hover_leaf(&leaf, pointer),
            None => self.interaction.leave(),
        }
    }

    /// Click on the treemap; returns true if it landed on a leaf.
    pub fn treemap_click(&mut self, pointer: Point) -> bool {
        let hit = self
            .treemap_view()
            .and_then(|view| view.leaf_at(pointer.x, pointer.y).cloned());
        match hit {
            Some(leaf) => {
                self.interaction.click_leaf(&leaf, &mut self.selection);
                info!(platform = %leaf.name, "platform selected");
                true
            }
            None => false,
        }
    }

    /// Pointer moved over the line chart.
    pub fn line_chart_pointer(&mut self, pointer: Point) {
        let Some(view) = self.line_chart_view() else {
            self.interaction.leave();
            return;
        };
        match view.point_near(pointer.x, pointer.y, POINT_HIT_RADIUS) {
            Some(i) if self.interaction.hovered_point() == Some(i) => {
                self.interaction.pointer_move(pointer)
            }
            Some(i) => self.interaction.hover_point(i, &view.points[i], pointer),
            None => self.interaction.leave(),
        }
    }

    pub fn pointer_leave(&mut self) {
        self.interaction.leave();
    }

    fn is_hovering_leaf(&self, name: &str) -> bool {
        matches!(self.interaction.hover(), Some(Hover::Leaf(n)) if n == name)
    }

    pub fn years(&self) -> &[String] {
        &self.years
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn filtered_rows(&self) -> &[Record] {
        &self.filtered
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn averages(&self) -> Result<Averages> {
        aggregate::averages(&self.filtered)
    }

    fn treemap_view(&self) -> Option<TreemapView> {
        self.treemap_from(&self.averages())
    }

    fn treemap_from(&self, averages: &Result<Averages>) -> Option<TreemapView> {
        match averages {
            Ok(averages) => Some(TreemapView::build(
                averages,
                self.viewport.width,
                self.viewport.chart_height(),
                self.selection.platform.as_deref(),
            )),
            Err(DashboardError::EmptyDataset) => {
                debug!(year = ?self.selection.year, "no rows for year, treemap hidden");
                None
            }
            Err(e) => {
                warn!(error = %e, "treemap hidden");
                None
            }
        }
    }

    fn line_chart_view(&self) -> Option<LineChartView> {
        let platform = self.selection.platform.as_deref()?;
        match series::series(&self.filtered, platform) {
            Ok(points) => Some(LineChartView::build(
                platform,
                &points,
                self.viewport.width,
                self.viewport.chart_height(),
            )),
            Err(e) => {
                debug!(error = %e, "line chart hidden");
                None
            }
        }
    }

    /// Recompute the whole frame from resident data.
    pub fn view(&self) -> DashboardView {
        let mut line_chart = self.line_chart_view();
        if let Some(chart) = line_chart.as_mut() {
            chart.hovered = self.interaction.hovered_point();
        }
        let averages = self.averages();
        DashboardView {
            years: self.years.clone(),
            selection: self.selection.clone(),
            viewport: self.viewport,
            treemap: self.treemap_from(&averages),
            averages: averages.ok(),
            line_chart,
            tooltip: self.interaction.tooltip().cloned(),
        }
    }
}
