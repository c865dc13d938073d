use serde::Serialize;

use crate::series::TimeSeriesPoint;
use crate::table::CalendarMonth;

pub const MARGIN_TOP: f64 = 20.0;
pub const MARGIN_RIGHT: f64 = 30.0;
pub const MARGIN_BOTTOM: f64 = 50.0;
pub const MARGIN_LEFT: f64 = 50.0;

/// Headroom above the largest value.
pub const Y_HEADROOM: f64 = 1.1;

pub const MAX_X_TICKS: usize = 12;
pub const Y_TICKS: usize = 5;

/// Continuous linear mapping from a domain onto a range.
///
/// A zero-width domain maps everything to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span != 0.0 { (v - d0) / span } else { 0.5 };
        r0 + t * (r1 - r0)
    }
}

/// A point placed in plot coordinates (origin at the inner top-left).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: CalendarMonth,
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub label: String,
    pub pos: f64,
}

/// Render-ready line chart of one platform.
#[derive(Debug, Clone, Serialize)]
pub struct LineChartView {
    pub title: String,
    pub platform: String,
    pub width: f64,
    pub height: f64,
    pub plot_width: f64,
    pub plot_height: f64,
    pub points: Vec<ChartPoint>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    /// Index into `points` of the point under the pointer.
    pub hovered: Option<usize>,
}

fn day_offset(month: &CalendarMonth, origin: &CalendarMonth) -> f64 {
    (month.first_day() - origin.first_day()).num_days() as f64
}

impl LineChartView {
    pub fn build(platform: &str, series: &[TimeSeriesPoint], width: f64, height: f64) -> Self {
        let plot_width = (width - MARGIN_LEFT - MARGIN_RIGHT).max(0.0);
        let plot_height = (height - MARGIN_TOP - MARGIN_BOTTOM).max(0.0);

        let (first, last) = match (series.first(), series.last()) {
            (Some(f), Some(l)) => (f.date, l.date),
            _ => {
                return Self {
                    title: title(platform, series),
                    platform: platform.to_string(),
                    width,
                    height,
                    plot_width,
                    plot_height,
                    points: Vec::new(),
                    x_ticks: Vec::new(),
                    y_ticks: Vec::new(),
                    hovered: None,
                }
            }
        };

        let x = LinearScale::new((0.0, day_offset(&last, &first)), (0.0, plot_width));
        let max = series.iter().map(|p| p.value).fold(f64::MIN, f64::max);
        let y_max = max * Y_HEADROOM;
        let y = LinearScale::new((0.0, y_max), (plot_height, 0.0));

        let points: Vec<ChartPoint> = series
            .iter()
            .map(|p| ChartPoint {
                date: p.date,
                value: p.value,
                x: x.apply(day_offset(&p.date, &first)),
                y: y.apply(p.value),
            })
            .collect();

        let stride = points.len().div_ceil(MAX_X_TICKS).max(1);
        let x_ticks = points
            .iter()
            .step_by(stride)
            .map(|p| Tick {
                label: p.date.first_day().format("%b %Y").to_string(),
                pos: p.x,
            })
            .collect();

        let y_ticks = (0..=Y_TICKS)
            .map(|i| {
                let v = y_max * i as f64 / Y_TICKS as f64;
                Tick {
                    label: format!("{v:.1}"),
                    pos: y.apply(v),
                }
            })
            .collect();

        Self {
            title: title(platform, series),
            platform: platform.to_string(),
            width,
            height,
            plot_width,
            plot_height,
            points,
            x_ticks,
            y_ticks,
            hovered: None,
        }
    }

    /// Nearest point within `radius` of a pointer given in chart
    /// coordinates (margins included).
    pub fn point_near(&self, x: f64, y: f64, radius: f64) -> Option<usize> {
        let (px, py) = (x - MARGIN_LEFT, y - MARGIN_TOP);
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, (p.x - px).hypot(p.y - py)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

fn title(platform: &str, series: &[TimeSeriesPoint]) -> String {
    match (series.first(), series.last()) {
        (Some(f), Some(l)) if f.date.year() == l.date.year() => {
            format!("{platform} Share Growth ({})", f.date.year())
        }
        (Some(f), Some(l)) => {
            format!("{platform} Share Growth ({}-{})", f.date.year(), l.date.year())
        }
        _ => format!("{platform} Share Growth"),
    }
}
