//! SVG serialisation of the chart views.
//!
//! Rendering is a pure function of a view; nothing here touches state.

use std::fmt::{self, Display, Write};

use crate::series::chart::{ChartPoint, LineChartView, MARGIN_LEFT, MARGIN_TOP};
use crate::treemap::TreemapView;

pub const BACKGROUND: &str = "#f5f5f5";
pub const LINE_COLOR: &str = "#1877f2";
pub const GRID_COLOR: &str = "#e0e0e0";
pub const DOT_RADIUS: f64 = 5.0;
pub const HOVER_DOT_RADIUS: f64 = 8.0;

/// Escape text for use in XML content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn open_svg(f: &mut impl Write, width: f64, height: f64, title: &str) -> fmt::Result {
    writeln!(
        f,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}" style="background:{BACKGROUND}">"#
    )?;
    writeln!(f, "<title>{}</title>", escape(title))
}

/// `Display` adapter: `TreemapSvg(&view).to_string()` is the document.
pub struct TreemapSvg<'a>(pub &'a TreemapView);

impl Display for TreemapSvg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        open_svg(f, view.width, view.height, &view.title)?;
        for cell in &view.cells {
            let leaf = &cell.leaf;
            writeln!(
                f,
                r#"<g transform="translate({},{})" data-platform="{}">"#,
                leaf.x0,
                leaf.y0,
                escape(&leaf.name)
            )?;
            writeln!(
                f,
                r##"<rect width="{}" height="{}" fill="{}" stroke="#fff" stroke-width="1"/>"##,
                leaf.width(),
                leaf.height(),
                cell.fill
            )?;
            if let Some(label) = &cell.label {
                let (lx, ly) = (label.x - leaf.x0, label.y - leaf.y0);
                writeln!(
                    f,
                    r##"<text x="{lx:.2}" y="{ly:.2}" text-anchor="middle" dominant-baseline="middle" font-size="{:.2}px" fill="#fff">{}</text>"##,
                    label.font_size,
                    escape(&label.name)
                )?;
                writeln!(
                    f,
                    r##"<text x="{lx:.2}" y="{:.2}" text-anchor="middle" font-size="{:.2}px" fill="#fff">{}</text>"##,
                    label.percent_y - leaf.y0,
                    label.percent_font_size,
                    escape(&label.percent)
                )?;
            }
            writeln!(f, "</g>")?;
        }
        writeln!(f, "</svg>")
    }
}

pub fn treemap_svg(view: &TreemapView) -> String {
    TreemapSvg(view).to_string()
}

/// Monotone-in-x cubic path through `points` (Fritsch-Carlson tangents),
/// so the curve never overshoots between two months.
pub fn monotone_path(points: &[ChartPoint]) -> String {
    let mut d = String::new();
    let Some(first) = points.first() else {
        return d;
    };
    let _ = write!(d, "M{:.2},{:.2}", first.x, first.y);
    if points.len() == 1 {
        return d;
    }
    if points.len() == 2 {
        let _ = write!(d, "L{:.2},{:.2}", points[1].x, points[1].y);
        return d;
    }

    let n = points.len();
    let secant = |i: usize| -> f64 {
        let h = points[i + 1].x - points[i].x;
        if h == 0.0 {
            0.0
        } else {
            (points[i + 1].y - points[i].y) / h
        }
    };

    let mut tangents = vec![0.0_f64; n];
    for i in 1..n - 1 {
        let (h0, h1) = (points[i].x - points[i - 1].x, points[i + 1].x - points[i].x);
        let (s0, s1) = (secant(i - 1), secant(i));
        let p = if h0 + h1 == 0.0 { 0.0 } else { (s0 * h1 + s1 * h0) / (h0 + h1) };
        let t = (s0.signum() + s1.signum()) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
        tangents[i] = if t.is_finite() && s0 != 0.0 && s1 != 0.0 { t } else { 0.0 };
    }
    // one-sided tangents at the ends
    let end_tangent = |i: usize, inner: f64| -> f64 {
        let h = points[i + 1].x - points[i].x;
        if h == 0.0 {
            inner
        } else {
            (3.0 * (points[i + 1].y - points[i].y) / h - inner) / 2.0
        }
    };
    tangents[0] = end_tangent(0, tangents[1]);
    tangents[n - 1] = end_tangent(n - 2, tangents[n - 2]);

    for i in 0..n - 1 {
        let (a, b) = (&points[i], &points[i + 1]);
        let dx = (b.x - a.x) / 3.0;
        let _ = write!(
            d,
            "C{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            a.x + dx,
            a.y + dx * tangents[i],
            b.x - dx,
            b.y - dx * tangents[i + 1],
            b.x,
            b.y
        );
    }
    d
}

/// `Display` adapter for the line chart document.
pub struct LineChartSvg<'a>(pub &'a LineChartView);

impl Display for LineChartSvg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        open_svg(f, view.width, view.height, &view.title)?;
        writeln!(f, r#"<g transform="translate({MARGIN_LEFT},{MARGIN_TOP})">"#)?;

        for tick in &view.y_ticks {
            writeln!(
                f,
                r#"<line x1="0" x2="{:.2}" y1="{:.2}" y2="{:.2}" stroke="{GRID_COLOR}" stroke-dasharray="2,2"/>"#,
                view.plot_width, tick.pos, tick.pos
            )?;
            writeln!(
                f,
                r#"<text x="-6" y="{:.2}" text-anchor="end" dominant-baseline="middle" font-size="10">{}</text>"#,
                tick.pos,
                escape(&tick.label)
            )?;
        }

        writeln!(
            f,
            r#"<line x1="0" x2="{w:.2}" y1="{h:.2}" y2="{h:.2}" stroke="currentColor"/>"#,
            w = view.plot_width,
            h = view.plot_height
        )?;
        writeln!(
            f,
            r#"<line x1="0" x2="0" y1="0" y2="{:.2}" stroke="currentColor"/>"#,
            view.plot_height
        )?;
        for tick in &view.x_ticks {
            writeln!(
                f,
                r#"<text transform="translate({:.2},{:.2}) rotate(-45)" text-anchor="end" dx="-.8em" dy=".15em" font-size="10">{}</text>"#,
                tick.pos,
                view.plot_height + 9.0,
                escape(&tick.label)
            )?;
        }

        if !view.points.is_empty() {
            writeln!(
                f,
                r#"<path d="{}" fill="none" stroke="{LINE_COLOR}" stroke-width="3"/>"#,
                monotone_path(&view.points)
            )?;
        }

        for (i, p) in view.points.iter().enumerate() {
            if view.hovered == Some(i) {
                writeln!(
                    f,
                    r##"<circle cx="{:.2}" cy="{:.2}" r="{HOVER_DOT_RADIUS}" fill="#fff" stroke="{LINE_COLOR}" stroke-width="3"/>"##,
                    p.x, p.y
                )?;
            } else {
                writeln!(
                    f,
                    r##"<circle cx="{:.2}" cy="{:.2}" r="{DOT_RADIUS}" fill="{LINE_COLOR}" stroke="#fff" stroke-width="2"/>"##,
                    p.x, p.y
                )?;
            }
        }

        writeln!(f, "</g>")?;
        writeln!(f, "</svg>")
    }
}

pub fn line_chart_svg(view: &LineChartView) -> String {
    LineChartSvg(view).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Averages;
    use crate::series::TimeSeriesPoint;
    use crate::table::CalendarMonth;

    fn chart(values: &[(&str, f64)]) -> LineChartView {
        let series: Vec<_> = values
            .iter()
            .map(|(d, v)| TimeSeriesPoint {
                date: CalendarMonth::parse(d).unwrap(),
                value: *v,
            })
            .collect();
        LineChartView::build("Face<book>", &series, 960.0, 384.0)
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn treemap_labels_only_large_cells() {
        let averages: Averages = [("Big", 95.0), ("Tiny", 0.1)].into_iter().collect();
        let view = TreemapView::build(&averages, 800.0, 320.0, Some("Tiny"));
        let svg = treemap_svg(&view);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains(">Big</text>"));
        assert!(svg.contains(">95.00%</text>"));
        assert!(!svg.contains(">Tiny</text>"));
        assert!(svg.contains(r#"data-platform="Tiny""#));
    }

    #[test]
    fn line_chart_draws_every_point() {
        let mut view = chart(&[("2010-01", 10.0), ("2010-02", 12.0), ("2010-03", 11.0)]);
        view.hovered = Some(2);
        let svg = line_chart_svg(&view);
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches(r#"r="8""#).count(), 1);
        assert!(svg.contains("Face&lt;book&gt; Share Growth"));
        assert!(svg.contains("stroke-dasharray=\"2,2\""));
    }

    #[test]
    fn monotone_path_hits_every_point() {
        let view = chart(&[
            ("2010-01", 10.0),
            ("2010-02", 30.0),
            ("2010-03", 30.0),
            ("2010-04", 5.0),
        ]);
        let d = monotone_path(&view.points);
        assert!(d.starts_with('M'));
        assert_eq!(d.matches('C').count(), 3);
        let last = view.points.last().unwrap();
        assert!(d.ends_with(&format!("{:.2},{:.2}", last.x, last.y)));
    }

    #[test]
    fn flat_neighbour_gets_flat_tangent() {
        // a local maximum must not overshoot: control points stay at its height
        let view = chart(&[("2010-01", 10.0), ("2010-02", 30.0), ("2010-03", 10.0)]);
        let d = monotone_path(&view.points);
        let peak = &view.points[1];
        assert!(d.contains(&format!("{:.2},{:.2},{:.2},{:.2}", peak.x - (peak.x - view.points[0].x) / 3.0, peak.y, peak.x, peak.y)));
    }

    #[test]
    fn empty_chart_has_no_path() {
        let svg = line_chart_svg(&chart(&[]));
        assert!(!svg.contains("<path"));
        assert!(svg.ends_with("</svg>\n"));
    }
}
