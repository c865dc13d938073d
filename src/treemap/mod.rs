// src/treemap/mod.rs
pub mod color;
pub mod squarify;

use serde::Serialize;
use tracing::debug;

use crate::aggregate::Averages;
use crate::interaction::Selection;
use crate::table::utils::is_date_column;

pub use color::{ColorScale, Rgb, TABLEAU10};
pub use squarify::{squarify, Rect};

/// Leaves at or below this pixel area are drawn without a label.
pub const LABEL_MIN_AREA: f64 = 1500.0;

/// Brightening applied to the selected platform's fill.
pub const SELECTED_BRIGHTEN: f64 = 0.5;

pub const TREEMAP_TITLE: &str = "Social Media Platform Shares";

/// One platform's cell in the laid-out treemap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapLeaf {
    pub name: String,
    pub value: f64,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl TreemapLeaf {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x0, self.y0, self.x1, self.y1)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Label for this leaf, or `None` if the cell is too small to hold one.
    pub fn label(&self) -> Option<LeafLabel> {
        if self.area() <= LABEL_MIN_AREA {
            return None;
        }
        let font_size = (self.width() / 10.0).min(self.height() / 5.0);
        let cx = self.x0 + self.width() / 2.0;
        let cy = self.y0 + self.height() / 2.0;
        Some(LeafLabel {
            name: self.name.clone(),
            percent: format!("{:.2}%", self.value),
            x: cx,
            y: cy,
            font_size,
            percent_y: cy + font_size,
            percent_font_size: font_size * 0.8,
        })
    }
}

/// Text drawn centred in a leaf: the platform name with its share below.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafLabel {
    pub name: String,
    pub percent: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub percent_y: f64,
    pub percent_font_size: f64,
}

/// Layout parameters. The default matches the dashboard: 1px padding and
/// integer edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreemapLayout {
    pub padding: f64,
    pub round: bool,
}

impl Default for TreemapLayout {
    fn default() -> Self {
        Self {
            padding: 1.0,
            round: true,
        }
    }
}

impl TreemapLayout {
    /// Lay the positive averages out over a `width` × `height` canvas,
    /// largest first.
    pub fn layout(&self, averages: &Averages, width: f64, height: f64) -> Vec<TreemapLeaf> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Vec::new();
        }
        let entries = positive_entries(averages);
        if entries.is_empty() {
            return Vec::new();
        }

        // outer padding on the canvas, then half the inner padding on
        // each leaf so neighbours are one full padding apart
        let half = self.padding / 2.0;
        let bounds = Rect::new(0.0, 0.0, width, height).inset(self.padding - half);
        let values: Vec<f64> = entries.iter().map(|(_, v)| *v).collect();
        let tiles = squarify(&values, bounds);

        entries
            .into_iter()
            .zip(tiles)
            .map(|((name, value), tile)| {
                let mut r = tile.inset(half);
                if self.round {
                    r = r.rounded();
                }
                TreemapLeaf {
                    name: name.to_string(),
                    value,
                    x0: r.x0,
                    y0: r.y0,
                    x1: r.x1,
                    y1: r.y1,
                }
            })
            .collect()
    }
}

/// Lay out with the default padding and rounding.
pub fn layout(averages: &Averages, width: f64, height: f64) -> Vec<TreemapLeaf> {
    TreemapLayout::default().layout(averages, width, height)
}

/// Platforms worth drawing: no date column, finite and strictly positive,
/// sorted descending with ties left in column order.
fn positive_entries(averages: &Averages) -> Vec<(&str, f64)> {
    let mut entries: Vec<(&str, f64)> = averages
        .iter()
        .filter(|a| !is_date_column(&a.platform))
        .filter(|a| a.mean_share_percent.is_finite() && a.mean_share_percent > 0.0)
        .map(|a| (a.platform.as_str(), a.mean_share_percent))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    debug!(
        kept = entries.len(),
        dropped = averages.len() - entries.len(),
        "treemap entries"
    );
    entries
}

/// Make `platform` the selected one. Selecting the current platform again
/// keeps it selected.
pub fn select(selection: &mut Selection, platform: &str) {
    selection.platform = Some(platform.to_string());
}

/// A leaf together with what the renderer needs to draw it.
#[derive(Debug, Clone, Serialize)]
pub struct TreemapCell {
    #[serde(flatten)]
    pub leaf: TreemapLeaf,
    pub fill: Rgb,
    pub selected: bool,
    pub label: Option<LeafLabel>,
}

/// Render-ready treemap.
#[derive(Debug, Clone, Serialize)]
pub struct TreemapView {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub cells: Vec<TreemapCell>,
}

impl TreemapView {
    pub fn build(averages: &Averages, width: f64, height: f64, selected: Option<&str>) -> Self {
        // colour domain is every platform column, so zero-share years
        // don't shift anybody's colour
        let colors = ColorScale::new(
            averages
                .iter()
                .map(|a| a.platform.as_str())
                .filter(|p| !is_date_column(p)),
        );
        let cells = layout(averages, width, height)
            .into_iter()
            .map(|leaf| {
                let is_selected = selected == Some(leaf.name.as_str());
                let base = colors.color(&leaf.name);
                TreemapCell {
                    fill: if is_selected {
                        base.brighter(SELECTED_BRIGHTEN)
                    } else {
                        base
                    },
                    selected: is_selected,
                    label: leaf.label(),
                    leaf,
                }
            })
            .collect();
        Self {
            title: TREEMAP_TITLE.to_string(),
            width,
            height,
            cells,
        }
    }

    pub fn leaves(&self) -> impl Iterator<Item = &TreemapLeaf> {
        self.cells.iter().map(|c| &c.leaf)
    }

    /// Leaf under the pointer; gutters between leaves hit nothing.
    pub fn leaf_at(&self, x: f64, y: f64) -> Option<&TreemapLeaf> {
        self.leaves().find(|l| l.rect().contains(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avg(pairs: &[(&str, f64)]) -> Averages {
        pairs.iter().map(|(n, v)| (*n, *v)).collect()
    }

    fn assert_disjoint(leaves: &[TreemapLeaf]) {
        for (i, a) in leaves.iter().enumerate() {
            for b in &leaves[i + 1..] {
                assert!(!a.rect().overlaps(&b.rect()), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn zero_share_is_excluded() {
        let leaves = layout(&avg(&[("A", 0.0), ("B", 50.0), ("C", 50.0)]), 800.0, 320.0);
        assert_eq!(leaves.len(), 2);
        assert!(leaves.iter().all(|l| l.name != "A"));
        // equal values keep column order
        assert_eq!(leaves[0].name, "B");
        assert_eq!(leaves[1].name, "C");
    }

    #[test]
    fn drops_date_and_non_finite() {
        let leaves = layout(
            &avg(&[("Date", 5.0), ("\"Date\"", 5.0), ("X", f64::NAN), ("Y", -2.0), ("Z", 1.0)]),
            400.0,
            160.0,
        );
        let names: Vec<_> = leaves.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Z"]);
    }

    #[test]
    fn sorted_descending() {
        let leaves = layout(&avg(&[("Small", 1.0), ("Big", 70.0), ("Mid", 29.0)]), 960.0, 384.0);
        let names: Vec<_> = leaves.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Big", "Mid", "Small"]);
    }

    #[test]
    fn unpadded_layout_partitions_canvas_exactly() {
        let averages = avg(&[
            ("Facebook", 64.0),
            ("Pinterest", 12.0),
            ("Twitter", 10.0),
            ("StumbleUpon", 8.0),
            ("YouTube", 4.0),
            ("Reddit", 2.0),
        ]);
        let layout = TreemapLayout {
            padding: 0.0,
            round: true,
        };
        let leaves = layout.layout(&averages, 800.0, 320.0);
        let area: f64 = leaves.iter().map(TreemapLeaf::area).sum();
        assert_eq!(area, 800.0 * 320.0);
        assert_disjoint(&leaves);
    }

    #[test]
    fn padded_layout_stays_inside_canvas() {
        let averages = avg(&[
            ("Facebook", 71.3),
            ("Twitter", 11.9),
            ("Pinterest", 7.2),
            ("StumbleUpon", 5.5),
            ("YouTube", 1.8),
            ("Tumblr", 1.1),
            ("reddit", 0.7),
            ("LinkedIn", 0.3),
            ("VKontakte", 0.15),
            ("Instagram", 0.05),
        ]);
        let leaves = layout(&averages, 960.0, 384.0);
        assert_eq!(leaves.len(), 10);
        assert_disjoint(&leaves);
        for l in &leaves {
            assert!(l.x0 >= 1.0 && l.y0 >= 1.0, "{l:?}");
            assert!(l.x1 <= 959.0 && l.y1 <= 383.0, "{l:?}");
            assert_eq!(l.x0, l.x0.round());
        }
        let area: f64 = leaves.iter().map(TreemapLeaf::area).sum();
        assert!(area <= 960.0 * 384.0);
        assert!(area > 0.9 * 960.0 * 384.0, "area {area}");
    }

    #[test]
    fn degenerate_canvas_yields_nothing() {
        let averages = avg(&[("A", 1.0)]);
        assert!(layout(&averages, 0.0, 100.0).is_empty());
        assert!(layout(&averages, 100.0, f64::NAN).is_empty());
        assert!(layout(&Averages::default(), 100.0, 100.0).is_empty());
    }

    #[test]
    fn labels_only_on_large_leaves() {
        let big = TreemapLeaf {
            name: "Facebook".into(),
            value: 64.123,
            x0: 0.0,
            y0: 0.0,
            x1: 100.0,
            y1: 50.0,
        };
        let label = big.label().unwrap();
        assert_eq!(label.percent, "64.12%");
        assert_eq!(label.font_size, 10.0);
        assert_eq!((label.x, label.y), (50.0, 25.0));
        assert_eq!(label.percent_y, 35.0);

        let edge = TreemapLeaf { x1: 30.0, ..big.clone() };
        assert_eq!(edge.area(), 1500.0);
        assert!(edge.label().is_none());
    }

    #[test]
    fn select_is_idempotent() {
        let mut selection = Selection::default();
        select(&mut selection, "Twitter");
        select(&mut selection, "Twitter");
        assert_eq!(selection.platform.as_deref(), Some("Twitter"));
        select(&mut selection, "Facebook");
        assert_eq!(selection.platform.as_deref(), Some("Facebook"));
    }

    #[test]
    fn view_brightens_selected_and_keeps_colours() {
        let averages = avg(&[("Twitter", 30.0), ("Facebook", 60.0), ("Pinterest", 10.0)]);
        let view = TreemapView::build(&averages, 800.0, 320.0, Some("Twitter"));
        let twitter = view.cells.iter().find(|c| c.leaf.name == "Twitter").unwrap();
        assert!(twitter.selected);
        assert_eq!(twitter.fill, TABLEAU10[2].brighter(SELECTED_BRIGHTEN));
        let facebook = view.cells.iter().find(|c| c.leaf.name == "Facebook").unwrap();
        assert_eq!(facebook.fill, TABLEAU10[0]);
        assert!(!facebook.selected);
    }

    #[test]
    fn hit_testing() {
        let view = TreemapView::build(&avg(&[("A", 75.0), ("B", 25.0)]), 400.0, 100.0, None);
        let a = view.leaf_at(10.0, 10.0).unwrap();
        assert_eq!(a.name, "A");
        assert!(view.leaf_at(0.0, 0.0).is_none());
        assert!(view.leaf_at(399.5, 50.0).is_none());
    }
}
