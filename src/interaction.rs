use serde::Serialize;

use crate::series::chart::ChartPoint;
use crate::treemap::{self, TreemapLeaf};

/// Distance from the pointer to the tooltip's top-left corner.
pub const TOOLTIP_OFFSET: f64 = 10.0;

/// The user's current choices. `platform` gates the line chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub year: Option<String>,
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub text: String,
    pub anchor: Point,
}

/// What the pointer is currently over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Hover {
    Leaf(String),
    Point(usize),
}

/// Hover and click state for both charts. Pure state, no side effects.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    tooltip: Option<Tooltip>,
    hover: Option<Hover>,
}

fn anchor_for(pointer: Point) -> Point {
    Point::new(pointer.x + TOOLTIP_OFFSET, pointer.y + TOOLTIP_OFFSET)
}

impl InteractionController {
    pub fn hover_leaf(&mut self, leaf: &TreemapLeaf, pointer: Point) {
        self.tooltip = Some(Tooltip {
            text: format!("{}\n{:.2}%", leaf.name, leaf.value),
            anchor: anchor_for(pointer),
        });
        self.hover = Some(Hover::Leaf(leaf.name.clone()));
    }

    pub fn hover_point(&mut self, index: usize, point: &ChartPoint, pointer: Point) {
        self.tooltip = Some(Tooltip {
            text: format!("{}\n{:.2}%", point.date, point.value),
            anchor: anchor_for(pointer),
        });
        self.hover = Some(Hover::Point(index));
    }

    /// Follow the pointer while something is hovered.
    pub fn pointer_move(&mut self, pointer: Point) {
        if let Some(tip) = self.tooltip.as_mut() {
            tip.anchor = anchor_for(pointer);
        }
    }

    pub fn leave(&mut self) {
        self.tooltip = None;
        self.hover = None;
    }

    pub fn click_leaf(&mut self, leaf: &TreemapLeaf, selection: &mut Selection) {
        treemap::select(selection, &leaf.name);
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn hover(&self) -> Option<&Hover> {
        self.hover.as_ref()
    }

    pub fn hovered_point(&self) -> Option<usize> {
        match self.hover {
            Some(Hover::Point(i)) => Some(i),
            _ => None,
        }
    }
}
