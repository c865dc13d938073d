use serde::Serialize;

/// Target aspect ratio of squarified rows.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Axis-aligned rectangle, `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
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

    /// Half-open containment, so a point on a shared edge hits one cell.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// True when the interiors intersect; touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    /// Move every edge inwards by `p`, collapsing to the midline if the
    /// rectangle is too small.
    pub fn inset(&self, p: f64) -> Rect {
        let (mut x0, mut y0, mut x1, mut y1) = (self.x0 + p, self.y0 + p, self.x1 - p, self.y1 - p);
        if x1 < x0 {
            x0 = (x0 + x1) / 2.0;
            x1 = x0;
        }
        if y1 < y0 {
            y0 = (y0 + y1) / 2.0;
            y1 = y0;
        }
        Rect { x0, y0, x1, y1 }
    }

    /// Snap every edge to the nearest integer.
    pub fn rounded(&self) -> Rect {
        Rect {
            x0: self.x0.round(),
            y0: self.y0.round(),
            x1: self.x1.round(),
            y1: self.y1.round(),
        }
    }
}

/// Tile `bounds` with one rectangle per value, area proportional to value.
///
/// Values must already be in the order they should be placed (largest
/// first gives the best aspect ratios). The output is index-aligned with
/// `values` and partitions `bounds` exactly.
pub fn squarify(values: &[f64], bounds: Rect) -> Vec<Rect> {
    squarify_ratio(GOLDEN_RATIO, values, bounds)
}

pub fn squarify_ratio(ratio: f64, values: &[f64], bounds: Rect) -> Vec<Rect> {
    let n = values.len();
    let mut out = vec![Rect::default(); n];
    let mut remaining: f64 = values.iter().sum();
    let (mut x0, mut y0, x1, y1) = (bounds.x0, bounds.y0, bounds.x1, bounds.y1);

    let mut i0 = 0;
    let mut i1 = 0;
    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // skip leading zero-valued cells so the row starts non-empty
        let mut sum = values[i1];
        i1 += 1;
        while sum == 0.0 && i1 < n {
            sum = values[i1];
            i1 += 1;
        }
        let mut min = sum;
        let mut max = sum;
        let alpha = (dy / dx).max(dx / dy) / (remaining * ratio);
        let mut beta = sum * sum * alpha;
        let mut min_ratio = (max / beta).max(beta / min);

        // grow the row while the worst aspect ratio does not get worse
        while i1 < n {
            let v = values[i1];
            let candidate = sum + v;
            let cmin = min.min(v);
            let cmax = max.max(v);
            beta = candidate * candidate * alpha;
            let new_ratio = (cmax / beta).max(beta / cmin);
            if new_ratio > min_ratio {
                break;
            }
            sum = candidate;
            min = cmin;
            max = cmax;
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = &values[i0..i1];
        if dx < dy {
            let y_end = if remaining > 0.0 { y0 + dy * sum / remaining } else { y1 };
            dice(row, Rect::new(x0, y0, x1, y_end), &mut out[i0..i1]);
            y0 = y_end;
        } else {
            let x_end = if remaining > 0.0 { x0 + dx * sum / remaining } else { x1 };
            slice(row, Rect::new(x0, y0, x_end, y1), &mut out[i0..i1]);
            x0 = x_end;
        }
        remaining -= sum;
        i0 = i1;
    }

    out
}

/// Lay a row out left to right across `bounds`.
fn dice(row: &[f64], bounds: Rect, out: &mut [Rect]) {
    let total: f64 = row.iter().sum();
    let k = if total > 0.0 { bounds.width() / total } else { 0.0 };
    let mut x = bounds.x0;
    for (v, cell) in row.iter().zip(out.iter_mut()) {
        let next = x + v * k;
        *cell = Rect::new(x, bounds.y0, next, bounds.y1);
        x = next;
    }
}

/// Lay a row out top to bottom down `bounds`.
fn slice(row: &[f64], bounds: Rect, out: &mut [Rect]) {
    let total: f64 = row.iter().sum();
    let k = if total > 0.0 { bounds.height() / total } else { 0.0 };
    let mut y = bounds.y0;
    for (v, cell) in row.iter().zip(out.iter_mut()) {
        let next = y + v * k;
        *cell = Rect::new(bounds.x0, y, bounds.x1, next);
        y = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partition(values: &[f64], bounds: Rect) {
        let cells = squarify(values, bounds);
        assert_eq!(cells.len(), values.len());
        let total: f64 = values.iter().sum();
        let area: f64 = cells.iter().map(Rect::area).sum();
        assert!((area - bounds.area()).abs() < 1e-6, "area {area} vs {}", bounds.area());
        for (cell, v) in cells.iter().zip(values) {
            let expected = bounds.area() * v / total;
            assert!((cell.area() - expected).abs() < 1e-6);
            assert!(cell.x0 >= bounds.x0 - 1e-9 && cell.x1 <= bounds.x1 + 1e-9);
            assert!(cell.y0 >= bounds.y0 - 1e-9 && cell.y1 <= bounds.y1 + 1e-9);
        }
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                let shrunk = a.inset(1e-6);
                assert!(!shrunk.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn single_value_fills_bounds() {
        let bounds = Rect::new(0.0, 0.0, 300.0, 120.0);
        assert_eq!(squarify(&[42.0], bounds), vec![bounds]);
    }

    #[test]
    fn partitions_wide_canvas() {
        assert_partition(
            &[41.0, 22.5, 13.0, 9.0, 6.0, 4.5, 2.0, 1.5, 0.4, 0.1],
            Rect::new(0.0, 0.0, 960.0, 384.0),
        );
    }

    #[test]
    fn partitions_tall_canvas() {
        assert_partition(&[6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0], Rect::new(0.0, 0.0, 60.0, 400.0));
    }

    #[test]
    fn partitions_offset_bounds() {
        assert_partition(&[50.0, 30.0, 20.0], Rect::new(0.5, 0.5, 799.5, 319.5));
    }

    #[test]
    fn classic_squarify_example() {
        // Bruls et al. 6x4 example: the first row holds the two sixes.
        let cells = squarify_ratio(1.0, &[6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0], Rect::new(0.0, 0.0, 6.0, 4.0));
        let close = |a: Rect, b: Rect| {
            (a.x0 - b.x0).abs() < 1e-9
                && (a.y0 - b.y0).abs() < 1e-9
                && (a.x1 - b.x1).abs() < 1e-9
                && (a.y1 - b.y1).abs() < 1e-9
        };
        assert!(close(cells[0], Rect::new(0.0, 0.0, 3.0, 2.0)), "{:?}", cells[0]);
        assert!(close(cells[1], Rect::new(0.0, 2.0, 3.0, 4.0)), "{:?}", cells[1]);
    }

    #[test]
    fn inset_collapses_small_rects() {
        let r = Rect::new(0.0, 0.0, 1.0, 10.0).inset(1.0);
        assert_eq!(r.width(), 0.0);
        assert_eq!(r.x0, 0.5);
        assert_eq!(r.height(), 8.0);
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(0.0, 0.0));
        assert!(!r.contains(10.0, 5.0));
    }
}
