use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// d3's default darken step; `brighter(k)` scales channels by `(1 / 0.7)^k`.
const DARKER: f64 = 0.7;

/// An sRGB colour with unclamped channels; clamping happens on output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn brighter(&self, k: f64) -> Self {
        let f = (1.0 / DARKER).powf(k);
        Self::new(self.r * f, self.g * f, self.b * f)
    }

    pub fn hex(&self) -> String {
        let c = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        format!("#{:02x}{:02x}{:02x}", c(self.r), c(self.g), c(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Tableau 10.
pub const TABLEAU10: [Rgb; 10] = [
    Rgb::new(78.0, 121.0, 167.0),
    Rgb::new(242.0, 142.0, 44.0),
    Rgb::new(225.0, 87.0, 89.0),
    Rgb::new(118.0, 183.0, 178.0),
    Rgb::new(89.0, 161.0, 79.0),
    Rgb::new(237.0, 201.0, 73.0),
    Rgb::new(175.0, 122.0, 161.0),
    Rgb::new(255.0, 157.0, 167.0),
    Rgb::new(156.0, 117.0, 95.0),
    Rgb::new(186.0, 176.0, 171.0),
];

/// Ordinal colour scale keyed by the alphabetical list of platform names,
/// so a platform keeps its colour however the values reorder it.
#[derive(Debug, Clone, Default)]
pub struct ColorScale {
    names: Vec<String>,
}

impl ColorScale {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let names = names
            .into_iter()
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self { names }
    }

    /// Names outside the domain take the slot they would sort into.
    pub fn color(&self, name: &str) -> Rgb {
        let idx = match self.names.binary_search_by(|n| n.as_str().cmp(name)) {
            Ok(i) | Err(i) => i,
        };
        TABLEAU10[idx % TABLEAU10.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(TABLEAU10[0].hex(), "#4e79a7");
        assert_eq!(Rgb::new(300.0, -4.0, 15.4).hex(), "#ff000f");
    }

    #[test]
    fn brighter_matches_d3() {
        // d3.color("#4e79a7").brighter(0.5) == rgb(93, 145, 200)
        assert_eq!(TABLEAU10[0].brighter(0.5).hex(), "#5d91c8");
    }

    #[test]
    fn colour_ignores_input_order() {
        let a = ColorScale::new(["Twitter", "Facebook", "Pinterest"]);
        let b = ColorScale::new(["Pinterest", "Twitter", "Facebook", "Facebook"]);
        for name in ["Facebook", "Pinterest", "Twitter"] {
            assert_eq!(a.color(name), b.color(name));
        }
        assert_eq!(a.color("Facebook"), TABLEAU10[0]);
        assert_eq!(a.color("Twitter"), TABLEAU10[2]);
    }

    #[test]
    fn palette_wraps() {
        let names: Vec<String> = (0..12).map(|i| format!("p{i:02}")).collect();
        let scale = ColorScale::new(names.iter().map(String::as_str));
        assert_eq!(scale.color("p10"), TABLEAU10[0]);
    }
}
