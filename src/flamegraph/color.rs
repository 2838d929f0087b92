//! Deterministic frame colors.
//!
//! A color depends only on the frame's identity and its heat ratio, so
//! re-running on unchanged input reproduces byte-identical output.

use crate::parser::Frame;
use crate::utils::config::SEPARATOR_FRAMES;
use log::debug;
use rustc_hash::FxHasher;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An sRGB color, displayed as `rgb(r,g,b)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Color of the root frame
pub const ROOT_COLOR: Rgb = Rgb::new(250, 250, 250);

/// Color of `-` / `--` separator frames
pub const SEPARATOR_COLOR: Rgb = Rgb::new(240, 240, 240);

/// Available color schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    /// Red-orange-yellow hues, greener for shallow frames
    #[default]
    Hot,
}

impl ColorScheme {
    /// Look up a scheme by name, falling back to `hot`
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "hot" => ColorScheme::Hot,
            other => {
                debug!("Unknown color scheme '{}', using hot", other);
                ColorScheme::Hot
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorScheme::Hot => "hot",
        }
    }

    /// Color for `frame` (`None` is the root) at `heat` in `[0, 1]`
    pub fn color(&self, frame: Option<&Frame<'_>>, heat: f64) -> Rgb {
        let Some(frame) = frame else {
            return ROOT_COLOR;
        };

        if SEPARATOR_FRAMES.contains(&frame.name()) {
            return SEPARATOR_COLOR;
        }

        match self {
            ColorScheme::Hot => hot(frame, heat),
        }
    }
}

fn hot(frame: &Frame<'_>, heat: f64) -> Rgb {
    let heat = if heat.is_finite() {
        heat.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let mut hasher = FxHasher::default();
    frame.name().hash(&mut hasher);
    frame.is_function().hash(&mut hasher);
    frame.already_bracketed().hash(&mut hasher);
    heat.to_bits().hash(&mut hasher);
    let hash = hasher.finish();

    let v1 = (hash & 0xFF) as f64 / 255.0;
    let v2 = ((hash >> 8) & 0xFF) as f64 / 255.0;
    let v3 = ((hash >> 16) & 0xFF) as f64 / 255.0;

    Rgb {
        r: (205.0 + 50.0 * v3) as u8,
        g: (230.0 * v1 * (1.0 - 0.3 * heat)) as u8,
        b: (55.0 * v2) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_colors() {
        let scheme = ColorScheme::Hot;
        assert_eq!(scheme.color(None, 0.0), ROOT_COLOR);
        assert_eq!(scheme.color(Some(&Frame::function("--")), 0.5), SEPARATOR_COLOR);
        assert_eq!(scheme.color(Some(&Frame::function("-")), 0.5), SEPARATOR_COLOR);
        assert_eq!(ROOT_COLOR.to_string(), "rgb(250,250,250)");
    }

    #[test]
    fn test_hot_is_deterministic_and_in_range() {
        let scheme = ColorScheme::from_name("hot");
        for (name, heat) in [("main", 0.0), ("malloc", 0.5), ("deep", 1.0)] {
            let frame = Frame::function(name);
            let first = scheme.color(Some(&frame), heat);
            let second = scheme.color(Some(&frame), heat);

            assert_eq!(first, second);
            assert!(first.r >= 205);
            assert!(first.g <= 230);
            assert!(first.b <= 55);
        }
    }

    #[test]
    fn test_color_depends_on_frame_kind() {
        let scheme = ColorScheme::Hot;
        let as_function = scheme.color(Some(&Frame::function("libc.so")), 0.25);
        let as_module = scheme.color(Some(&Frame::module("libc.so")), 0.25);

        assert_ne!(as_function, as_module);
    }

    #[test]
    fn test_unknown_scheme_falls_back_to_hot() {
        assert_eq!(ColorScheme::from_name("aqua"), ColorScheme::Hot);
        assert_eq!(ColorScheme::from_name("HOT").name(), "hot");
    }

    #[test]
    fn test_serializes_as_css_string() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"rgb(1,2,3)\"");
    }
}
