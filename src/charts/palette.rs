//! Color Palette Module
//! Sequential color themes for value scales and the fixed donut color pairs.

use egui::Color32;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// Color used for regions or cells without a value.
pub const NO_DATA_COLOR: [u8; 3] = [210, 210, 210];

/// Sequential color scheme selectable in the sidebar.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Blues,
    Cividis,
    Greens,
    Inferno,
    Magma,
    Plasma,
    Reds,
    Rainbow,
    Turbo,
    Viridis,
}

impl ColorTheme {
    pub const ALL: [ColorTheme; 10] = [
        ColorTheme::Blues,
        ColorTheme::Cividis,
        ColorTheme::Greens,
        ColorTheme::Inferno,
        ColorTheme::Magma,
        ColorTheme::Plasma,
        ColorTheme::Reds,
        ColorTheme::Rainbow,
        ColorTheme::Turbo,
        ColorTheme::Viridis,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorTheme::Blues => "blues",
            ColorTheme::Cividis => "cividis",
            ColorTheme::Greens => "greens",
            ColorTheme::Inferno => "inferno",
            ColorTheme::Magma => "magma",
            ColorTheme::Plasma => "plasma",
            ColorTheme::Reds => "reds",
            ColorTheme::Rainbow => "rainbow",
            ColorTheme::Turbo => "turbo",
            ColorTheme::Viridis => "viridis",
        }
    }

    /// Evenly spaced anchor colors, low to high.
    fn stops(self) -> &'static [[u8; 3]] {
        match self {
            ColorTheme::Blues => &[
                [247, 251, 255],
                [198, 219, 239],
                [107, 174, 214],
                [33, 113, 181],
                [8, 48, 107],
            ],
            ColorTheme::Cividis => &[
                [0, 34, 78],
                [61, 78, 108],
                [124, 123, 120],
                [188, 175, 111],
                [254, 232, 56],
            ],
            ColorTheme::Greens => &[
                [247, 252, 245],
                [199, 233, 192],
                [116, 196, 118],
                [35, 139, 69],
                [0, 68, 27],
            ],
            ColorTheme::Inferno => &[
                [0, 0, 4],
                [87, 16, 110],
                [188, 55, 84],
                [249, 142, 9],
                [252, 255, 164],
            ],
            ColorTheme::Magma => &[
                [0, 0, 4],
                [81, 18, 124],
                [183, 55, 121],
                [252, 137, 97],
                [252, 253, 191],
            ],
            ColorTheme::Plasma => &[
                [13, 8, 135],
                [126, 3, 168],
                [204, 71, 120],
                [248, 149, 64],
                [240, 249, 33],
            ],
            ColorTheme::Reds => &[
                [255, 245, 240],
                [252, 187, 161],
                [251, 106, 74],
                [203, 24, 29],
                [103, 0, 13],
            ],
            ColorTheme::Rainbow => &[
                [110, 64, 170],
                [26, 120, 220],
                [26, 199, 194],
                [160, 230, 60],
                [255, 140, 56],
                [223, 64, 161],
            ],
            ColorTheme::Turbo => &[
                [48, 18, 59],
                [70, 134, 251],
                [26, 228, 182],
                [164, 252, 60],
                [251, 128, 34],
                [122, 4, 3],
            ],
            ColorTheme::Viridis => &[
                [68, 1, 84],
                [59, 82, 139],
                [33, 145, 140],
                [94, 201, 98],
                [253, 231, 37],
            ],
        }
    }

    /// Interpolated color at `t` in [0, 1]. Out-of-range input is clamped; NaN maps to 0.
    pub fn sample(self, t: f64) -> [u8; 3] {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let segments = (stops.len() - 1) as f64;
        let pos = t * segments;
        let lower = (pos.floor() as usize).min(stops.len() - 2);
        let frac = pos - lower as f64;

        let a = stops[lower];
        let b = stops[lower + 1];
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
    }

    pub fn sample_color32(self, t: f64) -> Color32 {
        let [r, g, b] = self.sample(t);
        Color32::from_rgb(r, g, b)
    }

    pub fn sample_rgb(self, t: f64) -> RGBColor {
        let [r, g, b] = self.sample(t);
        RGBColor(r, g, b)
    }
}

/// Linear mapping from a value range onto [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
}

impl ValueScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Scale anchored at zero unless the data goes negative.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        if min.is_infinite() {
            return None;
        }
        Some(Self::new(min.min(0.0), max))
    }

    /// Tight scale over the data range.
    pub fn fitted<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        (!min.is_infinite()).then(|| Self::new(min, max))
    }

    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            0.5
        } else {
            ((value - self.min) / span).clamp(0.0, 1.0)
        }
    }
}

/// Color pairs used by the donut charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonutColor {
    Green,
    Red,
}

impl DonutColor {
    /// (foreground, background)
    pub fn colors(self) -> (Color32, Color32) {
        match self {
            DonutColor::Green => (
                Color32::from_rgb(0x27, 0xae, 0x60),
                Color32::from_rgb(0x12, 0x78, 0x3d),
            ),
            DonutColor::Red => (
                Color32::from_rgb(0xe7, 0x4c, 0x3c),
                Color32::from_rgb(0x78, 0x1f, 0x16),
            ),
        }
    }
}
