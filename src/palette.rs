// Qualitative palettes and the magma color map

use plotters::style::RGBColor;

/// A cyclic list of qualitative colors
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    colors: Vec<RGBColor>,
}

impl ColorPalette {
    pub fn new(colors: Vec<RGBColor>) -> Self {
        Self { colors }
    }

    /// ColorBrewer Set1
    pub fn set1() -> Self {
        Self::new(vec![
            RGBColor(0xe4, 0x1a, 0x1c),
            RGBColor(0x37, 0x7e, 0xb8),
            RGBColor(0x4d, 0xaf, 0x4a),
            RGBColor(0x98, 0x4e, 0xa3),
            RGBColor(0xff, 0x7f, 0x00),
            RGBColor(0xff, 0xff, 0x33),
            RGBColor(0xa6, 0x56, 0x28),
            RGBColor(0xf7, 0x81, 0xbf),
            RGBColor(0x99, 0x99, 0x99),
        ])
    }

    /// ColorBrewer Set2
    pub fn set2() -> Self {
        Self::new(vec![
            RGBColor(0x66, 0xc2, 0xa5),
            RGBColor(0xfc, 0x8d, 0x62),
            RGBColor(0x8d, 0xa0, 0xcb),
            RGBColor(0xe7, 0x8a, 0xc3),
            RGBColor(0xa6, 0xd8, 0x54),
            RGBColor(0xff, 0xd9, 0x2f),
            RGBColor(0xe5, 0xc4, 0x94),
            RGBColor(0xb3, 0xb3, 0xb3),
        ])
    }

    pub fn pastel() -> Self {
        Self::new(vec![
            RGBColor(0xa1, 0xc9, 0xf4),
            RGBColor(0xff, 0xb4, 0x82),
            RGBColor(0x8d, 0xe5, 0xa1),
            RGBColor(0xff, 0x9f, 0x9b),
            RGBColor(0xd0, 0xbb, 0xff),
            RGBColor(0xde, 0xbb, 0x9b),
            RGBColor(0xfa, 0xb0, 0xe4),
            RGBColor(0xcf, 0xcf, 0xcf),
            RGBColor(0xff, 0xfe, 0xa3),
            RGBColor(0xb9, 0xf2, 0xf0),
        ])
    }

    pub fn color(&self, index: usize) -> RGBColor {
        if self.colors.is_empty() {
            return BLUE;
        }
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Age histogram color
pub const BLUE: RGBColor = RGBColor(0, 0, 255);
/// Fare histogram color
pub const GREEN: RGBColor = RGBColor(0, 128, 0);

const MAGMA: [(u8, u8, u8); 9] = [
    (0x00, 0x00, 0x04),
    (0x1c, 0x10, 0x44),
    (0x4f, 0x12, 0x7b),
    (0x81, 0x25, 0x81),
    (0xb5, 0x36, 0x7a),
    (0xe5, 0x50, 0x64),
    (0xfb, 0x87, 0x61),
    (0xfe, 0xc2, 0x87),
    (0xfc, 0xfd, 0xbf),
];

/// Magma color map, `t` clamped to [0, 1]
pub fn magma(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (MAGMA.len() - 1) as f64;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(MAGMA.len() - 1);
    let w = scaled - lo as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * w).round() as u8;
    let (r0, g0, b0) = MAGMA[lo];
    let (r1, g1, b1) = MAGMA[hi];
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Perceived brightness in [0, 1], used to pick annotation text color
pub fn luminance(color: RGBColor) -> f64 {
    (0.299 * color.0 as f64 + 0.587 * color.1 as f64 + 0.114 * color.2 as f64) / 255.0
}
