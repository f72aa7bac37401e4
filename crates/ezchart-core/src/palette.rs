// File: crates/ezchart-core/src/palette.rs
// Summary: Default categorical/diverging/sequential color ranges and luminance shifting.

use crate::color::Color;

const CATEGORICAL_1: [Color; 20] = [
    Color::from_rgb(0x33, 0x66, 0xcc),
    Color::from_rgb(0xdc, 0x39, 0x12),
    Color::from_rgb(0xff, 0x99, 0x00),
    Color::from_rgb(0x10, 0x96, 0x18),
    Color::from_rgb(0x99, 0x00, 0x99),
    Color::from_rgb(0x00, 0x99, 0xc6),
    Color::from_rgb(0xdd, 0x44, 0x77),
    Color::from_rgb(0x66, 0xaa, 0x00),
    Color::from_rgb(0xb8, 0x2e, 0x2e),
    Color::from_rgb(0x31, 0x63, 0x95),
    Color::from_rgb(0x99, 0x44, 0x99),
    Color::from_rgb(0x22, 0xaa, 0x99),
    Color::from_rgb(0xaa, 0xaa, 0x11),
    Color::from_rgb(0x66, 0x33, 0xcc),
    Color::from_rgb(0xe6, 0x73, 0x00),
    Color::from_rgb(0x8b, 0x07, 0x07),
    Color::from_rgb(0x65, 0x10, 0x67),
    Color::from_rgb(0x32, 0x92, 0x62),
    Color::from_rgb(0x55, 0x74, 0xa6),
    Color::from_rgb(0x3b, 0x3e, 0xac),
];

const CATEGORICAL_2: [Color; 10] = [
    Color::from_rgb(0x1f, 0x77, 0xb4),
    Color::from_rgb(0xff, 0x7f, 0x0e),
    Color::from_rgb(0x2c, 0xa0, 0x2c),
    Color::from_rgb(0xd6, 0x27, 0x28),
    Color::from_rgb(0x94, 0x67, 0xbd),
    Color::from_rgb(0x8c, 0x56, 0x4b),
    Color::from_rgb(0xe3, 0x77, 0xc2),
    Color::from_rgb(0x7f, 0x7f, 0x7f),
    Color::from_rgb(0xbc, 0xbd, 0x22),
    Color::from_rgb(0x17, 0xbe, 0xcf),
];

const CATEGORICAL_3: [Color; 8] = [
    Color::from_rgb(0xa6, 0xce, 0xe3),
    Color::from_rgb(0xb2, 0xdf, 0x8a),
    Color::from_rgb(0xfb, 0x9a, 0x99),
    Color::from_rgb(0xfd, 0xbf, 0x6f),
    Color::from_rgb(0xca, 0xb2, 0xd6),
    Color::from_rgb(0xff, 0xff, 0x99),
    Color::from_rgb(0xb3, 0xde, 0x69),
    Color::from_rgb(0xfc, 0xcd, 0xe5),
];

const DIVERGING_1: [Color; 9] = [
    Color::from_rgb(0xd7, 0x30, 0x27),
    Color::from_rgb(0xf4, 0x6d, 0x43),
    Color::from_rgb(0xfd, 0xae, 0x61),
    Color::from_rgb(0xfe, 0xe0, 0x8b),
    Color::from_rgb(0xff, 0xff, 0xbf),
    Color::from_rgb(0xd9, 0xef, 0x8b),
    Color::from_rgb(0xa6, 0xd9, 0x6a),
    Color::from_rgb(0x66, 0xbd, 0x63),
    Color::from_rgb(0x1a, 0x98, 0x50),
];

const DIVERGING_2: [Color; 9] = [
    Color::from_rgb(0xb2, 0x18, 0x2b),
    Color::from_rgb(0xd6, 0x60, 0x4d),
    Color::from_rgb(0xf4, 0xa5, 0x82),
    Color::from_rgb(0xfd, 0xdb, 0xc7),
    Color::from_rgb(0xf7, 0xf7, 0xf7),
    Color::from_rgb(0xd1, 0xe5, 0xf0),
    Color::from_rgb(0x92, 0xc5, 0xde),
    Color::from_rgb(0x43, 0x93, 0xc3),
    Color::from_rgb(0x21, 0x66, 0xac),
];

/// Built-in categorical set `index` (1-based); unknown indices fall back to set 1.
pub fn categorical(index: usize) -> Vec<Color> {
    match index {
        2 => CATEGORICAL_2.to_vec(),
        3 => CATEGORICAL_3.to_vec(),
        _ => CATEGORICAL_1.to_vec(),
    }
}

/// Built-in diverging set `index` (1-based); unknown indices fall back to set 1.
pub fn diverging(index: usize) -> Vec<Color> {
    match index {
        2 => DIVERGING_2.to_vec(),
        _ => DIVERGING_1.to_vec(),
    }
}

/// `count` shades of `base`, from light to dark.
pub fn sequential(base: Color, count: usize) -> Vec<Color> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![base];
    }
    // ramp luminance from +0.5 down to -0.5 around the base color
    (0..count)
        .map(|i| {
            let t = i as f64 / (count - 1) as f64;
            base.lum_shift(0.5 - t)
        })
        .collect()
}

pub fn lum_shift(colors: &[Color], lum: f64) -> Vec<Color> {
    colors.iter().map(|c| c.lum_shift(lum)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorical_falls_back_to_first_set() {
        assert_eq!(categorical(0), categorical(1));
        assert_eq!(categorical(99).len(), 20);
        assert_eq!(categorical(2)[0].to_hex(), "#1f77b4");
    }

    #[test]
    fn sequential_runs_light_to_dark() {
        let base = Color::from_rgb(100, 100, 100);
        let shades = sequential(base, 5);
        assert_eq!(shades.len(), 5);
        assert_eq!(shades[0], Color::from_rgb(150, 150, 150));
        assert_eq!(shades[2], base);
        assert_eq!(shades[4], Color::from_rgb(50, 50, 50));
    }

    #[test]
    fn lum_shift_applies_to_every_color() {
        let out = lum_shift(&diverging(2), -1.0);
        assert!(out.iter().all(|c| *c == Color::BLACK));
    }
}
