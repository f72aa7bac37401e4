// File: crates/ezchart-core/src/theme.rs
// Summary: Named color/typography presets applied to chart backgrounds, axes and candles.

use crate::color::Color;

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    /// `None` leaves the svg transparent.
    pub background: Option<Color>,
    pub axis_line: Color,
    pub axis_label: Color,
    pub label: Color,
    pub candle_up: Color,
    pub candle_down: Color,
    pub font_family: &'static str,
    pub font_size: f64,
}

impl Default for Theme {
    fn default() -> Self { Self::light() }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: None,
            axis_line: Color::from_rgb(0x33, 0x33, 0x33),
            axis_label: Color::from_rgb(0x33, 0x33, 0x33),
            label: Color::from_rgb(0x66, 0x66, 0x66),
            candle_up: Color::from_rgb(0x10, 0x96, 0x18),
            candle_down: Color::from_rgb(0xdc, 0x39, 0x12),
            font_family: "sans-serif",
            font_size: 10.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Some(Color::from_rgb(18, 18, 20)),
            axis_line: Color::from_rgb(180, 180, 190),
            axis_label: Color::from_rgb(235, 235, 245),
            label: Color::from_rgb(150, 150, 160),
            candle_up: Color::from_rgb(40, 200, 120),
            candle_down: Color::from_rgb(220, 80, 80),
            font_family: "sans-serif",
            font_size: 10.0,
        }
    }

    pub fn high_contrast_dark() -> Self {
        Self {
            name: "high-contrast-dark",
            background: Some(Color::BLACK),
            axis_line: Color::WHITE,
            axis_label: Color::WHITE,
            label: Color::from_rgb(0xcc, 0xcc, 0xcc),
            candle_up: Color::from_rgb(0x00, 0xff, 0x00),
            candle_down: Color::from_rgb(0xff, 0x00, 0x00),
            font_family: "sans-serif",
            font_size: 12.0,
        }
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark(), Theme::high_contrast_dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    presets()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive_with_fallback() {
        assert_eq!(find("DARK").name, "dark");
        assert_eq!(find("no-such-theme").name, "light");
    }
}
