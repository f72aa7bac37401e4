// File: crates/ezchart-core/src/config.rs
// Summary: Serializable chart settings loaded from JSON and applied to any chart kind.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::{CandlestickChart, Chart, LineChart};
use crate::component::candle_sticks::DEFAULT_CANDLE_PADDING;
use crate::error::Result;
use crate::palette;
use crate::shape::Curve;
use crate::theme;
use crate::types::{Insets, HEIGHT, WIDTH};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Insets,
    /// Theme preset name; unknown names fall back to `light`.
    pub theme: String,
    /// Categorical palette set (1..=3); `None` keeps each chart's default.
    /// Candlestick charts ignore it and keep their up/down colors.
    pub palette: Option<usize>,
    pub curve: Curve,
    pub candle_padding: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            margin: Insets::default(),
            theme: "light".into(),
            palette: None,
            curve: Curve::default(),
            candle_padding: DEFAULT_CANDLE_PADDING,
        }
    }
}

impl ChartConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let cfg = Self::from_json_str(&text)?;
        debug!(path = %path.as_ref().display(), theme = %cfg.theme, "loaded chart config");
        Ok(cfg)
    }

    /// Size, margin and theme.
    pub fn apply_frame<C: Chart>(&self, chart: &mut C) {
        chart
            .set_width(self.width)
            .set_height(self.height)
            .set_margin(self.margin)
            .set_theme(theme::find(&self.theme));
    }

    /// Frame settings plus the categorical palette.
    pub fn apply<C: Chart>(&self, chart: &mut C) {
        self.apply_frame(chart);
        if let Some(set) = self.palette {
            chart.set_colors(palette::categorical(set));
        }
    }

    pub fn apply_line(&self, chart: &mut LineChart) {
        self.apply(chart);
        chart.set_curve(self.curve);
    }

    pub fn apply_candlestick(&self, chart: &mut CandlestickChart) {
        self.apply_frame(chart);
        chart.set_candle_padding(self.candle_padding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataSeries, DataValue};
    use crate::dom::Document;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ChartConfig::from_json_str(r#"{ "width": 900, "theme": "dark", "curve": { "type": "step" } }"#).unwrap();
        assert_eq!(cfg.width, 900.0);
        assert_eq!(cfg.height, HEIGHT);
        assert_eq!(cfg.curve, Curve::Step);
        assert_eq!(cfg.margin, Insets::default());
    }

    #[test]
    fn apply_configures_chart() {
        let cfg = ChartConfig {
            width: 300.0,
            theme: "dark".into(),
            palette: Some(3),
            curve: Curve::Linear,
            ..Default::default()
        };
        let mut chart = LineChart::new();
        cfg.apply_line(&mut chart);
        assert_eq!(chart.width(), 300.0);
        assert_eq!(chart.theme().name, "dark");
        assert_eq!(chart.curve(), Curve::Linear);
        assert_eq!(chart.colors().map(|c| c.len()), Some(8));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ChartConfig::from_json_str("{ width: }").is_err());
    }

    #[test]
    fn palette_leaves_candle_colors_alone() {
        let cfg = ChartConfig { theme: "dark".into(), palette: Some(3), candle_padding: 0.5, ..Default::default() };
        let mut chart = CandlestickChart::new();
        cfg.apply_candlestick(&mut chart);
        assert!(chart.colors().is_none());
        assert_eq!(chart.candle_padding(), 0.5);

        let data = vec![DataSeries::new(
            "ACME",
            vec![DataValue::candle("2024-03-04", 10.0, 14.0, 9.0, 13.0), DataValue::candle("2024-03-05", 13.0, 13.5, 11.0, 11.5)],
        )];
        let mut doc = Document::new();
        let root = doc.root();
        chart.render(&mut doc, root, &data).unwrap();
        let up = doc.select_all(root, "up-day")[0];
        let body = doc.select_child(up, "rect", "body").unwrap();
        let expected = chart.theme().candle_up.to_string();
        assert_eq!(doc.attr(body, "fill"), Some(expected.as_str()));
    }
}
