// File: crates/ezchart-core/src/component/candle_sticks.rs
// Summary: OHLC candles: a high-low wick plus an open/close body per value, classed up-day/down-day.

use tracing::trace;

use crate::axis::AxisScale;
use crate::color::Color;
use crate::component::{bind_series, bind_value, value_keys, x_position, ColorScale};
use crate::data::DataSeries;
use crate::dom::{Document, NodeId};
use crate::error::{ChartError, Result};
use crate::geometry::Rect;
use crate::scale::LinearScale;
use crate::theme::Theme;
use crate::types::{HEIGHT, WIDTH};

/// Fraction of each candle slot left empty between bodies.
pub const DEFAULT_CANDLE_PADDING: f64 = 0.3;

/// Pixel geometry of one candle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candle {
    pub x: f64,
    /// Wick end points, high then low.
    pub wick: (f64, f64),
    pub body: Rect,
    pub up_day: bool,
}

#[derive(Clone, Debug)]
pub struct CandleSticks {
    width: f64,
    height: f64,
    padding: f64,
    slot_width: Option<f64>,
    x_scale: Option<AxisScale>,
    y_scale: Option<LinearScale>,
    color_scale: ColorScale,
}

impl Default for CandleSticks {
    fn default() -> Self { Self::new() }
}

impl CandleSticks {
    pub fn new() -> Self {
        let theme = Theme::default();
        Self {
            width: WIDTH,
            height: HEIGHT,
            padding: DEFAULT_CANDLE_PADDING,
            slot_width: None,
            x_scale: None,
            y_scale: None,
            color_scale: up_down_colors(theme.candle_up, theme.candle_down),
        }
    }

    pub fn width(&self) -> f64 { self.width }
    pub fn height(&self) -> f64 { self.height }
    pub fn padding(&self) -> f64 { self.padding }
    pub fn slot_width(&self) -> Option<f64> { self.slot_width }
    pub fn x_scale(&self) -> Option<&AxisScale> { self.x_scale.as_ref() }
    pub fn y_scale(&self) -> Option<&LinearScale> { self.y_scale.as_ref() }
    pub fn color_scale(&self) -> &ColorScale { &self.color_scale }

    pub fn set_width(&mut self, width: f64) -> &mut Self {
        self.width = width;
        self
    }

    pub fn set_height(&mut self, height: f64) -> &mut Self {
        self.height = height;
        self
    }

    /// Clamped to `[0, 0.95]`.
    pub fn set_padding(&mut self, padding: f64) -> &mut Self {
        self.padding = padding.clamp(0.0, 0.95);
        self
    }

    pub fn set_x_scale(&mut self, scale: AxisScale) -> &mut Self {
        self.x_scale = Some(scale);
        self
    }

    pub fn set_y_scale(&mut self, scale: LinearScale) -> &mut Self {
        self.y_scale = Some(scale);
        self
    }

    /// Expects keys `up` and `down`.
    pub fn set_color_scale(&mut self, scale: ColorScale) -> &mut Self {
        self.color_scale = scale;
        self
    }

    /// Horizontal space of one period; bodies fill it less the padding.
    pub fn set_slot_width(&mut self, width: f64) -> &mut Self {
        self.slot_width = Some(width.max(0.0));
        self
    }

    /// Body width for candles centered at `centers`. Without an explicit slot the
    /// smallest gap between neighbouring centers is the slot.
    pub fn body_width(&self, centers: &[f64]) -> f64 {
        let slot = self.slot_width.unwrap_or_else(|| {
            let mut sorted = centers.to_vec();
            sorted.sort_by(f64::total_cmp);
            sorted
                .windows(2)
                .map(|w| w[1] - w[0])
                .filter(|gap| *gap > 0.0)
                .reduce(f64::min)
                .unwrap_or_else(|| if centers.is_empty() { 0.0 } else { self.width / centers.len() as f64 })
        });
        slot * (1.0 - self.padding)
    }

    /// Geometry of every candle in `series`, without touching any document.
    pub fn layout(&self, series: &DataSeries) -> Result<Vec<Candle>> {
        let (Some(x), Some(y)) = (self.x_scale.as_ref(), self.y_scale.as_ref()) else {
            return Err(ChartError::invalid_value(&series.key, 0, "candle scales are not set"));
        };
        let mut placed = Vec::with_capacity(series.values.len());
        for (i, value) in series.values.iter().enumerate() {
            let c = value
                .ohlc()
                .ok_or_else(|| ChartError::invalid_value(&series.key, i, "missing open/high/low/close"))?;
            placed.push((x_position(x, &series.key, i, &value.key)?, c));
        }
        let centers: Vec<f64> = placed.iter().map(|(cx, _)| *cx).collect();
        let w = self.body_width(&centers);
        Ok(placed
            .into_iter()
            .map(|(cx, c)| Candle {
                x: cx,
                wick: (y.scale(c.high), y.scale(c.low)),
                body: Rect::from_ltwh(
                    cx - w / 2.0,
                    y.scale(c.body_top()),
                    w,
                    (y.scale(c.open) - y.scale(c.close)).abs().max(1.0),
                ),
                up_day: c.is_up_day(),
            })
            .collect())
    }

    pub fn render(&self, doc: &mut Document, group: NodeId, series: &DataSeries) -> Result<()> {
        let candles = self.layout(series)?;
        self.draw(doc, group, series, &candles)
    }

    /// Write a layout from [`CandleSticks::layout`] for the same series into `group`.
    pub fn draw(&self, doc: &mut Document, group: NodeId, series: &DataSeries, candles: &[Candle]) -> Result<()> {
        bind_series(doc, group, &series.key)?;

        let keys = value_keys(&series.values);
        let join = doc.join(group, "g", "candle", &keys)?;
        let up = self.color_scale.get(&"up".to_string()).unwrap_or(Color::BLACK);
        let down = self.color_scale.get(&"down".to_string()).unwrap_or(Color::BLACK);

        for (i, ((value, candle), &node)) in series.values.iter().zip(candles).zip(&join.nodes).enumerate() {
            let fill = if candle.up_day { up } else { down };
            doc.classed(node, "up-day", candle.up_day)?;
            doc.classed(node, "down-day", !candle.up_day)?;
            bind_value(doc, node, &series.key, i, value)?;

            let wick = doc.select_or_append(node, "line", "high-low")?;
            doc.set_num(wick, "x1", candle.x)?;
            doc.set_num(wick, "x2", candle.x)?;
            doc.set_num(wick, "y1", candle.wick.0)?;
            doc.set_num(wick, "y2", candle.wick.1)?;
            doc.set_attr(wick, "stroke", fill)?;

            let body = doc.select_or_append(node, "rect", "body")?;
            doc.set_num(body, "x", candle.body.left)?;
            doc.set_num(body, "y", candle.body.top)?;
            doc.set_num(body, "width", candle.body.width())?;
            doc.set_num(body, "height", candle.body.height())?;
            doc.set_attr(body, "fill", fill)?;
            doc.set_attr(body, "stroke", fill)?;
        }
        trace!(series = %series.key, candles = join.nodes.len(), entered = join.entered.len(), exited = join.exited, "candle sticks");
        Ok(())
    }
}

/// Two-entry color scale keyed `up` and `down`.
pub fn up_down_colors(up: Color, down: Color) -> ColorScale {
    ColorScale::new(vec![up, down]).with_domain(["up".to_string(), "down".to_string()])
}
