// File: crates/ezchart-core/src/component/line_series.rs
// Summary: One stroked path per series through its (key, value) points.

use tracing::trace;

use crate::axis::AxisScale;
use crate::color::Color;
use crate::component::{bind_series, require_value, x_position, ColorScale};
use crate::data::DataSeries;
use crate::dom::{Document, NodeId};
use crate::error::{ChartError, Result};
use crate::geometry::Point;
use crate::palette;
use crate::scale::LinearScale;
use crate::shape::{line_path, Curve};

#[derive(Clone, Debug)]
pub struct LineSeries {
    x_scale: Option<AxisScale>,
    y_scale: Option<LinearScale>,
    color_scale: ColorScale,
    curve: Curve,
    stroke_width: f64,
}

impl Default for LineSeries {
    fn default() -> Self { Self::new() }
}

impl LineSeries {
    pub fn new() -> Self {
        Self {
            x_scale: None,
            y_scale: None,
            color_scale: ColorScale::new(palette::categorical(2)),
            curve: Curve::default(),
            stroke_width: 1.5,
        }
    }

    pub fn x_scale(&self) -> Option<&AxisScale> { self.x_scale.as_ref() }
    pub fn y_scale(&self) -> Option<&LinearScale> { self.y_scale.as_ref() }
    pub fn color_scale(&self) -> &ColorScale { &self.color_scale }
    pub fn curve(&self) -> Curve { self.curve }
    pub fn stroke_width(&self) -> f64 { self.stroke_width }

    pub fn set_x_scale(&mut self, scale: AxisScale) -> &mut Self {
        self.x_scale = Some(scale);
        self
    }

    pub fn set_y_scale(&mut self, scale: LinearScale) -> &mut Self {
        self.y_scale = Some(scale);
        self
    }

    pub fn set_color_scale(&mut self, scale: ColorScale) -> &mut Self {
        self.color_scale = scale;
        self
    }

    pub fn set_curve(&mut self, curve: Curve) -> &mut Self {
        self.curve = curve;
        self
    }

    pub fn set_stroke_width(&mut self, width: f64) -> &mut Self {
        self.stroke_width = width;
        self
    }

    /// Pixel points of `series`, in value order.
    pub fn points(&self, series: &DataSeries) -> Result<Vec<Point>> {
        let (Some(x), Some(y)) = (self.x_scale.as_ref(), self.y_scale.as_ref()) else {
            return Err(ChartError::invalid_value(&series.key, 0, "line scales are not set"));
        };
        series
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| Ok(Point::new(x_position(x, &series.key, i, &v.key)?, y.scale(require_value(&series.key, i, v)?))))
            .collect()
    }

    pub fn render(&self, doc: &mut Document, group: NodeId, series: &DataSeries) -> Result<()> {
        let points = self.points(series)?;
        self.draw(doc, group, series, &points)
    }

    /// Write the path through `points` from [`LineSeries::points`] into `group`.
    pub fn draw(&self, doc: &mut Document, group: NodeId, series: &DataSeries, points: &[Point]) -> Result<()> {
        bind_series(doc, group, &series.key)?;
        let stroke = self.color_scale.get(&series.key).unwrap_or(Color::BLACK);

        let path = doc.select_or_append(group, "path", "line")?;
        doc.set_attr(path, "d", line_path(points, self.curve))?;
        doc.set_attr(path, "fill", "none")?;
        doc.set_attr(path, "stroke", stroke)?;
        doc.set_num(path, "stroke-width", self.stroke_width)?;
        trace!(series = %series.key, points = points.len(), "line series");
        Ok(())
    }
}
