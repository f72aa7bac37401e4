// File: crates/ezchart-core/src/component/scatter_plot.rs
// Summary: One circle per value; each dot carries its value datum and raises value events.

use tracing::trace;

use crate::axis::AxisScale;
use crate::color::Color;
use crate::component::{bind_series, bind_value, require_value, value_keys, x_position, ColorScale};
use crate::data::DataSeries;
use crate::dom::{Document, NodeId};
use crate::error::{ChartError, Result};
use crate::geometry::Point;
use crate::palette;
use crate::scale::LinearScale;

#[derive(Clone, Debug)]
pub struct ScatterPlot {
    x_scale: Option<AxisScale>,
    y_scale: Option<LinearScale>,
    color_scale: ColorScale,
    radius: f64,
}

impl Default for ScatterPlot {
    fn default() -> Self { Self::new() }
}

impl ScatterPlot {
    pub fn new() -> Self {
        Self { x_scale: None, y_scale: None, color_scale: ColorScale::new(palette::categorical(2)), radius: 3.0 }
    }

    pub fn x_scale(&self) -> Option<&AxisScale> { self.x_scale.as_ref() }
    pub fn y_scale(&self) -> Option<&LinearScale> { self.y_scale.as_ref() }
    pub fn color_scale(&self) -> &ColorScale { &self.color_scale }
    pub fn radius(&self) -> f64 { self.radius }

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

    pub fn set_radius(&mut self, radius: f64) -> &mut Self {
        self.radius = radius.max(0.0);
        self
    }

    /// Dot centers of `series`, in value order.
    pub fn points(&self, series: &DataSeries) -> Result<Vec<Point>> {
        let (Some(x), Some(y)) = (self.x_scale.as_ref(), self.y_scale.as_ref()) else {
            return Err(ChartError::invalid_value(&series.key, 0, "scatter scales are not set"));
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

    pub fn draw(&self, doc: &mut Document, group: NodeId, series: &DataSeries, points: &[Point]) -> Result<()> {
        bind_series(doc, group, &series.key)?;
        let fill = self.color_scale.get(&series.key).unwrap_or(Color::BLACK);

        let keys = value_keys(&series.values);
        let join = doc.join(group, "circle", "dot", &keys)?;
        for (i, ((value, point), &dot)) in series.values.iter().zip(points).zip(&join.nodes).enumerate() {
            doc.set_num(dot, "cx", point.x)?;
            doc.set_num(dot, "cy", point.y)?;
            doc.set_num(dot, "r", self.radius)?;
            doc.set_attr(dot, "fill", fill)?;
            bind_value(doc, dot, &series.key, i, value)?;
        }
        trace!(series = %series.key, dots = join.nodes.len(), exited = join.exited, "scatter plot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataValue;
    use crate::events::{CustomEvent, DomEvent};

    fn plot() -> ScatterPlot {
        let mut p = ScatterPlot::new();
        p.set_x_scale(AxisScale::Linear(LinearScale::new((0.0, 4.0), (0.0, 40.0))))
            .set_y_scale(LinearScale::new((0.0, 10.0), (100.0, 0.0)))
            .set_radius(4.0);
        p
    }

    #[test]
    fn dots_are_joined_by_key() {
        let mut doc = Document::new();
        let g = doc.append(doc.root(), "g").unwrap();
        let first = DataSeries::new("s", vec![DataValue::new(1.0, 5.0), DataValue::new(2.0, 8.0)]);
        plot().render(&mut doc, g, &first).unwrap();
        let dots = doc.select_all(g, "dot");
        assert_eq!(dots.len(), 2);
        assert_eq!(doc.attr_f64(dots[0], "cx"), Some(10.0));
        assert_eq!(doc.attr_f64(dots[1], "cy"), Some(20.0));
        assert_eq!(doc.attr(dots[0], "r"), Some("4"));
        assert_eq!(doc.listener(dots[0], DomEvent::Click), Some(CustomEvent::ValueClick));
        assert_eq!(doc.listener(g, DomEvent::MouseOver), Some(CustomEvent::SeriesMouseOver));

        let second = DataSeries::new("s", vec![DataValue::new(2.0, 1.0)]);
        plot().render(&mut doc, g, &second).unwrap();
        let after = doc.select_all(g, "dot");
        assert_eq!(after, vec![dots[1]]);
        assert_eq!(doc.attr_f64(after[0], "cy"), Some(90.0));
        assert_eq!(doc.datum(after[0]).and_then(|d| d.value.as_ref()).map(|(i, _)| *i), Some(0));
    }

    #[test]
    fn bad_key_fails_before_any_dot_is_drawn() {
        let mut doc = Document::new();
        let g = doc.append(doc.root(), "g").unwrap();
        let series = DataSeries::new("s", vec![DataValue::new(1.0, 5.0), DataValue::new("soon", 8.0)]);
        assert!(matches!(plot().points(&series), Err(ChartError::InvalidValue { index: 1, .. })));
        assert!(plot().render(&mut doc, g, &series).is_err());
        assert!(doc.select_all(g, "dot").is_empty());
    }
}
