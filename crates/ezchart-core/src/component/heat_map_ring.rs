// File: crates/ezchart-core/src/component/heat_map_ring.rs
// Summary: One ring of arc cells per series: angle from the column band, radius from the row band.

use tracing::{trace, warn};

use crate::color::Color;
use crate::component::{bind_series, bind_value, require_value, value_keys};
use crate::data::DataSeries;
use crate::dom::{Document, NodeId};
use crate::error::{ChartError, Result};
use crate::scale::{BandScale, ThresholdScale};
use crate::shape::Arc;

#[derive(Clone, Debug)]
pub struct HeatMapRing {
    x_scale: Option<BandScale>,
    y_scale: Option<BandScale>,
    color_scale: Option<ThresholdScale<Color>>,
}

impl Default for HeatMapRing {
    fn default() -> Self { Self::new() }
}

impl HeatMapRing {
    pub fn new() -> Self {
        Self { x_scale: None, y_scale: None, color_scale: None }
    }

    pub fn x_scale(&self) -> Option<&BandScale> { self.x_scale.as_ref() }
    pub fn y_scale(&self) -> Option<&BandScale> { self.y_scale.as_ref() }
    pub fn color_scale(&self) -> Option<&ThresholdScale<Color>> { self.color_scale.as_ref() }

    /// Angular bands (radians) over column keys.
    pub fn set_x_scale(&mut self, scale: BandScale) -> &mut Self {
        self.x_scale = Some(scale);
        self
    }

    /// Radial bands over series keys.
    pub fn set_y_scale(&mut self, scale: BandScale) -> &mut Self {
        self.y_scale = Some(scale);
        self
    }

    pub fn set_color_scale(&mut self, scale: ThresholdScale<Color>) -> &mut Self {
        self.color_scale = Some(scale);
        self
    }

    /// Arc of value `index` in `series`; `None` when its column or row has no band.
    pub fn cell(&self, series: &DataSeries, index: usize) -> Option<Arc> {
        let (x, y) = (self.x_scale.as_ref()?, self.y_scale.as_ref()?);
        let value = series.values.get(index)?;
        let a0 = x.scale(&value.key.to_string())?;
        let r0 = y.scale(&series.key)?;
        Some(Arc::new(r0, r0 + y.bandwidth(), a0, a0 + x.bandwidth()))
    }

    /// Arc and fill of every value in `series`.
    pub fn cells(&self, series: &DataSeries) -> Result<Vec<(Arc, Color)>> {
        let Some(colors) = self.color_scale.as_ref() else {
            return Err(ChartError::invalid_value(&series.key, 0, "heat map color scale is not set"));
        };
        series
            .values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let arc = self
                    .cell(series, i)
                    .ok_or_else(|| ChartError::invalid_value(&series.key, i, format!("no band for `{}`", value.key)))?;
                let v = require_value(&series.key, i, value)?;
                Ok((arc, colors.scale(v).unwrap_or(Color::BLACK)))
            })
            .collect()
    }

    pub fn render(&self, doc: &mut Document, group: NodeId, series: &DataSeries) -> Result<()> {
        let cells = self.cells(series)?;
        self.draw(doc, group, series, &cells)
    }

    pub fn draw(&self, doc: &mut Document, group: NodeId, series: &DataSeries, cells: &[(Arc, Color)]) -> Result<()> {
        bind_series(doc, group, &series.key)?;
        if series.values.is_empty() {
            warn!(series = %series.key, "heat map ring has no values");
        }

        let keys = value_keys(&series.values);
        let join = doc.join(group, "path", "cell", &keys)?;
        for (i, ((value, (arc, fill)), &cell)) in series.values.iter().zip(cells).zip(&join.nodes).enumerate() {
            doc.set_attr(cell, "d", arc.path())?;
            doc.set_attr(cell, "fill", *fill)?;
            bind_value(doc, cell, &series.key, i, value)?;
        }
        trace!(series = %series.key, cells = join.nodes.len(), "heat map ring");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataValue;
    use std::f64::consts::TAU;

    #[test]
    fn cells_span_column_and_row_bands() {
        let series = DataSeries::new("r1", vec![DataValue::new("a", 1.0), DataValue::new("b", 9.0)]);
        let mut ring = HeatMapRing::new();
        ring.set_x_scale(BandScale::new(["a", "b"], (0.0, TAU)))
            .set_y_scale(BandScale::new(["r0", "r1"], (10.0, 30.0)))
            .set_color_scale(ThresholdScale::new(vec![5.0], vec![Color::WHITE, Color::BLACK]));

        let cell = ring.cell(&series, 1).unwrap();
        assert_eq!((cell.inner_radius, cell.outer_radius), (20.0, 30.0));
        assert!((cell.start_angle - TAU / 2.0).abs() < 1e-9);

        let mut doc = Document::new();
        let g = doc.append(doc.root(), "g").unwrap();
        ring.render(&mut doc, g, &series).unwrap();
        let cells = doc.select_all(g, "cell");
        assert_eq!(doc.attr(cells[0], "fill"), Some("#ffffff"));
        assert_eq!(doc.attr(cells[1], "fill"), Some("#000000"));
    }

    #[test]
    fn unknown_column_is_reported() {
        let series = DataSeries::new("r0", vec![DataValue::new("zzz", 1.0)]);
        let mut ring = HeatMapRing::new();
        ring.set_x_scale(BandScale::new(["a"], (0.0, TAU)))
            .set_y_scale(BandScale::new(["r0"], (10.0, 30.0)))
            .set_color_scale(ThresholdScale::new(vec![], vec![Color::WHITE]));
        let mut doc = Document::new();
        let g = doc.append(doc.root(), "g").unwrap();
        assert!(ring.render(&mut doc, g, &series).is_err());
    }
}
