// File: crates/ezchart-core/src/component/mod.rs
// Summary: Shape sub-components drawing one primitive type per series, plus shared binding helpers.

pub mod candle_sticks;
pub mod circular_ring_labels;
pub mod circular_sector_labels;
pub mod heat_map_ring;
pub mod line_series;
pub mod scatter_plot;

pub use candle_sticks::CandleSticks;
pub use circular_ring_labels::CircularRingLabels;
pub use circular_sector_labels::{CircularSectorLabels, SectorTick};
pub use heat_map_ring::HeatMapRing;
pub use line_series::LineSeries;
pub use scatter_plot::ScatterPlot;

use crate::axis::AxisScale;
use crate::color::Color;
use crate::data::{DataValue, Key};
use crate::dom::{Document, NodeId};
use crate::error::{ChartError, Result};
use crate::events::{CustomEvent, Datum, DomEvent};
use crate::scale::OrdinalScale;

/// Series key (or `up`/`down` for candles) to fill/stroke color.
pub type ColorScale = OrdinalScale<String, Color>;

/// Bind the series datum to `node` and route pointer events to `customSeries*`.
pub(crate) fn bind_series(doc: &mut Document, node: NodeId, key: &str) -> Result<()> {
    doc.set_datum(node, Datum::series(key))?;
    for ev in DomEvent::ALL {
        doc.on(node, ev, CustomEvent::series(ev))?;
    }
    Ok(())
}

/// Bind one value to its shape and route pointer events to `customValue*`.
pub(crate) fn bind_value(doc: &mut Document, node: NodeId, series: &str, index: usize, value: &DataValue) -> Result<()> {
    doc.set_datum(node, Datum::value(series, index, value.clone()))?;
    for ev in DomEvent::ALL {
        doc.on(node, ev, CustomEvent::value(ev))?;
    }
    Ok(())
}

/// Horizontal pixel position of `key`; band keys land on the band center.
pub(crate) fn x_position(scale: &AxisScale, series: &str, index: usize, key: &Key) -> Result<f64> {
    match scale {
        AxisScale::Linear(s) => key
            .as_number()
            .map(|v| s.scale(v))
            .ok_or_else(|| ChartError::invalid_value(series, index, format!("key `{key}` is not a number"))),
        AxisScale::Time(s) => Ok(s.scale(&key.as_time()?)),
        AxisScale::Band(s) => s
            .scale(&key.to_string())
            .map(|x| x + s.bandwidth() / 2.0)
            .ok_or_else(|| ChartError::invalid_value(series, index, format!("key `{key}` is not in the band domain"))),
    }
}

pub(crate) fn require_value(series: &str, index: usize, value: &DataValue) -> Result<f64> {
    value
        .value
        .filter(|v| v.is_finite())
        .ok_or_else(|| ChartError::invalid_value(series, index, "missing numeric `value`"))
}

/// Join keys for the values of a series; repeated keys get an index suffix.
pub(crate) fn value_keys(values: &[DataValue]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let k = v.key.to_string();
            if seen.insert(k.clone()) { k } else { format!("{k}#{i}") }
        })
        .collect()
}
