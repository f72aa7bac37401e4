// File: crates/ezchart-core/src/lib.rs
// Summary: Core library entry point; exports the data model, scales, SVG document, components and charts.

pub mod axis;
pub mod chart;
pub mod color;
pub mod component;
pub mod config;
pub mod data;
pub mod dom;
pub mod error;
pub mod events;
pub mod geometry;
pub mod grid;
pub mod palette;
pub mod scale;
pub mod shape;
pub mod theme;
pub mod transform;
pub mod types;

pub use axis::{Axis, AxisScale, Orient};
pub use chart::{CandlestickChart, Chart, ChartOptions, HeatMapRadial, LineChart};
pub use color::Color;
pub use component::{
    CandleSticks, CircularRingLabels, CircularSectorLabels, ColorScale, HeatMapRing, LineSeries, ScatterPlot,
};
pub use config::ChartConfig;
pub use data::{series_from_json, series_from_path, DataSeries, DataValue, Key, Ohlc};
pub use dom::{Document, NodeId};
pub use error::{ChartError, Result};
pub use events::{CustomEvent, Datum, Dispatcher, DomEvent};
pub use scale::{BandScale, LinearScale, OrdinalScale, ThresholdScale, TimeScale};
pub use shape::Curve;
pub use theme::Theme;
pub use transform::{is_up_day, DataTransform, Summary};
pub use types::Insets;
