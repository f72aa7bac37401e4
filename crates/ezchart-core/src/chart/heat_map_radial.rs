// File: crates/ezchart-core/src/chart/heat_map_radial.rs
// Summary: Radial heat map: one ring per series, one sector per column key, threshold-colored cells.

use std::f64::consts::TAU;

use tracing::debug;

use crate::axis::AxisScale;
use crate::chart::{ensure_data, join_series, Chart, ChartOptions};
use crate::color::Color;
use crate::component::{CircularRingLabels, CircularSectorLabels, HeatMapRing};
use crate::data::DataSeries;
use crate::dom::{fmt_num, Document, NodeId};
use crate::error::Result;
use crate::scale::{BandScale, ThresholdScale};
use crate::transform::DataTransform;

/// Cold-to-hot ramp matching the four value thresholds.
pub const DEFAULT_COLORS: [Color; 5] = [
    Color::from_rgb(0xd3, 0x41, 0x52),
    Color::from_rgb(0xf4, 0xbc, 0x71),
    Color::from_rgb(0xfb, 0xf6, 0xc4),
    Color::from_rgb(0x9b, 0xcf, 0x95),
    Color::from_rgb(0x39, 0x8a, 0xbb),
];

#[derive(Clone, Debug)]
pub struct HeatMapRadial {
    options: ChartOptions,
    id: String,
    inner_radius: Option<f64>,
    ring_padding: f64,
    user_color_scale: Option<ThresholdScale<Color>>,
    // retained from the last render
    x_scale: Option<BandScale>,
    y_scale: Option<BandScale>,
    color_scale: Option<ThresholdScale<Color>>,
}

impl Default for HeatMapRadial {
    fn default() -> Self { Self::new() }
}

impl HeatMapRadial {
    pub fn new() -> Self {
        Self {
            options: ChartOptions::default(),
            id: "heat-map-radial".into(),
            inner_radius: None,
            ring_padding: 0.1,
            user_color_scale: None,
            x_scale: None,
            y_scale: None,
            color_scale: None,
        }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn inner_radius(&self) -> Option<f64> { self.inner_radius }
    /// Angular bands over column keys from the last render.
    pub fn x_scale(&self) -> Option<&BandScale> { self.x_scale.as_ref() }
    /// Radial bands over series keys from the last render.
    pub fn y_scale(&self) -> Option<&BandScale> { self.y_scale.as_ref() }
    pub fn color_scale(&self) -> Option<&ThresholdScale<Color>> { self.color_scale.as_ref() }

    /// Prefix for label path ids; distinct per chart sharing a document.
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    /// Radius of the empty center; defaults to a quarter of the outer radius.
    pub fn set_inner_radius(&mut self, radius: f64) -> &mut Self {
        self.inner_radius = Some(radius.max(0.0));
        self
    }

    pub fn set_ring_padding(&mut self, padding: f64) -> &mut Self {
        self.ring_padding = padding;
        self
    }

    pub fn set_color_scale(&mut self, scale: ThresholdScale<Color>) -> &mut Self {
        self.user_color_scale = Some(scale);
        self
    }
}

impl Chart for HeatMapRadial {
    fn options(&self) -> &ChartOptions { &self.options }
    fn options_mut(&mut self) -> &mut ChartOptions { &mut self.options }

    fn render(&mut self, doc: &mut Document, container: NodeId, data: &[DataSeries]) -> Result<()> {
        ensure_data(data)?;
        let plot = self.options.plot_rect()?;
        let (w, h) = (plot.width(), plot.height());
        let summary = DataTransform::new(data).summary();

        let radius = w.min(h) / 2.0;
        let inner = self.inner_radius.unwrap_or(radius / 4.0).min(radius);
        let x = BandScale::new(summary.column_keys.iter().cloned(), (0.0, TAU));
        let y = BandScale::new(summary.row_keys.iter().cloned(), (inner, radius)).padding(self.ring_padding);
        let colors = self.user_color_scale.clone().unwrap_or_else(|| {
            let range = self.options.colors.clone().unwrap_or_else(|| DEFAULT_COLORS.to_vec());
            ThresholdScale::new(summary.thresholds.clone(), range)
        });

        let mut ring = HeatMapRing::new();
        ring.set_x_scale(x.clone()).set_y_scale(y.clone()).set_color_scale(colors.clone());
        let cells = data.iter().map(|s| ring.cells(s)).collect::<Result<Vec<_>>>()?;

        let frame = self.options.mount(doc, container, "heat-map-radial")?;
        let center = doc.select_or_append(frame.chart, "g", "heat-map")?;
        doc.set_attr(center, "transform", format!("translate({},{})", fmt_num(w / 2.0), fmt_num(h / 2.0)))?;

        let groups = join_series(doc, center, data)?;
        for ((series, cells), &group) in data.iter().zip(&cells).zip(&groups) {
            ring.draw(doc, group, series, cells)?;
        }

        let theme = self.options.theme.clone();
        let sector_group = doc.select_or_append(center, "g", "circular-sector-labels")?;
        let mut sectors = CircularSectorLabels::new();
        sectors
            .set_id(format!("{}-sector", self.id))
            .set_radius(radius)
            .set_scale(AxisScale::Band(x.clone()))
            .set_theme(theme.clone());
        sectors.render(doc, sector_group)?;

        let ring_group = doc.select_or_append(center, "g", "circular-ring-labels")?;
        let mut rings = CircularRingLabels::new();
        rings.set_id(format!("{}-ring", self.id)).set_scale(y.clone()).set_theme(theme);
        rings.render(doc, ring_group)?;

        debug!(rows = summary.row_keys.len(), columns = summary.column_keys.len(), radius, "heat map radial rendered");
        self.x_scale = Some(x);
        self.y_scale = Some(y);
        self.color_scale = Some(colors);
        Ok(())
    }
}
