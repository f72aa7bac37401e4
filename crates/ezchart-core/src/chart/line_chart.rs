// File: crates/ezchart-core/src/chart/line_chart.rs
// Summary: Multi-series line chart with dots; linear or time x axis, zero-based linear y axis.

use tracing::debug;

use crate::axis::{Axis, AxisScale};
use crate::chart::{ensure_data, join_series, render_axes, Chart, ChartOptions};
use crate::component::{ColorScale, LineSeries, ScatterPlot};
use crate::data::DataSeries;
use crate::dom::{Document, NodeId};
use crate::error::{ChartError, Result};
use crate::palette;
use crate::scale::{LinearScale, TimeScale};
use crate::shape::Curve;
use crate::transform::DataTransform;

#[derive(Clone, Debug)]
pub struct LineChart {
    options: ChartOptions,
    curve: Curve,
    dot_radius: f64,
    x_label: String,
    y_label: String,
    y_ticks: usize,
    user_color_scale: Option<ColorScale>,
    // retained from the last render
    x_scale: Option<AxisScale>,
    y_scale: Option<LinearScale>,
    color_scale: Option<ColorScale>,
}

impl Default for LineChart {
    fn default() -> Self { Self::new() }
}

impl LineChart {
    pub fn new() -> Self {
        Self {
            options: ChartOptions::default(),
            curve: Curve::default(),
            dot_radius: 3.0,
            x_label: String::new(),
            y_label: String::new(),
            y_ticks: 10,
            user_color_scale: None,
            x_scale: None,
            y_scale: None,
            color_scale: None,
        }
    }

    pub fn curve(&self) -> Curve { self.curve }
    pub fn dot_radius(&self) -> f64 { self.dot_radius }
    pub fn x_scale(&self) -> Option<&AxisScale> { self.x_scale.as_ref() }
    pub fn y_scale(&self) -> Option<&LinearScale> { self.y_scale.as_ref() }
    /// Series colors used by the last render.
    pub fn color_scale(&self) -> Option<&ColorScale> { self.color_scale.as_ref() }

    pub fn set_curve(&mut self, curve: Curve) -> &mut Self {
        self.curve = curve;
        self
    }

    pub fn set_dot_radius(&mut self, radius: f64) -> &mut Self {
        self.dot_radius = radius;
        self
    }

    pub fn set_x_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.x_label = label.into();
        self
    }

    pub fn set_y_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.y_label = label.into();
        self
    }

    pub fn set_y_ticks(&mut self, ticks: usize) -> &mut Self {
        self.y_ticks = ticks;
        self
    }

    /// Fixed series colors; keys outside its domain are appended on render.
    pub fn set_color_scale(&mut self, scale: ColorScale) -> &mut Self {
        self.user_color_scale = Some(scale);
        self
    }

    /// Linear x over numeric keys, time x when any key is a date.
    fn x_scale_for(data: &[DataSeries], width: f64) -> Result<AxisScale> {
        let values = || data.iter().flat_map(|s| s.values.iter());
        if values().all(|v| v.key.is_number()) {
            let (lo, hi) = values()
                .filter_map(|v| v.key.as_number())
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
            return Ok(AxisScale::Linear(LinearScale::new((lo, hi), (0.0, width))));
        }
        let mut extent = None;
        for s in data {
            for (i, v) in s.values.iter().enumerate() {
                let t = v.key.as_time().map_err(|_| {
                    ChartError::invalid_value(&s.key, i, format!("key `{}` is neither a number nor a date", v.key))
                })?;
                extent = Some(match extent {
                    None => (t, t),
                    Some((lo, hi)) => (t.min(lo), t.max(hi)),
                });
            }
        }
        let extent = extent.ok_or(ChartError::NoData)?;
        Ok(AxisScale::Time(TimeScale::new(extent, (0.0, width))))
    }
}

impl Chart for LineChart {
    fn options(&self) -> &ChartOptions { &self.options }
    fn options_mut(&mut self) -> &mut ChartOptions { &mut self.options }

    fn render(&mut self, doc: &mut Document, container: NodeId, data: &[DataSeries]) -> Result<()> {
        ensure_data(data)?;
        let plot = self.options.plot_rect()?;
        let (w, h) = (plot.width(), plot.height());
        let summary = DataTransform::new(data).summary();

        let x = Self::x_scale_for(data, w)?;
        let y = LinearScale::new((summary.min_value.min(0.0), summary.max_value), (h, 0.0)).nice(self.y_ticks);

        let mut colors = self.user_color_scale.clone().unwrap_or_else(|| {
            ColorScale::new(self.options.colors.clone().unwrap_or_else(|| palette::categorical(2)))
        });
        for key in &summary.row_keys {
            colors.scale(key);
        }

        let mut line = LineSeries::new();
        line.set_x_scale(x.clone()).set_y_scale(y).set_color_scale(colors.clone()).set_curve(self.curve);
        let mut dots = ScatterPlot::new();
        dots.set_x_scale(x.clone()).set_y_scale(y).set_color_scale(colors.clone()).set_radius(self.dot_radius);
        // line and dots share the same points
        let points = data.iter().map(|s| line.points(s)).collect::<Result<Vec<_>>>()?;

        let frame = self.options.mount(doc, container, "line-chart")?;
        let theme = &self.options.theme;
        let x_axis = Axis::bottom(x.clone()).with_label(self.x_label.clone());
        let y_axis = Axis::left(AxisScale::Linear(y)).with_ticks(self.y_ticks).with_label(self.y_label.clone());
        render_axes(doc, &frame, &x_axis, &y_axis, theme)?;

        let groups = join_series(doc, frame.chart, data)?;
        for ((series, points), &group) in data.iter().zip(&points).zip(&groups) {
            line.draw(doc, group, series, points)?;
            dots.draw(doc, group, series, points)?;
        }

        debug!(
            series = data.len(),
            values = data.iter().map(|s| s.values.len()).sum::<usize>(),
            width = w,
            height = h,
            "line chart rendered"
        );
        self.x_scale = Some(x);
        self.y_scale = Some(y);
        self.color_scale = Some(colors);
        Ok(())
    }
}
