// File: crates/ezchart-core/src/chart/mod.rs
// Summary: Chart-level modules: shared options, svg frame mounting and the `Chart` trait.

pub mod candlestick_chart;
pub mod heat_map_radial;
pub mod line_chart;

pub use candlestick_chart::CandlestickChart;
pub use heat_map_radial::HeatMapRadial;
pub use line_chart::LineChart;

use tracing::warn;

use crate::axis::Axis;
use crate::color::Color;
use crate::data::DataSeries;
use crate::dom::{fmt_num, Document, NodeId, SVG_NS};
use crate::error::{ChartError, Result};
use crate::events::{CustomEvent, Datum, Dispatcher, DomEvent};
use crate::geometry::Rect;
use crate::theme::Theme;
use crate::types::{Insets, HEIGHT, WIDTH};

/// Settings every chart shares.
#[derive(Clone, Debug)]
pub struct ChartOptions {
    pub width: f64,
    pub height: f64,
    pub margin: Insets,
    pub theme: Theme,
    /// Overrides the chart's default color range.
    pub colors: Option<Vec<Color>>,
    pub dispatcher: Dispatcher,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            margin: Insets::default(),
            theme: Theme::default(),
            colors: None,
            dispatcher: Dispatcher::new(),
        }
    }
}

/// Nodes created by [`ChartOptions::mount`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub svg: NodeId,
    /// Group translated by the top-left margin; chart content lives here.
    pub chart: NodeId,
    /// Plot area in chart-group coordinates (origin at 0,0).
    pub plot: Rect,
}

impl ChartOptions {
    /// Plot area in chart-group coordinates; an error when margins eat the whole svg.
    pub fn plot_rect(&self) -> Result<Rect> {
        let r = Rect::inset(self.width, self.height, &self.margin);
        if r.is_empty() {
            return Err(ChartError::EmptyPlotArea { width: r.width(), height: r.height() });
        }
        Ok(Rect::from_ltwh(0.0, 0.0, r.width(), r.height()))
    }

    /// Select or create `svg.ezchart.<class>` under `container` with its
    /// background and chart group, sized to these options.
    pub fn mount(&self, doc: &mut Document, container: NodeId, class: &str) -> Result<Frame> {
        let plot = self.plot_rect()?;
        let svg = doc.select_or_append(container, "svg", "ezchart")?;
        doc.classed(svg, class, true)?;
        doc.set_attr(svg, "xmlns", SVG_NS)?;
        doc.set_num(svg, "width", self.width)?;
        doc.set_num(svg, "height", self.height)?;
        doc.set_attr(svg, "viewBox", format!("0 0 {} {}", fmt_num(self.width), fmt_num(self.height)))?;

        // always present so it stays the first child across theme changes
        let bg = doc.select_or_append(svg, "rect", "background")?;
        doc.set_num(bg, "width", self.width)?;
        doc.set_num(bg, "height", self.height)?;
        match self.theme.background {
            Some(c) => doc.set_attr(bg, "fill", c)?,
            None => doc.set_attr(bg, "fill", "none")?,
        }

        let chart = doc.select_or_append(svg, "g", "chart")?;
        doc.set_attr(chart, "transform", format!("translate({},{})", self.margin.left, self.margin.top))?;
        Ok(Frame { svg, chart, plot })
    }
}

/// Reject data with nothing to draw; warn about individual empty series.
pub(crate) fn ensure_data(data: &[DataSeries]) -> Result<()> {
    if data.iter().all(|s| s.values.is_empty()) {
        return Err(ChartError::NoData);
    }
    for s in data.iter().filter(|s| s.values.is_empty()) {
        warn!(series = %s.key, "series has no values");
    }
    Ok(())
}

/// Draw `x` along the bottom of `plot` and `y` along its left edge.
pub(crate) fn render_axes(doc: &mut Document, frame: &Frame, x: &Axis, y: &Axis, theme: &Theme) -> Result<()> {
    let xg = doc.select_or_append(frame.chart, "g", "x-axis")?;
    doc.set_attr(xg, "transform", format!("translate(0,{})", fmt_num(frame.plot.height())))?;
    x.render(doc, xg, theme)?;
    let yg = doc.select_or_append(frame.chart, "g", "y-axis")?;
    y.render(doc, yg, theme)?;
    Ok(())
}

/// One `g.series` per series key under `parent`, in data order.
pub(crate) fn join_series(doc: &mut Document, parent: NodeId, data: &[DataSeries]) -> Result<Vec<NodeId>> {
    let group = doc.select_or_append(parent, "g", "series-group")?;
    let keys: Vec<&str> = data.iter().map(|s| s.key.as_str()).collect();
    Ok(doc.join(group, "g", "series", &keys)?.nodes)
}

/// A chart component: chained configuration plus one render entry point.
pub trait Chart {
    fn options(&self) -> &ChartOptions;
    fn options_mut(&mut self) -> &mut ChartOptions;

    /// Render `data` into `container`, updating an earlier render in place.
    fn render(&mut self, doc: &mut Document, container: NodeId, data: &[DataSeries]) -> Result<()>;

    fn width(&self) -> f64 { self.options().width }
    fn height(&self) -> f64 { self.options().height }
    fn margin(&self) -> Insets { self.options().margin }
    fn theme(&self) -> &Theme { &self.options().theme }
    fn colors(&self) -> Option<&[Color]> { self.options().colors.as_deref() }
    fn dispatcher(&self) -> &Dispatcher { &self.options().dispatcher }

    fn set_width(&mut self, width: f64) -> &mut Self
    where
        Self: Sized,
    {
        self.options_mut().width = width;
        self
    }

    fn set_height(&mut self, height: f64) -> &mut Self
    where
        Self: Sized,
    {
        self.options_mut().height = height;
        self
    }

    fn set_margin(&mut self, margin: Insets) -> &mut Self
    where
        Self: Sized,
    {
        self.options_mut().margin = margin;
        self
    }

    fn set_theme(&mut self, theme: Theme) -> &mut Self
    where
        Self: Sized,
    {
        self.options_mut().theme = theme;
        self
    }

    fn set_colors(&mut self, colors: Vec<Color>) -> &mut Self
    where
        Self: Sized,
    {
        self.options_mut().colors = Some(colors);
        self
    }

    /// Share `dispatcher` (and its subscribers) with this chart.
    fn set_dispatcher(&mut self, dispatcher: Dispatcher) -> &mut Self
    where
        Self: Sized,
    {
        self.options_mut().dispatcher = dispatcher;
        self
    }

    fn on<F>(&mut self, event: CustomEvent, handler: F) -> &mut Self
    where
        Self: Sized,
        F: Fn(&Datum) + 'static,
    {
        self.options().dispatcher.on(event, handler);
        self
    }

    /// Deliver a pointer event to a rendered node; see [`Dispatcher::fire`].
    fn fire(&self, doc: &Document, target: NodeId, ev: DomEvent) -> Result<Vec<CustomEvent>> {
        self.options().dispatcher.fire(doc, target, ev)
    }
}
