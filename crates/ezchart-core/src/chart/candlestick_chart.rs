// File: crates/ezchart-core/src/chart/candlestick_chart.rs
// Summary: OHLC candlestick chart over a padded time axis and a nice low..high price axis.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::axis::{Axis, AxisScale};
use crate::chart::{ensure_data, join_series, render_axes, Chart, ChartOptions};
use crate::component::candle_sticks::{up_down_colors, DEFAULT_CANDLE_PADDING};
use crate::component::{CandleSticks, ColorScale};
use crate::data::DataSeries;
use crate::dom::{Document, NodeId};
use crate::error::{ChartError, Result};
use crate::scale::{LinearScale, TimeScale};
use crate::transform::DataTransform;

#[derive(Clone, Debug)]
pub struct CandlestickChart {
    options: ChartOptions,
    candle_padding: f64,
    x_label: String,
    y_label: String,
    y_ticks: usize,
    user_color_scale: Option<ColorScale>,
    // retained from the last render
    x_scale: Option<TimeScale>,
    y_scale: Option<LinearScale>,
    color_scale: Option<ColorScale>,
}

impl Default for CandlestickChart {
    fn default() -> Self { Self::new() }
}

impl CandlestickChart {
    pub fn new() -> Self {
        Self {
            options: ChartOptions::default(),
            candle_padding: DEFAULT_CANDLE_PADDING,
            x_label: String::new(),
            y_label: String::new(),
            y_ticks: 10,
            user_color_scale: None,
            x_scale: None,
            y_scale: None,
            color_scale: None,
        }
    }

    pub fn candle_padding(&self) -> f64 { self.candle_padding }
    pub fn x_scale(&self) -> Option<&TimeScale> { self.x_scale.as_ref() }
    pub fn y_scale(&self) -> Option<&LinearScale> { self.y_scale.as_ref() }
    pub fn color_scale(&self) -> Option<&ColorScale> { self.color_scale.as_ref() }

    pub fn set_candle_padding(&mut self, padding: f64) -> &mut Self {
        self.candle_padding = padding;
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

    /// Colors keyed `up` and `down`.
    pub fn set_color_scale(&mut self, scale: ColorScale) -> &mut Self {
        self.user_color_scale = Some(scale);
        self
    }

    fn candle_colors(&self) -> ColorScale {
        if let Some(user) = &self.user_color_scale {
            return user.clone();
        }
        let theme = &self.options.theme;
        match self.options.colors.as_deref() {
            Some([up, down, ..]) => up_down_colors(*up, *down),
            _ => up_down_colors(theme.candle_up, theme.candle_down),
        }
    }
}

/// Smallest gap between distinct instants, defaulting to one day.
fn period(times: &mut [DateTime<Utc>]) -> Duration {
    times.sort();
    times
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| *d > Duration::zero())
        .min()
        .unwrap_or_else(|| Duration::days(1))
}

impl Chart for CandlestickChart {
    fn options(&self) -> &ChartOptions { &self.options }
    fn options_mut(&mut self) -> &mut ChartOptions { &mut self.options }

    fn render(&mut self, doc: &mut Document, container: NodeId, data: &[DataSeries]) -> Result<()> {
        ensure_data(data)?;
        let plot = self.options.plot_rect()?;
        let (w, h) = (plot.width(), plot.height());
        let summary = DataTransform::new(data).summary();

        let mut times = Vec::new();
        for s in data {
            for v in &s.values {
                times.push(v.key.as_time()?);
            }
        }
        let step = period(&mut times);
        let (first, last) = match (times.first(), times.last()) {
            (Some(a), Some(b)) => (*a, *b),
            _ => return Err(ChartError::NoData),
        };
        let x = TimeScale::new((first, last), (0.0, w)).padded(step, 1);

        let (Some(low), Some(high)) = (summary.low_min, summary.high_max) else {
            let (series, index) = data
                .iter()
                .find_map(|s| s.values.iter().position(|v| !v.has_ohlc()).map(|i| (s.key.as_str(), i)))
                .unwrap_or(("", 0));
            return Err(ChartError::invalid_value(series, index, "missing open/high/low/close"));
        };
        let y = LinearScale::new((low, high), (h, 0.0)).nice(self.y_ticks);
        let colors = self.candle_colors();

        let mut candles = CandleSticks::new();
        candles
            .set_width(w)
            .set_height(h)
            .set_padding(self.candle_padding)
            .set_slot_width(x.scale(&(first + step)) - x.scale(&first))
            .set_x_scale(AxisScale::Time(x))
            .set_y_scale(y)
            .set_color_scale(colors.clone());
        let layouts = data.iter().map(|s| candles.layout(s)).collect::<Result<Vec<_>>>()?;

        let frame = self.options.mount(doc, container, "candlestick-chart")?;
        let x_axis = Axis::bottom(AxisScale::Time(x)).with_label(self.x_label.clone());
        let y_axis = Axis::left(AxisScale::Linear(y)).with_ticks(self.y_ticks).with_label(self.y_label.clone());
        render_axes(doc, &frame, &x_axis, &y_axis, &self.options.theme)?;

        let groups = join_series(doc, frame.chart, data)?;
        for ((series, layout), &group) in data.iter().zip(&layouts).zip(&groups) {
            candles.draw(doc, group, series, layout)?;
        }

        debug!(
            series = data.len(),
            candles = times.len(),
            period_secs = step.num_seconds(),
            "candlestick chart rendered"
        );
        self.x_scale = Some(x);
        self.y_scale = Some(y);
        self.color_scale = Some(colors);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataValue;
    use crate::types::Insets;
    use chrono::TimeZone;

    fn week() -> Vec<DataSeries> {
        vec![DataSeries::new(
            "ACME",
            vec![
                DataValue::candle("2024-03-04", 10.0, 14.0, 9.0, 13.0),
                DataValue::candle("2024-03-05", 13.0, 13.5, 11.0, 11.5),
                DataValue::candle("2024-03-06", 11.5, 16.5, 11.0, 16.0),
            ],
        )]
    }

    #[test]
    fn x_domain_is_padded_by_one_period() {
        let mut chart = CandlestickChart::new();
        let mut doc = Document::new();
        let root = doc.root();
        chart.render(&mut doc, root, &week()).unwrap();
        let (d0, d1) = chart.x_scale().unwrap().domain();
        assert_eq!(d0, Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap());
        assert_eq!(d1, Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap());
        assert_eq!(chart.y_scale().unwrap().domain(), (9.0, 17.0));
    }

    #[test]
    fn candles_are_classified() {
        let mut chart = CandlestickChart::new();
        let mut doc = Document::new();
        let root = doc.root();
        chart.render(&mut doc, root, &week()).unwrap();
        assert_eq!(doc.select_all(root, "up-day").len(), 2);
        assert_eq!(doc.select_all(root, "down-day").len(), 1);
    }

    #[test]
    fn plain_values_are_rejected() {
        let data = vec![DataSeries::new("ACME", vec![DataValue::new("2024-03-04", 1.0)])];
        let mut doc = Document::new();
        let root = doc.root();
        let err = CandlestickChart::new().render(&mut doc, root, &data).unwrap_err();
        assert!(matches!(err, ChartError::InvalidValue { .. }));
    }

    #[test]
    fn period_is_smallest_gap() {
        let t = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
        assert_eq!(period(&mut [t(5), t(1), t(3), t(3)]), Duration::days(2));
        assert_eq!(period(&mut [t(1)]), Duration::days(1));
    }

    #[test]
    fn neighbouring_bodies_leave_a_gap() {
        let mut chart = CandlestickChart::new();
        chart.set_width(300.0).set_margin(Insets::uniform(0));
        let mut doc = Document::new();
        let root = doc.root();
        chart.render(&mut doc, root, &week()).unwrap();

        // four day slots over 300px, bodies take 0.7 of each
        let bodies = doc.select_all(root, "body");
        assert_eq!(bodies.len(), 3);
        let left = |n| doc.attr_f64(n, "x").unwrap();
        let width = |n| doc.attr_f64(n, "width").unwrap();
        assert!((width(bodies[0]) - 75.0 * 0.7).abs() < 1e-6);
        for pair in bodies.windows(2) {
            assert!(left(pair[0]) + width(pair[0]) < left(pair[1]));
        }
    }
}
