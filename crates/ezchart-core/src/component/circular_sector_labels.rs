// File: crates/ezchart-core/src/component/circular_sector_labels.rs
// Summary: Sector labels laid out on a circular text path around a radial chart.

use std::f64::consts::TAU;

use tracing::trace;

use crate::axis::AxisScale;
use crate::dom::{fmt_num, Document, NodeId};
use crate::error::Result;
use crate::scale::{format_time_tick, LinearScale};
use crate::shape::circle_path;
use crate::theme::Theme;

/// Radius multiplier placing labels just outside the outermost ring.
const LABEL_RADIUS_FACTOR: f64 = 1.04;

#[derive(Clone, Debug, PartialEq)]
pub struct SectorTick {
    pub label: String,
    /// `startOffset` along the label path, in percent of the full circle.
    pub offset: f64,
}

#[derive(Clone, Debug)]
pub struct CircularSectorLabels {
    id: String,
    radius: f64,
    ticks: usize,
    scale: Option<AxisScale>,
    text_anchor: &'static str,
    theme: Theme,
}

impl Default for CircularSectorLabels {
    fn default() -> Self { Self::new() }
}

impl CircularSectorLabels {
    pub fn new() -> Self {
        Self {
            id: "sector-labels".into(),
            radius: 150.0,
            ticks: 10,
            scale: None,
            text_anchor: "start",
            theme: Theme::default(),
        }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn radius(&self) -> f64 { self.radius }
    pub fn scale(&self) -> Option<&AxisScale> { self.scale.as_ref() }
    pub fn text_anchor(&self) -> &'static str { self.text_anchor }

    /// Prefix of the `id` given to the label path; must be unique in the document.
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    pub fn set_radius(&mut self, radius: f64) -> &mut Self {
        self.radius = radius;
        self
    }

    pub fn set_ticks(&mut self, ticks: usize) -> &mut Self {
        self.ticks = ticks;
        self
    }

    /// Angular scale; its range is read as radians from 12 o'clock.
    pub fn set_scale(&mut self, scale: AxisScale) -> &mut Self {
        self.scale = Some(scale);
        self
    }

    pub fn set_text_anchor(&mut self, anchor: &'static str) -> &mut Self {
        self.text_anchor = anchor;
        self
    }

    pub fn set_theme(&mut self, theme: Theme) -> &mut Self {
        self.theme = theme;
        self
    }

    /// Labels with their path offsets. Continuous scales contribute their
    /// ticks (spread over `ticks - 1` intervals); band scales their domain.
    pub fn tick_data(&self) -> Vec<SectorTick> {
        let Some(scale) = self.scale.as_ref() else { return Vec::new() };
        let (labels, count, range) = match scale {
            AxisScale::Linear(s) => {
                let fmt = s.tick_format(self.ticks);
                let labels: Vec<String> = s.ticks(self.ticks).into_iter().map(fmt).collect();
                let n = labels.len().saturating_sub(1);
                (labels, n, s.range())
            }
            AxisScale::Time(s) => {
                let labels: Vec<String> = s.ticks(self.ticks).iter().map(format_time_tick).collect();
                let n = labels.len().saturating_sub(1);
                (labels, n, s.range())
            }
            AxisScale::Band(s) => (s.domain().to_vec(), s.domain().len(), s.range()),
        };
        let angle = LinearScale::new((0.0, count as f64), range);
        labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| SectorTick { label, offset: angle.scale(i as f64) / TAU * 100.0 })
            .collect()
    }

    pub fn render(&self, doc: &mut Document, group: NodeId) -> Result<()> {
        let path_id = format!("{}-path", self.id);
        let path = doc.select_or_append(group, "path", "label-path")?;
        doc.set_attr(path, "id", &path_id)?;
        doc.set_attr(path, "d", circle_path(self.radius * LABEL_RADIUS_FACTOR))?;
        doc.set_attr(path, "fill", "none")?;

        let ticks = self.tick_data();
        let keys: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        let join = doc.join(group, "text", "sector-label", &keys)?;
        for (tick, &text) in ticks.iter().zip(&join.nodes) {
            doc.set_attr(text, "font-size", format!("{}px", self.theme.font_size))?;
            doc.set_attr(text, "font-family", self.theme.font_family)?;
            doc.set_attr(text, "fill", self.theme.label)?;
            let span = doc.select_or_append(text, "textPath", "sector-label-path")?;
            doc.set_attr(span, "href", format!("#{path_id}"))?;
            doc.set_attr(span, "startOffset", format!("{}%", fmt_num(tick.offset)))?;
            doc.set_attr(span, "text-anchor", self.text_anchor)?;
            doc.set_text(span, tick.label.clone())?;
        }
        trace!(labels = join.nodes.len(), radius = self.radius, "circular sector labels");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::BandScale;

    #[test]
    fn band_offsets_split_the_circle_evenly() {
        let mut labels = CircularSectorLabels::new();
        labels.set_scale(AxisScale::Band(BandScale::new(["a", "b", "c", "d"], (0.0, TAU))));
        let offsets: Vec<f64> = labels.tick_data().iter().map(|t| t.offset).collect();
        for (got, want) in offsets.iter().zip([0.0, 25.0, 50.0, 75.0]) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
        assert_eq!(offsets.len(), 4);
    }

    #[test]
    fn linear_offsets_cover_ticks_minus_one_intervals() {
        let mut labels = CircularSectorLabels::new();
        labels.set_ticks(5).set_scale(AxisScale::Linear(LinearScale::new((0.0, 100.0), (0.0, TAU))));
        let ticks = labels.tick_data();
        // ticks 0, 20, 40, 60, 80, 100 over five intervals; the last lands on 100%
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[1].label, "20");
        assert!((ticks[1].offset - 20.0).abs() < 1e-9);
        assert!((ticks[5].offset - 100.0).abs() < 1e-9);
    }

    #[test]
    fn partial_range_scales_offsets() {
        let mut labels = CircularSectorLabels::new();
        labels.set_scale(AxisScale::Band(BandScale::new(["a", "b"], (0.0, TAU / 2.0))));
        let offsets: Vec<f64> = labels.tick_data().iter().map(|t| t.offset).collect();
        assert_eq!(offsets.len(), 2);
        assert!((offsets[1] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn render_places_text_paths() {
        let mut labels = CircularSectorLabels::new();
        labels.set_id("hm").set_radius(100.0).set_scale(AxisScale::Band(BandScale::new(["a", "b"], (0.0, TAU))));
        let mut doc = Document::new();
        let g = doc.append(doc.root(), "g").unwrap();
        labels.render(&mut doc, g).unwrap();

        let path = doc.select_child(g, "path", "label-path").unwrap();
        assert_eq!(doc.attr(path, "id"), Some("hm-path"));
        assert_eq!(doc.attr(path, "d"), Some(circle_path(104.0).as_str()));
        let spans = doc.select_all(g, "sector-label-path");
        assert_eq!(spans.len(), 2);
        assert_eq!(doc.attr(spans[1], "startOffset"), Some("50%"));
        assert_eq!(doc.text(spans[1]), Some("b"));
    }
}
