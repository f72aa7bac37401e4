// File: crates/ezchart-core/src/component/circular_ring_labels.rs
// Summary: One label per ring, written along a circle through the middle of the ring's band.

use tracing::trace;

use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::scale::BandScale;
use crate::shape::circle_path;
use crate::theme::Theme;

#[derive(Clone, Debug)]
pub struct CircularRingLabels {
    id: String,
    scale: Option<BandScale>,
    text_anchor: &'static str,
    theme: Theme,
}

impl Default for CircularRingLabels {
    fn default() -> Self { Self::new() }
}

impl CircularRingLabels {
    pub fn new() -> Self {
        Self { id: "ring-labels".into(), scale: None, text_anchor: "start", theme: Theme::default() }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn scale(&self) -> Option<&BandScale> { self.scale.as_ref() }

    /// Prefix of the label path ids; must be unique in the document.
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    /// Radial band scale over ring keys.
    pub fn set_scale(&mut self, scale: BandScale) -> &mut Self {
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

    /// `(key, radius)` of each ring's label path.
    pub fn radii(&self) -> Vec<(String, f64)> {
        let Some(y) = self.scale.as_ref() else { return Vec::new() };
        y.domain()
            .iter()
            .filter_map(|k| y.scale(k).map(|r| (k.clone(), r + y.bandwidth() / 2.0)))
            .collect()
    }

    pub fn render(&self, doc: &mut Document, group: NodeId) -> Result<()> {
        let radii = self.radii();
        let keys: Vec<&str> = radii.iter().map(|(k, _)| k.as_str()).collect();
        let join = doc.join(group, "g", "ring-label", &keys)?;
        for (i, ((key, r), &node)) in radii.iter().zip(&join.nodes).enumerate() {
            let path_id = format!("{}-path-{i}", self.id);
            let path = doc.select_or_append(node, "path", "label-path")?;
            doc.set_attr(path, "id", &path_id)?;
            doc.set_attr(path, "d", circle_path(*r))?;
            doc.set_attr(path, "fill", "none")?;

            let text = doc.select_or_append(node, "text", "ring-label-text")?;
            doc.set_attr(text, "font-size", format!("{}px", self.theme.font_size))?;
            doc.set_attr(text, "font-family", self.theme.font_family)?;
            doc.set_attr(text, "fill", self.theme.label)?;
            let span = doc.select_or_append(text, "textPath", "ring-label-path")?;
            doc.set_attr(span, "href", format!("#{path_id}"))?;
            doc.set_attr(span, "startOffset", "0%")?;
            doc.set_attr(span, "text-anchor", self.text_anchor)?;
            doc.set_text(span, key.clone())?;
        }
        trace!(rings = join.nodes.len(), "circular ring labels");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_paths_run_through_band_middles() {
        let mut labels = CircularRingLabels::new();
        labels.set_scale(BandScale::new(["inner", "outer"], (20.0, 60.0)));
        assert_eq!(labels.radii(), vec![("inner".to_string(), 30.0), ("outer".to_string(), 50.0)]);

        let mut doc = Document::new();
        let g = doc.append(doc.root(), "g").unwrap();
        labels.render(&mut doc, g).unwrap();
        let paths = doc.select_all(g, "label-path");
        assert_eq!(doc.attr(paths[1], "d"), Some(circle_path(50.0).as_str()));
        assert_eq!(doc.attr(paths[1], "id"), Some("ring-labels-path-1"));
        let spans = doc.select_all(g, "ring-label-path");
        assert_eq!(doc.text(spans[0]), Some("inner"));
    }
}
