// File: crates/ezchart-render-skia/src/lib.rs
// Summary: Skia raster backend: loads chart SVG markup into Skia's SVG DOM and encodes PNG.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use ezchart_core::{Color, Document};
use skia_safe as skia;
use tracing::debug;

/// CPU rasterizer for rendered chart documents.
pub struct SkiaRenderer {
    font_mgr: skia::FontMgr,
}

impl Default for SkiaRenderer {
    fn default() -> Self { Self::new() }
}

fn to_skia(c: Color) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

impl SkiaRenderer {
    pub fn new() -> Self {
        Self { font_mgr: skia::FontMgr::default() }
    }

    /// Rasterize `svg` onto a `width` x `height` surface cleared to `background`
    /// (transparent when `None`) and return PNG bytes.
    pub fn render_svg_to_png_bytes(
        &self,
        svg: &str,
        width: i32,
        height: i32,
        background: Option<Color>,
    ) -> Result<Vec<u8>> {
        if width <= 0 || height <= 0 {
            anyhow::bail!("invalid surface size {width}x{height}");
        }
        let mut dom = skia::svg::Dom::from_bytes(svg.as_bytes(), self.font_mgr.clone())
            .map_err(|_| anyhow!("failed to parse svg markup"))?;
        dom.set_container_size((width as f32, height as f32));

        let mut surface = skia::surfaces::raster_n32_premul((width, height))
            .ok_or_else(|| anyhow!("failed to create raster surface"))?;
        let canvas = surface.canvas();
        canvas.clear(background.map(to_skia).unwrap_or(skia::Color::TRANSPARENT));
        dom.render(canvas);

        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow!("encode PNG failed"))?;
        debug!(width, height, bytes = data.len(), "rasterized svg");
        Ok(data.as_bytes().to_vec())
    }

    /// Rasterize the first chart mounted in `doc` at its own size.
    pub fn render_document(&self, doc: &Document) -> Result<Vec<u8>> {
        let svg = doc
            .find_first(doc.root(), "svg")
            .ok_or_else(|| anyhow!("document has no mounted chart"))?;
        let width = doc.attr_f64(svg, "width").context("svg has no numeric width")?;
        let height = doc.attr_f64(svg, "height").context("svg has no numeric height")?;
        self.render_svg_to_png_bytes(&doc.markup(svg), width.ceil() as i32, height.ceil() as i32, None)
    }

    /// Same as [`SkiaRenderer::render_document`], written to `path` (parent dirs created).
    pub fn render_document_to_png(&self, doc: &Document, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.render_document(doc)?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
