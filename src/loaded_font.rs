//! A font as held by the engine: parsed data, shaper and atlas together.

use std::sync::Arc;

use glyphrun_atlas::{AtlasError, GlyphAtlas, GlyphId, SwashRasterizer};
use glyphrun_config::FontOptions;
use glyphrun_fonts::{Annotations, FontData, FontError, FontMetrics, ShapingResult, TextShaper};

use crate::error::Result;

pub struct LoadedFont {
    font: FontData,
    options: FontOptions,
    shaper: TextShaper,
    atlas: GlyphAtlas,
}

impl LoadedFont {
    /// Parse `bytes` (face 0) and set up an empty atlas. Options are
    /// validated here and fixed for the life of the font.
    pub fn load(
        bytes: impl Into<Arc<[u8]>>,
        locale: &str,
        options: FontOptions,
    ) -> std::result::Result<Self, FontError> {
        let options = options.validate();
        let font = FontData::new(bytes, 0)?;
        let shaper = TextShaper::new(&options, locale);
        let atlas = GlyphAtlas::new(usize::from(font.num_glyphs()), &options);

        Ok(Self {
            font,
            options,
            shaper,
            atlas,
        })
    }

    pub fn metrics(&self) -> FontMetrics {
        self.font.metrics()
    }

    pub fn glyph_index(&mut self, codepoint: u32) -> u32 {
        self.font.glyph_index(codepoint)
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Shape `text` and place every glyph it produced in the atlas before
    /// returning, so callers can draw the result straight away.
    pub fn shape(
        &mut self,
        text: &[u16],
        annotations: &Annotations,
    ) -> Result<Vec<ShapingResult>> {
        let Self { font, shaper, .. } = self;
        let face = font.shaping_face()?;
        let runs = shaper.shape(&face, text, annotations);

        self.place(runs.iter().flat_map(|run| run.glyphs.iter().map(|g| g.glyph_id)))?;
        Ok(runs.as_ref().clone())
    }

    /// Rasterize and pack `glyphs` ahead of any shaping call.
    pub fn prepare_glyphs(&mut self, glyphs: &[GlyphId]) -> Result<()> {
        let num_glyphs = self.atlas.num_glyphs();
        if let Some(&glyph) = glyphs.iter().find(|&&g| g as usize >= num_glyphs) {
            return Err(AtlasError::GlyphOutOfRange { glyph, num_glyphs }.into());
        }
        self.place(glyphs.iter().copied())
    }

    fn place(&mut self, glyphs: impl IntoIterator<Item = GlyphId>) -> Result<()> {
        let pending: Vec<GlyphId> = glyphs
            .into_iter()
            .filter(|&g| self.atlas.location(g).is_none())
            .collect();
        if pending.is_empty() {
            return Ok(());
        }

        let Self {
            font,
            options,
            atlas,
            ..
        } = self;
        // swash only refuses data that ttf-parser accepted when it has no usable outlines
        let mut rasterizer = SwashRasterizer::new(font.data(), font.face_index(), options)
            .ok_or(FontError::MissingTable("glyf"))?;
        atlas.ensure_all(pending, &mut rasterizer)?;
        Ok(())
    }
}
