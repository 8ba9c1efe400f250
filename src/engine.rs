//! The engine facade: every host-visible operation, keyed by font handle.
//!
//! The engine owns a [`HandleTable`] of [`LoadedFont`]s. Each operation
//! resolves its handle, locks that one font for the duration of the call and
//! releases it before returning, so work on different fonts proceeds in
//! parallel while calls on the same font are serialized.

use std::sync::Arc;

use glyphrun_atlas::{AtlasLocation, AtlasPageRef, GlyphBbox, GlyphId};
use glyphrun_config::FontOptions;
use glyphrun_fonts::{Annotations, FontMetrics, ShapingResult};

use crate::error::{EngineError, Result};
use crate::handle_table::{FontHandle, HandleTable};
use crate::loaded_font::LoadedFont;

#[derive(Default)]
pub struct Engine {
    fonts: HandleTable<LoadedFont>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a font from raw bytes.
    ///
    /// `locale` is a BCP 47 tag used as the shaping language; an empty or
    /// unparseable tag shapes without one. Fails with
    /// [`EngineError::InvalidFontData`] when the bytes are not a usable font.
    pub fn create_font(
        &self,
        bytes: impl Into<Arc<[u8]>>,
        locale: &str,
        options: FontOptions,
    ) -> Result<FontHandle> {
        let font = LoadedFont::load(bytes, locale, options).inspect_err(|e| {
            log::warn!("Rejected font data: {}", e);
        })?;
        let atlas_size = font.atlas().page_size();

        let handle = self.fonts.insert(font).ok_or(EngineError::TooManyFonts)?;

        log::info!(
            "Created font {} (atlas {}px, total: {})",
            handle,
            atlas_size,
            self.fonts.len()
        );
        Ok(handle)
    }

    /// Like [`Engine::create_font`], with options given as a JSON object.
    pub fn create_font_from_json(
        &self,
        bytes: impl Into<Arc<[u8]>>,
        locale: &str,
        options_json: &str,
    ) -> Result<FontHandle> {
        let options = FontOptions::from_json(options_json)?;
        self.create_font(bytes, locale, options)
    }

    /// Release a font. The handle is invalid afterwards, including for a
    /// second destroy. Atlas pages already handed out stay readable.
    pub fn destroy_font(&self, handle: FontHandle) -> Result<()> {
        self.fonts
            .remove(handle)
            .ok_or(EngineError::InvalidHandle(handle))?;
        log::info!("Destroyed font {} (remaining: {})", handle, self.fonts.len());
        Ok(())
    }

    /// Glyph id for a Unicode scalar value; 0 (.notdef) when unmapped.
    pub fn font_glyph_index(&self, handle: FontHandle, codepoint: u32) -> Result<u32> {
        self.with_font(handle, |font| font.glyph_index(codepoint))
    }

    pub fn font_metrics(&self, handle: FontHandle) -> Result<FontMetrics> {
        self.with_font(handle, |font| font.metrics())
    }

    /// Edge length of every atlas page in pixels.
    pub fn font_atlas_size(&self, handle: FontHandle) -> Result<u32> {
        self.with_font(handle, |font| font.atlas().page_size())
    }

    pub fn font_atlas_num_pages(&self, handle: FontHandle) -> Result<usize> {
        self.with_font(handle, |font| font.atlas().num_pages())
    }

    /// Snapshot of page `index`. Later placements do not alter a snapshot
    /// already returned; fetch the page again to see them.
    pub fn font_atlas_page(&self, handle: FontHandle, index: usize) -> Result<AtlasPageRef> {
        self.with_font(handle, |font| font.atlas().page(index))?
            .map_err(EngineError::from)
    }

    /// Atlas location of every glyph, indexed by glyph id. `None` for glyphs
    /// not placed yet.
    pub fn font_atlas_locations(
        &self,
        handle: FontHandle,
    ) -> Result<Vec<Option<AtlasLocation>>> {
        self.with_font(handle, |font| font.atlas().locations().to_vec())
    }

    /// Ink bounding boxes in font units, parallel to
    /// [`Engine::font_atlas_locations`].
    pub fn font_bboxes(&self, handle: FontHandle) -> Result<Vec<Option<GlyphBbox>>> {
        self.with_font(handle, |font| font.atlas().bboxes().to_vec())
    }

    /// Shape UTF-16 `text` into runs. Every glyph in the result has an atlas
    /// location by the time this returns.
    pub fn shape(
        &self,
        handle: FontHandle,
        text: &[u16],
        annotations: &Annotations,
    ) -> Result<Vec<ShapingResult>> {
        self.with_font(handle, |font| font.shape(text, annotations))?
    }

    /// Rasterize and place glyphs by id without shaping.
    pub fn prepare_glyphs(&self, handle: FontHandle, glyphs: &[GlyphId]) -> Result<()> {
        self.with_font(handle, |font| font.prepare_glyphs(glyphs))?
    }

    /// Number of live fonts.
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    pub fn contains(&self, handle: FontHandle) -> bool {
        self.fonts.contains(handle)
    }

    fn with_font<R>(
        &self,
        handle: FontHandle,
        f: impl FnOnce(&mut LoadedFont) -> R,
    ) -> Result<R> {
        let entry = self
            .fonts
            .get(handle)
            .ok_or(EngineError::InvalidHandle(handle))?;
        let mut font = entry.lock();
        Ok(f(&mut font))
    }
}
