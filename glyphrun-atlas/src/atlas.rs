//! Per-font glyph atlas.
//!
//! Glyphs move from "not rasterized" to "placed" exactly once and are never
//! evicted or moved, so every [`AtlasLocation`] handed out stays valid for the
//! life of the atlas. Pages are allocated on demand and never removed.

use glyphrun_config::FontOptions;
use image::RgbaImage;

use crate::error::{AtlasError, Result};
use crate::page::{AtlasPage, AtlasPageRef};
use crate::rasterizer::GlyphRasterizer;
use crate::types::{AtlasLocation, GlyphBbox, GlyphId, MAX_PACKED_EXTENT};

/// The packed location format stores the page index in 16 bits.
const MAX_PAGES: usize = u16::MAX as usize + 1;

pub struct GlyphAtlas {
    page_size: u32,
    margin: u32,
    pages: Vec<AtlasPage>,
    locations: Vec<Option<AtlasLocation>>,
    bboxes: Vec<Option<GlyphBbox>>,
    placed: usize,
}

impl GlyphAtlas {
    /// Create an atlas for a font with `num_glyphs` glyphs, using the page
    /// size and margin from `options`. The first page is allocated up front.
    pub fn new(num_glyphs: usize, options: &FontOptions) -> Self {
        Self::with_geometry(num_glyphs, options.page_size, options.margin)
    }

    pub fn with_geometry(num_glyphs: usize, page_size: u32, margin: u32) -> Self {
        let mut atlas = Self {
            page_size,
            margin,
            pages: Vec::new(),
            locations: vec![None; num_glyphs],
            bboxes: vec![None; num_glyphs],
            placed: 0,
        };
        atlas.add_page();
        atlas
    }

    /// Make sure `glyph` has a location, rasterizing and packing it if needed.
    pub fn ensure_placed(
        &mut self,
        glyph: GlyphId,
        rasterizer: &mut dyn GlyphRasterizer,
    ) -> Result<AtlasLocation> {
        let slot = self.slot(glyph)?;
        if let Some(location) = self.locations[slot] {
            return Ok(location);
        }

        let bbox = rasterizer.bounding_box(glyph);
        let location = match rasterizer.rasterize(glyph) {
            Some(bitmap) if bitmap.width > 0 && bitmap.height > 0 => {
                let (width, height) = (bitmap.width, bitmap.height);
                let padded_w = width + 2 * self.margin;
                let padded_h = height + 2 * self.margin;
                if padded_w > self.page_size
                    || padded_h > self.page_size
                    || width > MAX_PACKED_EXTENT
                    || height > MAX_PACKED_EXTENT
                {
                    return Err(AtlasError::CapacityExceeded {
                        glyph,
                        width: padded_w,
                        height: padded_h,
                        page_size: self.page_size,
                    });
                }

                let len = bitmap.pixels.len();
                let image = RgbaImage::from_raw(width, height, bitmap.pixels).ok_or(
                    AtlasError::MalformedBitmap {
                        glyph,
                        width,
                        height,
                        len,
                    },
                )?;

                let (page, x, y) = self.allocate(glyph, padded_w, padded_h)?;
                let (x, y) = (x + self.margin, y + self.margin);
                self.pages[page].blit(x, y, &image);
                AtlasLocation {
                    x: x as u16,
                    y: y as u16,
                    width: width as u16,
                    height: height as u16,
                    page: page as u16,
                }
            }
            // Nothing to draw: a zero-sized location that takes no space.
            _ => AtlasLocation {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
                page: (self.pages.len() - 1) as u16,
            },
        };

        log::trace!("Placed glyph {} at {:?}", glyph, location);
        self.locations[slot] = Some(location);
        self.bboxes[slot] = Some(bbox);
        self.placed += 1;
        Ok(location)
    }

    /// Place every glyph in `glyphs`, stopping at the first failure.
    pub fn ensure_all(
        &mut self,
        glyphs: impl IntoIterator<Item = GlyphId>,
        rasterizer: &mut dyn GlyphRasterizer,
    ) -> Result<()> {
        for glyph in glyphs {
            self.ensure_placed(glyph, rasterizer)?;
        }
        Ok(())
    }

    /// Find room for a padded rectangle, trying each page in order and
    /// opening a new page when none has space.
    fn allocate(&mut self, glyph: GlyphId, width: u32, height: u32) -> Result<(usize, u32, u32)> {
        for (index, page) in self.pages.iter_mut().enumerate() {
            if let Some((x, y)) = page.packer.allocate(width, height) {
                return Ok((index, x, y));
            }
        }
        if self.pages.len() >= MAX_PAGES {
            return Err(AtlasError::TooManyPages { limit: MAX_PAGES });
        }
        let index = self.add_page();
        match self.pages[index].packer.allocate(width, height) {
            Some((x, y)) => Ok((index, x, y)),
            None => Err(AtlasError::CapacityExceeded {
                glyph,
                width,
                height,
                page_size: self.page_size,
            }),
        }
    }

    fn add_page(&mut self) -> usize {
        let index = self.pages.len();
        self.pages.push(AtlasPage::new(self.page_size));
        log::debug!(
            "Allocated atlas page {} ({}x{})",
            index,
            self.page_size,
            self.page_size
        );
        index
    }

    fn slot(&self, glyph: GlyphId) -> Result<usize> {
        let slot = glyph as usize;
        if slot < self.locations.len() {
            Ok(slot)
        } else {
            Err(AtlasError::GlyphOutOfRange {
                glyph,
                num_glyphs: self.locations.len(),
            })
        }
    }

    /// Width and height of every page in pixels.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    pub fn num_pages(&self) -> usize {
        self.pages.len()
    }

    /// Snapshot of page `index`.
    pub fn page(&self, index: usize) -> Result<AtlasPageRef> {
        self.pages
            .get(index)
            .map(AtlasPage::snapshot)
            .ok_or(AtlasError::PageOutOfRange {
                index,
                num_pages: self.pages.len(),
            })
    }

    pub fn location(&self, glyph: GlyphId) -> Option<AtlasLocation> {
        self.locations.get(glyph as usize).copied().flatten()
    }

    pub fn bbox(&self, glyph: GlyphId) -> Option<GlyphBbox> {
        self.bboxes.get(glyph as usize).copied().flatten()
    }

    /// Location table indexed by glyph id; `None` for glyphs not yet placed.
    pub fn locations(&self) -> &[Option<AtlasLocation>] {
        &self.locations
    }

    /// Bounding boxes, parallel to [`GlyphAtlas::locations`].
    pub fn bboxes(&self) -> &[Option<GlyphBbox>] {
        &self.bboxes
    }

    pub fn num_glyphs(&self) -> usize {
        self.locations.len()
    }

    /// Number of glyphs placed so far.
    pub fn placed_count(&self) -> usize {
        self.placed
    }
}
