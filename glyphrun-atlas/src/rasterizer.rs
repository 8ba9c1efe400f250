//! Glyph bitmap generation.
//!
//! The atlas only needs two things from a rasterizer: an RGBA bitmap for a
//! glyph and the glyph's ink bounding box. [`SwashRasterizer`] provides both
//! from raw font bytes; tests substitute their own implementation.

use glyphrun_config::FontOptions;
use rustybuzz::ttf_parser;
use swash::FontRef;
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Format;

use crate::types::{GlyphBbox, GlyphId};

/// A rendered glyph bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizedGlyph {
    pub width: u32,
    pub height: u32,
    /// Horizontal offset from the pen position to the left edge of the bitmap
    pub left: i32,
    /// Vertical offset from the baseline to the top edge of the bitmap
    pub top: i32,
    /// RGBA8, row-major, `width * height * 4` bytes
    pub pixels: Vec<u8>,
    pub is_colored: bool,
}

pub trait GlyphRasterizer {
    /// Render `glyph`. `None` means the glyph has no image (e.g. a space).
    fn rasterize(&mut self, glyph: GlyphId) -> Option<RasterizedGlyph>;

    /// Ink bounding box in font units; all zero for glyphs without outlines.
    fn bounding_box(&self, glyph: GlyphId) -> GlyphBbox;
}

/// Rasterizer backed by swash, with bounding boxes read through ttf-parser.
pub struct SwashRasterizer<'a> {
    font: FontRef<'a>,
    face: ttf_parser::Face<'a>,
    context: ScaleContext,
    size: f32,
    hint: bool,
    antialias: bool,
}

impl<'a> SwashRasterizer<'a> {
    /// Returns `None` if either library cannot parse the font.
    pub fn new(data: &'a [u8], face_index: u32, options: &FontOptions) -> Option<Self> {
        let font = FontRef::from_index(data, face_index as usize)?;
        let face = ttf_parser::Face::parse(data, face_index).ok()?;
        Some(Self {
            font,
            face,
            context: ScaleContext::new(),
            size: options.render_size,
            hint: options.hinting,
            antialias: options.antialias,
        })
    }

    fn coverage(&self, mask: u8) -> u8 {
        if self.antialias {
            mask
        } else if mask > 127 {
            255
        } else {
            0
        }
    }
}

impl GlyphRasterizer for SwashRasterizer<'_> {
    fn rasterize(&mut self, glyph: GlyphId) -> Option<RasterizedGlyph> {
        let glyph_id = u16::try_from(glyph).ok()?;

        let mut scaler = self
            .context
            .builder(self.font)
            .size(self.size)
            .hint(self.hint)
            .build();

        // Color sources first so emoji fonts render as colored bitmaps; plain
        // text fonts fall through to Outline.
        let image = Render::new(&[
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::ColorOutline(0),
            Source::Outline,
        ])
        .format(Format::Alpha)
        .render(&mut scaler, glyph_id)?;

        let placement = image.placement;
        let (width, height) = (placement.width, placement.height);
        if width == 0 || height == 0 {
            return None;
        }

        let (pixels, is_colored) = match image.content {
            Content::Color => (image.data, true),
            Content::Mask => {
                let mut pixels = Vec::with_capacity(image.data.len() * 4);
                for &mask in &image.data {
                    pixels.extend_from_slice(&[255, 255, 255, self.coverage(mask)]);
                }
                (pixels, false)
            }
            Content::SubpixelMask => {
                let mut pixels = Vec::with_capacity(image.data.len());
                for rgba in image.data.chunks_exact(4) {
                    let mask = ((u16::from(rgba[0]) + u16::from(rgba[1]) + u16::from(rgba[2])) / 3)
                        as u8;
                    pixels.extend_from_slice(&[255, 255, 255, self.coverage(mask)]);
                }
                (pixels, false)
            }
        };

        log::trace!(
            "Rasterized glyph {} at {}px: {}x{} colored={}",
            glyph,
            self.size,
            width,
            height,
            is_colored
        );

        Some(RasterizedGlyph {
            width,
            height,
            left: placement.left,
            top: placement.top,
            pixels,
            is_colored,
        })
    }

    fn bounding_box(&self, glyph: GlyphId) -> GlyphBbox {
        let Ok(glyph_id) = u16::try_from(glyph) else {
            return GlyphBbox::default();
        };
        self.face
            .glyph_bounding_box(ttf_parser::GlyphId(glyph_id))
            .map(|rect| GlyphBbox::new(rect.x_min, rect.y_min, rect.x_max, rect.y_max))
            .unwrap_or_default()
    }
}
