//! Error types for glyph atlas operations.

use thiserror::Error;

use crate::types::GlyphId;

/// Errors raised while placing glyphs or reading atlas pages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AtlasError {
    /// A glyph bitmap (including its margin) is larger than a page.
    #[error(
        "Glyph {glyph} needs {width}x{height} pixels but atlas pages are {page_size}x{page_size}"
    )]
    CapacityExceeded {
        glyph: GlyphId,
        width: u32,
        height: u32,
        page_size: u32,
    },

    /// The page index limit of the packed location encoding was reached.
    #[error("Atlas page limit of {limit} pages reached")]
    TooManyPages { limit: usize },

    /// The rasterizer returned a pixel buffer that does not match its
    /// declared size.
    #[error("Glyph {glyph} bitmap is {width}x{height} but has {len} bytes of RGBA data")]
    MalformedBitmap {
        glyph: GlyphId,
        width: u32,
        height: u32,
        len: usize,
    },

    /// A glyph id past the end of the font's glyph table.
    #[error("Glyph {glyph} out of range (font has {num_glyphs} glyphs)")]
    GlyphOutOfRange { glyph: GlyphId, num_glyphs: usize },

    /// A page index at or past the current page count.
    #[error("Atlas page {index} out of range ({num_pages} pages)")]
    PageOutOfRange { index: usize, num_pages: usize },
}

pub type Result<T> = std::result::Result<T, AtlasError>;
