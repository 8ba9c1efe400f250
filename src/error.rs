//! Typed error type for the glyphrun engine.
//!
//! Every public [`Engine`](crate::Engine) operation returns [`EngineError`]
//! so callers at the boundary can map each variant to their own failure
//! signal.

use glyphrun_atlas::AtlasError;
use glyphrun_config::ConfigError;
use glyphrun_fonts::FontError;
use thiserror::Error;

use crate::handle_table::FontHandle;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The handle was never issued, or its font was destroyed.
    #[error("Invalid font handle {0}")]
    InvalidHandle(FontHandle),

    /// The font bytes could not be parsed or lack a required table.
    #[error("Invalid font data: {0}")]
    InvalidFontData(#[from] FontError),

    /// A JSON option object could not be decoded.
    #[error("Invalid font options: {0}")]
    InvalidOptions(#[from] ConfigError),

    /// An index (page or glyph id) past the end of its table.
    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A glyph does not fit on an atlas page, or the page limit was reached.
    #[error("Atlas capacity exceeded: {0}")]
    AtlasCapacityExceeded(AtlasError),

    /// The rasterizer produced a bitmap the atlas cannot store.
    #[error("Glyph rasterization failed: {0}")]
    Rasterization(AtlasError),

    /// Every addressable handle slot is in use.
    #[error("Font handle space exhausted")]
    TooManyFonts,
}

impl From<AtlasError> for EngineError {
    fn from(e: AtlasError) -> Self {
        match e {
            AtlasError::GlyphOutOfRange { glyph, num_glyphs } => EngineError::IndexOutOfRange {
                index: glyph as usize,
                len: num_glyphs,
            },
            AtlasError::PageOutOfRange { index, num_pages } => EngineError::IndexOutOfRange {
                index,
                len: num_pages,
            },
            AtlasError::CapacityExceeded { .. } | AtlasError::TooManyPages { .. } => {
                EngineError::AtlasCapacityExceeded(e)
            }
            AtlasError::MalformedBitmap { .. } => EngineError::Rasterization(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
