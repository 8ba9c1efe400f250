//! Glyph atlas for glyphrun.
//!
//! Rasterizes glyphs on demand and shelf-packs the bitmaps into fixed-size
//! square RGBA pages, growing to more pages as needed. Placement is permanent:
//! there is no eviction and no compaction.

mod atlas;
mod error;
mod packer;
mod page;
mod rasterizer;
mod types;

pub use atlas::GlyphAtlas;
pub use error::{AtlasError, Result};
pub use packer::ShelfPacker;
pub use page::AtlasPageRef;
pub use rasterizer::{GlyphRasterizer, RasterizedGlyph, SwashRasterizer};
pub use types::{AtlasLocation, GlyphBbox, GlyphId, MAX_PACKED_EXTENT};
