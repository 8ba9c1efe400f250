//! Default values for font options.
//!
//! Used both by `FontOptions::default()` and as the fallback when a
//! recognized option carries a value of the wrong type.

use std::collections::BTreeMap;

/// Smallest accepted atlas page size in pixels.
pub const MIN_PAGE_SIZE: u32 = 64;
/// Largest accepted atlas page size in pixels (12-bit packed coordinates).
pub const MAX_PAGE_SIZE: u32 = 4096;

pub const MIN_RENDER_SIZE: f32 = 4.0;
pub const MAX_RENDER_SIZE: f32 = 512.0;

pub const MAX_MARGIN: u32 = 64;

pub fn hinting() -> bool {
    false // Atlas glyphs are sampled at arbitrary scales, so unhinted outlines by default
}

pub fn antialias() -> bool {
    true
}

pub fn default_script() -> Option<String> {
    None // Let the shaper guess from the text
}

pub fn features() -> BTreeMap<String, u32> {
    BTreeMap::new()
}

pub fn render_size() -> f32 {
    32.0 // Pixels per em
}

pub fn margin() -> u32 {
    2
}

pub fn page_size() -> u32 {
    1024
}

pub fn shape_cache_size() -> usize {
    256
}
