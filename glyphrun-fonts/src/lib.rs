//! Font loading and text shaping for glyphrun.
//!
//! This crate provides:
//! - Validation of raw font bytes and extraction of global metrics
//! - A cached codepoint to glyph id lookup
//! - HarfBuzz-based shaping of UTF-16 text via rustybuzz, split into runs by
//!   script, direction and feature set, with per-script policies
//!
//! # Architecture
//!
//! [`FontData`] owns the font bytes and everything derived from them at load
//! time. [`TextShaper`] holds the per-font shaping configuration and result
//! cache, and borrows a [`rustybuzz::Face`] from the `FontData` for each call.

mod error;
pub mod font_data;
mod metrics;
pub mod text_shaper;

// Re-export main types for convenience
pub use error::{FontError, Result};
pub use font_data::{FontData, OutlineFormat};
pub use metrics::FontMetrics;
pub use text_shaper::{
    Annotation, Annotations, FeatureSet, GlyphRecord, ScriptPolicy, ScriptTag, ShapingResult,
    TextDirection, TextShaper,
};
