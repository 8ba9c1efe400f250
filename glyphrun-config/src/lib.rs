//! Configuration for the glyphrun engine.
//!
//! This crate provides the option set a host attaches to a font when it is
//! created:
//!
//! - Rasterization settings (render size, hinting, anti-aliasing)
//! - Atlas geometry (page size, glyph margin)
//! - Shaping defaults (fallback script, OpenType feature overrides)
//! - Shaping cache size
//!
//! Options are usually handed over as a JSON object; see
//! [`FontOptions::from_json`] for the decoding rules.

pub mod defaults;
mod error;
mod options;

pub use error::ConfigError;
pub use options::{FontOptions, is_feature_tag, normalize_script_tag};
