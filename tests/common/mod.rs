//! Shared integration test helpers for glyphrun.
//!
//! Include with `mod common;` at the top of a test file.

#![allow(dead_code)]

use glyphrun::{Engine, FontHandle, FontOptions};
use glyphrun_dev::TestFontBuilder;

/// Engine with the standard synthetic font loaded under `options`.
pub fn engine_with_font(options: FontOptions) -> (Engine, FontHandle) {
    let engine = Engine::new();
    let handle = engine
        .create_font(TestFontBuilder::standard().build(), "en-US", options)
        .expect("standard test font should load");
    (engine, handle)
}

pub fn engine_with_default_font() -> (Engine, FontHandle) {
    engine_with_font(FontOptions::default())
}

pub fn utf16(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

/// Small pages and a large render size, so a handful of glyphs needs more
/// than one page.
pub fn crowded_options() -> FontOptions {
    FontOptions::default()
        .with_page_size(64)
        .with_render_size(64.0)
        .with_margin(2)
}
