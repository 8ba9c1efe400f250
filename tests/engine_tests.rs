//! Tests for the engine's font lifecycle
//!
//! Covers handle issue and release, rejection of bad font data, option
//! decoding at creation, metrics and codepoint lookup, and use of one engine
//! from several threads.

mod common;

use common::{engine_with_default_font, utf16};
use glyphrun::{Annotations, Engine, EngineError, FontHandle, FontOptions};
use glyphrun_dev::{TestFontBuilder, gid, metrics};

// ============================================================================
// Handle lifecycle
// ============================================================================

#[test]
fn test_create_and_destroy() {
    let (engine, handle) = engine_with_default_font();
    assert_eq!(engine.font_count(), 1);
    assert!(engine.contains(handle));
    assert_ne!(handle.to_raw(), 0, "Handles are never zero");

    engine.destroy_font(handle).unwrap();
    assert_eq!(engine.font_count(), 0);
    assert!(!engine.contains(handle));
}

#[test]
fn test_double_destroy_fails() {
    let (engine, handle) = engine_with_default_font();
    engine.destroy_font(handle).unwrap();
    assert!(matches!(
        engine.destroy_font(handle),
        Err(EngineError::InvalidHandle(h)) if h == handle
    ));
}

#[test]
fn test_destroyed_handle_fails_every_operation() {
    let (engine, handle) = engine_with_default_font();
    engine.destroy_font(handle).unwrap();

    let invalid = |e: EngineError| matches!(e, EngineError::InvalidHandle(_));
    assert!(invalid(engine.font_glyph_index(handle, 'f' as u32).unwrap_err()));
    assert!(invalid(engine.font_metrics(handle).unwrap_err()));
    assert!(invalid(engine.font_atlas_size(handle).unwrap_err()));
    assert!(invalid(engine.font_atlas_num_pages(handle).unwrap_err()));
    assert!(invalid(engine.font_atlas_page(handle, 0).unwrap_err()));
    assert!(invalid(engine.font_atlas_locations(handle).unwrap_err()));
    assert!(invalid(engine.font_bboxes(handle).unwrap_err()));
    assert!(invalid(
        engine
            .shape(handle, &utf16("fi"), &Annotations::new())
            .unwrap_err()
    ));
    assert!(invalid(engine.prepare_glyphs(handle, &[1]).unwrap_err()));
}

#[test]
fn test_never_issued_handle() {
    let engine = Engine::new();
    let bogus = FontHandle::from_raw(0x0000_0001_0000_0001).unwrap();
    assert!(!engine.contains(bogus));
    assert!(matches!(
        engine.font_metrics(bogus),
        Err(EngineError::InvalidHandle(_))
    ));
}

#[test]
fn test_handles_are_not_reissued() {
    let engine = Engine::new();
    let bytes = TestFontBuilder::standard().build();
    let mut seen = Vec::new();

    for _ in 0..5 {
        let handle = engine
            .create_font(bytes.clone(), "en", FontOptions::default())
            .unwrap();
        assert!(!seen.contains(&handle), "Handle {} was reissued", handle);
        seen.push(handle);
        engine.destroy_font(handle).unwrap();
    }
    assert_eq!(engine.font_count(), 0);
}

#[test]
fn test_fonts_are_independent() {
    let engine = Engine::new();
    let bytes = TestFontBuilder::standard().build();
    let a = engine
        .create_font(bytes.clone(), "en", FontOptions::default())
        .unwrap();
    let b = engine
        .create_font(bytes, "en", FontOptions::default().with_page_size(256))
        .unwrap();

    assert_eq!(engine.font_atlas_size(a).unwrap(), 1024);
    assert_eq!(engine.font_atlas_size(b).unwrap(), 256);

    engine.destroy_font(a).unwrap();
    assert!(engine.contains(b), "Destroying one font leaves others alone");
    assert_eq!(engine.font_atlas_size(b).unwrap(), 256);
}

// ============================================================================
// Font data validation
// ============================================================================

#[test]
fn test_garbage_bytes_rejected() {
    let (engine, _handle) = engine_with_default_font();
    let result = engine.create_font(vec![0xAB; 64], "en", FontOptions::default());
    assert!(matches!(result, Err(EngineError::InvalidFontData(_))));
    assert_eq!(engine.font_count(), 1, "Failed creation adds no font");
}

#[test]
fn test_empty_bytes_rejected() {
    let engine = Engine::new();
    let result = engine.create_font(Vec::new(), "en", FontOptions::default());
    assert!(matches!(result, Err(EngineError::InvalidFontData(_))));
}

#[test]
fn test_missing_table_rejected() {
    let engine = Engine::new();
    for tag in [b"cmap", b"hmtx", b"glyf", b"hhea"] {
        let bytes = TestFontBuilder::standard().without_table(tag).build();
        let result = engine.create_font(bytes, "en", FontOptions::default());
        assert!(
            matches!(result, Err(EngineError::InvalidFontData(_))),
            "Font without {} should be rejected",
            String::from_utf8_lossy(tag)
        );
    }
    assert_eq!(engine.font_count(), 0);
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_options_from_json() {
    let engine = Engine::new();
    let handle = engine
        .create_font_from_json(
            TestFontBuilder::standard().build(),
            "en",
            r#"{"page_size": 512, "some_future_option": true}"#,
        )
        .unwrap();
    assert_eq!(engine.font_atlas_size(handle).unwrap(), 512);
}

#[test]
fn test_options_json_must_be_object() {
    let engine = Engine::new();
    let result = engine.create_font_from_json(TestFontBuilder::standard().build(), "en", "[1]");
    assert!(matches!(result, Err(EngineError::InvalidOptions(_))));
    assert_eq!(engine.font_count(), 0);
}

#[test]
fn test_out_of_range_options_are_clamped() {
    let engine = Engine::new();
    let handle = engine
        .create_font(
            TestFontBuilder::standard().build(),
            "en",
            FontOptions::default().with_page_size(1_000_000),
        )
        .unwrap();
    assert_eq!(engine.font_atlas_size(handle).unwrap(), 4096);
}

#[test]
fn test_locale_variants_accepted() {
    let engine = Engine::new();
    let bytes = TestFontBuilder::standard().build();
    for locale in ["en-US", "en_US", "", "not a locale!"] {
        let handle = engine
            .create_font(bytes.clone(), locale, FontOptions::default())
            .unwrap();
        let runs = engine
            .shape(handle, &utf16("fi"), &Annotations::new())
            .unwrap();
        assert_eq!(runs[0].glyphs[0].glyph_id, u32::from(gid::FI));
    }
}

// ============================================================================
// Metrics and glyph lookup
// ============================================================================

#[test]
fn test_font_metrics() {
    let (engine, handle) = engine_with_default_font();
    let m = engine.font_metrics(handle).unwrap();

    assert_eq!(m.units_per_em, metrics::UNITS_PER_EM);
    assert_eq!(m.ascender, metrics::ASCENDER);
    assert_eq!(m.descender, metrics::DESCENDER);
    assert_eq!(m.line_gap, metrics::LINE_GAP);
    assert_eq!(m.height, metrics::ASCENDER - metrics::DESCENDER);
    assert_eq!(m.underline_position, metrics::UNDERLINE_POSITION);
    assert_eq!(m.underline_thickness, metrics::UNDERLINE_THICKNESS);
}

#[test]
fn test_glyph_index() {
    let (engine, handle) = engine_with_default_font();
    assert_eq!(
        engine.font_glyph_index(handle, 'f' as u32).unwrap(),
        u32::from(gid::F)
    );
    assert_eq!(
        engine.font_glyph_index(handle, 0x1F600).unwrap(),
        u32::from(gid::GRINNING)
    );
    assert_eq!(engine.font_glyph_index(handle, 'A' as u32).unwrap(), 0);
}

#[test]
fn test_glyph_index_invalid_scalars() {
    let (engine, handle) = engine_with_default_font();
    assert_eq!(engine.font_glyph_index(handle, 0xD800).unwrap(), 0);
    assert_eq!(engine.font_glyph_index(handle, 0x11_0000).unwrap(), 0);
    assert_eq!(engine.font_glyph_index(handle, u32::MAX).unwrap(), 0);
}

#[test]
fn test_cmap_entry_past_glyph_table() {
    let engine = Engine::new();
    let bytes = TestFontBuilder::standard().map('o', 200).build();
    let handle = engine
        .create_font(bytes, "en", FontOptions::default())
        .unwrap();

    assert_eq!(engine.font_glyph_index(handle, 'o' as u32).unwrap(), 0);

    let runs = engine
        .shape(handle, &utf16("fo"), &Annotations::new())
        .unwrap();
    let ids: Vec<u32> = runs[0].glyphs.iter().map(|g| g.glyph_id).collect();
    assert_eq!(ids, [u32::from(gid::F), 0]);

    let locations = engine.font_atlas_locations(handle).unwrap();
    assert!(locations[0].is_some(), ".notdef stands in and is placed");
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_fonts() {
    let engine = Engine::new();
    let bytes = TestFontBuilder::standard().build();
    let shared = engine
        .create_font(bytes.clone(), "en", FontOptions::default())
        .unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let engine = &engine;
            let bytes = bytes.clone();
            scope.spawn(move || {
                let own = engine
                    .create_font(bytes, "en", FontOptions::default())
                    .unwrap();
                for handle in [own, shared] {
                    let runs = engine
                        .shape(handle, &utf16("fi o"), &Annotations::new())
                        .unwrap();
                    assert_eq!(runs[0].glyphs.len(), 3);
                }
                engine.destroy_font(own).unwrap();
            });
        }
    });

    assert_eq!(engine.font_count(), 1);
    let placed = engine
        .font_atlas_locations(shared)
        .unwrap()
        .iter()
        .filter(|l| l.is_some())
        .count();
    assert_eq!(placed, 3, "Concurrent shaping places each glyph once");
}
