//! Tests for UTF-16 shaping: runs, ligatures, clusters and caching.

use std::collections::BTreeMap;
use std::sync::Arc;

use glyphrun_config::FontOptions;
use glyphrun_dev::{TestFontBuilder, gid};
use glyphrun_fonts::{
    Annotation, Annotations, FontData, ScriptTag, ShapingResult, TextDirection, TextShaper,
};

fn utf16(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

fn shape_with(
    options: &FontOptions,
    text: &[u16],
    annotations: &Annotations,
) -> Arc<Vec<ShapingResult>> {
    let font = FontData::new(TestFontBuilder::standard().build(), 0).unwrap();
    let face = font.shaping_face().unwrap();
    let mut shaper = TextShaper::new(options, "en-US");
    shaper.shape(&face, text, annotations)
}

fn shape(text: &str) -> Arc<Vec<ShapingResult>> {
    shape_with(&FontOptions::default(), &utf16(text), &Annotations::new())
}

fn glyph_ids(result: &ShapingResult) -> Vec<u32> {
    result.glyphs.iter().map(|g| g.glyph_id).collect()
}

fn clusters(result: &ShapingResult) -> Vec<u32> {
    result.glyphs.iter().map(|g| g.cluster).collect()
}

mod basics {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert!(shape("").is_empty(), "Empty text yields no runs");
    }

    #[test]
    fn test_unmapped_character_is_notdef() {
        let runs = shape("A");
        assert_eq!(runs.len(), 1);
        assert_eq!(glyph_ids(&runs[0]), [0]);
        assert_eq!(runs[0].glyphs[0].cluster_len, 1);
    }

    #[test]
    fn test_cmap_entry_past_glyph_table_is_notdef() {
        let font = FontData::new(TestFontBuilder::standard().map('o', 200).build(), 0).unwrap();
        let face = font.shaping_face().unwrap();
        let mut shaper = TextShaper::new(&FontOptions::default(), "en");
        let runs = shaper.shape(&face, &utf16("fo"), &Annotations::new());
        assert_eq!(glyph_ids(&runs[0]), [u32::from(gid::F), 0]);
        assert_eq!(clusters(&runs[0]), [0, 1]);
    }

    #[test]
    fn test_advances_in_font_units() {
        let runs = shape("o o");
        let advances: Vec<i32> = runs[0].glyphs.iter().map(|g| g.x_advance).collect();
        assert_eq!(advances, [500, 250, 500]);
        assert_eq!(runs[0].total_advance, 1250);
        assert_eq!(runs[0].source_range(), 0..3);
    }
}

mod ligatures {
    use super::*;

    #[test]
    fn test_fi_ligature_spans_both_characters() {
        let runs = shape("fi");
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(glyph_ids(run), [u32::from(gid::FI)]);
        assert_eq!(run.glyphs[0].cluster, 0);
        assert_eq!(run.glyphs[0].cluster_len, 2);
        assert_eq!(run.total_advance, 550);
        assert_eq!(run.direction, TextDirection::LeftToRight);
        assert_eq!(run.script, ScriptTag::new("Latn"));
    }

    #[test]
    fn test_ligature_disabled_by_font_option() {
        let options = FontOptions::default().with_feature("liga", 0);
        let runs = shape_with(&options, &utf16("fi"), &Annotations::new());
        assert_eq!(glyph_ids(&runs[0]), [u32::from(gid::F), u32::from(gid::I)]);
        assert_eq!(clusters(&runs[0]), [0, 1]);
    }

    #[test]
    fn test_ligature_disabled_by_feature_set() {
        let mut no_liga = BTreeMap::new();
        no_liga.insert("liga".to_string(), 0);
        let annotations = Annotations::uniform(2, Annotation::default().with_feature_set(1))
            .with_feature_sets(vec![no_liga]);

        let runs = shape_with(&FontOptions::default(), &utf16("fi"), &annotations);
        assert_eq!(runs.len(), 1);
        assert_eq!(glyph_ids(&runs[0]), [u32::from(gid::F), u32::from(gid::I)]);
    }

    #[test]
    fn test_forced_break_prevents_ligature() {
        let annotations = Annotations::from_units(vec![
            Annotation::default(),
            Annotation::default().with_run_break(),
        ]);
        let runs = shape_with(&FontOptions::default(), &utf16("fi"), &annotations);
        assert_eq!(runs.len(), 2);
        assert_eq!(glyph_ids(&runs[0]), [u32::from(gid::F)]);
        assert_eq!(glyph_ids(&runs[1]), [u32::from(gid::I)]);
        assert_eq!(runs[1].glyphs[0].cluster, 1, "Clusters are absolute indices");
    }
}

mod clusters_and_utf16 {
    use super::*;

    #[test]
    fn test_surrogate_pair_is_one_cluster() {
        let runs = shape("f\u{1F600}i");
        let run = &runs[0];
        assert_eq!(
            glyph_ids(run),
            [u32::from(gid::F), u32::from(gid::GRINNING), u32::from(gid::I)]
        );
        assert_eq!(clusters(run), [0, 1, 3]);
        assert_eq!(run.glyphs[1].cluster_len, 2);
        assert_eq!(run.source_range(), 0..4);
    }

    #[test]
    fn test_unpaired_surrogate_keeps_its_index() {
        let runs = shape_with(
            &FontOptions::default(),
            &[0x66, 0xD800, 0x69],
            &Annotations::new(),
        );
        let run = &runs[0];
        assert_eq!(glyph_ids(run), [u32::from(gid::F), 0, u32::from(gid::I)]);
        assert_eq!(clusters(run), [0, 1, 2]);
    }

    #[test]
    fn test_combining_mark_joins_base_cluster() {
        let runs = shape("f\u{301}o");
        let run = &runs[0];
        assert_eq!(
            glyph_ids(run),
            [u32::from(gid::F), u32::from(gid::ACUTE), u32::from(gid::O)]
        );
        assert_eq!(clusters(run), [0, 0, 2]);
        assert_eq!(run.glyphs[0].cluster_len, 2);
        assert_eq!(run.glyphs[1].cluster_len, 2);
        assert_eq!(run.glyphs[2].cluster_len, 1);
    }
}

mod direction {
    use super::*;

    #[test]
    fn test_hebrew_detected_as_rtl() {
        let runs = shape("\u{5D0}\u{5D1}");
        let run = &runs[0];
        assert_eq!(run.direction, TextDirection::RightToLeft);
        assert_eq!(run.script, ScriptTag::new("Hebr"));
        // Visual order: bet is drawn first
        assert_eq!(glyph_ids(run), [u32::from(gid::BET), u32::from(gid::ALEF)]);
        assert_eq!(clusters(run), [1, 0]);
    }

    #[test]
    fn test_bidi_runs_shape_separately() {
        let text = utf16("fi\u{5D0}\u{5D1}");
        let annotations = Annotations::from_bidi_runs(4, &[(0, 2, false), (2, 4, true)]);
        let runs = shape_with(&FontOptions::default(), &text, &annotations);

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].source_range(), 0..2);
        assert_eq!(glyph_ids(&runs[0]), [u32::from(gid::FI)]);
        assert_eq!(runs[1].source_range(), 2..4);
        assert_eq!(runs[1].direction, TextDirection::RightToLeft);
        assert_eq!(clusters(&runs[1]), [3, 2]);
    }

    #[test]
    fn test_bidi_run_starting_on_astral_character() {
        let text = utf16("o\u{1F600}");
        let annotations = Annotations::from_bidi_runs(3, &[(0, 1, false), (1, 3, false)]);
        let runs = shape_with(&FontOptions::default(), &text, &annotations);

        let ranges: Vec<_> = runs.iter().map(ShapingResult::source_range).collect();
        assert_eq!(ranges, [0..1, 1..3], "One result per directional run");
        assert_eq!(glyph_ids(&runs[1]), [u32::from(gid::GRINNING)]);
    }

    #[test]
    fn test_default_script_applies_to_neutral_text() {
        let options = FontOptions::default().with_default_script("hebr").validate();
        let runs = shape_with(&options, &utf16("  "), &Annotations::new());
        assert_eq!(runs[0].script, ScriptTag::new("Hebr"));
        assert_eq!(runs[0].direction, TextDirection::RightToLeft);
    }

    #[test]
    fn test_annotated_script_changes_split_runs() {
        let latn = Annotation::default().with_script(ScriptTag::new("Latn").unwrap());
        let hebr = Annotation::default().with_script(ScriptTag::new("Hebr").unwrap());
        let annotations = Annotations::from_units(vec![latn, latn, hebr]);
        let runs = shape_with(&FontOptions::default(), &utf16("fi\u{5D0}"), &annotations);

        let ranges: Vec<_> = runs.iter().map(ShapingResult::source_range).collect();
        assert_eq!(ranges, [0..2, 2..3]);
    }
}

mod determinism {
    use super::*;

    #[test]
    fn test_repeated_shaping_is_identical() {
        let font = FontData::new(TestFontBuilder::standard().build(), 0).unwrap();
        let face = font.shaping_face().unwrap();
        let text = utf16("fi of \u{5D0}");

        let mut cached = TextShaper::new(&FontOptions::default(), "en");
        let mut uncached =
            TextShaper::new(&FontOptions::default().with_shape_cache_size(0), "en");

        let first = cached.shape(&face, &text, &Annotations::new());
        let second = cached.shape(&face, &text, &Annotations::new());
        let third = uncached.shape(&face, &text, &Annotations::new());

        assert_eq!(first, second);
        assert_eq!(first, third);
        assert_eq!(cached.cache_len(), 1);
        assert_eq!(uncached.cache_len(), 0);
    }

    #[test]
    fn test_annotation_length_mismatch_is_tolerated() {
        let text = utf16("fio");
        let short = Annotations::uniform(1, Annotation::default());
        let long = Annotations::uniform(10, Annotation::default());

        let expected = shape("fio");
        assert_eq!(shape_with(&FontOptions::default(), &text, &short), expected);
        assert_eq!(shape_with(&FontOptions::default(), &text, &long), expected);
    }
}
