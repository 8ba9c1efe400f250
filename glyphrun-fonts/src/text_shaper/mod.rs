//! Text shaping module using HarfBuzz via rustybuzz
//!
//! The shaping pipeline:
//! 1. UTF-16 decoding (unpaired surrogates become U+FFFD)
//! 2. Run segmentation on grapheme boundaries (unicode-segmentation)
//! 3. Script policy selection per run
//! 4. Text shaping (rustybuzz)
//! 5. Out-of-range glyph ids reset to 0, cluster lengths and
//!    policy-specific positioning fixes
//! 6. Result caching
//!
//! # Usage
//!
//! ```ignore
//! let mut shaper = TextShaper::new(&FontOptions::default(), "en-US");
//! let text: Vec<u16> = "office".encode_utf16().collect();
//! let runs = shaper.shape(&face, &text, &Annotations::new());
//! ```

mod annotations;
mod result;
mod script_policy;
mod segment;
mod utf16;

use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::Arc;

use glyphrun_config::FontOptions;
use lru::LruCache;
use rustybuzz::{Direction, Face, Language, Script, UnicodeBuffer};

pub use annotations::{Annotation, Annotations, FeatureSet, ScriptTag, TextDirection};
pub use result::{GlyphRecord, ShapingResult};
pub use script_policy::{DEFAULT_FEATURES, ScriptPolicy, SegmentGranularity};

use segment::Segment;
use utf16::DecodedChar;

/// Cache key for shaped texts
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct ShapeCacheKey {
    text: Vec<u16>,
    annotations: Annotations,
}

/// Shapes UTF-16 text for one font.
///
/// Holds the font's feature overrides, default script and language, and an
/// optional LRU cache of complete results.
pub struct TextShaper {
    font_features: FeatureSet,
    default_script: Option<ScriptTag>,
    language: Option<Language>,
    shape_cache: Option<LruCache<ShapeCacheKey, Arc<Vec<ShapingResult>>>>,
}

impl TextShaper {
    /// `locale` is a BCP 47 tag such as `en-US`; underscores are accepted.
    pub fn new(options: &FontOptions, locale: &str) -> Self {
        let locale = locale.trim().replace('_', "-");
        let language = if locale.is_empty() {
            None
        } else {
            match Language::from_str(&locale) {
                Ok(language) => Some(language),
                Err(e) => {
                    log::warn!("Ignoring locale '{}': {}", locale, e);
                    None
                }
            }
        };

        Self {
            font_features: options.features.clone(),
            default_script: options.default_script.as_deref().and_then(ScriptTag::new),
            language,
            shape_cache: NonZeroUsize::new(options.shape_cache_size).map(LruCache::new),
        }
    }

    /// Shape `text`, one result per run in logical order.
    ///
    /// `annotations` should hold one entry per UTF-16 unit; see
    /// [`Annotations::fitted`] for what happens otherwise. Identical inputs
    /// always give identical results, cached or not.
    pub fn shape(
        &mut self,
        face: &Face<'_>,
        text: &[u16],
        annotations: &Annotations,
    ) -> Arc<Vec<ShapingResult>> {
        if text.is_empty() {
            return Arc::new(Vec::new());
        }

        let annotations = annotations.fitted(text.len());
        let cache_key = ShapeCacheKey {
            text: text.to_vec(),
            annotations,
        };
        if let Some(cache) = self.shape_cache.as_mut()
            && let Some(cached) = cache.get(&cache_key)
        {
            return Arc::clone(cached);
        }

        let chars = utf16::decode(text);
        let segments =
            segment::segment(&chars, cache_key.annotations.units(), self.default_script);
        let results: Vec<ShapingResult> = segments
            .iter()
            .map(|seg| self.shape_run(face, &chars, seg, &cache_key.annotations))
            .collect();
        let results = Arc::new(results);

        if let Some(cache) = self.shape_cache.as_mut() {
            cache.put(cache_key, Arc::clone(&results));
        }
        results
    }

    fn shape_run(
        &self,
        face: &Face<'_>,
        chars: &[DecodedChar],
        seg: &Segment,
        annotations: &Annotations,
    ) -> ShapingResult {
        let run = &chars[seg.chars.clone()];
        let start = run.first().map_or(0, |c| c.start);
        let end = run.last().map_or(start, DecodedChar::end);

        let mut buffer = UnicodeBuffer::new();
        for c in run {
            buffer.add(c.ch, c.start as u32);
        }

        if let Some(ref language) = self.language {
            buffer.set_language(language.clone());
        }

        let script = match seg.script {
            Some(tag) => {
                if let Ok(script) = Script::from_str(tag.as_str()) {
                    buffer.set_script(script);
                }
                Some(tag)
            }
            None => {
                // Let HarfBuzz detect the script from the text itself
                buffer.guess_segment_properties();
                ScriptTag::from_bytes(buffer.script().tag().to_bytes())
                    .filter(|s| !s.is_neutral())
            }
        };

        let policy = ScriptPolicy::for_script(script);
        let direction = seg.direction.unwrap_or_else(|| policy.default_direction());
        buffer.set_direction(match direction {
            TextDirection::LeftToRight => Direction::LeftToRight,
            TextDirection::RightToLeft => Direction::RightToLeft,
        });

        let features =
            policy.features(&self.font_features, annotations.feature_set(seg.feature_set));
        let glyph_buffer = rustybuzz::shape(face, &features, buffer);

        let mut glyphs = GlyphRecord::from_glyph_buffer(&glyph_buffer);
        // A broken cmap can name glyphs the font does not have
        let num_glyphs = u32::from(face.number_of_glyphs());
        for glyph in glyphs.iter_mut().filter(|g| g.glyph_id >= num_glyphs) {
            log::debug!(
                "Glyph {} past end of font ({} glyphs), using 0",
                glyph.glyph_id,
                num_glyphs
            );
            glyph.glyph_id = 0;
        }
        policy.position(&mut glyphs, end as u32);
        let total_advance = glyphs.iter().map(|g| g.x_advance).sum();

        log::trace!(
            "Shaped run {}..{} as {:?} ({:?}, {:?}): {} glyphs",
            start,
            end,
            policy,
            script,
            direction,
            glyphs.len()
        );

        ShapingResult {
            glyphs,
            start,
            end,
            script,
            direction,
            total_advance,
        }
    }

    /// Number of cached results.
    pub fn cache_len(&self) -> usize {
        self.shape_cache.as_ref().map_or(0, LruCache::len)
    }
}
