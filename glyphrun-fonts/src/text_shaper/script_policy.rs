//! Script-specific shaping behaviour.
//!
//! Every run is handled by one policy chosen from its script. A policy
//! decides how finely the run may be split, its default direction, which
//! OpenType features it must keep enabled, and how glyph records are
//! finished after shaping.

use std::collections::BTreeMap;

use rustybuzz::Feature;
use rustybuzz::ttf_parser::Tag;

use super::annotations::{FeatureSet, ScriptTag, TextDirection};
use super::result::GlyphRecord;

/// Features enabled for every run before option overrides apply.
pub const DEFAULT_FEATURES: [(&str, u32); 4] = [("liga", 1), ("clig", 1), ("kern", 1), ("calt", 1)];

/// Smallest unit a run may be cut into when only the feature set changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentGranularity {
    Grapheme,
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptPolicy {
    /// Left-to-right scripts without special shaping needs
    Simple,
    /// Cursive right-to-left scripts whose letters join (Arabic, Syriac, ...)
    Joining,
    /// Right-to-left scripts without joining (Hebrew, Thaana, Samaritan)
    RightToLeft,
    /// Brahmic scripts with syllable reordering and conjuncts
    Indic,
    /// Han, kana, hangul and bopomofo
    Cjk,
}

const JOINING_SCRIPTS: &[&[u8; 4]] = &[b"Arab", b"Syrc", b"Nkoo", b"Mong", b"Mand", b"Adlm"];
const RTL_SCRIPTS: &[&[u8; 4]] = &[b"Hebr", b"Thaa", b"Samr"];
const INDIC_SCRIPTS: &[&[u8; 4]] = &[
    b"Deva", b"Beng", b"Guru", b"Gujr", b"Orya", b"Taml", b"Telu", b"Knda", b"Mlym", b"Sinh",
    b"Khmr", b"Mymr", b"Tibt",
];
const CJK_SCRIPTS: &[&[u8; 4]] = &[b"Hani", b"Hira", b"Kana", b"Hang", b"Bopo"];

const JOINING_REQUIRED: &[&str] = &["rlig", "ccmp", "locl"];
const INDIC_REQUIRED: &[&str] = &[
    "akhn", "rphf", "blwf", "half", "pstf", "pres", "abvs", "blws", "psts", "haln",
];

impl ScriptPolicy {
    pub fn for_script(script: Option<ScriptTag>) -> Self {
        let Some(script) = script else {
            return ScriptPolicy::Simple;
        };
        let bytes = script.as_bytes();
        if JOINING_SCRIPTS.contains(&&bytes) {
            ScriptPolicy::Joining
        } else if RTL_SCRIPTS.contains(&&bytes) {
            ScriptPolicy::RightToLeft
        } else if INDIC_SCRIPTS.contains(&&bytes) {
            ScriptPolicy::Indic
        } else if CJK_SCRIPTS.contains(&&bytes) {
            ScriptPolicy::Cjk
        } else {
            ScriptPolicy::Simple
        }
    }

    pub fn default_direction(self) -> TextDirection {
        match self {
            ScriptPolicy::Joining | ScriptPolicy::RightToLeft => TextDirection::RightToLeft,
            ScriptPolicy::Simple | ScriptPolicy::Indic | ScriptPolicy::Cjk => {
                TextDirection::LeftToRight
            }
        }
    }

    /// Joining and Indic runs only change feature sets at word boundaries so
    /// that cursive connections and conjuncts stay within one shaping call.
    pub fn granularity(self) -> SegmentGranularity {
        match self {
            ScriptPolicy::Joining | ScriptPolicy::Indic => SegmentGranularity::Word,
            _ => SegmentGranularity::Grapheme,
        }
    }

    /// Features a caller may not switch off for this script.
    pub fn required_features(self) -> &'static [&'static str] {
        match self {
            ScriptPolicy::Joining => JOINING_REQUIRED,
            ScriptPolicy::Indic => INDIC_REQUIRED,
            _ => &[],
        }
    }

    /// Resolve the feature list for a run: the defaults, then the font's
    /// configured overrides, then the run's feature set. Attempts to disable
    /// a required feature are dropped.
    pub fn features(
        self,
        font_features: &FeatureSet,
        run_features: Option<&FeatureSet>,
    ) -> Vec<Feature> {
        let mut resolved: BTreeMap<&str, u32> = DEFAULT_FEATURES.into_iter().collect();
        let overrides = font_features
            .iter()
            .chain(run_features.into_iter().flatten());
        for (tag, &value) in overrides {
            if value == 0 && self.required_features().contains(&tag.as_str()) {
                log::debug!("Keeping required feature '{}' enabled for {:?} run", tag, self);
                continue;
            }
            resolved.insert(tag.as_str(), value);
        }

        resolved
            .into_iter()
            .map(|(tag, value)| Feature::new(Tag::from_bytes_lossy(tag.as_bytes()), value, ..))
            .collect()
    }

    /// Finish shaped records: fill in cluster lengths and, for CJK,
    /// zero vertical advances of horizontal runs.
    pub fn position(self, records: &mut [GlyphRecord], run_end: u32) {
        let mut starts: Vec<u32> = records.iter().map(|r| r.cluster).collect();
        starts.sort_unstable();
        starts.dedup();

        for record in records.iter_mut() {
            let next = match starts.binary_search(&record.cluster) {
                Ok(i) => starts.get(i + 1).copied().unwrap_or(run_end),
                Err(_) => run_end,
            };
            record.cluster_len = next.saturating_sub(record.cluster);
        }

        if self == ScriptPolicy::Cjk {
            for record in records.iter_mut() {
                record.y_advance = 0;
            }
        }
    }
}
