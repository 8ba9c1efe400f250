//! Per-code-unit annotations that steer run segmentation.

use std::collections::BTreeMap;
use std::fmt;

use glyphrun_config::normalize_script_tag;

/// An ISO 15924 script tag in title case, e.g. `Latn`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptTag([u8; 4]);

impl ScriptTag {
    /// Characters shared by several scripts (punctuation, digits, spaces)
    pub const COMMON: ScriptTag = ScriptTag(*b"Zyyy");
    /// Combining marks that take the script of their base
    pub const INHERITED: ScriptTag = ScriptTag(*b"Zinh");
    pub const UNKNOWN: ScriptTag = ScriptTag(*b"Zzzz");

    /// Parse a four-letter tag, normalizing its case.
    pub fn new(tag: &str) -> Option<Self> {
        let normalized = normalize_script_tag(tag)?;
        let bytes: [u8; 4] = normalized.as_bytes().try_into().ok()?;
        Some(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Option<Self> {
        Self::new(std::str::from_utf8(&bytes).ok()?)
    }

    pub fn as_str(&self) -> &str {
        // Always ASCII letters by construction.
        std::str::from_utf8(&self.0).unwrap_or("Zzzz")
    }

    pub fn as_bytes(&self) -> [u8; 4] {
        self.0
    }

    /// True for tags that carry no script of their own and resolve from
    /// neighbouring text.
    pub fn is_neutral(&self) -> bool {
        *self == Self::COMMON || *self == Self::INHERITED || *self == Self::UNKNOWN
    }
}

impl fmt::Debug for ScriptTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptTag({})", self.as_str())
    }
}

impl fmt::Display for ScriptTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
}

impl TextDirection {
    pub fn is_rtl(self) -> bool {
        self == TextDirection::RightToLeft
    }
}

/// Feature overrides selected by [`Annotation::feature_set`].
pub type FeatureSet = BTreeMap<String, u32>;

/// Hints for one UTF-16 code unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Annotation {
    /// `None`, `Zyyy` and `Zinh` inherit from neighbouring text
    pub script: Option<ScriptTag>,
    /// `None` lets the script decide
    pub direction: Option<TextDirection>,
    /// 0 is the font's configured features; `n` selects the n-th set passed
    /// to [`Annotations::with_feature_sets`]
    pub feature_set: u16,
    /// Start a new run at this unit
    pub run_break: bool,
}

impl Annotation {
    pub fn with_script(mut self, script: ScriptTag) -> Self {
        self.script = Some(script);
        self
    }

    pub fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_feature_set(mut self, feature_set: u16) -> Self {
        self.feature_set = feature_set;
        self
    }

    pub fn with_run_break(mut self) -> Self {
        self.run_break = true;
        self
    }
}

/// Annotations for a whole text buffer, one entry per UTF-16 code unit.
///
/// An empty set means "no hints" and applies defaults everywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Annotations {
    units: Vec<Annotation>,
    feature_sets: Vec<FeatureSet>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_units(units: Vec<Annotation>) -> Self {
        Self {
            units,
            feature_sets: Vec::new(),
        }
    }

    /// The same annotation for each of `len` units.
    pub fn uniform(len: usize, annotation: Annotation) -> Self {
        Self::from_units(vec![annotation; len])
    }

    /// Build annotations from directional runs given as `(start, end, rtl)`
    /// UTF-16 ranges. Each run starts with a forced break so it shapes on its
    /// own; units outside every run keep the defaults.
    pub fn from_bidi_runs(len: usize, runs: &[(usize, usize, bool)]) -> Self {
        let mut units = vec![Annotation::default(); len];
        for &(start, end, rtl) in runs {
            let end = end.min(len);
            if start >= end {
                continue;
            }
            let direction = if rtl {
                TextDirection::RightToLeft
            } else {
                TextDirection::LeftToRight
            };
            for unit in &mut units[start..end] {
                unit.direction = Some(direction);
            }
            units[start].run_break = true;
        }
        Self::from_units(units)
    }

    /// Attach feature sets addressable from [`Annotation::feature_set`],
    /// numbered from 1.
    pub fn with_feature_sets(mut self, feature_sets: Vec<FeatureSet>) -> Self {
        self.feature_sets = feature_sets;
        self
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[Annotation] {
        &self.units
    }

    /// The feature set for `id`; `None` for 0 and for ids with no set.
    pub fn feature_set(&self, id: u16) -> Option<&FeatureSet> {
        let index = usize::from(id).checked_sub(1)?;
        self.feature_sets.get(index)
    }

    pub fn feature_sets(&self) -> &[FeatureSet] {
        &self.feature_sets
    }

    /// Fit the annotations to a text of `len` units: pad with defaults or
    /// truncate. Ids that name no feature set fall back to 0.
    pub fn fitted(&self, len: usize) -> Self {
        let mut units = self.units.clone();
        if !units.is_empty() && units.len() != len {
            log::warn!(
                "Got {} annotations for {} UTF-16 units, {}",
                units.len(),
                len,
                if units.len() < len { "padding" } else { "truncating" }
            );
        }
        units.resize(len, Annotation::default());

        for unit in &mut units {
            if unit.feature_set != 0 && self.feature_set(unit.feature_set).is_none() {
                log::warn!("Unknown feature set {}, using font features", unit.feature_set);
                unit.feature_set = 0;
            }
        }

        Self {
            units,
            feature_sets: self.feature_sets.clone(),
        }
    }
}
