//! Splitting decoded text into shaping runs.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use super::annotations::{Annotation, ScriptTag, TextDirection};
use super::script_policy::{ScriptPolicy, SegmentGranularity};
use super::utf16::DecodedChar;

/// A run of characters shaped together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    /// Indices into the decoded characters
    pub chars: Range<usize>,
    /// `None` when neither annotations nor the font options name a script
    pub script: Option<ScriptTag>,
    pub direction: Option<TextDirection>,
    pub feature_set: u16,
}

impl Segment {
    fn same_properties(&self, other: &Segment) -> bool {
        self.script == other.script
            && self.direction == other.direction
            && self.feature_set == other.feature_set
    }

    fn differs_only_in_features(&self, other: &Segment) -> bool {
        self.script == other.script
            && self.direction == other.direction
            && self.feature_set != other.feature_set
    }
}

/// Character boundaries at which a run may start.
struct Boundaries {
    grapheme: Vec<bool>,
    word: Vec<bool>,
}

impl Boundaries {
    fn new(chars: &[DecodedChar]) -> Self {
        let text: String = chars.iter().map(|c| c.ch).collect();
        let byte_offsets: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
        let to_flags = |starts: &mut dyn Iterator<Item = usize>| {
            let mut flags = vec![false; chars.len()];
            for start in starts {
                if let Ok(index) = byte_offsets.binary_search(&start) {
                    flags[index] = true;
                }
            }
            flags
        };

        Self {
            grapheme: to_flags(&mut text.grapheme_indices(true).map(|(offset, _)| offset)),
            word: to_flags(&mut text.split_word_bound_indices().map(|(offset, _)| offset)),
        }
    }
}

/// Resolve each character's script. Neutral characters take the script of
/// the text before them; leading neutral characters take the first script
/// that follows, then `default_script`.
fn resolve_scripts(
    annotations: &[Annotation],
    default_script: Option<ScriptTag>,
) -> Vec<Option<ScriptTag>> {
    let strong = |a: &Annotation| a.script.filter(|s| !s.is_neutral());
    let leading = annotations.iter().find_map(strong).or(default_script);

    let mut current = leading;
    annotations
        .iter()
        .map(|a| {
            if let Some(script) = strong(a) {
                current = Some(script);
            }
            current
        })
        .collect()
}

/// Cut `chars` into runs.
///
/// Runs only start at extended grapheme cluster boundaries, so surrogate
/// pairs and combining sequences are never split. A new run starts where the
/// script, direction or feature set changes, or where a unit asks for a
/// forced break. For scripts whose policy works on words, a change of feature
/// set alone waits for the next word boundary.
pub(crate) fn segment(
    chars: &[DecodedChar],
    annotations: &[Annotation],
    default_script: Option<ScriptTag>,
) -> Vec<Segment> {
    if chars.is_empty() {
        return Vec::new();
    }

    // Properties come from a pair's low unit, but a break on either unit counts
    let per_char: Vec<Annotation> = chars
        .iter()
        .map(|c| {
            let mut annotation = annotations
                .get(c.annotated_unit())
                .copied()
                .unwrap_or_default();
            annotation.run_break = annotations
                .get(c.start..c.end().min(annotations.len()))
                .is_some_and(|units| units.iter().any(|a| a.run_break));
            annotation
        })
        .collect();
    let scripts = resolve_scripts(&per_char, default_script);
    let boundaries = Boundaries::new(chars);

    let props = |i: usize| Segment {
        chars: i..i + 1,
        script: scripts[i],
        direction: per_char[i].direction,
        feature_set: per_char[i].feature_set,
    };

    let mut segments = Vec::new();
    let mut current = props(0);
    let mut pending_break = false;

    for i in 1..chars.len() {
        let next = props(i);
        pending_break |= per_char[i].run_break;

        let cut = if !boundaries.grapheme[i] {
            false
        } else if pending_break {
            true
        } else if current.same_properties(&next) {
            false
        } else if current.differs_only_in_features(&next)
            && ScriptPolicy::for_script(current.script).granularity() == SegmentGranularity::Word
        {
            boundaries.word[i]
        } else {
            true
        };

        if cut {
            current.chars.end = i;
            segments.push(std::mem::replace(&mut current, next));
            pending_break = false;
        }
    }
    current.chars.end = chars.len();
    segments.push(current);

    log::debug!(
        "Segmented {} characters into {} runs",
        chars.len(),
        segments.len()
    );
    segments
}

#[cfg(test)]
mod tests {
    use super::super::utf16::decode;
    use super::*;

    fn run(text: &str, annotations: &[Annotation]) -> Vec<Segment> {
        let units: Vec<u16> = text.encode_utf16().collect();
        segment(&decode(&units), annotations, None)
    }

    fn latn() -> Annotation {
        Annotation::default().with_script(ScriptTag::new("Latn").unwrap())
    }

    fn arab() -> Annotation {
        Annotation::default().with_script(ScriptTag::new("Arab").unwrap())
    }

    #[test]
    fn test_empty() {
        assert!(run("", &[]).is_empty());
    }

    #[test]
    fn test_single_run_without_annotations() {
        let segments = run("hello", &[]);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].chars, 0..5);
        assert_eq!(segments[0].script, None);
    }

    #[test]
    fn test_script_change_splits() {
        let annotations = [latn(), latn(), arab(), arab()];
        let segments = run("abcd", &annotations);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].chars, 0..2);
        assert_eq!(segments[1].chars, 2..4);
        assert_eq!(segments[1].script, ScriptTag::new("Arab"));
    }

    #[test]
    fn test_neutral_inherits_previous_script() {
        let common = Annotation::default().with_script(ScriptTag::COMMON);
        let annotations = [latn(), common, arab()];
        let segments = run("a b", &annotations);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].chars, 0..2);
    }

    #[test]
    fn test_leading_neutral_takes_following_script() {
        let annotations = [Annotation::default(), arab()];
        let segments = run(" a", &annotations);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].script, ScriptTag::new("Arab"));
    }

    #[test]
    fn test_default_script_when_nothing_annotated() {
        let units: Vec<u16> = "ab".encode_utf16().collect();
        let segments = segment(&decode(&units), &[], ScriptTag::new("Cyrl"));
        assert_eq!(segments[0].script, ScriptTag::new("Cyrl"));
    }

    #[test]
    fn test_combining_sequence_not_split() {
        // The feature set switches on the mark of "e" + U+0301; the cut waits
        // for the end of the cluster
        let annotations = [latn(), latn().with_feature_set(1), latn().with_feature_set(1)];
        let segments = run("e\u{301}x", &annotations);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].chars, 0..2);
        assert_eq!(segments[0].feature_set, 0);
        assert_eq!(segments[1].feature_set, 1);

        // A mark that alone differs is absorbed into its base's run
        let annotations = [latn(), latn().with_feature_set(1), latn()];
        assert_eq!(run("e\u{301}x", &annotations).len(), 1);
    }

    #[test]
    fn test_run_break_inside_grapheme_waits() {
        let annotations = [latn(), latn().with_run_break(), latn()];
        let segments = run("e\u{301}x", &annotations);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].chars, 0..2);
        assert_eq!(segments[1].chars, 2..3);
    }

    #[test]
    fn test_forced_break_with_same_properties() {
        let annotations = [latn(), latn(), latn().with_run_break(), latn()];
        let segments = run("abcd", &annotations);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].chars, 2..4);
    }

    #[test]
    fn test_surrogate_pair_uses_low_unit_annotation() {
        // U+1F600 occupies units 1 and 2; only the low unit is annotated RTL
        let rtl = Annotation::default().with_direction(TextDirection::RightToLeft);
        let annotations = [Annotation::default(), Annotation::default(), rtl];
        let segments = run("a\u{1F600}", &annotations);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].chars, 1..2);
        assert_eq!(segments[1].direction, Some(TextDirection::RightToLeft));
    }

    #[test]
    fn test_run_break_on_high_surrogate() {
        let annotations = [
            Annotation::default(),
            Annotation::default().with_run_break(),
            Annotation::default(),
        ];
        let segments = run("o\u{1F600}", &annotations);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].chars, 1..2);
    }

    #[test]
    fn test_joining_feature_change_waits_for_word_boundary() {
        // Feature set changes mid-word for an Arabic run
        let annotations = [arab(), arab(), arab().with_feature_set(1), arab(), arab(), arab()];
        let segments = run("\u{628}\u{628}\u{628} \u{628}\u{628}", &annotations);
        assert_eq!(segments.len(), 1);

        let annotations = [
            arab(),
            arab(),
            arab(),
            arab().with_feature_set(1),
            arab().with_feature_set(1),
            arab().with_feature_set(1),
        ];
        let segments = run("\u{628}\u{628}\u{628} \u{628}\u{628}", &annotations);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].chars, 0..3);
    }

    #[test]
    fn test_simple_feature_change_splits_mid_word() {
        let annotations = [latn(), latn().with_feature_set(1), latn().with_feature_set(1)];
        let segments = run("abc", &annotations);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].chars, 0..1);
    }
}
