use rustybuzz::GlyphBuffer;

use super::annotations::{ScriptTag, TextDirection};

/// A single shaped glyph with positioning information, in font units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GlyphRecord {
    /// Glyph ID from the font
    pub glyph_id: u32,

    /// UTF-16 index of the first source unit of this glyph's cluster
    pub cluster: u32,

    /// Number of UTF-16 units the cluster covers
    pub cluster_len: u32,

    pub x_advance: i32,
    pub y_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,

    /// Breaking the line at this glyph's cluster would require reshaping
    pub unsafe_to_break: bool,
}

impl GlyphRecord {
    /// Flat layout for marshaling: `[glyph_id | unsafe_to_break << 16,
    /// cluster, x_advance, y_advance, x_offset, y_offset]`.
    pub fn to_words(&self) -> [i32; 6] {
        [
            (self.glyph_id & 0xFFFF) as i32 | (i32::from(self.unsafe_to_break) << 16),
            self.cluster as i32,
            self.x_advance,
            self.y_advance,
            self.x_offset,
            self.y_offset,
        ]
    }

    /// Convert a shaped buffer. Cluster lengths are filled in later by the
    /// run's policy.
    pub(crate) fn from_glyph_buffer(buffer: &GlyphBuffer) -> Vec<GlyphRecord> {
        buffer
            .glyph_infos()
            .iter()
            .zip(buffer.glyph_positions())
            .map(|(info, pos)| GlyphRecord {
                glyph_id: info.glyph_id,
                cluster: info.cluster,
                cluster_len: 0,
                x_advance: pos.x_advance,
                y_advance: pos.y_advance,
                x_offset: pos.x_offset,
                y_offset: pos.y_offset,
                unsafe_to_break: info.unsafe_to_break(),
            })
            .collect()
    }
}

/// The glyphs of one shaping run, in visual order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapingResult {
    pub glyphs: Vec<GlyphRecord>,
    /// First UTF-16 unit of the run
    pub start: usize,
    /// One past the last UTF-16 unit of the run
    pub end: usize,
    /// `None` when no script could be determined
    pub script: Option<ScriptTag>,
    pub direction: TextDirection,
    /// Sum of the glyphs' horizontal advances
    pub total_advance: i32,
}

impl ShapingResult {
    pub fn source_range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// All records flattened with [`GlyphRecord::to_words`].
    pub fn to_words(&self) -> Vec<i32> {
        self.glyphs.iter().flat_map(GlyphRecord::to_words).collect()
    }
}
