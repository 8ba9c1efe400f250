//! Validated font bytes with a codepoint lookup cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rustybuzz::ttf_parser::{self, Tag};

use crate::error::{FontError, Result};
use crate::metrics::FontMetrics;

/// How the font stores glyph outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineFormat {
    /// `glyf` + `loca`
    TrueType,
    /// `CFF `
    Cff,
    /// `CFF2`
    Cff2,
}

/// Font bytes that passed validation, plus everything derived from them once
/// at load time.
///
/// Faces are parsed on demand from the shared bytes rather than stored, so
/// the struct owns no borrowed data and can move freely between threads.
pub struct FontData {
    data: Arc<[u8]>,
    face_index: u32,
    num_glyphs: u16,
    outline_format: OutlineFormat,
    metrics: FontMetrics,
    /// Codepoint -> glyph id, including misses (stored as 0)
    glyph_cache: HashMap<u32, u32>,
}

impl fmt::Debug for FontData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontData")
            .field("data_len", &self.data.len())
            .field("face_index", &self.face_index)
            .field("num_glyphs", &self.num_glyphs)
            .field("outline_format", &self.outline_format)
            .finish()
    }
}

impl FontData {
    /// Parse and validate `data`.
    ///
    /// The font must carry glyph outlines (`glyf`+`loca`, `CFF ` or `CFF2`),
    /// a `cmap`, and horizontal metrics (`hhea`+`hmtx`).
    pub fn new(data: impl Into<Arc<[u8]>>, face_index: u32) -> Result<Self> {
        let data = data.into();
        let face = ttf_parser::Face::parse(&data, face_index)?;
        let outline_format = validate_tables(&face)?;
        let num_glyphs = face.number_of_glyphs();
        let metrics = FontMetrics::from_face(&face);

        log::info!(
            "Loaded font: {} bytes, {} glyphs, {:?} outlines, {} units/em",
            data.len(),
            num_glyphs,
            outline_format,
            metrics.units_per_em
        );

        Ok(Self {
            data,
            face_index,
            num_glyphs,
            outline_format,
            metrics,
            glyph_cache: HashMap::new(),
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    pub fn outline_format(&self) -> OutlineFormat {
        self.outline_format
    }

    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// A shaping face over the font bytes.
    pub fn shaping_face(&self) -> Result<rustybuzz::Face<'_>> {
        rustybuzz::Face::from_slice(&self.data, self.face_index)
            .ok_or(FontError::Parse(ttf_parser::FaceParsingError::MalformedFont))
    }

    /// Glyph for `codepoint`, or `0` when the font does not map it, maps it
    /// past the end of the glyph table, or it is not a Unicode scalar value.
    pub fn glyph_index(&mut self, codepoint: u32) -> u32 {
        let Some(ch) = char::from_u32(codepoint) else {
            return 0;
        };
        if let Some(&glyph) = self.glyph_cache.get(&codepoint) {
            return glyph;
        }

        let glyph = match ttf_parser::Face::parse(&self.data, self.face_index) {
            Ok(face) => face
                .glyph_index(ch)
                .filter(|id| id.0 < self.num_glyphs)
                .map_or(0, |id| u32::from(id.0)),
            Err(_) => 0,
        };
        self.glyph_cache.insert(codepoint, glyph);
        glyph
    }

    /// Number of codepoints looked up so far.
    pub fn cached_codepoints(&self) -> usize {
        self.glyph_cache.len()
    }
}

fn has_table(face: &ttf_parser::Face<'_>, tag: &[u8; 4]) -> bool {
    face.raw_face().table(Tag::from_bytes(tag)).is_some()
}

fn validate_tables(face: &ttf_parser::Face<'_>) -> Result<OutlineFormat> {
    let outline_format = if has_table(face, b"glyf") && has_table(face, b"loca") {
        OutlineFormat::TrueType
    } else if has_table(face, b"CFF ") {
        OutlineFormat::Cff
    } else if has_table(face, b"CFF2") {
        OutlineFormat::Cff2
    } else if has_table(face, b"glyf") {
        return Err(FontError::MissingTable("loca"));
    } else {
        return Err(FontError::MissingTable("glyf"));
    };

    for (tag, name) in [(b"cmap", "cmap"), (b"hhea", "hhea"), (b"hmtx", "hmtx")] {
        if !has_table(face, tag) {
            return Err(FontError::MissingTable(name));
        }
    }
    Ok(outline_format)
}
