use rustybuzz::ttf_parser::Face;

/// Global font metrics in font design units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    /// Ascender minus descender
    pub height: i16,
    pub line_gap: i16,
    /// `-1` when the font has no underline metrics
    pub underline_position: i16,
    /// `-1` when the font has no underline metrics
    pub underline_thickness: i16,
}

impl FontMetrics {
    pub fn from_face(face: &Face<'_>) -> Self {
        let (underline_position, underline_thickness) = match face.underline_metrics() {
            Some(underline) => (underline.position, underline.thickness),
            None => (-1, -1),
        };
        Self {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            height: face.height(),
            line_gap: face.line_gap(),
            underline_position,
            underline_thickness,
        }
    }

    /// `[units_per_em, ascender, descender, height, line_gap,
    /// underline_position, underline_thickness]`
    pub fn to_array(self) -> [i16; 7] {
        [
            self.units_per_em as i16,
            self.ascender,
            self.descender,
            self.height,
            self.line_gap,
            self.underline_position,
            self.underline_thickness,
        ]
    }
}
