use std::fmt;

/// Index of a glyph in a font. `0` is `.notdef`.
pub type GlyphId = u32;

/// Largest coordinate or extent representable in a packed location.
pub const MAX_PACKED_EXTENT: u32 = 0xFFF;

/// Where a rasterized glyph lives in the atlas.
///
/// The rectangle covers the glyph bitmap only; the margin reserved around it
/// is not included.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtlasLocation {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub page: u16,
}

impl AtlasLocation {
    /// Pack into one word: 12 bits each of x, y, width and height (from the
    /// least significant end), then 16 bits of page index.
    pub fn packed(self) -> u64 {
        (u64::from(self.x) & 0xFFF)
            | ((u64::from(self.y) & 0xFFF) << 12)
            | ((u64::from(self.width) & 0xFFF) << 24)
            | ((u64::from(self.height) & 0xFFF) << 36)
            | (u64::from(self.page) << 48)
    }

    pub fn from_packed(packed: u64) -> Self {
        Self {
            x: (packed & 0xFFF) as u16,
            y: ((packed >> 12) & 0xFFF) as u16,
            width: ((packed >> 24) & 0xFFF) as u16,
            height: ((packed >> 36) & 0xFFF) as u16,
            page: (packed >> 48) as u16,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Debug for AtlasLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AtlasLocation(page {} @ {},{} {}x{})",
            self.page, self.x, self.y, self.width, self.height
        )
    }
}

/// Ink bounding box of a glyph in font design units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GlyphBbox {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl GlyphBbox {
    pub fn new(x_min: i16, y_min: i16, x_max: i16, y_max: i16) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// `[x_min, y_min, x_max, y_max]`
    pub fn to_array(self) -> [i16; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }
}
