//! Synthetic TrueType fonts for glyphrun tests.
//!
//! The test suites never read font files from disk. Instead they build a
//! small, fully valid `sfnt` in memory: rectangular outlines in `glyf`, a
//! format 12 `cmap`, horizontal metrics, `post` underline metrics and an
//! optional `GSUB` table with `liga` ligatures.
//!
//! ```
//! let bytes = glyphrun_dev::TestFontBuilder::standard().build();
//! assert_eq!(&bytes[..4], &[0, 1, 0, 0]);
//! ```

/// Glyph ids of [`TestFontBuilder::standard`].
pub mod gid {
    pub const NOTDEF: u16 = 0;
    pub const F: u16 = 1;
    pub const I: u16 = 2;
    pub const FI: u16 = 3;
    pub const SPACE: u16 = 4;
    pub const ACUTE: u16 = 5;
    pub const ALEF: u16 = 6;
    pub const BET: u16 = 7;
    pub const O: u16 = 8;
    pub const GRINNING: u16 = 9;
}

/// Metrics written by [`TestFontBuilder::standard`].
pub mod metrics {
    pub const UNITS_PER_EM: u16 = 1000;
    pub const ASCENDER: i16 = 800;
    pub const DESCENDER: i16 = -200;
    pub const LINE_GAP: i16 = 90;
    pub const UNDERLINE_POSITION: i16 = -100;
    pub const UNDERLINE_THICKNESS: i16 = 50;
}

/// A single glyph: an advance and an optional rectangular outline
/// `(x_min, y_min, x_max, y_max)` in font units.
#[derive(Debug, Clone, Copy)]
pub struct TestGlyph {
    pub advance: u16,
    pub rect: Option<(i16, i16, i16, i16)>,
}

impl TestGlyph {
    pub fn boxed(advance: u16, x_min: i16, y_min: i16, x_max: i16, y_max: i16) -> Self {
        Self {
            advance,
            rect: Some((x_min, y_min, x_max, y_max)),
        }
    }

    pub fn empty(advance: u16) -> Self {
        Self {
            advance,
            rect: None,
        }
    }
}

/// Builder for in-memory TrueType fonts.
#[derive(Debug, Clone)]
pub struct TestFontBuilder {
    glyphs: Vec<TestGlyph>,
    cmap: Vec<(u32, u16)>,
    ligatures: Vec<(Vec<u16>, u16)>,
    omitted: Vec<[u8; 4]>,
}

impl Default for TestFontBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFontBuilder {
    /// A font with only `.notdef`.
    pub fn new() -> Self {
        Self {
            glyphs: vec![TestGlyph::boxed(500, 50, 0, 450, 700)],
            cmap: Vec::new(),
            ligatures: Vec::new(),
            omitted: Vec::new(),
        }
    }

    /// The font most tests use. See [`gid`] for its glyph ids.
    ///
    /// Maps `f`, `i`, `o`, space, U+0301, U+05D0, U+05D1 and U+1F600.
    /// Deliberately has no glyph for `A`. Carries an `f i -> fi` ligature.
    pub fn standard() -> Self {
        Self::new()
            .glyph(TestGlyph::boxed(350, 50, 0, 300, 700), &['f'])
            .glyph(TestGlyph::boxed(200, 50, 0, 150, 500), &['i'])
            .glyph(TestGlyph::boxed(550, 50, 0, 500, 700), &[])
            .glyph(TestGlyph::empty(250), &[' '])
            .glyph(TestGlyph::boxed(0, -150, 600, -50, 750), &['\u{0301}'])
            .glyph(TestGlyph::boxed(500, 50, 0, 450, 600), &['\u{05D0}'])
            .glyph(TestGlyph::boxed(500, 50, 0, 450, 600), &['\u{05D1}'])
            .glyph(TestGlyph::boxed(500, 50, 0, 450, 500), &['o'])
            .glyph(TestGlyph::boxed(1000, 50, -100, 950, 800), &['\u{1F600}'])
            .ligature(&[gid::F, gid::I], gid::FI)
    }

    /// Append a glyph, mapping each of `chars` to it.
    pub fn glyph(mut self, glyph: TestGlyph, chars: &[char]) -> Self {
        let id = self.glyphs.len() as u16;
        self.glyphs.push(glyph);
        for &c in chars {
            self.cmap.push((c as u32, id));
        }
        self
    }

    /// Map `c` to `glyph`, replacing any earlier mapping. `glyph` need not
    /// exist, which lets tests build fonts with a broken `cmap`.
    pub fn map(mut self, c: char, glyph: u16) -> Self {
        self.cmap.retain(|&(codepoint, _)| codepoint != c as u32);
        self.cmap.push((c as u32, glyph));
        self
    }

    /// Add a `liga` substitution from `components` to `ligature`.
    pub fn ligature(mut self, components: &[u16], ligature: u16) -> Self {
        assert!(components.len() >= 2, "a ligature needs at least two components");
        self.ligatures.push((components.to_vec(), ligature));
        self
    }

    /// Leave a table out of the built font.
    pub fn without_table(mut self, tag: &[u8; 4]) -> Self {
        self.omitted.push(*tag);
        self
    }

    pub fn num_glyphs(&self) -> u16 {
        self.glyphs.len() as u16
    }

    pub fn build(&self) -> Vec<u8> {
        let (glyf, loca) = self.glyf_and_loca();
        let mut tables: Vec<([u8; 4], Vec<u8>)> = vec![
            (*b"head", self.head()),
            (*b"hhea", self.hhea()),
            (*b"maxp", self.maxp()),
            (*b"post", post()),
            (*b"cmap", self.cmap()),
            (*b"hmtx", self.hmtx()),
            (*b"glyf", glyf),
            (*b"loca", loca),
        ];
        if !self.ligatures.is_empty() {
            tables.push((*b"GSUB", self.gsub()));
        }
        tables.retain(|(tag, _)| !self.omitted.contains(tag));
        tables.sort_by(|a, b| a.0.cmp(&b.0));
        assemble(&tables)
    }

    fn bounds(&self) -> (i16, i16, i16, i16) {
        let mut bounds: Option<(i16, i16, i16, i16)> = None;
        for rect in self.glyphs.iter().filter_map(|g| g.rect) {
            bounds = Some(match bounds {
                None => rect,
                Some(b) => (b.0.min(rect.0), b.1.min(rect.1), b.2.max(rect.2), b.3.max(rect.3)),
            });
        }
        bounds.unwrap_or((0, 0, 0, 0))
    }

    fn head(&self) -> Vec<u8> {
        let (x_min, y_min, x_max, y_max) = self.bounds();
        let mut w = Writer::default();
        w.u32(0x0001_0000); // version
        w.u32(0x0001_0000); // fontRevision
        w.u32(0); // checksumAdjustment
        w.u32(0x5F0F_3CF5); // magicNumber
        w.u16(0x0003); // flags
        w.u16(metrics::UNITS_PER_EM);
        w.u64(0); // created
        w.u64(0); // modified
        w.i16(x_min);
        w.i16(y_min);
        w.i16(x_max);
        w.i16(y_max);
        w.u16(0); // macStyle
        w.u16(8); // lowestRecPPEM
        w.i16(2); // fontDirectionHint
        w.i16(1); // indexToLocFormat: long offsets
        w.i16(0); // glyphDataFormat
        w.bytes
    }

    fn hhea(&self) -> Vec<u8> {
        let (_, _, x_max, _) = self.bounds();
        let advance_max = self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0);
        let mut w = Writer::default();
        w.u32(0x0001_0000);
        w.i16(metrics::ASCENDER);
        w.i16(metrics::DESCENDER);
        w.i16(metrics::LINE_GAP);
        w.u16(advance_max);
        w.i16(0); // minLeftSideBearing
        w.i16(0); // minRightSideBearing
        w.i16(x_max); // xMaxExtent
        w.i16(1); // caretSlopeRise
        w.i16(0); // caretSlopeRun
        w.i16(0); // caretOffset
        for _ in 0..4 {
            w.i16(0);
        }
        w.i16(0); // metricDataFormat
        w.u16(self.num_glyphs());
        w.bytes
    }

    fn maxp(&self) -> Vec<u8> {
        let mut w = Writer::default();
        w.u32(0x0001_0000);
        w.u16(self.num_glyphs());
        w.u16(4); // maxPoints
        w.u16(1); // maxContours
        w.u16(0); // maxCompositePoints
        w.u16(0); // maxCompositeContours
        w.u16(2); // maxZones
        w.u16(0); // maxTwilightPoints
        w.u16(0); // maxStorage
        w.u16(0); // maxFunctionDefs
        w.u16(0); // maxInstructionDefs
        w.u16(0); // maxStackElements
        w.u16(0); // maxSizeOfInstructions
        w.u16(0); // maxComponentElements
        w.u16(0); // maxComponentDepth
        w.bytes
    }

    fn cmap(&self) -> Vec<u8> {
        let mut mappings = self.cmap.clone();
        mappings.sort_unstable();
        mappings.dedup_by_key(|m| m.0);

        let mut w = Writer::default();
        w.u16(0); // version
        w.u16(1); // numTables
        w.u16(3); // platformID: Windows
        w.u16(10); // encodingID: Unicode full repertoire
        w.u32(12); // subtable offset

        w.u16(12); // format
        w.u16(0); // reserved
        w.u32(16 + 12 * mappings.len() as u32);
        w.u32(0); // language
        w.u32(mappings.len() as u32);
        for (codepoint, glyph) in mappings {
            w.u32(codepoint);
            w.u32(codepoint);
            w.u32(u32::from(glyph));
        }
        w.bytes
    }

    fn hmtx(&self) -> Vec<u8> {
        let mut w = Writer::default();
        for glyph in &self.glyphs {
            w.u16(glyph.advance);
            w.i16(glyph.rect.map_or(0, |r| r.0));
        }
        w.bytes
    }

    fn glyf_and_loca(&self) -> (Vec<u8>, Vec<u8>) {
        let mut glyf = Writer::default();
        let mut loca = Writer::default();
        for glyph in &self.glyphs {
            loca.u32(glyf.bytes.len() as u32);
            let Some((x0, y0, x1, y1)) = glyph.rect else {
                continue;
            };
            glyf.i16(1); // numberOfContours
            glyf.i16(x0);
            glyf.i16(y0);
            glyf.i16(x1);
            glyf.i16(y1);
            glyf.u16(3); // endPtsOfContours[0]
            glyf.u16(0); // instructionLength
            for _ in 0..4 {
                glyf.u8(0x01); // ON_CURVE_POINT, 16-bit deltas
            }
            // Clockwise: bottom-left, top-left, top-right, bottom-right.
            for dx in [x0, 0, x1 - x0, 0] {
                glyf.i16(dx);
            }
            for dy in [y0, y1 - y0, 0, y0 - y1] {
                glyf.i16(dy);
            }
            glyf.align(4);
        }
        loca.u32(glyf.bytes.len() as u32);
        (glyf.bytes, loca.bytes)
    }

    /// GSUB with a DFLT script, one `liga` feature and one type 4 lookup.
    fn gsub(&self) -> Vec<u8> {
        // Ligature sets keyed by first component, in coverage order.
        let mut firsts: Vec<u16> = self.ligatures.iter().map(|(c, _)| c[0]).collect();
        firsts.sort_unstable();
        firsts.dedup();

        let mut sets = Vec::with_capacity(firsts.len());
        for first in &firsts {
            let ligatures: Vec<&(Vec<u16>, u16)> = self
                .ligatures
                .iter()
                .filter(|(c, _)| c[0] == *first)
                .collect();
            let mut set = Writer::default();
            set.u16(ligatures.len() as u16);
            let mut offset = 2 + 2 * ligatures.len();
            for (components, _) in &ligatures {
                set.u16(offset as u16);
                offset += 4 + 2 * (components.len() - 1);
            }
            for (components, ligature) in &ligatures {
                set.u16(*ligature);
                set.u16(components.len() as u16);
                for component in &components[1..] {
                    set.u16(*component);
                }
            }
            sets.push(set.bytes);
        }

        let mut coverage = Writer::default();
        coverage.u16(1);
        coverage.u16(firsts.len() as u16);
        for first in &firsts {
            coverage.u16(*first);
        }

        let mut subst = Writer::default();
        let header_len = 6 + 2 * sets.len();
        subst.u16(1); // substFormat
        subst.u16(header_len as u16); // coverageOffset
        subst.u16(sets.len() as u16);
        let mut offset = header_len + coverage.bytes.len();
        for set in &sets {
            subst.u16(offset as u16);
            offset += set.len();
        }
        subst.bytes.extend_from_slice(&coverage.bytes);
        for set in &sets {
            subst.bytes.extend_from_slice(set);
        }

        let mut script_list = Writer::default();
        script_list.u16(1);
        script_list.tag(b"DFLT");
        script_list.u16(8); // Script offset
        script_list.u16(4); // defaultLangSys offset
        script_list.u16(0); // langSysCount
        script_list.u16(0); // lookupOrderOffset
        script_list.u16(0xFFFF); // requiredFeatureIndex
        script_list.u16(1); // featureIndexCount
        script_list.u16(0);

        let mut feature_list = Writer::default();
        feature_list.u16(1);
        feature_list.tag(b"liga");
        feature_list.u16(8); // Feature offset
        feature_list.u16(0); // featureParamsOffset
        feature_list.u16(1); // lookupIndexCount
        feature_list.u16(0);

        let mut lookup_list = Writer::default();
        lookup_list.u16(1);
        lookup_list.u16(4); // Lookup offset
        lookup_list.u16(4); // lookupType: ligature substitution
        lookup_list.u16(0); // lookupFlag
        lookup_list.u16(1); // subTableCount
        lookup_list.u16(8); // subtable offset from the Lookup table
        lookup_list.bytes.extend_from_slice(&subst.bytes);

        let script_offset = 10;
        let feature_offset = script_offset + script_list.bytes.len();
        let lookup_offset = feature_offset + feature_list.bytes.len();
        let mut w = Writer::default();
        w.u16(1);
        w.u16(0);
        w.u16(script_offset as u16);
        w.u16(feature_offset as u16);
        w.u16(lookup_offset as u16);
        w.bytes.extend_from_slice(&script_list.bytes);
        w.bytes.extend_from_slice(&feature_list.bytes);
        w.bytes.extend_from_slice(&lookup_list.bytes);
        w.bytes
    }
}

fn post() -> Vec<u8> {
    let mut w = Writer::default();
    w.u32(0x0003_0000); // version 3.0: no glyph names
    w.u32(0); // italicAngle
    w.i16(metrics::UNDERLINE_POSITION);
    w.i16(metrics::UNDERLINE_THICKNESS);
    w.u32(0); // isFixedPitch
    for _ in 0..4 {
        w.u32(0); // memory usage hints
    }
    w.bytes
}

/// Write the offset table, table records and 4-byte aligned table data.
fn assemble(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let mut pow2 = 1u16;
    let mut entry_selector = 0u16;
    while pow2 * 2 <= num_tables {
        pow2 *= 2;
        entry_selector += 1;
    }
    let search_range = pow2 * 16;

    let mut w = Writer::default();
    w.u32(0x0001_0000);
    w.u16(num_tables);
    w.u16(search_range);
    w.u16(entry_selector);
    w.u16(num_tables * 16 - search_range);

    let mut offset = 12 + 16 * tables.len();
    for (tag, data) in tables {
        w.tag(tag);
        w.u32(checksum(data));
        w.u32(offset as u32);
        w.u32(data.len() as u32);
        offset += data.len().div_ceil(4) * 4;
    }
    for (_, data) in tables {
        w.bytes.extend_from_slice(data);
        w.align(4);
    }
    w.bytes
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// Big-endian byte writer.
#[derive(Default)]
struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    fn u8(&mut self, v: u8) {
        self.bytes.push(v);
    }

    fn u16(&mut self, v: u16) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }

    fn i16(&mut self, v: i16) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }

    fn u32(&mut self, v: u32) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }

    fn u64(&mut self, v: u64) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }

    fn tag(&mut self, tag: &[u8; 4]) {
        self.bytes.extend_from_slice(tag);
    }

    fn align(&mut self, to: usize) {
        while self.bytes.len() % to != 0 {
            self.bytes.push(0);
        }
    }
}
