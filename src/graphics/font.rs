//! Bitmap fonts.
//!
//! A [`Font`] is an immutable view over a glyph table plus its geometry.
//! Tables carry a four-byte header `[width, height, offset, count]`; the
//! glyph bytes follow in one of two layouts:
//!
//! - [`GlyphLayout::Columns`]: one byte per column per 8-pixel page, least
//!   significant bit on top. Height must be a multiple of 8.
//! - [`GlyphLayout::Rows`]: one row after another, `width / 8` bytes per row,
//!   most significant bit on the left. Width must be a multiple of 8.
//!
//! Character codes from `offset` through `offset + count` inclusive are
//! accepted. Glyph bytes missing from the end of a table read as unset.

use std::sync::Arc;

use crate::graphics::error::{DrawError, DrawResult};
use crate::graphics::font_data::{FONT_DEFAULT, FONT_PICO};

/// Size of the table header.
pub const FONT_HEADER_LEN: usize = 4;

/// Byte layout of the glyphs in a font table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlyphLayout {
    #[default]
    Columns,
    Rows,
}

/// Built-in fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontName {
    /// 6x8 full printable ASCII.
    #[default]
    Default,
    /// 4x8 digits and clock punctuation.
    Pico,
}

impl FontName {
    pub const ALL: [FontName; 2] = [FontName::Default, FontName::Pico];

    pub fn as_str(self) -> &'static str {
        match self {
            FontName::Default => "default",
            FontName::Pico => "pico",
        }
    }

    fn table(self) -> &'static [u8] {
        match self {
            FontName::Default => &FONT_DEFAULT,
            FontName::Pico => &FONT_PICO,
        }
    }
}

/// Font descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    data: Arc<[u8]>,
    width: u8,
    height: u8,
    offset: u8,
    num_chars: u8,
    layout: GlyphLayout,
    invert: bool,
}

impl Font {
    /// Build a font from raw glyph bytes (no header).
    pub fn new(
        data: impl Into<Arc<[u8]>>,
        width: u8,
        height: u8,
        offset: u8,
        num_chars: u8,
        layout: GlyphLayout,
    ) -> DrawResult<Self> {
        let font = Self {
            data: data.into(),
            width,
            height,
            offset,
            num_chars,
            layout,
            invert: false,
        };
        font.validate()?;
        Ok(font)
    }

    /// Build a font from a table that starts with the standard header.
    pub fn from_table(table: &[u8], layout: GlyphLayout) -> DrawResult<Self> {
        let (header, glyphs) = table
            .split_at_checked(FONT_HEADER_LEN)
            .ok_or(DrawError::InvalidFont)?;
        Self::new(glyphs, header[0], header[1], header[2], header[3], layout)
    }

    /// One of the built-in fonts.
    pub fn named(name: FontName) -> Self {
        let table = name.table();
        Self {
            data: Arc::from(&table[FONT_HEADER_LEN..]),
            width: table[0],
            height: table[1],
            offset: table[2],
            num_chars: table[3],
            layout: GlyphLayout::Columns,
            invert: false,
        }
    }

    fn validate(&self) -> DrawResult {
        let aligned = match self.layout {
            GlyphLayout::Columns => self.height % 8 == 0,
            GlyphLayout::Rows => self.width % 8 == 0,
        };
        if self.width == 0 || self.height == 0 || !aligned {
            return Err(DrawError::InvalidFont);
        }
        if self.data.len() < self.bytes_per_glyph() * self.num_chars as usize {
            return Err(DrawError::InvalidFont);
        }
        Ok(())
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn offset(&self) -> u8 {
        self.offset
    }

    pub fn num_chars(&self) -> u8 {
        self.num_chars
    }

    pub fn layout(&self) -> GlyphLayout {
        self.layout
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Same font with set and unset bits swapped when rendered.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn bytes_per_glyph(&self) -> usize {
        match self.layout {
            GlyphLayout::Columns => self.width as usize * (self.height as usize / 8),
            GlyphLayout::Rows => (self.width as usize / 8) * self.height as usize,
        }
    }

    /// Whether `ch` is in the accepted code range.
    pub fn contains(&self, ch: u8) -> bool {
        ch >= self.offset && u16::from(ch) <= u16::from(self.offset) + u16::from(self.num_chars)
    }

    /// Glyph for `ch`, or [`DrawError::CharFontAsciiRange`].
    pub fn glyph(&self, ch: u8) -> DrawResult<Glyph<'_>> {
        if !self.contains(ch) {
            return Err(DrawError::CharFontAsciiRange);
        }
        let size = self.bytes_per_glyph();
        let start = (ch - self.offset) as usize * size;
        let end = (start + size).min(self.data.len());
        let bytes = self.data.get(start..end).unwrap_or(&[]);
        Ok(Glyph { font: self, bytes })
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::named(FontName::Default)
    }
}

impl From<FontName> for Font {
    fn from(name: FontName) -> Self {
        Self::named(name)
    }
}

/// Bit pattern of one character.
#[derive(Debug, Clone, Copy)]
pub struct Glyph<'a> {
    font: &'a Font,
    bytes: &'a [u8],
}

impl Glyph<'_> {
    /// Whether the bit at `(col, row)` of the glyph cell is set.
    pub fn is_set(&self, col: usize, row: usize) -> bool {
        let width = self.font.width as usize;
        let (index, mask) = match self.font.layout {
            GlyphLayout::Columns => (col + (row / 8) * width, 1u8 << (row % 8)),
            GlyphLayout::Rows => (row * (width / 8) + col / 8, 0x80u8 >> (col % 8)),
        };
        self.bytes.get(index).is_some_and(|b| b & mask != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_builtin_tables_are_well_formed() {
        for name in FontName::ALL {
            let parsed = Font::from_table(name.table(), GlyphLayout::Columns).unwrap();
            assert_eq!(parsed, Font::named(name), "{}", name.as_str());
        }
    }

    #[test]
    fn test_default_font_geometry() {
        let font = Font::default();
        assert_eq!((font.width(), font.height()), (6, 8));
        assert_eq!(font.offset(), 0x20);
        assert_eq!(font.num_chars(), 96);
        assert_eq!(font.bytes_per_glyph(), 6);
    }

    #[rstest]
    #[case(0x1F, false)]
    #[case(0x20, true)]
    #[case(0x7F, true)]
    #[case(0x80, true)]
    #[case(0x81, false)]
    fn test_default_font_range(#[case] ch: u8, #[case] accepted: bool) {
        assert_eq!(Font::default().contains(ch), accepted);
        assert_eq!(Font::default().glyph(ch).is_ok(), accepted);
    }

    #[test]
    fn test_glyph_bits_columns() {
        let font = Font::default();
        // '!' is a single column: 0x5F in column 2.
        let glyph = font.glyph(b'!').unwrap();
        assert!(glyph.is_set(2, 0));
        assert!(!glyph.is_set(2, 5));
        assert!(glyph.is_set(2, 6));
        assert!(!glyph.is_set(0, 0));
    }

    #[test]
    fn test_boundary_glyph_past_table_is_blank() {
        let font = Font::default();
        let glyph = font.glyph(0x80).unwrap();
        for col in 0..6 {
            for row in 0..8 {
                assert!(!glyph.is_set(col, row));
            }
        }
    }

    #[test]
    fn test_rows_layout() {
        // 8x2 font, one glyph: top row all set, bottom row only leftmost.
        let font = Font::new(vec![0xFF, 0x80], 8, 2, b'A', 1, GlyphLayout::Rows).unwrap();
        let glyph = font.glyph(b'A').unwrap();
        assert!((0..8).all(|c| glyph.is_set(c, 0)));
        assert!(glyph.is_set(0, 1));
        assert!(!glyph.is_set(1, 1));
    }

    #[test]
    fn test_invalid_fonts_rejected() {
        assert_eq!(
            Font::new(vec![0; 6], 6, 7, 0x20, 1, GlyphLayout::Columns),
            Err(DrawError::InvalidFont)
        );
        assert_eq!(
            Font::new(vec![0; 6], 6, 8, 0x20, 1, GlyphLayout::Rows),
            Err(DrawError::InvalidFont)
        );
        assert_eq!(
            Font::new(vec![0; 5], 6, 8, 0x20, 1, GlyphLayout::Columns),
            Err(DrawError::InvalidFont)
        );
        assert_eq!(
            Font::from_table(&[6, 8, 0x20], GlyphLayout::Columns),
            Err(DrawError::InvalidFont)
        );
    }

    #[test]
    fn test_with_invert() {
        let font = Font::named(FontName::Pico).with_invert(true);
        assert!(font.is_inverted());
        assert_eq!(font.offset(), b'-');
    }
}
