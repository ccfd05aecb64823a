//! Text rendering: glyph output, string layout and the byte stream used by
//! the print adapter.

use std::fmt;

use crate::graphics::canvas::Canvas;
use crate::graphics::color::PixelColor;
use crate::graphics::error::{scratch, DrawError, DrawResult};
use crate::graphics::font::{Font, FontName};
use crate::graphics::sink::PixelSink;
use crate::print::ByteWrite;

impl<S, C> Canvas<S, C>
where
    S: PixelSink<C>,
    C: PixelColor,
{
    /// Select one of the built-in fonts.
    pub fn set_font(&mut self, name: FontName) {
        log::debug!("Font set to {}", name.as_str());
        self.font = Font::named(name);
    }

    /// Use a caller-supplied font.
    pub fn set_custom_font(&mut self, font: Font) {
        log::debug!(
            "Custom font set ({}x{}, {} chars from {:#04X})",
            font.width(),
            font.height(),
            font.num_chars(),
            font.offset()
        );
        self.font = font;
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn font_width(&self) -> i32 {
        i32::from(self.font.width())
    }

    pub fn font_height(&self) -> i32 {
        i32::from(self.font.height())
    }

    /// Foreground only: unset glyph bits leave the canvas untouched.
    pub fn set_text_color(&mut self, fg: C) {
        self.text_fg = fg;
        self.text_bg = None;
    }

    /// Foreground and background: the whole glyph cell is painted.
    pub fn set_text_colors(&mut self, fg: C, bg: C) {
        self.text_fg = fg;
        self.text_bg = Some(bg);
    }

    pub fn text_colors(&self) -> (C, Option<C>) {
        (self.text_fg, self.text_bg)
    }

    /// Wrap the streaming cursor at the right edge.
    pub fn set_text_wrap(&mut self, wrap: bool) {
        self.text_wrap = wrap;
    }

    pub fn text_wrap(&self) -> bool {
        self.text_wrap
    }

    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn cursor(&self) -> (i32, i32) {
        (self.cursor_x, self.cursor_y)
    }

    /// Render one glyph with its top-left corner at `(x, y)`.
    ///
    /// The whole cell must fit on the canvas and `ch` must be in the font's
    /// range; nothing is drawn otherwise.
    pub fn write_char(&mut self, x: i32, y: i32, ch: u8) -> DrawResult {
        let w = self.font_width();
        let h = self.font_height();
        let past = |start: i32, extent: i32, limit: i32| {
            start.checked_add(extent).map_or(true, |end| end > limit)
        };
        if x < 0 || y < 0 || past(x, w, self.width()) || past(y, h, self.height()) {
            return Err(DrawError::CharScreenBounds);
        }

        let font = self.font.clone();
        let glyph = font.glyph(ch)?;
        let invert = font.is_inverted();
        let fg = self.text_fg;

        match self.text_bg {
            Some(bg) => {
                let mut cell = scratch((w * h) as usize)?;
                for row in 0..h as usize {
                    for col in 0..w as usize {
                        let on = glyph.is_set(col, row) ^ invert;
                        cell.push(if on { fg } else { bg });
                    }
                }
                self.put_window(x, y, w, h, &cell);
            }
            None => {
                for row in 0..h {
                    for col in 0..w {
                        if glyph.is_set(col as usize, row as usize) ^ invert {
                            self.draw_pixel(x + col, y + row, fg);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Render `text` starting at `(x, y)`, moving to the start of the next
    /// text row whenever a glyph would cross the right edge.
    ///
    /// Stops at the first failing character. At most
    /// [`PixelColor::MAX_STRING_CHARS`] characters are rendered.
    pub fn write_char_string(&mut self, x: i32, y: i32, text: impl AsRef<[u8]>) -> DrawResult {
        let bytes = text.as_ref();
        if bytes.is_empty() {
            return Err(DrawError::CharArrayEmpty);
        }
        if bytes.len() > C::MAX_STRING_CHARS {
            log::warn!(
                "Text of {} characters truncated to {}",
                bytes.len(),
                C::MAX_STRING_CHARS
            );
        }

        let w = self.font_width();
        let h = self.font_height();
        let (mut x, mut y) = (x, y);
        for &ch in bytes.iter().take(C::MAX_STRING_CHARS) {
            if x.saturating_add(w) > self.width() {
                x = 0;
                y = y.saturating_add(h);
            }
            self.write_char(x, y, ch)?;
            x = x.saturating_add(w);
        }
        Ok(())
    }
}

impl<S, C> ByteWrite for Canvas<S, C>
where
    S: PixelSink<C>,
    C: PixelColor,
{
    /// Write one byte at the cursor. Returns 1 when the byte was consumed
    /// and 0 when rendering failed; the failure is kept in
    /// [`Canvas::write_error`]. The cursor advances either way.
    fn write_byte(&mut self, byte: u8) -> usize {
        let w = self.font_width();
        let h = self.font_height();
        match byte {
            b'\n' => {
                self.cursor_y = self.cursor_y.saturating_add(h);
                self.cursor_x = 0;
                1
            }
            b'\r' => 1,
            _ => {
                if self.text_wrap && self.cursor_x.saturating_add(w) > self.width() {
                    self.cursor_x = 0;
                    self.cursor_y = self.cursor_y.saturating_add(h);
                }
                let result = self.write_char(self.cursor_x, self.cursor_y, byte);
                self.cursor_x = self.cursor_x.saturating_add(w);
                match result {
                    Ok(()) => 1,
                    Err(e) => {
                        self.write_error = Some(e);
                        0
                    }
                }
            }
        }
    }

    fn write_error(&self) -> Option<DrawError> {
        self.write_error
    }

    fn clear_write_error(&mut self) {
        self.write_error = None;
    }
}

/// `write!` support. A byte that fails to render aborts formatting with
/// [`fmt::Error`]; the specific cause is in [`Canvas::write_error`].
impl<S, C> fmt::Write for Canvas<S, C>
where
    S: PixelSink<C>,
    C: PixelColor,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &byte in s.as_bytes() {
            if self.write_byte(byte) == 0 {
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::canvas::tests::SpySink;
    use crate::graphics::color::{BiColor, Rgb565, RgbColor};
    use crate::graphics::font::GlyphLayout;
    use crate::graphics::framebuffer::{Framebuffer, MonoFramebuffer};
    use crate::print::Print;
    use rstest::rstest;
    use std::fmt::Write as _;

    #[rstest]
    #[case(0x1F, Err(DrawError::CharFontAsciiRange))]
    #[case(0x20, Ok(()))]
    #[case(0x80, Ok(()))]
    #[case(0x81, Err(DrawError::CharFontAsciiRange))]
    fn test_write_char_font_range(#[case] ch: u8, #[case] expected: DrawResult) {
        let mut canvas: Canvas<_, BiColor> = Canvas::new(SpySink::default(), 32, 16);
        assert_eq!(canvas.write_char(0, 0, ch), expected);
    }

    #[test]
    fn test_write_char_bounds_checked_before_range() {
        let mut canvas: Canvas<_, BiColor> = Canvas::new(SpySink::default(), 96, 16);
        assert_eq!(canvas.write_char(91, 0, b'A'), Err(DrawError::CharScreenBounds));
        assert_eq!(canvas.write_char(0, 9, b'A'), Err(DrawError::CharScreenBounds));
        assert_eq!(canvas.write_char(-1, 0, 0x01), Err(DrawError::CharScreenBounds));
        assert_eq!(canvas.sink().total_writes(), 0);
        assert!(canvas.write_char(90, 8, b'A').is_ok());
    }

    #[rstest]
    #[case(i32::MAX, 0)]
    #[case(0, i32::MAX)]
    #[case(i32::MAX - 3, i32::MAX - 3)]
    fn test_write_char_far_edge_is_out_of_bounds(#[case] x: i32, #[case] y: i32) {
        let mut canvas: Canvas<_, BiColor> = Canvas::new(SpySink::default(), 96, 16);
        assert_eq!(canvas.write_char(x, y, b'A'), Err(DrawError::CharScreenBounds));
        assert_eq!(canvas.sink().total_writes(), 0);
    }

    #[test]
    fn test_cursor_at_far_edge_records_error() {
        let mut canvas: Canvas<_, BiColor> = Canvas::new(SpySink::default(), 96, 16);
        canvas.set_text_wrap(false);
        canvas.set_cursor(i32::MAX - 2, 0);
        assert_eq!(canvas.write_byte(b'A'), 0);
        assert_eq!(canvas.write_error(), Some(DrawError::CharScreenBounds));
        assert_eq!(canvas.cursor(), (i32::MAX, 0));
        canvas.set_cursor(0, i32::MAX);
        assert_eq!(canvas.write_byte(b'\n'), 1);
        assert_eq!(canvas.cursor(), (0, i32::MAX));
    }

    #[test]
    fn test_opaque_glyph_is_one_window() {
        let mut canvas: Canvas<_, Rgb565> = Canvas::new(SpySink::default(), 32, 16);
        canvas.write_char(6, 8, b'x').unwrap();
        assert_eq!(canvas.sink().windows, vec![(6, 8, 6, 8)]);
        assert!(canvas.sink().pixels.is_empty());
    }

    #[test]
    fn test_transparent_glyph_draws_set_bits_only() {
        let mut canvas: Canvas<_, Rgb565> = Canvas::new(SpySink::default(), 32, 16);
        canvas.set_text_color(Rgb565::RED);
        canvas.write_char(0, 0, b' ').unwrap();
        assert_eq!(canvas.sink().total_writes(), 0);
        canvas.write_char(0, 0, b'!').unwrap();
        // '!' = 0x5F: rows 0-4 and 6 of one column.
        let pixels: Vec<_> = canvas.sink().pixels.iter().map(|&(x, y, _)| (x, y)).collect();
        assert_eq!(pixels, vec![(2, 0), (2, 1), (2, 2), (2, 3), (2, 4), (2, 6)]);
    }

    #[test]
    fn test_inverted_font_swaps_cell() {
        let mut canvas: Canvas<_, BiColor> = Canvas::new(MonoFramebuffer::new(8, 8), 8, 8);
        canvas.set_custom_font(Font::named(FontName::Default).with_invert(true));
        canvas.write_char(0, 0, b' ').unwrap();
        assert_eq!(canvas.sink().lit_count(), 48);
    }

    #[test]
    fn test_custom_rows_font() {
        let font = Font::new(vec![0x81; 8], 8, 8, b'#', 0, GlyphLayout::Rows).unwrap();
        let mut canvas: Canvas<_, Rgb565> = Canvas::new(Framebuffer::new(8, 8), 8, 8);
        canvas.set_custom_font(font);
        canvas.set_text_colors(Rgb565::WHITE, Rgb565::BLUE);
        canvas.write_char(0, 0, b'#').unwrap();
        assert_eq!(canvas.sink().get_pixel(0, 3), Some(Rgb565::WHITE));
        assert_eq!(canvas.sink().get_pixel(7, 3), Some(Rgb565::WHITE));
        assert_eq!(canvas.sink().get_pixel(3, 3), Some(Rgb565::BLUE));
        assert_eq!(canvas.write_char(0, 0, b'$'), Err(DrawError::CharFontAsciiRange));
    }

    #[test]
    fn test_write_char_string_empty() {
        let mut canvas: Canvas<_, BiColor> = Canvas::new(SpySink::default(), 96, 16);
        assert_eq!(canvas.write_char_string(0, 0, ""), Err(DrawError::CharArrayEmpty));
    }

    #[test]
    fn test_clock_lines_fit_without_wrap() {
        let mut canvas: Canvas<_, BiColor> = Canvas::new(SpySink::default(), 96, 16);
        canvas.write_char_string(0, 0, "2024-01-01").unwrap();
        canvas.write_char_string(0, 8, "12:30:00").unwrap();
        let rows: Vec<_> = canvas.sink().windows.iter().map(|w| w.1).collect();
        assert_eq!(rows.iter().filter(|&&y| y == 0).count(), 10);
        assert_eq!(rows.iter().filter(|&&y| y == 8).count(), 8);
    }

    #[test]
    fn test_long_string_wraps_after_sixteen() {
        let mut canvas: Canvas<_, BiColor> = Canvas::new(SpySink::default(), 96, 16);
        canvas.write_char_string(0, 0, "ABCDEFGHIJKLMNOPQRST").unwrap();
        let windows = &canvas.sink().windows;
        assert_eq!(windows.len(), 20);
        assert_eq!((windows[15].0, windows[15].1), (90, 0));
        assert_eq!((windows[16].0, windows[16].1), (0, 8));
        assert_eq!((windows[19].0, windows[19].1), (18, 8));
    }

    #[test]
    fn test_string_stops_at_first_failure() {
        let mut canvas: Canvas<_, BiColor> = Canvas::new(SpySink::default(), 96, 16);
        assert_eq!(
            canvas.write_char_string(0, 0, [b'A', b'B', 0x01, b'C']),
            Err(DrawError::CharFontAsciiRange)
        );
        assert_eq!(canvas.sink().windows.len(), 2);
    }

    #[rstest]
    #[case::mono(BiColor::MAX_STRING_CHARS, 150)]
    #[case::color(Rgb565::MAX_STRING_CHARS, 250)]
    fn test_string_limits(#[case] limit: usize, #[case] expected: usize) {
        assert_eq!(limit, expected);
    }

    #[test]
    fn test_string_capped_at_limit() {
        let mut canvas: Canvas<_, BiColor> = Canvas::new(SpySink::default(), 96, 200);
        let text = vec![b'x'; 200];
        canvas.write_char_string(0, 0, &text).unwrap();
        assert_eq!(canvas.sink().windows.len(), BiColor::MAX_STRING_CHARS);
    }

    #[test]
    fn test_stream_newline_and_carriage_return() {
        let mut canvas: Canvas<_, BiColor> = Canvas::new(SpySink::default(), 96, 32);
        canvas.set_cursor(12, 0);
        assert_eq!(canvas.write_byte(b'\r'), 1);
        assert_eq!(canvas.cursor(), (12, 0));
        assert_eq!(canvas.write_byte(b'\n'), 1);
        assert_eq!(canvas.cursor(), (0, 8));
        assert_eq!(canvas.write_byte(b'A'), 1);
        assert_eq!(canvas.cursor(), (6, 8));
    }

    #[test]
    fn test_stream_wraps_when_enabled() {
        let mut canvas: Canvas<_, BiColor> = Canvas::new(SpySink::default(), 12, 16);
        assert_eq!(canvas.write_bytes(b"abc"), 3);
        assert_eq!(canvas.cursor(), (6, 8));
        assert!(canvas.write_error().is_none());
    }

    #[test]
    fn test_stream_error_is_sticky() {
        let mut canvas: Canvas<_, BiColor> = Canvas::new(SpySink::default(), 12, 16);
        canvas.set_text_wrap(false);
        assert_eq!(canvas.write_byte(b'a'), 1);
        assert_eq!(canvas.write_byte(b'b'), 1);
        assert_eq!(canvas.write_byte(b'c'), 0);
        assert_eq!(canvas.cursor(), (18, 0));
        assert_eq!(canvas.write_error(), Some(DrawError::CharScreenBounds));

        canvas.set_cursor(0, 8);
        assert_eq!(canvas.write_byte(b'd'), 1);
        assert_eq!(canvas.write_error(), Some(DrawError::CharScreenBounds));
        canvas.clear_write_error();
        assert!(canvas.write_error().is_none());
    }

    #[test]
    fn test_fmt_write() {
        let mut canvas: Canvas<_, Rgb565> = Canvas::new(SpySink::default(), 96, 16);
        write!(canvas, "{}:{:02}", 7, 5).unwrap();
        assert_eq!(canvas.cursor(), (24, 0));
        assert_eq!(canvas.sink().windows.len(), 4);

        canvas.set_cursor(0, 0);
        assert!(write!(canvas, "\u{7}").is_err());
        assert_eq!(canvas.write_error(), Some(DrawError::CharFontAsciiRange));
    }
}
