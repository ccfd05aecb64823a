//! Blitting caller-owned pixel data.
//!
//! 1-bit data (bitmaps and icons) works with either colour family and is
//! validated completely before anything is drawn. 16- and 24-bit data is
//! RGB565 only; it must match its declared size exactly but is clipped at
//! the right and bottom edges.

use crate::graphics::canvas::{BitmapAddressing, Canvas};
use crate::graphics::color::{PixelColor, Rgb565, Rgb565Ext};
use crate::graphics::error::{scratch, DrawError, DrawResult};
use crate::graphics::sink::PixelSink;

/// Icons are always one byte (eight pixels) tall.
pub const ICON_HEIGHT: i32 = 8;

impl<S, C> Canvas<S, C>
where
    S: PixelSink<C>,
    C: PixelColor,
{
    /// Paint a `w` x `h` block whose pixel values come from `pixel(col, row)`.
    ///
    /// Blocks that fit go out as one window; anything overhanging an edge
    /// falls back to clipped single pixels.
    fn blit<F>(&mut self, x: i32, y: i32, w: i32, h: i32, pixel: F) -> DrawResult
    where
        F: Fn(usize, usize) -> C,
    {
        if x.saturating_add(w) <= self.width() && y.saturating_add(h) <= self.height() {
            let mut window = scratch((w * h) as usize)?;
            for row in 0..h as usize {
                for col in 0..w as usize {
                    window.push(pixel(col, row));
                }
            }
            self.put_window(x, y, w, h, &window);
        } else {
            for row in 0..h {
                for col in 0..w {
                    self.draw_pixel(x + col, y + row, pixel(col as usize, row as usize));
                }
            }
        }
        Ok(())
    }

    /// Draw a 1-bit bitmap packed according to [`Canvas::bitmap_addressing`].
    ///
    /// Set bits take `fg`, clear bits `bg`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        fg: C,
        bg: C,
        data: &[u8],
    ) -> DrawResult {
        if !self.contains(x, y) {
            return Err(DrawError::BitmapScreenBounds);
        }
        if w > self.width() || h > self.height() {
            return Err(DrawError::BitmapLargerThanScreen);
        }
        if data.is_empty() {
            return Err(DrawError::BitmapEmpty);
        }
        if w <= 0 || h <= 0 {
            return Err(DrawError::BitmapSize);
        }

        let addressing = self.bitmap_addressing();
        let expected = match addressing {
            BitmapAddressing::Vertical => {
                if h % 8 != 0 {
                    return Err(DrawError::BitmapVerticalSize);
                }
                w * (h / 8)
            }
            BitmapAddressing::Horizontal => {
                if w % 8 != 0 {
                    return Err(DrawError::BitmapHorizontalSize);
                }
                (w / 8) * h
            }
        };
        if data.len() != expected as usize {
            return Err(DrawError::BitmapSize);
        }

        let stride = w as usize;
        self.blit(x, y, w, h, |col, row| {
            let set = match addressing {
                BitmapAddressing::Vertical => data[col + (row / 8) * stride] & (1 << (row % 8)) != 0,
                BitmapAddressing::Horizontal => {
                    data[row * (stride / 8) + col / 8] & (0x80 >> (col % 8)) != 0
                }
            };
            if set {
                fg
            } else {
                bg
            }
        })
    }

    /// Draw an 8-pixel-tall icon: one byte per column, least significant
    /// bit on top.
    pub fn draw_icon(&mut self, x: i32, y: i32, w: i32, fg: C, bg: C, data: &[u8]) -> DrawResult {
        if !self.contains(x, y) {
            return Err(DrawError::BitmapScreenBounds);
        }
        if data.is_empty() {
            return Err(DrawError::BitmapEmpty);
        }
        if w <= 0 || data.len() != w as usize {
            return Err(DrawError::BitmapSize);
        }
        self.blit(x, y, w, ICON_HEIGHT, |col, row| {
            if data[col] & (1 << row) != 0 {
                fg
            } else {
                bg
            }
        })
    }
}

impl<S> Canvas<S, Rgb565>
where
    S: PixelSink<Rgb565>,
{
    /// Validate a colour bitmap and return the on-canvas part of it.
    fn color_extent(
        &self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        data: &[u8],
        bytes_per_pixel: usize,
    ) -> DrawResult<(i32, i32)> {
        if !self.contains(x, y) {
            return Err(DrawError::BitmapScreenBounds);
        }
        if data.is_empty() {
            return Err(DrawError::BitmapEmpty);
        }
        if w <= 0 || h <= 0 || data.len() != w as usize * h as usize * bytes_per_pixel {
            return Err(DrawError::BitmapSize);
        }
        Ok((w.min(self.width() - x), h.min(self.height() - y)))
    }

    /// Draw little-endian RGB565 data, skipping pixels equal to
    /// `transparent`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_sprite(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        data: &[u8],
        transparent: Rgb565,
    ) -> DrawResult {
        self.color_extent(x, y, w, h, data, 2)?;
        for (i, bytes) in data.chunks_exact(2).enumerate() {
            let color = Rgb565::from_le_bytes([bytes[0], bytes[1]]);
            if color != transparent {
                let i = i as i32;
                self.draw_pixel(x + i % w, y + i / w, color);
            }
        }
        Ok(())
    }

    /// Draw little-endian RGB565 data, clipped to the canvas.
    pub fn draw_bitmap16(&mut self, x: i32, y: i32, w: i32, h: i32, data: &[u8]) -> DrawResult {
        let (cw, ch) = self.color_extent(x, y, w, h, data, 2)?;
        let stride = w as usize;
        let mut window = scratch((cw * ch) as usize)?;
        for row in 0..ch as usize {
            for col in 0..cw as usize {
                let i = (row * stride + col) * 2;
                window.push(Rgb565::from_le_bytes([data[i], data[i + 1]]));
            }
        }
        self.put_window(x, y, cw, ch, &window);
        Ok(())
    }

    /// Draw packed RGB888 data stored bottom row first, as in a BMP file.
    /// Clipped to the canvas.
    pub fn draw_bitmap24(&mut self, x: i32, y: i32, w: i32, h: i32, data: &[u8]) -> DrawResult {
        let (cw, ch) = self.color_extent(x, y, w, h, data, 3)?;
        let stride = w as usize;
        let mut window = scratch((cw * ch) as usize)?;
        for row in 0..ch as usize {
            let src_row = h as usize - 1 - row;
            for col in 0..cw as usize {
                let i = (src_row * stride + col) * 3;
                window.push(Rgb565::from_rgb888(data[i], data[i + 1], data[i + 2]));
            }
        }
        self.put_window(x, y, cw, ch, &window);
        Ok(())
    }
}
