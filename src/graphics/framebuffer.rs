//! In-memory pixel sinks.
//!
//! [`Framebuffer`] keeps one colour value per pixel and is what the colour
//! demo and most tests render into. [`MonoFramebuffer`] stores pixels packed
//! eight to a byte in vertical pages, the layout OLED and LCD controllers
//! expect when the buffer is shipped to them in one transfer.
//!
//! Both store pixels in the panel's physical orientation and translate the
//! logical coordinates they receive according to the current rotation.

use std::collections::BTreeSet;

use crate::graphics::canvas::Rotation;
use crate::graphics::color::{BiColor, PixelColor};
use crate::graphics::sink::PixelSink;

fn logical_size(rotation: Rotation, phys_width: i32, phys_height: i32) -> (i32, i32) {
    if rotation.is_quarter_turn() {
        (phys_height, phys_width)
    } else {
        (phys_width, phys_height)
    }
}

/// Map a logical coordinate to a physical `(column, row)` pair.
pub(crate) fn to_physical(
    rotation: Rotation,
    phys_width: i32,
    phys_height: i32,
    x: i32,
    y: i32,
) -> Option<(usize, usize)> {
    let (lw, lh) = logical_size(rotation, phys_width, phys_height);
    if x < 0 || y < 0 || x >= lw || y >= lh {
        return None;
    }
    let (px, py) = match rotation {
        Rotation::Deg0 => (x, y),
        Rotation::Deg90 => (phys_width - 1 - y, x),
        Rotation::Deg180 => (phys_width - 1 - x, phys_height - 1 - y),
        Rotation::Deg270 => (y, phys_height - 1 - x),
    };
    Some((px as usize, py as usize))
}

/// One colour value per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer<C> {
    width: i32,
    height: i32,
    rotation: Rotation,
    pixels: Vec<C>,
}

impl<C: PixelColor> Framebuffer<C> {
    /// Buffer cleared to the colour's background.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, C::BACKGROUND)
    }

    pub fn filled(width: i32, height: i32, color: C) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            rotation: Rotation::Deg0,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Physical width.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Physical height.
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Pixels in physical row-major order.
    pub fn pixels(&self) -> &[C] {
        &self.pixels
    }

    pub fn fill(&mut self, color: C) {
        self.pixels.iter_mut().for_each(|p| *p = color);
    }

    /// Pixel at a logical coordinate.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<C> {
        to_physical(self.rotation, self.width, self.height, x, y)
            .map(|(px, py)| self.pixels[py * self.width as usize + px])
    }

    /// Width and height as seen through the current rotation.
    pub fn logical_size(&self) -> (i32, i32) {
        logical_size(self.rotation, self.width, self.height)
    }

    /// Logical coordinates of every pixel holding `color`.
    pub fn points_with(&self, color: C) -> BTreeSet<(i32, i32)> {
        let (lw, lh) = self.logical_size();
        let mut points = BTreeSet::new();
        for y in 0..lh {
            for x in 0..lw {
                if self.get_pixel(x, y) == Some(color) {
                    points.insert((x, y));
                }
            }
        }
        points
    }
}

impl<C: PixelColor> PixelSink<C> for Framebuffer<C> {
    fn set_pixel(&mut self, x: i32, y: i32, color: C) {
        if let Some((px, py)) = to_physical(self.rotation, self.width, self.height, x, y) {
            let slot = &mut self.pixels[py * self.width as usize + px];
            *slot = color.resolve(*slot);
        }
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }
}

/// 1-bit buffer packed in vertical pages: byte `x + (y / 8) * width` holds
/// the column of eight pixels starting at row `y & !7`, least significant
/// bit on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoFramebuffer {
    width: i32,
    height: i32,
    rotation: Rotation,
    bytes: Vec<u8>,
}

impl MonoFramebuffer {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let pages = (height as usize + 7) / 8;
        Self {
            width,
            height,
            rotation: Rotation::Deg0,
            bytes: vec![0; width as usize * pages],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn logical_size(&self) -> (i32, i32) {
        logical_size(self.rotation, self.width, self.height)
    }

    /// Packed buffer ready for transfer to the controller.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn clear(&mut self) {
        self.bytes.iter_mut().for_each(|b| *b = 0);
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        to_physical(self.rotation, self.width, self.height, x, y)
            .map(|(px, py)| (px + (py / 8) * self.width as usize, 1u8 << (py % 8)))
    }

    /// Pixel at a logical coordinate.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<BiColor> {
        self.locate(x, y).map(|(index, mask)| {
            if self.bytes[index] & mask != 0 {
                BiColor::Foreground
            } else {
                BiColor::Background
            }
        })
    }

    /// Number of pixels currently switched on.
    pub fn lit_count(&self) -> u32 {
        self.bytes.iter().map(|b| b.count_ones()).sum()
    }
}

impl PixelSink<BiColor> for MonoFramebuffer {
    fn set_pixel(&mut self, x: i32, y: i32, color: BiColor) {
        if let Some((index, mask)) = self.locate(x, y) {
            match color {
                BiColor::Foreground => self.bytes[index] |= mask,
                BiColor::Background => self.bytes[index] &= !mask,
                BiColor::Invert => self.bytes[index] ^= mask,
            }
        }
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }
}
