//! Pixel sink capability.
//!
//! The drawing core never talks to hardware directly. Everything it renders
//! ends up as calls on a [`PixelSink`]: one pixel at a time, or, when the
//! backend can do better, as horizontal/vertical spans and rectangular
//! windows. Colour TFT controllers expose an address window plus a raw byte
//! stream; [`BlockAdapter`] turns such a [`BlockTransport`] into a sink.
//! Existing `embedded-graphics` display drivers plug in through
//! [`DrawTargetSink`].
//!
//! Coordinates handed to a sink are always inside the logical canvas; the
//! canvas clips before dispatching.

use embedded_graphics_core::draw_target::DrawTarget;
use embedded_graphics_core::geometry::{Dimensions, Point, Size};
use embedded_graphics_core::primitives::Rectangle;
use embedded_graphics_core::Pixel;

use crate::graphics::canvas::Rotation;
use crate::graphics::color::{PixelColor, Rgb565, Rgb565Ext};
use crate::graphics::framebuffer::to_physical;

/// Destination for rasterised pixels.
pub trait PixelSink<C: PixelColor> {
    /// Set pixel `(x, y)` to `color`.
    fn set_pixel(&mut self, x: i32, y: i32, color: C);

    /// Horizontal run of `w` pixels starting at `(x, y)`.
    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: C) {
        for i in 0..w {
            self.set_pixel(x + i, y, color);
        }
    }

    /// Vertical run of `h` pixels starting at `(x, y)`.
    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: C) {
        for j in 0..h {
            self.set_pixel(x, y + j, color);
        }
    }

    /// Row-major `w` x `h` block of pixels with its top-left corner at `(x, y)`.
    fn write_window(&mut self, x: i32, y: i32, w: i32, h: i32, pixels: &[C]) {
        if w <= 0 || h <= 0 {
            return;
        }
        let count = (w as usize).saturating_mul(h as usize);
        for (i, &color) in pixels.iter().take(count).enumerate() {
            let i = i as i32;
            self.set_pixel(x + i % w, y + i / w, color);
        }
    }

    /// Notification that the logical orientation changed.
    fn set_rotation(&mut self, rotation: Rotation) {
        let _ = rotation;
    }
}

impl<C: PixelColor, S: PixelSink<C> + ?Sized> PixelSink<C> for &mut S {
    fn set_pixel(&mut self, x: i32, y: i32, color: C) {
        (**self).set_pixel(x, y, color)
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: C) {
        (**self).draw_hline(x, y, w, color)
    }

    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: C) {
        (**self).draw_vline(x, y, h, color)
    }

    fn write_window(&mut self, x: i32, y: i32, w: i32, h: i32, pixels: &[C]) {
        (**self).write_window(x, y, w, h, pixels)
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        (**self).set_rotation(rotation)
    }
}

/// Byte-stream interface of a colour panel controller.
pub trait BlockTransport {
    /// Select the inclusive rectangle `(x0, y0)..=(x1, y1)` as the target of
    /// the next [`write_block`](Self::write_block).
    fn set_address_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16);

    /// Stream pre-formatted pixel bytes into the current window.
    fn write_block(&mut self, bytes: &[u8]);

    /// Program the controller's scan direction for `rotation`.
    fn set_rotation(&mut self, rotation: Rotation) {
        let _ = rotation;
    }
}

/// Adapts a [`BlockTransport`] to the [`PixelSink`] contract.
///
/// Every span or window becomes one address-window selection followed by a
/// single byte-stream write of big-endian RGB565 values.
#[derive(Debug)]
pub struct BlockAdapter<T> {
    transport: T,
    bytes: Vec<u8>,
}

impl<T: BlockTransport> BlockAdapter<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            bytes: Vec::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    fn send<I>(&mut self, x: i32, y: i32, w: i32, h: i32, colors: I)
    where
        I: IntoIterator<Item = Rgb565>,
    {
        if x < 0 || y < 0 || w <= 0 || h <= 0 {
            return;
        }
        let (Ok(x0), Ok(y0), Ok(x1), Ok(y1)) = (
            u16::try_from(x),
            u16::try_from(y),
            u16::try_from(x.saturating_add(w - 1)),
            u16::try_from(y.saturating_add(h - 1)),
        ) else {
            return;
        };

        self.bytes.clear();
        for color in colors {
            self.bytes.extend_from_slice(&color.to_be_bytes());
        }
        self.transport.set_address_window(x0, y0, x1, y1);
        self.transport.write_block(&self.bytes);
    }
}

impl<T: BlockTransport> PixelSink<Rgb565> for BlockAdapter<T> {
    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        self.send(x, y, 1, 1, std::iter::once(color));
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: Rgb565) {
        self.send(x, y, w, 1, std::iter::repeat(color).take(w.max(0) as usize));
    }

    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: Rgb565) {
        self.send(x, y, 1, h, std::iter::repeat(color).take(h.max(0) as usize));
    }

    fn write_window(&mut self, x: i32, y: i32, w: i32, h: i32, pixels: &[Rgb565]) {
        let count = (w.max(0) as usize).saturating_mul(h.max(0) as usize);
        self.send(x, y, w, h, pixels.iter().copied().take(count));
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.transport.set_rotation(rotation);
    }
}

/// Adapts an `embedded-graphics` [`DrawTarget`] to the [`PixelSink`] contract.
///
/// Logical coordinates are mapped through the current rotation onto the
/// target's bounding box, so the target itself always sees its native
/// orientation. Spans become one `fill_solid` call each.
///
/// A colour with no native equivalent ([`BiColor::Invert`]) cannot be
/// written without reading the panel back and is dropped. Draw through the
/// canvas screen buffer to have it resolved first.
///
/// [`BiColor::Invert`]: crate::graphics::BiColor::Invert
#[derive(Debug)]
pub struct DrawTargetSink<D> {
    target: D,
    rotation: Rotation,
    failed_writes: usize,
}

impl<D: DrawTarget> DrawTargetSink<D> {
    pub fn new(target: D) -> Self {
        Self {
            target,
            rotation: Rotation::Deg0,
            failed_writes: 0,
        }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }

    /// Number of writes the target rejected.
    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    fn to_target(&self, x: i32, y: i32) -> Option<Point> {
        let area = self.target.bounding_box();
        let width = i32::try_from(area.size.width).ok()?;
        let height = i32::try_from(area.size.height).ok()?;
        to_physical(self.rotation, width, height, x, y)
            .map(|(px, py)| area.top_left + Point::new(px as i32, py as i32))
    }

    fn record<E>(&mut self, result: Result<(), E>) {
        if result.is_err() {
            self.failed_writes += 1;
            log::warn!("Draw target rejected a write ({} so far)", self.failed_writes);
        }
    }

    /// Solid `w` x `h` block. Rotation keeps rectangles axis-aligned, so
    /// the two mapped corners bound the physical area.
    fn fill_block(&mut self, x: i32, y: i32, w: i32, h: i32, color: D::Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (Some(a), Some(b)) = (
            self.to_target(x, y),
            self.to_target(x.saturating_add(w - 1), y.saturating_add(h - 1)),
        ) else {
            return;
        };
        let top_left = Point::new(a.x.min(b.x), a.y.min(b.y));
        let size = Size::new(a.x.abs_diff(b.x) + 1, a.y.abs_diff(b.y) + 1);
        let result = self.target.fill_solid(&Rectangle::new(top_left, size), color);
        self.record(result);
    }
}

impl<C, D> PixelSink<C> for DrawTargetSink<D>
where
    C: PixelColor,
    D: DrawTarget<Color = C::Native>,
{
    fn set_pixel(&mut self, x: i32, y: i32, color: C) {
        let (Some(point), Some(native)) = (self.to_target(x, y), color.to_native()) else {
            return;
        };
        let result = self.target.draw_iter(std::iter::once(Pixel(point, native)));
        self.record(result);
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: C) {
        if let Some(native) = color.to_native() {
            self.fill_block(x, y, w, 1, native);
        }
    }

    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: C) {
        if let Some(native) = color.to_native() {
            self.fill_block(x, y, 1, h, native);
        }
    }

    fn write_window(&mut self, x: i32, y: i32, w: i32, h: i32, pixels: &[C]) {
        if w <= 0 || h <= 0 {
            return;
        }
        let count = (w as usize).saturating_mul(h as usize);
        let batch: Vec<_> = pixels
            .iter()
            .take(count)
            .enumerate()
            .filter_map(|(i, color)| {
                let i = i as i32;
                let point = self.to_target(x + i % w, y + i / w)?;
                Some(Pixel(point, color.to_native()?))
            })
            .collect();
        let result = self.target.draw_iter(batch);
        self.record(result);
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }
}
