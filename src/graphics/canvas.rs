//! Logical drawing surface.
//!
//! A [`Canvas`] owns a [`PixelSink`] and all the state that drawing calls
//! depend on: current size and rotation, the active font, text colours and
//! cursor, arc-angle tunables, the bitmap addressing mode, the sticky error
//! from the streaming write path, and the optional screen buffer.
//!
//! # Direct vs buffered
//!
//! By default every pixel goes straight to the sink. After
//! [`Canvas::set_buffer`] and [`Canvas::set_advanced_screen_buffer`] drawing
//! lands in an owned buffer instead, and [`Canvas::write_buffer`] ships the
//! whole buffer to the sink as one window.
//!
//! # Clipping
//!
//! The canvas never hands the sink a coordinate outside the current
//! width/height. Pixel and span helpers clip silently; individual drawing
//! routines decide whether an off-screen request is an error.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::graphics::color::PixelColor;
use crate::graphics::error::{scratch, DrawError, DrawResult};
use crate::graphics::font::Font;
use crate::graphics::sink::PixelSink;

/// Display orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// True when width and height are swapped relative to the panel.
    pub const fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Byte packing of 1-bit bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitmapAddressing {
    /// Each byte is a column of 8 pixels, least significant bit on top.
    #[default]
    Vertical,
    /// Each byte is a run of 8 pixels along a row, most significant bit first.
    Horizontal,
}

pub const DEFAULT_ARC_ANGLE_MAX: f32 = 360.0;
pub const DEFAULT_ARC_ANGLE_OFFSET: f32 = 0.0;

/// Canvas behind a mutex, for callers that share one display session
/// between threads.
pub type SharedCanvas<S, C> = Arc<Mutex<Canvas<S, C>>>;

/// Drawing surface bound to a pixel sink.
pub struct Canvas<S, C: PixelColor> {
    sink: S,
    base_width: i32,
    base_height: i32,
    width: i32,
    height: i32,
    rotation: Rotation,

    pub(crate) font: Font,
    pub(crate) text_fg: C,
    pub(crate) text_bg: Option<C>,
    pub(crate) cursor_x: i32,
    pub(crate) cursor_y: i32,
    pub(crate) text_wrap: bool,
    pub(crate) write_error: Option<DrawError>,

    arc_angle_max: f32,
    arc_angle_offset: f32,
    bitmap_addressing: BitmapAddressing,

    buffer: Option<Vec<C>>,
    buffer_active: bool,
}

impl<S, C> Canvas<S, C>
where
    S: PixelSink<C>,
    C: PixelColor,
{
    /// Create a canvas over `sink` with the panel's native size.
    pub fn new(sink: S, width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            sink,
            base_width: width,
            base_height: height,
            width,
            height,
            rotation: Rotation::Deg0,
            font: Font::default(),
            text_fg: C::FOREGROUND,
            text_bg: Some(C::BACKGROUND),
            cursor_x: 0,
            cursor_y: 0,
            text_wrap: true,
            write_error: None,
            arc_angle_max: DEFAULT_ARC_ANGLE_MAX,
            arc_angle_offset: DEFAULT_ARC_ANGLE_OFFSET,
            bitmap_addressing: BitmapAddressing::default(),
            buffer: None,
            buffer_active: false,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn into_shared(self) -> SharedCanvas<S, C> {
        Arc::new(Mutex::new(self))
    }

    /// Current width, reflecting rotation.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Current height, reflecting rotation.
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Change orientation. A screen buffer whose row stride no longer
    /// matches the new width is cleared to the background colour.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        let previous_width = self.width;
        self.rotation = rotation;
        if rotation.is_quarter_turn() {
            self.width = self.base_height;
            self.height = self.base_width;
        } else {
            self.width = self.base_width;
            self.height = self.base_height;
        }
        self.sink.set_rotation(rotation);
        if previous_width != self.width {
            if let Some(buffer) = self.buffer.as_mut() {
                buffer.iter_mut().for_each(|p| *p = C::BACKGROUND);
                log::debug!("Screen buffer cleared for the new row stride");
            }
        }
        log::debug!(
            "Rotation set to {} degrees ({}x{})",
            rotation.degrees(),
            self.width,
            self.height
        );
    }

    /// Whether `(x, y)` lies on the canvas.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Whether the box reaching `rx` and `ry` either side of `(cx, cy)` is
    /// representable in `i32` and overlaps the canvas.
    pub(crate) fn reaches(&self, cx: i32, cy: i32, rx: i32, ry: i32) -> bool {
        let axis = |c: i32, r: i32, size: i32| match (c.checked_sub(r), c.checked_add(r)) {
            (Some(lo), Some(hi)) => hi >= 0 && lo < size,
            _ => false,
        };
        rx >= 0 && ry >= 0 && axis(cx, rx, self.width) && axis(cy, ry, self.height)
    }

    pub fn arc_angle_max(&self) -> f32 {
        self.arc_angle_max
    }

    /// Set the value that represents a full turn for arc angles.
    pub fn set_arc_angle_max(&mut self, max: f32) {
        self.arc_angle_max = max;
    }

    pub fn arc_angle_offset(&self) -> f32 {
        self.arc_angle_offset
    }

    /// Rotate the zero direction of subsequent arcs by `offset` degrees.
    pub fn set_arc_angle_offset(&mut self, offset: f32) {
        self.arc_angle_offset = offset;
    }

    pub fn bitmap_addressing(&self) -> BitmapAddressing {
        self.bitmap_addressing
    }

    pub fn set_bitmap_addressing(&mut self, mode: BitmapAddressing) {
        self.bitmap_addressing = mode;
    }

    /// Most recent failure from the streaming write path.
    pub fn write_error(&self) -> Option<DrawError> {
        self.write_error
    }

    pub fn clear_write_error(&mut self) {
        self.write_error = None;
    }

    /// Set one pixel. Off-canvas coordinates are ignored.
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: C) {
        if !self.contains(x, y) {
            return;
        }
        if self.buffer_active {
            self.buffer_put(x, y, color);
        } else {
            self.sink.set_pixel(x, y, color);
        }
    }

    /// Paint the whole canvas.
    pub fn fill_screen(&mut self, color: C) {
        for y in 0..self.height {
            self.hspan(0, y, self.width, color);
        }
    }

    /// Horizontal span clipped to the canvas on both ends.
    pub(crate) fn hspan(&mut self, x: i32, y: i32, w: i32, color: C) {
        if w <= 0 || y < 0 || y >= self.height {
            return;
        }
        let x0 = x.max(0);
        let x1 = x.saturating_add(w).min(self.width);
        if x1 <= x0 {
            return;
        }
        if self.buffer_active {
            for px in x0..x1 {
                self.buffer_put(px, y, color);
            }
        } else {
            self.sink.draw_hline(x0, y, x1 - x0, color);
        }
    }

    /// Vertical span clipped to the canvas on both ends.
    pub(crate) fn vspan(&mut self, x: i32, y: i32, h: i32, color: C) {
        if h <= 0 || x < 0 || x >= self.width {
            return;
        }
        let y0 = y.max(0);
        let y1 = y.saturating_add(h).min(self.height);
        if y1 <= y0 {
            return;
        }
        if self.buffer_active {
            for py in y0..y1 {
                self.buffer_put(x, py, color);
            }
        } else {
            self.sink.draw_vline(x, y0, y1 - y0, color);
        }
    }

    /// Clipped rectangle fill used by composite shapes.
    pub(crate) fn fill_area(&mut self, x: i32, y: i32, w: i32, h: i32, color: C) {
        if w <= 0 || h <= 0 {
            return;
        }
        let y0 = y.max(0);
        let y1 = y.saturating_add(h).min(self.height);
        for row in y0..y1 {
            self.hspan(x, row, w, color);
        }
    }

    /// Write a `w` x `h` block that lies entirely on the canvas.
    pub(crate) fn put_window(&mut self, x: i32, y: i32, w: i32, h: i32, pixels: &[C]) {
        debug_assert!(self.contains(x, y) && self.contains(x + w - 1, y + h - 1));
        if self.buffer_active {
            for (i, &color) in pixels.iter().take((w * h) as usize).enumerate() {
                let i = i as i32;
                self.buffer_put(x + i % w, y + i / w, color);
            }
        } else {
            self.sink.write_window(x, y, w, h, pixels);
        }
    }

    fn buffer_put(&mut self, x: i32, y: i32, color: C) {
        let index = y as usize * self.width as usize + x as usize;
        if let Some(buffer) = self.buffer.as_mut() {
            if let Some(slot) = buffer.get_mut(index) {
                *slot = color.resolve(*slot);
            }
        }
    }

    /// Allocate the screen buffer, cleared to the background colour.
    pub fn set_buffer(&mut self) -> DrawResult {
        let len = (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or(DrawError::MemoryAllocation)?;
        let mut buffer = scratch(len)?;
        buffer.resize(len, C::BACKGROUND);
        self.buffer = Some(buffer);
        log::debug!("Screen buffer allocated ({} pixels)", len);
        Ok(())
    }

    pub fn has_buffer(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn is_buffer_active(&self) -> bool {
        self.buffer_active
    }

    /// Route drawing into the screen buffer (`true`) or straight to the sink.
    pub fn set_advanced_screen_buffer(&mut self, on: bool) -> DrawResult {
        if on && self.buffer.is_none() {
            log::warn!("Advanced screen buffer requested without an allocated buffer");
            return Err(DrawError::BufferNotAllocated);
        }
        self.buffer_active = on;
        Ok(())
    }

    pub fn clear_buffer(&mut self, color: C) -> DrawResult {
        let buffer = self.buffer.as_mut().ok_or_else(|| {
            log::warn!("clear_buffer called without an allocated buffer");
            DrawError::BufferNotAllocated
        })?;
        buffer.iter_mut().for_each(|p| *p = color);
        log::debug!("Screen buffer cleared");
        Ok(())
    }

    /// Send the screen buffer to the sink as one window.
    pub fn write_buffer(&mut self) -> DrawResult {
        let buffer = self.buffer.as_ref().ok_or_else(|| {
            log::warn!("write_buffer called without an allocated buffer");
            DrawError::BufferNotAllocated
        })?;
        self.sink
            .write_window(0, 0, self.width, self.height, buffer.as_slice());
        log::debug!("Screen buffer written ({}x{})", self.width, self.height);
        Ok(())
    }

    /// Release the screen buffer and return to direct drawing.
    pub fn destroy_buffer(&mut self) {
        self.buffer = None;
        self.buffer_active = false;
        log::debug!("Screen buffer destroyed");
    }

    /// Pixel currently held by the screen buffer.
    pub fn buffer_pixel(&self, x: i32, y: i32) -> Option<C> {
        if !self.contains(x, y) {
            return None;
        }
        self.buffer
            .as_ref()
            .and_then(|b| b.get(y as usize * self.width as usize + x as usize).copied())
    }
}
