//! Graphics core for small Raspberry Pi displays.
//!
//! A [`Canvas`] owns the drawing state (size, rotation, font, text cursor,
//! arc settings, optional screen buffer) and rasterises lines, shapes,
//! curves, text and bitmaps into a [`PixelSink`]. The same code drives 1-bit
//! panels through [`BiColor`] and colour TFTs through [`Rgb565`].

pub mod bitmap;
pub mod canvas;
pub mod color;
pub mod curves;
pub mod error;
pub mod font;
mod font_data;
pub mod framebuffer;
pub mod primitives;
pub mod sink;
pub mod text;

pub use canvas::{BitmapAddressing, Canvas, Rotation, SharedCanvas};
pub use color::{BiColor, BinaryColor, PixelColor, Rgb565, Rgb565Ext, RgbColor};
pub use error::{DrawError, DrawResult};
pub use font::{Font, FontName, Glyph, GlyphLayout};
pub use framebuffer::{Framebuffer, MonoFramebuffer};
pub use sink::{BlockAdapter, BlockTransport, DrawTargetSink, PixelSink};
