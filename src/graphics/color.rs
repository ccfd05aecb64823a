//! Pixel colour types for the two display families.
//!
//! - [`BiColor`]: monochrome OLED/LCD panels (on, off, toggle). Maps onto
//!   `embedded-graphics` [`BinaryColor`] for the two concrete states.
//! - [`Rgb565`]: 16-bit colour TFT panels, the `embedded-graphics` type.

use std::fmt;

use embedded_graphics_core::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics_core::pixelcolor::PixelColor as NativeColor;
pub use embedded_graphics_core::pixelcolor::{BinaryColor, Rgb565, RgbColor};

/// Behaviour shared by every colour a canvas can draw with.
pub trait PixelColor: Copy + PartialEq + fmt::Debug {
    /// `embedded-graphics` colour this one is written to a draw target as.
    type Native: NativeColor;

    /// Safety limit on characters rendered by one `write_char_string` call.
    const MAX_STRING_CHARS: usize;

    /// Default text colour.
    const FOREGROUND: Self;

    /// Default text background and cleared-buffer colour.
    const BACKGROUND: Self;

    /// Value to store when `self` is drawn over a pixel currently holding
    /// `current`.
    fn resolve(self, current: Self) -> Self {
        let _ = current;
        self
    }

    /// Concrete colour for a draw target, or `None` when the value depends on
    /// what the pixel currently shows.
    fn to_native(self) -> Option<Self::Native>;
}

/// Monochrome colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BiColor {
    /// Pixel off.
    #[default]
    Background,
    /// Pixel on.
    Foreground,
    /// Toggle whatever the pixel currently shows.
    Invert,
}

impl BiColor {
    pub fn is_on(self) -> bool {
        matches!(self, BiColor::Foreground)
    }
}

impl From<BinaryColor> for BiColor {
    fn from(color: BinaryColor) -> Self {
        match color {
            BinaryColor::On => BiColor::Foreground,
            BinaryColor::Off => BiColor::Background,
        }
    }
}

impl PixelColor for BiColor {
    type Native = BinaryColor;

    const MAX_STRING_CHARS: usize = 150;
    const FOREGROUND: Self = BiColor::Foreground;
    const BACKGROUND: Self = BiColor::Background;

    fn resolve(self, current: Self) -> Self {
        match self {
            BiColor::Invert => {
                if current.is_on() {
                    BiColor::Background
                } else {
                    BiColor::Foreground
                }
            }
            other => other,
        }
    }

    fn to_native(self) -> Option<BinaryColor> {
        match self {
            BiColor::Foreground => Some(BinaryColor::On),
            BiColor::Background => Some(BinaryColor::Off),
            BiColor::Invert => None,
        }
    }
}

impl PixelColor for Rgb565 {
    type Native = Rgb565;

    const MAX_STRING_CHARS: usize = 250;
    const FOREGROUND: Self = <Rgb565 as RgbColor>::WHITE;
    const BACKGROUND: Self = <Rgb565 as RgbColor>::BLACK;

    fn to_native(self) -> Option<Rgb565> {
        Some(self)
    }
}

/// Byte-level helpers for [`Rgb565`] used by panel transports and bitmaps.
pub trait Rgb565Ext: Sized {
    /// Truncating conversion from 8-bit channels: the top 5/6/5 bits are kept.
    fn from_rgb888(r: u8, g: u8, b: u8) -> Self;

    /// Expand back to 8-bit channels, replicating high bits into the low ones.
    fn to_rgb888(self) -> [u8; 3];

    /// Wire order expected by the panel controllers (high byte first).
    fn to_be_bytes(self) -> [u8; 2];

    /// Little-endian pair as stored in 16-bit bitmap data.
    fn from_le_bytes(bytes: [u8; 2]) -> Self;
}

impl Rgb565Ext for Rgb565 {
    fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        Rgb565::new(r >> 3, g >> 2, b >> 3)
    }

    fn to_rgb888(self) -> [u8; 3] {
        let (r5, g6, b5) = (self.r(), self.g(), self.b());
        [(r5 << 3) | (r5 >> 2), (g6 << 2) | (g6 >> 4), (b5 << 3) | (b5 >> 2)]
    }

    fn to_be_bytes(self) -> [u8; 2] {
        RawU16::from(self).into_inner().to_be_bytes()
    }

    fn from_le_bytes(bytes: [u8; 2]) -> Self {
        RawU16::new(u16::from_le_bytes(bytes)).into()
    }
}

/// Orange used by the colour showcase; `RgbColor` has no constant for it.
pub fn orange() -> Rgb565 {
    Rgb565::new(31, 41, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics_core::pixelcolor::IntoStorage;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(255, 255, 255, 0xFFFF)]
    #[case(0, 0, 0, 0x0000)]
    #[case(255, 0, 0, 0xF800)]
    #[case(0, 255, 0, 0x07E0)]
    #[case(0, 0, 255, 0x001F)]
    #[case(7, 3, 7, 0x0000)]
    #[case(0x12, 0x34, 0x56, 0x11AA)]
    fn test_rgb888_to_565(#[case] r: u8, #[case] g: u8, #[case] b: u8, #[case] expected: u16) {
        assert_eq!(Rgb565::from_rgb888(r, g, b).into_storage(), expected);
    }

    #[test]
    fn test_wire_order_is_big_endian() {
        assert_eq!(Rgb565::RED.to_be_bytes(), [0xF8, 0x00]);
        assert_eq!(Rgb565::from_le_bytes([0x1F, 0x00]), Rgb565::BLUE);
        assert_eq!(orange().to_be_bytes(), [0xFD, 0x20]);
    }

    #[test]
    fn test_to_rgb888_extremes() {
        assert_eq!(Rgb565::WHITE.to_rgb888(), [255, 255, 255]);
        assert_eq!(Rgb565::BLACK.to_rgb888(), [0, 0, 0]);
        assert_eq!(Rgb565::RED.to_rgb888(), [255, 0, 0]);
    }

    #[test]
    fn test_bicolor_invert_resolves_against_current() {
        assert_eq!(BiColor::Invert.resolve(BiColor::Foreground), BiColor::Background);
        assert_eq!(BiColor::Invert.resolve(BiColor::Background), BiColor::Foreground);
        assert_eq!(BiColor::Foreground.resolve(BiColor::Foreground), BiColor::Foreground);
    }

    #[rstest]
    #[case(BiColor::Foreground, Some(BinaryColor::On))]
    #[case(BiColor::Background, Some(BinaryColor::Off))]
    #[case(BiColor::Invert, None)]
    fn test_bicolor_native(#[case] color: BiColor, #[case] expected: Option<BinaryColor>) {
        assert_eq!(color.to_native(), expected);
        if let Some(native) = expected {
            assert_eq!(BiColor::from(native), color);
        }
    }

    #[test]
    fn test_rgb565_defaults() {
        assert_eq!(<Rgb565 as PixelColor>::FOREGROUND, Rgb565::WHITE);
        assert_eq!(<Rgb565 as PixelColor>::BACKGROUND, Rgb565::BLACK);
        assert_eq!(Rgb565::CYAN.to_native(), Some(Rgb565::CYAN));
    }

    proptest! {
        #[test]
        fn prop_565_keeps_high_bits(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let c = Rgb565::from_rgb888(r, g, b);
            let [r2, g2, b2] = c.to_rgb888();
            prop_assert_eq!(r2 & 0xF8, r & 0xF8);
            prop_assert_eq!(g2 & 0xFC, g & 0xFC);
            prop_assert_eq!(b2 & 0xF8, b & 0xF8);
        }
    }
}
