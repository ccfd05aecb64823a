//! Drawing error taxonomy.
//!
//! Every bounds-checked drawing entry point returns a [`DrawResult`].
//! A font-range failure and a bounds failure are separate kinds.

/// Failure kinds reported by the graphics core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum DrawError {
    #[error("Shape start point lies outside the screen")]
    ShapeScreenBounds,

    #[error("Character does not fit on the screen at the requested position")]
    CharScreenBounds,

    #[error("Character is outside the ASCII range of the active font")]
    CharFontAsciiRange,

    #[error("Text is empty")]
    CharArrayEmpty,

    #[error("Bitmap data is empty")]
    BitmapEmpty,

    #[error("Bitmap start point lies outside the screen")]
    BitmapScreenBounds,

    #[error("Bitmap is larger than the screen")]
    BitmapLargerThanScreen,

    #[error("Bitmap height must be divisible by 8 in vertical addressing mode")]
    BitmapVerticalSize,

    #[error("Bitmap width must be divisible by 8 in horizontal addressing mode")]
    BitmapHorizontalSize,

    #[error("Bitmap data length does not match its declared size")]
    BitmapSize,

    #[error("Font table is malformed")]
    InvalidFont,

    #[error("Screen buffer is not allocated")]
    BufferNotAllocated,

    #[error("Invalid drawing parameter")]
    GenericError,

    #[error("Could not allocate scratch buffer")]
    MemoryAllocation,
}

/// Result alias used by the drawing API.
pub type DrawResult<T = ()> = Result<T, DrawError>;

impl From<std::collections::TryReserveError> for DrawError {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::MemoryAllocation
    }
}

/// Allocate an empty scratch vector able to hold `len` items without
/// reallocating.
pub(crate) fn scratch<T>(len: usize) -> DrawResult<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    Ok(buf)
}
