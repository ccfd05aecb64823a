// Raspberry Pi display graphics library

pub mod cli;
pub mod config;
pub mod demo;
pub mod graphics;
pub mod logging;
pub mod print;

pub use cli::Cli;
pub use config::Options;
pub use graphics::{BiColor, Canvas, DrawError, DrawResult, DrawTargetSink, PixelColor, PixelSink, Rgb565};
pub use logging::LogLevel;
pub use print::{Base, ByteWrite, Print, Printable};
