//! Showcase scene rendered into in-memory framebuffers.
//!
//! The same scene is drawn for both display families; only the palette
//! changes. Mono frames can be dumped as ASCII art, and either family can
//! be saved as a PNG through the `image` crate.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};

use crate::config::{Family, Options};
use crate::graphics::{
    color, BiColor, Canvas, DrawResult, Framebuffer, MonoFramebuffer, PixelColor, PixelSink, Rgb565,
    Rgb565Ext, RgbColor,
};
use crate::print::Print;

/// Colours used by the showcase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette<C> {
    pub fg: C,
    pub bg: C,
    pub accent: C,
    pub highlight: C,
}

impl Palette<BiColor> {
    pub fn mono() -> Self {
        Self {
            fg: BiColor::Foreground,
            bg: BiColor::Background,
            accent: BiColor::Foreground,
            highlight: BiColor::Invert,
        }
    }
}

impl Palette<Rgb565> {
    pub fn color() -> Self {
        Self {
            fg: Rgb565::WHITE,
            bg: Rgb565::BLACK,
            accent: Rgb565::CYAN,
            highlight: color::orange(),
        }
    }
}

/// A rendered frame of either family.
#[derive(Debug, Clone)]
pub enum Frame {
    Mono(MonoFramebuffer),
    Color(Framebuffer<Rgb565>),
}

impl Frame {
    pub fn save_png(&self, path: &Path) -> Result<()> {
        match self {
            Frame::Mono(fb) => save_mono_png(fb, path),
            Frame::Color(fb) => save_color_png(fb, path),
        }
    }
}

/// Apply the canvas-level settings from `opts`.
pub fn configure<S, C>(canvas: &mut Canvas<S, C>, opts: &Options)
where
    S: PixelSink<C>,
    C: PixelColor,
{
    canvas.set_rotation(opts.rotation);
    canvas.set_font(opts.font);
    canvas.set_text_wrap(opts.text_wrap);
    canvas.set_arc_angle_max(opts.arc_angle_max);
    canvas.set_arc_angle_offset(opts.arc_angle_offset);
}

/// Draw the showcase: a frame, one column of shapes per quarter of the
/// width, a gauge and the caption text.
pub fn draw_showcase<S, C>(canvas: &mut Canvas<S, C>, palette: &Palette<C>, text: &str) -> DrawResult
where
    S: PixelSink<C>,
    C: PixelColor,
{
    let w = canvas.width();
    let h = canvas.height();
    let r = (h.min(w / 2) / 6).max(2);
    let top = h / 4;
    let bottom = 3 * h / 4;
    let col = |n: i32| (2 * n + 1) * w / 8;

    canvas.fill_screen(palette.bg);
    canvas.draw_rect(0, 0, w, h, palette.fg)?;

    canvas.draw_circle(col(0), top, r, palette.fg);
    canvas.fill_circle(col(0), bottom, r, palette.accent);

    let cx = col(1);
    canvas.fill_triangle(cx, top - r, cx - r, top + r, cx + r, top + r, palette.accent);
    canvas.draw_polygon(cx, bottom, 6, 2 * r, 0.0, false, palette.fg)?;

    let cx = col(2);
    canvas.draw_ellipse(cx, top, r + r / 2, r / 2 + 1, true, palette.accent);
    canvas.draw_round_rect(cx - r, bottom - r / 2, 2 * r, r + 1, r / 3, palette.fg)?;

    let cx = col(3);
    let max = canvas.arc_angle_max();
    canvas.draw_arc(cx, h / 2, r + 2, 2, 0.0, max * 0.75, palette.accent);
    canvas.draw_line_angle(cx, h / 2, 135, 0, r, 0, palette.highlight);

    canvas.draw_dot_grid(2, h - 4, w - 4, 2, 4, palette.fg);

    canvas.set_text_colors(palette.fg, palette.bg);
    canvas.set_cursor(2, 2);
    canvas.print(text);
    if let Some(err) = canvas.write_error() {
        log::warn!("Caption rendered partially: {}", err);
        canvas.clear_write_error();
    }
    Ok(())
}

/// Render the scene onto a 1-bit page buffer.
pub fn render_mono(opts: &Options) -> Result<MonoFramebuffer> {
    let (width, height) = panel_size(opts);
    let mut canvas = Canvas::new(MonoFramebuffer::new(width, height), width, height);
    configure(&mut canvas, opts);
    draw_showcase(&mut canvas, &Palette::mono(), opts.text())
        .context("Failed to draw mono showcase")?;
    log::info!("Rendered {}x{} mono frame", canvas.width(), canvas.height());
    Ok(canvas.into_sink())
}

/// Render the scene onto an RGB565 framebuffer through the screen buffer.
pub fn render_color(opts: &Options) -> Result<Framebuffer<Rgb565>> {
    let (width, height) = panel_size(opts);
    let mut canvas = Canvas::new(Framebuffer::new(width, height), width, height);
    configure(&mut canvas, opts);
    canvas.set_buffer().context("Failed to allocate screen buffer")?;
    canvas.set_advanced_screen_buffer(true)?;
    draw_showcase(&mut canvas, &Palette::color(), opts.text())
        .context("Failed to draw color showcase")?;
    canvas.write_buffer()?;
    log::info!("Rendered {}x{} color frame", canvas.width(), canvas.height());
    Ok(canvas.into_sink())
}

pub fn render(opts: &Options) -> Result<Frame> {
    match opts.family {
        Family::Mono => render_mono(opts).map(Frame::Mono),
        Family::Color => render_color(opts).map(Frame::Color),
    }
}

fn panel_size(opts: &Options) -> (i32, i32) {
    // Dimensions are bounded by config::MAX_DIMENSION.
    (opts.resolution.width as i32, opts.resolution.height as i32)
}

/// One text row per logical pixel row: `#` lit, `.` dark.
pub fn ascii_art(fb: &MonoFramebuffer) -> String {
    let (width, height) = fb.logical_size();
    let mut out = String::with_capacity(((width + 1) * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let lit = fb.get_pixel(x, y).is_some_and(BiColor::is_on);
            out.push(if lit { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}

/// Short textual description of a colour frame.
pub fn summary(fb: &Framebuffer<Rgb565>) -> String {
    let (width, height) = fb.logical_size();
    let mut out = String::new();
    let lit = fb.pixels().iter().filter(|&&p| p != Rgb565::BLACK).count();
    let _ = writeln!(out, "{}x{} RGB565 frame, {} non-black pixels", width, height, lit);
    out
}

pub fn save_mono_png(fb: &MonoFramebuffer, path: &Path) -> Result<()> {
    let (width, height) = fb.logical_size();
    let img = GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let lit = fb
            .get_pixel(x as i32, y as i32)
            .is_some_and(BiColor::is_on);
        Luma([if lit { 255 } else { 0 }])
    });
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Saved {}", path.display());
    Ok(())
}

pub fn save_color_png(fb: &Framebuffer<Rgb565>, path: &Path) -> Result<()> {
    let (width, height) = fb.logical_size();
    let img = RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let color = fb.get_pixel(x as i32, y as i32).unwrap_or(Rgb565::BLACK);
        Rgb(color.to_rgb888())
    });
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Saved {}", path.display());
    Ok(())
}
