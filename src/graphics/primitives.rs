//! Straight-edged shapes and circles.
//!
//! Two error policies coexist here:
//!
//! - Lines, circles, triangles, quadrilaterals, the dot grid and angled lines
//!   clip per pixel or per span and never fail.
//! - Fast lines, rectangles and polygons return a [`DrawResult`]. They fail
//!   with [`DrawError::ShapeScreenBounds`] when the start corner is off the
//!   canvas and clip the remaining extent otherwise.

use crate::graphics::canvas::Canvas;
use crate::graphics::color::PixelColor;
use crate::graphics::error::{DrawError, DrawResult};
use crate::graphics::sink::PixelSink;

/// Polygon side count limits.
pub const MIN_POLYGON_SIDES: u8 = 3;
pub const MAX_POLYGON_SIDES: u8 = 10;

/// Dot-grid gap limits and the value used when the request is out of range.
pub const MIN_DOT_GRID_GAP: i32 = 2;
pub const MAX_DOT_GRID_GAP: i32 = 20;
pub const DEFAULT_DOT_GRID_GAP: i32 = 2;

/// Largest radius the midpoint stepper handles without overflowing.
pub const MAX_CIRCLE_RADIUS: i32 = i32::MAX / 4;

/// Corner selectors for [`Canvas::draw_circle_helper`].
pub const CORNER_TOP_LEFT: u8 = 0x1;
pub const CORNER_TOP_RIGHT: u8 = 0x2;
pub const CORNER_BOTTOM_RIGHT: u8 = 0x4;
pub const CORNER_BOTTOM_LEFT: u8 = 0x8;

/// Half selectors for [`Canvas::fill_circle_helper`].
pub const HALF_RIGHT: u8 = 0x1;
pub const HALF_LEFT: u8 = 0x2;

/// Midpoint circle stepper shared by the outline and fill helpers.
///
/// Yields each `(x, y)` octant offset after the four axis points.
struct CircleSteps {
    f: i32,
    ddf_x: i32,
    ddf_y: i32,
    x: i32,
    y: i32,
}

impl CircleSteps {
    fn new(r: i32) -> Self {
        Self {
            f: 1 - r,
            ddf_x: 1,
            ddf_y: -2 * r,
            x: 0,
            y: r,
        }
    }
}

impl Iterator for CircleSteps {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.x >= self.y {
            return None;
        }
        if self.f >= 0 {
            self.y -= 1;
            self.ddf_y += 2;
            self.f += self.ddf_y;
        }
        self.x += 1;
        self.ddf_x += 2;
        self.f += self.ddf_x;
        Some((self.x, self.y))
    }
}

impl<S, C> Canvas<S, C>
where
    S: PixelSink<C>,
    C: PixelColor,
{
    /// Bresenham line between two points, both ends included.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: C) {
        let (mut x0, mut y0, mut x1, mut y1) = (x0, y0, x1, y1);
        let steep = y1.abs_diff(y0) > x1.abs_diff(x0);
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let dx = i64::from(x1) - i64::from(x0);
        let dy = (i64::from(y1) - i64::from(y0)).abs();
        let ystep = if y0 < y1 { 1 } else { -1 };
        let mut err = dx / 2;
        let mut y = y0;
        for x in x0..=x1 {
            if steep {
                self.draw_pixel(y, x, color);
            } else {
                self.draw_pixel(x, y, color);
            }
            err -= dy;
            if err < 0 {
                y = y.saturating_add(ystep);
                err += dx;
            }
        }
    }

    /// Horizontal line of `w` pixels. Fails if `(x, y)` is off the canvas,
    /// truncates at the right edge otherwise.
    pub fn draw_fast_hline(&mut self, x: i32, y: i32, w: i32, color: C) -> DrawResult {
        if !self.contains(x, y) {
            return Err(DrawError::ShapeScreenBounds);
        }
        let w = w.min(self.width() - x);
        self.hspan(x, y, w, color);
        Ok(())
    }

    /// Vertical line of `h` pixels. Fails if `(x, y)` is off the canvas,
    /// truncates at the bottom edge otherwise.
    pub fn draw_fast_vline(&mut self, x: i32, y: i32, h: i32, color: C) -> DrawResult {
        if !self.contains(x, y) {
            return Err(DrawError::ShapeScreenBounds);
        }
        let h = h.min(self.height() - y);
        self.vspan(x, y, h, color);
        Ok(())
    }

    /// Rectangle outline with its top-left corner at `(x, y)`.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: C) -> DrawResult {
        if !self.contains(x, y) {
            return Err(DrawError::ShapeScreenBounds);
        }
        if w <= 0 || h <= 0 {
            return Ok(());
        }
        self.hspan(x, y, w, color);
        self.hspan(x, y + h - 1, w, color);
        self.vspan(x, y, h, color);
        self.vspan(x + w - 1, y, h, color);
        Ok(())
    }

    /// Solid rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: C) -> DrawResult {
        if !self.contains(x, y) {
            return Err(DrawError::ShapeScreenBounds);
        }
        let w = w.min(self.width() - x);
        let h = h.min(self.height() - y);
        self.fill_area(x, y, w, h, color);
        Ok(())
    }

    /// Circle outline. Circles that miss the canvas, or whose radius exceeds
    /// [`MAX_CIRCLE_RADIUS`], draw nothing.
    pub fn draw_circle(&mut self, x0: i32, y0: i32, r: i32, color: C) {
        if r > MAX_CIRCLE_RADIUS || !self.reaches(x0, y0, r, r) {
            return;
        }
        self.draw_pixel(x0, y0 + r, color);
        self.draw_pixel(x0, y0 - r, color);
        self.draw_pixel(x0 + r, y0, color);
        self.draw_pixel(x0 - r, y0, color);
        for (x, y) in CircleSteps::new(r) {
            self.draw_pixel(x0 + x, y0 + y, color);
            self.draw_pixel(x0 - x, y0 + y, color);
            self.draw_pixel(x0 + x, y0 - y, color);
            self.draw_pixel(x0 - x, y0 - y, color);
            self.draw_pixel(x0 + y, y0 + x, color);
            self.draw_pixel(x0 - y, y0 + x, color);
            self.draw_pixel(x0 + y, y0 - x, color);
            self.draw_pixel(x0 - y, y0 - x, color);
        }
    }

    /// Quarter-circle outlines for the corners selected in `corners`
    /// (`CORNER_*` bits).
    pub fn draw_circle_helper(&mut self, x0: i32, y0: i32, r: i32, corners: u8, color: C) {
        if r > MAX_CIRCLE_RADIUS || !self.reaches(x0, y0, r, r) {
            return;
        }
        for (x, y) in CircleSteps::new(r) {
            if corners & CORNER_BOTTOM_RIGHT != 0 {
                self.draw_pixel(x0 + x, y0 + y, color);
                self.draw_pixel(x0 + y, y0 + x, color);
            }
            if corners & CORNER_TOP_RIGHT != 0 {
                self.draw_pixel(x0 + x, y0 - y, color);
                self.draw_pixel(x0 + y, y0 - x, color);
            }
            if corners & CORNER_BOTTOM_LEFT != 0 {
                self.draw_pixel(x0 - y, y0 + x, color);
                self.draw_pixel(x0 - x, y0 + y, color);
            }
            if corners & CORNER_TOP_LEFT != 0 {
                self.draw_pixel(x0 - y, y0 - x, color);
                self.draw_pixel(x0 - x, y0 - y, color);
            }
        }
    }

    /// Solid circle. A radius past [`MAX_CIRCLE_RADIUS`] fills the canvas
    /// when the circle covers it and draws nothing otherwise.
    pub fn fill_circle(&mut self, x0: i32, y0: i32, r: i32, color: C) {
        if r > MAX_CIRCLE_RADIUS {
            if self.circle_covers_canvas(x0, y0, r) {
                self.fill_area(0, 0, self.width(), self.height(), color);
            } else {
                log::debug!("Circle of radius {} at ({}, {}) skipped", r, x0, y0);
            }
            return;
        }
        if !self.reaches(x0, y0, r, r) {
            return;
        }
        self.vspan(x0, y0 - r, 2 * r + 1, color);
        self.fill_circle_helper(x0, y0, r, HALF_RIGHT | HALF_LEFT, 0, color);
    }

    /// Vertical spans filling the halves selected in `halves` (`HALF_*`
    /// bits). `delta` stretches each span, which is how rounded rectangles
    /// reuse this for their side caps.
    pub fn fill_circle_helper(
        &mut self,
        x0: i32,
        y0: i32,
        r: i32,
        halves: u8,
        delta: i32,
        color: C,
    ) {
        if r > MAX_CIRCLE_RADIUS || !self.reaches(x0, y0, r, r) {
            return;
        }
        for (x, y) in CircleSteps::new(r) {
            if halves & HALF_RIGHT != 0 {
                self.vspan(x0 + x, y0 - y, 2 * y + 1 + delta, color);
                self.vspan(x0 + y, y0 - x, 2 * x + 1 + delta, color);
            }
            if halves & HALF_LEFT != 0 {
                self.vspan(x0 - x, y0 - y, 2 * y + 1 + delta, color);
                self.vspan(x0 - y, y0 - x, 2 * x + 1 + delta, color);
            }
        }
    }

    fn circle_covers_canvas(&self, x0: i32, y0: i32, r: i32) -> bool {
        let (w, h) = (self.width(), self.height());
        let r = f64::from(r);
        [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)]
            .into_iter()
            .all(|(x, y)| {
                let dx = f64::from(x) - f64::from(x0);
                let dy = f64::from(y) - f64::from(y0);
                dx.hypot(dy) <= r
            })
    }

    pub fn draw_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: C) -> DrawResult {
        if !self.contains(x, y) {
            return Err(DrawError::ShapeScreenBounds);
        }
        if w <= 0 || h <= 0 {
            return Ok(());
        }
        let r = r.clamp(0, w.min(h) / 2);
        self.hspan(x + r, y, w - 2 * r, color);
        self.hspan(x + r, y + h - 1, w - 2 * r, color);
        self.vspan(x, y + r, h - 2 * r, color);
        self.vspan(x + w - 1, y + r, h - 2 * r, color);
        self.draw_circle_helper(x + r, y + r, r, CORNER_TOP_LEFT, color);
        self.draw_circle_helper(x + w - r - 1, y + r, r, CORNER_TOP_RIGHT, color);
        self.draw_circle_helper(x + w - r - 1, y + h - r - 1, r, CORNER_BOTTOM_RIGHT, color);
        self.draw_circle_helper(x + r, y + h - r - 1, r, CORNER_BOTTOM_LEFT, color);
        Ok(())
    }

    pub fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: C) -> DrawResult {
        if !self.contains(x, y) {
            return Err(DrawError::ShapeScreenBounds);
        }
        if w <= 0 || h <= 0 {
            return Ok(());
        }
        let r = r.clamp(0, w.min(h) / 2);
        self.fill_area(x + r, y, w - 2 * r, h, color);
        self.fill_circle_helper(x + w - r - 1, y + r, r, HALF_RIGHT, h - 2 * r - 1, color);
        self.fill_circle_helper(x + r, y + r, r, HALF_LEFT, h - 2 * r - 1, color);
        Ok(())
    }

    pub fn draw_triangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32, color: C) {
        self.draw_line(x0, y0, x1, y1, color);
        self.draw_line(x1, y1, x2, y2, color);
        self.draw_line(x2, y2, x0, y0, color);
    }

    /// Scanline triangle fill: one horizontal span per row from the top
    /// vertex to the bottom one.
    pub fn fill_triangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32, color: C) {
        let (mut x0, mut y0, mut x1, mut y1, mut x2, mut y2) = (x0, y0, x1, y1, x2, y2);
        if y0 > y1 {
            std::mem::swap(&mut y0, &mut y1);
            std::mem::swap(&mut x0, &mut x1);
        }
        if y1 > y2 {
            std::mem::swap(&mut y2, &mut y1);
            std::mem::swap(&mut x2, &mut x1);
        }
        if y0 > y1 {
            std::mem::swap(&mut y0, &mut y1);
            std::mem::swap(&mut x0, &mut x1);
        }

        if y0 == y2 {
            let a = x0.min(x1).min(x2);
            let b = x0.max(x1).max(x2);
            self.hspan(a, y0, b - a + 1, color);
            return;
        }

        let (dx01, dy01) = (x1 - x0, y1 - y0);
        let (dx02, dy02) = (x2 - x0, y2 - y0);
        let (dx12, dy12) = (x2 - x1, y2 - y1);
        let mut sa = 0;
        let mut sb = 0;

        // Upper part. When the lower edge is flat its row is included here,
        // otherwise the middle row belongs to the lower part.
        let last = if y1 == y2 { y1 } else { y1 - 1 };
        let mut y = y0;
        while y <= last {
            let a = x0 + sa / dy01;
            let b = x0 + sb / dy02;
            sa += dx01;
            sb += dx02;
            self.hspan(a.min(b), y, (b - a).abs() + 1, color);
            y += 1;
        }

        sa = dx12 * (y - y1);
        sb = dx02 * (y - y0);
        while y <= y2 {
            let a = x1 + sa / dy12;
            let b = x0 + sb / dy02;
            sa += dx12;
            sb += dx02;
            self.hspan(a.min(b), y, (b - a).abs() + 1, color);
            y += 1;
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_quadrilateral(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
        color: C,
    ) {
        self.draw_line(x0, y0, x1, y1, color);
        self.draw_line(x1, y1, x2, y2, color);
        self.draw_line(x2, y2, x3, y3, color);
        self.draw_line(x3, y3, x0, y0, color);
    }

    /// Fill a quadrilateral as two triangles.
    ///
    /// The diagonal is chosen from the sign of the cross product of the
    /// first three vertices: non-negative splits along 0-2, negative along
    /// 1-3. Strongly concave or self-intersecting input can mis-fill.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_quadrilateral(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
        color: C,
    ) {
        let cross = (x1 - x0) * (y2 - y0) - (y1 - y0) * (x2 - x0);
        if cross >= 0 {
            self.fill_triangle(x0, y0, x1, y1, x2, y2, color);
            self.fill_triangle(x0, y0, x2, y2, x3, y3, color);
        } else {
            self.fill_triangle(x0, y0, x1, y1, x3, y3, color);
            self.fill_triangle(x1, y1, x2, y2, x3, y3, color);
        }
    }

    /// Regular polygon centred on `(x, y)`.
    ///
    /// Vertex `i` sits at `i * 360 / sides + rotation` degrees, with the
    /// sine on the x axis and the cosine on the y axis.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_polygon(
        &mut self,
        x: i32,
        y: i32,
        sides: u8,
        diameter: i32,
        rotation: f32,
        fill: bool,
        color: C,
    ) -> DrawResult {
        if !(MIN_POLYGON_SIDES..=MAX_POLYGON_SIDES).contains(&sides) {
            log::warn!(
                "Polygon side count {} outside {}..={}",
                sides,
                MIN_POLYGON_SIDES,
                MAX_POLYGON_SIDES
            );
            return Err(DrawError::GenericError);
        }

        let n = sides as usize;
        let mut vx = [0i32; MAX_POLYGON_SIDES as usize];
        let mut vy = [0i32; MAX_POLYGON_SIDES as usize];
        let step = 360.0 / f64::from(sides);
        for i in 0..n {
            let angle = (i as f64 * step + f64::from(rotation)).to_radians();
            vx[i] = x + (angle.sin() * f64::from(diameter)) as i32;
            vy[i] = y + (angle.cos() * f64::from(diameter)) as i32;
        }

        if fill {
            self.scanline_fill(&vx[..n], &vy[..n], color);
        }
        for i in 0..n {
            let j = (i + 1) % n;
            self.draw_line(vx[i], vy[i], vx[j], vy[j], color);
        }
        Ok(())
    }

    /// Even-odd scanline fill. Each edge covers the half-open row range
    /// `[min_y, max_y)`, so shared vertices are counted once.
    fn scanline_fill(&mut self, vx: &[i32], vy: &[i32], color: C) {
        let n = vx.len();
        let (Some(&min_y), Some(&max_y)) = (vy.iter().min(), vy.iter().max()) else {
            return;
        };
        let mut nodes = [0i32; MAX_POLYGON_SIDES as usize];
        for row in min_y..=max_y {
            let mut count = 0;
            for i in 0..n {
                let j = (i + 1) % n;
                let (yi, yj) = (vy[i], vy[j]);
                if (yi <= row && yj > row) || (yj <= row && yi > row) {
                    nodes[count] = vx[i] + (row - yi) * (vx[j] - vx[i]) / (yj - yi);
                    count += 1;
                }
            }
            let crossings = &mut nodes[..count];
            crossings.sort_unstable();
            for pair in crossings.chunks_exact(2) {
                self.hspan(pair[0], row, pair[1] - pair[0] + 1, color);
            }
        }
    }

    /// Grid of single pixels `gap` apart, clipped to the canvas.
    pub fn draw_dot_grid(&mut self, x: i32, y: i32, w: i32, h: i32, gap: i32, color: C) {
        let gap = if (MIN_DOT_GRID_GAP..=MAX_DOT_GRID_GAP).contains(&gap) {
            gap
        } else {
            log::warn!(
                "Dot grid gap {} outside {}..={}, using {}",
                gap,
                MIN_DOT_GRID_GAP,
                MAX_DOT_GRID_GAP,
                DEFAULT_DOT_GRID_GAP
            );
            DEFAULT_DOT_GRID_GAP
        };
        if w <= 0 || h <= 0 {
            return;
        }
        let step = i64::from(gap);
        // First grid point on the canvas along each axis.
        let first = |start: i32| -> i64 {
            let start = i64::from(start);
            if start >= 0 {
                start
            } else {
                start + (-start + step - 1) / step * step
            }
        };
        let x_end = (i64::from(x) + i64::from(w)).min(i64::from(self.width()));
        let y_end = (i64::from(y) + i64::from(h)).min(i64::from(self.height()));
        for i in (first(x)..x_end).step_by(gap as usize) {
            for j in (first(y)..y_end).step_by(gap as usize) {
                self.draw_pixel(i as i32, j as i32, color);
            }
        }
    }

    /// Line segment along the ray from `(x, y)` at `angle + offset`
    /// degrees. The segment begins `start` pixels out and is `length`
    /// pixels long; lengths below 2 plot a single pixel.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line_angle(
        &mut self,
        x: i32,
        y: i32,
        angle: i32,
        start: i32,
        length: i32,
        offset: i32,
        color: C,
    ) {
        let theta = (f64::from(angle) + f64::from(offset)).to_radians();
        let (sin, cos) = theta.sin_cos();
        let at = |r: i32| {
            (
                x.saturating_add((cos * f64::from(r)) as i32),
                y.saturating_add((sin * f64::from(r)) as i32),
            )
        };
        let (sx, sy) = at(start);
        if length < 2 {
            self.draw_pixel(sx, sy, color);
        } else {
            let (ex, ey) = at(start.saturating_add(length - 1));
            self.draw_line(sx, sy, ex, ey, color);
        }
    }
}
