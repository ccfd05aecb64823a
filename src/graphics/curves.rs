//! Ellipses and arcs.
//!
//! Arc angles are in the canvas's arc units: `arc_angle_max` of them make a
//! full turn and `arc_angle_offset` (in degrees) rotates the zero direction.
//! Zero points along +x and angles grow towards +y, which is down the screen.

use crate::graphics::canvas::Canvas;
use crate::graphics::color::PixelColor;
use crate::graphics::sink::PixelSink;

/// Largest semi-axis the integer ellipse stepper handles.
pub const MAX_ELLIPSE_AXIS: i32 = 1 << 14;

/// Stand-in slope for an arc that ends exactly on the +x axis.
const FULL_TURN_END_SLOPE: f32 = -1_000_000.0;

/// Bring an angle into range the same way repeated +/-360 steps would:
/// negatives land in `[0, 360)`, values above a full turn in `(0, 360]`.
fn wrap_degrees(angle: f32) -> f32 {
    if angle < 0.0 {
        angle.rem_euclid(360.0)
    } else if angle > 360.0 {
        let rem = angle % 360.0;
        if rem == 0.0 {
            360.0
        } else {
            rem
        }
    } else {
        angle
    }
}

/// Narrow the centre-relative range `lo..=hi` to offsets that put
/// `centre + offset` inside `0..size`. An empty result has `lo > hi`.
fn clip_to_canvas(lo: i32, hi: i32, centre: i32, size: i32) -> (i32, i32) {
    let clipped_lo = i64::from(lo).max(-i64::from(centre));
    let clipped_hi = i64::from(hi).min(i64::from(size) - 1 - i64::from(centre));
    if clipped_lo > clipped_hi {
        return (1, 0);
    }
    // Both ends now lie within lo..=hi.
    (clipped_lo as i32, clipped_hi as i32)
}

/// Running bounding box of the arc's corner points.
struct ArcBounds {
    xmin: i32,
    xmax: i32,
    ymin: i32,
    ymax: i32,
}

impl ArcBounds {
    fn new() -> Self {
        Self {
            xmin: i32::MAX,
            xmax: i32::MIN,
            ymin: i32::MAX,
            ymax: i32::MIN,
        }
    }

    fn include(&mut self, r: f32, cos: f32, sin: f32) {
        let x = (r * cos) as i32;
        let y = (r * sin) as i32;
        self.xmin = self.xmin.min(x);
        self.xmax = self.xmax.max(x);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
    }
}

impl<S, C> Canvas<S, C>
where
    S: PixelSink<C>,
    C: PixelColor,
{
    /// Midpoint ellipse with horizontal semi-axis `a` and vertical
    /// semi-axis `b`. In fill mode each step draws the mirrored horizontal
    /// spans above and below the centre instead of four pixels.
    ///
    /// Ellipses off the canvas or with a semi-axis past
    /// [`MAX_ELLIPSE_AXIS`] draw nothing.
    pub fn draw_ellipse(&mut self, cx: i32, cy: i32, a: i32, b: i32, fill: bool, color: C) {
        if a > MAX_ELLIPSE_AXIS || b > MAX_ELLIPSE_AXIS || !self.reaches(cx, cy, a, b) {
            return;
        }
        if a == 0 {
            self.vspan(cx, cy - b, 2 * b + 1, color);
            return;
        }
        if b == 0 {
            self.hspan(cx - a, cy, 2 * a + 1, color);
            return;
        }

        let a2 = i64::from(a) * i64::from(a);
        let b2 = i64::from(b) * i64::from(b);
        let two_a2 = 2 * a2;
        let two_b2 = 2 * b2;

        let mut x = 0i32;
        let mut y = b;
        let mut px = 0i64;
        let mut py = two_a2 * i64::from(y);

        // Decision values are kept at four times their true size so the
        // quarter and half terms stay integral.
        let mut p = 4 * b2 - 4 * a2 * i64::from(b) + a2;
        while px < py {
            self.ellipse_points(cx, cy, x, y, fill, color);
            x += 1;
            px += two_b2;
            if p < 0 {
                p += 4 * (b2 + px);
            } else {
                y -= 1;
                py -= two_a2;
                p += 4 * (b2 + px - py);
            }
        }

        let xx = 2 * i64::from(x) + 1;
        let ym = i64::from(y) - 1;
        p = b2 * xx * xx + 4 * a2 * ym * ym - 4 * a2 * b2;
        while y >= 0 {
            self.ellipse_points(cx, cy, x, y, fill, color);
            y -= 1;
            py -= two_a2;
            if p > 0 {
                p += 4 * (a2 - py);
            } else {
                x += 1;
                px += two_b2;
                p += 4 * (a2 - py + px);
            }
        }
    }

    fn ellipse_points(&mut self, cx: i32, cy: i32, x: i32, y: i32, fill: bool, color: C) {
        if fill {
            self.hspan(cx - x, cy + y, 2 * x + 1, color);
            if y != 0 {
                self.hspan(cx - x, cy - y, 2 * x + 1, color);
            }
        } else {
            self.draw_pixel(cx + x, cy + y, color);
            self.draw_pixel(cx - x, cy + y, color);
            self.draw_pixel(cx + x, cy - y, color);
            self.draw_pixel(cx - x, cy - y, color);
        }
    }

    /// Thick arc between `start` and `end`, in arc units.
    ///
    /// `thickness` pixels are taken inwards from `radius`. The configured
    /// offset is applied unless the call asks for the full turn from zero.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_arc(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        thickness: i32,
        start: f32,
        end: f32,
        color: C,
    ) {
        let max = self.arc_angle_max();
        if start == 0.0 && end == max {
            self.draw_arc_helper(cx, cy, radius, thickness, 0.0, max, color);
        } else {
            let shift = self.arc_angle_offset() / 360.0 * max;
            self.draw_arc_helper(cx, cy, radius, thickness, start + shift, end + shift, color);
        }
    }

    /// Rasterise the arc column by column over its bounding box, emitting
    /// at most two vertical spans per column. `start > end` (after
    /// wrapping) is split into `start..max` and `0..end`.
    #[allow(clippy::too_many_arguments)]
    fn draw_arc_helper(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        thickness: i32,
        start: f32,
        end: f32,
        color: C,
    ) {
        let max = self.arc_angle_max();
        if radius <= 0 || max.is_nan() || max <= 0.0 || !start.is_finite() || !end.is_finite() {
            log::debug!("Arc skipped: radius {}, angles {}..{} of {}", radius, start, end, max);
            return;
        }
        if !self.reaches(cx, cy, radius, radius) {
            return;
        }
        let thickness = thickness.clamp(0, radius);

        let start_angle = wrap_degrees(start / max * 360.0);
        let end_angle = wrap_degrees(end / max * 360.0);

        if start_angle > end_angle {
            self.draw_arc_helper(cx, cy, radius, thickness, start_angle / 360.0 * max, max, color);
            self.draw_arc_helper(cx, cy, radius, thickness, 0.0, end_angle / 360.0 * max, color);
            return;
        }

        let (sin_start, cos_start) = start_angle.to_radians().sin_cos();
        let (sin_end, cos_end) = end_angle.to_radians().sin_cos();

        let mut bounds = ArcBounds::new();
        let outer = radius as f32;
        let inner = (radius - thickness) as f32;
        bounds.include(outer, cos_start, sin_start);
        bounds.include(outer, cos_end, sin_end);
        bounds.include(inner, cos_start, sin_start);
        bounds.include(inner, cos_end, sin_end);

        // Arcs that sweep across an axis reach the full radius there.
        if start_angle < 90.0 && end_angle > 90.0 {
            bounds.ymax = radius;
        }
        if start_angle < 180.0 && end_angle > 180.0 {
            bounds.xmin = -radius;
        }
        if start_angle < 270.0 && end_angle > 270.0 {
            bounds.ymin = -radius;
        }

        let sslope = cos_start / sin_start;
        let eslope = if end_angle == 360.0 {
            FULL_TURN_END_SLOPE
        } else {
            cos_end / sin_end
        };

        let hole = i64::from(radius - thickness);
        let ir2 = hole * hole;
        let or2 = i64::from(radius) * i64::from(radius);

        let inside = |x: i32, y: i32| -> bool {
            let (x64, y64) = (i64::from(x), i64::from(y));
            let d = x64 * x64 + y64 * y64;
            if d >= or2 || d < ir2 {
                return false;
            }
            let (fx, fy) = (x as f32, y as f32);
            let after_start = (y > 0 && start_angle < 180.0 && fx <= fy * sslope)
                || (y < 0 && start_angle > 180.0 && fx >= fy * sslope)
                || (y < 0 && start_angle <= 180.0)
                || (y == 0 && start_angle <= 180.0 && x < 0)
                || (y == 0 && start_angle == 0.0 && x > 0);
            let before_end = (y > 0 && end_angle < 180.0 && fx >= fy * eslope)
                || (y < 0 && end_angle > 180.0 && fx <= fy * eslope)
                || (y > 0 && end_angle >= 180.0)
                || (y == 0 && end_angle >= 180.0 && x < 0)
                || (y == 0 && start_angle == 0.0 && x > 0);
            after_start && before_end
        };

        // Only columns and rows that land on the canvas are scanned.
        let (xmin, xmax) = clip_to_canvas(bounds.xmin, bounds.xmax, cx, self.width());
        let (ymin, ymax) = clip_to_canvas(bounds.ymin, bounds.ymax, cy, self.height());
        for x in xmin..=xmax {
            // A column crosses the arc in at most two runs: an upper one
            // (y1) and, past the hole, a lower one (y2).
            let mut y1_start: Option<i32> = None;
            let mut y1_end: Option<i32> = None;
            let mut y2_start: Option<i32> = None;
            let mut y2_searching = false;

            let mut y = ymin;
            while y <= ymax {
                if inside(x, y) {
                    match (y1_start, y1_end, y2_start) {
                        (None, _, _) => y1_start = Some(y),
                        (Some(s1), Some(e1), None) => {
                            y2_start = Some(y);
                            // Guess the lower run matches the upper one and
                            // jump just past that; fall back to a scan if
                            // the guess overruns the box.
                            y += e1 - s1 + 1;
                            if y > ymax - 1 {
                                y -= e1 - s1 + 1;
                                y2_searching = true;
                            }
                        }
                        (_, _, Some(_)) if !y2_searching => y2_searching = true,
                        _ => {}
                    }
                } else if let (Some(s1), None) = (y1_start, y1_end) {
                    y1_end = Some(y - 1);
                    self.vspan(cx + x, cy + s1, y - s1, color);
                    if y < 0 {
                        y = y.abs();
                    } else {
                        break;
                    }
                } else if let Some(s2) = y2_start {
                    if y2_searching {
                        self.vspan(cx + x, cy + s2, y - s2, color);
                        y2_searching = false;
                        break;
                    }
                    y = s2;
                    y2_searching = true;
                }
                y += 1;
            }

            match (y1_start, y1_end, y2_start) {
                (Some(s1), None, _) => self.vspan(cx + x, cy + s1, ymax - s1 + 1, color),
                (_, _, Some(s2)) if y2_searching => {
                    self.vspan(cx + x, cy + s2, ymax - s2 + 1, color)
                }
                _ => {}
            }
        }
    }

    /// One-pixel arc stepped a degree at a time from `start` to `end`
    /// degrees. Ignores the arc offset and maximum.
    pub fn draw_simple_arc(&mut self, cx: i32, cy: i32, radius: i32, start: f32, end: f32, color: C) {
        if !start.is_finite() || !end.is_finite() {
            return;
        }
        let end = if end < start { end + 360.0 } else { end };
        // Past one turn every step repeats an earlier pixel.
        let steps = (end - start).min(360.0) as i32;
        let r = radius as f32;
        for i in 0..=steps {
            let (sin, cos) = (start + i as f32).to_radians().sin_cos();
            self.draw_pixel(
                cx.saturating_add((r * cos) as i32),
                cy.saturating_add((r * sin) as i32),
                color,
            );
        }
    }
}
