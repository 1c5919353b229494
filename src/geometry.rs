//! Shape rendering into the frame buffer
//!
//! Integer-only rasterizers: Bresenham lines, midpoint circles and rounded
//! rectangles. Stroke thickness is drawn as parallel passes: offset copies
//! for lines, concentric radii for circles and nested insets for rectangles.

use crate::framebuffer::FrameBuffer;

/// One quarter of a circle, named by its position around the center
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    /// Upper left quarter
    TopLeft,
    /// Upper right quarter
    TopRight,
    /// Lower right quarter
    BottomRight,
    /// Lower left quarter
    BottomLeft,
}

impl FrameBuffer {
    /// Draw a line from (x0, y0) to (x1, y1)
    ///
    /// A `thickness` above 1 repeats the line offset across its minor axis,
    /// centered on the requested line. A thickness of 0 draws nothing.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, thickness: u8) {
        if thickness == 0 {
            return;
        }
        let dx = (i64::from(x1) - i64::from(x0)).abs();
        let dy = -(i64::from(y1) - i64::from(y0)).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let x_major = dx >= -dy;
        let first = -(i32::from(thickness) - 1) / 2;
        let last = first + i32::from(thickness);

        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            for offset in first..last {
                if x_major {
                    self.draw_pixel(x, y.saturating_add(offset));
                } else {
                    self.draw_pixel(x.saturating_add(offset), y);
                }
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw a circle outline around (cx, cy)
    ///
    /// Thickness grows inward: each extra pass shrinks the radius by one.
    pub fn circle(&mut self, cx: i32, cy: i32, radius: i32, thickness: u8) {
        if self.misses_panel(cx, cy, radius) {
            return;
        }
        for pass in 0..i32::from(thickness) {
            let r = radius.saturating_sub(pass);
            if r < 0 {
                break;
            }
            self.midpoint(r, |frame, x, y| {
                for (px, py) in [(x, y), (y, x), (-x, y), (-y, x), (x, -y), (y, -x), (-x, -y), (-y, -x)] {
                    frame.draw_pixel(cx.saturating_add(px), cy.saturating_add(py));
                }
            });
        }
    }

    /// Draw one quarter of a circle outline around (cx, cy)
    pub fn circle_quadrant(&mut self, cx: i32, cy: i32, radius: i32, quadrant: Quadrant) {
        if radius < 0 || self.misses_panel(cx, cy, radius) {
            return;
        }
        let (sx, sy) = match quadrant {
            Quadrant::TopLeft => (-1, -1),
            Quadrant::TopRight => (1, -1),
            Quadrant::BottomRight => (1, 1),
            Quadrant::BottomLeft => (-1, 1),
        };
        self.midpoint(radius, |frame, x, y| {
            frame.draw_pixel(cx.saturating_add(sx * x), cy.saturating_add(sy * y));
            frame.draw_pixel(cx.saturating_add(sx * y), cy.saturating_add(sy * x));
        });
    }

    /// Whether the square bounding a circle lies entirely off the panel
    fn misses_panel(&self, cx: i32, cy: i32, radius: i32) -> bool {
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));
        cx + r < 0
            || cy + r < 0
            || cx - r >= i64::from(self.width())
            || cy - r >= i64::from(self.height())
    }

    /// Walk one octant of a midpoint circle, handing (x, y) offsets to `plot`
    fn midpoint(&mut self, radius: i32, mut plot: impl FnMut(&mut Self, i32, i32)) {
        let mut x = radius;
        let mut y = 0;
        let mut err = 1 - i64::from(radius);
        while x >= y {
            plot(self, x, y);
            y += 1;
            if err < 0 {
                err += 2 * i64::from(y) + 1;
            } else {
                x -= 1;
                err += 2 * (i64::from(y) - i64::from(x)) + 1;
            }
        }
    }

    /// Draw a rectangle with optional rounded corners
    ///
    /// `corner_radius` is clamped to half the shorter side. With `fill` the
    /// whole shape is painted and `thickness` is ignored; otherwise the
    /// outline is drawn `thickness` pixels wide, growing inward.
    #[allow(clippy::too_many_arguments)]
    pub fn rectangle(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        corner_radius: i32,
        thickness: u8,
        fill: bool,
    ) {
        if width <= 0 || height <= 0 {
            return;
        }
        let radius = corner_radius.clamp(0, width.min(height) / 2);

        if fill {
            // only the rows that land on the panel
            let first = y.saturating_neg().clamp(0, height);
            let last = self.height().saturating_sub(y).clamp(0, height);
            for row in first..last {
                let inset = corner_inset(radius, row, height);
                self.hline(x.saturating_add(inset), y + row, width - 2 * inset);
            }
            return;
        }

        for pass in 0..i32::from(thickness) {
            let (w, h) = (width - 2 * pass, height - 2 * pass);
            if w <= 0 || h <= 0 {
                break;
            }
            self.rectangle_outline(
                x.saturating_add(pass),
                y.saturating_add(pass),
                w,
                h,
                (radius - pass).max(0),
            );
        }
    }

    fn rectangle_outline(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32) {
        let (left, right) = (x.saturating_add(r), x.saturating_add(w - 1 - r));
        let (top, bottom) = (y.saturating_add(r), y.saturating_add(h - 1 - r));
        self.hline(left, y, w - 2 * r);
        self.hline(left, y.saturating_add(h - 1), w - 2 * r);
        self.vline(x, top, h - 2 * r);
        self.vline(x.saturating_add(w - 1), top, h - 2 * r);
        if r > 0 {
            self.circle_quadrant(left, top, r, Quadrant::TopLeft);
            self.circle_quadrant(right, top, r, Quadrant::TopRight);
            self.circle_quadrant(right, bottom, r, Quadrant::BottomRight);
            self.circle_quadrant(left, bottom, r, Quadrant::BottomLeft);
        }
    }
}

/// Horizontal inset of scanline `row` in a rounded shape `height` rows tall
fn corner_inset(radius: i32, row: i32, height: i32) -> i32 {
    let dy = if row < radius {
        radius - row
    } else if row >= height - radius {
        row - (height - 1 - radius)
    } else {
        return 0;
    };
    let (radius, dy) = (i64::from(radius), i64::from(dy));
    let span = (radius * radius - dy * dy).max(0) as u64;
    (radius - span.isqrt() as i64) as i32
}
