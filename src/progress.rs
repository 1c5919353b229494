//! Progress bars and loaders
//!
//! Styles 1-10 draw a bar proportional to a percentage. Styles 11-15 are
//! loaders: they ignore the percentage and advance one animation step per
//! call. Every style clears its own bounding box before drawing, so calling
//! it repeatedly at the same position animates in place.
//!
//! | Style | Shape | Size |
//! |-------|-------|------|
//! | 1 | outlined bar | 100x8 |
//! | 2 | rounded bar | 100x10 |
//! | 3 | thin solid bar over a track | 100x5 |
//! | 4 | ten segments | 98x8 |
//! | 5 | bar with percentage label | 104x8 |
//! | 6 | thick outlined bar | 100x12 |
//! | 7 | vertical bar | 10x40 |
//! | 8 | ring | 25x25 |
//! | 9 | ring with percentage label | 25x25 |
//! | 10 | slider | 100x8 |
//! | 11 | eight-dot spinner | 21x21 |
//! | 12 | bouncing block | 100x8 |
//! | 13 | marquee stripes | 100x8 |
//! | 14 | three dots | 20x6 |
//! | 15 | rotating arc | 21x21 |

use core::fmt::Write;

use heapless::String;

use crate::display::Display;
use crate::font::{CELL_WIDTH, Font};
use crate::framebuffer::FrameBuffer;
use crate::interface::DisplayInterface;

/// Full turn in pseudo-angle units
const FULL_TURN: i32 = 4000;

/// Loader step count after which every loader animation repeats
///
/// Common multiple of the loader periods (8, 16, 4, 3 and 8 steps).
const LOADER_CYCLE: u8 = 48;

/// Spinner dot positions around the center, clockwise from 12 o'clock
const SPINNER_DOTS: [(i32, i32); 8] = [
    (0, -8),
    (6, -6),
    (8, 0),
    (6, 6),
    (0, 8),
    (-6, 6),
    (-8, 0),
    (-6, -6),
];

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Draw progress indicator `style` with its top-left corner at (x, y)
    ///
    /// `progress` is clamped to 0-100. Unknown styles draw nothing.
    pub fn progress_bar(&mut self, progress: i32, x: i32, y: i32, style: u8) {
        let progress = progress.clamp(0, 100);
        let font = self.font();
        let step = self.loader_step;
        let frame = self.frame_mut();
        let visible = is_visible(frame, x, y, style);
        match style {
            1..=10 => {
                if visible {
                    draw_bar(frame, font, progress, x, y, style);
                }
            }
            11..=15 => {
                if visible {
                    draw_loader(frame, step, x, y, style);
                }
                self.loader_step = (self.loader_step + 1) % LOADER_CYCLE;
            }
            _ => log::debug!("progress: unknown style {style}"),
        }
    }
}

/// Whether any part of a style's bounding box at (x, y) lands on the panel
fn is_visible(frame: &FrameBuffer, x: i32, y: i32, style: u8) -> bool {
    let (width, height) = bounds(style);
    x < frame.width()
        && y < frame.height()
        && x.saturating_add(width) > 0
        && y.saturating_add(height) > 0
}

/// Bounding box of a style
const fn bounds(style: u8) -> (i32, i32) {
    match style {
        2 => (100, 10),
        3 => (100, 5),
        4 => (98, 8),
        5 => (104, 8),
        6 => (100, 12),
        7 => (10, 40),
        8 | 9 => (25, 25),
        11 | 15 => (21, 21),
        14 => (20, 6),
        _ => (100, 8),
    }
}

fn clear_box(frame: &mut FrameBuffer, x: i32, y: i32, style: u8) {
    let (width, height) = bounds(style);
    for row in y..y.saturating_add(height) {
        for column in x..x.saturating_add(width) {
            frame.clear_pixel(column, row);
        }
    }
}

/// Share of `span` covered at `progress` percent
const fn scaled(progress: i32, span: i32) -> i32 {
    progress * span / 100
}

fn draw_bar(frame: &mut FrameBuffer, font: &Font<'_>, progress: i32, x: i32, y: i32, style: u8) {
    clear_box(frame, x, y, style);
    match style {
        1 => {
            frame.rectangle(x, y, 100, 8, 0, 1, false);
            frame.fill_rect(x + 2, y + 2, scaled(progress, 96), 4);
        }
        2 => {
            frame.rectangle(x, y, 100, 10, 4, 1, false);
            frame.rectangle(x + 2, y + 2, scaled(progress, 96), 6, 2, 1, true);
        }
        3 => {
            frame.hline(x, y + 4, 100);
            frame.fill_rect(x, y, scaled(progress, 100), 4);
        }
        4 => {
            let lit = progress / 10;
            for segment in 0..10 {
                let left = x + segment * 10;
                frame.rectangle(left, y, 8, 8, 0, 1, segment < lit);
            }
        }
        5 => {
            frame.rectangle(x, y, 76, 8, 0, 1, false);
            frame.fill_rect(x + 2, y + 2, scaled(progress, 72), 4);
            frame.draw_text(font, &percent_label(progress), x + 80, y, false);
        }
        6 => {
            frame.rectangle(x, y, 100, 12, 0, 2, false);
            frame.fill_rect(x + 3, y + 3, scaled(progress, 94), 6);
        }
        7 => {
            frame.rectangle(x, y, 10, 40, 0, 1, false);
            let filled = scaled(progress, 36);
            frame.fill_rect(x + 2, y + 38 - filled, 6, filled);
        }
        8 | 9 => {
            let (cx, cy) = (x + 12, y + 12);
            frame.circle(cx, cy, 12, 1);
            fill_arc(frame, cx, cy, 8, 11, 0, progress * FULL_TURN / 100);
            if style == 9 {
                let label = percent_label(progress);
                let width = label.len() as i32 * CELL_WIDTH - 1;
                frame.draw_text(font, &label, cx - width / 2, cy - 3, false);
            }
        }
        _ => {
            frame.hline(x, y + 4, 100);
            let knob = x + scaled(progress, 94);
            frame.fill_rect(x, y + 3, knob - x, 3);
            frame.rectangle(knob, y, 6, 8, 2, 1, true);
        }
    }
}

fn draw_loader(frame: &mut FrameBuffer, step: u8, x: i32, y: i32, style: u8) {
    clear_box(frame, x, y, style);
    let step = i32::from(step);
    match style {
        11 => {
            let (cx, cy) = (x + 10, y + 10);
            let active = step.rem_euclid(8) as usize;
            for (index, (dx, dy)) in SPINNER_DOTS.iter().enumerate() {
                if index == active {
                    frame.fill_rect(cx + dx - 1, cy + dy - 1, 3, 3);
                } else {
                    frame.draw_pixel(cx + dx, cy + dy);
                }
            }
        }
        12 => {
            frame.rectangle(x, y, 100, 8, 0, 1, false);
            let offset = triangle(step, 8) * 11;
            frame.fill_rect(x + 1 + offset, y + 1, 10, 6);
        }
        13 => {
            frame.rectangle(x, y, 100, 8, 0, 1, false);
            for row in 1..7 {
                for column in 1..99 {
                    if (column - row + step * 2).rem_euclid(8) < 4 {
                        frame.draw_pixel(x + column, y + row);
                    }
                }
            }
        }
        14 => {
            let active = step.rem_euclid(3);
            for dot in 0..3 {
                let left = x + dot * 8;
                if dot == active {
                    frame.fill_rect(left, y, 4, 4);
                } else {
                    frame.fill_rect(left + 1, y + 3, 2, 2);
                }
            }
        }
        _ => {
            let (cx, cy) = (x + 10, y + 10);
            let start = step.rem_euclid(8) * FULL_TURN / 8;
            fill_arc(frame, cx, cy, 8, 10, start, start + FULL_TURN / 4);
        }
    }
}

/// Position bouncing between 0 and `peak`
const fn triangle(step: i32, peak: i32) -> i32 {
    let phase = step.rem_euclid(2 * peak);
    if phase <= peak { phase } else { 2 * peak - phase }
}

/// Light the annulus `inner..=outer` between pseudo-angles `from` and `to`
///
/// Angles wrap past a full turn.
fn fill_arc(frame: &mut FrameBuffer, cx: i32, cy: i32, inner: i32, outer: i32, from: i32, to: i32) {
    if to <= from {
        return;
    }
    for dy in -outer..=outer {
        for dx in -outer..=outer {
            let distance = dx * dx + dy * dy;
            if distance < inner * inner || distance > outer * outer {
                continue;
            }
            let angle = pseudo_angle(dx, dy);
            let inside = (from..to).contains(&angle)
                || (from..to).contains(&(angle + FULL_TURN));
            if inside {
                frame.draw_pixel(cx + dx, cy + dy);
            }
        }
    }
}

/// Monotonic stand-in for the angle of (dx, dy), 0-3999
///
/// Zero points up and values grow clockwise with y pointing down the
/// screen. Avoids trigonometry: each quarter turn maps `|dx| / (|dx| + |dy|)`
/// onto 1000 units.
fn pseudo_angle(dx: i32, dy: i32) -> i32 {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax + ay == 0 {
        return 0;
    }
    let t = ax * 1000 / (ax + ay);
    match (dx >= 0, dy < 0) {
        (true, true) => t,
        (true, false) => 2000 - t,
        (false, false) => 2000 + t,
        (false, true) => FULL_TURN - t,
    }
}

/// `progress` as "NN%", at most "100%"
fn percent_label(progress: i32) -> String<4> {
    let mut label = String::new();
    let _ = write!(&mut label, "{}%", progress.clamp(0, 100));
    label
}
