//! Text rendering
//!
//! Characters are drawn in 6x8 cells: five glyph columns and one spacing
//! column, eight rows tall. A `'\n'` returns to the starting column one line
//! further down. Characters the font does not cover leave a blank cell.

use crate::display::Display;
use crate::error::Error;
use crate::font::{CELL_HEIGHT, CELL_WIDTH, Font};
use crate::framebuffer::FrameBuffer;
use crate::interface::DisplayInterface;

impl FrameBuffer {
    /// Draw one character cell with its top-left corner at (x, y)
    ///
    /// Highlighted cells are filled with the pen and the glyph is cut out of
    /// the fill.
    pub fn draw_char(&mut self, font: &Font<'_>, ch: char, x: i32, y: i32, highlighted: bool) {
        if highlighted {
            self.fill_rect(x, y, CELL_WIDTH, CELL_HEIGHT);
        }
        let Some(glyph) = font.glyph(ch) else {
            return;
        };
        let ink = !self.is_inverted() ^ highlighted;
        for (column, bits) in (0..).zip(glyph.iter()) {
            for row in 0..8 {
                if bits & (1 << row) != 0 {
                    self.set_pixel(x.saturating_add(column), y.saturating_add(row), ink);
                }
            }
        }
    }

    /// Draw a string starting at (x, y)
    ///
    /// Returns the cursor position following the last character.
    pub fn draw_text(
        &mut self,
        font: &Font<'_>,
        text: &str,
        x: i32,
        y: i32,
        highlighted: bool,
    ) -> (i32, i32) {
        let mut cursor = (x, y);
        for ch in text.chars() {
            cursor = self.advance(font, ch, x, cursor, highlighted);
        }
        cursor
    }

    /// Draw `ch` at `cursor`, returning the next cursor position
    fn advance(
        &mut self,
        font: &Font<'_>,
        ch: char,
        line_start: i32,
        cursor: (i32, i32),
        highlighted: bool,
    ) -> (i32, i32) {
        if ch == '\n' {
            return (line_start, cursor.1.saturating_add(CELL_HEIGHT));
        }
        self.draw_char(font, ch, cursor.0, cursor.1, highlighted);
        (cursor.0.saturating_add(CELL_WIDTH), cursor.1)
    }
}

/// Character-by-character text reveal
///
/// Each [`step`](Typewriter::step) draws the next character and flushes the
/// display, leaving the pacing to the caller's scheduler. A newline is
/// consumed together with the character after it.
///
/// ```rust,ignore
/// let mut writer = Typewriter::new("Booting...", 0, 0, false);
/// while writer.step(&mut display)? {
///     timer.delay_ms(40);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Typewriter<'t> {
    remaining: core::str::Chars<'t>,
    line_start: i32,
    cursor: (i32, i32),
    highlighted: bool,
}

impl<'t> Typewriter<'t> {
    /// Prepare `text` for display at (x, y)
    pub fn new(text: &'t str, x: i32, y: i32, highlighted: bool) -> Self {
        Self {
            remaining: text.chars(),
            line_start: x,
            cursor: (x, y),
            highlighted,
        }
    }

    /// Whether every character has been revealed
    pub fn is_done(&self) -> bool {
        self.remaining.as_str().is_empty()
    }

    /// Reveal the next character and flush
    ///
    /// Returns `Ok(true)` while characters remain, `Ok(false)` once the text
    /// is complete. Calling it again after completion does nothing.
    ///
    /// # Errors
    ///
    /// Returns the flush error; the character stays drawn in the frame
    /// buffer and the next step continues after it.
    pub fn step<I: DisplayInterface>(
        &mut self,
        display: &mut Display<I>,
    ) -> Result<bool, Error<I>> {
        let font = display.font();
        loop {
            let Some(ch) = self.remaining.next() else {
                return Ok(false);
            };
            self.cursor =
                display
                    .frame_mut()
                    .advance(font, ch, self.line_start, self.cursor, self.highlighted);
            if ch != '\n' {
                break;
            }
        }
        display.flush()?;
        Ok(!self.is_done())
    }
}
