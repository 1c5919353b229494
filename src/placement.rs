//! Fluent text and bitmap placement
//!
//! A [`Chain`] collects a position and a piece of content in any order and
//! draws the content as soon as both coordinates and the content are known.
//! The position is then forgotten, so each item needs its own coordinates.
//!
//! ```rust,ignore
//! display
//!     .chain()
//!     .text("Temp")
//!     .at(0, 0)
//!     .at(0, 10)
//!     .text("21.5 C");
//! ```

use crate::display::Display;
use crate::framebuffer::Bitmap;
use crate::interface::DisplayInterface;

#[derive(Clone, Copy, Debug)]
enum Pending<'d> {
    Text(&'d str),
    Bitmap(Bitmap<'d>),
}

/// Placement cursor borrowed from a [`Display`]
///
/// Content still pending when the chain is dropped is discarded.
pub struct Chain<'d, I>
where
    I: DisplayInterface,
{
    display: &'d mut Display<I>,
    x: Option<i32>,
    y: Option<i32>,
    pending: Option<Pending<'d>>,
}

impl<'d, I> Chain<'d, I>
where
    I: DisplayInterface,
{
    pub(crate) const fn new(display: &'d mut Display<I>) -> Self {
        Self {
            display,
            x: None,
            y: None,
            pending: None,
        }
    }

    /// Set both coordinates
    pub fn at(&mut self, x: i32, y: i32) -> &mut Self {
        self.x = Some(x);
        self.y = Some(y);
        self.emit()
    }

    /// Set the horizontal coordinate
    pub fn x(&mut self, x: i32) -> &mut Self {
        self.x = Some(x);
        self.emit()
    }

    /// Set the vertical coordinate
    pub fn y(&mut self, y: i32) -> &mut Self {
        self.y = Some(y);
        self.emit()
    }

    /// Queue text for placement
    pub fn text(&mut self, text: &'d str) -> &mut Self {
        self.pending = Some(Pending::Text(text));
        self.emit()
    }

    /// Queue a bitmap for placement
    pub fn bitmap(&mut self, bitmap: Bitmap<'d>) -> &mut Self {
        self.pending = Some(Pending::Bitmap(bitmap));
        self.emit()
    }

    /// Whether content is waiting for coordinates
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn emit(&mut self) -> &mut Self {
        if let (Some(x), Some(y), Some(pending)) = (self.x, self.y, self.pending) {
            match pending {
                Pending::Text(text) => self.display.print(text, x, y),
                Pending::Bitmap(bitmap) => self.display.draw(&bitmap, x, y),
            }
            self.x = None;
            self.y = None;
            self.pending = None;
        }
        self
    }
}
