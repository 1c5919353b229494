//! Graphics support via embedded-graphics
//!
//! [`Display`] implements the [`DrawTarget`] trait from the embedded-graphics
//! ecosystem with [`BinaryColor`] pixels. Primitives, fonts and images draw
//! into the same frame buffer as the built-in renderers, and reach the panel
//! with the next [`flush`](Display::flush).
//!
//! ## Example
//!
//! ```rust
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     pixelcolor::BinaryColor,
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//! use ssd1306_pio::bus::{BusEngine, Condition, Sequencer};
//! use ssd1306_pio::{Builder, Dimensions, Display};
//! # struct Pio;
//! # impl Sequencer for Pio {
//! #     fn emit(&mut self, _condition: Condition) {}
//! #     fn try_push(&mut self, _frame: u16) -> bool { true }
//! #     fn try_pop(&mut self) -> Option<u8> { None }
//! #     fn is_idle(&self) -> bool { true }
//! #     fn fault_raised(&self) -> bool { false }
//! #     fn clear_fault(&mut self) {}
//! #     fn set_rx_enabled(&mut self, _enabled: bool) {}
//! #     fn set_clock_hz(&mut self, _hz: u32) -> bool { true }
//! # }
//! # let dims = match Dimensions::new(128, 64) {
//! #     Ok(dims) => dims,
//! #     Err(_) => return,
//! # };
//! # let config = match Builder::new().dimensions(dims).build() {
//! #     Ok(config) => config,
//! #     Err(_) => return,
//! # };
//! let mut display = Display::with_i2c(BusEngine::new(Pio), config);
//!
//! let _ = Rectangle::new(Point::new(0, 0), Size::new(128, 16))
//!     .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
//!     .draw(&mut display);
//!
//! let _ = Circle::new(Point::new(96, 24), 32)
//!     .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
//!     .draw(&mut display);
//!
//! let _ = Text::new(
//!     "Hello, OLED!",
//!     Point::new(4, 11),
//!     MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
//! )
//! .draw(&mut display);
//!
//! let _ = display.flush();
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    prelude::Pixel,
};

use crate::display::Display;
use crate::interface::DisplayInterface;

impl<I> DrawTarget for Display<I>
where
    I: DisplayInterface,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let frame = self.frame_mut();
        for Pixel(Point { x, y }, color) in pixels {
            frame.set_pixel(x, y, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let frame = self.frame_mut();
        if color.is_on() {
            let (width, height) = (frame.width(), frame.height());
            for y in 0..height {
                for x in 0..width {
                    frame.set_pixel(x, y, true);
                }
            }
        } else {
            frame.clear();
        }
        Ok(())
    }
}

impl<I> OriginDimensions for Display<I>
where
    I: DisplayInterface,
{
    fn size(&self) -> Size {
        let dims = self.dimensions();
        Size::new(u32::from(dims.width), u32::from(dims.height))
    }
}
