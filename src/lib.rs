//! SSD1306 OLED Display Driver
//!
//! A driver for SSD1306 monochrome OLED controllers (up to 128x64 pixels) on a
//! two-wire bus, with a sequencer-driven bus engine for controllers that run
//! the bus protocol in a programmable I/O block instead of a hardware
//! peripheral.
//!
//! ## Features
//!
//! - `no_std` compatible, no allocation
//! - `embedded-hal` v1.0 support (the bus engine implements `I2c`)
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Lines, circles, rounded rectangles, text, bitmaps and data plots
//! - Fifteen progress bar and loader styles
//! - Power modes coupling bus clock and panel drive levels
//!
//! ## Usage
//!
//! ```rust
//! use ssd1306_pio::bus::{BusEngine, Condition, Sequencer};
//! use ssd1306_pio::{Builder, Dimensions, Display, Plot, PlotKind, PowerMode};
//!
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
//! # let sequencer = Pio;
//! let dims = match Dimensions::new(128, 64) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new()
//!     .dimensions(dims)
//!     .power_mode(PowerMode::Performance)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::with_i2c(BusEngine::new(sequencer), config);
//! if display.begin().is_err() {
//!     return;
//! }
//!
//! display.print("Signal", 0, 0);
//! let samples = [0, 60, 120, 60, 0, -60, -120, -60];
//! display
//!     .frame_mut()
//!     .plot(PlotKind::Pulse, &Plot::new(0, 15, 64, 32, &samples, 120));
//! display.progress_bar(40, 0, 52, 1);
//! let _ = display.flush();
//! ```

#![cfg_attr(not(test), no_std)]

#[cfg(test)]
extern crate alloc;

/// Sequencer-driven two-wire bus engine
pub mod bus;
/// SSD1306 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Glyph tables
pub mod font;
/// In-memory pixel store
pub mod framebuffer;
/// Shape rendering
pub mod geometry;
/// Hardware interface abstraction
pub mod interface;
/// Fluent text and bitmap placement
pub mod placement;
/// Data plots
pub mod plot;
/// Power modes and drive profiles
pub mod power;
/// Progress bars and loaders
pub mod progress;
/// Text rendering
pub mod text;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

#[cfg(test)]
mod mock;

pub use bus::{BusClock, BusEngine, Sequencer};
pub use config::{Builder, Config, DEFAULT_ADDRESS, Dimensions, MAX_HEIGHT, MAX_WIDTH, Rotation};
pub use display::Display;
pub use error::{BuilderError, BusError, Error, NackPhase, UnsupportedFrequency};
pub use font::{DEFAULT_FONT, Font};
pub use framebuffer::{Bitmap, FrameBuffer};
pub use geometry::Quadrant;
pub use interface::{DisplayInterface, I2cInterface};
pub use placement::Chain;
pub use plot::{Plot, PlotKind};
pub use power::{PowerMode, PowerProfile};
pub use text::Typewriter;
