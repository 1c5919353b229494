//! SSD1306 command definitions
//!
//! This module defines the command bytes used to control the SSD1306
//! OLED controller. On the two-wire bus every transfer starts with a control
//! byte that tells the controller how to interpret the bytes that follow:
//!
//! ## Stream Structure
//!
//! 1. Start condition, 7-bit address + write bit
//! 2. Control byte: [`CONTROL_COMMAND`] or [`CONTROL_DATA`]
//! 3. Command bytes (with their parameters) or display RAM bytes
//! 4. Stop condition
//!
//! ## Example
//!
//! ```rust
//! use ssd1306_pio::{command, DisplayInterface};
//! # use core::convert::Infallible;
//! # struct Recorder;
//! # impl DisplayInterface for Recorder {
//! #     type Error = Infallible;
//! #     fn send_commands(&mut self, _commands: &[u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn send_data(&mut self, _data: &[u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn set_bus_frequency(&mut self, _hz: u32) -> Result<(), ssd1306_pio::UnsupportedFrequency> { Ok(()) }
//! # }
//! # let mut interface = Recorder;
//! // Full-brightness contrast
//! let _ = interface.send_commands(&[command::SET_CONTRAST, 0xFF]);
//!
//! // Panel on
//! let _ = interface.send_commands(&[command::DISPLAY_ON]);
//! ```

// Control bytes

/// Control byte announcing a command stream (Co = 0, D/C# = 0)
pub const CONTROL_COMMAND: u8 = 0x00;

/// Control byte announcing a display RAM data stream (Co = 0, D/C# = 1)
pub const CONTROL_DATA: u8 = 0x40;

// Fundamental commands

/// Set contrast control (0x81)
///
/// Requires 1 byte: contrast level, 0x00-0xFF.
pub const SET_CONTRAST: u8 = 0x81;

/// Resume display from RAM content (0xA4)
pub const RESUME_FROM_RAM: u8 = 0xA4;

/// Entire display on, ignoring RAM content (0xA5)
pub const ENTIRE_DISPLAY_ON: u8 = 0xA5;

/// Normal display, RAM bit 1 = pixel on (0xA6)
pub const NORMAL_DISPLAY: u8 = 0xA6;

/// Inverted display, RAM bit 0 = pixel on (0xA7)
pub const INVERT_DISPLAY: u8 = 0xA7;

/// Display off, sleep mode (0xAE)
pub const DISPLAY_OFF: u8 = 0xAE;

/// Display on, normal mode (0xAF)
pub const DISPLAY_ON: u8 = 0xAF;

// Scrolling

/// Deactivate scroll (0x2E)
///
/// Must be issued before RAM writes if a scroll was ever activated.
pub const DEACTIVATE_SCROLL: u8 = 0x2E;

// Addressing

/// Set memory addressing mode (0x20)
///
/// Requires 1 byte: [`ADDRESSING_HORIZONTAL`], [`ADDRESSING_VERTICAL`] or [`ADDRESSING_PAGE`].
pub const MEMORY_ADDRESSING_MODE: u8 = 0x20;

/// Horizontal addressing: column pointer wraps into the next page
pub const ADDRESSING_HORIZONTAL: u8 = 0x00;

/// Vertical addressing: page pointer wraps into the next column
pub const ADDRESSING_VERTICAL: u8 = 0x01;

/// Page addressing: column pointer wraps within the page
pub const ADDRESSING_PAGE: u8 = 0x02;

/// Set column address window (0x21)
///
/// Requires 2 bytes: [start column, end column], horizontal/vertical mode only.
pub const SET_COLUMN_ADDRESS: u8 = 0x21;

/// Set page address window (0x22)
///
/// Requires 2 bytes: [start page, end page], horizontal/vertical mode only.
pub const SET_PAGE_ADDRESS: u8 = 0x22;

// Hardware configuration

/// Set display start line (0x40 | line), line 0-63
pub const SET_START_LINE: u8 = 0x40;

/// Segment remap: column 0 mapped to SEG0 (0xA0)
pub const SEGMENT_REMAP_NORMAL: u8 = 0xA0;

/// Segment remap: column 127 mapped to SEG0 (0xA1)
pub const SEGMENT_REMAP_REVERSED: u8 = 0xA1;

/// Set multiplex ratio (0xA8)
///
/// Requires 1 byte: number of active rows minus one (15-63).
pub const SET_MULTIPLEX_RATIO: u8 = 0xA8;

/// COM output scan from COM0 to COM[N-1] (0xC0)
pub const COM_SCAN_NORMAL: u8 = 0xC0;

/// COM output scan from COM[N-1] to COM0 (0xC8)
pub const COM_SCAN_REMAPPED: u8 = 0xC8;

/// Set display offset (0xD3)
///
/// Requires 1 byte: vertical shift by COM, 0-63.
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;

/// Set COM pins hardware configuration (0xDA)
///
/// Requires 1 byte: [`COM_PINS_SEQUENTIAL`] or [`COM_PINS_ALTERNATIVE`].
pub const SET_COM_PINS: u8 = 0xDA;

/// Sequential COM pin configuration (128x32 and 96x16 panels)
pub const COM_PINS_SEQUENTIAL: u8 = 0x02;

/// Alternative COM pin configuration (128x64 and 64x48 panels)
pub const COM_PINS_ALTERNATIVE: u8 = 0x12;

// Timing and driving scheme

/// Set display clock divide ratio / oscillator frequency (0xD5)
///
/// Requires 1 byte: oscillator frequency in the high nibble, divide ratio
/// minus one in the low nibble.
pub const SET_CLOCK_DIVIDE: u8 = 0xD5;

/// Set pre-charge period (0xD9)
///
/// Requires 1 byte: phase 2 period in the high nibble, phase 1 in the low nibble.
pub const SET_PRECHARGE: u8 = 0xD9;

/// Set VCOMH deselect level (0xDB)
///
/// Requires 1 byte: 0x00 = 0.65 x VCC, 0x20 = 0.77 x VCC, 0x30 = 0.83 x VCC.
pub const SET_VCOMH_DESELECT: u8 = 0xDB;

// Charge pump

/// Charge pump setting (0x8D)
///
/// Requires 1 byte: [`CHARGE_PUMP_OFF`] or one of the enable levels.
pub const CHARGE_PUMP: u8 = 0x8D;

/// Charge pump disabled (external VCC)
pub const CHARGE_PUMP_OFF: u8 = 0x10;

/// Charge pump enabled, 7.5 V
pub const CHARGE_PUMP_7V5: u8 = 0x14;

/// Charge pump enabled, 8.5 V
pub const CHARGE_PUMP_8V5: u8 = 0x94;

/// Charge pump enabled, 9.0 V
pub const CHARGE_PUMP_9V0: u8 = 0x95;
