//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`I2cInterface`]
//! struct for communicating with the SSD1306 controller over a two-wire bus.
//!
//! ## Framing
//!
//! The SSD1306 has no data/command pin on the two-wire bus. Every bus write
//! carries a leading control byte instead:
//!
//! - `0x00` ([`CONTROL_COMMAND`]) - the following bytes are commands
//! - `0x40` ([`CONTROL_DATA`]) - the following bytes go to display RAM
//!
//! [`I2cInterface`] sends the control byte and the payload as two merged
//! write operations of one transaction, so the payload is never copied.
//!
//! ## Example
//!
//! ```rust
//! use ssd1306_pio::bus::{BusEngine, Condition, Sequencer};
//! use ssd1306_pio::{DisplayInterface, I2cInterface, DEFAULT_ADDRESS};
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
//! let mut interface = I2cInterface::new(BusEngine::new(Pio), DEFAULT_ADDRESS);
//!
//! // Display on
//! let _ = interface.send_commands(&[0xAF]);
//!
//! // Eight columns of RAM
//! let _ = interface.send_data(&[0xFF; 8]);
//! ```

use core::fmt::Debug;
use embedded_hal::i2c::{I2c, Operation};

use crate::bus::BusClock;
use crate::command::{CONTROL_COMMAND, CONTROL_DATA};
use crate::error::UnsupportedFrequency;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for hardware interface to SSD1306 controller
///
/// This trait abstracts over different transports, allowing the
/// [`Display`](crate::display::Display) to work with any bus that can frame
/// command and data streams.
///
/// ## Implementing
///
/// For most cases, use the provided [`I2cInterface`]. Implement this trait
/// on your own type for a different transport or for recording in tests.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send a command stream
    ///
    /// `commands` holds command bytes with their parameters, sent as one
    /// transfer behind the command control byte.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    fn send_commands(&mut self, commands: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Send a display RAM data stream
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Switch the bus clock
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFrequency`] if the transport cannot run at `hz`;
    /// the previous clock must stay in effect.
    fn set_bus_frequency(&mut self, hz: u32) -> InterfaceResult<(), UnsupportedFrequency>;
}

/// Two-wire interface implementation for SSD1306
///
/// Implements [`DisplayInterface`] on top of any embedded-hal v1.0 [`I2c`]
/// bus that also implements [`BusClock`], such as
/// [`BusEngine`](crate::bus::BusEngine).
///
/// ## Type Parameters
///
/// * `I2C` - bus implementing [`I2c`] and [`BusClock`]
#[derive(Debug)]
pub struct I2cInterface<I2C> {
    /// Bus for communication
    bus: I2C,
    /// 7-bit device address
    address: u8,
}

impl<I2C> I2cInterface<I2C>
where
    I2C: I2c + BusClock,
{
    /// Create a new interface for the device at `address`
    pub const fn new(bus: I2C, address: u8) -> Self {
        Self { bus, address }
    }

    /// Device address
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Access the bus
    pub const fn bus(&self) -> &I2C {
        &self.bus
    }

    /// Access the bus mutably
    pub const fn bus_mut(&mut self) -> &mut I2C {
        &mut self.bus
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.bus
    }

    fn write_framed(&mut self, control: u8, payload: &[u8]) -> Result<(), I2C::Error> {
        self.bus.transaction(
            self.address,
            &mut [Operation::Write(&[control]), Operation::Write(payload)],
        )
    }
}

impl<I2C> DisplayInterface for I2cInterface<I2C>
where
    I2C: I2c + BusClock,
{
    type Error = I2C::Error;

    fn send_commands(&mut self, commands: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.write_framed(CONTROL_COMMAND, commands)
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.write_framed(CONTROL_DATA, data)
    }

    fn set_bus_frequency(&mut self, hz: u32) -> InterfaceResult<(), UnsupportedFrequency> {
        self.bus.set_frequency(hz)
    }
}
