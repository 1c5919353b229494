//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`]),
//! display operations ([`Error`]) and the bus engine ([`BusError`],
//! [`UnsupportedFrequency`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration or bitmap construction
//! - [`Error`] - Runtime errors during display operations
//! - [`BusError`] - Two-wire bus faults reported by [`BusEngine`](crate::bus::BusEngine)
//! - [`UnsupportedFrequency`] - A bus clock the sequencer cannot reach
//!
//! ## Example
//!
//! ```
//! use ssd1306_pio::{Builder, BuilderError, Dimensions};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Invalid dimensions
//! let result = Dimensions::new(255, 64); // Too wide
//! assert!(result.is_err());
//! ```

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

use crate::interface::DisplayInterface;

/// Maximum number of columns (segment outputs) supported by the SSD1306
pub const MAX_WIDTH: u8 = 128;

/// Maximum number of rows (common outputs) supported by the SSD1306
pub const MAX_HEIGHT: u8 = 64;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying bus error.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (bus transaction failed)
    ///
    /// Wraps the underlying error from the [`DisplayInterface`] implementation.
    /// A failed flush is a dropped frame: the frame buffer is left intact and
    /// the next flush transmits it again.
    Interface(I::Error),
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur before the display is created.
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in pixels requested
        width: u8,
        /// Height in pixels requested
        height: u8,
    },
    /// Bus address does not fit in 7 bits
    InvalidAddress(u8),
    /// Bitmap data is shorter than its declared size
    BitmapTooSmall {
        /// Required data length in bytes
        required: usize,
        /// Provided data length in bytes
        provided: usize,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (max {MAX_WIDTH}x{MAX_HEIGHT}, height must be multiple of 8)"
            ),
            Self::InvalidAddress(address) => {
                write!(f, "Invalid bus address {address:#04x} (must be 7-bit)")
            }
            Self::BitmapTooSmall { required, provided } => write!(
                f,
                "Bitmap too small: required {required} bytes, provided {provided}"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

/// Which part of a transfer was not acknowledged
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NackPhase {
    /// The target did not acknowledge its address
    Address,
    /// The target did not acknowledge a data byte
    Data,
}

/// Two-wire bus faults
///
/// Every variant except [`BusError::Faulted`] puts the engine into its sticky
/// error state; `Faulted` reports that it was already there.
/// [`BusEngine::resume_after_error`](crate::bus::BusEngine::resume_after_error)
/// must be called before the engine accepts another transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusError {
    /// An expected acknowledgment was not received
    Nack(NackPhase),
    /// The sequencer did not make progress within the attempt budget
    Stalled,
    /// Operation issued in a state that does not allow it
    Protocol,
    /// The engine holds an unrecovered fault
    Faulted,
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Nack(NackPhase::Address) => write!(f, "Address not acknowledged"),
            Self::Nack(NackPhase::Data) => write!(f, "Data byte not acknowledged"),
            Self::Stalled => write!(f, "Bus sequencer stalled"),
            Self::Protocol => write!(f, "Bus operation out of sequence"),
            Self::Faulted => write!(f, "Bus engine has an unrecovered fault"),
        }
    }
}

impl core::error::Error for BusError {}

impl embedded_hal::i2c::Error for BusError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Nack(NackPhase::Address) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            Self::Nack(NackPhase::Data) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
            Self::Stalled => ErrorKind::Bus,
            Self::Protocol | Self::Faulted => ErrorKind::Other,
        }
    }
}

/// Requested bus clock cannot be produced by the sequencer
///
/// Holds the rejected frequency in Hz. The previous clock stays in effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnsupportedFrequency(pub u32);

impl core::fmt::Display for UnsupportedFrequency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Unsupported bus frequency: {} Hz", self.0)
    }
}

impl core::error::Error for UnsupportedFrequency {}
