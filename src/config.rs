//! Display configuration types and builder

use crate::command::{COM_PINS_ALTERNATIVE, COM_PINS_SEQUENTIAL};
pub use crate::error::{BuilderError, MAX_HEIGHT, MAX_WIDTH};
use crate::power::PowerMode;

/// Default 7-bit bus address of SSD1306 modules (SA0 pulled low)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Display dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Number of columns (width in pixels, corresponds to segment outputs)
    pub width: u8,
    /// Number of rows (height in pixels, corresponds to common outputs)
    pub height: u8,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - width == 0 or width > `MAX_WIDTH`
    /// - height < 16 or height > `MAX_HEIGHT` (multiplex ratio range)
    /// - height % 8 != 0 (rows are stored in 8-row pages)
    pub const fn new(width: u8, height: u8) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_WIDTH {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        if height < 16 || height > MAX_HEIGHT || height % 8 != 0 {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Calculate required buffer size in bytes
    pub const fn buffer_size(&self) -> usize {
        (self.width as usize * self.height as usize) / 8
    }

    /// Number of 8-row pages
    pub const fn pages(&self) -> u8 {
        self.height / 8
    }

    /// COM pin configuration matching the panel geometry
    pub const fn com_pins(&self) -> u8 {
        if (self.width == 128 && self.height == 32) || self.height == 16 {
            COM_PINS_SEQUENTIAL
        } else {
            COM_PINS_ALTERNATIVE
        }
    }
}

/// Display rotation relative to native orientation
///
/// The SSD1306 mirrors in hardware, so only the two orientations that keep
/// the page layout intact are offered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// Column 0 on the left, page 0 at the top (segment remap + COM scan reversed)
    #[default]
    Rotate0,
    /// Rotated 180 degrees
    Rotate180,
}

/// Display configuration
///
/// Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Display dimensions
    pub dimensions: Dimensions,
    /// 7-bit bus address
    pub address: u8,
    /// Display rotation
    pub rotation: Rotation,
    /// Power mode applied at startup
    pub power_mode: PowerMode,
    /// Vertical display offset (0xD3 parameter)
    pub display_offset: u8,
    /// COM pins hardware configuration
    pub com_pins: u8,
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust
/// use ssd1306_pio::{Builder, Dimensions, PowerMode};
///
/// let dims = match Dimensions::new(128, 64) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new()
///     .dimensions(dims)
///     .address(0x3D)
///     .power_mode(PowerMode::Performance)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.address, 0x3D);
/// ```
#[must_use]
#[derive(Debug)]
pub struct Builder {
    /// Display dimensions (required)
    dimensions: Option<Dimensions>,
    /// 7-bit bus address
    address: u8,
    /// Display rotation
    rotation: Rotation,
    /// Power mode applied at startup
    power_mode: PowerMode,
    /// Vertical display offset
    display_offset: u8,
    /// COM pins override, derived from dimensions when unset
    com_pins: Option<u8>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            address: DEFAULT_ADDRESS,
            rotation: Rotation::Rotate0,
            power_mode: PowerMode::Balanced,
            display_offset: 0,
            com_pins: None,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub const fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the 7-bit bus address (default 0x3C)
    pub const fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Set display rotation
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the power mode applied by `begin`
    pub const fn power_mode(mut self, mode: PowerMode) -> Self {
        self.power_mode = mode;
        self
    }

    /// Set vertical display offset
    pub const fn display_offset(mut self, offset: u8) -> Self {
        self.display_offset = offset;
        self
    }

    /// Override the COM pins hardware configuration
    ///
    /// Some modules wire a 128x32 glass with the alternative layout.
    pub const fn com_pins(mut self, value: u8) -> Self {
        self.com_pins = Some(value);
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set,
    /// `BuilderError::InvalidAddress` if the address does not fit in 7 bits
    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self.dimensions.ok_or(BuilderError::MissingDimensions)?;
        if self.address > 0x7F {
            return Err(BuilderError::InvalidAddress(self.address));
        }
        Ok(Config {
            dimensions,
            address: self.address,
            rotation: self.rotation,
            power_mode: self.power_mode,
            display_offset: self.display_offset,
            com_pins: self.com_pins.unwrap_or_else(|| dimensions.com_pins()),
        })
    }
}
