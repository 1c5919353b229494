//! Core display operations
//!
//! [`Display`] owns the frame buffer and the interface. Drawing only touches
//! memory; [`Display::flush`] is the single operation that streams the frame
//! to the panel.
//!
//! ## Readiness
//!
//! The panel must be initialized by [`Display::begin`] before frames can be
//! shown. Until then:
//!
//! - drawing works normally
//! - power mode and brightness changes are stored and applied by `begin`
//! - panel toggles (invert, entire-display-on, on/off) are ignored
//! - `flush` runs `begin` itself first

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::bus::BusClock;
use crate::command::{
    ADDRESSING_HORIZONTAL, CHARGE_PUMP, COM_SCAN_NORMAL, COM_SCAN_REMAPPED, DEACTIVATE_SCROLL,
    DISPLAY_OFF, DISPLAY_ON, ENTIRE_DISPLAY_ON, INVERT_DISPLAY, MEMORY_ADDRESSING_MODE,
    NORMAL_DISPLAY, RESUME_FROM_RAM, SEGMENT_REMAP_NORMAL, SEGMENT_REMAP_REVERSED,
    SET_CLOCK_DIVIDE, SET_COLUMN_ADDRESS, SET_COM_PINS, SET_CONTRAST, SET_DISPLAY_OFFSET,
    SET_MULTIPLEX_RATIO, SET_PAGE_ADDRESS, SET_PRECHARGE, SET_START_LINE, SET_VCOMH_DESELECT,
};
use crate::config::{Config, Dimensions, Rotation};
use crate::error::Error;
use crate::font::{DEFAULT_FONT, Font};
use crate::framebuffer::{Bitmap, FrameBuffer};
use crate::interface::{DisplayInterface, I2cInterface};
use crate::placement::Chain;
use crate::power::{PowerMode, PowerProfile, SUPER_BRIGHT, brightness_to_contrast};
use crate::text::Typewriter;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// SSD1306 display driver
///
/// ## Example
///
/// ```rust
/// use ssd1306_pio::bus::{BusEngine, Condition, Sequencer};
/// use ssd1306_pio::{Builder, Dimensions, Display};
/// # struct Pio;
/// # impl Sequencer for Pio {
/// #     fn emit(&mut self, _condition: Condition) {}
/// #     fn try_push(&mut self, _frame: u16) -> bool { true }
/// #     fn try_pop(&mut self) -> Option<u8> { None }
/// #     fn is_idle(&self) -> bool { true }
/// #     fn fault_raised(&self) -> bool { false }
/// #     fn clear_fault(&mut self) {}
/// #     fn set_rx_enabled(&mut self, _enabled: bool) {}
/// #     fn set_clock_hz(&mut self, _hz: u32) -> bool { true }
/// # }
/// let dims = match Dimensions::new(128, 64) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new().dimensions(dims).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
///
/// let mut display = Display::with_i2c(BusEngine::new(Pio), config);
/// if display.begin().is_err() {
///     return;
/// }
/// display.print("Hello", 0, 0);
/// display.frame_mut().circle(100, 32, 12, 1);
/// let _ = display.flush();
/// ```
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Pixel store streamed by `flush`
    frame: FrameBuffer,
    /// Active glyph table
    font: &'static Font<'static>,
    /// Whether `begin` completed
    ready: bool,
    /// Active power mode
    power_mode: PowerMode,
    /// Contrast sent with the power profile
    contrast: u8,
    /// Maximum-drive override active
    super_bright: bool,
    /// Panel shows inverted pixels
    inverted: bool,
    /// Switch the panel off when the screen is cleared with refresh
    off_on_clear: bool,
    /// Panel was switched off and must be switched on by the next flush
    panel_off: bool,
    /// Animation phase of the loader styles
    pub(crate) loader_step: u8,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// Nothing is sent to the panel until [`begin`](Self::begin).
    pub fn new(interface: I, config: Config) -> Self {
        let power_mode = config.power_mode;
        Self {
            interface,
            frame: FrameBuffer::new(config.dimensions),
            config,
            font: &DEFAULT_FONT,
            ready: false,
            power_mode,
            contrast: power_mode.profile().contrast,
            super_bright: false,
            inverted: false,
            off_on_clear: false,
            panel_off: false,
            loader_step: 0,
        }
    }

    /// Apply the power mode's bus clock and send the initialization sequence
    ///
    /// If the bus cannot run at the configured mode's clock the display falls
    /// back to [`PowerMode::Balanced`].
    ///
    /// # Errors
    ///
    /// Returns the interface error; the display stays not ready and
    /// [`flush`](Self::flush) will try again.
    pub fn begin(&mut self) -> DisplayResult<I> {
        let requested = self.power_mode;
        if let Err(e) = self.interface.set_bus_frequency(requested.bus_frequency()) {
            let fallback = PowerMode::default();
            log::warn!("display: {requested:?} unavailable ({e}), falling back to {fallback:?}");
            if let Err(e) = self.interface.set_bus_frequency(fallback.bus_frequency()) {
                log::warn!("display: keeping current bus clock ({e})");
            }
            self.power_mode = fallback;
            if !self.super_bright {
                self.contrast = fallback.profile().contrast;
            }
        }

        let profile = self.drive_profile();
        let dims = self.config.dimensions;
        let (segment_remap, com_scan) = match self.config.rotation {
            Rotation::Rotate0 => (SEGMENT_REMAP_REVERSED, COM_SCAN_REMAPPED),
            Rotation::Rotate180 => (SEGMENT_REMAP_NORMAL, COM_SCAN_NORMAL),
        };
        let init = [
            DISPLAY_OFF,
            SET_CLOCK_DIVIDE,
            profile.clock_ratio,
            SET_MULTIPLEX_RATIO,
            dims.height - 1,
            SET_DISPLAY_OFFSET,
            self.config.display_offset,
            SET_START_LINE,
            CHARGE_PUMP,
            profile.charge_pump,
            MEMORY_ADDRESSING_MODE,
            ADDRESSING_HORIZONTAL,
            segment_remap,
            com_scan,
            SET_COM_PINS,
            self.config.com_pins,
            SET_CONTRAST,
            profile.contrast,
            SET_PRECHARGE,
            profile.precharge,
            SET_VCOMH_DESELECT,
            profile.vcomh,
            RESUME_FROM_RAM,
            NORMAL_DISPLAY,
            DEACTIVATE_SCROLL,
            DISPLAY_ON,
        ];

        if let Err(e) = self.send_commands(&init) {
            self.ready = false;
            log::warn!("display: initialization failed");
            return Err(e);
        }
        self.ready = true;
        self.inverted = false;
        self.panel_off = false;
        log::debug!(
            "display: ready, {}x{} in {:?}",
            dims.width,
            dims.height,
            self.power_mode
        );
        Ok(())
    }

    /// Whether the panel has been initialized
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Stream the frame buffer to the panel
    ///
    /// Initializes the panel first if needed and switches it back on after a
    /// clear turned it off. Then sets the full column and page window and
    /// sends the buffer.
    ///
    /// # Errors
    ///
    /// Returns the interface error. The frame is dropped but the buffer is
    /// kept, so the next flush sends it again.
    #[doc(alias = "inflate")]
    pub fn flush(&mut self) -> DisplayResult<I> {
        if !self.ready {
            self.begin()?;
        }
        let result = self.write_frame(self.panel_off);
        match &result {
            Ok(()) => self.panel_off = false,
            Err(Error::Interface(e)) => log::warn!("display: frame dropped: {e:?}"),
        }
        result
    }

    fn write_frame(&mut self, switch_on: bool) -> DisplayResult<I> {
        if switch_on {
            self.send_commands(&[DISPLAY_ON])?;
        }
        let dims = self.config.dimensions;
        self.send_commands(&[
            SET_COLUMN_ADDRESS,
            0,
            dims.width - 1,
            SET_PAGE_ADDRESS,
            0,
            dims.pages() - 1,
        ])?;
        self.interface
            .send_data(self.frame.as_bytes())
            .map_err(Error::Interface)
    }

    /// Clear the frame buffer
    ///
    /// With `refresh` the cleared frame is sent right away. If
    /// [`set_off_on_clear`](Self::set_off_on_clear) is enabled, the panel is
    /// switched off as well and stays off until the next flush.
    ///
    /// # Errors
    ///
    /// Returns the interface error of the refresh.
    pub fn clear_screen(&mut self, refresh: bool) -> DisplayResult<I> {
        self.frame.clear();
        if !refresh {
            return Ok(());
        }
        if self.off_on_clear && self.ready {
            self.send_commands(&[DISPLAY_OFF])?;
            self.panel_off = true;
            return self.write_frame(false);
        }
        self.flush()
    }

    /// Clear columns `start_x..=end_x` of one page
    ///
    /// When the display is ready the cleared window is also sent to the panel.
    ///
    /// # Errors
    ///
    /// Returns the interface error.
    pub fn clear_area(&mut self, start_x: u8, end_x: u8, page: u8) -> DisplayResult<I> {
        self.frame.clear_area(start_x, end_x, page);
        let span = self.frame.page_span(page, start_x, end_x);
        if !self.ready || span.is_empty() {
            return Ok(());
        }
        let end_x = start_x + (span.len() - 1) as u8;
        self.send_commands(&[
            SET_COLUMN_ADDRESS,
            start_x,
            end_x,
            SET_PAGE_ADDRESS,
            page,
            page,
        ])?;
        let span = self.frame.page_span(page, start_x, end_x);
        self.interface.send_data(span).map_err(Error::Interface)
    }

    /// Switch the panel off when [`clear_screen`](Self::clear_screen) refreshes
    pub const fn set_off_on_clear(&mut self, enabled: bool) {
        self.off_on_clear = enabled;
    }

    /// Get a reference to the frame buffer
    pub const fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Get a mutable reference to the frame buffer
    pub const fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    /// Get the display dimensions
    pub const fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Get the display configuration
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the interface
    pub const fn interface(&self) -> &I {
        &self.interface
    }

    /// Get a mutable reference to the interface
    pub const fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Release the interface
    pub fn release(self) -> I {
        self.interface
    }

    // Text

    /// Use `font` for all following text
    pub const fn set_font(&mut self, font: &'static Font<'static>) {
        self.font = font;
    }

    /// Restore the built-in font
    pub const fn clear_custom_font(&mut self) {
        self.font = &DEFAULT_FONT;
    }

    /// Active font
    pub const fn font(&self) -> &'static Font<'static> {
        self.font
    }

    /// Draw `text` with its top-left corner at (x, y)
    pub fn print(&mut self, text: &str, x: i32, y: i32) {
        self.frame.draw_text(self.font, text, x, y, false);
    }

    /// Draw `text` as inverted cells
    pub fn print_highlighted(&mut self, text: &str, x: i32, y: i32) {
        self.frame.draw_text(self.font, text, x, y, true);
    }

    /// Clear the frame buffer, then draw `text`
    pub fn print_c(&mut self, text: &str, x: i32, y: i32) {
        self.frame.clear();
        self.print(text, x, y);
    }

    /// Reveal `text` one character at a time
    ///
    /// Flushes after every character and waits `delay_ms` before the next
    /// one. Blocks until the whole text is shown; see [`Typewriter`] for a
    /// non-blocking variant.
    ///
    /// # Errors
    ///
    /// Stops at the first failed flush and returns its error.
    pub fn print_animated<D: DelayNs>(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        delay: &mut D,
        delay_ms: u32,
        highlighted: bool,
    ) -> DisplayResult<I> {
        let mut writer = Typewriter::new(text, x, y, highlighted);
        while writer.step(self)? {
            delay.delay_ms(delay_ms);
        }
        Ok(())
    }

    /// Copy a bitmap with its top-left corner at (x, y)
    pub fn draw(&mut self, bitmap: &Bitmap<'_>, x: i32, y: i32) {
        self.frame.draw_bitmap(bitmap, x, y);
    }

    /// Start a placement chain
    pub const fn chain(&mut self) -> Chain<'_, I> {
        Chain::new(self)
    }

    // Power and brightness

    /// Active power mode
    pub const fn power_mode(&self) -> PowerMode {
        self.power_mode
    }

    /// Switch power mode
    ///
    /// The bus clock changes first. If the bus cannot run at the mode's
    /// clock, a warning is logged and the current mode stays. Before
    /// [`begin`](Self::begin) the panel settings are stored and sent by it.
    ///
    /// # Errors
    ///
    /// Returns the interface error of sending the panel settings.
    pub fn set_power_mode(&mut self, mode: PowerMode) -> DisplayResult<I> {
        if let Err(e) = self.interface.set_bus_frequency(mode.bus_frequency()) {
            log::warn!(
                "display: {mode:?} unavailable ({e}), keeping {:?}",
                self.power_mode
            );
            return Ok(());
        }
        self.power_mode = mode;
        self.contrast = mode.profile().contrast;
        self.super_bright = false;
        self.send_profile()
    }

    /// Set pixel brightness in percent (0-100)
    ///
    /// Leaves super brightness. Before [`begin`](Self::begin) the value is
    /// stored and sent by it.
    ///
    /// # Errors
    ///
    /// Returns the interface error.
    pub fn set_brightness(&mut self, percent: u8) -> DisplayResult<I> {
        self.contrast = brightness_to_contrast(percent);
        if self.super_bright {
            self.super_bright = false;
            return self.send_profile();
        }
        if !self.ready {
            return Ok(());
        }
        self.send_commands(&[SET_CONTRAST, self.contrast])
    }

    /// Drive the panel past its documented maxima
    ///
    /// `false` restores the active power mode's profile. The panel may be
    /// unstable while this is on.
    ///
    /// # Errors
    ///
    /// Returns the interface error.
    pub fn super_brightness(&mut self, enabled: bool) -> DisplayResult<I> {
        self.super_bright = enabled;
        if !enabled {
            self.contrast = self.power_mode.profile().contrast;
        }
        self.send_profile()
    }

    fn drive_profile(&self) -> PowerProfile {
        let profile = self.power_mode.profile();
        if self.super_bright {
            PowerProfile {
                clock_ratio: profile.clock_ratio,
                ..SUPER_BRIGHT
            }
        } else {
            PowerProfile {
                contrast: self.contrast,
                ..profile
            }
        }
    }

    fn send_profile(&mut self) -> DisplayResult<I> {
        if !self.ready {
            return Ok(());
        }
        let profile = self.drive_profile();
        self.send_commands(&[
            SET_CLOCK_DIVIDE,
            profile.clock_ratio,
            CHARGE_PUMP,
            profile.charge_pump,
            SET_CONTRAST,
            profile.contrast,
            SET_PRECHARGE,
            profile.precharge,
            SET_VCOMH_DESELECT,
            profile.vcomh,
        ])
    }

    // Panel toggles

    /// Toggle between normal and inverted pixels
    ///
    /// # Errors
    ///
    /// Returns the interface error.
    pub fn invert_display(&mut self) -> DisplayResult<I> {
        if !self.ready_for("invert") {
            return Ok(());
        }
        let command = if self.inverted {
            NORMAL_DISPLAY
        } else {
            INVERT_DISPLAY
        };
        self.send_commands(&[command])?;
        self.inverted = !self.inverted;
        Ok(())
    }

    /// Whether the panel currently shows inverted pixels
    pub const fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Light every pixel regardless of RAM content
    ///
    /// # Errors
    ///
    /// Returns the interface error.
    pub fn entire_display_on(&mut self) -> DisplayResult<I> {
        if !self.ready_for("entire display on") {
            return Ok(());
        }
        self.send_commands(&[ENTIRE_DISPLAY_ON])
    }

    /// Show RAM content again after [`entire_display_on`](Self::entire_display_on)
    ///
    /// # Errors
    ///
    /// Returns the interface error.
    pub fn entire_display_off(&mut self) -> DisplayResult<I> {
        if !self.ready_for("entire display off") {
            return Ok(());
        }
        self.send_commands(&[RESUME_FROM_RAM])
    }

    /// Switch the panel on or off
    ///
    /// # Errors
    ///
    /// Returns the interface error.
    pub fn set_display_on(&mut self, on: bool) -> DisplayResult<I> {
        if !self.ready_for("display on/off") {
            return Ok(());
        }
        self.send_commands(&[if on { DISPLAY_ON } else { DISPLAY_OFF }])?;
        self.panel_off = !on;
        Ok(())
    }

    /// Initialize the panel with a caller-supplied command stream
    ///
    /// Replaces [`begin`](Self::begin) for panels that need a custom setup.
    /// On success the display counts as ready.
    ///
    /// # Errors
    ///
    /// Returns the interface error; the display stays not ready.
    pub fn manual_setup(&mut self, commands: &[u8]) -> DisplayResult<I> {
        self.ready = false;
        self.send_commands(commands)?;
        self.ready = true;
        self.panel_off = false;
        Ok(())
    }

    fn ready_for(&self, operation: &str) -> bool {
        if !self.ready {
            log::debug!("display: {operation} ignored before begin");
        }
        self.ready
    }

    fn send_commands(&mut self, commands: &[u8]) -> DisplayResult<I> {
        self.interface
            .send_commands(commands)
            .map_err(Error::Interface)
    }
}

impl<B> Display<I2cInterface<B>>
where
    B: I2c + BusClock,
{
    /// Create a display on a two-wire bus at the configured address
    pub fn with_i2c(bus: B, config: Config) -> Self {
        let address = config.address;
        Self::new(I2cInterface::new(bus, address), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::BusEngine;
    use crate::config::Builder;
    use crate::error::{BusError, NackPhase};
    use crate::mock::{MockSequencer, NoopDelay, ready_display, test_config, test_display};
    use alloc::vec;

    #[test]
    fn test_begin_sends_init_sequence() {
        let mut display = test_display();
        display.begin().unwrap();
        assert!(display.is_ready());
        assert_eq!(
            display.sequencer().commands(),
            vec![
                0xAE, 0xD5, 0x80, 0xA8, 0x3F, 0xD3, 0x00, 0x40, 0x8D, 0x14, 0x20, 0x00, 0xA1,
                0xC8, 0xDA, 0x12, 0x81, 0x7F, 0xD9, 0xF1, 0xDB, 0x20, 0xA4, 0xA6, 0x2E, 0xAF,
            ]
        );
        assert_eq!(display.sequencer().clock_hz, 200_000);
    }

    #[test]
    fn test_begin_rotated_display_uses_normal_scan() {
        let config = Builder::new()
            .dimensions(Dimensions::new(128, 32).unwrap())
            .rotation(Rotation::Rotate180)
            .build()
            .unwrap();
        let mut display = Display::with_i2c(BusEngine::new(MockSequencer::new(0x3C)), config);
        display.begin().unwrap();
        let commands = display.sequencer().commands();
        assert!(commands.windows(2).any(|w| w == [SEGMENT_REMAP_NORMAL, COM_SCAN_NORMAL]));
        assert!(commands.windows(2).any(|w| w == [SET_MULTIPLEX_RATIO, 31]));
        assert!(commands.windows(2).any(|w| w == [SET_COM_PINS, 0x02]));
    }

    #[test]
    fn test_flush_sets_window_and_streams_buffer() {
        let mut display = ready_display();
        display.frame_mut().draw_pixel(0, 0);
        display.frame_mut().draw_pixel(127, 63);
        display.flush().unwrap();

        assert_eq!(
            display.sequencer().commands(),
            vec![0x21, 0, 127, 0x22, 0, 7]
        );
        let data = display.sequencer().data();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].as_slice(), display.frame().as_bytes());
        assert_eq!(data[0][0], 0x01);
        assert_eq!(data[0][1023], 0x80);
    }

    #[test]
    fn test_flush_small_panel_window() {
        let mut display = Display::with_i2c(
            BusEngine::new(MockSequencer::new(0x3C)),
            test_config(128, 32),
        );
        display.flush().unwrap();
        let commands = display.sequencer().commands();
        assert!(commands.ends_with(&[0x21, 0, 127, 0x22, 0, 3]));
        assert_eq!(display.sequencer().data()[0].len(), 512);
    }

    #[test]
    fn test_flush_before_begin_initializes() {
        let mut display = test_display();
        display.flush().unwrap();
        assert!(display.is_ready());
        assert_eq!(display.sequencer().commands()[0], DISPLAY_OFF);
        assert_eq!(display.sequencer().data().len(), 1);
    }

    #[test]
    fn test_flush_error_carries_bus_fault() {
        let mut display = ready_display();
        display.sequencer_mut().present = false;
        let error = display.flush().unwrap_err();
        assert!(matches!(
            error,
            Error::Interface(BusError::Nack(NackPhase::Address))
        ));
        assert!(alloc::format!("{error:?}").contains("Nack(Address)"));
    }

    #[test]
    fn test_failed_begin_retried_by_flush() {
        let mut display = test_display();
        display.sequencer_mut().present = false;
        assert!(display.begin().is_err());
        assert!(!display.is_ready());

        // Drawing is still allowed
        display.print("ok", 0, 0);

        display.sequencer_mut().present = true;
        display.flush().unwrap();
        assert!(display.is_ready());
        assert_eq!(display.sequencer().data().len(), 1);
    }

    #[test]
    fn test_dropped_frame_keeps_buffer() {
        let mut display = ready_display();
        display.frame_mut().fill_rect(0, 0, 16, 16);
        let before = display.frame().as_bytes().to_vec();

        display.sequencer_mut().nack_data_at = Some(100);
        assert!(display.flush().is_err());
        assert_eq!(display.frame().as_bytes(), before.as_slice());

        display.sequencer_mut().nack_data_at = None;
        display.sequencer_mut().clear_log();
        display.flush().unwrap();
        assert_eq!(display.sequencer().data()[0], before);
    }

    #[test]
    fn test_clear_screen_with_refresh_sends_blank_frame() {
        let mut display = ready_display();
        display.frame_mut().fill_rect(0, 0, 128, 64);
        display.clear_screen(true).unwrap();
        let data = display.sequencer().data();
        assert_eq!(data.len(), 1);
        assert!(data[0].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_clear_screen_without_refresh_sends_nothing() {
        let mut display = ready_display();
        display.frame_mut().fill_rect(0, 0, 128, 64);
        display.clear_screen(false).unwrap();
        assert!(display.sequencer().transfers().is_empty());
        assert!(!display.frame().pixel(5, 5));
    }

    #[test]
    fn test_off_on_clear_switches_panel_off_until_flush() {
        let mut display = ready_display();
        display.set_off_on_clear(true);
        display.clear_screen(true).unwrap();
        assert_eq!(display.sequencer().commands()[0], DISPLAY_OFF);
        assert!(!display.sequencer().commands().contains(&DISPLAY_ON));

        display.sequencer_mut().clear_log();
        display.flush().unwrap();
        assert_eq!(display.sequencer().commands()[0], DISPLAY_ON);

        display.sequencer_mut().clear_log();
        display.flush().unwrap();
        assert!(!display.sequencer().commands().contains(&DISPLAY_ON));
    }

    #[test]
    fn test_clear_area_streams_sub_window() {
        let mut display = ready_display();
        display.frame_mut().fill_rect(0, 0, 128, 64);
        display.clear_area(10, 19, 2).unwrap();

        assert_eq!(
            display.sequencer().commands(),
            vec![0x21, 10, 19, 0x22, 2, 2]
        );
        assert_eq!(display.sequencer().data(), vec![vec![0u8; 10]]);
        assert!(!display.frame().pixel(15, 20));
        assert!(display.frame().pixel(15, 24));
    }

    #[test]
    fn test_clear_area_before_begin_is_local() {
        let mut display = test_display();
        display.frame_mut().fill_rect(0, 0, 128, 64);
        display.clear_area(0, 127, 0).unwrap();
        assert!(display.sequencer().events.is_empty());
        assert!(!display.frame().pixel(0, 0));
    }

    #[test]
    fn test_unsupported_power_mode_keeps_previous() {
        let mut display = ready_display();
        display.sequencer_mut().max_clock_hz = 400_000;

        display.set_power_mode(PowerMode::Turbo).unwrap();
        assert_eq!(display.power_mode(), PowerMode::Balanced);
        assert_eq!(display.sequencer().clock_hz, 200_000);
        assert!(display.sequencer().events.is_empty());
    }

    #[test]
    fn test_power_mode_sends_profile_when_ready() {
        let mut display = ready_display();
        display.set_power_mode(PowerMode::Performance).unwrap();
        assert_eq!(display.power_mode(), PowerMode::Performance);
        assert_eq!(display.sequencer().clock_hz, 400_000);
        assert_eq!(
            display.sequencer().commands(),
            vec![0xD5, 0xB0, 0x8D, 0x94, 0x81, 0xCF, 0xD9, 0xF1, 0xDB, 0x30]
        );
    }

    #[test]
    fn test_power_mode_before_begin_is_deferred() {
        let mut display = test_display();
        display.set_power_mode(PowerMode::LowPower).unwrap();
        assert!(display.sequencer().events.is_empty());

        display.begin().unwrap();
        let commands = display.sequencer().commands();
        assert!(commands.windows(2).any(|w| w == [SET_CONTRAST, 0x3F]));
        assert!(commands.windows(2).any(|w| w == [SET_PRECHARGE, 0x22]));
        assert_eq!(display.sequencer().clock_hz, 100_000);
    }

    #[test]
    fn test_begin_falls_back_when_configured_mode_unreachable() {
        let config = Builder::new()
            .dimensions(Dimensions::new(128, 64).unwrap())
            .power_mode(PowerMode::Turbo)
            .build()
            .unwrap();
        let mut sequencer = MockSequencer::new(0x3C);
        sequencer.max_clock_hz = 400_000;
        let mut display = Display::with_i2c(BusEngine::new(sequencer), config);

        display.begin().unwrap();
        assert_eq!(display.power_mode(), PowerMode::Balanced);
        assert_eq!(display.sequencer().clock_hz, 200_000);
    }

    #[test]
    fn test_set_brightness_scales_contrast() {
        let mut display = ready_display();
        display.set_brightness(50).unwrap();
        display.set_brightness(100).unwrap();
        assert_eq!(
            display.sequencer().commands(),
            vec![SET_CONTRAST, 127, SET_CONTRAST, 255]
        );
    }

    #[test]
    fn test_super_brightness_round_trip() {
        let mut display = ready_display();
        display.super_brightness(true).unwrap();
        assert_eq!(
            display.sequencer().commands(),
            vec![0xD5, 0x80, 0x8D, 0x95, 0x81, 0xFF, 0xD9, 0xFF, 0xDB, 0x40]
        );

        display.sequencer_mut().clear_log();
        display.super_brightness(false).unwrap();
        assert_eq!(
            display.sequencer().commands(),
            vec![0xD5, 0x80, 0x8D, 0x14, 0x81, 0x7F, 0xD9, 0xF1, 0xDB, 0x20]
        );
    }

    #[test]
    fn test_invert_display_toggles() {
        let mut display = ready_display();
        display.invert_display().unwrap();
        assert!(display.is_inverted());
        display.invert_display().unwrap();
        assert!(!display.is_inverted());
        assert_eq!(
            display.sequencer().commands(),
            vec![INVERT_DISPLAY, NORMAL_DISPLAY]
        );
    }

    #[test]
    fn test_panel_toggles_before_begin_are_ignored() {
        let mut display = test_display();
        display.invert_display().unwrap();
        display.entire_display_on().unwrap();
        display.set_display_on(false).unwrap();
        assert!(!display.is_inverted());
        assert!(display.sequencer().events.is_empty());
    }

    #[test]
    fn test_entire_display_on_and_off() {
        let mut display = ready_display();
        display.entire_display_on().unwrap();
        display.entire_display_off().unwrap();
        assert_eq!(
            display.sequencer().commands(),
            vec![ENTIRE_DISPLAY_ON, RESUME_FROM_RAM]
        );
    }

    #[test]
    fn test_manual_setup_marks_ready() {
        let mut display = test_display();
        display.manual_setup(&[0xAE, 0x8D, 0x14, 0xAF]).unwrap();
        assert!(display.is_ready());
        assert_eq!(display.sequencer().commands(), vec![0xAE, 0x8D, 0x14, 0xAF]);
    }

    #[test]
    fn test_print_c_clears_first() {
        let mut display = ready_display();
        display.frame_mut().fill_rect(0, 0, 128, 64);
        display.print_c("A", 0, 0);
        assert!(!display.frame().pixel(100, 40));
        assert!(display.frame().pixel(0, 1));
    }

    #[test]
    fn test_print_animated_flushes_per_character() {
        let mut display = ready_display();
        display
            .print_animated("abc", 0, 0, &mut NoopDelay, 10, false)
            .unwrap();
        assert_eq!(display.sequencer().data().len(), 3);
    }

    #[test]
    fn test_print_animated_stops_on_failure() {
        let mut display = ready_display();
        display.sequencer_mut().present = false;
        assert!(
            display
                .print_animated("abc", 0, 0, &mut NoopDelay, 10, false)
                .is_err()
        );
        assert!(display.sequencer().data().is_empty());
    }

    #[test]
    fn test_custom_font_swap() {
        static BLOCK: [[u8; 5]; 1] = [[0xFF; 5]];
        static BLOCK_FONT: Font<'static> = Font::new(&BLOCK, b'#');

        let mut display = ready_display();
        display.set_font(&BLOCK_FONT);
        display.print("#", 0, 0);
        assert_eq!(&display.frame().as_bytes()[..5], &[0xFF; 5]);

        display.clear_custom_font();
        assert_eq!(display.font(), &DEFAULT_FONT);
    }

    #[test]
    fn test_draw_bitmap() {
        let mut display = ready_display();
        let data = [0xF0, 0xF0];
        let bitmap = Bitmap::new(&data, 4, 2).unwrap();
        display.draw(&bitmap, 2, 3);
        assert!(display.frame().pixel(2, 3));
        assert!(display.frame().pixel(5, 4));
        assert!(!display.frame().pixel(6, 4));
    }
}
