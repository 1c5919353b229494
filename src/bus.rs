//! Two-wire bus transaction engine
//!
//! This module drives a programmable sequencer (for example an RP2040 PIO
//! state machine running an I2C micro-program) to perform bus transactions
//! without a dedicated bus peripheral. The bit-level signal toggling lives in
//! the sequencer program and is reached through the [`Sequencer`] trait; the
//! [`BusEngine`] adds framing, acknowledgment checking, a sticky error state
//! and bounded blocking transfers on top of it.
//!
//! ## Transaction States
//!
//! ```text
//! Idle -> Start -> Address -> Data ... [-> RepeatedStart -> Address -> Data ...] -> (stop) Idle
//!   any state -> Error  (missing ACK, stalled sequencer, out-of-sequence operation)
//!   Error -> Idle       (resume_after_error only)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ssd1306_pio::bus::{BusEngine, Condition, Sequencer};
//!
//! /// Sequencer whose target acknowledges everything
//! struct Loopback;
//! impl Sequencer for Loopback {
//!     fn emit(&mut self, _condition: Condition) {}
//!     fn try_push(&mut self, _frame: u16) -> bool { true }
//!     fn try_pop(&mut self) -> Option<u8> { Some(0xA5) }
//!     fn is_idle(&self) -> bool { true }
//!     fn fault_raised(&self) -> bool { false }
//!     fn clear_fault(&mut self) {}
//!     fn set_rx_enabled(&mut self, _enabled: bool) {}
//!     fn set_clock_hz(&mut self, _hz: u32) -> bool { true }
//! }
//!
//! let mut bus = BusEngine::new(Loopback);
//! assert_eq!(bus.write_blocking(0x3C, &[0x00, 0xAF]), Ok(2));
//!
//! let mut reply = [0u8; 2];
//! assert_eq!(bus.read_blocking(0x3C, &mut reply), Ok(2));
//! assert_eq!(reply, [0xA5, 0xA5]);
//! ```

use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};

use crate::error::{BusError, NackPhase, UnsupportedFrequency};

/// Default number of polling attempts before a transfer counts as stalled
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// Bus clock used until [`BusClock::set_frequency`] is called (standard mode)
pub const DEFAULT_FREQUENCY_HZ: u32 = 100_000;

/// Bit position of the data byte inside a sequencer frame word
pub const FRAME_DATA_LSB: u16 = 1;

/// Bit position of the NAK flag inside a sequencer frame word
///
/// For writes the flag is set so the sequencer releases the data line during
/// the acknowledge slot and samples the target's answer. For reads it is the
/// acknowledgment the controller sends back (set = NAK, end of read).
pub const FRAME_NAK_LSB: u16 = 0;

/// Bus framing conditions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    /// SDA falls while SCL is high
    Start,
    /// Start issued while the bus is still held
    RepeatedStart,
    /// SDA rises while SCL is high
    Stop,
}

/// Transfer direction carried in the address byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Controller writes to the target (R/W bit 0)
    Write,
    /// Controller reads from the target (R/W bit 1)
    Read,
}

impl Direction {
    const fn bit(self) -> u8 {
        match self {
            Self::Write => 0,
            Self::Read => 1,
        }
    }
}

/// Acknowledgment the controller returns for a received byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acknowledge {
    /// Request another byte
    Ack,
    /// Signal the end of the read
    Nack,
}

/// Engine transaction state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BusState {
    /// Bus released
    #[default]
    Idle,
    /// Start issued, address pending
    Start,
    /// Address acknowledged
    Address,
    /// At least one data byte transferred
    Data,
    /// Repeated start issued, address pending
    RepeatedStart,
    /// Sticky fault, cleared only by [`BusEngine::resume_after_error`]
    Error,
}

/// Programmable sequencer running the bus micro-program
///
/// Implementations wrap the hardware state machine: its transmit and receive
/// queues, its fault interrupt flag and its clock divider. The engine never
/// toggles lines itself.
pub trait Sequencer {
    /// Queue a framing condition
    fn emit(&mut self, condition: Condition);

    /// Queue one frame word (`byte << FRAME_DATA_LSB | nak << FRAME_NAK_LSB`)
    ///
    /// Returns `false` without queuing when the transmit queue is full.
    fn try_push(&mut self, frame: u16) -> bool;

    /// Take one received byte, if any
    fn try_pop(&mut self) -> Option<u8>;

    /// Whether every queued frame has been clocked out
    fn is_idle(&self) -> bool;

    /// Whether the program flagged a missing acknowledgment
    fn fault_raised(&self) -> bool;

    /// Drain the queues, restart the program and clear the fault flag
    fn clear_fault(&mut self);

    /// Enable or disable pushing of sampled bytes into the receive queue
    fn set_rx_enabled(&mut self, enabled: bool);

    /// Retime the program for the given bus clock
    ///
    /// Returns `false` and keeps the current timing if the clock is out of reach.
    fn set_clock_hz(&mut self, hz: u32) -> bool;
}

/// Bus clock selection
///
/// Implemented by [`BusEngine`]; the display interface uses it to apply
/// power-mode clock speeds.
pub trait BusClock {
    /// Switch the bus clock
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFrequency`] if the clock cannot be produced; the
    /// previous clock stays in effect.
    fn set_frequency(&mut self, hz: u32) -> Result<(), UnsupportedFrequency>;

    /// Currently active bus clock in Hz
    fn frequency(&self) -> u32;
}

/// Sequencer-driven two-wire bus controller
///
/// Not reentrant: every operation takes `&mut self`.
#[derive(Debug)]
pub struct BusEngine<S> {
    /// Sequencer running the bus program
    sequencer: S,
    /// Current transaction state
    state: BusState,
    /// Direction selected by the last address byte
    direction: Direction,
    /// Whether a start was issued without a matching stop
    bus_held: bool,
    /// Polling budget for each frame
    max_attempts: u32,
    /// Active bus clock in Hz
    frequency_hz: u32,
}

impl<S: Sequencer> BusEngine<S> {
    /// Create a new engine around a sequencer already loaded with the bus program
    pub const fn new(sequencer: S) -> Self {
        Self {
            sequencer,
            state: BusState::Idle,
            direction: Direction::Write,
            bus_held: false,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
        }
    }

    /// Set the polling budget per frame
    ///
    /// A frame that is not accepted and clocked out within this many polls
    /// fails with [`BusError::Stalled`]. Values below 1 are raised to 1.
    pub fn set_max_attempts(&mut self, attempts: u32) -> &mut Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Get the polling budget per frame
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Current transaction state
    pub const fn state(&self) -> BusState {
        self.state
    }

    /// Access the sequencer
    pub const fn sequencer(&self) -> &S {
        &self.sequencer
    }

    /// Access the sequencer mutably
    pub const fn sequencer_mut(&mut self) -> &mut S {
        &mut self.sequencer
    }

    /// Release the sequencer
    pub fn release(self) -> S {
        self.sequencer
    }

    /// Issue a start condition
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Faulted`] while a fault is pending and
    /// [`BusError::Protocol`] if a transaction is already open.
    pub fn start(&mut self) -> Result<(), BusError> {
        self.ensure_usable()?;
        if self.state != BusState::Idle {
            return Err(self.fail(BusError::Protocol));
        }
        self.sequencer.set_rx_enabled(false);
        self.sequencer.emit(Condition::Start);
        self.bus_held = true;
        self.state = BusState::Start;
        Ok(())
    }

    /// Issue a repeated start, keeping the bus
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Faulted`] while a fault is pending and
    /// [`BusError::Protocol`] if no address phase has completed yet.
    pub fn repeated_start(&mut self) -> Result<(), BusError> {
        self.ensure_usable()?;
        if !matches!(self.state, BusState::Address | BusState::Data) {
            return Err(self.fail(BusError::Protocol));
        }
        self.sequencer.set_rx_enabled(false);
        self.sequencer.emit(Condition::RepeatedStart);
        self.state = BusState::RepeatedStart;
        Ok(())
    }

    /// Issue a stop condition and release the bus
    ///
    /// Always allowed. A pending fault stays pending.
    pub fn stop(&mut self) {
        if self.bus_held {
            self.sequencer.set_rx_enabled(false);
            self.sequencer.emit(Condition::Stop);
            self.bus_held = false;
        }
        if self.state != BusState::Error {
            self.state = BusState::Idle;
        }
    }

    /// Poll the sticky fault flag without blocking
    pub fn check_error(&self) -> bool {
        self.state == BusState::Error || self.sequencer.fault_raised()
    }

    /// Clear a detected fault and resynchronize the sequencer
    ///
    /// Call exactly once per detected fault; until then every transaction is
    /// refused with [`BusError::Faulted`]. Releases the bus if a failed
    /// transfer left it held.
    pub fn resume_after_error(&mut self) {
        log::debug!("bus: resuming after error");
        self.sequencer.clear_fault();
        if self.bus_held {
            self.sequencer.emit(Condition::Stop);
            self.bus_held = false;
        }
        self.state = BusState::Idle;
    }

    /// Transmit one byte and require an acknowledgment
    ///
    /// Directly after a start or repeated start the byte is the address byte
    /// (`address << 1 | rw`) and selects the transfer direction.
    ///
    /// # Errors
    ///
    /// - [`BusError::Nack`] if the target did not acknowledge
    /// - [`BusError::Stalled`] if the sequencer did not accept or clock out
    ///   the frame within the attempt budget
    /// - [`BusError::Protocol`] outside an open write transaction
    /// - [`BusError::Faulted`] while a fault is pending
    pub fn put_or_fail(&mut self, byte: u8) -> Result<(), BusError> {
        self.ensure_usable()?;
        let phase = match self.state {
            BusState::Start | BusState::RepeatedStart => NackPhase::Address,
            BusState::Address | BusState::Data if self.direction == Direction::Write => {
                NackPhase::Data
            }
            _ => return Err(self.fail(BusError::Protocol)),
        };

        let frame = (u16::from(byte) << FRAME_DATA_LSB) | (1 << FRAME_NAK_LSB);
        self.push_frame(frame, phase)?;
        self.wait_idle(phase)?;

        if phase == NackPhase::Address {
            self.direction = if byte & 1 == 1 {
                Direction::Read
            } else {
                Direction::Write
            };
            self.sequencer
                .set_rx_enabled(self.direction == Direction::Read);
            self.state = BusState::Address;
        } else {
            self.state = BusState::Data;
        }
        Ok(())
    }

    /// Transmit the 7-bit address with its direction bit
    ///
    /// # Errors
    ///
    /// See [`put_or_fail`](Self::put_or_fail).
    pub fn put_address(&mut self, address: u8, direction: Direction) -> Result<(), BusError> {
        if !matches!(self.state, BusState::Start | BusState::RepeatedStart) {
            self.ensure_usable()?;
            return Err(self.fail(BusError::Protocol));
        }
        self.put_or_fail((address << 1) | direction.bit())
    }

    /// Receive one byte
    ///
    /// `ack` is returned to the target: [`Acknowledge::Ack`] to continue,
    /// [`Acknowledge::Nack`] for the last byte of the read.
    ///
    /// # Errors
    ///
    /// - [`BusError::Stalled`] if no byte arrived within the attempt budget
    /// - [`BusError::Protocol`] outside an open read transaction
    /// - [`BusError::Faulted`] while a fault is pending
    pub fn get(&mut self, ack: Acknowledge) -> Result<u8, BusError> {
        self.ensure_usable()?;
        if !matches!(self.state, BusState::Address | BusState::Data)
            || self.direction != Direction::Read
        {
            return Err(self.fail(BusError::Protocol));
        }

        let nak = u16::from(ack == Acknowledge::Nack);
        let frame = (0xFF << FRAME_DATA_LSB) | (nak << FRAME_NAK_LSB);
        self.push_frame(frame, NackPhase::Data)?;

        for _ in 0..self.max_attempts {
            if let Some(byte) = self.sequencer.try_pop() {
                self.state = BusState::Data;
                return Ok(byte);
            }
        }
        Err(self.fail(BusError::Stalled))
    }

    /// Write `bytes` to the target in one transaction
    ///
    /// start, address + W, each byte, stop. The first unacknowledged byte
    /// aborts the rest of the transfer.
    ///
    /// Returns the number of bytes acknowledged, which is less than
    /// `bytes.len()` when a data byte was refused. The fault stays pending in
    /// that case.
    ///
    /// # Errors
    ///
    /// Fails without a count when the engine is faulted, the address is not
    /// acknowledged or the sequencer stalls on the address.
    pub fn write_blocking(&mut self, address: u8, bytes: &[u8]) -> Result<usize, BusError> {
        self.start()?;
        if let Err(e) = self.put_address(address, Direction::Write) {
            self.stop();
            return Err(e);
        }

        let mut sent = 0;
        for &byte in bytes {
            if let Err(e) = self.put_or_fail(byte) {
                log::warn!("bus: write to {address:#04x} aborted after {sent} bytes: {e}");
                break;
            }
            sent += 1;
        }
        self.stop();
        Ok(sent)
    }

    /// Read `buffer.len()` bytes from the target in one transaction
    ///
    /// start, address + R, one `get` per byte acknowledging all but the
    /// last, stop.
    ///
    /// Returns the number of bytes received.
    ///
    /// # Errors
    ///
    /// Fails without a count when the engine is faulted, the address is not
    /// acknowledged or the sequencer stalls on the address.
    pub fn read_blocking(&mut self, address: u8, buffer: &mut [u8]) -> Result<usize, BusError> {
        self.start()?;
        if let Err(e) = self.put_address(address, Direction::Read) {
            self.stop();
            return Err(e);
        }

        let last = buffer.len().saturating_sub(1);
        let mut received = 0;
        for (index, slot) in buffer.iter_mut().enumerate() {
            let ack = if index == last {
                Acknowledge::Nack
            } else {
                Acknowledge::Ack
            };
            match self.get(ack) {
                Ok(byte) => *slot = byte,
                Err(e) => {
                    log::warn!("bus: read from {address:#04x} aborted after {received} bytes: {e}");
                    break;
                }
            }
            received += 1;
        }
        self.stop();
        Ok(received)
    }

    fn ensure_usable(&self) -> Result<(), BusError> {
        if self.check_error() {
            return Err(BusError::Faulted);
        }
        Ok(())
    }

    fn fail(&mut self, error: BusError) -> BusError {
        self.state = BusState::Error;
        error
    }

    fn push_frame(&mut self, frame: u16, phase: NackPhase) -> Result<(), BusError> {
        for _ in 0..self.max_attempts {
            if self.sequencer.fault_raised() {
                return Err(self.fail(BusError::Nack(phase)));
            }
            if self.sequencer.try_push(frame) {
                return Ok(());
            }
        }
        Err(self.fail(BusError::Stalled))
    }

    fn wait_idle(&mut self, phase: NackPhase) -> Result<(), BusError> {
        for _ in 0..self.max_attempts {
            if self.sequencer.fault_raised() {
                return Err(self.fail(BusError::Nack(phase)));
            }
            if self.sequencer.is_idle() {
                return Ok(());
            }
        }
        Err(self.fail(BusError::Stalled))
    }

    /// Run embedded-hal operations as one transaction
    fn run_operations(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), BusError> {
        if operations.is_empty() {
            return self.write_blocking(address, &[]).map(|_| ());
        }

        self.start()?;
        let mut previous: Option<Direction> = None;
        let count = operations.len();
        for index in 0..count {
            let direction = match operations[index] {
                Operation::Write(_) => Direction::Write,
                Operation::Read(_) => Direction::Read,
            };
            if previous != Some(direction) {
                if previous.is_some() {
                    self.repeated_start()?;
                }
                self.put_address(address, direction)?;
            }
            // The final byte of a read run is NACKed before a stop or a
            // direction change.
            let run_ends = operations
                .get(index + 1)
                .is_none_or(|next| !matches!(next, Operation::Read(_)));

            match &mut operations[index] {
                Operation::Write(bytes) => {
                    for &byte in bytes.iter() {
                        self.put_or_fail(byte)?;
                    }
                }
                Operation::Read(buffer) => {
                    let last = buffer.len().saturating_sub(1);
                    for (position, slot) in buffer.iter_mut().enumerate() {
                        let ack = if run_ends && position == last {
                            Acknowledge::Nack
                        } else {
                            Acknowledge::Ack
                        };
                        *slot = self.get(ack)?;
                    }
                }
            }
            previous = Some(direction);
        }
        self.stop();
        Ok(())
    }
}

impl<S: Sequencer> BusClock for BusEngine<S> {
    fn set_frequency(&mut self, hz: u32) -> Result<(), UnsupportedFrequency> {
        if hz == 0 || !self.sequencer.set_clock_hz(hz) {
            log::warn!("bus: {hz} Hz not supported, keeping {} Hz", self.frequency_hz);
            return Err(UnsupportedFrequency(hz));
        }
        log::debug!("bus: clock set to {hz} Hz");
        self.frequency_hz = hz;
        Ok(())
    }

    fn frequency(&self) -> u32 {
        self.frequency_hz
    }
}

impl<S: Sequencer> ErrorType for BusEngine<S> {
    type Error = BusError;
}

/// embedded-hal access to the engine
///
/// Unlike the raw operations, a failed transaction is recovered (stop issued,
/// fault cleared) before the error is returned, so the next call starts from
/// a usable bus.
impl<S: Sequencer> I2c<SevenBitAddress> for BusEngine<S> {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let result = self.run_operations(address, operations);
        if let Err(e) = result {
            self.stop();
            if self.check_error() {
                self.resume_after_error();
            }
            return Err(e);
        }
        Ok(())
    }
}
