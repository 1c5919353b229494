//! Test doubles shared by the unit tests

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::bus::{BusEngine, Condition, Sequencer};
use crate::command::{CONTROL_COMMAND, CONTROL_DATA};
use crate::config::{Builder, Config, Dimensions};
use crate::display::Display;
use crate::interface::I2cInterface;

/// Observable bus activity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusEvent {
    Start,
    RepeatedStart,
    Stop,
    /// Byte written by the controller (address or data)
    Byte(u8),
    /// Byte clocked in from the target, with the acknowledgment sent back
    Read { nak: bool },
}

/// Sequencer with a single target device behind it
#[derive(Debug)]
pub struct MockSequencer {
    pub address: u8,
    pub events: Vec<BusEvent>,
    /// Target answers its address
    pub present: bool,
    /// Refuse the data byte at this index of every transfer
    pub nack_data_at: Option<usize>,
    /// Transmit queue accepts frames
    pub accept_frames: bool,
    pub push_attempts: u32,
    /// Bytes the target returns on reads
    pub read_data: VecDeque<u8>,
    pub max_clock_hz: u32,
    pub clock_hz: u32,
    pub rx_enabled: bool,
    fault: bool,
    expect_address: bool,
    reading: bool,
    data_index: usize,
    rx: VecDeque<u8>,
}

impl MockSequencer {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            events: Vec::new(),
            present: true,
            nack_data_at: None,
            accept_frames: true,
            push_attempts: 0,
            read_data: VecDeque::new(),
            max_clock_hz: 1_000_000,
            clock_hz: 100_000,
            rx_enabled: false,
            fault: false,
            expect_address: false,
            reading: false,
            data_index: 0,
            rx: VecDeque::new(),
        }
    }

    /// Data bytes written, address bytes excluded
    pub fn written(&self) -> Vec<u8> {
        self.transfers().into_iter().flatten().collect()
    }

    /// Payload of every write transfer, control byte first
    pub fn transfers(&self) -> Vec<Vec<u8>> {
        let mut transfers = Vec::new();
        let mut current: Option<Vec<u8>> = None;
        let mut after_start = false;
        for event in &self.events {
            match *event {
                BusEvent::Start | BusEvent::RepeatedStart => {
                    if let Some(done) = current.take() {
                        transfers.push(done);
                    }
                    after_start = true;
                }
                BusEvent::Byte(byte) if after_start => {
                    after_start = false;
                    if byte & 1 == 0 {
                        current = Some(Vec::new());
                    }
                }
                BusEvent::Byte(byte) => {
                    if let Some(bytes) = current.as_mut() {
                        bytes.push(byte);
                    }
                }
                BusEvent::Stop => {
                    if let Some(done) = current.take() {
                        transfers.push(done);
                    }
                }
                BusEvent::Read { .. } => {}
            }
        }
        if let Some(done) = current {
            transfers.push(done);
        }
        transfers
    }

    /// Command bytes of every command transfer, concatenated
    pub fn commands(&self) -> Vec<u8> {
        self.transfers()
            .into_iter()
            .filter(|t| t.first() == Some(&CONTROL_COMMAND))
            .flat_map(|t| t.into_iter().skip(1))
            .collect()
    }

    /// Payload of every data transfer
    pub fn data(&self) -> Vec<Vec<u8>> {
        self.transfers()
            .into_iter()
            .filter(|t| t.first() == Some(&CONTROL_DATA))
            .map(|t| t[1..].to_vec())
            .collect()
    }

    pub fn clear_log(&mut self) {
        self.events.clear();
    }
}

impl Sequencer for MockSequencer {
    fn emit(&mut self, condition: Condition) {
        match condition {
            Condition::Start => {
                self.events.push(BusEvent::Start);
                self.expect_address = true;
            }
            Condition::RepeatedStart => {
                self.events.push(BusEvent::RepeatedStart);
                self.expect_address = true;
            }
            Condition::Stop => {
                self.events.push(BusEvent::Stop);
                self.expect_address = false;
            }
        }
    }

    fn try_push(&mut self, frame: u16) -> bool {
        self.push_attempts += 1;
        if !self.accept_frames {
            return false;
        }
        let byte = (frame >> 1) as u8;
        let nak = frame & 1 == 1;

        if self.expect_address {
            self.expect_address = false;
            self.events.push(BusEvent::Byte(byte));
            if !self.present || byte >> 1 != self.address {
                self.fault = true;
            }
            self.reading = byte & 1 == 1;
            self.data_index = 0;
        } else if self.reading {
            self.events.push(BusEvent::Read { nak });
            if let Some(reply) = self.read_data.pop_front() {
                self.rx.push_back(reply);
            }
        } else {
            self.events.push(BusEvent::Byte(byte));
            if self.nack_data_at == Some(self.data_index) {
                self.fault = true;
            }
            self.data_index += 1;
        }
        true
    }

    fn try_pop(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn is_idle(&self) -> bool {
        true
    }

    fn fault_raised(&self) -> bool {
        self.fault
    }

    fn clear_fault(&mut self) {
        self.fault = false;
        self.expect_address = false;
        self.rx.clear();
    }

    fn set_rx_enabled(&mut self, enabled: bool) {
        self.rx_enabled = enabled;
    }

    fn set_clock_hz(&mut self, hz: u32) -> bool {
        if hz > self.max_clock_hz {
            return false;
        }
        self.clock_hz = hz;
        true
    }
}

pub type MockDisplay = Display<I2cInterface<BusEngine<MockSequencer>>>;

pub fn test_config(width: u8, height: u8) -> Config {
    Builder::new()
        .dimensions(Dimensions::new(width, height).unwrap())
        .build()
        .unwrap()
}

/// 128x64 display on a mock bus, not yet initialized
pub fn test_display() -> MockDisplay {
    Display::with_i2c(BusEngine::new(MockSequencer::new(0x3C)), test_config(128, 64))
}

/// 128x64 display after a successful `begin`, bus log cleared
pub fn ready_display() -> MockDisplay {
    let mut display = test_display();
    display.begin().unwrap();
    display.sequencer_mut().clear_log();
    display
}

impl MockDisplay {
    pub fn sequencer(&self) -> &MockSequencer {
        self.interface().bus().sequencer()
    }

    pub fn sequencer_mut(&mut self) -> &mut MockSequencer {
        self.interface_mut().bus_mut().sequencer_mut()
    }
}

pub struct NoopDelay;

impl embedded_hal::delay::DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
