//! Scripted stand-ins for the panel's SPI bus, pins and clock
//!
//! All fakes share one [`Bus`] that records what the panel would have seen.
//! The bus also plays a strict controller: data transmission and refresh
//! commands are refused until a resolution setting has been received since
//! the last reset or deep sleep.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, Operation, SpiDevice};

use kitchenthing::{PanelConfig, PanelSession};

/// Something the panel observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One framed byte with DC low
    Cmd(u8),
    /// One framed burst with DC high
    Data(Vec<u8>),
    /// Reset line level
    Reset(bool),
    /// Blocking wait
    DelayMs(u32),
    /// Command refused by the controller
    Rejected(u8),
}

#[derive(Debug, Default)]
pub struct Bus {
    pub events: Vec<Event>,
    dc: bool,
    last_cmd: Option<u8>,
    configured: bool,
    /// Busy line readings, consumed front to back
    pub busy: VecDeque<bool>,
    /// Busy reading once the script runs out
    pub busy_idle: bool,
    /// Every SPI write fails
    pub fail_writes: bool,
    /// Every output pin write fails
    pub fail_pins: bool,
    /// Every busy line read fails
    pub fail_busy: bool,
}

impl Bus {
    /// Command and data bursts only, in order
    pub fn wire(&self) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Cmd(_) | Event::Data(_)))
            .cloned()
            .collect()
    }

    pub fn commands(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Cmd(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    pub fn count_cmd(&self, cmd: u8) -> usize {
        self.commands().iter().filter(|&&c| c == cmd).count()
    }

    /// Data bursts that directly follow `cmd`, for its last occurrence
    pub fn bursts_after(&self, cmd: u8) -> Vec<Vec<u8>> {
        let start = self
            .events
            .iter()
            .rposition(|e| *e == Event::Cmd(cmd))
            .map(|i| i + 1)
            .unwrap_or(self.events.len());
        self.events[start..]
            .iter()
            .take_while(|e| !matches!(e, Event::Cmd(_)))
            .filter_map(|e| match e {
                Event::Data(d) => Some(d.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::DelayMs(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), spi::ErrorKind> {
        if self.fail_writes {
            return Err(spi::ErrorKind::Other);
        }
        if self.dc {
            self.events.push(Event::Data(bytes.to_vec()));
            if self.last_cmd == Some(0x61) {
                self.configured = true;
            }
            return Ok(());
        }
        for &cmd in bytes {
            if matches!(cmd, 0x10 | 0x13 | 0x12) && !self.configured {
                self.events.push(Event::Rejected(cmd));
                return Err(spi::ErrorKind::Other);
            }
            if cmd == 0x07 {
                self.configured = false;
            }
            self.last_cmd = Some(cmd);
            self.events.push(Event::Cmd(cmd));
        }
        Ok(())
    }
}

pub type Shared = Rc<RefCell<Bus>>;

pub struct FakeSpi(pub Shared);
pub struct FakeDc(pub Shared);
pub struct FakeRst(pub Shared);
pub struct FakeBusy(pub Shared);
pub struct FakeDelay(pub Shared);

impl spi::ErrorType for FakeSpi {
    type Error = spi::ErrorKind;
}

impl SpiDevice for FakeSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut burst = Vec::new();
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => burst.extend_from_slice(bytes),
                Operation::Read(buf) => buf.fill(0),
                Operation::Transfer(read, write) => {
                    burst.extend_from_slice(write);
                    read.fill(0);
                }
                Operation::TransferInPlace(buf) => {
                    burst.extend_from_slice(buf);
                    buf.fill(0);
                }
                Operation::DelayNs(_) => {}
            }
        }
        self.0.borrow_mut().write(&burst)
    }
}

impl digital::ErrorType for FakeDc {
    type Error = digital::ErrorKind;
}

impl OutputPin for FakeDc {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut bus = self.0.borrow_mut();
        if bus.fail_pins {
            return Err(digital::ErrorKind::Other);
        }
        bus.dc = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut bus = self.0.borrow_mut();
        if bus.fail_pins {
            return Err(digital::ErrorKind::Other);
        }
        bus.dc = true;
        Ok(())
    }
}

impl digital::ErrorType for FakeRst {
    type Error = digital::ErrorKind;
}

impl FakeRst {
    fn level(&mut self, high: bool) -> Result<(), digital::ErrorKind> {
        let mut bus = self.0.borrow_mut();
        if bus.fail_pins {
            return Err(digital::ErrorKind::Other);
        }
        if !high {
            bus.configured = false;
        }
        bus.events.push(Event::Reset(high));
        Ok(())
    }
}

impl OutputPin for FakeRst {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level(true)
    }
}

impl digital::ErrorType for FakeBusy {
    type Error = digital::ErrorKind;
}

impl InputPin for FakeBusy {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut bus = self.0.borrow_mut();
        if bus.fail_busy {
            return Err(digital::ErrorKind::Other);
        }
        let idle = bus.busy_idle;
        Ok(bus.busy.pop_front().unwrap_or(idle))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().events.push(Event::DelayMs(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().events.push(Event::DelayMs(ms));
    }
}

pub type FakePanel = PanelSession<FakeSpi, FakeBusy, FakeDc, FakeRst, FakeDelay>;

/// Small panel with a short busy-wait bound
pub fn small_config() -> PanelConfig {
    PanelConfig {
        max_busy_polls: 10,
        ..PanelConfig::with_size(64, 16)
    }
}

/// Session over a fresh bus whose busy line is idle unless scripted
pub fn panel(config: PanelConfig) -> (FakePanel, Shared) {
    let bus: Shared = Rc::new(RefCell::new(Bus {
        busy_idle: true,
        ..Bus::default()
    }));
    let session = PanelSession::new(
        FakeSpi(bus.clone()),
        FakeBusy(bus.clone()),
        FakeDc(bus.clone()),
        FakeRst(bus.clone()),
        FakeDelay(bus.clone()),
        config,
    )
    .expect("aligned test panel");
    (session, bus)
}

/// Session that has been opened and initialized, with the bus log cleared
pub fn ready_panel(config: PanelConfig) -> (FakePanel, Shared) {
    let (mut session, bus) = panel(config);
    session.open().unwrap();
    session.init().unwrap();
    bus.borrow_mut().clear();
    (session, bus)
}
