//! Fakes for the bus, the delay and the display, shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::display::CharDisplay;

/// Address that didn't ack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nack(pub u8);

impl embedded_hal::i2c::Error for Nack {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
    }
}

/// I2C bus with a fixed set of devices that records every write.
pub struct FakeBus {
    devices: Vec<u8>,
    pub attempts: Vec<u8>,
    pub writes: Vec<(u8, Vec<u8>)>,
}

impl FakeBus {
    pub fn with_devices(devices: &[u8]) -> Self {
        Self {
            devices: devices.to_vec(),
            attempts: Vec::new(),
            writes: Vec::new(),
        }
    }
}

impl ErrorType for FakeBus {
    type Error = Nack;
}

impl I2c for FakeBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.attempts.push(address);
        if !self.devices.contains(&address) {
            return Err(Nack(address));
        }
        for op in operations {
            match op {
                Operation::Write(data) => self.writes.push((address, data.to_vec())),
                Operation::Read(buf) => buf.fill(0xff),
            }
        }
        Ok(())
    }
}

/// Decode the bytes an HD44780 latched from PCF8574 port writes
/// (RS P0, E P2, D4-D7 P4-P7), skipping the four init nibbles.
pub fn lcd_bytes(writes: &[(u8, Vec<u8>)]) -> Vec<(bool, u8)> {
    let nibbles: Vec<(bool, u8)> = writes
        .iter()
        .flat_map(|(_, data)| data.iter().copied())
        .filter(|port| port & 0x04 != 0)
        .map(|port| (port & 0x01 != 0, port >> 4))
        .collect();
    nibbles
        .get(4..)
        .unwrap_or_default()
        .chunks_exact(2)
        .map(|pair| (pair[0].0, (pair[0].1 << 4) | pair[1].1))
        .collect()
}

/// Delay that only remembers what it was asked for.
#[derive(Default)]
pub struct RecordingDelay {
    pub pauses_ms: Vec<u32>,
    pub total_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.pauses_ms.push(ms);
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}

/// Everything the orchestration did, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Begin(u8, u8),
    SetCursor(u8, u8),
    Message(String),
    Clear,
    Home,
    ScrollLeft,
    ScrollRight,
    CursorLeft,
    CursorRight,
    Autoscroll(bool),
    LeftToRight(bool),
    CursorVisible(bool),
    Blink(bool),
    Display(bool),
    Backlight(bool),
    CreateChar(u8, [u8; 8]),
    WriteByte(u8),
    Pause(u32),
}

/// Display command refused by [`RecordingDisplay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFault;

/// Shared log for a [`RecordingDisplay`] and its [`LoggedDelay`]s.
#[derive(Default, Clone)]
pub struct Recorder {
    log: Rc<RefCell<Vec<Event>>>,
}

impl Recorder {
    /// Display that already reports 20x4 geometry.
    pub fn display(&self) -> RecordingDisplay {
        self.display_with(20, 4)
    }

    pub fn display_with(&self, columns: u8, rows: u8) -> RecordingDisplay {
        RecordingDisplay {
            log: Rc::clone(&self.log),
            columns,
            rows,
            fail_after: None,
            calls: 0,
        }
    }

    pub fn delay(&self) -> LoggedDelay {
        LoggedDelay {
            log: Rc::clone(&self.log),
            cancel: None,
        }
    }

    /// Delay that raises `flag` once it has paused `after` times.
    pub fn cancelling_delay(&self, flag: Arc<AtomicBool>, after: usize) -> LoggedDelay {
        LoggedDelay {
            log: Rc::clone(&self.log),
            cancel: Some((flag, after)),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    /// Events without the pauses.
    pub fn calls(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| !matches!(e, Event::Pause(_)))
            .collect()
    }
}

pub struct RecordingDisplay {
    log: Rc<RefCell<Vec<Event>>>,
    columns: u8,
    rows: u8,
    fail_after: Option<usize>,
    calls: usize,
}

impl RecordingDisplay {
    /// Refuse every command after the first `calls`.
    pub fn failing_after(mut self, calls: usize) -> Self {
        self.fail_after = Some(calls);
        self
    }

    fn record(&mut self, event: Event) -> Result<(), DisplayFault> {
        if self.fail_after.is_some_and(|limit| self.calls >= limit) {
            return Err(DisplayFault);
        }
        self.calls += 1;
        self.log.borrow_mut().push(event);
        Ok(())
    }
}

impl CharDisplay for RecordingDisplay {
    type Error = DisplayFault;

    fn begin(&mut self, columns: u8, rows: u8) -> Result<(), DisplayFault> {
        self.columns = columns;
        self.rows = rows;
        self.record(Event::Begin(columns, rows))
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayFault> {
        self.record(Event::SetCursor(col, row))
    }

    fn message(&mut self, text: &str) -> Result<(), DisplayFault> {
        self.record(Event::Message(text.to_owned()))
    }

    fn clear(&mut self) -> Result<(), DisplayFault> {
        self.record(Event::Clear)
    }

    fn home(&mut self) -> Result<(), DisplayFault> {
        self.record(Event::Home)
    }

    fn scroll_display_left(&mut self) -> Result<(), DisplayFault> {
        self.record(Event::ScrollLeft)
    }

    fn scroll_display_right(&mut self) -> Result<(), DisplayFault> {
        self.record(Event::ScrollRight)
    }

    fn move_cursor_left(&mut self) -> Result<(), DisplayFault> {
        self.record(Event::CursorLeft)
    }

    fn move_cursor_right(&mut self) -> Result<(), DisplayFault> {
        self.record(Event::CursorRight)
    }

    fn set_autoscroll(&mut self, on: bool) -> Result<(), DisplayFault> {
        self.record(Event::Autoscroll(on))
    }

    fn set_left_to_right(&mut self, on: bool) -> Result<(), DisplayFault> {
        self.record(Event::LeftToRight(on))
    }

    fn set_cursor_visible(&mut self, on: bool) -> Result<(), DisplayFault> {
        self.record(Event::CursorVisible(on))
    }

    fn set_blink(&mut self, on: bool) -> Result<(), DisplayFault> {
        self.record(Event::Blink(on))
    }

    fn set_display(&mut self, on: bool) -> Result<(), DisplayFault> {
        self.record(Event::Display(on))
    }

    fn backlight(&mut self, on: bool) -> Result<(), DisplayFault> {
        self.record(Event::Backlight(on))
    }

    fn create_char(&mut self, location: u8, glyph: [u8; 8]) -> Result<(), DisplayFault> {
        self.record(Event::CreateChar(location, glyph))
    }

    fn write_byte(&mut self, code: u8) -> Result<(), DisplayFault> {
        self.record(Event::WriteByte(code))
    }

    fn columns(&self) -> u8 {
        self.columns
    }

    fn rows(&self) -> u8 {
        self.rows
    }
}

/// Delay that logs millisecond pauses next to the display calls.
pub struct LoggedDelay {
    log: Rc<RefCell<Vec<Event>>>,
    cancel: Option<(Arc<AtomicBool>, usize)>,
}

impl DelayNs for LoggedDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        let mut log = self.log.borrow_mut();
        log.push(Event::Pause(ms));
        if let Some((flag, after)) = &self.cancel {
            let paused = log.iter().filter(|e| matches!(e, Event::Pause(_))).count();
            if paused >= *after {
                flag.store(true, Ordering::SeqCst);
            }
        }
    }
}
