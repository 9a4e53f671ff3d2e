//! Drive a 20x4 HD44780 character LCD hanging off a PCF8574 I2C expander
//! backpack like [this one], and two small programs built on it: a CPU
//! temperature / clock display and a feature test that walks through scrolling,
//! autoscroll, cursor and display toggles.
//!
//! The expander only needs an [`embedded_hal::i2c::I2c`] bus and the LCD a
//! [`embedded_hal::delay::DelayNs`], so on a Raspberry Pi `linux-embedded-hal`
//! provides both.
//!
//! Usage:
//! ```no_run
//! use lcd2004_pcf8574::display::{power_up, CharDisplay, Geometry};
//! use lcd2004_pcf8574::expander;
//! use lcd2004_pcf8574::sync_lcd::CharLcd;
//!
//! let i2c = linux_embedded_hal::I2cdev::new("/dev/i2c-1").unwrap();
//! let mut delay = linux_embedded_hal::Delay;
//!
//! // 0x27 first, then 0x3F
//! let mut pcf = expander::acquire(i2c).unwrap();
//! let mut lcd = CharLcd::new(&mut pcf, &mut delay);
//! power_up(&mut lcd, Geometry::default()).unwrap();
//! lcd.set_cursor(0, 1).unwrap();
//! lcd.message("Hello").unwrap();
//! ```
//!
//! [this one]: https://funduinoshop.com/elektronische-module/displays/lcd/16x02-i2c-lcd-modul-hintergrundbeleuchtung-blau

pub mod config;
pub mod display;
pub mod expander;
pub mod status;
pub mod sync_lcd;
pub mod thermal;

#[cfg(test)]
pub(crate) mod mock;

/// Flags for the display control command.
pub enum DisplayControl {
    CursorBlink = 0x01,
    CursorOn = 0x02,
    DisplayOn = 0x04,
}

#[repr(u8)]
#[derive(Copy, Clone)]
enum Mode {
    EntrySet = 0x04,
    DisplayControl = 0x08,
    CursorShift = 0x10,
    FunctionSet = 0x20,
    CGRAMAddr = 0x40,
    DDRAMAddr = 0x80,
}

enum Commands {
    Clear = 0x01,
    ReturnHome = 0x02,
}

enum Lines {
    One = 0x00,
    Two = 0x08,
}

#[repr(u8)]
#[derive(Copy, Clone)]
enum EntryMode {
    ShiftIncrement = 0x01,
    LeftToRight = 0x02,
}

#[repr(u8)]
#[derive(Copy, Clone)]
enum Shift {
    CursorLeft = 0x00,
    CursorRight = 0x04,
    DisplayLeft = 0x08,
    DisplayRight = 0x08 | 0x04,
}
