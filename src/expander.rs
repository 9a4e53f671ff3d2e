//! PCF8574 / PCF8574A quasi-bidirectional port expander used as an output-only
//! 8 bit port, plus the two-address probe that finds it on the bus.

use core::fmt::Debug;

use embedded_hal::i2c::I2c;
use log::{debug, info, warn};

/// Default address of the PCF8574.
pub const PRIMARY_ADDRESS: u8 = 0x27;
/// Default address of the PCF8574A.
pub const SECONDARY_ADDRESS: u8 = 0x3F;

/// Something with numbered digital output lines.
pub trait OutputPins {
    type Error: Debug;

    /// Drive a single line to `level`.
    fn output(&mut self, pin: u8, level: bool) -> Result<(), Self::Error>;

    /// Drive several lines at once. The default sets them one by one.
    fn output_pins(&mut self, pins: &[(u8, bool)]) -> Result<(), Self::Error> {
        for &(pin, level) in pins {
            self.output(pin, level)?;
        }
        Ok(())
    }
}

/// Expander handle bound to one bus address.
///
/// The chip can't be read back reliably while lines are driven, so the output
/// levels live in a shadow byte and every change rewrites the whole port.
pub struct Pcf8574<I>
where
    I: I2c,
{
    i2c: I,
    address: u8,
    state: u8,
}

impl<I> Pcf8574<I>
where
    I: I2c,
{
    /// Open the expander at `address` by driving all outputs low.
    ///
    /// A missing device doesn't ack, so the write fails and the bus is handed
    /// back together with the error for another attempt.
    pub fn open(mut i2c: I, address: u8) -> Result<Self, (I, I::Error)> {
        match i2c.write(address, &[0x00]) {
            Ok(()) => Ok(Self {
                i2c,
                address,
                state: 0x00,
            }),
            Err(e) => Err((i2c, e)),
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Current shadow of the output levels, bit n is pin n.
    pub fn state(&self) -> u8 {
        self.state
    }

    /// Give the bus back.
    pub fn release(self) -> I {
        self.i2c
    }

    #[cfg(test)]
    pub(crate) fn bus(&self) -> &I {
        &self.i2c
    }

    fn flush(&mut self) -> Result<(), I::Error> {
        self.i2c.write(self.address, &[self.state])
    }
}

fn apply(state: u8, pin: u8, level: bool) -> u8 {
    let mask = 1u8 << (pin & 0x07);
    if level {
        state | mask
    } else {
        state & !mask
    }
}

impl<I> OutputPins for Pcf8574<I>
where
    I: I2c,
{
    type Error = I::Error;

    fn output(&mut self, pin: u8, level: bool) -> Result<(), Self::Error> {
        self.state = apply(self.state, pin, level);
        self.flush()
    }

    fn output_pins(&mut self, pins: &[(u8, bool)]) -> Result<(), Self::Error> {
        self.state = pins
            .iter()
            .fold(self.state, |state, &(pin, level)| apply(state, pin, level));
        self.flush()
    }
}

/// Neither expander address answered.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError<E: Debug> {
    #[error(
        "I2C Address Error ! no expander at {:#04x} or {:#04x}",
        PRIMARY_ADDRESS,
        SECONDARY_ADDRESS
    )]
    NotFound { primary: E, secondary: E },
}

/// Find the expander: [`PRIMARY_ADDRESS`] first, then [`SECONDARY_ADDRESS`].
pub fn acquire<I>(i2c: I) -> Result<Pcf8574<I>, ProbeError<I::Error>>
where
    I: I2c,
{
    debug!("probing expander at {:#04x}", PRIMARY_ADDRESS);
    let (i2c, primary) = match Pcf8574::open(i2c, PRIMARY_ADDRESS) {
        Ok(pcf) => {
            info!("expander found at {:#04x}", PRIMARY_ADDRESS);
            return Ok(pcf);
        }
        Err(failed) => failed,
    };
    warn!(
        "no expander at {:#04x} ({:?}), trying {:#04x}",
        PRIMARY_ADDRESS, primary, SECONDARY_ADDRESS
    );

    match Pcf8574::open(i2c, SECONDARY_ADDRESS) {
        Ok(pcf) => {
            info!("expander found at {:#04x}", SECONDARY_ADDRESS);
            Ok(pcf)
        }
        Err((_, secondary)) => Err(ProbeError::NotFound { primary, secondary }),
    }
}
