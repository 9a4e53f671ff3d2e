//! CPU temperature and clock on the bottom two rows, refreshed every second.

use core::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveTime;
use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::display::CharDisplay;
use crate::thermal::SensorError;

/// Rows 0 and 1, written once before the loop.
pub const HEADER: [&str; 2] = ["FREENOVE", "www.freenove.com"];

const TEMPERATURE_ROW: u8 = 2;
const TIME_ROW: u8 = 3;
const REFRESH_MS: u32 = 1000;
const TIME_FORMAT: &str = "    %H:%M:%S";

/// Source of the CPU temperature.
pub trait TemperatureSensor {
    fn millidegrees(&mut self) -> Result<f64, SensorError>;
}

/// Wall clock.
pub trait Clock {
    fn now(&mut self) -> NaiveTime;
}

/// Local time of the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&mut self) -> NaiveTime {
        chrono::Local::now().time()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StatusError<E: Debug> {
    #[error("display command failed: {0:?}")]
    Display(E),
    #[error(transparent)]
    Sensor(#[from] SensorError),
}

/// `"CPU: 45.00 C"` for 45000 millidegrees.
pub fn format_temperature(millidegrees: f64) -> String {
    format!("CPU: {:.2} C", millidegrees / 1000.0)
}

/// Time with four leading spaces, e.g. `"    07:03:09"`.
pub fn format_time(time: &NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Show the header, then temperature and time until `cancel` is raised.
///
/// The flag is checked once per refresh. After it's seen the display is
/// cleared and the loop returns. Sensor and display errors end the loop right
/// away without clearing.
pub fn run<L, S, C, D>(
    lcd: &mut L,
    sensor: &mut S,
    clock: &mut C,
    delay: &mut D,
    cancel: &AtomicBool,
) -> Result<(), StatusError<L::Error>>
where
    L: CharDisplay,
    S: TemperatureSensor,
    C: Clock,
    D: DelayNs,
{
    for (row, text) in (0u8..).zip(HEADER) {
        lcd.set_cursor(0, row).map_err(StatusError::Display)?;
        lcd.message(text).map_err(StatusError::Display)?;
    }

    while !cancel.load(Ordering::SeqCst) {
        let temperature = format_temperature(sensor.millidegrees()?);
        let time = format_time(&clock.now());
        debug!("{} |{}", temperature, time);

        lcd.set_cursor(0, TEMPERATURE_ROW).map_err(StatusError::Display)?;
        lcd.message(&temperature).map_err(StatusError::Display)?;
        lcd.set_cursor(0, TIME_ROW).map_err(StatusError::Display)?;
        lcd.message(&time).map_err(StatusError::Display)?;

        delay.delay_ms(REFRESH_MS);
    }

    info!("status display stopped, clearing");
    lcd.clear().map_err(StatusError::Display)
}
