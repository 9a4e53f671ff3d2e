//! Command line options shared by the binaries, and the way they get hold of
//! the expander.

use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Args;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use linux_embedded_hal::I2cdev;
use log::{error, LevelFilter};

use crate::display::Geometry;
use crate::expander::{self, Pcf8574, ProbeError};

/// Printed when the expander can't be reached.
pub const ADDRESS_ERROR: &str = "I2C Address Error !";
/// Exit status after [`ADDRESS_ERROR`].
pub const ADDRESS_ERROR_EXIT: i32 = 1;

#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    /// I2C bus the expander sits on
    #[arg(long, default_value = "/dev/i2c-1")]
    pub bus: PathBuf,

    /// Characters per row
    #[arg(long, default_value_t = 20)]
    pub columns: u8,

    /// Number of rows
    #[arg(long, default_value_t = 4)]
    pub rows: u8,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// The expander couldn't be reached, either because the bus didn't open or
/// because nothing answered on it.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("{} cannot open {:?}", ADDRESS_ERROR, .path)]
    Bus {
        path: PathBuf,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    #[error(transparent)]
    Probe(ProbeError<ErrorKind>),
}

impl AcquireError {
    /// Print the address error to `out` and return the exit status to use.
    pub fn report<W: Write>(&self, mut out: W) -> i32 {
        error!("{}", self);
        // Nothing sensible left to do if stdout is gone.
        let _ = writeln!(out, "{}", ADDRESS_ERROR);
        ADDRESS_ERROR_EXIT
    }
}

impl DeviceArgs {
    pub fn geometry(&self) -> Geometry {
        Geometry {
            columns: self.columns,
            rows: self.rows,
        }
    }

    /// Open the bus and probe for the expander on it.
    pub fn acquire(&self) -> Result<Pcf8574<I2cdev>, AcquireError> {
        self.acquire_with(|path| I2cdev::new(path))
    }

    /// Like [`acquire`](Self::acquire) but prints the address error and exits
    /// on failure.
    pub fn acquire_or_exit(&self) -> Pcf8574<I2cdev> {
        match self.acquire() {
            Ok(pcf) => pcf,
            Err(e) => process::exit(e.report(io::stdout())),
        }
    }

    /// Probe on a bus opened by `open`. A bus that doesn't open counts the
    /// same as an expander that doesn't answer.
    pub fn acquire_with<I, E, F>(&self, open: F) -> Result<Pcf8574<I>, AcquireError>
    where
        I: I2c,
        E: Error + Send + Sync + 'static,
        F: FnOnce(&Path) -> Result<I, E>,
    {
        let i2c = open(&self.bus).map_err(|e| AcquireError::Bus {
            path: self.bus.clone(),
            source: Box::new(e),
        })?;
        expander::acquire(i2c).map_err(|ProbeError::NotFound { primary, secondary }| {
            AcquireError::Probe(ProbeError::NotFound {
                primary: primary.kind(),
                secondary: secondary.kind(),
            })
        })
    }
}

/// Log warnings by default, debug output for this crate with `verbose`.
/// `RUST_LOG` still wins.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::builder()
        .filter_module("lcd2004_pcf8574", level)
        .parse_default_env()
        .init();
}
