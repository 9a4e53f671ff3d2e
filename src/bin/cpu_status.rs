//! CPU temperature and time on a 2004 LCD until Ctrl+C.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use linux_embedded_hal::Delay;

use lcd2004_pcf8574::config::{init_logging, DeviceArgs};
use lcd2004_pcf8574::display::power_up;
use lcd2004_pcf8574::status::{self, LocalClock};
use lcd2004_pcf8574::sync_lcd::CharLcd;
use lcd2004_pcf8574::thermal::{ThermalZone, DEFAULT_PATH};

/// Show CPU temperature and the time on an I2C character LCD
#[derive(Parser)]
#[command(name = "cpu-status", version)]
struct Cli {
    #[command(flatten)]
    device: DeviceArgs,

    /// Thermal zone file holding millidegrees Celsius
    #[arg(long, default_value = DEFAULT_PATH)]
    thermal_path: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.device.verbose);

    println!("Program is starting ... ");

    let mut pcf = cli.device.acquire_or_exit();
    let mut delay = Delay;
    let mut lcd = CharLcd::new(&mut pcf, &mut delay);
    power_up(&mut lcd, cli.device.geometry())
        .map_err(|e| anyhow::anyhow!("display setup failed: {:?}", e))?;

    let cancel = Arc::new(AtomicBool::new(false));
    let interrupted = Arc::clone(&cancel);
    ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
        .context("Failed to set Ctrl+C handler")?;

    // `lcd` holds on to `delay` for its own timing.
    let mut pacing = Delay;
    status::run(
        &mut lcd,
        &mut ThermalZone::new(cli.thermal_path),
        &mut LocalClock,
        &mut pacing,
        &cancel,
    )?;
    Ok(())
}
