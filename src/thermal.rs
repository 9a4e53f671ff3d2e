//! CPU temperature from the kernel's thermal zone.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::trace;

use crate::status::TemperatureSensor;

pub const DEFAULT_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed temperature {content:?} in {path:?}")]
    Parse { path: PathBuf, content: String },
}

/// A sysfs thermal zone file holding millidegrees Celsius as text.
#[derive(Debug, Clone)]
pub struct ThermalZone {
    path: PathBuf,
}

impl ThermalZone {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ThermalZone {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

impl TemperatureSensor for ThermalZone {
    fn millidegrees(&mut self) -> Result<f64, SensorError> {
        let content = fs::read_to_string(&self.path).map_err(|source| SensorError::Read {
            path: self.path.clone(),
            source,
        })?;
        trace!("{:?}: {:?}", self.path, content);
        content.trim().parse().map_err(|_| SensorError::Parse {
            path: self.path.clone(),
            content,
        })
    }
}
