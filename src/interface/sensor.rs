// This file is part of vent_controller.
//
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::MILLIDEGREE_PER_DEGREE;
use crate::error::ControllerError;

/// Ambient temperature sensor.
pub trait TemperatureSensor {
    /// Enable the sensor. Called once at startup.
    fn enable(&mut self) -> Result<(), ControllerError>;

    /// Read the instantaneous temperature in degree Celsius.
    fn read_temperature(&mut self) -> Result<f64, ControllerError>;
}

/// Sensor exposed as a file holding the temperature in millidegree Celsius,
/// like the 1-wire and hwmon drivers of Linux do.
pub struct FileTemperatureSensor {
    _filepath: PathBuf,
    pub is_enabled: bool,
}

impl FileTemperatureSensor {
    /// Create a new file temperature sensor.
    ///
    /// # Arguments
    /// * `filepath` - File of the temperature.
    ///
    /// # Returns
    /// A new file temperature sensor.
    pub fn new(filepath: &Path) -> Self {
        Self {
            _filepath: filepath.to_path_buf(),
            is_enabled: false,
        }
    }

    /// Parse the content of the sensor file.
    ///
    /// # Arguments
    /// * `content` - Content of the file.
    ///
    /// # Returns
    /// Temperature in degree Celsius.
    fn parse(content: &str) -> Result<f64, ControllerError> {
        content
            .trim()
            .parse::<i64>()
            .map(|millidegree| (millidegree as f64) / MILLIDEGREE_PER_DEGREE)
            .map_err(|_| {
                ControllerError::Sensor(format!("{:?} is not a temperature reading", content))
            })
    }
}

impl TemperatureSensor for FileTemperatureSensor {
    fn enable(&mut self) -> Result<(), ControllerError> {
        self.is_enabled = false;
        self.read_temperature()?;

        info!("Temperature sensor {:?} is enabled.", self._filepath);
        self.is_enabled = true;

        Ok(())
    }

    fn read_temperature(&mut self) -> Result<f64, ControllerError> {
        let content = fs::read_to_string(&self._filepath).map_err(|error| {
            ControllerError::Sensor(format!("Failed to read {:?}: {error}", self._filepath))
        })?;

        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::NamedTempFile;

    fn create_sensor(content: &str) -> (FileTemperatureSensor, NamedTempFile) {
        let file = NamedTempFile::new().expect("Should create the temporary file.");
        fs::write(file.path(), content).unwrap();

        (FileTemperatureSensor::new(file.path()), file)
    }

    #[test]
    fn test_parse() {
        assert_relative_eq!(FileTemperatureSensor::parse("21437\n").unwrap(), 21.437);
        assert_relative_eq!(FileTemperatureSensor::parse("-1500").unwrap(), -1.5);

        assert!(FileTemperatureSensor::parse("").is_err());
        assert!(FileTemperatureSensor::parse("21.4").is_err());
    }

    #[test]
    fn test_enable() {
        let (mut sensor, _file) = create_sensor("19875\n");

        assert!(sensor.enable().is_ok());
        assert!(sensor.is_enabled);
    }

    #[test]
    fn test_enable_missing_file() {
        let mut sensor = FileTemperatureSensor::new(Path::new("no/such/sensor"));

        assert!(matches!(sensor.enable(), Err(ControllerError::Sensor(_))));
        assert!(!sensor.is_enabled);
    }

    #[test]
    fn test_read_temperature() {
        let (mut sensor, file) = create_sensor("22999");
        assert_relative_eq!(sensor.read_temperature().unwrap(), 22.999);

        fs::write(file.path(), "18000").unwrap();
        assert_relative_eq!(sensor.read_temperature().unwrap(), 18.0);

        fs::write(file.path(), "busy").unwrap();
        assert!(sensor.read_temperature().is_err());
    }
}
