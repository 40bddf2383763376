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

use std::collections::VecDeque;
use std::f64::consts::PI;

use crate::error::ControllerError;
use crate::interface::sensor::TemperatureSensor;
use crate::mock::mock_constants::{
    SIMULATION_TEMPERATURE_AMPLITUDE, SIMULATION_TEMPERATURE_BASE, SIMULATION_TEMPERATURE_PERIOD,
};

/// Sensor that returns the scripted readings first and the simulated daily
/// swing of temperature afterwards.
pub struct MockSensor {
    _readings: VecDeque<Result<f64, ControllerError>>,
    _error_enable: Option<ControllerError>,
    // Number of the simulated readings.
    _count: u64,
    pub is_enabled: bool,
}

impl MockSensor {
    /// Create a new mock sensor.
    ///
    /// # Arguments
    /// * `readings` - Scripted readings.
    ///
    /// # Returns
    /// A new mock sensor.
    pub fn new(readings: Vec<Result<f64, ControllerError>>) -> Self {
        Self {
            _readings: readings.into(),
            _error_enable: None,
            _count: 0,
            is_enabled: false,
        }
    }

    /// Fail the enabling with the error.
    ///
    /// # Arguments
    /// * `error` - Error of the enabling.
    ///
    /// # Returns
    /// The mock sensor.
    pub fn with_enable_error(mut self, error: ControllerError) -> Self {
        self._error_enable = Some(error);
        self
    }

    /// Simulated temperature of the count-th reading.
    ///
    /// # Arguments
    /// * `count` - Index of the reading.
    ///
    /// # Returns
    /// Temperature in degree Celsius.
    pub fn simulate(count: u64) -> f64 {
        let phase = 2.0 * PI * (count as f64) / SIMULATION_TEMPERATURE_PERIOD;
        SIMULATION_TEMPERATURE_BASE + SIMULATION_TEMPERATURE_AMPLITUDE * phase.sin()
    }
}

impl TemperatureSensor for MockSensor {
    fn enable(&mut self) -> Result<(), ControllerError> {
        if let Some(error) = &self._error_enable {
            return Err(error.clone());
        }

        self.is_enabled = true;
        Ok(())
    }

    fn read_temperature(&mut self) -> Result<f64, ControllerError> {
        if let Some(reading) = self._readings.pop_front() {
            return reading;
        }

        let temperature = Self::simulate(self._count);
        self._count += 1;

        Ok(temperature)
    }
}
