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

use std::path::Path;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CYCLE_INTERVAL_MINUTES, DEFAULT_MAX_POSITION, DEFAULT_STEP_AMOUNT,
    DEFAULT_STEP_SLEEP_MS, NUM_COIL_LINE, NUM_ENABLE_LINE, SECONDS_PER_MINUTE,
};
use crate::enums::{GuardArithmetic, MalformedSetpointPolicy};
use crate::error::ControllerError;
use crate::utility::{get_config, get_parameter, get_parameter_array, get_parameter_or};

#[derive(Clone, PartialEq, Debug)]
pub struct Config {
    // Configuration filename.
    pub filename: String,
    // Maximum allowed position of the actuator in steps.
    pub max_position: i32,
    // Time to hold each coil phase in millisecond.
    pub step_sleep_ms: u64,
    // Minutes to wait between two control cycles.
    pub cycle_interval_minutes: u64,
    // Divisor of the maximum position to get the steps of a single move.
    pub step_amount: i32,
    // Arithmetic of the position guard.
    pub guard_arithmetic: GuardArithmetic,
    // Reaction to a non-numeric setpoint or a failed sensor reading.
    pub malformed_setpoint_policy: MalformedSetpointPolicy,
    // URL of the setpoint service.
    pub endpoint: String,
    // Access token of the setpoint service. None if not needed.
    pub token: Option<String>,
    // Timeout of the setpoint request in millisecond. 0 means the default of
    // the transport.
    pub request_timeout_ms: u64,
    // File of the temperature sensor.
    pub sensor_path: String,
    // GPIO lines of the coils A, B, C and D.
    pub gpio_coil: Vec<u32>,
    // GPIO lines of the two bridge enables.
    pub gpio_enable: Vec<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filename: String::new(),
            max_position: DEFAULT_MAX_POSITION,
            step_sleep_ms: DEFAULT_STEP_SLEEP_MS,
            cycle_interval_minutes: DEFAULT_CYCLE_INTERVAL_MINUTES,
            step_amount: DEFAULT_STEP_AMOUNT,
            guard_arithmetic: GuardArithmetic::Exact,
            malformed_setpoint_policy: MalformedSetpointPolicy::Skip,
            endpoint: String::new(),
            token: None,
            request_timeout_ms: 0,
            sensor_path: String::new(),
            gpio_coil: vec![8, 9, 12, 13],
            gpio_enable: vec![10, 11],
        }
    }
}

impl Config {
    /// Create a new config object.
    ///
    /// # Arguments
    /// * `filepath` - The path to the application parameters file.
    ///
    /// # Returns
    /// A new config object.
    pub fn new(filepath: &Path) -> Result<Self, ControllerError> {
        let config = get_config(filepath)?;
        let default = Self::default();

        let token: String = get_parameter_or(&config, "token", String::new())?;

        let settings = Self {
            filename: filepath.to_string_lossy().into_owned(),

            max_position: get_parameter_or(&config, "max_position", default.max_position)?,
            step_sleep_ms: get_parameter_or(&config, "step_sleep_ms", default.step_sleep_ms)?,
            cycle_interval_minutes: get_parameter_or(
                &config,
                "cycle_interval_minutes",
                default.cycle_interval_minutes,
            )?,
            step_amount: get_parameter_or(&config, "step_amount", default.step_amount)?,

            guard_arithmetic: get_parameter_or(
                &config,
                "guard_arithmetic",
                default.guard_arithmetic,
            )?,
            malformed_setpoint_policy: get_parameter_or(
                &config,
                "malformed_setpoint_policy",
                default.malformed_setpoint_policy,
            )?,

            endpoint: get_parameter(&config, "endpoint")?,
            token: if token.is_empty() { None } else { Some(token) },
            request_timeout_ms: get_parameter_or(
                &config,
                "request_timeout_ms",
                default.request_timeout_ms,
            )?,

            sensor_path: get_parameter(&config, "sensor_path")?,
            gpio_coil: get_parameter_array(&config, "gpio_coil")?,
            gpio_enable: get_parameter_array(&config, "gpio_enable")?,
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate the settings.
    ///
    /// # Returns
    /// Ok if the settings are usable by the control loop.
    pub fn validate(&self) -> Result<(), ControllerError> {
        if self.max_position <= 0 {
            return Err(ControllerError::Config(format!(
                "max_position should be positive instead of {}",
                self.max_position
            )));
        }

        if self.step_amount <= 0 {
            return Err(ControllerError::Config(format!(
                "step_amount should be positive instead of {}",
                self.step_amount
            )));
        }

        if self
            .cycle_interval_minutes
            .checked_mul(SECONDS_PER_MINUTE)
            .is_none()
        {
            return Err(ControllerError::Config(format!(
                "cycle_interval_minutes {} is too large",
                self.cycle_interval_minutes
            )));
        }

        // The farthest position is one step inside the rail plus a move.
        let farthest_position = (self.max_position / self.step_amount)
            .checked_add(1)
            .and_then(|steps| self.max_position.checked_add(steps));
        if farthest_position.is_none() {
            return Err(ControllerError::Config(format!(
                "max_position {} is too large for step_amount {}",
                self.max_position, self.step_amount
            )));
        }

        if self.gpio_coil.len() != NUM_COIL_LINE {
            return Err(ControllerError::Config(format!(
                "gpio_coil should have {NUM_COIL_LINE} lines"
            )));
        }

        if self.gpio_enable.len() != NUM_ENABLE_LINE {
            return Err(ControllerError::Config(format!(
                "gpio_enable should have {NUM_ENABLE_LINE} lines"
            )));
        }

        Ok(())
    }

    /// Get the time to hold each coil phase.
    ///
    /// # Returns
    /// Step sleep interval.
    pub fn get_step_sleep(&self) -> Duration {
        Duration::from_millis(self.step_sleep_ms)
    }

    /// Get the time to wait between two control cycles.
    ///
    /// # Returns
    /// Cycle interval.
    pub fn get_cycle_interval(&self) -> Duration {
        Duration::from_secs(
            self.cycle_interval_minutes
                .saturating_mul(SECONDS_PER_MINUTE),
        )
    }

    /// Get the timeout of the setpoint request.
    ///
    /// # Returns
    /// Timeout of the request. None if the transport default is used.
    pub fn get_request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.request_timeout_ms))
        }
    }
}
