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

use log::{error, info};
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    flag::register,
};
use std::path::Path;
use std::sync::{atomic::AtomicBool, Arc};

use crate::config::Config;
use crate::constants::{EXIT_CODE_STOPPED, GPIO_ROOT};
use crate::control::{coil::Coil, coil::SysfsGpioCoil, control_loop::ControlLoop};
use crate::error::ControllerError;
use crate::interface::{
    sensor::{FileTemperatureSensor, TemperatureSensor},
    setpoint_client::{HttpSetpointClient, SetpointService},
};
use crate::mock::{
    mock_coil::MockCoil, mock_constants::SIMULATION_SETPOINT, mock_sensor::MockSensor,
    mock_setpoint_service::MockSetpointService,
};

/// Run the application.
///
/// # Arguments
/// * `config_file` - Configuration file.
/// * `cycle_interval_minutes` - Override of the cycle interval. None to use
/// the configuration file.
/// * `is_simulation_mode` - Is the simulation mode or not.
///
/// # Returns
/// Exit code of the process.
pub fn run(
    config_file: &Path,
    cycle_interval_minutes: Option<u64>,
    is_simulation_mode: bool,
) -> i32 {
    // Log the running mode
    let mode = if is_simulation_mode {
        "simulation mode"
    } else {
        "hardware mode"
    };
    info!("Run the vent controller in {mode}.");

    let mut config = match Config::new(config_file) {
        Ok(config) => config,
        Err(config_error) => {
            error!("Failed to load {:?}: {config_error}.", config_file);
            return config_error.exit_code();
        }
    };

    if let Some(minutes) = cycle_interval_minutes {
        config.cycle_interval_minutes = minutes;
        if let Err(config_error) = config.validate() {
            error!("Failed to override the cycle interval: {config_error}.");
            return config_error.exit_code();
        }
    }

    // Register the signals that stop the application
    let stop = Arc::new(AtomicBool::new(false));
    for signal in [SIGTERM, SIGINT].iter() {
        let _ = register(*signal, stop.clone());
    }

    let result = if is_simulation_mode {
        run_control_loop(
            ControlLoop::new(
                &config,
                MockSensor::new(Vec::new()),
                MockSetpointService::new(SIMULATION_SETPOINT, Vec::new()),
                MockCoil::new(false),
            ),
            &stop,
        )
    } else {
        run_control_loop(
            ControlLoop::new(
                &config,
                FileTemperatureSensor::new(Path::new(&config.sensor_path)),
                HttpSetpointClient::new(
                    &config.endpoint,
                    config.token.as_deref(),
                    config.get_request_timeout(),
                ),
                SysfsGpioCoil::new(Path::new(GPIO_ROOT), &config.gpio_coil, &config.gpio_enable),
            ),
            &stop,
        )
    };

    get_exit_code(&result)
}

/// Run the control loop and log the final position.
///
/// # Arguments
/// * `control_loop` - Control loop.
/// * `stop` - Flag to stop the loop.
///
/// # Returns
/// Result of the control loop.
fn run_control_loop<S: TemperatureSensor, N: SetpointService, C: Coil>(
    mut control_loop: ControlLoop<S, N, C>,
    stop: &Arc<AtomicBool>,
) -> Result<(), ControllerError> {
    let result = control_loop.run(stop);

    info!(
        "Vent controller ends at the position {} after {} cycles.",
        control_loop.actuator.position(),
        control_loop.telemetry.count_cycle
    );

    result
}

/// Get the exit code of the process.
///
/// # Arguments
/// * `result` - Result of the control loop.
///
/// # Returns
/// Exit code.
fn get_exit_code(result: &Result<(), ControllerError>) -> i32 {
    match result {
        Ok(()) => EXIT_CODE_STOPPED,
        Err(error) => error.exit_code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_exit_code() {
        assert_eq!(get_exit_code(&Ok(())), 0);
        assert_eq!(
            get_exit_code(&Err(ControllerError::NoNetworkInterface(String::from(
                "none"
            )))),
            -1
        );
        assert_eq!(
            get_exit_code(&Err(ControllerError::RequestFailed(String::from("reset")))),
            1
        );
    }

    #[test]
    fn test_run_missing_config() {
        assert_eq!(run(Path::new("config/no_such_file.yaml"), None, true), 2);
    }

    #[test]
    fn test_run_cycle_interval_overflow() {
        assert_eq!(
            run(
                Path::new("config/parameters_app.yaml"),
                Some(u64::MAX),
                true
            ),
            2
        );
    }

    #[test]
    fn test_run_control_loop() {
        let mut config = Config::default();
        config.step_sleep_ms = 0;

        let control_loop = ControlLoop::new(
            &config,
            MockSensor::new(Vec::new()),
            MockSetpointService::new(21, Vec::new())
                .with_connect_error(ControllerError::NoNetworkInterface(String::from("none"))),
            MockCoil::new(false),
        );

        let stop = Arc::new(AtomicBool::new(false));
        let result = run_control_loop(control_loop, &stop);

        assert_eq!(get_exit_code(&result), -1);
    }
}
