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

use log::{debug, error, info, warn};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::sleep;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::constants::STOP_POLL_MS;
use crate::control::actuator::Actuator;
use crate::control::coil::Coil;
use crate::control::decision::{DecisionPolicy, Move};
use crate::control::position_guard::{Correction, PositionGuard};
use crate::enums::{ControllerState, Direction, MalformedSetpointPolicy};
use crate::error::ControllerError;
use crate::interface::{sensor::TemperatureSensor, setpoint_client::SetpointService};
use crate::telemetry::{event::Event, telemetry_control_loop::TelemetryControlLoop};

/// What happened in a single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    pub correction: Option<Correction>,
    pub measured_temperature: Option<i32>,
    pub setpoint: Option<i32>,
    pub motion: Option<Move>,
}

pub struct ControlLoop<S: TemperatureSensor, N: SetpointService, C: Coil> {
    // Configuration.
    pub config: Config,
    // Vent actuator.
    pub actuator: Actuator<C>,
    pub sensor: S,
    pub setpoint_service: N,
    _guard: PositionGuard,
    _policy: DecisionPolicy,
    _state: ControllerState,
    // Telemetry.
    pub telemetry: TelemetryControlLoop,
    // Events to publish
    _events: Vec<Value>,
}

impl<S: TemperatureSensor, N: SetpointService, C: Coil> ControlLoop<S, N, C> {
    /// Create a new control loop.
    ///
    /// # Arguments
    /// * `config` - The configuration.
    /// * `sensor` - Temperature sensor.
    /// * `setpoint_service` - Setpoint service.
    /// * `coil` - Output lines of the stepper bridge.
    ///
    /// # Returns
    /// A new control loop.
    pub fn new(config: &Config, sensor: S, setpoint_service: N, coil: C) -> Self {
        Self {
            config: config.clone(),

            actuator: Actuator::new(coil, config.get_step_sleep()),
            sensor: sensor,
            setpoint_service: setpoint_service,

            _guard: PositionGuard::new(config.max_position, config.guard_arithmetic),
            _policy: DecisionPolicy::new(config.max_position, config.step_amount),

            _state: ControllerState::Startup,

            telemetry: TelemetryControlLoop::new(),

            _events: Vec::new(),
        }
    }

    /// Get the state of the controller.
    pub fn get_state(&self) -> ControllerState {
        self._state
    }

    fn set_state(&mut self, state: ControllerState) {
        if self._state != state {
            info!(
                "Controller state: {} -> {}.",
                self._state.as_ref(),
                state.as_ref()
            );

            self._state = state;
            self._events
                .push(Event::get_message_controller_state(state));
        }
    }

    /// Get the events to publish and clear the internal events.
    ///
    /// # Returns
    /// Events.
    pub fn get_events_and_clear(&mut self) -> Vec<Value> {
        std::mem::take(&mut self._events)
    }

    /// Move to the failed state.
    ///
    /// # Arguments
    /// * `error` - Fatal error.
    ///
    /// # Returns
    /// The same error.
    fn fail(&mut self, error: ControllerError) -> ControllerError {
        error!("Control loop fails: {error}.");
        self.set_state(ControllerState::Failed);

        error
    }

    /// Start the controller: enable the sensor, connect the setpoint service
    /// and move the vent to the middle of the travel range.
    ///
    /// # Notes
    /// The middle position is assumed from the steps only. The true physical
    /// position is never measured.
    pub fn startup(&mut self) -> Result<(), ControllerError> {
        if self._state != ControllerState::Startup {
            return Ok(());
        }

        self.sensor.enable().map_err(|error| self.fail(error))?;
        self.setpoint_service
            .connect()
            .map_err(|error| self.fail(error))?;

        let steps = (self.config.max_position / 2).unsigned_abs();
        info!("Move the vent to the middle with {steps} steps.");
        self.actuator.step(Direction::Forward, steps);

        self.update_telemetry_counts();
        self.set_state(ControllerState::Running);

        Ok(())
    }

    /// Run a single control cycle.
    ///
    /// # Notes
    /// The position guard finishes before anything else. A fatal error of the
    /// setpoint service stops the cycle before any decision.
    ///
    /// # Returns
    /// Report of the cycle.
    pub fn step(&mut self) -> Result<CycleReport, ControllerError> {
        let now = Instant::now();
        let mut report = CycleReport::default();

        report.correction = self._guard.correct(&mut self.actuator);
        if let Some(correction) = &report.correction {
            warn!(
                "Position {} is out of [0, {}]. Corrected with {} {} steps to {}.",
                correction.position_before,
                self.config.max_position,
                correction.steps,
                correction.direction.as_ref(),
                correction.position_after
            );

            self.telemetry.count_correction += u64::from(correction.steps);
            self._events
                .push(Event::get_message_position_corrected(correction));
        }

        report.measured_temperature = match self.read_measured_temperature() {
            Ok(temperature) => Some(temperature),
            Err(error) => {
                self.skip_cycle(error)?;
                None
            }
        };

        if let Some(measured) = report.measured_temperature {
            report.setpoint = match self.setpoint_service.exchange(measured) {
                Ok(setpoint) => Some(setpoint),
                Err(error) if error.is_cycle_local() => {
                    self.skip_cycle(error)?;
                    None
                }
                Err(error) => return Err(self.fail(error)),
            };
        }

        if let (Some(measured), Some(setpoint)) = (report.measured_temperature, report.setpoint) {
            let position = self.actuator.position();
            report.motion = self._policy.decide(measured, setpoint, position);

            match &report.motion {
                Some(motion) => {
                    self.actuator.step(motion.direction, motion.steps);
                    self._events.push(Event::get_message_vent_moved(
                        motion,
                        self.actuator.position(),
                    ));
                }
                None => {
                    if measured != setpoint {
                        debug!("Vent is held at the position {position} by the rail guard.");
                    }
                }
            }
        }

        self.telemetry.measured_temperature = report.measured_temperature;
        self.telemetry.setpoint = report.setpoint;
        self.update_telemetry_counts();
        self.telemetry.count_cycle += 1;
        self.telemetry.cycle_time = now.elapsed().as_secs_f64();

        info!("{}", self.telemetry.get_status_line());
        debug!("{}", self.telemetry.get_message());

        Ok(report)
    }

    /// Run the controller until a fatal error or the stop request.
    ///
    /// # Notes
    /// The stop request is only checked between the cycles. A started step
    /// sequence always finishes.
    ///
    /// # Arguments
    /// * `stop` - Flag to stop the loop.
    pub fn run(&mut self, stop: &Arc<AtomicBool>) -> Result<(), ControllerError> {
        info!("Control loop is running.");

        let result = self.startup();
        self.publish_events();
        result?;

        while !stop.load(Ordering::Relaxed) {
            let result = self.step();
            self.publish_events();
            result?;

            if !self.wait_next_cycle(stop) {
                break;
            }
        }

        self.set_state(ControllerState::Stopped);
        self.publish_events();

        info!("Control loop is stopped.");

        Ok(())
    }

    /// Read the temperature and truncate it toward zero.
    ///
    /// # Returns
    /// Measured temperature in degree Celsius.
    fn read_measured_temperature(&mut self) -> Result<i32, ControllerError> {
        let temperature = self.sensor.read_temperature()?;
        if !temperature.is_finite() {
            return Err(ControllerError::Sensor(format!(
                "{temperature} is not a temperature"
            )));
        }

        Ok(temperature.trunc() as i32)
    }

    /// Skip the rest of the cycle or fail, based on the policy.
    ///
    /// # Arguments
    /// * `error` - Error that spoils the cycle.
    fn skip_cycle(&mut self, error: ControllerError) -> Result<(), ControllerError> {
        match self.config.malformed_setpoint_policy {
            MalformedSetpointPolicy::Skip => {
                warn!("Skip the decision of this cycle: {error}.");
                self._events.push(Event::get_message_cycle_skipped(&error));

                Ok(())
            }
            MalformedSetpointPolicy::Fatal => Err(self.fail(error)),
        }
    }

    fn update_telemetry_counts(&mut self) {
        self.telemetry.position = self.actuator.position();
        self.telemetry.count_forward = self.actuator.count_forward;
        self.telemetry.count_backward = self.actuator.count_backward;
    }

    fn publish_events(&mut self) {
        for event in self.get_events_and_clear() {
            info!("Event: {event}.");
        }
    }

    /// Wait for the cycle interval.
    ///
    /// # Arguments
    /// * `stop` - Flag to stop the loop.
    ///
    /// # Returns
    /// True if the next cycle should run. False if the stop is requested.
    fn wait_next_cycle(&self, stop: &Arc<AtomicBool>) -> bool {
        // No deadline if the interval is beyond the clock. Only the stop ends the wait.
        let deadline = Instant::now().checked_add(self.config.get_cycle_interval());
        let poll = Duration::from_millis(STOP_POLL_MS);

        loop {
            if stop.load(Ordering::Relaxed) {
                return false;
            }

            match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return true;
                    }

                    sleep(poll.min(deadline - now));
                }
                None => sleep(poll),
            }
        }
    }
}
