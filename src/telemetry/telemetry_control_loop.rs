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

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryControlLoop {
    // Measured temperature of the last cycle in degree Celsius. None if the
    // reading was not usable.
    pub measured_temperature: Option<i32>,
    // Setpoint of the last cycle in degree Celsius. None if the response was
    // not usable.
    pub setpoint: Option<i32>,
    // Position of the actuator in steps.
    pub position: i32,
    // Cumulative steps in each direction.
    pub count_forward: u64,
    pub count_backward: u64,
    // Cumulative steps issued by the position guard. A growing value means
    // the counted position drifts away from the travel range.
    pub count_correction: u64,
    // Number of the finished cycles.
    pub count_cycle: u64,
    // Cycle time in second.
    pub cycle_time: f64,
}

impl TelemetryControlLoop {
    /// Create a new control-loop telemetry object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the telemetry message.
    ///
    /// # Returns
    /// The message.
    pub fn get_message(&self) -> Value {
        let mut message = json!({"id": "controlLoop"});
        if let (Value::Object(message), Ok(Value::Object(fields))) =
            (&mut message, serde_json::to_value(self))
        {
            message.extend(fields);
        }

        message
    }

    /// Get the human-readable status line.
    ///
    /// # Returns
    /// The status line.
    pub fn get_status_line(&self) -> String {
        format!(
            "temp: {}, res: {}, pos: {}",
            Self::format_option(self.measured_temperature),
            Self::format_option(self.setpoint),
            self.position
        )
    }

    fn format_option(value: Option<i32>) -> String {
        value.map_or(String::from("n/a"), |value| value.to_string())
    }
}
