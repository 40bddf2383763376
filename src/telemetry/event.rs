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

use serde_json::{json, Value};

use crate::control::decision::Move;
use crate::control::position_guard::Correction;
use crate::enums::ControllerState;
use crate::error::ControllerError;

pub struct Event;
impl Event {
    /// Get the message of the controller state.
    ///
    /// # Arguments
    /// * `state` - Controller state.
    ///
    /// # Returns
    /// The message of the controller state.
    pub fn get_message_controller_state(state: ControllerState) -> Value {
        json!({
            "id": "controllerState",
            "state": state.as_ref(),
        })
    }

    /// Get the message of the position correction.
    ///
    /// # Arguments
    /// * `correction` - Correction done by the position guard.
    ///
    /// # Returns
    /// The message of the position correction.
    pub fn get_message_position_corrected(correction: &Correction) -> Value {
        json!({
            "id": "positionCorrected",
            "direction": correction.direction.as_ref(),
            "steps": correction.steps,
            "positionBefore": correction.position_before,
            "positionAfter": correction.position_after,
        })
    }

    /// Get the message of the vent motion.
    ///
    /// # Arguments
    /// * `motion` - Decided move.
    /// * `position` - Position after the move.
    ///
    /// # Returns
    /// The message of the vent motion.
    pub fn get_message_vent_moved(motion: &Move, position: i32) -> Value {
        json!({
            "id": "ventMoved",
            "direction": motion.direction.as_ref(),
            "steps": motion.steps,
            "position": position,
        })
    }

    /// Get the message of the skipped cycle.
    ///
    /// # Arguments
    /// * `error` - Error that spoils the cycle.
    ///
    /// # Returns
    /// The message of the skipped cycle.
    pub fn get_message_cycle_skipped(error: &ControllerError) -> Value {
        json!({
            "id": "cycleSkipped",
            "reason": error.to_string(),
        })
    }
}
