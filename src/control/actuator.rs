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

use std::thread::sleep;
use std::time::Duration;

use crate::control::coil::{get_sequence, Coil};
use crate::enums::Direction;

/// Position of the actuator counted in steps.
///
/// The value is an open-loop estimate of the vent opening. It is never clamped
/// here. Keeping it in range is the job of the position guard and the decision
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position(i32);

impl Position {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    /// One step toward the open side.
    pub fn advance(self) -> Self {
        Self(self.0 + 1)
    }

    /// One step toward the closed side.
    pub fn retreat(self) -> Self {
        Self(self.0 - 1)
    }

    /// The position is in [0, max_position] or not.
    pub fn is_within(&self, max_position: i32) -> bool {
        (0..=max_position).contains(&self.0)
    }
}

pub struct Actuator<C: Coil> {
    // Output lines of the stepper bridge.
    pub coil: C,
    _position: Position,
    // Time to hold each phase of a step.
    _step_sleep: Duration,
    // Cumulative number of steps in each direction.
    pub count_forward: u64,
    pub count_backward: u64,
}

impl<C: Coil> Actuator<C> {
    /// Create a new actuator at the position 0.
    ///
    /// # Arguments
    /// * `coil` - Output lines of the stepper bridge.
    /// * `step_sleep` - Time to hold each phase of a step.
    ///
    /// # Returns
    /// A new actuator.
    pub fn new(coil: C, step_sleep: Duration) -> Self {
        Self {
            coil: coil,
            _position: Position::default(),
            _step_sleep: step_sleep,
            count_forward: 0,
            count_backward: 0,
        }
    }

    /// Get the current position in steps.
    pub fn position(&self) -> i32 {
        self._position.value()
    }

    /// Overwrite the position counter without moving the motor.
    ///
    /// # Arguments
    /// * `position` - New position in steps.
    pub fn set_position(&mut self, position: i32) {
        self._position = Position::new(position);
    }

    /// Do a single step toward the open side. Blocks until the last phase has
    /// been held.
    pub fn step_forward(&mut self) {
        self.drive(Direction::Forward);
        self._position = self._position.advance();
        self.count_forward += 1;
    }

    /// Do a single step toward the closed side. Blocks until the last phase
    /// has been held.
    pub fn step_backward(&mut self) {
        self.drive(Direction::Backward);
        self._position = self._position.retreat();
        self.count_backward += 1;
    }

    /// Do the steps in a direction.
    ///
    /// # Arguments
    /// * `direction` - Direction of the steps.
    /// * `count` - Number of the steps.
    pub fn step(&mut self, direction: Direction, count: u32) {
        for _ in 0..count {
            match direction {
                Direction::Forward => self.step_forward(),
                Direction::Backward => self.step_backward(),
            }
        }
    }

    /// Drive the phase sequence of a single step.
    ///
    /// # Arguments
    /// * `direction` - Direction of the step.
    fn drive(&mut self, direction: Direction) {
        self.coil.enable(true);

        for phase in get_sequence(direction) {
            self.coil.apply(phase);
            if !self._step_sleep.is_zero() {
                sleep(self._step_sleep);
            }
        }
    }
}
