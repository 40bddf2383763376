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

use std::cmp::Ordering;

use crate::enums::Direction;

/// Motion decided for a single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub direction: Direction,
    pub steps: u32,
}

pub struct DecisionPolicy {
    // Maximum allowed position in steps.
    pub max_position: i32,
    // Divisor of the maximum position to get the steps of a single move.
    pub step_amount: i32,
}

impl DecisionPolicy {
    /// Policy that turns the comparison of the measured temperature and the
    /// setpoint into a move of the vent.
    ///
    /// # Notes
    /// Too cold closes the vent and too hot opens it, by a fixed batch of
    /// (max_position / step_amount) + 1 steps. A move is only issued when the
    /// position allows it: closing needs 0 < position <= max_position and
    /// opening needs 0 <= position < max_position. At a rail the move is
    /// dropped even if the temperatures still differ.
    ///
    /// # Arguments
    /// * `max_position` - Maximum allowed position in steps.
    /// * `step_amount` - Divisor of the maximum position. Should be positive.
    ///
    /// # Returns
    /// A new decision policy.
    pub fn new(max_position: i32, step_amount: i32) -> Self {
        Self {
            max_position: max_position,
            step_amount: step_amount,
        }
    }

    /// Number of steps of a single move.
    pub fn steps_per_move(&self) -> u32 {
        (self.max_position / self.step_amount)
            .saturating_add(1)
            .unsigned_abs()
    }

    /// Decide the move.
    ///
    /// # Arguments
    /// * `measured` - Measured temperature in degree Celsius.
    /// * `setpoint` - Desired temperature in degree Celsius.
    /// * `position` - Current position in steps.
    ///
    /// # Returns
    /// The move. None if nothing should move in this cycle.
    pub fn decide(&self, measured: i32, setpoint: i32, position: i32) -> Option<Move> {
        match measured.cmp(&setpoint) {
            Ordering::Equal => None,
            Ordering::Less => {
                if position > 0 && position <= self.max_position {
                    Some(Move {
                        direction: Direction::Backward,
                        steps: self.steps_per_move(),
                    })
                } else {
                    None
                }
            }
            Ordering::Greater => {
                if position >= 0 && position < self.max_position {
                    Some(Move {
                        direction: Direction::Forward,
                        steps: self.steps_per_move(),
                    })
                } else {
                    None
                }
            }
        }
    }
}
