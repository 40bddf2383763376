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

use crate::control::actuator::{Actuator, Position};
use crate::control::coil::Coil;
use crate::enums::{Direction, GuardArithmetic};

/// Correction done by the position guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correction {
    pub direction: Direction,
    pub steps: u32,
    pub position_before: i32,
    pub position_after: i32,
}

pub struct PositionGuard {
    // Maximum allowed position in steps.
    pub max_position: i32,
    pub arithmetic: GuardArithmetic,
}

impl PositionGuard {
    /// Position guard that pulls an out-of-range position back to the travel
    /// range [0, max_position].
    ///
    /// # Notes
    /// The number of steps is decided from the position before any step is
    /// done, so the counter moving during the correction does not change the
    /// number of steps.
    ///
    /// # Arguments
    /// * `max_position` - Maximum allowed position in steps.
    /// * `arithmetic` - Arithmetic to count the correction steps.
    ///
    /// # Returns
    /// A new position guard.
    pub fn new(max_position: i32, arithmetic: GuardArithmetic) -> Self {
        Self {
            max_position: max_position,
            arithmetic: arithmetic,
        }
    }

    /// Plan the correction of the position.
    ///
    /// # Arguments
    /// * `position` - Current position in steps.
    ///
    /// # Returns
    /// Direction and number of steps. None if the position is in range.
    pub fn plan(&self, position: i32) -> Option<(Direction, u32)> {
        if Position::new(position).is_within(self.max_position) {
            return None;
        }

        let extra = match self.arithmetic {
            GuardArithmetic::Exact => 0,
            GuardArithmetic::Inclusive => 1,
        };

        if position < 0 {
            Some((Direction::Forward, position.unsigned_abs() + extra))
        } else {
            Some((
                Direction::Backward,
                position.abs_diff(self.max_position) + extra,
            ))
        }
    }

    /// Correct the position of the actuator. All steps are done before
    /// returning.
    ///
    /// # Arguments
    /// * `actuator` - Actuator to correct.
    ///
    /// # Returns
    /// The correction. None if the position is in range.
    pub fn correct<C: Coil>(&self, actuator: &mut Actuator<C>) -> Option<Correction> {
        let position_before = actuator.position();
        let (direction, steps) = self.plan(position_before)?;

        actuator.step(direction, steps);

        Some(Correction {
            direction: direction,
            steps: steps,
            position_before: position_before,
            position_after: actuator.position(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::mock::mock_coil::MockCoil;

    fn create_actuator(position: i32) -> Actuator<MockCoil> {
        let mut actuator = Actuator::new(MockCoil::new(false), Duration::ZERO);
        actuator.set_position(position);

        actuator
    }

    #[test]
    fn test_plan_in_range() {
        let guard = PositionGuard::new(2000, GuardArithmetic::Exact);

        assert_eq!(guard.plan(0), None);
        assert_eq!(guard.plan(1000), None);
        assert_eq!(guard.plan(2000), None);
    }

    #[test]
    fn test_plan_exact() {
        let guard = PositionGuard::new(2000, GuardArithmetic::Exact);

        assert_eq!(guard.plan(-1), Some((Direction::Forward, 1)));
        assert_eq!(guard.plan(-37), Some((Direction::Forward, 37)));
        assert_eq!(guard.plan(2301), Some((Direction::Backward, 301)));
    }

    #[test]
    fn test_plan_inclusive() {
        let guard = PositionGuard::new(2000, GuardArithmetic::Inclusive);

        assert_eq!(guard.plan(-37), Some((Direction::Forward, 38)));
        assert_eq!(guard.plan(2301), Some((Direction::Backward, 302)));
        assert_eq!(guard.plan(2000), None);
    }

    #[test]
    fn test_correct_below_zero() {
        let guard = PositionGuard::new(2000, GuardArithmetic::Exact);
        let mut actuator = create_actuator(-25);

        let correction = guard.correct(&mut actuator);

        assert_eq!(
            correction,
            Some(Correction {
                direction: Direction::Forward,
                steps: 25,
                position_before: -25,
                position_after: 0,
            })
        );
        assert_eq!(actuator.position(), 0);
        assert_eq!(actuator.count_forward, 25);
        assert_eq!(actuator.count_backward, 0);
    }

    #[test]
    fn test_correct_above_max() {
        let guard = PositionGuard::new(2000, GuardArithmetic::Exact);
        let mut actuator = create_actuator(2301);

        let correction = guard.correct(&mut actuator).unwrap();

        assert_eq!(correction.direction, Direction::Backward);
        assert_eq!(correction.steps, 301);
        assert_eq!(actuator.position(), 2000);
        assert_eq!(actuator.count_backward, 301);
    }

    #[test]
    fn test_correct_inclusive() {
        let guard = PositionGuard::new(2000, GuardArithmetic::Inclusive);

        let mut actuator = create_actuator(-25);
        let correction = guard.correct(&mut actuator).unwrap();
        assert_eq!(correction.steps, 26);
        assert_eq!(actuator.position(), 1);

        let mut actuator = create_actuator(2301);
        let correction = guard.correct(&mut actuator).unwrap();
        assert_eq!(correction.steps, 302);
        assert_eq!(actuator.position(), 1999);
    }

    #[test]
    fn test_correct_in_range() {
        let guard = PositionGuard::new(2000, GuardArithmetic::Exact);
        let mut actuator = create_actuator(2000);

        assert_eq!(guard.correct(&mut actuator), None);
        assert_eq!(actuator.position(), 2000);
        assert_eq!(actuator.coil.count_phase, 0);
    }

    #[test]
    fn test_correct_converges() {
        // A second pass of the guard is always a no-op.
        for arithmetic in [GuardArithmetic::Exact, GuardArithmetic::Inclusive] {
            let guard = PositionGuard::new(2000, arithmetic);
            for position in [-500, -1, 2001, 4000] {
                let mut actuator = create_actuator(position);
                guard.correct(&mut actuator);

                assert!(actuator.position() >= 0 && actuator.position() <= 2000);
                assert_eq!(guard.correct(&mut actuator), None);
            }
        }
    }
}
