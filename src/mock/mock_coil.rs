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

use crate::control::coil::{Coil, CoilPhase};

/// Coil that counts and optionally records the applied phases.
#[derive(Clone, Debug, Default)]
pub struct MockCoil {
    // Applied phases. Only filled when the recording is on.
    pub phases: Vec<CoilPhase>,
    // Number of the applied phases.
    pub count_phase: u64,
    pub is_enabled: bool,
    _is_recording: bool,
}

impl MockCoil {
    /// Create a new mock coil.
    ///
    /// # Arguments
    /// * `is_recording` - Record the applied phases or not. Turn it off in a
    /// long simulation.
    ///
    /// # Returns
    /// A new mock coil.
    pub fn new(is_recording: bool) -> Self {
        Self {
            _is_recording: is_recording,
            ..Default::default()
        }
    }
}

impl Coil for MockCoil {
    fn enable(&mut self, is_enabled: bool) {
        self.is_enabled = is_enabled;
    }

    fn apply(&mut self, phase: &CoilPhase) {
        self.count_phase += 1;
        if self._is_recording {
            self.phases.push(*phase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::coil::SEQUENCE_FORWARD;

    #[test]
    fn test_apply() {
        let mut coil = MockCoil::new(true);
        coil.enable(true);
        coil.apply(&SEQUENCE_FORWARD[0]);

        assert!(coil.is_enabled);
        assert_eq!(coil.count_phase, 1);
        assert_eq!(coil.phases, vec![SEQUENCE_FORWARD[0]]);
    }

    #[test]
    fn test_apply_without_recording() {
        let mut coil = MockCoil::new(false);
        coil.apply(&SEQUENCE_FORWARD[0]);
        coil.apply(&SEQUENCE_FORWARD[1]);

        assert_eq!(coil.count_phase, 2);
        assert!(coil.phases.is_empty());
    }
}
