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

use log::error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::NUM_COIL_PHASE;
use crate::enums::Direction;

/// Logic levels of the four coil lines A, B, C and D.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoilPhase {
    pub a: bool,
    pub b: bool,
    pub c: bool,
    pub d: bool,
}

impl CoilPhase {
    /// Create a new coil phase.
    pub const fn new(a: bool, b: bool, c: bool, d: bool) -> Self {
        Self { a, b, c, d }
    }

    /// Levels in the order of A, B, C and D.
    pub fn levels(&self) -> [bool; 4] {
        [self.a, self.b, self.c, self.d]
    }
}

// Phases of a single forward step. The backward step swaps the roles of A and
// B.
pub static SEQUENCE_FORWARD: [CoilPhase; NUM_COIL_PHASE] = [
    CoilPhase::new(false, true, true, false),
    CoilPhase::new(false, true, false, true),
    CoilPhase::new(true, false, false, true),
    CoilPhase::new(true, false, true, false),
];

pub static SEQUENCE_BACKWARD: [CoilPhase; NUM_COIL_PHASE] = [
    CoilPhase::new(true, false, true, false),
    CoilPhase::new(true, false, false, true),
    CoilPhase::new(false, true, false, true),
    CoilPhase::new(false, true, true, false),
];

/// Get the phase sequence of a single step.
///
/// # Arguments
/// * `direction` - Direction of the step.
///
/// # Returns
/// Phase sequence.
pub fn get_sequence(direction: Direction) -> &'static [CoilPhase; NUM_COIL_PHASE] {
    match direction {
        Direction::Forward => &SEQUENCE_FORWARD,
        Direction::Backward => &SEQUENCE_BACKWARD,
    }
}

/// Output lines of the stepper bridge.
///
/// The lines are assumed always drivable. Implementations report their
/// failures through the log instead of the caller.
pub trait Coil {
    /// Enable or disable the bridge.
    ///
    /// # Arguments
    /// * `is_enabled` - Enable the bridge or not.
    fn enable(&mut self, is_enabled: bool);

    /// Drive the coil lines to the phase.
    ///
    /// # Arguments
    /// * `phase` - Phase to apply.
    fn apply(&mut self, phase: &CoilPhase);
}

/// Coil lines exported through the Linux sysfs GPIO interface.
pub struct SysfsGpioCoil {
    _lines_coil: Vec<PathBuf>,
    _lines_enable: Vec<PathBuf>,
    // A write has failed already. Only the first failure is logged.
    _has_failed: bool,
}

impl SysfsGpioCoil {
    /// Create a new sysfs GPIO coil.
    ///
    /// # Arguments
    /// * `root` - Root directory of the GPIO interface, normally
    /// /sys/class/gpio.
    /// * `lines_coil` - GPIO lines of the coils A, B, C and D.
    /// * `lines_enable` - GPIO lines of the bridge enables.
    ///
    /// # Returns
    /// A new sysfs GPIO coil.
    pub fn new(root: &Path, lines_coil: &[u32], lines_enable: &[u32]) -> Self {
        Self {
            _lines_coil: Self::get_value_files(root, lines_coil),
            _lines_enable: Self::get_value_files(root, lines_enable),
            _has_failed: false,
        }
    }

    fn get_value_files(root: &Path, lines: &[u32]) -> Vec<PathBuf> {
        lines
            .iter()
            .map(|line| root.join(format!("gpio{line}")).join("value"))
            .collect()
    }

    /// Write the level to the value file.
    ///
    /// # Arguments
    /// * `index` - Index of the line.
    /// * `is_enable_line` - The line is an enable line or a coil line.
    /// * `level` - Level to write.
    fn write(&mut self, index: usize, is_enable_line: bool, level: bool) {
        let lines = if is_enable_line {
            &self._lines_enable
        } else {
            &self._lines_coil
        };

        if let Some(filepath) = lines.get(index) {
            if let Err(write_error) = fs::write(filepath, if level { "1" } else { "0" }) {
                if !self._has_failed {
                    error!("Failed to drive the GPIO {:?}: {write_error}.", filepath);
                    self._has_failed = true;
                }
            }
        }
    }
}

impl Coil for SysfsGpioCoil {
    fn enable(&mut self, is_enabled: bool) {
        for index in 0..self._lines_enable.len() {
            self.write(index, true, is_enabled);
        }
    }

    fn apply(&mut self, phase: &CoilPhase) {
        for (index, level) in phase.levels().iter().enumerate() {
            self.write(index, false, *level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn create_gpio_root(lines: &[u32]) -> TempDir {
        let root = tempdir().expect("Should create the temporary directory.");
        for line in lines {
            let directory = root.path().join(format!("gpio{line}"));
            fs::create_dir(&directory).unwrap();
            fs::write(directory.join("value"), "0").unwrap();
        }

        root
    }

    fn read_level(root: &Path, line: u32) -> String {
        fs::read_to_string(root.join(format!("gpio{line}")).join("value")).unwrap()
    }

    #[test]
    fn test_sequence_mirror() {
        // The backward step is the forward step with A and B swapped.
        for (forward, backward) in SEQUENCE_FORWARD.iter().zip(SEQUENCE_BACKWARD.iter()) {
            assert_eq!(forward.a, backward.b);
            assert_eq!(forward.b, backward.a);
            assert_eq!(forward.c, backward.c);
            assert_eq!(forward.d, backward.d);
        }
    }

    #[test]
    fn test_sequence_complementary_lines() {
        for phase in SEQUENCE_FORWARD.iter().chain(SEQUENCE_BACKWARD.iter()) {
            assert_ne!(phase.a, phase.b);
            assert_ne!(phase.c, phase.d);
        }
    }

    #[test]
    fn test_get_sequence() {
        assert_eq!(get_sequence(Direction::Forward), &SEQUENCE_FORWARD);
        assert_eq!(get_sequence(Direction::Backward), &SEQUENCE_BACKWARD);

        assert_eq!(
            get_sequence(Direction::Forward)[0].levels(),
            [false, true, true, false]
        );
        assert_eq!(
            get_sequence(Direction::Backward)[0].levels(),
            [true, false, true, false]
        );
    }

    #[test]
    fn test_sysfs_gpio_coil() {
        let root = create_gpio_root(&[1, 2, 3, 4, 5, 6]);
        let mut coil = SysfsGpioCoil::new(root.path(), &[1, 2, 3, 4], &[5, 6]);

        coil.enable(true);
        assert_eq!(read_level(root.path(), 5), "1");
        assert_eq!(read_level(root.path(), 6), "1");

        coil.apply(&SEQUENCE_FORWARD[2]);
        assert_eq!(read_level(root.path(), 1), "1");
        assert_eq!(read_level(root.path(), 2), "0");
        assert_eq!(read_level(root.path(), 3), "0");
        assert_eq!(read_level(root.path(), 4), "1");

        coil.enable(false);
        assert_eq!(read_level(root.path(), 5), "0");
    }

    #[test]
    fn test_sysfs_gpio_coil_missing_line() {
        let root = create_gpio_root(&[]);
        let mut coil = SysfsGpioCoil::new(root.path(), &[1, 2, 3, 4], &[5, 6]);

        coil.apply(&SEQUENCE_FORWARD[0]);

        assert!(coil._has_failed);
    }
}
