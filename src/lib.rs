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

//! # Window Vent Controller
//!
//! This library drives a stepper actuator of a window vent toward the
//! position that brings the measured temperature closer to the setpoint of a
//! remote service.
pub mod application;
pub mod config;
pub mod constants;
pub mod control;
pub mod enums;
pub mod error;
pub mod interface;
pub mod mock;
pub mod telemetry;
pub mod utility;
