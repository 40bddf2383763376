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

use thiserror::Error;

use crate::constants::{
    EXIT_CODE_CONFIG, EXIT_CODE_MALFORMED_SETPOINT, EXIT_CODE_REQUEST, EXIT_CODE_SETUP,
};

/// Errors of the vent controller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControllerError {
    #[error("no network interface: {0}")]
    NoNetworkInterface(String),
    #[error("connection error: {0}")]
    ConnectionFailed(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("setpoint response {body:?} is not an integer")]
    MalformedSetpoint { body: String },
    #[error("sensor error: {0}")]
    Sensor(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl ControllerError {
    /// Exit code of the process that stops with this error.
    ///
    /// # Returns
    /// Exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            ControllerError::NoNetworkInterface(_)
            | ControllerError::ConnectionFailed(_)
            | ControllerError::Sensor(_) => EXIT_CODE_SETUP,
            ControllerError::RequestFailed(_) => EXIT_CODE_REQUEST,
            ControllerError::MalformedSetpoint { .. } => EXIT_CODE_MALFORMED_SETPOINT,
            ControllerError::Config(_) => EXIT_CODE_CONFIG,
        }
    }

    /// The error only spoils the current cycle or not. The reaction to these
    /// errors follows the configured policy.
    ///
    /// # Returns
    /// True if the error is limited to a single cycle. Otherwise, false.
    pub fn is_cycle_local(&self) -> bool {
        matches!(
            self,
            ControllerError::MalformedSetpoint { .. } | ControllerError::Sensor(_)
        )
    }
}

impl From<config::ConfigError> for ControllerError {
    fn from(error: config::ConfigError) -> Self {
        ControllerError::Config(error.to_string())
    }
}
