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

use std::collections::VecDeque;

use crate::error::ControllerError;
use crate::interface::setpoint_client::SetpointService;

/// Setpoint service that returns the scripted responses first and a fixed
/// setpoint afterwards.
pub struct MockSetpointService {
    _responses: VecDeque<Result<i32, ControllerError>>,
    _error_connect: Option<ControllerError>,
    // Setpoint after the scripted responses.
    pub setpoint: i32,
    // Reported measured temperatures.
    pub reported: Vec<i32>,
    pub is_connected: bool,
}

impl MockSetpointService {
    /// Create a new mock setpoint service.
    ///
    /// # Arguments
    /// * `setpoint` - Setpoint after the scripted responses.
    /// * `responses` - Scripted responses.
    ///
    /// # Returns
    /// A new mock setpoint service.
    pub fn new(setpoint: i32, responses: Vec<Result<i32, ControllerError>>) -> Self {
        Self {
            _responses: responses.into(),
            _error_connect: None,
            setpoint: setpoint,
            reported: Vec::new(),
            is_connected: false,
        }
    }

    /// Fail the connection with the error.
    ///
    /// # Arguments
    /// * `error` - Error of the connection.
    ///
    /// # Returns
    /// The mock setpoint service.
    pub fn with_connect_error(mut self, error: ControllerError) -> Self {
        self._error_connect = Some(error);
        self
    }
}

impl SetpointService for MockSetpointService {
    fn connect(&mut self) -> Result<(), ControllerError> {
        if let Some(error) = &self._error_connect {
            return Err(error.clone());
        }

        self.is_connected = true;
        Ok(())
    }

    fn exchange(&mut self, measured: i32) -> Result<i32, ControllerError> {
        self.reported.push(measured);

        self._responses.pop_front().unwrap_or(Ok(self.setpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange() {
        let mut service = MockSetpointService::new(
            21,
            vec![Ok(25), Err(ControllerError::RequestFailed(String::from("reset")))],
        );

        assert!(service.connect().is_ok());
        assert!(service.is_connected);

        assert_eq!(service.exchange(18), Ok(25));
        assert!(service.exchange(19).is_err());
        assert_eq!(service.exchange(20), Ok(21));
        assert_eq!(service.reported, vec![18, 19, 20]);
    }

    #[test]
    fn test_connect_error() {
        let mut service = MockSetpointService::new(21, Vec::new())
            .with_connect_error(ControllerError::ConnectionFailed(String::from("no wifi")));

        assert!(service.connect().is_err());
        assert!(!service.is_connected);
    }
}
