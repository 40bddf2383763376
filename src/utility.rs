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

use config::{Config, ConfigError};
use std::path::Path;
use std::str::FromStr;

use crate::enums::{GuardArithmetic, MalformedSetpointPolicy};
use crate::error::ControllerError;

/// A trait to parse the configuration value.
pub trait ConfigValue: Sized {
    /// Parse the configuration value.
    ///
    /// # Parameters
    /// * `s` - String to parse.
    ///
    /// # Returns
    /// The parsed configuration value.
    fn parse_value(s: &str) -> Result<Self, ControllerError>;
}

/// Parse the string with the FromStr implementation of the type.
///
/// # Parameters
/// * `s` - String to parse.
/// * `type_name` - Name of the type used in the error message.
///
/// # Returns
/// The parsed value.
fn parse_from_str<T: FromStr>(s: &str, type_name: &str) -> Result<T, ControllerError> {
    s.trim()
        .parse::<T>()
        .map_err(|_| ControllerError::Config(format!("{s} should parse as {type_name}")))
}

impl ConfigValue for String {
    fn parse_value(s: &str) -> Result<Self, ControllerError> {
        Ok(s.to_string())
    }
}

impl ConfigValue for i32 {
    fn parse_value(s: &str) -> Result<Self, ControllerError> {
        parse_from_str(s, "i32")
    }
}

impl ConfigValue for u32 {
    fn parse_value(s: &str) -> Result<Self, ControllerError> {
        parse_from_str(s, "u32")
    }
}

impl ConfigValue for u64 {
    fn parse_value(s: &str) -> Result<Self, ControllerError> {
        parse_from_str(s, "u64")
    }
}

impl ConfigValue for GuardArithmetic {
    fn parse_value(s: &str) -> Result<Self, ControllerError> {
        parse_from_str(s, "guard arithmetic")
    }
}

impl ConfigValue for MalformedSetpointPolicy {
    fn parse_value(s: &str) -> Result<Self, ControllerError> {
        parse_from_str(s, "malformed setpoint policy")
    }
}

/// Get the configuation from the file.
///
/// # Parameters
/// * `filepath` - Path to the config file.
///
/// # Returns
/// The configuration.
pub fn get_config(filepath: &Path) -> Result<Config, ControllerError> {
    let name = filepath.to_str().ok_or_else(|| {
        ControllerError::Config(format!("{:?} is not a valid file name", filepath))
    })?;

    Ok(Config::builder()
        .add_source(config::File::with_name(name))
        .build()?)
}

/// Get the parameter from the configuration.
///
/// # Parameters
/// * `config` - Configuration.
/// * `key` - Key to find the parameter in the configuration.
///
/// # Returns
/// The parameter.
pub fn get_parameter<T: ConfigValue>(config: &Config, key: &str) -> Result<T, ControllerError> {
    let value = config.get_string(key)?;

    T::parse_value(&value)
}

/// Get the parameter from the configuration or the default value if the key
/// does not exist.
///
/// # Parameters
/// * `config` - Configuration.
/// * `key` - Key to find the parameter in the configuration.
/// * `default` - Default value.
///
/// # Returns
/// The parameter.
pub fn get_parameter_or<T: ConfigValue>(
    config: &Config,
    key: &str,
    default: T,
) -> Result<T, ControllerError> {
    match config.get_string(key) {
        Ok(value) => T::parse_value(&value),
        Err(ConfigError::NotFound(_)) => Ok(default),
        Err(error) => Err(error.into()),
    }
}

/// Get the array parameter from the configuration.
///
/// # Parameters
/// * `config` - Configuration.
/// * `key` - Key to find the parameter in the configuration.
///
/// # Returns
/// The array parameter.
pub fn get_parameter_array<T: ConfigValue>(
    config: &Config,
    key: &str,
) -> Result<Vec<T>, ControllerError> {
    config
        .get_array(key)?
        .into_iter()
        .map(|value| {
            value
                .into_string()
                .map_err(ControllerError::from)
                .and_then(|s| T::parse_value(&s))
        })
        .collect()
}
