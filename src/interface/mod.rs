pub mod sensor;
pub mod setpoint_client;
