pub mod mock_coil;
pub mod mock_constants;
pub mod mock_sensor;
pub mod mock_setpoint_service;
