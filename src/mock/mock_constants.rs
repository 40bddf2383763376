// Simulated ambient temperature in degree Celsius. The reading swings around
// the base value with the period counted in readings.
pub const SIMULATION_TEMPERATURE_BASE: f64 = 21.0;
pub const SIMULATION_TEMPERATURE_AMPLITUDE: f64 = 3.5;
pub const SIMULATION_TEMPERATURE_PERIOD: f64 = 24.0;

// Setpoint returned by the simulated setpoint service.
pub const SIMULATION_SETPOINT: i32 = 21;
