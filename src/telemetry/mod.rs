pub mod event;
pub mod telemetry_control_loop;
