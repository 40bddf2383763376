pub mod actuator;
pub mod coil;
pub mod control_loop;
pub mod decision;
pub mod position_guard;
