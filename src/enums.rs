use strum_macros::{AsRefStr, EnumString, VariantNames};

/// Direction of an actuator step.
///
/// Forward opens the vent and increments the position. Backward closes the
/// vent and decrements the position.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, AsRefStr)]
pub enum Direction {
    Forward,
    Backward,
}

/// State of the control loop.
#[derive(Debug, PartialEq, Eq, Clone, Copy, AsRefStr)]
pub enum ControllerState {
    Startup,
    Running,
    Failed,
    Stopped,
}

/// Arithmetic used by the position guard to count the correction steps.
#[derive(Debug, PartialEq, Eq, Clone, Copy, EnumString, AsRefStr, VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum GuardArithmetic {
    // Land exactly on the violated rail.
    Exact,
    // One extra step, landing one step inside the violated rail.
    Inclusive,
}

/// Reaction to a reading that can not be used in the current cycle.
#[derive(Debug, PartialEq, Eq, Clone, Copy, EnumString, AsRefStr, VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum MalformedSetpointPolicy {
    Skip,
    Fatal,
}
