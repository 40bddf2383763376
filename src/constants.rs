pub const DEFAULT_MAX_POSITION: i32 = 2000;
pub const DEFAULT_STEP_SLEEP_MS: u64 = 1;
pub const DEFAULT_CYCLE_INTERVAL_MINUTES: u64 = 5;
pub const DEFAULT_STEP_AMOUNT: i32 = 5;

// Stepper coils
pub const NUM_COIL_PHASE: usize = 4;
pub const NUM_COIL_LINE: usize = 4;
pub const NUM_ENABLE_LINE: usize = 2;

pub const GPIO_ROOT: &str = "/sys/class/gpio";

// Query parameters of the setpoint service
pub const QUERY_KEY_TEMPERATURE: &str = "temp";
pub const QUERY_KEY_TOKEN: &str = "token";

// Poll period of the stop flag while waiting for the next cycle.
pub const STOP_POLL_MS: u64 = 100;

pub const SECONDS_PER_MINUTE: u64 = 60;

// The file sensor reports millidegree Celsius.
pub const MILLIDEGREE_PER_DEGREE: f64 = 1000.0;

pub const DEFAULT_CONFIG_FILE: &str = "config/parameters_app.yaml";
pub const LOG_FILE: &str = "vent_controller.log";

// Exit codes of the process
pub const EXIT_CODE_STOPPED: i32 = 0;
pub const EXIT_CODE_REQUEST: i32 = 1;
pub const EXIT_CODE_CONFIG: i32 = 2;
pub const EXIT_CODE_MALFORMED_SETPOINT: i32 = 3;
pub const EXIT_CODE_SETUP: i32 = -1;
