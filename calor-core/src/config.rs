//! Fixed timing and limit constants
//!
//! Run-time configuration is the persisted [`Settings`](crate::Settings)
//! record; everything here is compiled in.

/// How long the boot logo is shown before the main view (ms)
pub const LOGO_DURATION_MS: u32 = 2000;

/// Menu/main inactivity after which the UI falls back to the main view (ms)
pub const INTERACTION_TIMEOUT_MS: u32 = 20_000;

/// Blink phase toggle interval (ms)
pub const BLINK_INTERVAL_MS: u32 = 250;

/// Telemetry line interval (ms)
pub const TELEMETRY_INTERVAL_MS: u32 = 5000;

/// Window of the temperature-delta sampler used for automatic wake (ms)
pub const TEMPERATURE_SAMPLE_MS: u32 = 1000;

/// Temperature change per sample window below which standby wakes up.
/// The comparison is strict: exactly this value does not wake.
pub const AUTO_WAKE_DELTA: f32 = -20.0;

/// Setpoint change per encoder detent in the main view (degrees)
pub const SETPOINT_STEP: f32 = 5.0;

/// Lowest setpoint reachable while active (degrees)
pub const MIN_SETPOINT: f32 = 100.0;

/// Highest setpoint reachable while active (degrees)
pub const MAX_SETPOINT: f32 = 400.0;

/// PID sample time (ms)
pub const PID_SAMPLE_TIME_MS: u32 = 100;

/// Measured temperature at which the heater is forced off (degrees)
pub const MAX_SAFE_TEMPERATURE: f32 = 450.0;
