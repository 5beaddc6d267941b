//! Detection constants and default tuning parameters.
//!
//! These are defaults for [`crate::config::DetectionConfig`]; every value can
//! be overridden per level.

/// Nominal simulation tick rate (Hz) used by the headless runner.
pub const TICK_RATE: u32 = 30;

/// Seconds per tick at the nominal rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Alert thresholds ---

/// Strength above which the alert state rises to CAUTION.
pub const CAUTION_THRESHOLD: f64 = 0.2;

/// Strength above which the alert state rises to ALERT.
pub const ALERT_THRESHOLD: f64 = 0.5;

/// Strength above which the alert state rises to DISCOVERED.
pub const DISCOVERED_THRESHOLD: f64 = 0.8;

/// Seconds an ALERT/DISCOVERED state persists after the last strong detection.
pub const ALERT_TIMEOUT_SECS: f64 = 30.0;

// --- Mission ---

/// Seconds DISCOVERED must hold continuously before the mission fails.
pub const DISCOVERED_FAILURE_SECS: f64 = 10.0;

// --- Audio ---

/// Noise level that maps to full audio strength.
pub const AUDIO_REFERENCE_MAX: f64 = 10.0;

/// Sensitivity used by audio-kind detectors (zones carry their own).
pub const DEFAULT_AUDIO_SENSITIVITY: f64 = 1.0;

// --- Motion ---

/// Minimum target speed (units/s) a motion sensor reacts to.
pub const MOTION_MIN_SPEED: f64 = 1.0;

// --- Suspicion ---

/// Suspicion gained per second at full detection strength.
pub const SUSPICION_GAIN_PER_SEC: f64 = 1.0;

/// Suspicion lost per second while undetected.
pub const SUSPICION_DECAY_PER_SEC: f64 = 0.25;

/// Default strength a sensor must exceed to raise a `SensorDetection` event.
pub const DEFAULT_EVENT_THRESHOLD: f64 = 0.0;

// --- Geometry ---

/// Full circle in degrees; a field of view of this size is omnidirectional.
pub const FULL_CIRCLE_DEG: f64 = 360.0;

/// Tolerance used by segment intersection tests.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Distance from a detector's own position before obstacles can block its
/// sight line. Detectors mounted flush on a wall still see away from it.
pub const EYE_CLEARANCE: f64 = 1e-6;
