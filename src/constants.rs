//! Application-wide constants and configuration defaults.

/// Default latitude when no location is configured (Mecca).
pub const DEFAULT_LATITUDE: f64 = 21.4225;
/// Default longitude when no location is configured (Mecca).
pub const DEFAULT_LONGITUDE: f64 = 39.8262;
/// Default observer altitude in meters.
pub const DEFAULT_ALTITUDE: f64 = 0.0;
/// Default juristic method for Asr and Isha calculation.
pub const DEFAULT_MADHAB: &str = "hanafi";
/// Default Hijri date adjustment in days.
pub const DEFAULT_HIJRI_ADJUSTMENT: i64 = 0;
/// Whether desktop notifications are enabled by default.
pub const DEFAULT_NOTIFICATIONS_ENABLED: bool = true;
/// Default freedesktop sound name for prayer alerts.
pub const DEFAULT_ALERT_SOUND: &str = "alarm-clock-elapsed";

/// Valid latitude range in degrees.
pub const MINIMUM_LATITUDE: f64 = -90.0;
pub const MAXIMUM_LATITUDE: f64 = 90.0;
/// Valid longitude range in degrees.
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;
/// Valid Hijri adjustment range in days.
pub const MINIMUM_HIJRI_ADJUSTMENT: i64 = -30;
pub const MAXIMUM_HIJRI_ADJUSTMENT: i64 = 30;

/// Main loop tick interval in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 1000;
/// Countdown notification update interval while the session is active.
pub const COUNTDOWN_ACTIVE_INTERVAL_MS: i64 = 1000;
/// Countdown notification update interval while the session is locked.
pub const COUNTDOWN_LOCKED_INTERVAL_MS: i64 = 15000;

/// Minutes between sunrise and the start of Ishraq.
pub const ISHRAQ_OFFSET_MINUTES: i64 = 20;
/// Minutes before Fajr at which Sehri ends.
pub const SEHRI_OFFSET_MINUTES: i64 = 5;

/// Twilight angle below noon used for Fajr, in degrees from zenith.
pub const FAJR_TWILIGHT_ANGLE: f64 = 109.0;
/// Horizon angle (with refraction) used for sunrise and Maghrib.
pub const HORIZON_ANGLE: f64 = 91.0;
/// Altitude correction coefficient for horizon dip.
pub const ALTITUDE_DIP_COEFFICIENT: f64 = 0.0347;

/// Wall-clock gap that is treated as a time anomaly (suspend, clock jump).
/// Compared against chrono second counts, hence signed.
pub const TIME_ANOMALY_THRESHOLD_SECS: i64 = 30;

/// Standard exit code for failures.
pub const EXIT_FAILURE: i32 = 1;
