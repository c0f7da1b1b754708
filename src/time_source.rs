//! Time source abstraction for supporting both real-time and simulated time.
//!
//! This module provides a trait-based abstraction that allows the application
//! to use either real system time or simulated time. Simulation mode makes it
//! possible to replay a whole day of prayer transitions in seconds without
//! waiting for actual time to pass.

use chrono::{DateTime, Duration as ChronoDuration, Local, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::{Duration as StdDuration, SystemTime};

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Get the current system time (for duration calculations)
    fn system_now(&self) -> SystemTime;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;

    /// Check if simulation has ended (always false for real time)
    fn is_ended(&self) -> bool {
        false
    }
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn system_now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated time source for accelerated execution.
///
/// Two modes are supported:
/// - Linear acceleration: time flows continuously at a constant multiplier rate
/// - Fast-forward: time jumps instantly through sleep periods (multiplier = 0.0)
pub struct SimulatedTimeSource {
    start_time: DateTime<Local>,
    end_time: DateTime<Local>,
    /// Time acceleration factor (e.g., 60.0 = 1 minute per second).
    /// Special value 0.0 means fast-forward mode
    time_multiplier: f64,
    /// In fast-forward mode, the manually advanced simulated time
    fast_forward_current: std::sync::Mutex<Option<DateTime<Local>>>,
    /// Accumulated sleep time, updated after each sleep completes
    accumulated_sleep: std::sync::Mutex<StdDuration>,
}

impl SimulatedTimeSource {
    /// Create a new simulated time source.
    ///
    /// `multiplier` is the acceleration factor; 0.0 selects fast-forward mode.
    pub fn new(start_time: DateTime<Local>, end_time: DateTime<Local>, multiplier: f64) -> Self {
        let is_fast_forward = multiplier == 0.0;
        Self {
            start_time,
            end_time,
            time_multiplier: if is_fast_forward {
                0.0
            } else if multiplier <= 0.0 {
                3600.0 // Default to 1 hour per second
            } else {
                multiplier
            },
            fast_forward_current: std::sync::Mutex::new(if is_fast_forward {
                Some(start_time)
            } else {
                None
            }),
            accumulated_sleep: std::sync::Mutex::new(StdDuration::ZERO),
        }
    }

    /// Get the current simulated time based on accumulated sleep time.
    fn current_time(&self) -> DateTime<Local> {
        if self.time_multiplier == 0.0 {
            let guard = self.fast_forward_current.lock().unwrap();
            guard.unwrap_or(self.end_time)
        } else {
            let accumulated = self.accumulated_sleep.lock().unwrap();
            let total_secs = accumulated.as_secs_f64();
            drop(accumulated);

            let simulated_elapsed = ChronoDuration::seconds(total_secs as i64)
                + ChronoDuration::nanoseconds((total_secs.fract() * 1_000_000_000.0) as i64);

            let simulated = self.start_time + simulated_elapsed;
            if simulated > self.end_time {
                self.end_time
            } else {
                simulated
            }
        }
    }

    /// Check if the simulation has reached its end time
    pub fn is_ended(&self) -> bool {
        self.current_time() >= self.end_time
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.current_time()
    }

    fn system_now(&self) -> SystemTime {
        let current = self.current_time();
        SystemTime::UNIX_EPOCH + StdDuration::from_millis(current.timestamp_millis() as u64)
    }

    fn sleep(&self, duration: StdDuration) {
        if self.time_multiplier == 0.0 {
            // Fast-forward mode: advance time by exactly the requested duration
            let mut guard = self.fast_forward_current.lock().unwrap();
            if let Some(current) = *guard {
                let new_time = current + ChronoDuration::milliseconds(duration.as_millis() as i64);
                *guard = Some(new_time.min(self.end_time));
            }
            drop(guard);
            // Minimal sleep to allow other threads to run and logs to be output
            std::thread::sleep(StdDuration::from_millis(1));
        } else {
            // Linear acceleration mode: sleep for the scaled real duration,
            // capped at end time to ensure clean termination
            let duration_to_add = {
                let accumulated = self.accumulated_sleep.lock().unwrap();
                let accumulated_secs = accumulated.as_secs_f64();

                let simulated_elapsed = ChronoDuration::seconds(accumulated_secs as i64)
                    + ChronoDuration::nanoseconds(
                        (accumulated_secs.fract() * 1_000_000_000.0) as i64,
                    );
                let current_simulated = self.start_time + simulated_elapsed;

                if current_simulated >= self.end_time {
                    StdDuration::ZERO
                } else {
                    let remaining = self.end_time - current_simulated;
                    let remaining_secs = remaining.num_seconds() as f64
                        + (remaining.num_nanoseconds().unwrap_or(0) as f64 / 1_000_000_000.0);

                    if duration.as_secs_f64() > remaining_secs {
                        StdDuration::from_secs_f64(remaining_secs)
                    } else {
                        duration
                    }
                }
            };

            if duration_to_add > StdDuration::ZERO {
                let real_sleep_secs = duration_to_add.as_secs_f64() / self.time_multiplier;
                if real_sleep_secs > 0.0 {
                    std::thread::sleep(StdDuration::from_secs_f64(real_sleep_secs));
                }

                let mut accumulated = self.accumulated_sleep.lock().unwrap();
                *accumulated += duration_to_add;
            }
        }
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.is_ended()
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Get the current system time from the global time source
pub fn system_now() -> SystemTime {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .system_now()
}

/// Sleep for the specified duration using the global time source
pub fn sleep(duration: StdDuration) {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .sleep(duration)
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Check if simulation has reached its end time (always false for real time)
pub fn simulation_ended() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_ended()
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS"
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>, String> {
    use chrono::NaiveDateTime;

    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| {
            Local::now()
                .timezone()
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| "Ambiguous or invalid local time".to_string())
        })
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))
        .and_then(|r| r)
}

/// Parse a datetime string in a specific timezone
pub fn parse_datetime_in_tz(s: &str, tz: chrono_tz::Tz) -> Result<DateTime<chrono_tz::Tz>, String> {
    use chrono::{NaiveDateTime, TimeZone};

    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| {
            tz.from_local_datetime(&naive)
                .single()
                .ok_or_else(|| format!("Ambiguous or invalid time in timezone {tz}"))
        })
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))
        .and_then(|r| r)
}
