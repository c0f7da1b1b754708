//! Implementation of the `--simulate` command for testing time-based behavior.
//!
//! This command sets up a simulated time source, allowing the daemon to run
//! with accelerated time for testing schedule rollover, period transitions,
//! and countdown tracking without waiting for real time to pass.

use anyhow::Result;
use chrono::Local;
use std::sync::Arc;

use crate::logger::{Log, LoggerGuard};
use crate::time_source::{self, SimulatedTimeSource};

/// Handle the `--simulate` command by setting up a simulated time source.
///
/// This function prepares the simulation environment and returns control to
/// main.rs, which then runs the daemon normally but with accelerated time.
///
/// # Arguments
/// * `start_time` - Start time in format "YYYY-MM-DD HH:MM:SS"
/// * `end_time` - End time in format "YYYY-MM-DD HH:MM:SS"
/// * `multiplier` - Time acceleration factor (0 = fast-forward)
/// * `debug_enabled` - Whether debug mode is enabled
/// * `log_to_file` - Mirror output to a timestamped log file
///
/// # Returns
/// A logger guard to keep alive for the simulation's duration when file
/// logging was requested.
pub fn handle_simulate_command(
    start_time: String,
    end_time: String,
    multiplier: f64,
    debug_enabled: bool,
    log_to_file: bool,
) -> Result<Option<LoggerGuard>> {
    // Interpret the given times in the configured timezone override when
    // there is one, so simulations behave the same on any host
    let (start, end) = match crate::config::Config::load() {
        Ok(config) if config.timezone.is_some() => {
            let tz: chrono_tz::Tz = config
                .timezone
                .as_deref()
                .unwrap_or_default()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid configured timezone: {e}"))?;

            let start_tz = time_source::parse_datetime_in_tz(&start_time, tz)
                .map_err(|e| anyhow::anyhow!("Invalid start time: {e}"))?;
            let end_tz = time_source::parse_datetime_in_tz(&end_time, tz)
                .map_err(|e| anyhow::anyhow!("Invalid end time: {e}"))?;

            (start_tz.with_timezone(&Local), end_tz.with_timezone(&Local))
        }
        _ => {
            let start = time_source::parse_datetime(&start_time)
                .map_err(|e| anyhow::anyhow!("Invalid start time: {e}"))?;
            let end = time_source::parse_datetime(&end_time)
                .map_err(|e| anyhow::anyhow!("Invalid end time: {e}"))?;
            (start, end)
        }
    };

    if end <= start {
        anyhow::bail!("End time must be after start time");
    }

    // Initialize the simulated time source BEFORE any logging so that
    // timestamps are shown from the beginning
    let sim_source = Arc::new(SimulatedTimeSource::new(start, end, multiplier));
    time_source::init_time_source(sim_source);

    let guard = if log_to_file {
        let log_filename = format!(
            "adhanr-simulation-{}.log",
            Local::now().format("%Y%m%d-%H%M%S")
        );
        let guard = Log::start_file_logging(log_filename.clone())?;
        log_version!();
        log_block_start!("Logging to file: {}", log_filename);
        Some(guard)
    } else {
        log_version!();
        None
    };

    log_block_start!("Simulation Mode");

    let duration = end.signed_duration_since(start);
    log_decorated!(
        "Simulating from {} to {}",
        start.format("%Y-%m-%d %H:%M:%S"),
        end.format("%Y-%m-%d %H:%M:%S")
    );
    log_indented!(
        "Total simulated time: {} hours {} minutes",
        duration.num_hours(),
        duration.num_minutes() % 60
    );

    if multiplier <= 0.0 {
        log_indented!("Time acceleration: fast-forward (instant execution)");
    } else {
        let real_duration_secs = duration.num_seconds() as f64 / multiplier;
        log_indented!(
            "Time acceleration: {}x (will complete in ~{:.1} seconds)",
            multiplier as u64,
            real_duration_secs
        );
    }

    log_indented!("Running simulation...");

    if debug_enabled {
        log_pipe!();
        log_debug!("Simulated time source initialized");
    }

    // Return control to main.rs, which runs the daemon under simulated time
    Ok(guard)
}
