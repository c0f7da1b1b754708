//! Implementation of the `--times` command.
//!
//! Prints the prayer schedule for today (or an explicit date) and exits.
//! With `--json` the schedule is emitted as a single JSON document on
//! stdout with logging suppressed, suitable for scripting and status bars.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::{
    clock::ClockZone,
    config::Config,
    hijri::HijriDate,
    logger::Log,
    prayers::calculator,
};

/// Handle the `--times` command.
///
/// # Arguments
/// * `date` - Optional date in "YYYY-MM-DD" format; defaults to today
/// * `json` - Emit machine-readable JSON instead of the log format
pub fn handle_times_command(date: Option<String>, json: bool) -> Result<()> {
    if json {
        // Keep stdout clean for the JSON document
        Log::set_enabled(false);
    }

    let config = Config::load()?;
    let clock = ClockZone::from_config(&config)?;

    let date = match date {
        Some(text) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .with_context(|| format!("Invalid date: {text}"))?,
        None => clock.today(),
    };

    let schedule = calculator::calculate(
        date,
        &config.coordinates(),
        config.madhab(),
        clock.utc_offset_hours(date),
    );
    let hijri = HijriDate::from_gregorian(date, config.hijri_adjustment());
    let sehri = calculator::sehri_end(&schedule.fajr)?;

    if json {
        let mut times = serde_json::Map::new();
        for (prayer, time) in schedule.iter() {
            times.insert(prayer.name().to_lowercase(), time.into());
        }

        let doc = serde_json::json!({
            "date": date.format("%Y-%m-%d").to_string(),
            "hijri": {
                "year": hijri.year,
                "month": hijri.month,
                "day": hijri.day,
                "formatted": hijri.format(),
            },
            "madhab": config.madhab().name(),
            "times": times,
            "sehri_ends": sehri,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    log_version!();
    log_block_start!(
        "Prayer times for {} ({})",
        date.format("%A, %-d %B %Y"),
        hijri.format()
    );
    for (prayer, time) in schedule.iter() {
        log_indented!("{}: {}", prayer, time);
    }
    log_indented!("Sehri ends: {}", sehri);
    log_end!();

    Ok(())
}
