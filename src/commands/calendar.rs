//! Implementation of the `--calendar` command.
//!
//! Prints a Hijri month with the Gregorian date for each day. Without an
//! explicit month/year the current Hijri month is shown, with today marked.

use anyhow::Result;

use crate::{
    clock::ClockZone,
    config::Config,
    hijri::{self, HijriDate},
};

/// Handle the `--calendar` command.
///
/// # Arguments
/// * `month` - Optional (hijri month, hijri year) pair; defaults to the
///   current Hijri month
pub fn handle_calendar_command(month: Option<(u32, i32)>) -> Result<()> {
    let config = Config::load()?;
    let clock = ClockZone::from_config(&config)?;
    let adjustment = config.hijri_adjustment();

    let today = clock.today();
    let today_hijri = HijriDate::from_gregorian(today, adjustment);

    let (month, year) = month.unwrap_or((today_hijri.month, today_hijri.year));

    log_version!();
    log_block_start!(
        "{} {}H ({} days)",
        hijri::month_name(month),
        year,
        hijri::days_in_month(month, year)
    );

    for (day, date) in hijri::month_calendar(year, month, adjustment) {
        let marker = if date == today { "  ◀ today" } else { "" };
        log_indented!(
            "{:2}  {}, {}{}",
            day,
            hijri::weekday_name(date),
            date.format("%-d %B %Y"),
            marker
        );
    }
    log_end!();

    Ok(())
}
