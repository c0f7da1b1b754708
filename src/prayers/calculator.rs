//! Daily prayer time calculation.
//!
//! Times are derived from solar noon and hour-angle offsets: each prayer's
//! defining angle from zenith is converted to a clock offset via the
//! spherical hour-angle formula. Solar noon is quantized to the minute
//! before the offsets are applied, so Dhuhr's displayed time and the
//! derived times share the same base.

use anyhow::{Result, anyhow};
use chrono::NaiveTime;

use crate::constants::{
    ALTITUDE_DIP_COEFFICIENT, FAJR_TWILIGHT_ANGLE, HORIZON_ANGLE, ISHRAQ_OFFSET_MINUTES,
    SEHRI_OFFSET_MINUTES,
};
use crate::solar;

use super::{Coordinates, Madhab, PrayerTimes};

/// Unformatted schedule in fractional hours relative to the civil day.
///
/// Values before Dhuhr may be negative and values after may exceed 24 at
/// extreme latitudes; wrapping happens only at formatting time so the
/// Zawal midpoint stays exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecimalTimes {
    pub fajr: f64,
    pub sunrise: f64,
    pub ishraq: f64,
    pub zawal: f64,
    pub dhuhr: f64,
    pub asr: f64,
    pub maghrib: f64,
    pub isha: f64,
}

/// Compute the formatted schedule for one civil date.
pub fn calculate(
    date: chrono::NaiveDate,
    coords: &Coordinates,
    madhab: Madhab,
    utc_offset_hours: f64,
) -> PrayerTimes {
    let d = decimal_times(date, coords, madhab, utc_offset_hours);
    PrayerTimes {
        fajr: format_time(d.fajr),
        sunrise: format_time(d.sunrise),
        ishraq: format_time(d.ishraq),
        zawal: format_time(d.zawal),
        dhuhr: format_time(d.dhuhr),
        asr: format_time(d.asr),
        maghrib: format_time(d.maghrib),
        isha: format_time(d.isha),
    }
}

/// Compute the schedule in fractional hours.
pub fn decimal_times(
    date: chrono::NaiveDate,
    coords: &Coordinates,
    madhab: Madhab,
    utc_offset_hours: f64,
) -> DecimalTimes {
    let day = solar::day_of_year(date);
    let declination = solar::solar_declination(day);

    // Quantize noon to the minute so all offsets share Dhuhr's displayed base
    let noon = quantize_to_minute(solar::solar_noon(coords.longitude, utc_offset_hours, day));

    // Horizon dip from observer altitude, applied to horizon-crossing angles
    let dip = coords.altitude.max(0.0).sqrt() * ALTITUDE_DIP_COEFFICIENT;

    let fajr = noon - hour_angle_offset(FAJR_TWILIGHT_ANGLE + dip, coords.latitude, declination);
    let sunrise = noon - hour_angle_offset(HORIZON_ANGLE + dip, coords.latitude, declination);
    let maghrib = noon + hour_angle_offset(HORIZON_ANGLE + dip, coords.latitude, declination);
    let isha = noon + hour_angle_offset(madhab.isha_angle() + dip, coords.latitude, declination);

    // Asr: zenith angle at which an object's shadow reaches the madhab's
    // multiple of its height plus the noon shadow
    let shadow = madhab.asr_shadow_ratio() + (coords.latitude.to_radians() - declination).abs().tan();
    let asr_angle = shadow.atan().to_degrees();
    let asr = noon + hour_angle_offset(asr_angle, coords.latitude, declination);

    let ishraq = sunrise + ISHRAQ_OFFSET_MINUTES as f64 / 60.0;
    let zawal = (fajr + maghrib) / 2.0;

    DecimalTimes {
        fajr,
        sunrise,
        ishraq,
        zawal,
        dhuhr: noon,
        asr,
        maghrib,
        isha,
    }
}

/// Clock offset in hours from solar noon for a given zenith angle.
///
/// The arccosine argument is clamped to [-1, 1]: at extreme latitudes the
/// sun may never reach (or never leave) the angle, and the clamp pins the
/// offset to 0 or 12 hours instead of producing NaN.
fn hour_angle_offset(angle_deg: f64, latitude_deg: f64, declination_rad: f64) -> f64 {
    let angle = angle_deg.to_radians();
    let lat = latitude_deg.to_radians();
    let x = angle.cos() / (lat.cos() * declination_rad.cos()) - lat.tan() * declination_rad.tan();
    x.clamp(-1.0, 1.0).acos().to_degrees() / 15.0
}

/// Round fractional hours to the nearest minute, carrying into the hour.
fn quantize_to_minute(decimal: f64) -> f64 {
    let wrapped = decimal.rem_euclid(24.0);
    let mut hours = wrapped.floor() as i64;
    let mut minutes = ((wrapped - hours as f64) * 60.0).round() as i64;
    if minutes == 60 {
        minutes = 0;
        hours += 1;
    }
    hours as f64 + minutes as f64 / 60.0
}

/// Format fractional hours as a 12-hour clock string ("5:07 AM").
///
/// Hours are floored and minutes rounded, with the carry wrapping into
/// [0, 24) before the 12-hour conversion.
pub fn format_time(decimal: f64) -> String {
    let wrapped = decimal.rem_euclid(24.0);
    let mut hours = wrapped.floor() as i64;
    let mut minutes = ((wrapped - hours as f64) * 60.0).round() as i64;
    if minutes == 60 {
        minutes = 0;
        hours = (hours + 1) % 24;
    }
    let period = if hours >= 12 { "PM" } else { "AM" };
    let display = if hours % 12 == 0 { 12 } else { hours % 12 };
    format!("{display}:{minutes:02} {period}")
}

/// Parse a 12-hour clock string back into a time of day.
pub fn parse_time(text: &str) -> Result<NaiveTime> {
    let (clock, period) = text
        .rsplit_once(' ')
        .ok_or_else(|| anyhow!("Malformed time: {text}"))?;
    let (hours, minutes) = clock
        .split_once(':')
        .ok_or_else(|| anyhow!("Malformed time: {text}"))?;
    let hours: u32 = hours.parse().map_err(|_| anyhow!("Malformed time: {text}"))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| anyhow!("Malformed time: {text}"))?;

    let hours = match (period, hours) {
        ("AM", 12) => 0,
        ("AM", h) => h,
        ("PM", 12) => 12,
        ("PM", h) => h + 12,
        _ => return Err(anyhow!("Malformed time period: {text}")),
    };

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(|| anyhow!("Time out of range: {text}"))
}

/// Sehri (pre-dawn meal) end time: a fixed margin before Fajr.
pub fn sehri_end(fajr: &str) -> Result<String> {
    let time = parse_time(fajr)?;
    let adjusted = time - chrono::Duration::minutes(SEHRI_OFFSET_MINUTES);
    use chrono::Timelike;
    let decimal = adjusted.hour() as f64 + adjusted.minute() as f64 / 60.0;
    Ok(format_time(decimal))
}
