//! Prayer clock timezone resolution.
//!
//! All prayer calculations run on civil wall-clock time in a single zone:
//! either the system's local zone or an IANA zone named in the config.
//! This module resolves that zone once and converts the global time source
//! into naive wall-clock values for the calculator and tracker.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone};

use crate::config::Config;
use crate::time_source;

/// The timezone the prayer schedule is computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockZone {
    /// Follow the system's local timezone.
    Local,
    /// Fixed IANA timezone from the `timezone` config field.
    Fixed(chrono_tz::Tz),
}

impl ClockZone {
    /// Resolve the clock zone from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.timezone.as_deref() {
            Some(name) => {
                let tz: chrono_tz::Tz = name
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Unknown timezone: {name}"))
                    .context("Failed to resolve configured timezone")?;
                Ok(ClockZone::Fixed(tz))
            }
            None => Ok(ClockZone::Local),
        }
    }

    /// The fixed timezone override, if any.
    pub fn tz(&self) -> Option<chrono_tz::Tz> {
        match self {
            ClockZone::Local => None,
            ClockZone::Fixed(tz) => Some(*tz),
        }
    }

    /// Current wall-clock time in this zone, driven by the global time source.
    pub fn now(&self) -> NaiveDateTime {
        let local_now = time_source::now();
        match self {
            ClockZone::Local => local_now.naive_local(),
            ClockZone::Fixed(tz) => tz.from_utc_datetime(&local_now.naive_utc()).naive_local(),
        }
    }

    /// Current civil date in this zone.
    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// UTC offset in hours for the given date, sampled at noon.
    ///
    /// Sampling at noon keeps the offset stable across DST switches that
    /// happen in the early morning.
    pub fn utc_offset_hours(&self, date: NaiveDate) -> f64 {
        let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
        let offset_seconds = match self {
            ClockZone::Local => chrono::Local
                .from_local_datetime(&noon)
                .earliest()
                .map(|dt| dt.offset().fix().local_minus_utc())
                .unwrap_or_else(|| time_source::now().offset().fix().local_minus_utc()),
            ClockZone::Fixed(tz) => tz
                .from_local_datetime(&noon)
                .earliest()
                .map(|dt| dt.offset().fix().local_minus_utc())
                .unwrap_or(0),
        };
        offset_seconds as f64 / 3600.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_zone_offset_is_stable() {
        let zone = ClockZone::Fixed(chrono_tz::Tz::Asia__Riyadh);
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(zone.utc_offset_hours(date), 3.0);
    }

    #[test]
    fn fixed_zone_honors_dst() {
        let zone = ClockZone::Fixed(chrono_tz::Tz::Europe__Berlin);
        let summer = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let winter = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(zone.utc_offset_hours(summer), 2.0);
        assert_eq!(zone.utc_offset_hours(winter), 1.0);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let config = Config {
            timezone: Some("Mars/Olympus_Mons".into()),
            ..Config::default()
        };
        assert!(ClockZone::from_config(&config).is_err());
    }
}
