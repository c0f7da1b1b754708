//! Configuration validation functionality.
//!
//! Rejects out-of-range coordinates, unknown madhab names, unparseable
//! timezones, and bad legacy values before they reach the calculator.

use anyhow::Result;

use super::Config;
use crate::constants::*;
use crate::prayers::Madhab;

/// Validate every present field of a loaded configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(lat) = config.latitude
        && !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&lat)
    {
        anyhow::bail!(
            "latitude must be between {} and {} degrees (got {})",
            MINIMUM_LATITUDE,
            MAXIMUM_LATITUDE,
            lat
        );
    }

    if let Some(lon) = config.longitude
        && !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between {} and {} degrees (got {})",
            MINIMUM_LONGITUDE,
            MAXIMUM_LONGITUDE,
            lon
        );
    }

    if let Some(alt) = config.altitude
        && !alt.is_finite()
    {
        anyhow::bail!("altitude must be a finite number of meters (got {})", alt);
    }

    if let Some(ref madhab) = config.madhab
        && Madhab::from_name(madhab).is_none()
    {
        anyhow::bail!("madhab must be \"hanafi\" or \"shafi\" (got \"{}\")", madhab);
    }

    if let Some(adjustment) = config.hijri_adjustment
        && !(MINIMUM_HIJRI_ADJUSTMENT..=MAXIMUM_HIJRI_ADJUSTMENT).contains(&adjustment)
    {
        anyhow::bail!(
            "hijri_adjustment ({} days) must be between {} and {} days",
            adjustment,
            MINIMUM_HIJRI_ADJUSTMENT,
            MAXIMUM_HIJRI_ADJUSTMENT
        );
    }

    if let Some(ref tz) = config.timezone
        && tz.parse::<chrono_tz::Tz>().is_err()
    {
        anyhow::bail!("Unknown timezone \"{}\" (expected an IANA zone name)", tz);
    }

    // Legacy fields, checked before migration clears them
    if let Some(method) = config.asr_method
        && !(1..=2).contains(&method)
    {
        anyhow::bail!("asr_method must be 1 (shafi) or 2 (hanafi) (got {})", method);
    }

    if let Some(method) = config.isha_method
        && !(1..=2).contains(&method)
    {
        anyhow::bail!("isha_method must be 1 (hanafi) or 2 (shafi) (got {})", method);
    }

    // The two legacy encodings must agree on the madhab
    if let (Some(asr), Some(isha)) = (config.asr_method, config.isha_method)
        && asr == isha
    {
        anyhow::bail!(
            "asr_method ({}) and isha_method ({}) select different madhabs (the numberings are opposite)",
            asr,
            isha
        );
    }

    Ok(())
}
