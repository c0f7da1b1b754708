//! Configuration system with validation and default config generation.
//!
//! Settings live in a TOML file at `$XDG_CONFIG_HOME/adhanr/adhanr.toml`
//! (overridable with `--config`). Every field is optional: accessors fall
//! back to the Mecca defaults so a missing or sparse file still produces a
//! working schedule.
//!
//! ```toml
//! #[Location]
//! latitude = 21.4225       # Geographic latitude (-90 to 90)
//! longitude = 39.8262      # Geographic longitude (-180 to 180)
//! altitude = 0.0           # Altitude above sea level in meters
//!
//! #[Calculation]
//! madhab = "hanafi"        # Juristic method: "hanafi" or "shafi"
//! hijri_adjustment = 0     # Hijri date offset in days (-30 to 30)
//! # timezone = "Asia/Riyadh"  # IANA zone; defaults to system local time
//!
//! #[Notifications]
//! notifications = true                  # Enable desktop notifications
//! default_sound = "alarm-clock-elapsed" # Freedesktop sound name for alerts
//!
//! [sounds]
//! # fajr = { enabled = true, sound = "bell" }
//! ```
//!
//! Legacy configs carrying `asr_method = 1|2` are migrated to the named
//! `madhab` field with a deprecation warning.

pub mod builder;
pub mod loading;
pub mod validation;

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::constants::*;
use crate::notify::{SoundChoice, SoundPrefs};
use crate::prayers::{Coordinates, Madhab, Prayer};

pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Per-prayer alert sound entry in the `[sounds]` table.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct SoundSetting {
    /// Whether this prayer's alert plays audio. Defaults to true.
    pub enabled: Option<bool>,
    /// Freedesktop sound name, overriding `default_sound`.
    pub sound: Option<String>,
}

/// Optional `[sounds]` table with one entry per announcing prayer.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct SoundsConfig {
    pub fajr: Option<SoundSetting>,
    pub dhuhr: Option<SoundSetting>,
    pub asr: Option<SoundSetting>,
    pub maghrib: Option<SoundSetting>,
    pub isha: Option<SoundSetting>,
}

impl SoundsConfig {
    fn get(&self, prayer: Prayer) -> Option<&SoundSetting> {
        match prayer {
            Prayer::Fajr => self.fajr.as_ref(),
            Prayer::Dhuhr => self.dhuhr.as_ref(),
            Prayer::Asr => self.asr.as_ref(),
            Prayer::Maghrib => self.maghrib.as_ref(),
            Prayer::Isha => self.isha.as_ref(),
            _ => None,
        }
    }
}

/// Application settings loaded from `adhanr.toml`.
///
/// All fields are optional; use the accessor methods to read values with
/// defaults applied.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Geographic latitude in degrees (-90 to 90).
    pub latitude: Option<f64>,
    /// Geographic longitude in degrees (-180 to 180).
    pub longitude: Option<f64>,
    /// Altitude above sea level in meters.
    pub altitude: Option<f64>,

    /// Juristic method: "hanafi" or "shafi".
    pub madhab: Option<String>,
    /// Hijri date offset in days for local moon sighting (-30 to 30).
    pub hijri_adjustment: Option<i64>,
    /// IANA timezone name. When unset the system local zone is used.
    pub timezone: Option<String>,

    /// Whether desktop notifications are enabled.
    pub notifications: Option<bool>,
    /// Default freedesktop sound name for prayer alerts.
    pub default_sound: Option<String>,
    /// Per-prayer sound overrides.
    pub sounds: Option<SoundsConfig>,

    /// Deprecated numeric madhab selector: 1 = shafi, 2 = hanafi.
    #[serde(default)]
    pub asr_method: Option<i64>,
    /// Deprecated numeric Isha selector: 1 = hanafi, 2 = shafi.
    #[serde(default)]
    pub isha_method: Option<i64>,
}

impl Config {
    /// Migrate legacy field names for backward compatibility.
    ///
    /// `asr_method = 2` becomes `madhab = "hanafi"` and `1` becomes
    /// `"shafi"`; `isha_method` uses the opposite numbering (1 = hanafi).
    /// An explicit `madhab` always wins.
    pub fn migrate_legacy_fields(&mut self) {
        // Out-of-range and disagreeing values are left in place for
        // validation to reject
        let asr = match self.asr_method {
            Some(1) => Some(Madhab::Shafi),
            Some(2) => Some(Madhab::Hanafi),
            _ => None,
        };
        let isha = match self.isha_method {
            Some(1) => Some(Madhab::Hanafi),
            Some(2) => Some(Madhab::Shafi),
            _ => None,
        };
        if self.asr_method.is_some() && asr.is_none() {
            return;
        }
        if self.isha_method.is_some() && isha.is_none() {
            return;
        }
        if let (Some(a), Some(i)) = (asr, isha)
            && a != i
        {
            return;
        }

        if let Some(madhab) = asr.or(isha) {
            log_pipe!();
            log_warning!(
                "Config fields 'asr_method'/'isha_method' are deprecated. Please use madhab = \"hanafi\" or \"shafi\" instead."
            );
            if self.madhab.is_none() {
                self.madhab = Some(madhab.name().to_string());
            }
            self.asr_method = None;
            self.isha_method = None;
        }
    }

    /// Observer position with defaults applied.
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude.unwrap_or(DEFAULT_LATITUDE),
            longitude: self.longitude.unwrap_or(DEFAULT_LONGITUDE),
            altitude: self.altitude.unwrap_or(DEFAULT_ALTITUDE),
        }
    }

    /// Juristic method with the default applied.
    pub fn madhab(&self) -> Madhab {
        self.madhab
            .as_deref()
            .and_then(Madhab::from_name)
            .unwrap_or(Madhab::Hanafi)
    }

    pub fn hijri_adjustment(&self) -> i64 {
        self.hijri_adjustment.unwrap_or(DEFAULT_HIJRI_ADJUSTMENT)
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications.unwrap_or(DEFAULT_NOTIFICATIONS_ENABLED)
    }

    /// Resolve the `[sounds]` table into orchestrator preferences.
    pub fn sound_prefs(&self) -> SoundPrefs {
        let default_sound = self
            .default_sound
            .clone()
            .unwrap_or_else(|| DEFAULT_ALERT_SOUND.to_string());
        let mut prefs = SoundPrefs::new(default_sound);

        if let Some(ref sounds) = self.sounds {
            for prayer in Prayer::ALL.into_iter().filter(Prayer::announces) {
                if let Some(setting) = sounds.get(prayer) {
                    prefs.set(
                        prayer,
                        SoundChoice {
                            enabled: setting.enabled.unwrap_or(true),
                            sound: setting.sound.clone(),
                        },
                    );
                }
            }
        }
        prefs
    }

    /// Load configuration using the module's load function.
    pub fn load() -> Result<Self> {
        load()
    }

    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        load_from_path(path)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");

        let coords = self.coordinates();
        let lat_dir = if coords.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if coords.longitude >= 0.0 { "E" } else { "W" };
        log_indented!(
            "Location: {:.3}°{}, {:.3}°{}",
            coords.latitude.abs(),
            lat_dir,
            coords.longitude.abs(),
            lon_dir
        );
        if self.latitude.is_none() || self.longitude.is_none() {
            log_warning!("Using placeholder coordinates (Mecca)");
            log_indented!("Set latitude and longitude in adhanr.toml for your location");
        }
        if coords.altitude != 0.0 {
            log_indented!("Altitude: {:.0}m", coords.altitude);
        }

        log_indented!("Madhab: {}", self.madhab().name());
        match self.timezone {
            Some(ref tz) => log_indented!("Timezone: {}", tz),
            None => log_indented!("Timezone: system local"),
        }
        if self.hijri_adjustment() != 0 {
            log_indented!("Hijri adjustment: {:+} days", self.hijri_adjustment());
        }
        log_indented!(
            "Notifications: {}",
            if self.notifications_enabled() {
                "enabled"
            } else {
                "disabled"
            }
        );
    }
}
