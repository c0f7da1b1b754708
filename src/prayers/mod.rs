//! Prayer schedule types and calculation entry points.
//!
//! The daily schedule covers eight instants: the five obligatory prayers
//! plus Sunrise, Ishraq, and Zawal. Times are carried as formatted 12-hour
//! clock strings; the calculator and tracker convert to and from decimal
//! hours and wall-clock datetimes at the edges.

pub mod calculator;
pub mod tracker;

use serde::Serialize;

/// A named instant in the daily schedule, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Prayer {
    Fajr,
    Sunrise,
    Ishraq,
    Zawal,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    /// All schedule entries in chronological order.
    pub const ALL: [Prayer; 8] = [
        Prayer::Fajr,
        Prayer::Sunrise,
        Prayer::Ishraq,
        Prayer::Zawal,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Sunrise => "Sunrise",
            Prayer::Ishraq => "Ishraq",
            Prayer::Zawal => "Zawal",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }

    /// Whether entering this period triggers a desktop alert.
    ///
    /// Only the five obligatory prayers announce; Sunrise, Ishraq, and
    /// Zawal are display-only markers.
    pub fn announces(&self) -> bool {
        matches!(
            self,
            Prayer::Fajr | Prayer::Dhuhr | Prayer::Asr | Prayer::Maghrib | Prayer::Isha
        )
    }

    /// Whether this entry participates in current/next-period tracking.
    ///
    /// Ishraq is informational only and never becomes the current period.
    pub fn tracked(&self) -> bool {
        !matches!(self, Prayer::Ishraq)
    }
}

impl std::fmt::Display for Prayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Observer position used by the calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in degrees, north positive.
    pub latitude: f64,
    /// Longitude in degrees, east positive.
    pub longitude: f64,
    /// Altitude above sea level in meters.
    pub altitude: f64,
}

/// Juristic method selecting the Asr shadow ratio and Isha twilight angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Madhab {
    Hanafi,
    Shafi,
}

impl Madhab {
    /// Shadow-length multiple at which Asr begins.
    pub fn asr_shadow_ratio(self) -> f64 {
        match self {
            Madhab::Hanafi => 2.0,
            Madhab::Shafi => 1.0,
        }
    }

    /// Twilight angle from zenith (degrees) at which Isha begins.
    pub fn isha_angle(self) -> f64 {
        match self {
            Madhab::Hanafi => 109.0,
            Madhab::Shafi => 107.0,
        }
    }

    /// Parse a config value, case-insensitively.
    pub fn from_name(name: &str) -> Option<Madhab> {
        match name.to_ascii_lowercase().as_str() {
            "hanafi" => Some(Madhab::Hanafi),
            "shafi" => Some(Madhab::Shafi),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Madhab::Hanafi => "hanafi",
            Madhab::Shafi => "shafi",
        }
    }
}

/// One day's schedule as formatted 12-hour clock strings ("5:21 AM").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrayerTimes {
    pub fajr: String,
    pub sunrise: String,
    pub ishraq: String,
    pub zawal: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

impl PrayerTimes {
    pub fn get(&self, prayer: Prayer) -> &str {
        match prayer {
            Prayer::Fajr => &self.fajr,
            Prayer::Sunrise => &self.sunrise,
            Prayer::Ishraq => &self.ishraq,
            Prayer::Zawal => &self.zawal,
            Prayer::Dhuhr => &self.dhuhr,
            Prayer::Asr => &self.asr,
            Prayer::Maghrib => &self.maghrib,
            Prayer::Isha => &self.isha,
        }
    }

    /// Iterate entries in chronological schedule order.
    pub fn iter(&self) -> impl Iterator<Item = (Prayer, &str)> {
        Prayer::ALL.iter().map(move |&p| (p, self.get(p)))
    }
}
