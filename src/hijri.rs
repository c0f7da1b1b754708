//! Hijri calendar conversion by day counting.
//!
//! Conversion walks day-by-day from a fixed anchor: Gregorian 2024-03-11
//! corresponds to 1 Ramadan 1445H. Month lengths alternate 30/29 with
//! Dhu al-Hijjah taking 30 days in leap years of the 30-year cycle.
//! A configurable day adjustment absorbs the difference between the
//! arithmetic calendar and local moon sighting.

use chrono::{Datelike, NaiveDate};

const HIJRI_MONTHS: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi al-Awwal",
    "Rabi al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Shaban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qadah",
    "Dhu al-Hijjah",
];

// Indexed by days-from-Sunday to match the Gregorian weekday
const HIJRI_DAYS: [&str; 7] = [
    "Al-Ahad",
    "Al-Ithnayn",
    "Al-Thulatha",
    "Al-Arbia",
    "Al-Khamis",
    "Al-Jumuah",
    "Al-Sabt",
];

// Leap years within the 30-year arithmetic cycle
const LEAP_CYCLE_YEARS: [i32; 11] = [2, 5, 7, 10, 13, 16, 18, 21, 24, 26, 29];

const ANCHOR_HIJRI: (i32, u32, u32) = (1445, 9, 1);

fn anchor_gregorian() -> NaiveDate {
    // 1 Ramadan 1445H
    NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
}

/// A date in the arithmetic Hijri calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HijriDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Whether a Hijri year is a leap year of the 30-year cycle.
pub fn is_leap_year(year: i32) -> bool {
    let position = year.rem_euclid(30);
    let position = if position == 0 { 30 } else { position };
    LEAP_CYCLE_YEARS.contains(&position)
}

/// Days in a Hijri month: odd months 30, even months 29, with the final
/// month taking 30 in leap years.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    if month == 12 && is_leap_year(year) {
        30
    } else if month % 2 == 1 {
        30
    } else {
        29
    }
}

/// English transliteration of a Hijri month name (1-based).
pub fn month_name(month: u32) -> &'static str {
    HIJRI_MONTHS[(month.clamp(1, 12) - 1) as usize]
}

/// Hijri weekday name for a Gregorian date.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    HIJRI_DAYS[date.weekday().num_days_from_sunday() as usize]
}

impl HijriDate {
    /// Convert a Gregorian date by walking whole days from the anchor.
    ///
    /// `adjustment` shifts the result by that many days to match local
    /// moon sighting.
    pub fn from_gregorian(date: NaiveDate, adjustment: i64) -> Self {
        let diff = date.signed_duration_since(anchor_gregorian()).num_days() + adjustment;
        let (mut year, mut month, mut day) = ANCHOR_HIJRI;

        if diff >= 0 {
            let mut remaining = diff;
            loop {
                let left_in_month = (days_in_month(month, year) - day) as i64;
                if remaining <= left_in_month {
                    day += remaining as u32;
                    break;
                }
                remaining -= left_in_month + 1;
                day = 1;
                month += 1;
                if month > 12 {
                    month = 1;
                    year += 1;
                }
            }
        } else {
            let mut remaining = -diff;
            while remaining > 0 {
                if day > 1 {
                    let step = remaining.min((day - 1) as i64);
                    day -= step as u32;
                    remaining -= step;
                } else {
                    if month == 1 {
                        month = 12;
                        year -= 1;
                    } else {
                        month -= 1;
                    }
                    day = days_in_month(month, year);
                    remaining -= 1;
                }
            }
        }

        HijriDate { year, month, day }
    }

    /// Convert back to a Gregorian date, inverting the same adjustment.
    pub fn to_gregorian(&self, adjustment: i64) -> NaiveDate {
        anchor_gregorian() + chrono::Duration::days(self.days_from_anchor() - adjustment)
    }

    /// Signed day count from the anchor to this date.
    fn days_from_anchor(&self) -> i64 {
        let (anchor_year, anchor_month, _) = ANCHOR_HIJRI;
        let mut days: i64 = 0;
        let (mut year, mut month) = (anchor_year, anchor_month);

        if (self.year, self.month) >= (anchor_year, anchor_month) {
            while (year, month) != (self.year, self.month) {
                days += days_in_month(month, year) as i64;
                month += 1;
                if month > 12 {
                    month = 1;
                    year += 1;
                }
            }
        } else {
            while (year, month) != (self.year, self.month) {
                if month == 1 {
                    month = 12;
                    year -= 1;
                } else {
                    month -= 1;
                }
                days -= days_in_month(month, year) as i64;
            }
        }

        days + self.day as i64 - 1
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    /// Render as "D Month YYYYH", e.g. "1 Ramadan 1445H".
    pub fn format(&self) -> String {
        format!("{} {} {}H", self.day, self.month_name(), self.year)
    }
}

impl std::fmt::Display for HijriDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

/// Gregorian date of every day in a Hijri month, as (day, date) pairs.
pub fn month_calendar(year: i32, month: u32, adjustment: i64) -> Vec<(u32, NaiveDate)> {
    let first = HijriDate {
        year,
        month,
        day: 1,
    }
    .to_gregorian(adjustment);
    (1..=days_in_month(month, year))
        .map(|day| (day, first + chrono::Duration::days((day - 1) as i64)))
        .collect()
}
