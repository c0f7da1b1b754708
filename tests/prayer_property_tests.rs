use chrono::{Duration, NaiveDate, Timelike};
use proptest::prelude::*;

use adhanr::hijri::{self, HijriDate};
use adhanr::prayers::{Coordinates, Madhab, Prayer, calculator, tracker};

/// Latitudes where every schedule entry has a real horizon crossing.
/// Beyond roughly 48 degrees the twilight angles start clamping in summer.
fn temperate_latitude_strategy() -> impl Strategy<Value = f64> {
    -48.0..=48.0
}

fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

fn day_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..365).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    })
}

fn madhab_strategy() -> impl Strategy<Value = Madhab> {
    prop_oneof![Just(Madhab::Hanafi), Just(Madhab::Shafi)]
}

proptest! {
    /// The schedule is strictly chronological at temperate latitudes.
    #[test]
    fn schedule_is_chronological(
        lat in temperate_latitude_strategy(),
        lon in longitude_strategy(),
        date in day_strategy(),
        madhab in madhab_strategy(),
    ) {
        let coords = Coordinates { latitude: lat, longitude: lon, altitude: 0.0 };
        let d = calculator::decimal_times(date, &coords, madhab, 0.0);

        prop_assert!(d.fajr < d.sunrise);
        prop_assert!(d.sunrise < d.ishraq);
        prop_assert!(d.ishraq < d.zawal);
        prop_assert!(d.zawal < d.dhuhr);
        prop_assert!(d.dhuhr < d.asr);
        prop_assert!(d.asr < d.maghrib);
        prop_assert!(d.maghrib < d.isha);
    }

    /// Hanafi rulings never place Asr or Isha before their Shafi
    /// counterparts, and leave the rest of the schedule untouched.
    #[test]
    fn hanafi_is_never_earlier_than_shafi(
        lat in temperate_latitude_strategy(),
        lon in longitude_strategy(),
        date in day_strategy(),
    ) {
        let coords = Coordinates { latitude: lat, longitude: lon, altitude: 0.0 };
        let hanafi = calculator::decimal_times(date, &coords, Madhab::Hanafi, 0.0);
        let shafi = calculator::decimal_times(date, &coords, Madhab::Shafi, 0.0);

        prop_assert!(hanafi.asr >= shafi.asr);
        prop_assert!(hanafi.isha >= shafi.isha);
        prop_assert_eq!(hanafi.fajr, shafi.fajr);
        prop_assert_eq!(hanafi.sunrise, shafi.sunrise);
        prop_assert_eq!(hanafi.dhuhr, shafi.dhuhr);
        prop_assert_eq!(hanafi.maghrib, shafi.maghrib);
    }

    /// The derived entries hold their defining identities exactly.
    #[test]
    fn derived_entries_are_exact(
        lat in temperate_latitude_strategy(),
        lon in longitude_strategy(),
        date in day_strategy(),
    ) {
        let coords = Coordinates { latitude: lat, longitude: lon, altitude: 0.0 };
        let d = calculator::decimal_times(date, &coords, Madhab::Hanafi, 0.0);

        prop_assert!((d.ishraq - d.sunrise - 20.0 / 60.0).abs() < 1e-9);
        prop_assert!((d.zawal - (d.fajr + d.maghrib) / 2.0).abs() < 1e-9);
    }

    /// The calculator is a pure function: identical inputs produce
    /// identical schedules, formatted strings included.
    #[test]
    fn calculation_is_deterministic(
        lat in temperate_latitude_strategy(),
        lon in longitude_strategy(),
        date in day_strategy(),
        madhab in madhab_strategy(),
        utc_offset in -12.0..=14.0f64,
    ) {
        let coords = Coordinates { latitude: lat, longitude: lon, altitude: 0.0 };
        let first = calculator::calculate(date, &coords, madhab, utc_offset);
        let second = calculator::calculate(date, &coords, madhab, utc_offset);

        prop_assert_eq!(first, second);
    }

    /// Formatting then parsing a time of day loses at most half a minute.
    #[test]
    fn format_parse_round_trip(decimal in 0.0..24.0f64) {
        let text = calculator::format_time(decimal);
        let parsed = calculator::parse_time(&text).unwrap();
        let back = parsed.hour() as f64 + parsed.minute() as f64 / 60.0;

        let mut diff = (back - decimal).abs();
        diff = diff.min(24.0 - diff); // midnight wrap
        prop_assert!(diff <= 0.51 / 60.0, "{decimal} -> {text} -> {back}");
    }

    /// Gregorian-to-Hijri conversion round-trips across the calendar.
    #[test]
    fn hijri_round_trips(
        offset in -20_000i64..=20_000,
        adjustment in -3i64..=3,
    ) {
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap() + Duration::days(offset);
        let hijri = HijriDate::from_gregorian(date, adjustment);

        prop_assert!((1..=12).contains(&hijri.month));
        prop_assert!(hijri.day >= 1);
        prop_assert!(hijri.day <= hijri::days_in_month(hijri.month, hijri.year));
        prop_assert_eq!(hijri.to_gregorian(adjustment), date);
    }

    /// Consecutive days move the Hijri date forward by exactly one day.
    #[test]
    fn hijri_days_are_contiguous(offset in -5_000i64..=5_000) {
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap() + Duration::days(offset);
        let today = HijriDate::from_gregorian(date, 0);
        let tomorrow = HijriDate::from_gregorian(date + Duration::days(1), 0);

        if tomorrow.day == today.day + 1 {
            prop_assert_eq!(tomorrow.month, today.month);
            prop_assert_eq!(tomorrow.year, today.year);
        } else {
            // Month rollover
            prop_assert_eq!(tomorrow.day, 1);
            prop_assert_eq!(today.day, hijri::days_in_month(today.month, today.year));
        }
    }

    /// The tracker always produces a sane snapshot: non-negative remaining
    /// time, a bounded percentage, and never the Ishraq marker.
    #[test]
    fn tracker_snapshot_is_sane(
        lat in temperate_latitude_strategy(),
        lon in longitude_strategy(),
        date in day_strategy(),
        minute_of_day in 0u32..1440,
    ) {
        let coords = Coordinates { latitude: lat, longitude: lon, altitude: 0.0 };
        let schedule = calculator::calculate(date, &coords, Madhab::Hanafi, 0.0);
        let now = date.and_hms_opt(minute_of_day / 60, minute_of_day % 60, 0).unwrap();

        let tracked = tracker::track(&schedule, now).unwrap();

        prop_assert!(tracked.remaining >= Duration::zero());
        prop_assert!(tracked.remaining <= Duration::hours(24));
        prop_assert!((0.0..=100.0).contains(&tracked.percentage_remaining));
        prop_assert_ne!(tracked.current, Prayer::Ishraq);
        prop_assert_ne!(tracked.next, Prayer::Ishraq);
        prop_assert!(tracked.next_at > now - Duration::seconds(1));
    }
}
