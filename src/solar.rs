//! Solar position arithmetic underlying the prayer time calculator.
//!
//! All formulas operate on the day-of-year and return either radians
//! (declination) or fractional hours (equation of time, solar noon).
//! The constants follow the classical approximation: a 365.24-day year,
//! a 23.44 degree axial tilt, and the three-term equation of time.

/// Degrees the mean sun advances per calendar day.
const DEGREES_PER_DAY: f64 = 360.0 / 365.24;
/// Earth's axial tilt in degrees.
const AXIAL_TILT: f64 = 23.44;

/// One-based day of the year for a civil date.
///
/// Counted as whole days since January 1st of the same year, plus one.
pub fn day_of_year(date: chrono::NaiveDate) -> f64 {
    use chrono::Datelike;
    let jan1 = chrono::NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
    (date.signed_duration_since(jan1).num_days() + 1) as f64
}

/// Solar declination in radians for the given day of year.
///
/// Positive in the northern summer. Uses the corrected-anomaly form so the
/// declination tracks the slightly elliptical orbit.
pub fn solar_declination(day: f64) -> f64 {
    let corrected =
        DEGREES_PER_DAY * (day + 10.0) + 1.9137 * (DEGREES_PER_DAY * (day - 2.0)).to_radians().sin();
    -(AXIAL_TILT.to_radians().sin() * corrected.to_radians().cos()).asin()
}

/// Equation of time in fractional hours for the given day of year.
///
/// The difference between apparent and mean solar time. Bounded by roughly
/// plus or minus 16.5 minutes across the year.
pub fn equation_of_time(day: f64) -> f64 {
    let b = (DEGREES_PER_DAY * (day - 81.0)).to_radians();
    (9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin()) / 60.0
}

/// Local clock time of solar noon in fractional hours.
///
/// `utc_offset` is the zone offset in hours (east positive); the longitude
/// term converts geographic position to mean solar time.
pub fn solar_noon(longitude: f64, utc_offset: f64, day: f64) -> f64 {
    utc_offset - longitude / 15.0 + 12.0 - equation_of_time(day)
}

/// Solar noon as a 24-hour "HH:MM" clock string.
///
/// Minutes are rounded with the carry wrapping into [0, 24).
pub fn dhuhr_time(longitude: f64, date: chrono::NaiveDate, utc_offset: f64) -> String {
    let noon = solar_noon(longitude, utc_offset, day_of_year(date)).rem_euclid(24.0);
    let mut hours = noon.floor() as i64;
    let mut minutes = ((noon - hours as f64) * 60.0).round() as i64;
    if minutes == 60 {
        minutes = 0;
        hours = (hours + 1) % 24;
    }
    format!("{hours:02}:{minutes:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn day_of_year_counts_from_one() {
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dec31 = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(day_of_year(jan1), 1.0);
        assert_eq!(day_of_year(dec31), 366.0);
    }

    #[test]
    fn declination_sign_matches_seasons() {
        // June solstice: sun north of the equator
        let june = solar_declination(172.0).to_degrees();
        assert!(june > 23.0 && june < 24.0, "june declination {june}");

        // December solstice: sun south of the equator
        let december = solar_declination(355.0).to_degrees();
        assert!(december < -23.0 && december > -24.0, "dec declination {december}");
    }

    #[test]
    fn declination_near_zero_at_equinox() {
        let march = solar_declination(80.0).to_degrees();
        assert!(march.abs() < 1.5, "equinox declination {march}");
    }

    #[test]
    fn equation_of_time_stays_bounded() {
        for day in 1..=366 {
            let eot = equation_of_time(day as f64);
            assert!(eot.abs() < 0.3, "day {day} eot {eot}");
        }
    }

    #[test]
    fn dhuhr_time_formats_24_hour() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        // Mecca sits east of its zone meridian, so noon lands before 12:30
        let text = dhuhr_time(39.8262, date, 3.0);
        assert_eq!(text.len(), 5);
        let (h, m) = text.split_once(':').unwrap();
        let h: u32 = h.parse().unwrap();
        let m: u32 = m.parse().unwrap();
        assert!((11..=12).contains(&h), "noon hour {text}");
        assert!(m < 60);
    }

    #[test]
    fn solar_noon_shifts_with_longitude() {
        // Further west within the same zone means later noon
        let east = solar_noon(40.0, 3.0, 100.0);
        let west = solar_noon(35.0, 3.0, 100.0);
        assert!(west > east);
    }
}
