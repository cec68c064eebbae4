use chrono::{Datelike, Months, NaiveDate};

use crate::error::{MatchError, MatchResult};
use crate::models::{BirthDateWindow, Profile};

/// Age in whole years on `today`
///
/// The year difference is reduced by one while this year's birthday is still ahead.
#[inline]
pub fn current_age(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years - 1
    } else {
        years
    }
}

/// Calendar-aware `date - years`
///
/// Feb 29 maps onto Feb 28 when the target year is not a leap year.
/// Negative `years` move forward in time. Returns `None` outside chrono's range.
pub fn years_before(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let months = Months::new(years.unsigned_abs().checked_mul(12)?);
    if years >= 0 {
        date.checked_sub_months(months)
    } else {
        date.checked_add_months(months)
    }
}

/// Birth-date range matching the profile's `[age_min, age_max]`
///
/// The earliest acceptable birth date is `today - age_max years`, the latest
/// `today - age_min years`, both inclusive.
pub fn compute_age_window(profile: &Profile, today: NaiveDate) -> MatchResult<BirthDateWindow> {
    if profile.age_min > profile.age_max {
        return Err(MatchError::InvalidState(format!(
            "profile {} has an inverted age window ({} > {})",
            profile.id, profile.age_min, profile.age_max
        )));
    }

    let earliest = years_before(today, profile.age_max);
    let latest = years_before(today, profile.age_min);

    match (earliest, latest) {
        (Some(earliest), Some(latest)) => Ok(BirthDateWindow { earliest, latest }),
        _ => Err(MatchError::InvalidState(format!(
            "profile {} age window [{}, {}] is out of calendar range",
            profile.id, profile.age_min, profile.age_max
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn profile_with_window(age_min: i32, age_max: i32) -> Profile {
        Profile {
            id: 1,
            user_id: 1,
            name: "Test".to_string(),
            birth_date: date(1994, 6, 15),
            gender_id: 1,
            city_id: 1,
            description: None,
            target_gender_id: Some(2),
            age_min,
            age_max,
            active: true,
        }
    }

    #[test]
    fn test_age_on_anniversary() {
        assert_eq!(current_age(date(1994, 6, 15), date(2024, 6, 15)), 30);
    }

    #[test]
    fn test_age_day_before_anniversary() {
        assert_eq!(current_age(date(1994, 6, 15), date(2024, 6, 14)), 29);
    }

    #[test]
    fn test_age_leap_day_birthday() {
        // Not yet 1 March, so the Feb 29 birthday has not been reached in 2023
        assert_eq!(current_age(date(2000, 2, 29), date(2023, 2, 28)), 22);
        assert_eq!(current_age(date(2000, 2, 29), date(2023, 3, 1)), 23);
    }

    #[test]
    fn test_years_before_clamps_leap_day() {
        assert_eq!(years_before(date(2024, 2, 29), 1), Some(date(2023, 2, 28)));
        assert_eq!(years_before(date(2024, 2, 29), 4), Some(date(2020, 2, 29)));
        assert_eq!(years_before(date(2024, 2, 29), -1), Some(date(2025, 2, 28)));
    }

    #[test]
    fn test_age_window_bounds() {
        let window = compute_age_window(&profile_with_window(25, 35), date(2024, 6, 15)).unwrap();

        assert_eq!(window.earliest, date(1989, 6, 15));
        assert_eq!(window.latest, date(1999, 6, 15));
        assert!(window.contains(date(1989, 6, 15)));
        assert!(window.contains(date(1999, 6, 15)));
        assert!(!window.contains(date(1989, 6, 14)));
        assert!(!window.contains(date(1999, 6, 16)));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let result = compute_age_window(&profile_with_window(40, 30), date(2024, 6, 15));
        assert!(matches!(result, Err(MatchError::InvalidState(_))));
    }
}
