use chrono::{Datelike, Duration, NaiveDate};

/// Prior-year date on the same weekday as `date`.
///
/// Steps back 366 days when `date` falls in a leap year and 365 otherwise,
/// then moves forward by 0..=6 days until the weekday matches. The shift is
/// never applied backwards.
pub fn comparable_last_year_date(date: NaiveDate) -> NaiveDate {
    let offset = if is_leap_year(date.year()) { 366 } else { 365 };
    let candidate = date - Duration::days(offset);

    let target = i64::from(date.weekday().num_days_from_monday());
    let found = i64::from(candidate.weekday().num_days_from_monday());
    if target == found {
        return candidate;
    }

    candidate + Duration::days((target - found).rem_euclid(7))
}

/// Every night between `start` (inclusive) and `end` (exclusive).
pub fn nights(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|day| *day < end)
        .collect()
}

pub fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        chrono::Weekday::Mon => "Mon",
        chrono::Weekday::Tue => "Tue",
        chrono::Weekday::Wed => "Wed",
        chrono::Weekday::Thu => "Thu",
        chrono::Weekday::Fri => "Fri",
        chrono::Weekday::Sat => "Sat",
        chrono::Weekday::Sun => "Sun",
    }
}

pub(crate) const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn comparable_date_keeps_weekday_across_a_full_year() {
        let start = date(2023, 1, 1);
        for day in start.iter_days().take(366 * 3) {
            let comparable = comparable_last_year_date(day);
            assert_eq!(comparable.weekday(), day.weekday(), "weekday drift for {day}");
        }
    }

    #[test]
    fn comparable_date_only_shifts_forward_within_a_week() {
        let start = date(2024, 1, 1);
        for day in start.iter_days().take(366 * 2) {
            let offset = if is_leap_year(day.year()) { 366 } else { 365 };
            let base = day - Duration::days(offset);
            let shift = (comparable_last_year_date(day) - base).num_days();
            assert!((0..=6).contains(&shift), "shift {shift} out of range for {day}");
        }
    }

    #[test]
    fn comparable_date_uses_leap_year_offset() {
        // 2024 is a leap year: 2024-03-16 minus 366 days is 2023-03-16 (Thu),
        // moved forward two days to reach Saturday.
        let saturday = date(2024, 3, 16);
        assert_eq!(comparable_last_year_date(saturday), date(2023, 3, 18));

        // 2025-05-10 (Sat) minus 365 days is 2024-05-10 (Fri), shifted one day.
        let saturday = date(2025, 5, 10);
        assert_eq!(comparable_last_year_date(saturday), date(2024, 5, 11));
    }

    #[test]
    fn leap_year_rule_handles_centuries() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2025));
    }

    #[test]
    fn nights_exclude_departure_day() {
        let stay = nights(date(2025, 6, 10), date(2025, 6, 13));
        assert_eq!(
            stay,
            vec![date(2025, 6, 10), date(2025, 6, 11), date(2025, 6, 12)]
        );
        assert!(nights(date(2025, 6, 10), date(2025, 6, 10)).is_empty());
        assert!(nights(date(2025, 6, 10), date(2025, 6, 1)).is_empty());
    }

    #[test]
    fn weekday_label_is_short_english_name() {
        assert_eq!(weekday_label(date(2025, 6, 14)), "Sat");
        assert_eq!(weekday_label(date(2025, 6, 16)), "Mon");
    }
}
