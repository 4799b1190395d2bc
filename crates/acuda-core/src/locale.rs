//! Spanish (es-ES) date and time formatting.
//!
//! Dates are printed the way `es-ES` short dates read on screen: day and month without zero
//! padding, four digit year (`19/10/2026`, `5/3/2026`).

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};

/// Format a date as `d/m/yyyy`.
pub fn format_date_es(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// Format a time as `HH:MM:SS`, zero padded.
pub fn format_time_es(datetime: NaiveDateTime) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        datetime.hour(),
        datetime.minute(),
        datetime.second()
    )
}

/// Current local date in `d/m/yyyy`.
pub fn today_es() -> String {
    format_date_es(Local::now().date_naive())
}

/// Current local date and time, `d/m/yyyy HH:MM:SS`.
pub fn now_es() -> String {
    let now = Local::now().naive_local();
    format!("{} {}", format_date_es(now.date()), format_time_es(now))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_has_no_zero_padding() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(format_date_es(date), "5/3/2026");
    }

    #[test]
    fn test_two_digit_day_and_month() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(format_date_es(date), "19/10/2026");
    }

    #[test]
    fn test_time_is_zero_padded() {
        let dt = NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(8, 5, 3)
            .unwrap();
        assert_eq!(format_time_es(dt), "08:05:03");
    }

    #[test]
    fn test_today_matches_format() {
        let today = today_es();
        assert_eq!(today.split('/').count(), 3);
        assert!(!today.starts_with('0'));
    }
}
